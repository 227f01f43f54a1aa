pub mod boot;
pub mod menu;

pub use boot::boot;
pub use menu::MenuScene;
