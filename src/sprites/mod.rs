pub mod eagle;
pub mod hussar;

pub use eagle::PolishEagle;
pub use hussar::{generate_hussar_frames, render_hussar_frame};
