use crate::text::{Align, Shadow, TextStyle};

// --- COLORS ---
pub mod colors {
    pub const BG_BASE: u32 = 0x0a0a14;
    pub const BG_PANEL: u32 = 0x1a1a2e;
    pub const RED: u32 = 0xdc143c;
    pub const WHITE: u32 = 0xffffff;
    pub const GOLD: u32 = 0xffd700;
    pub const GOLD_DIM: u32 = 0x8b6914;
    pub const DARK_WOOD: u32 = 0x4a3520;
    pub const TOOLTIP_BG: u32 = 0x0d0d1a;
    pub const MODAL_OVERLAY: u32 = 0x000000;
}

// --- DEPTHS (draw order, low to high) ---
pub mod depths {
    pub const BG: i32 = 0;
    pub const PANEL: i32 = 1;
    pub const DECORATIONS: i32 = 2;
    pub const TIMELINE: i32 = 3;
    pub const SPRITES: i32 = 4;
    pub const UI: i32 = 5;
    pub const TOOLTIP: i32 = 6;
    pub const MODAL: i32 = 7;
    pub const MODAL_CONTENT: i32 = 8;
}

// --- MENU LAYOUT ---
pub mod layout {
    // Flag stripes along the top edge
    pub const STRIPE_HEIGHT: f32 = 40.0;
    pub const WHITE_STRIPE_HEIGHT: f32 = 20.0;

    pub const TITLE_Y: f32 = 110.0;
    pub const SUBTITLE_Y: f32 = 180.0;
    pub const DECO_LINE_Y: f32 = 220.0;
    pub const DECO_LINE_WIDTH: f32 = 480.0;
    pub const TITLE_FONT_SIZE: f32 = 64.0;
    pub const SUBTITLE_FONT_SIZE: f32 = 22.0;

    pub const HUSSAR_X: f32 = 230.0;
    pub const HUSSAR_Y: f32 = 310.0;
    pub const EAGLE_X: f32 = 1050.0;
    pub const EAGLE_Y: f32 = 310.0;
    pub const EAGLE_SCALE: f32 = 1.6;

    pub const TIMELINE_Y: f32 = 450.0;
    pub const TIMELINE_PADDING_X: f32 = 120.0;
    pub const TIMELINE_TRACK_HEIGHT: f32 = 6.0;
    pub const TIMELINE_NODE_RADIUS: f32 = 12.0;
    pub const TIMELINE_GLOW_RADIUS: f32 = 22.0;
    pub const TIMELINE_YEAR_OFFSET_Y: f32 = -38.0;
    pub const TIMELINE_NAME_OFFSET_Y: f32 = 38.0;
    pub const TIMELINE_TOOLTIP_PADDING: f32 = 8.0;
    pub const TIMELINE_TOOLTIP_OFFSET_Y: f32 = -56.0;
    /// Minimum distance between the tooltip and either screen edge.
    pub const TIMELINE_TOOLTIP_MARGIN: f32 = 8.0;
    pub const TIMELINE_TOOLTIP_RADIUS: f32 = 4.0;

    pub const SELECTED_BATTLE_Y: f32 = 620.0;

    pub const MODAL_PANEL_WIDTH: f32 = 500.0;
    pub const MODAL_PANEL_HEIGHT: f32 = 300.0;
    pub const MODAL_TITLE_OFFSET_Y: f32 = -100.0;
    pub const MODAL_YEAR_OFFSET_Y: f32 = -60.0;
    pub const MODAL_DESC_OFFSET_Y: f32 = 0.0;
    pub const MODAL_CLOSE_OFFSET_Y: f32 = 100.0;
    pub const MODAL_DESC_WORD_WRAP_WIDTH: f32 = 440.0;
}

pub const FONT_FAMILY: &str = "\"Courier New\", Courier, monospace";

pub const TITLE_TEXT: &str = "HUSARIA";
pub const SUBTITLE_TEXT: &str = "OBRONA RZECZYPOSPOLITEJ";

pub fn title_style() -> TextStyle {
    TextStyle {
        font_size: layout::TITLE_FONT_SIZE,
        color: colors::WHITE,
        stroke: Some((colors::RED, 6.0)),
        shadow: Some(Shadow { offset_x: 4.0, offset_y: 4.0, color: 0x000000, blur: 0.0 }),
        ..TextStyle::default()
    }
}

pub fn subtitle_style() -> TextStyle {
    TextStyle {
        font_size: layout::SUBTITLE_FONT_SIZE,
        color: colors::RED,
        letter_spacing: 4.0,
        shadow: Some(Shadow { offset_x: 2.0, offset_y: 2.0, color: 0x000000, blur: 0.0 }),
        ..TextStyle::default()
    }
}

pub fn modal_description_style() -> TextStyle {
    TextStyle {
        font_size: 16.0,
        color: colors::WHITE,
        align: Align::Center,
        wrap_width: Some(layout::MODAL_DESC_WORD_WRAP_WIDTH),
        ..TextStyle::default()
    }
}
