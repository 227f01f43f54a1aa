use serde::{Deserialize, Serialize};

use crate::constants::colors;
use crate::error::{MenuError, Result};

pub const DEFAULT_CANVAS_ID: &str = "husaria-canvas";

/// Host-facing settings. Every field is optional in the JSON the page passes in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub width: u32,
    pub height: u32,
    pub background: u32,
    pub canvas_id: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 1280,
            height: 720,
            background: colors::BG_BASE,
            canvas_id: DEFAULT_CANVAS_ID.to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: Option<&str>) -> Result<GameConfig> {
        match json.map(str::trim) {
            None | Some("") => Ok(GameConfig::default()),
            Some(text) => serde_json::from_str(text).map_err(MenuError::Config),
        }
    }
}
