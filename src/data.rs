use serde::{Deserialize, Serialize};

use crate::error::{MenuError, Result};

const BATTLES_JSON: &str = include_str!("../assets/battles.json");

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BattleEntry {
    pub year: i32,
    pub name: String,
    pub description: String,
}

/// Parse and validate a chronological battle list.
pub fn load_battles(json: &str) -> Result<Vec<BattleEntry>> {
    let battles: Vec<BattleEntry> = serde_json::from_str(json).map_err(MenuError::BattleJson)?;
    validate(&battles)?;
    Ok(battles)
}

pub fn default_battles() -> Result<Vec<BattleEntry>> {
    load_battles(BATTLES_JSON)
}

fn validate(battles: &[BattleEntry]) -> Result<()> {
    if battles.is_empty() {
        return Err(MenuError::NoBattles);
    }
    for (index, b) in battles.iter().enumerate() {
        if b.name.trim().is_empty() {
            return Err(MenuError::EmptyField { index, field: "name" });
        }
        if b.description.trim().is_empty() {
            return Err(MenuError::EmptyField { index, field: "description" });
        }
    }
    if let Some(w) = battles.windows(2).find(|w| w[0].year >= w[1].year) {
        return Err(MenuError::YearsOutOfOrder { previous: w[0].year, next: w[1].year });
    }
    Ok(())
}
