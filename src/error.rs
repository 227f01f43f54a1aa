//! Errors raised at the edges of the menu: data loading and the browser host.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("battle data is not valid JSON: {0}")]
    BattleJson(#[source] serde_json::Error),

    #[error("battle list is empty")]
    NoBattles,

    #[error("battle {index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },

    /// Entries must be listed in strictly increasing year order.
    #[error("battle years out of order: {previous} is followed by {next}")]
    YearsOutOfOrder { previous: i32, next: i32 },

    #[error("game config is not valid JSON: {0}")]
    Config(#[source] serde_json::Error),

    #[error("host error: {0}")]
    Host(String),
}

impl MenuError {
    pub fn host(what: impl Into<String>) -> MenuError {
        MenuError::Host(what.into())
    }
}

impl From<JsValue> for MenuError {
    fn from(value: JsValue) -> Self {
        MenuError::Host(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<MenuError> for JsValue {
    fn from(err: MenuError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

pub type Result<T> = std::result::Result<T, MenuError>;
