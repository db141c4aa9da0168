use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::error::Result;

/// Operator-level setting persisted alongside the product ledger, such as the
/// Discord webhook URL. Values are stored as JSON text.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct SystemSetting {
    pub key: String,
    pub value_json: String,
}

pub const SETTING_DISCORD_WEBHOOK: &str = "discord_webhook_url";

impl SystemSetting {
    pub fn new(key: &str, value: serde_json::Value) -> Result<Self> {
        Ok(Self {
            key: key.to_string(),
            value_json: serde_json::to_string(&value)?,
        })
    }

    pub fn value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.value_json)?)
    }

    /// Convenience accessor for settings that hold a plain string.
    pub fn as_string(&self) -> Option<String> {
        self.value()
            .ok()
            .and_then(|v| v.as_str().map(|s| s.to_string()))
    }
}
