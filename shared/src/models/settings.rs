//! Café settings (singleton record)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// When false, customer orders covered by the gate scope are refused
    pub accepting_orders: bool,
    #[serde(default)]
    pub version: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            accepting_orders: true,
            version: 0,
        }
    }
}

/// Partial settings update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub accepting_orders: Option<bool>,
    pub version: Option<u64>,
}
