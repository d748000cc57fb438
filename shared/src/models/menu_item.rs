//! Menu Item Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dietary marker shown next to the item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    #[default]
    Veg,
    NonVeg,
}

/// Menu item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Price in rupees, always > 0
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(rename = "type", alias = "itemType", default)]
    pub item_type: ItemType,
    /// Normalised availability flag
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency token, bumped on every write
    #[serde(default)]
    pub version: u64,
}

/// Create menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemCreate {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "type", alias = "itemType")]
    pub item_type: Option<ItemType>,
    pub available: Option<bool>,
    pub in_stock: Option<bool>,
}

impl MenuItemCreate {
    pub fn is_available(&self) -> bool {
        resolve_availability(self.available, self.in_stock).unwrap_or(true)
    }
}

/// Update menu item payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "type", alias = "itemType")]
    pub item_type: Option<ItemType>,
    pub available: Option<bool>,
    pub in_stock: Option<bool>,
    /// Expected current version; stale values are rejected
    pub version: Option<u64>,
}

impl MenuItemUpdate {
    /// `None` when neither flag was sent
    pub fn availability(&self) -> Option<bool> {
        resolve_availability(self.available, self.in_stock)
    }
}

/// Merge the two availability flags clients may send.
///
/// Either flag explicitly `false` makes the item unavailable.
pub fn resolve_availability(available: Option<bool>, in_stock: Option<bool>) -> Option<bool> {
    match (available, in_stock) {
        (None, None) => None,
        (a, s) => Some(a.unwrap_or(true) && s.unwrap_or(true)),
    }
}
