//! Menu item model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use canteen_core::MenuItemId;

/// A menu entry.
///
/// Edits overwrite in place; there is no versioning. `available` is a
/// display toggle only — unavailable items stay in the raw catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    /// Price in rupees; non-negative.
    pub price: Decimal,
    /// Free-form label (e.g. "Snacks", "Beverages").
    pub category: String,
    pub available: bool,
}
