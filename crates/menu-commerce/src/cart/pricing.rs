//! Cart pricing summaries.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a whole cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of every entry total.
    pub subtotal: Money,
    /// Number of units across entries.
    pub item_count: i64,
    /// Per-entry breakdown.
    pub line_items: Vec<LineItemPricing>,
}

/// Pricing breakdown for a single cart entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemPricing {
    /// Cart entry ID.
    pub line_item_id: String,
    /// Unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: i64,
    /// Total for this entry.
    pub total: Money,
}
