//! In-memory cart receiving committed line items.

use crate::cart::{CartLineItem, CartPricing, CartSink, LineItemPricing, MergeKey, StoreContext};
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart entry.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// A cart entry: a line item plus its running total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartEntry {
    /// Entry identifier, unique within the cart.
    pub id: String,
    /// Merge identity; `None` for kits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<MergeKey>,
    /// The line item; its quantity grows as identical items are merged.
    pub item: CartLineItem,
    /// Total price (unit_price * quantity).
    pub total_price: Money,
}

impl CartEntry {
    fn new(id: String, key: Option<MergeKey>, item: CartLineItem) -> Result<Self, CommerceError> {
        let total_price = item.total_price()?;
        Ok(Self {
            id,
            key,
            item,
            total_price,
        })
    }

    fn update_total(&mut self) -> Result<(), CommerceError> {
        self.total_price = self.item.total_price()?;
        Ok(())
    }
}

/// A shopping cart scoped to one store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Store the items belong to.
    pub store: Option<StoreContext>,
    /// Entries in insertion order.
    pub entries: Vec<CartEntry>,
    /// Cart currency.
    pub currency: Currency,
    /// Unix timestamp of last update.
    pub updated_at: i64,
    line_counter: u64,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            store: None,
            entries: Vec::new(),
            currency,
            updated_at: current_timestamp(),
            line_counter: 0,
        }
    }

    /// Bind the cart to a store, clearing it if the store changed.
    pub fn set_store(&mut self, store: &StoreContext) {
        let changed = self
            .store
            .as_ref()
            .map(|s| s.store_id != store.store_id)
            .unwrap_or(false);
        if changed {
            self.entries.clear();
        }
        self.store = Some(store.clone());
        self.updated_at = current_timestamp();
    }

    /// Add a line item, merging it into an identical entry when one exists.
    ///
    /// Kit items always get their own entry.
    pub fn add_line(&mut self, item: CartLineItem) -> Result<String, CommerceError> {
        if item.quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(item.quantity));
        }
        if item.unit_price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: item.unit_price.currency.code().to_string(),
            });
        }

        let key = item.merge_key();
        let existing = key
            .as_ref()
            .and_then(|key| self.entries.iter_mut().find(|e| e.key.as_ref() == Some(key)));

        if let Some(existing) = existing {
            let new_quantity = existing
                .item
                .quantity
                .checked_add(item.quantity)
                .ok_or(CommerceError::Overflow)?;
            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::InvalidQuantity(new_quantity));
            }
            existing.item.quantity = new_quantity;
            existing.update_total()?;
            let id = existing.id.clone();
            self.updated_at = current_timestamp();
            return Ok(id);
        }

        if item.quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::InvalidQuantity(item.quantity));
        }

        self.line_counter += 1;
        let id = format!("{}#{}", item.source.as_str(), self.line_counter);
        self.entries.push(CartEntry::new(id.clone(), key, item)?);
        self.updated_at = current_timestamp();
        Ok(id)
    }

    /// Update an entry's quantity. A quantity <= 0 removes it.
    pub fn update_quantity(&mut self, entry_id: &str, quantity: i64) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove_item(entry_id));
        }
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == entry_id) {
            entry.item.quantity = quantity;
            entry.update_total()?;
            self.updated_at = current_timestamp();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Remove an entry.
    pub fn remove_item(&mut self, entry_id: &str) -> bool {
        let len_before = self.entries.len();
        self.entries.retain(|e| e.id != entry_id);
        let removed = self.entries.len() < len_before;
        if removed {
            self.updated_at = current_timestamp();
        }
        removed
    }

    /// Clear all entries and the store binding.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.store = None;
        self.updated_at = current_timestamp();
    }

    /// Get total unit count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.entries.iter().map(|e| e.item.quantity).sum()
    }

    /// Get number of distinct entries.
    pub fn unique_item_count(&self) -> usize {
        self.entries.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry by ID.
    pub fn get(&self, entry_id: &str) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    /// Calculate cart pricing.
    pub fn calculate_pricing(&self) -> Result<CartPricing, CommerceError> {
        let line_items = self
            .entries
            .iter()
            .map(|e| LineItemPricing {
                line_item_id: e.id.clone(),
                unit_price: e.item.unit_price,
                quantity: e.item.quantity,
                total: e.total_price,
            })
            .collect();

        let subtotal = Money::try_sum(self.entries.iter().map(|e| &e.total_price), self.currency)
            .ok_or(CommerceError::Overflow)?;

        Ok(CartPricing {
            subtotal,
            item_count: self.item_count(),
            line_items,
        })
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

impl CartSink for Cart {
    fn add_item(&mut self, store: &StoreContext, item: CartLineItem) -> Result<(), CommerceError> {
        self.set_store(store);
        self.add_line(item).map(|_| ())
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
