//! Kit definitions (fixed-total mixed boxes, e.g. "Caixa com 25 doces").

use crate::error::CommerceError;
use crate::ids::{KitId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A variety that can go into a kit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KitItem {
    /// Product this variety refers to.
    pub product_id: ProductId,
    /// Product name (denormalized for kit details).
    pub name: String,
    /// Quantity pre-filled when the kit builder opens.
    #[serde(default)]
    pub default_quantity: u32,
    /// Advertised per-variety limit. Not enforced by the assembler.
    #[serde(default)]
    pub max_quantity: u32,
}

impl KitItem {
    pub fn new(product_id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            default_quantity: 0,
            max_quantity: 0,
        }
    }

    /// Set the pre-filled quantity.
    pub fn with_default(mut self, quantity: u32) -> Self {
        self.default_quantity = quantity;
        self
    }
}

/// A kit: a flat-priced box filled with an exact number of units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KitDefinition {
    /// Unique kit identifier.
    pub id: KitId,
    /// Kit name.
    pub name: String,
    /// Kit description.
    #[serde(default)]
    pub description: Option<String>,
    /// Flat price, independent of the variety mix.
    pub base_price: Money,
    /// Image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Exact number of units a committed kit holds.
    pub base_quantity: u32,
    /// Minimum distinct varieties (informational).
    #[serde(default)]
    pub min_varieties: u32,
    /// Maximum distinct varieties (informational).
    #[serde(default)]
    pub max_varieties: u32,
    /// Increment used when adding or removing units of a variety.
    pub min_per_variety: u32,
    /// Varieties in display order.
    #[serde(default)]
    pub items: Vec<KitItem>,
}

impl KitDefinition {
    /// Create a kit with no items.
    pub fn new(
        id: impl Into<KitId>,
        name: impl Into<String>,
        base_price: Money,
        base_quantity: u32,
        min_per_variety: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            base_price,
            image_url: None,
            base_quantity,
            min_varieties: 0,
            max_varieties: 0,
            min_per_variety,
            items: Vec::new(),
        }
    }

    /// Append a variety.
    pub fn with_item(mut self, item: KitItem) -> Self {
        self.items.push(item);
        self
    }

    /// Increment applied per add/remove. A zero increment is treated as one.
    pub fn step(&self) -> u32 {
        self.min_per_variety.max(1)
    }

    /// Check basic kit invariants.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let invalid = |reason: &str| CommerceError::InvalidCatalog {
            entity: format!("kit {}", self.id),
            reason: reason.to_string(),
        };

        if self.base_quantity == 0 {
            return Err(invalid("base_quantity must be positive"));
        }
        if self.items.is_empty() {
            return Err(invalid("kit has no items"));
        }
        for (i, item) in self.items.iter().enumerate() {
            if self.items[..i].iter().any(|o| o.product_id == item.product_id) {
                return Err(invalid("duplicate product in kit"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn kit() -> KitDefinition {
        KitDefinition::new("kit-25", "Caixa 25 doces", Money::new(6000, Currency::BRL), 25, 5)
            .with_item(KitItem::new("brigadeiro", "Brigadeiro").with_default(10))
            .with_item(KitItem::new("beijinho", "Beijinho"))
    }

    #[test]
    fn test_step_never_zero() {
        let mut kit = kit();
        assert_eq!(kit.step(), 5);
        kit.min_per_variety = 0;
        assert_eq!(kit.step(), 1);
    }

    #[test]
    fn test_validate() {
        assert!(kit().validate().is_ok());

        let dup = kit().with_item(KitItem::new("beijinho", "Beijinho"));
        assert!(dup.validate().is_err());

        let empty = KitDefinition::new("k", "K", Money::new(1, Currency::BRL), 10, 1);
        assert!(empty.validate().is_err());
    }
}
