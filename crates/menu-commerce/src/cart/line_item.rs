//! Line items handed to the cart collaborator.

use crate::catalog::ModifierOption;
use crate::error::CommerceError;
use crate::ids::{KitId, ModifierOptionId, ProductId, StoreId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A modifier option chosen for a line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SelectedModifier {
    /// Option identifier, unique across the whole selection.
    pub option_id: ModifierOptionId,
    /// Option name (denormalized for display).
    pub name: String,
    /// Price added to the unit price.
    pub extra_price: Money,
}

impl SelectedModifier {
    /// Snapshot a catalog option.
    pub fn from_option(option: &ModifierOption) -> Self {
        Self {
            option_id: option.id.clone(),
            name: option.name.clone(),
            extra_price: option.extra_price,
        }
    }
}

/// What a line item was built from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ItemSource {
    Product(ProductId),
    Kit(KitId),
}

impl ItemSource {
    pub fn as_str(&self) -> &str {
        match self {
            ItemSource::Product(id) => id.as_str(),
            ItemSource::Kit(id) => id.as_str(),
        }
    }

    pub fn is_kit(&self) -> bool {
        matches!(self, ItemSource::Kit(_))
    }
}

/// One half of a half-and-half item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlavorShare {
    pub product_id: ProductId,
    pub product_name: String,
    /// Share of the item (0.5 for each half).
    pub fraction: f64,
    /// Base price of this flavor as a whole product.
    pub price: Money,
}

/// Units of one variety inside a kit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KitDetail {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
}

/// A finalized, priced line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineItem {
    /// Product or kit the item was built from.
    pub source: ItemSource,
    /// Display name ("Calabresa + Frango" for splits).
    pub name: String,
    /// Image URL.
    pub image_url: Option<String>,
    /// Quantity (1 for every item the configurator emits).
    pub quantity: i64,
    /// Unit price including modifiers.
    pub unit_price: Money,
    /// Chosen modifiers.
    #[serde(default)]
    pub modifiers: Vec<SelectedModifier>,
    /// Customer note ("sem cebola").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Flavor halves for split items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavors: Option<Vec<FlavorShare>>,
    /// Variety breakdown for kits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kit_details: Option<Vec<KitDetail>>,
    /// Whether the item is a half-and-half composite.
    #[serde(default)]
    pub is_split: bool,
}

impl CartLineItem {
    /// Total price (unit_price * quantity).
    pub fn total_price(&self) -> Result<Money, CommerceError> {
        self.unit_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }

    /// Identity used to merge repeated adds of the same configuration.
    ///
    /// Kits never merge and have no key.
    pub fn merge_key(&self) -> Option<MergeKey> {
        if self.source.is_kit() {
            return None;
        }

        let mut modifiers: Vec<ModifierOptionId> = self.modifiers.iter().map(|m| m.option_id.clone()).collect();
        modifiers.sort_unstable();

        Some(MergeKey {
            source: self.source.clone(),
            modifiers,
            flavors: self
                .flavors
                .iter()
                .flatten()
                .map(|f| f.product_id.clone())
                .collect(),
            notes: self.notes.clone(),
        })
    }
}

/// Product, sorted modifier ids, flavor ids and notes of a line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MergeKey {
    pub source: ItemSource,
    pub modifiers: Vec<ModifierOptionId>,
    pub flavors: Vec<ProductId>,
    pub notes: Option<String>,
}

/// The store a cart belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreContext {
    pub store_id: StoreId,
    pub slug: String,
    pub name: String,
}

impl StoreContext {
    pub fn new(store_id: impl Into<StoreId>, slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            slug: slug.into(),
            name: name.into(),
        }
    }
}

/// Receiver of committed line items.
///
/// The configurator calls `add_item` once per unit for products and once per
/// kit instance.
pub trait CartSink {
    fn add_item(&mut self, store: &StoreContext, item: CartLineItem) -> Result<(), CommerceError>;
}

impl CartSink for Vec<CartLineItem> {
    fn add_item(&mut self, _store: &StoreContext, item: CartLineItem) -> Result<(), CommerceError> {
        self.push(item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn modifier(id: &str) -> SelectedModifier {
        SelectedModifier {
            option_id: ModifierOptionId::new(id),
            name: id.to_string(),
            extra_price: Money::new(100, Currency::BRL),
        }
    }

    fn item(modifiers: Vec<SelectedModifier>) -> CartLineItem {
        CartLineItem {
            source: ItemSource::Product(ProductId::new("acai-500")),
            name: "Açaí 500ml".to_string(),
            image_url: None,
            quantity: 1,
            unit_price: Money::new(1800, Currency::BRL),
            modifiers,
            notes: None,
            flavors: None,
            kit_details: None,
            is_split: false,
        }
    }

    #[test]
    fn test_merge_key_ignores_modifier_order() {
        let a = item(vec![modifier("granola"), modifier("banana")]);
        let b = item(vec![modifier("banana"), modifier("granola")]);
        assert_eq!(a.merge_key(), b.merge_key());

        let key = a.merge_key().unwrap();
        let ids: Vec<&str> = key.modifiers.iter().map(|m| m.as_str()).collect();
        assert_eq!(ids, vec!["banana", "granola"]);
    }

    #[test]
    fn test_merge_key_keeps_ids_apart() {
        let joined = item(vec![modifier("a-b")]);
        let separate = item(vec![modifier("a"), modifier("b")]);
        assert_ne!(joined.merge_key(), separate.merge_key());

        let mut hashed_note = item(vec![]);
        hashed_note.notes = Some("b#c".to_string());
        let mut plain_note = item(vec![]);
        plain_note.source = ItemSource::Product(ProductId::new("acai-500#b"));
        plain_note.notes = Some("c".to_string());
        assert_ne!(hashed_note.merge_key(), plain_note.merge_key());
    }

    #[test]
    fn test_kits_have_no_merge_key() {
        let mut kit = item(vec![]);
        kit.source = ItemSource::Kit(KitId::new("caixa-10"));
        assert!(kit.merge_key().is_none());
    }

    #[test]
    fn test_merge_key_includes_notes() {
        let plain = item(vec![]);
        let mut noted = item(vec![]);
        noted.notes = Some("sem leite".to_string());
        assert_ne!(plain.merge_key(), noted.merge_key());
    }

    #[test]
    fn test_source_serializes_tagged() {
        let json = serde_json::to_value(ItemSource::Kit(KitId::new("kit-1"))).unwrap();
        assert_eq!(json, serde_json::json!({"type": "kit", "id": "kit-1"}));
    }
}
