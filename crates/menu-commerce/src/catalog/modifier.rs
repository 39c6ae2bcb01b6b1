//! Modifier groups and options (e.g., "Frutas": Granola +R$2, Banana +R$1).

use crate::error::CommerceError;
use crate::ids::{ModifierGroupId, ModifierOptionId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

fn default_active() -> bool {
    true
}

/// A selectable option inside a modifier group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierOption {
    /// Unique option identifier.
    pub id: ModifierOptionId,
    /// Display name.
    pub name: String,
    /// Price added to the unit price when selected.
    pub extra_price: Money,
    /// Inactive options are dropped when the product is normalized.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Sort order position within the group.
    #[serde(default)]
    pub sort_order: i32,
}

impl ModifierOption {
    /// Create a new active option.
    pub fn new(
        id: impl Into<ModifierOptionId>,
        name: impl Into<String>,
        extra_price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra_price,
            active: true,
            sort_order: 0,
        }
    }
}

/// A named set of options with selection bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierGroup {
    /// Unique group identifier.
    pub id: ModifierGroupId,
    /// Group name (e.g., "Tamanho", "Caldas").
    pub name: String,
    /// Whether a final selection must reach `min_quantity`.
    pub required: bool,
    /// Minimum options to choose when required.
    pub min_quantity: u32,
    /// Maximum options that can be chosen.
    pub max_quantity: u32,
    /// Sort order position within the product.
    #[serde(default)]
    pub sort_order: i32,
    /// Options in display order.
    pub options: Vec<ModifierOption>,
}

impl ModifierGroup {
    /// Create an empty group with the given bounds.
    pub fn new(
        id: impl Into<ModifierGroupId>,
        name: impl Into<String>,
        min_quantity: u32,
        max_quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            required: false,
            min_quantity,
            max_quantity,
            sort_order: 0,
            options: Vec::new(),
        }
    }

    /// Mark the group as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Append an option.
    pub fn with_option(mut self, option: ModifierOption) -> Self {
        self.options.push(option);
        self
    }

    /// Whether picking a new option replaces the current one.
    pub fn is_single_choice(&self) -> bool {
        self.max_quantity == 1
    }

    /// Look up an option by ID.
    pub fn option(&self, option_id: &ModifierOptionId) -> Option<&ModifierOption> {
        self.options.iter().find(|o| &o.id == option_id)
    }

    /// Check whether the option belongs to this group.
    pub fn contains_option(&self, option_id: &ModifierOptionId) -> bool {
        self.options.iter().any(|o| &o.id == option_id)
    }

    /// Sort options by position and drop inactive ones.
    ///
    /// When options were dropped, the bounds shrink to what is still available.
    pub fn normalize(&mut self) {
        let listed = self.options.len();
        self.options.retain(|o| o.active);
        self.options.sort_by_key(|o| o.sort_order);

        if self.options.len() < listed {
            let available = self.options.len() as u32;
            self.max_quantity = self.max_quantity.min(available);
            self.min_quantity = self.min_quantity.min(self.max_quantity);
        }
    }

    /// Check the `min <= max <= |options|` bounds.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let invalid = |reason: String| CommerceError::InvalidCatalog {
            entity: format!("modifier group {}", self.id),
            reason,
        };

        if self.max_quantity == 0 {
            return Err(invalid("max_quantity must be at least 1".to_string()));
        }
        if self.min_quantity > self.max_quantity {
            return Err(invalid(format!(
                "min_quantity {} exceeds max_quantity {}",
                self.min_quantity, self.max_quantity
            )));
        }
        if self.max_quantity as usize > self.options.len() {
            return Err(invalid(format!(
                "max_quantity {} exceeds {} available options",
                self.max_quantity,
                self.options.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn option(id: &str, sort_order: i32, active: bool) -> ModifierOption {
        let mut option = ModifierOption::new(id, id.to_uppercase(), Money::zero(Currency::BRL));
        option.sort_order = sort_order;
        option.active = active;
        option
    }

    #[test]
    fn test_normalize_sorts_and_drops_inactive() {
        let mut group = ModifierGroup::new("frutas", "Frutas", 0, 2)
            .with_option(option("morango", 2, true))
            .with_option(option("kiwi", 0, false))
            .with_option(option("banana", 1, true));
        group.normalize();

        let ids: Vec<&str> = group.options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["banana", "morango"]);
    }

    #[test]
    fn test_normalize_clamps_bounds_to_active_options() {
        let mut group = ModifierGroup::new("adicionais", "Adicionais", 0, 2)
            .with_option(option("granola", 0, true))
            .with_option(option("pacoca", 1, false));
        group.normalize();

        assert_eq!(group.max_quantity, 1);
        assert!(group.validate().is_ok());

        let mut required = ModifierGroup::new("frutas", "Frutas", 2, 3)
            .required()
            .with_option(option("banana", 0, true))
            .with_option(option("kiwi", 1, false))
            .with_option(option("morango", 2, false));
        required.normalize();

        assert_eq!((required.min_quantity, required.max_quantity), (1, 1));
        assert!(required.validate().is_ok());
    }

    #[test]
    fn test_normalize_keeps_bounds_when_nothing_dropped() {
        let mut group = ModifierGroup::new("g", "G", 0, 3).with_option(option("a", 0, true));
        group.normalize();
        assert_eq!(group.max_quantity, 3);
        assert!(group.validate().is_err());
    }

    #[test]
    fn test_validate_bounds() {
        let group = ModifierGroup::new("g", "G", 0, 1).with_option(option("a", 0, true));
        assert!(group.validate().is_ok());

        let inverted = ModifierGroup::new("g", "G", 2, 1).with_option(option("a", 0, true));
        assert!(inverted.validate().is_err());

        let too_wide = ModifierGroup::new("g", "G", 0, 3).with_option(option("a", 0, true));
        assert!(too_wide.validate().is_err());

        let empty = ModifierGroup::new("g", "G", 0, 0);
        assert!(empty.validate().is_err());
    }
}
