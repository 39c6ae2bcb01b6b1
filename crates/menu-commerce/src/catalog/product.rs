//! Products as delivered by the catalog collaborator.

use crate::catalog::ModifierGroup;
use crate::error::CommerceError;
use crate::ids::{ModifierOptionId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A product together with its modifier groups, loaded once per configuration session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductWithModifiers {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Description shown above the groups.
    #[serde(default)]
    pub description: Option<String>,
    /// Price before modifiers.
    pub base_price: Money,
    /// Image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Name of the category the product is listed under.
    #[serde(default)]
    pub category_name: Option<String>,
    /// Modifier groups in catalog order.
    #[serde(default)]
    pub modifier_groups: Vec<ModifierGroup>,
}

impl ProductWithModifiers {
    /// Create a product with no modifier groups.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, base_price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            base_price,
            image_url: None,
            category_name: None,
            modifier_groups: Vec::new(),
        }
    }

    /// Set the category name.
    pub fn in_category(mut self, category_name: impl Into<String>) -> Self {
        self.category_name = Some(category_name.into());
        self
    }

    /// Append a modifier group.
    pub fn with_group(mut self, group: ModifierGroup) -> Self {
        self.modifier_groups.push(group);
        self
    }

    /// Groups that must be satisfied before commit.
    pub fn required_groups(&self) -> impl Iterator<Item = &ModifierGroup> {
        self.modifier_groups.iter().filter(|g| g.required)
    }

    /// Groups that may be left empty.
    pub fn optional_groups(&self) -> impl Iterator<Item = &ModifierGroup> {
        self.modifier_groups.iter().filter(|g| !g.required)
    }

    /// Find the group owning an option.
    pub fn group_of_option(&self, option_id: &ModifierOptionId) -> Option<&ModifierGroup> {
        self.modifier_groups
            .iter()
            .find(|g| g.contains_option(option_id))
    }

    /// Sort groups by position and normalize each group's options.
    ///
    /// Groups left with no options after dropping inactive ones are removed.
    pub fn normalized(mut self) -> Self {
        self.modifier_groups.sort_by_key(|g| g.sort_order);
        self.modifier_groups.retain_mut(|group| {
            let listed = !group.options.is_empty();
            group.normalize();
            !(listed && group.options.is_empty())
        });
        self
    }

    /// Validate every group's bounds and that each option belongs to one group.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let mut seen = HashSet::new();
        for group in &self.modifier_groups {
            group.validate()?;
            for option in &group.options {
                if !seen.insert(&option.id) {
                    return Err(CommerceError::InvalidCatalog {
                        entity: format!("product {}", self.id),
                        reason: format!("option {} is listed more than once", option.id),
                    });
                }
            }
        }
        if self.base_price.is_negative() {
            return Err(CommerceError::InvalidCatalog {
                entity: format!("product {}", self.id),
                reason: "base_price is negative".to_string(),
            });
        }
        Ok(())
    }

    /// The sibling view used when this product is offered as a second flavor.
    pub fn to_simple(&self) -> SimpleProduct {
        SimpleProduct {
            id: self.id.clone(),
            name: self.name.clone(),
            base_price: self.base_price,
            image_url: self.image_url.clone(),
        }
    }
}

/// A sibling product listed in the same category, used for flavor splits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimpleProduct {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Price before modifiers.
    pub base_price: Money,
    /// Image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl SimpleProduct {
    /// Create a sibling product.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, base_price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_price,
            image_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModifierOption;
    use crate::money::Currency;

    fn brl(cents: i64) -> Money {
        Money::new(cents, Currency::BRL)
    }

    fn sample() -> ProductWithModifiers {
        let mut extras = ModifierGroup::new("extras", "Extras", 0, 1)
            .with_option(ModifierOption::new("bacon", "Bacon", brl(300)));
        extras.sort_order = 2;
        let mut size = ModifierGroup::new("size", "Tamanho", 1, 1)
            .required()
            .with_option(ModifierOption::new("p", "Pequeno", brl(0)));
        size.sort_order = 1;

        ProductWithModifiers::new("burger", "X-Burger", brl(2500))
            .with_group(extras)
            .with_group(size)
    }

    #[test]
    fn test_normalized_orders_groups() {
        let product = sample().normalized();
        let ids: Vec<&str> = product.modifier_groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["size", "extras"]);
    }

    #[test]
    fn test_required_and_optional_partition() {
        let product = sample();
        assert_eq!(product.required_groups().count(), 1);
        assert_eq!(product.optional_groups().count(), 1);
    }

    #[test]
    fn test_group_of_option() {
        let product = sample();
        let group = product.group_of_option(&ModifierOptionId::new("bacon")).unwrap();
        assert_eq!(group.id.as_str(), "extras");
        assert!(product.group_of_option(&ModifierOptionId::new("nope")).is_none());
    }

    #[test]
    fn test_normalized_drops_groups_emptied_by_inactive_options() {
        let mut sold_out = ModifierOption::new("kiwi", "Kiwi", brl(100));
        sold_out.active = false;
        let product = sample()
            .with_group(ModifierGroup::new("frutas", "Frutas", 1, 1).required().with_option(sold_out))
            .normalized();

        assert!(product.modifier_groups.iter().all(|g| g.id.as_str() != "frutas"));
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_option_shared_between_groups() {
        let product = ProductWithModifiers::new("x", "X", brl(1000))
            .with_group(
                ModifierGroup::new("g1", "G1", 1, 1)
                    .required()
                    .with_option(ModifierOption::new("x", "X", brl(0)))
                    .with_option(ModifierOption::new("y", "Y", brl(0))),
            )
            .with_group(
                ModifierGroup::new("g2", "G2", 1, 1)
                    .required()
                    .with_option(ModifierOption::new("x", "X", brl(0)))
                    .with_option(ModifierOption::new("z", "Z", brl(0))),
            );

        assert!(matches!(
            product.validate(),
            Err(CommerceError::InvalidCatalog { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let product = ProductWithModifiers::new("x", "X", brl(-1));
        assert!(product.validate().is_err());
        assert!(sample().validate().is_ok());
    }
}
