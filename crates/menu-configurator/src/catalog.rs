//! Catalog collaborator.
//!
//! The engine never talks to storage directly. It asks a [`CatalogSource`]
//! for a product with its modifier groups, or for a kit definition.

use std::path::Path;

use async_trait::async_trait;
use menu_commerce::catalog::{KitDefinition, ProductWithModifiers, SimpleProduct};
use menu_commerce::{CommerceError, KitId, ProductId};
use serde::{Deserialize, Serialize};

/// Source of catalog data.
///
/// Implementations may return groups and options in any order and may
/// include inactive options; the session normalizes what it receives.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch a product with its modifier groups.
    async fn product_with_modifiers(&self, product_id: &ProductId) -> Result<ProductWithModifiers, CommerceError>;

    /// Fetch a kit definition.
    async fn kit(&self, kit_id: &KitId) -> Result<KitDefinition, CommerceError>;
}

/// Catalog held in memory, loadable from a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    #[serde(default)]
    pub products: Vec<ProductWithModifiers>,
    #[serde(default)]
    pub kits: Vec<KitDefinition>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, product: ProductWithModifiers) -> Self {
        self.products.push(product);
        self
    }

    pub fn with_kit(mut self, kit: KitDefinition) -> Self {
        self.kits.push(kit);
        self
    }

    /// Parse a catalog document.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CommerceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CommerceError::CatalogUnavailable(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Other products in the same category, as second-flavor candidates.
    pub fn siblings_of(&self, product_id: &ProductId) -> Vec<SimpleProduct> {
        let Some(product) = self.products.iter().find(|p| &p.id == product_id) else {
            return Vec::new();
        };
        self.products
            .iter()
            .filter(|p| &p.id != product_id && p.category_name == product.category_name)
            .map(ProductWithModifiers::to_simple)
            .collect()
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn product_with_modifiers(&self, product_id: &ProductId) -> Result<ProductWithModifiers, CommerceError> {
        self.products
            .iter()
            .find(|p| &p.id == product_id)
            .cloned()
            .ok_or_else(|| CommerceError::ProductNotFound(product_id.to_string()))
    }

    async fn kit(&self, kit_id: &KitId) -> Result<KitDefinition, CommerceError> {
        self.kits
            .iter()
            .find(|k| &k.id == kit_id)
            .cloned()
            .ok_or_else(|| CommerceError::KitNotFound(kit_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use menu_commerce::{Currency, Money};

    const CATALOG: &str = r#"{
        "products": [
            {
                "id": "calabresa",
                "name": "Calabresa",
                "base_price": {"amount_cents": 2000, "currency": "BRL"},
                "category_name": "Pizzas",
                "modifier_groups": [
                    {
                        "id": "borda",
                        "name": "Borda",
                        "required": false,
                        "min_quantity": 0,
                        "max_quantity": 1,
                        "options": [
                            {"id": "catupiry", "name": "Catupiry", "extra_price": {"amount_cents": 250, "currency": "BRL"}}
                        ]
                    }
                ]
            },
            {
                "id": "marguerita",
                "name": "Marguerita",
                "base_price": {"amount_cents": 3000, "currency": "BRL"},
                "category_name": "Pizzas",
                "modifier_groups": []
            },
            {
                "id": "guarana",
                "name": "Guaraná",
                "base_price": {"amount_cents": 600, "currency": "BRL"},
                "category_name": "Bebidas",
                "modifier_groups": []
            }
        ],
        "kits": [
            {
                "id": "caixa-25",
                "name": "Caixa com 25 doces",
                "base_price": {"amount_cents": 6000, "currency": "BRL"},
                "base_quantity": 25,
                "min_varieties": 1,
                "max_varieties": 5,
                "min_per_variety": 5,
                "items": [{"product_id": "brigadeiro", "name": "Brigadeiro", "default_quantity": 10}]
            }
        ]
    }"#;

    #[test]
    fn test_parse_catalog_document() {
        let catalog = InMemoryCatalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.products.len(), 3);
        assert!(catalog.products[0].modifier_groups[0].options[0].active);
        assert_eq!(catalog.kits[0].items[0].default_quantity, 10);
    }

    #[test]
    fn test_fetch_product_and_kit() {
        let catalog = InMemoryCatalog::from_json(CATALOG).unwrap();

        let product = block_on(catalog.product_with_modifiers(&ProductId::new("marguerita"))).unwrap();
        assert_eq!(product.base_price, Money::new(3000, Currency::BRL));

        let kit = block_on(catalog.kit(&KitId::new("caixa-25"))).unwrap();
        assert_eq!(kit.base_quantity, 25);
    }

    #[test]
    fn test_missing_entries() {
        let catalog = InMemoryCatalog::new();
        let result = block_on(catalog.product_with_modifiers(&ProductId::new("x")));
        assert_eq!(result, Err(CommerceError::ProductNotFound("x".to_string())));

        let result = block_on(catalog.kit(&KitId::new("y")));
        assert_eq!(result, Err(CommerceError::KitNotFound("y".to_string())));
    }

    #[test]
    fn test_siblings_share_category() {
        let catalog = InMemoryCatalog::from_json(CATALOG).unwrap();
        let siblings = catalog.siblings_of(&ProductId::new("calabresa"));
        assert_eq!(siblings.len(), 1);
        assert_eq!(siblings[0].id.as_str(), "marguerita");

        assert!(catalog.siblings_of(&ProductId::new("unknown")).is_empty());
    }
}
