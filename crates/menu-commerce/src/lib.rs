//! Storefront menu domain types.
//!
//! This crate provides the data the product configurator works on:
//!
//! - **Money**: cents-based prices with currency
//! - **Catalog**: products with modifier groups, sibling products, kits
//! - **Cart**: finalized line items, the `CartSink` boundary and an in-memory cart
//!
//! # Example
//!
//! ```rust
//! use menu_commerce::prelude::*;
//!
//! let product = ProductWithModifiers::new("acai-500", "Açaí 500ml", Money::new(1800, Currency::BRL))
//!     .with_group(
//!         ModifierGroup::new("frutas", "Frutas", 0, 2)
//!             .with_option(ModifierOption::new("banana", "Banana", Money::new(200, Currency::BRL)))
//!             .with_option(ModifierOption::new("morango", "Morango", Money::new(300, Currency::BRL))),
//!     );
//!
//! assert!(product.validate().is_ok());
//! assert_eq!(product.optional_groups().count(), 1);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        KitDefinition, KitItem, ModifierGroup, ModifierOption, ProductWithModifiers,
        SimpleProduct,
    };

    // Cart
    pub use crate::cart::{
        Cart, CartEntry, CartLineItem, CartPricing, CartSink, FlavorShare, ItemSource, KitDetail,
        LineItemPricing, MergeKey, SelectedModifier, StoreContext,
    };
}
