//! Cart module.
//!
//! Line items produced by the configurator, the `CartSink` collaborator
//! boundary, and an in-memory cart implementation.

mod cart;
mod line_item;
mod pricing;

pub use cart::{Cart, CartEntry, MAX_QUANTITY_PER_ITEM};
pub use line_item::{
    CartLineItem, CartSink, FlavorShare, ItemSource, KitDetail, MergeKey, SelectedModifier,
    StoreContext,
};
pub use pricing::{CartPricing, LineItemPricing};
