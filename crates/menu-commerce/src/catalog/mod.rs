//! Menu catalog module.
//!
//! Read-only product data: modifier groups, sibling products and kits.

mod kit;
mod modifier;
mod product;

pub use kit::{KitDefinition, KitItem};
pub use modifier::{ModifierGroup, ModifierOption};
pub use product::{ProductWithModifiers, SimpleProduct};
