//! Unit price computation and line-item emission.

use menu_commerce::cart::{CartLineItem, CartSink, ItemSource, StoreContext};
use menu_commerce::{CommerceError, Money};
use serde::Serialize;

use crate::split::compose;
use crate::state::{ConfigurationState, ProductContext};

/// Price of the current configuration.
///
/// `unit_price = base + modifiers_total` and `total = unit_price * quantity`,
/// where `base` is the split average when a second flavor is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub base: Money,
    pub modifiers_total: Money,
    pub unit_price: Money,
    pub quantity: u32,
    pub total: Money,
}

impl PriceBreakdown {
    pub fn compute(ctx: &ProductContext, state: &ConfigurationState) -> Result<Self, CommerceError> {
        let currency = ctx.product.base_price.currency;

        let base = match state.split.second_flavor() {
            Some(second) => compose(&ctx.product, second)?.base_price,
            None => ctx.product.base_price,
        };
        let modifiers_total = state
            .selection
            .extras_total(currency)
            .ok_or(CommerceError::Overflow)?;
        let unit_price = base.try_add(&modifiers_total).ok_or(CommerceError::Overflow)?;
        let total = unit_price
            .try_multiply(i64::from(state.quantity))
            .ok_or(CommerceError::Overflow)?;

        Ok(Self {
            base,
            modifiers_total,
            unit_price,
            quantity: state.quantity,
            total,
        })
    }
}

/// The single-unit line item the configuration commits as.
pub fn build_line_item(ctx: &ProductContext, state: &ConfigurationState) -> Result<CartLineItem, CommerceError> {
    let pricing = PriceBreakdown::compute(ctx, state)?;
    let product = &ctx.product;

    let (name, flavors) = match state.split.second_flavor() {
        Some(second) => {
            let composite = compose(product, second)?;
            (composite.name, Some(composite.flavors))
        }
        None => (product.name.clone(), None),
    };

    Ok(CartLineItem {
        source: ItemSource::Product(product.id.clone()),
        name,
        image_url: product.image_url.clone(),
        quantity: 1,
        unit_price: pricing.unit_price,
        modifiers: state.selection.to_modifiers(),
        notes: state.notes.clone(),
        is_split: flavors.is_some(),
        flavors,
        kit_details: None,
    })
}

/// Send `units` copies of `item` to the cart, one call each.
///
/// Stops at the first failing call. A failure on the first unit returns the
/// sink's error unchanged; a later one returns [`CommerceError::PartialCommit`].
pub fn emit_units<S>(sink: &mut S, store: &StoreContext, item: &CartLineItem, units: u32) -> Result<u32, CommerceError>
where
    S: CartSink + ?Sized,
{
    for committed in 0..units {
        if let Err(e) = sink.add_item(store, item.clone()) {
            return Err(match committed {
                0 => e,
                _ => CommerceError::PartialCommit {
                    committed,
                    requested: units,
                    reason: e.to_string(),
                },
            });
        }
    }
    Ok(units)
}
