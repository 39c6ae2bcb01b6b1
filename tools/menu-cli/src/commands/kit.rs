//! Kit command - fill a kit and commit it.

use anyhow::{anyhow, bail, Context as _, Result};
use menu_commerce::cart::Cart;
use menu_commerce::{KitId, ProductId};
use menu_configurator::prelude::*;
use serde::Serialize;

use super::KitArgs;
use crate::context::Context;
use crate::output::outcome_badge;

#[derive(Serialize)]
struct KitReport {
    total: u32,
    remaining: i64,
    varieties: usize,
    commit: CommitOutcome,
}

/// Run the kit command.
pub async fn run(args: KitArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog(&args.catalog)?;
    let actions = args
        .changes
        .iter()
        .map(|c| parse_change(c))
        .collect::<Result<Vec<_>>>()?;

    let configurator = Configurator::new(catalog, ctx.config.clone(), ctx.store.clone());
    let mut assembler = configurator
        .open_kit(&KitId::new(args.kit.as_str()))
        .await
        .context("Failed to open kit")?;

    let definition = assembler.definition().clone();
    ctx.output.header(&format!(
        "{} ({} units, {})",
        definition.name, definition.base_quantity, definition.base_price
    ));

    for (change, action) in args.changes.iter().zip(&actions) {
        let outcome = assembler.apply(action);
        ctx.output.list_item(&format!("{} {}", change, outcome_badge(&outcome)));
    }

    let state = assembler.state().clone();
    for item in &definition.items {
        ctx.output.kv(&item.name, &state.count_of(&item.product_id).to_string());
    }

    let mut cart = Cart::new(ctx.config.currency);
    let commit = assembler.commit(&mut cart, configurator.store())?;

    if ctx.output.is_json() {
        ctx.output.json(&KitReport {
            total: state.total(),
            remaining: state.remaining(&definition),
            varieties: state.variety_count(),
            commit,
        });
        return Ok(());
    }

    match &commit {
        CommitOutcome::Committed { unit_price, .. } => {
            ctx.output.success(&format!("Kit added to the cart for {}", unit_price));
        }
        CommitOutcome::Blocked { blockers } => {
            ctx.output.blockers(blockers);
            let remaining = state.remaining(&definition);
            if remaining > 0 {
                ctx.output.info(&format!("Add {} more unit(s)", remaining));
            } else {
                ctx.output.info(&format!("Remove {} unit(s)", -remaining));
            }
            bail!("Kit incomplete");
        }
    }

    Ok(())
}

/// Parse `product+` / `product-`.
fn parse_change(change: &str) -> Result<KitAction> {
    if let Some(product) = change.strip_suffix('+') {
        return Ok(KitAction::Increment(ProductId::new(product)));
    }
    if let Some(product) = change.strip_suffix('-') {
        return Ok(KitAction::Decrement(ProductId::new(product)));
    }
    Err(anyhow!("Invalid change '{}': expected PRODUCT+ or PRODUCT-", change))
}
