//! Quote command - replay an action script and print the cart.

use anyhow::{bail, Context as _, Result};
use menu_commerce::cart::{Cart, CartPricing};
use menu_commerce::ProductId;
use menu_configurator::prelude::*;
use serde::{Deserialize, Serialize};

use super::QuoteArgs;
use crate::context::Context;
use crate::output::outcome_badge;

/// A scripted configuration session.
#[derive(Deserialize)]
struct Script {
    product: ProductId,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    actions: Vec<Action>,
}

#[derive(Serialize)]
struct QuoteReport {
    outcomes: Vec<Outcome>,
    commit: CommitOutcome,
    cart: CartPricing,
}

/// Run the quote command.
pub async fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog(&args.catalog)?;

    let script_path = ctx.resolve_path(&args.script);
    let content = std::fs::read_to_string(&script_path)
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;
    let script: Script = serde_json::from_str(&content).context("Failed to parse script")?;

    let mut request = OpenRequest::new(script.product.clone()).with_siblings(catalog.siblings_of(&script.product));
    if let Some(category) = script.category {
        request = request.in_category(category);
    }

    let mut configurator = Configurator::new(catalog, ctx.config.clone(), ctx.store.clone());
    match configurator.open_and_load(request).await {
        Some(SessionPhase::Ready(_)) => {}
        Some(SessionPhase::Unavailable(e)) => bail!("Product unavailable: {}", e),
        _ => bail!("Product did not load"),
    }

    ctx.output.header(&format!("Quote for {}", script.product));
    let mut outcomes = Vec::with_capacity(script.actions.len());
    for action in &script.actions {
        let outcome = configurator.apply(action);
        ctx.output.debug(&format!("{:?}", action));
        ctx.output.list_item(&format!("{} {}", action_label(action), outcome_badge(&outcome)));
        outcomes.push(outcome);
    }

    if let Some(session) = configurator.product_session() {
        let price = session.price()?;
        ctx.output.kv("Base", &price.base.display());
        ctx.output.kv("Modifiers", &price.modifiers_total.display());
        ctx.output.kv("Unit price", &price.unit_price.display());
        ctx.output.kv("Quantity", &price.quantity.to_string());
        ctx.output.kv("Total", &price.total.display());
    }

    let mut cart = Cart::new(ctx.config.currency);
    let commit = configurator.commit(&mut cart)?;
    let pricing = cart.calculate_pricing()?;

    if ctx.output.is_json() {
        ctx.output.json(&QuoteReport {
            outcomes,
            commit,
            cart: pricing,
        });
        return Ok(());
    }

    match &commit {
        CommitOutcome::Committed { units, .. } => {
            ctx.output.success(&format!("Added {} unit(s) to the cart", units));
            for entry in &cart.entries {
                ctx.output.list_item(&format!(
                    "{} x{} @ {}",
                    entry.item.name, entry.item.quantity, entry.item.unit_price
                ));
            }
            ctx.output.kv("Subtotal", &pricing.subtotal.display());
        }
        CommitOutcome::Blocked { blockers } => {
            ctx.output.blockers(blockers);
            bail!("Configuration incomplete");
        }
    }

    Ok(())
}

fn action_label(action: &Action) -> String {
    match action {
        Action::ToggleOption { option_id } => format!("toggle {}", option_id),
        Action::NextStep => "next step".to_string(),
        Action::PreviousStep => "previous step".to_string(),
        Action::StartSplit => "start half-and-half".to_string(),
        Action::PickSecondFlavor { product_id } => format!("second flavor {}", product_id),
        Action::RemoveSecondFlavor => "remove second flavor".to_string(),
        Action::IncrementQuantity => "quantity +1".to_string(),
        Action::DecrementQuantity => "quantity -1".to_string(),
        Action::SetQuantity { quantity } => format!("quantity = {}", quantity),
        Action::SetNotes { notes } => format!("notes \"{}\"", notes),
    }
}
