//! Steps command - show how a product is presented.

use anyhow::{Context as _, Result};
use menu_commerce::ProductId;
use menu_configurator::wizard::{is_wizard, plan_steps, Step};
use menu_configurator::CatalogSource;
use serde::Serialize;

use super::StepsArgs;
use crate::context::Context;

#[derive(Serialize)]
struct StepsReport {
    product: String,
    wizard: bool,
    steps: Vec<Step>,
}

/// Run the steps command.
pub async fn run(args: StepsArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog(&args.catalog)?;
    let product = catalog
        .product_with_modifiers(&ProductId::new(args.product.as_str()))
        .await
        .context("Failed to load product")?
        .normalized();
    product.validate().context("Product has invalid modifier groups")?;

    let wizard = is_wizard(&product.modifier_groups);
    let steps = plan_steps(&product.modifier_groups);

    if ctx.output.is_json() {
        ctx.output.json(&StepsReport {
            product: product.id.to_string(),
            wizard,
            steps,
        });
        return Ok(());
    }

    ctx.output.header(&format!("{} ({})", product.name, product.base_price));
    ctx.output.kv("Layout", if wizard { "step by step" } else { "all at once" });

    let total = steps.len();
    for (i, step) in steps.iter().enumerate() {
        let label = match step {
            Step::RequiredStep { .. } => "required",
            Step::OptionalTail { .. } => "optional",
            Step::FlatGroup { .. } => "group",
        };
        ctx.output.step(i + 1, total, label);

        for group_id in step.group_ids() {
            let Some(group) = product.modifier_groups.iter().find(|g| &g.id == group_id) else {
                continue;
            };
            ctx.output.list_item(&format!(
                "{} (min {}, max {}, {} options)",
                group.name,
                group.min_quantity,
                group.max_quantity,
                group.options.len()
            ));
        }
    }

    Ok(())
}
