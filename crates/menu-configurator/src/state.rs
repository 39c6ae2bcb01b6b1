//! Configuration state and its reducer.
//!
//! `ConfigurationState::reduce` is the only way the state changes. It never
//! mutates in place; it returns the next state together with an [`Outcome`]
//! saying whether the action was applied.

use menu_commerce::catalog::{ModifierGroup, ProductWithModifiers, SimpleProduct};
use menu_commerce::{ModifierOptionId, ProductId};
use serde::{Deserialize, Serialize};

use crate::outcome::{Blocker, IgnoreReason, Outcome};
use crate::selection::Selection;
use crate::split::SplitState;
use crate::validator::{toggle, unsatisfied_groups};
use crate::wizard::{Step, WizardCursor};

/// Everything fixed for the lifetime of a product session.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductContext {
    /// Normalized product.
    pub product: ProductWithModifiers,
    /// Candidate second flavors (never the product itself).
    pub siblings: Vec<SimpleProduct>,
    /// Whether the product's category offers half-and-half.
    pub split_allowed: bool,
    /// Upper bound for the quantity stepper.
    pub max_quantity: u32,
}

impl ProductContext {
    pub fn new(
        product: ProductWithModifiers,
        siblings: Vec<SimpleProduct>,
        split_allowed: bool,
        max_quantity: u32,
    ) -> Self {
        let siblings = siblings.into_iter().filter(|s| s.id != product.id).collect();
        Self {
            product,
            siblings,
            split_allowed,
            max_quantity: max_quantity.max(1),
        }
    }

    pub fn sibling(&self, product_id: &ProductId) -> Option<&SimpleProduct> {
        self.siblings.iter().find(|s| &s.id == product_id)
    }
}

/// A user intent against a product session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    ToggleOption { option_id: ModifierOptionId },
    NextStep,
    PreviousStep,
    StartSplit,
    PickSecondFlavor { product_id: ProductId },
    RemoveSecondFlavor,
    IncrementQuantity,
    DecrementQuantity,
    SetQuantity { quantity: u32 },
    SetNotes { notes: String },
}

/// Mutable part of a product session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationState {
    pub selection: Selection,
    /// Present only for products configured step by step.
    pub wizard: Option<WizardCursor>,
    pub split: SplitState,
    /// Number of identical units to add, at least 1.
    pub quantity: u32,
    /// Trimmed free-text note; never an empty string.
    pub notes: Option<String>,
}

impl ConfigurationState {
    /// Fresh state for a newly loaded product.
    pub fn initial(ctx: &ProductContext) -> Self {
        Self {
            selection: Selection::new(),
            wizard: WizardCursor::start(&ctx.product),
            split: SplitState::Off,
            quantity: 1,
            notes: None,
        }
    }

    /// Apply `action`, returning the next state and what happened.
    pub fn reduce(&self, ctx: &ProductContext, action: &Action) -> (Self, Outcome) {
        let result = match action {
            Action::ToggleOption { option_id } => self.toggle_option(ctx, option_id),
            Action::NextStep => self.next_step(ctx),
            Action::PreviousStep => self.previous_step(),
            Action::StartSplit => self.start_split(ctx),
            Action::PickSecondFlavor { product_id } => self.pick_second_flavor(ctx, product_id),
            Action::RemoveSecondFlavor => self.remove_second_flavor(),
            Action::IncrementQuantity => self.set_quantity(ctx, self.quantity.saturating_add(1)),
            Action::DecrementQuantity => self.set_quantity(ctx, self.quantity.saturating_sub(1)),
            Action::SetQuantity { quantity } => self.set_quantity(ctx, *quantity),
            Action::SetNotes { notes } => self.set_notes(notes),
        };

        match result {
            Ok(next) => (next, Outcome::Applied),
            Err(reason) => (self.clone(), Outcome::Ignored(reason)),
        }
    }

    /// Groups presented at the current position of the flow.
    pub fn visible_groups<'a>(&self, ctx: &'a ProductContext) -> Vec<&'a ModifierGroup> {
        match &self.wizard {
            Some(cursor) => {
                let ids = cursor.current_step().group_ids();
                ctx.product
                    .modifier_groups
                    .iter()
                    .filter(|g| ids.contains(&&g.id))
                    .collect()
            }
            None => ctx.product.modifier_groups.iter().collect(),
        }
    }

    /// Current wizard step, if any.
    pub fn current_step(&self) -> Option<&Step> {
        self.wizard.as_ref().map(|c| c.current_step())
    }

    /// Reasons the configuration cannot be committed yet.
    pub fn blockers(&self, ctx: &ProductContext) -> Vec<Blocker> {
        let mut blockers: Vec<Blocker> = unsatisfied_groups(&ctx.product, &self.selection)
            .into_iter()
            .map(|g| Blocker::RequiredGroup {
                group_id: g.id.clone(),
                name: g.name.clone(),
                selected: self.selection.count_in_group(g),
                min: g.min_quantity,
            })
            .collect();

        if matches!(self.split, SplitState::Pending) {
            blockers.push(Blocker::SplitIncomplete);
        }
        blockers
    }

    pub fn can_commit(&self, ctx: &ProductContext) -> bool {
        self.blockers(ctx).is_empty()
    }

    fn toggle_option(&self, ctx: &ProductContext, option_id: &ModifierOptionId) -> Result<Self, IgnoreReason> {
        let group = ctx
            .product
            .group_of_option(option_id)
            .ok_or(IgnoreReason::UnknownOption)?;
        let option = group.option(option_id).ok_or(IgnoreReason::UnknownOption)?;
        let selection = toggle(group, option, &self.selection).ok_or(IgnoreReason::GroupFull)?;

        Ok(Self {
            selection,
            ..self.clone()
        })
    }

    fn next_step(&self, ctx: &ProductContext) -> Result<Self, IgnoreReason> {
        let cursor = self.wizard.as_ref().ok_or(IgnoreReason::NotAWizard)?;
        if cursor.is_last_step() {
            return Err(IgnoreReason::NoNextStep);
        }
        if !cursor.can_advance(&ctx.product, &self.selection) {
            return Err(IgnoreReason::StepIncomplete);
        }
        Ok(Self {
            wizard: Some(cursor.advanced()),
            ..self.clone()
        })
    }

    fn previous_step(&self) -> Result<Self, IgnoreReason> {
        let cursor = self.wizard.as_ref().ok_or(IgnoreReason::NotAWizard)?;
        if cursor.current_index() == 0 {
            return Err(IgnoreReason::NoPreviousStep);
        }
        Ok(Self {
            wizard: Some(cursor.retreated()),
            ..self.clone()
        })
    }

    fn start_split(&self, ctx: &ProductContext) -> Result<Self, IgnoreReason> {
        if !ctx.split_allowed {
            return Err(IgnoreReason::SplitNotAllowed);
        }
        if self.split.is_active() {
            return Err(IgnoreReason::Unchanged);
        }
        Ok(Self {
            split: SplitState::Pending,
            ..self.clone()
        })
    }

    fn pick_second_flavor(&self, ctx: &ProductContext, product_id: &ProductId) -> Result<Self, IgnoreReason> {
        if !ctx.split_allowed {
            return Err(IgnoreReason::SplitNotAllowed);
        }
        if product_id == &ctx.product.id {
            return Err(IgnoreReason::SameFlavor);
        }
        let sibling = ctx.sibling(product_id).ok_or(IgnoreReason::UnknownFlavor)?;
        if self.split.second_flavor().map(|s| &s.id) == Some(product_id) {
            return Err(IgnoreReason::Unchanged);
        }
        Ok(Self {
            split: SplitState::Complete(sibling.clone()),
            ..self.clone()
        })
    }

    fn remove_second_flavor(&self) -> Result<Self, IgnoreReason> {
        if !self.split.is_active() {
            return Err(IgnoreReason::SplitInactive);
        }
        Ok(Self {
            split: SplitState::Off,
            ..self.clone()
        })
    }

    fn set_quantity(&self, ctx: &ProductContext, requested: u32) -> Result<Self, IgnoreReason> {
        let quantity = requested.clamp(1, ctx.max_quantity);
        if quantity == self.quantity {
            return Err(if requested < 1 {
                IgnoreReason::QuantityAtMinimum
            } else if requested > ctx.max_quantity {
                IgnoreReason::QuantityAtMaximum
            } else {
                IgnoreReason::Unchanged
            });
        }
        Ok(Self {
            quantity,
            ..self.clone()
        })
    }

    fn set_notes(&self, notes: &str) -> Result<Self, IgnoreReason> {
        let trimmed = notes.trim();
        let notes = (!trimmed.is_empty()).then(|| trimmed.to_string());
        if notes == self.notes {
            return Err(IgnoreReason::Unchanged);
        }
        Ok(Self {
            notes,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use menu_commerce::catalog::ModifierOption;
    use menu_commerce::{Currency, Money};

    fn brl(cents: i64) -> Money {
        Money::new(cents, Currency::BRL)
    }

    fn opt(id: &str, cents: i64) -> ModifierOption {
        ModifierOption::new(id, id, brl(cents))
    }

    fn pizza_ctx() -> ProductContext {
        let product = ProductWithModifiers::new("calabresa", "Calabresa", brl(2000))
            .in_category("Pizzas")
            .with_group(
                ModifierGroup::new("borda", "Borda", 0, 1)
                    .with_option(opt("catupiry", 250))
                    .with_option(opt("cheddar", 300)),
            );
        let siblings = vec![
            SimpleProduct::new("calabresa", "Calabresa", brl(2000)),
            SimpleProduct::new("marguerita", "Marguerita", brl(3000)),
            SimpleProduct::new("portuguesa", "Portuguesa", brl(3200)),
        ];
        ProductContext::new(product, siblings, true, 99)
    }

    fn wizard_ctx() -> ProductContext {
        let product = ProductWithModifiers::new("marmita", "Marmita", brl(2500))
            .with_group(
                ModifierGroup::new("proteina", "Proteína", 1, 1)
                    .required()
                    .with_option(opt("frango", 0))
                    .with_option(opt("picanha", 800)),
            )
            .with_group(
                ModifierGroup::new("acompanhamento", "Acompanhamento", 1, 2)
                    .required()
                    .with_option(opt("arroz", 0))
                    .with_option(opt("feijao", 0)),
            )
            .with_group(ModifierGroup::new("bebida", "Bebida", 0, 1).with_option(opt("suco", 600)));
        ProductContext::new(product, Vec::new(), false, 5)
    }

    fn toggle_action(id: &str) -> Action {
        Action::ToggleOption {
            option_id: ModifierOptionId::new(id),
        }
    }

    fn apply(state: &ConfigurationState, ctx: &ProductContext, action: Action) -> (ConfigurationState, Outcome) {
        state.reduce(ctx, &action)
    }

    #[test]
    fn test_siblings_exclude_self() {
        let ctx = pizza_ctx();
        assert_eq!(ctx.siblings.len(), 2);
        assert!(ctx.sibling(&ProductId::new("calabresa")).is_none());
    }

    #[test]
    fn test_toggle_unknown_option_ignored() {
        let ctx = pizza_ctx();
        let state = ConfigurationState::initial(&ctx);
        let (next, outcome) = apply(&state, &ctx, toggle_action("bacon"));
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::UnknownOption));
        assert_eq!(next, state);
    }

    #[test]
    fn test_wizard_forward_gated_backward_free() {
        let ctx = wizard_ctx();
        let state = ConfigurationState::initial(&ctx);
        assert_eq!(state.wizard.as_ref().unwrap().progress(), (1, 3));

        let (state, outcome) = apply(&state, &ctx, Action::NextStep);
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::StepIncomplete));

        let (state, _) = apply(&state, &ctx, toggle_action("picanha"));
        let (state, outcome) = apply(&state, &ctx, Action::NextStep);
        assert!(outcome.is_applied());
        assert_eq!(state.visible_groups(&ctx)[0].id.as_str(), "acompanhamento");

        let (state, outcome) = apply(&state, &ctx, Action::PreviousStep);
        assert!(outcome.is_applied());
        let (_, outcome) = apply(&state, &ctx, Action::PreviousStep);
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::NoPreviousStep));
    }

    #[test]
    fn test_commit_blocked_until_all_required() {
        let ctx = wizard_ctx();
        let state = ConfigurationState::initial(&ctx);
        assert_eq!(state.blockers(&ctx).len(), 2);

        let (state, _) = apply(&state, &ctx, toggle_action("frango"));
        let (state, _) = apply(&state, &ctx, Action::NextStep);
        assert_eq!(state.blockers(&ctx).len(), 1);

        let (state, _) = apply(&state, &ctx, toggle_action("arroz"));
        assert!(state.can_commit(&ctx));
    }

    #[test]
    fn test_flat_product_rejects_steps() {
        let ctx = pizza_ctx();
        let state = ConfigurationState::initial(&ctx);
        let (_, outcome) = apply(&state, &ctx, Action::NextStep);
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::NotAWizard));
        assert_eq!(state.visible_groups(&ctx).len(), 1);
    }

    #[test]
    fn test_split_lifecycle() {
        let ctx = pizza_ctx();
        let state = ConfigurationState::initial(&ctx);

        let (state, outcome) = apply(&state, &ctx, Action::StartSplit);
        assert!(outcome.is_applied());
        assert_eq!(state.blockers(&ctx), vec![Blocker::SplitIncomplete]);

        let pick = |id: &str| Action::PickSecondFlavor {
            product_id: ProductId::new(id),
        };
        let (state, _) = apply(&state, &ctx, pick("marguerita"));
        let (state, outcome) = apply(&state, &ctx, pick("portuguesa"));
        assert!(outcome.is_applied());
        assert_eq!(state.split.second_flavor().unwrap().id.as_str(), "portuguesa");
        assert!(state.can_commit(&ctx));

        let (_, outcome) = apply(&state, &ctx, pick("calabresa"));
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::SameFlavor));
        let (_, outcome) = apply(&state, &ctx, pick("coca-cola"));
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::UnknownFlavor));

        let (state, outcome) = apply(&state, &ctx, Action::RemoveSecondFlavor);
        assert!(outcome.is_applied());
        assert_eq!(state.split, SplitState::Off);
    }

    #[test]
    fn test_split_not_allowed_outside_category() {
        let ctx = wizard_ctx();
        let state = ConfigurationState::initial(&ctx);
        let (_, outcome) = apply(&state, &ctx, Action::StartSplit);
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::SplitNotAllowed));
    }

    #[test]
    fn test_quantity_bounds() {
        let ctx = wizard_ctx();
        let state = ConfigurationState::initial(&ctx);

        let (state, outcome) = apply(&state, &ctx, Action::DecrementQuantity);
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::QuantityAtMinimum));
        assert_eq!(state.quantity, 1);

        let (state, _) = apply(&state, &ctx, Action::SetQuantity { quantity: 50 });
        assert_eq!(state.quantity, 5);
        let (state, outcome) = apply(&state, &ctx, Action::IncrementQuantity);
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::QuantityAtMaximum));

        let (state, _) = apply(&state, &ctx, Action::SetQuantity { quantity: 0 });
        assert_eq!(state.quantity, 1);
    }

    #[test]
    fn test_notes_trimmed() {
        let ctx = pizza_ctx();
        let state = ConfigurationState::initial(&ctx);

        let (state, _) = apply(&state, &ctx, Action::SetNotes { notes: "  sem cebola ".into() });
        assert_eq!(state.notes.as_deref(), Some("sem cebola"));

        let (state, _) = apply(&state, &ctx, Action::SetNotes { notes: "   ".into() });
        assert_eq!(state.notes, None);
    }

    #[test]
    fn test_action_deserializes_from_json() {
        let action: Action = serde_json::from_str(r#"{"action":"toggle_option","option_id":"catupiry"}"#).unwrap();
        assert_eq!(action, toggle_action("catupiry"));

        let action: Action = serde_json::from_str(r#"{"action":"next_step"}"#).unwrap();
        assert_eq!(action, Action::NextStep);
    }
}
