//! Step sequencing for products with several required groups.
//!
//! A product with two or more required groups is configured one group at a
//! time: each required group is its own step, and all optional groups share
//! a final step. Other products present every group at once.

use menu_commerce::catalog::{ModifierGroup, ProductWithModifiers};
use menu_commerce::ModifierGroupId;
use serde::{Deserialize, Serialize};

use crate::selection::Selection;
use crate::validator::is_group_satisfied;

/// Minimum number of required groups that switches a product to wizard mode.
pub const WIZARD_THRESHOLD: usize = 2;

/// One screen of the configuration flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// A single required group; gated on that group being satisfied.
    RequiredStep { group_id: ModifierGroupId },
    /// Every optional group, presented together as the last step.
    OptionalTail { group_ids: Vec<ModifierGroupId> },
    /// A group shown in the all-at-once layout.
    FlatGroup { group_id: ModifierGroupId },
}

impl Step {
    /// Groups presented by this step.
    pub fn group_ids(&self) -> Vec<&ModifierGroupId> {
        match self {
            Step::RequiredStep { group_id } | Step::FlatGroup { group_id } => vec![group_id],
            Step::OptionalTail { group_ids } => group_ids.iter().collect(),
        }
    }

    /// Whether the flow may move past this step.
    pub fn is_complete(&self, product: &ProductWithModifiers, selection: &Selection) -> bool {
        match self {
            Step::RequiredStep { group_id } => product
                .modifier_groups
                .iter()
                .find(|g| &g.id == group_id)
                .map(|g| is_group_satisfied(g, selection))
                .unwrap_or(true),
            Step::OptionalTail { .. } | Step::FlatGroup { .. } => true,
        }
    }
}

/// Whether `groups` are configured step by step.
pub fn is_wizard(groups: &[ModifierGroup]) -> bool {
    groups.iter().filter(|g| g.required).count() >= WIZARD_THRESHOLD
}

/// Lay out the configuration flow for `groups` (already in display order).
pub fn plan_steps(groups: &[ModifierGroup]) -> Vec<Step> {
    if !is_wizard(groups) {
        return groups
            .iter()
            .map(|g| Step::FlatGroup {
                group_id: g.id.clone(),
            })
            .collect();
    }

    let mut steps: Vec<Step> = groups
        .iter()
        .filter(|g| g.required)
        .map(|g| Step::RequiredStep {
            group_id: g.id.clone(),
        })
        .collect();

    let optional: Vec<ModifierGroupId> = groups
        .iter()
        .filter(|g| !g.required)
        .map(|g| g.id.clone())
        .collect();
    if !optional.is_empty() {
        steps.push(Step::OptionalTail { group_ids: optional });
    }

    steps
}

/// Position within a wizard flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardCursor {
    steps: Vec<Step>,
    current: usize,
}

impl WizardCursor {
    /// Cursor at the first step, or None when the product is not a wizard.
    pub fn start(product: &ProductWithModifiers) -> Option<Self> {
        if !is_wizard(&product.modifier_groups) {
            return None;
        }
        Some(Self {
            steps: plan_steps(&product.modifier_groups),
            current: 0,
        })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &Step {
        &self.steps[self.current]
    }

    pub fn is_last_step(&self) -> bool {
        self.current + 1 == self.steps.len()
    }

    /// `(step number, total steps)`, 1-based.
    pub fn progress(&self) -> (usize, usize) {
        (self.current + 1, self.steps.len())
    }

    /// Forward is allowed when a next step exists and the current one is complete.
    pub fn can_advance(&self, product: &ProductWithModifiers, selection: &Selection) -> bool {
        !self.is_last_step() && self.current_step().is_complete(product, selection)
    }

    /// The cursor one step forward.
    pub fn advanced(&self) -> Self {
        Self {
            steps: self.steps.clone(),
            current: (self.current + 1).min(self.steps.len() - 1),
        }
    }

    /// The cursor one step back. Backward moves are never gated.
    pub fn retreated(&self) -> Self {
        Self {
            steps: self.steps.clone(),
            current: self.current.saturating_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use menu_commerce::catalog::ModifierOption;
    use menu_commerce::{Currency, Money};

    use crate::validator::toggle;

    fn brl(cents: i64) -> Money {
        Money::new(cents, Currency::BRL)
    }

    fn required(id: &str) -> ModifierGroup {
        ModifierGroup::new(id, id, 1, 1)
            .required()
            .with_option(ModifierOption::new(format!("{id}-a"), "A", brl(0)))
            .with_option(ModifierOption::new(format!("{id}-b"), "B", brl(100)))
    }

    fn optional(id: &str) -> ModifierGroup {
        ModifierGroup::new(id, id, 0, 3).with_option(ModifierOption::new(format!("{id}-x"), "X", brl(250)))
    }

    fn wizard_product() -> ProductWithModifiers {
        ProductWithModifiers::new("marmita", "Marmita", brl(2500))
            .with_group(required("proteina"))
            .with_group(optional("extras"))
            .with_group(required("acompanhamento"))
            .with_group(optional("bebida"))
    }

    #[test]
    fn test_plan_wizard_steps() {
        let steps = plan_steps(&wizard_product().modifier_groups);
        assert_eq!(
            steps,
            vec![
                Step::RequiredStep { group_id: "proteina".into() },
                Step::RequiredStep { group_id: "acompanhamento".into() },
                Step::OptionalTail {
                    group_ids: vec!["extras".into(), "bebida".into()]
                },
            ]
        );
    }

    #[test]
    fn test_no_tail_without_optional_groups() {
        let groups = vec![required("a"), required("b")];
        let steps = plan_steps(&groups);
        assert_eq!(steps.len(), 2);
        assert!(steps.iter().all(|s| matches!(s, Step::RequiredStep { .. })));
    }

    #[test]
    fn test_single_required_group_is_flat() {
        let groups = vec![required("tamanho"), optional("adicionais")];
        assert!(!is_wizard(&groups));
        let steps = plan_steps(&groups);
        assert_eq!(steps.len(), 2);
        assert!(steps.iter().all(|s| matches!(s, Step::FlatGroup { .. })));
    }

    #[test]
    fn test_forward_gated_on_current_group() {
        let product = wizard_product();
        let cursor = WizardCursor::start(&product).unwrap();
        let empty = Selection::new();

        assert_eq!(cursor.progress(), (1, 3));
        assert!(!cursor.can_advance(&product, &empty));

        let g = &product.modifier_groups[0];
        let s = toggle(g, &g.options[0], &empty).unwrap();
        assert!(cursor.can_advance(&product, &s));

        let cursor = cursor.advanced();
        assert_eq!(cursor.current_index(), 1);
        assert!(!cursor.can_advance(&product, &s));
        assert_eq!(cursor.retreated().current_index(), 0);
    }

    #[test]
    fn test_last_step_cannot_advance() {
        let product = wizard_product();
        let cursor = WizardCursor::start(&product).unwrap().advanced().advanced();

        assert!(cursor.is_last_step());
        assert!(!cursor.can_advance(&product, &Selection::new()));
        assert_eq!(cursor.advanced().current_index(), 2);
    }

    #[test]
    fn test_flat_product_has_no_cursor() {
        let product = ProductWithModifiers::new("suco", "Suco", brl(800)).with_group(required("sabor"));
        assert!(WizardCursor::start(&product).is_none());
    }
}
