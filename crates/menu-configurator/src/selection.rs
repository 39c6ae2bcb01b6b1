//! The options chosen so far in a configuration session.

use menu_commerce::cart::SelectedModifier;
use menu_commerce::catalog::{ModifierGroup, ModifierOption};
use menu_commerce::{Currency, Money, ModifierOptionId};
use serde::{Deserialize, Serialize};

/// Selected modifiers in the order they were picked.
///
/// Each `option_id` appears at most once. Values are never mutated in place;
/// every change produces a new `Selection`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    entries: Vec<SelectedModifier>,
}

impl Selection {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected modifiers in pick order.
    pub fn entries(&self) -> &[SelectedModifier] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether an option is selected.
    pub fn is_selected(&self, option_id: &ModifierOptionId) -> bool {
        self.entries.iter().any(|m| &m.option_id == option_id)
    }

    /// Entries whose option belongs to `group`.
    pub fn in_group<'a>(
        &'a self,
        group: &'a ModifierGroup,
    ) -> impl Iterator<Item = &'a SelectedModifier> + 'a {
        self.entries
            .iter()
            .filter(move |m| group.contains_option(&m.option_id))
    }

    /// Number of entries belonging to `group`.
    pub fn count_in_group(&self, group: &ModifierGroup) -> u32 {
        self.in_group(group).count() as u32
    }

    /// Sum of extra prices, or None on currency mismatch or overflow.
    pub fn extras_total(&self, currency: Currency) -> Option<Money> {
        Money::try_sum(self.entries.iter().map(|m| &m.extra_price), currency)
    }

    /// Copy the entries out for a line item.
    pub fn to_modifiers(&self) -> Vec<SelectedModifier> {
        self.entries.clone()
    }

    pub(crate) fn with_option(&self, option: &ModifierOption) -> Self {
        let mut entries = self.entries.clone();
        entries.push(SelectedModifier::from_option(option));
        Self { entries }
    }

    pub(crate) fn without_option(&self, option_id: &ModifierOptionId) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|m| &m.option_id != option_id)
                .cloned()
                .collect(),
        }
    }

    pub(crate) fn without_group(&self, group: &ModifierGroup) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|m| !group.contains_option(&m.option_id))
                .cloned()
                .collect(),
        }
    }
}
