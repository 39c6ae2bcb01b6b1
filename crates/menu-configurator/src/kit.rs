//! Fixed-total kit assembly.
//!
//! A kit is filled by stepping per-variety counts up and down by the kit's
//! `min_per_variety`. It commits only when the counts add up to exactly
//! `base_quantity`, and then as a single line item at the kit's flat price.

use menu_commerce::cart::{CartLineItem, CartSink, ItemSource, KitDetail, StoreContext};
use menu_commerce::catalog::KitDefinition;
use menu_commerce::{CommerceError, ProductId};
use menu_observability::{LogLevel, SessionLogger};
use serde::{Deserialize, Serialize};

use crate::outcome::{Blocker, CommitOutcome, IgnoreReason, Outcome};
use crate::pricing::emit_units;

/// A change to one variety's count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "product_id", rename_all = "snake_case")]
pub enum KitAction {
    Increment(ProductId),
    Decrement(ProductId),
}

/// Per-variety counts, in the kit's definition order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KitState {
    counts: Vec<(ProductId, u32)>,
}

impl KitState {
    /// Counts seeded from each item's default quantity.
    pub fn start(definition: &KitDefinition) -> Self {
        Self {
            counts: definition
                .items
                .iter()
                .map(|i| (i.product_id.clone(), i.default_quantity))
                .collect(),
        }
    }

    pub fn count_of(&self, product_id: &ProductId) -> u32 {
        self.counts
            .iter()
            .find(|(id, _)| id == product_id)
            .map(|(_, q)| *q)
            .unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u32 {
        self.counts.iter().map(|(_, q)| *q).sum()
    }

    /// Units still missing; negative when the kit is over-filled.
    pub fn remaining(&self, definition: &KitDefinition) -> i64 {
        i64::from(definition.base_quantity) - i64::from(self.total())
    }

    /// Number of varieties with a positive count.
    pub fn variety_count(&self) -> usize {
        self.counts.iter().filter(|(_, q)| *q > 0).count()
    }

    pub fn can_commit(&self, definition: &KitDefinition) -> bool {
        self.total() == definition.base_quantity
    }

    pub fn reduce(&self, definition: &KitDefinition, action: &KitAction) -> (Self, Outcome) {
        let step = definition.step();
        let product_id = match action {
            KitAction::Increment(id) | KitAction::Decrement(id) => id,
        };

        let Some(index) = self.counts.iter().position(|(id, _)| id == product_id) else {
            return (self.clone(), Outcome::Ignored(IgnoreReason::UnknownVariety));
        };

        let current = self.counts[index].1;
        let next = match action {
            KitAction::Increment(_) => Ok(current.saturating_add(step)),
            KitAction::Decrement(_) if current == 0 => Err(IgnoreReason::VarietyEmpty),
            KitAction::Decrement(_) => Ok(current.saturating_sub(step)),
        };

        match next {
            Ok(quantity) => {
                let mut counts = self.counts.clone();
                counts[index].1 = quantity;
                (Self { counts }, Outcome::Applied)
            }
            Err(reason) => (self.clone(), Outcome::Ignored(reason)),
        }
    }

    /// Positive counts in definition order.
    pub fn details(&self, definition: &KitDefinition) -> Vec<KitDetail> {
        definition
            .items
            .iter()
            .filter_map(|item| {
                let quantity = self.count_of(&item.product_id);
                (quantity > 0).then(|| KitDetail {
                    product_id: item.product_id.clone(),
                    name: item.name.clone(),
                    quantity,
                })
            })
            .collect()
    }

    /// The line item a complete kit commits as.
    pub fn line_item(&self, definition: &KitDefinition) -> CartLineItem {
        CartLineItem {
            source: ItemSource::Kit(definition.id.clone()),
            name: definition.name.clone(),
            image_url: definition.image_url.clone(),
            quantity: 1,
            unit_price: definition.base_price,
            modifiers: Vec::new(),
            notes: None,
            flavors: None,
            kit_details: Some(self.details(definition)),
            is_split: false,
        }
    }
}

/// A kit being filled, with its definition and logger.
///
/// Once committed, the assembler is spent: actions are ignored and further
/// commits fail.
#[derive(Debug, Clone)]
pub struct KitAssembler {
    definition: KitDefinition,
    state: KitState,
    logger: SessionLogger,
    committed: bool,
}

impl KitAssembler {
    /// Start assembling `definition`, rejecting malformed kits.
    pub fn new(definition: KitDefinition, logger: SessionLogger) -> Result<Self, CommerceError> {
        definition.validate()?;
        let state = KitState::start(&definition);
        let logger = logger.with_product(definition.id.as_str());
        Ok(Self {
            definition,
            state,
            logger,
            committed: false,
        })
    }

    pub fn definition(&self) -> &KitDefinition {
        &self.definition
    }

    pub fn state(&self) -> &KitState {
        &self.state
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn apply(&mut self, action: &KitAction) -> Outcome {
        if self.committed {
            return Outcome::Ignored(IgnoreReason::NotReady);
        }
        let (state, outcome) = self.state.reduce(&self.definition, action);
        if let Outcome::Ignored(reason) = outcome {
            self.logger
                .builder(LogLevel::Debug, "kit action ignored")
                .field("reason", reason.as_str())
                .emit();
        }
        self.state = state;
        outcome
    }

    pub fn blockers(&self) -> Vec<Blocker> {
        if self.state.can_commit(&self.definition) {
            Vec::new()
        } else {
            vec![Blocker::KitIncomplete {
                total: self.state.total(),
                required: self.definition.base_quantity,
            }]
        }
    }

    /// Send the kit to the cart if its total is exact.
    pub fn commit<S>(&mut self, sink: &mut S, store: &StoreContext) -> Result<CommitOutcome, CommerceError>
    where
        S: CartSink + ?Sized,
    {
        if self.committed {
            return Err(CommerceError::SessionClosed(format!(
                "kit {} was already committed",
                self.definition.id
            )));
        }

        let blockers = self.blockers();
        if !blockers.is_empty() {
            self.logger
                .builder(LogLevel::Info, "kit commit blocked")
                .field_i64("remaining", self.state.remaining(&self.definition))
                .emit();
            return Ok(CommitOutcome::Blocked { blockers });
        }

        let item = self.state.line_item(&self.definition);
        let units = emit_units(sink, store, &item, 1)?;
        self.committed = true;

        self.logger
            .builder(LogLevel::Info, "kit committed")
            .field("store", store.slug.as_str())
            .field("price", item.unit_price.display())
            .field_i64("varieties", self.state.variety_count() as i64)
            .emit();

        Ok(CommitOutcome::Committed {
            units,
            unit_price: item.unit_price,
            total: item.unit_price,
        })
    }
}
