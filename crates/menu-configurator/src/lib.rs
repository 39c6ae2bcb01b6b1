//! Product configuration and pricing engine.
//!
//! Turns a catalog product with modifier groups (or a kit definition) plus a
//! stream of user actions into validated cart line items:
//!
//! - [`validator`] - min/max cardinality rules per modifier group
//! - [`wizard`] - step-by-step flow for products with several required groups
//! - [`split`] - half-and-half composition
//! - [`kit`] - fixed-total mixed boxes
//! - [`pricing`] - unit price breakdown and per-unit cart emission
//! - [`session`] - session lifecycle around an async catalog
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use futures::executor::block_on;
//! use menu_commerce::prelude::*;
//! use menu_configurator::prelude::*;
//!
//! let catalog = InMemoryCatalog::new().with_product(
//!     ProductWithModifiers::new("acai-500", "Açaí 500ml", Money::new(1800, Currency::BRL)).with_group(
//!         ModifierGroup::new("adicionais", "Adicionais", 0, 2)
//!             .with_option(ModifierOption::new("granola", "Granola", Money::new(200, Currency::BRL)))
//!             .with_option(ModifierOption::new("pacoca", "Paçoca", Money::new(250, Currency::BRL))),
//!     ),
//! );
//! let store = StoreContext::new("loja-1", "acai-da-praia", "Açaí da Praia");
//! let mut configurator = Configurator::new(Arc::new(catalog), EngineConfig::default(), store);
//!
//! block_on(configurator.open_and_load(OpenRequest::new("acai-500")));
//! configurator.apply(&Action::ToggleOption { option_id: "granola".into() });
//!
//! let mut cart: Vec<CartLineItem> = Vec::new();
//! let outcome = configurator.commit(&mut cart).unwrap();
//! assert!(outcome.is_committed());
//! assert_eq!(cart[0].unit_price, Money::new(2000, Currency::BRL));
//! ```

pub mod catalog;
pub mod config;
pub mod kit;
pub mod outcome;
pub mod pricing;
pub mod selection;
pub mod session;
pub mod split;
pub mod state;
pub mod validator;
pub mod wizard;

pub use catalog::{CatalogSource, InMemoryCatalog};
pub use config::EngineConfig;
pub use outcome::{Blocker, CommitOutcome, IgnoreReason, Outcome};
pub use session::{Configurator, OpenRequest, SessionPhase};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{CatalogSource, InMemoryCatalog};
    pub use crate::config::{EngineConfig, LoggingConfig, SplitConfig};
    pub use crate::kit::{KitAction, KitAssembler, KitState};
    pub use crate::outcome::{Blocker, CommitOutcome, IgnoreReason, Outcome};
    pub use crate::pricing::PriceBreakdown;
    pub use crate::selection::Selection;
    pub use crate::session::{
        ConfigurationSession, Configurator, LoadResult, OpenRequest, PendingLoad, ProductSession, SessionPhase,
    };
    pub use crate::split::{SplitEligibility, SplitPolicy, SplitState};
    pub use crate::state::{Action, ConfigurationState, ProductContext};
    pub use crate::wizard::{Step, WizardCursor};
}
