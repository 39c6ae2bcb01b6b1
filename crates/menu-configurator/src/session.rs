//! Product configuration sessions.
//!
//! A [`Configurator`] holds at most one active session. Opening a session
//! starts a catalog fetch tagged with the new session's id; a response that
//! arrives after another session was opened is discarded.

use std::sync::Arc;

use menu_commerce::cart::{CartSink, StoreContext};
use menu_commerce::catalog::{ProductWithModifiers, SimpleProduct};
use menu_commerce::{CommerceError, Currency, KitId, ProductId, SessionId};
use menu_observability::{LogLevel, SessionLogger};

use crate::catalog::CatalogSource;
use crate::config::EngineConfig;
use crate::kit::KitAssembler;
use crate::outcome::{Blocker, CommitOutcome, IgnoreReason, Outcome};
use crate::pricing::{build_line_item, emit_units, PriceBreakdown};
use crate::split::{SplitEligibility, SplitPolicy};
use crate::state::{Action, ConfigurationState, ProductContext};

/// What the caller knows when opening a product.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenRequest {
    pub product_id: ProductId,
    /// Category the product is listed under; falls back to the product's own.
    pub category_name: Option<String>,
    /// Products listed alongside it, offered as second flavors.
    pub siblings: Vec<SimpleProduct>,
}

impl OpenRequest {
    pub fn new(product_id: impl Into<ProductId>) -> Self {
        Self {
            product_id: product_id.into(),
            category_name: None,
            siblings: Vec::new(),
        }
    }

    pub fn in_category(mut self, category_name: impl Into<String>) -> Self {
        self.category_name = Some(category_name.into());
        self
    }

    pub fn with_siblings(mut self, siblings: Vec<SimpleProduct>) -> Self {
        self.siblings = siblings;
        self
    }
}

/// Lifecycle of a session.
#[derive(Debug, Clone)]
pub enum SessionPhase {
    /// Waiting for the catalog.
    Loading,
    /// Product loaded and accepting actions.
    Ready(Box<ProductSession>),
    /// The product could not be loaded or failed validation.
    Unavailable(CommerceError),
}

impl SessionPhase {
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionPhase::Ready(_))
    }
}

/// A loaded product and its configuration state.
#[derive(Debug, Clone)]
pub struct ProductSession {
    context: ProductContext,
    state: ConfigurationState,
    logger: SessionLogger,
}

impl ProductSession {
    fn new(context: ProductContext, logger: SessionLogger) -> Self {
        let state = ConfigurationState::initial(&context);
        Self {
            context,
            state,
            logger,
        }
    }

    pub fn context(&self) -> &ProductContext {
        &self.context
    }

    pub fn product(&self) -> &ProductWithModifiers {
        &self.context.product
    }

    pub fn state(&self) -> &ConfigurationState {
        &self.state
    }

    pub fn apply(&mut self, action: &Action) -> Outcome {
        let (state, outcome) = self.state.reduce(&self.context, action);
        if let Outcome::Ignored(reason) = outcome {
            self.logger
                .builder(LogLevel::Debug, "action ignored")
                .field("reason", reason.as_str())
                .emit();
        }
        self.state = state;
        outcome
    }

    pub fn price(&self) -> Result<PriceBreakdown, CommerceError> {
        PriceBreakdown::compute(&self.context, &self.state)
    }

    pub fn blockers(&self) -> Vec<Blocker> {
        self.state.blockers(&self.context)
    }

    pub fn can_commit(&self) -> bool {
        self.state.can_commit(&self.context)
    }
}

/// A session and the request that opened it.
#[derive(Debug, Clone)]
pub struct ConfigurationSession {
    pub id: SessionId,
    pub request: OpenRequest,
    pub phase: SessionPhase,
}

/// A catalog fetch tagged with the session that started it.
pub struct PendingLoad<C: ?Sized> {
    session_id: SessionId,
    product_id: ProductId,
    catalog: Arc<C>,
}

impl<C: CatalogSource + ?Sized> PendingLoad<C> {
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Run the fetch.
    pub async fn run(self) -> LoadResult {
        let result = self.catalog.product_with_modifiers(&self.product_id).await;
        LoadResult {
            session_id: self.session_id,
            result,
        }
    }
}

/// A finished catalog fetch.
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub session_id: SessionId,
    pub result: Result<ProductWithModifiers, CommerceError>,
}

/// Owns the active configuration session.
pub struct Configurator<C: ?Sized> {
    catalog: Arc<C>,
    config: EngineConfig,
    store: StoreContext,
    eligibility: Box<dyn SplitEligibility>,
    active: Option<ConfigurationSession>,
}

impl<C: CatalogSource + ?Sized> Configurator<C> {
    pub fn new(catalog: Arc<C>, config: EngineConfig, store: StoreContext) -> Self {
        let eligibility = Box::new(SplitPolicy::from_config(&config.split));
        Self {
            catalog,
            config,
            store,
            eligibility,
            active: None,
        }
    }

    /// Replace the keyword policy with a custom category predicate.
    pub fn with_split_eligibility(mut self, eligibility: impl SplitEligibility + 'static) -> Self {
        self.eligibility = Box::new(eligibility);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &StoreContext {
        &self.store
    }

    pub fn session(&self) -> Option<&ConfigurationSession> {
        self.active.as_ref()
    }

    /// The ready product session, if any.
    pub fn product_session(&self) -> Option<&ProductSession> {
        match &self.active.as_ref()?.phase {
            SessionPhase::Ready(session) => Some(&**session),
            _ => None,
        }
    }

    /// Open a session, discarding any previous one.
    ///
    /// The returned load must be run and handed back to [`Configurator::complete_load`].
    pub fn open(&mut self, request: OpenRequest) -> PendingLoad<C> {
        let session_id = SessionId::generate();
        if let Some(previous) = self.active.take() {
            tracing::debug!(session = %previous.id, "session replaced before completion");
        }

        tracing::info!(session = %session_id, product = %request.product_id, "opening session");
        let pending = PendingLoad {
            session_id: session_id.clone(),
            product_id: request.product_id.clone(),
            catalog: Arc::clone(&self.catalog),
        };
        self.active = Some(ConfigurationSession {
            id: session_id,
            request,
            phase: SessionPhase::Loading,
        });
        pending
    }

    /// Install a fetch result. Returns false when it belongs to a session
    /// that is no longer active.
    pub fn complete_load(&mut self, load: LoadResult) -> bool {
        let request = match &self.active {
            Some(active) if active.id == load.session_id => active.request.clone(),
            Some(active) => {
                tracing::warn!(
                    session = %load.session_id,
                    active = %active.id,
                    "discarding stale catalog response"
                );
                return false;
            }
            None => {
                tracing::warn!(session = %load.session_id, "discarding catalog response: no active session");
                return false;
            }
        };

        let logger = self
            .config
            .session_logger(load.session_id.as_str())
            .with_store(self.store.slug.as_str())
            .with_product(request.product_id.as_str());

        let phase = match load.result.and_then(|p| self.prepare(&request, p)) {
            Ok(context) => {
                logger
                    .builder(LogLevel::Info, "product loaded")
                    .field_i64("groups", context.product.modifier_groups.len() as i64)
                    .field_bool("split_allowed", context.split_allowed)
                    .emit();
                SessionPhase::Ready(Box::new(ProductSession::new(context, logger)))
            }
            Err(e) => {
                logger
                    .builder(LogLevel::Warn, "product unavailable")
                    .field("error", e.to_string())
                    .emit();
                SessionPhase::Unavailable(e)
            }
        };

        if let Some(active) = self.active.as_mut() {
            active.phase = phase;
        }
        true
    }

    /// Open a session and wait for its product.
    pub async fn open_and_load(&mut self, request: OpenRequest) -> Option<&SessionPhase> {
        let pending = self.open(request);
        let load = pending.run().await;
        self.complete_load(load);
        self.active.as_ref().map(|s| &s.phase)
    }

    /// Start assembling a kit from the catalog.
    pub async fn open_kit(&self, kit_id: &KitId) -> Result<KitAssembler, CommerceError> {
        let definition = self.catalog.kit(kit_id).await?;
        check_currency(self.config.currency, [definition.base_price.currency])?;
        let logger = self
            .config
            .session_logger(SessionId::generate().as_str())
            .with_store(self.store.slug.as_str());
        KitAssembler::new(definition, logger)
    }

    /// Apply an action to the ready session.
    pub fn apply(&mut self, action: &Action) -> Outcome {
        match self.ready_mut() {
            Some(session) => session.apply(action),
            None => Outcome::Ignored(IgnoreReason::NotReady),
        }
    }

    /// Commit the ready session to the cart, ending it on success.
    ///
    /// Without a ready session this is an error; with unmet requirements it
    /// returns `Blocked` and keeps the session. If the cart refuses a unit
    /// after accepting earlier ones, the session ends and the error reports
    /// how many units were added.
    pub fn commit<S>(&mut self, sink: &mut S) -> Result<CommitOutcome, CommerceError>
    where
        S: CartSink + ?Sized,
    {
        let store = self.store.clone();
        let session = self.ready_mut().ok_or_else(|| {
            CommerceError::SessionClosed("no product session is ready".to_string())
        })?;

        let blockers = session.blockers();
        if !blockers.is_empty() {
            session
                .logger
                .builder(LogLevel::Info, "commit blocked")
                .field_i64("blockers", blockers.len() as i64)
                .emit();
            return Ok(CommitOutcome::Blocked { blockers });
        }

        let pricing = session.price()?;
        let item = build_line_item(&session.context, &session.state)?;
        let units = match emit_units(sink, &store, &item, session.state.quantity) {
            Ok(units) => units,
            Err(e @ CommerceError::PartialCommit { .. }) => {
                session
                    .logger
                    .builder(LogLevel::Warn, "commit interrupted")
                    .field("error", e.to_string())
                    .emit();
                self.active = None;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        session
            .logger
            .builder(LogLevel::Info, "line items committed")
            .field_i64("units", i64::from(units))
            .field("unit_price", pricing.unit_price.display())
            .field_bool("split", item.is_split)
            .emit();

        self.active = None;
        Ok(CommitOutcome::Committed {
            units,
            unit_price: pricing.unit_price,
            total: pricing.total,
        })
    }

    /// Drop the active session without committing.
    pub fn close(&mut self) {
        if let Some(session) = self.active.take() {
            tracing::debug!(session = %session.id, "session closed");
        }
    }

    fn ready_mut(&mut self) -> Option<&mut ProductSession> {
        match &mut self.active.as_mut()?.phase {
            SessionPhase::Ready(session) => Some(&mut **session),
            _ => None,
        }
    }

    fn prepare(&self, request: &OpenRequest, product: ProductWithModifiers) -> Result<ProductContext, CommerceError> {
        let product = product.normalized();
        product.validate()?;
        check_currency(
            self.config.currency,
            std::iter::once(product.base_price.currency).chain(
                product
                    .modifier_groups
                    .iter()
                    .flat_map(|g| g.options.iter().map(|o| o.extra_price.currency)),
            ),
        )?;

        let split_allowed = request
            .category_name
            .as_deref()
            .or(product.category_name.as_deref())
            .map(|c| self.eligibility.allows_split(c))
            .unwrap_or(false);

        Ok(ProductContext::new(
            product,
            request.siblings.clone(),
            split_allowed,
            self.config.max_quantity_per_item,
        ))
    }
}

fn check_currency(expected: Currency, found: impl IntoIterator<Item = Currency>) -> Result<(), CommerceError> {
    match found.into_iter().find(|c| *c != expected) {
        Some(other) => Err(CommerceError::CurrencyMismatch {
            expected: expected.code().to_string(),
            got: other.code().to_string(),
        }),
        None => Ok(()),
    }
}
