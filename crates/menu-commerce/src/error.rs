//! Commerce error types.

use thiserror::Error;

/// Errors that can occur while loading catalog data or building line items.
///
/// Selection-rule violations (a full group, an unsatisfied wizard step, an
/// incomplete kit) are not errors; they surface as ignored actions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Kit not found.
    #[error("Kit not found: {0}")]
    KitNotFound(String),

    /// The catalog collaborator could not be reached.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Catalog data violates a modifier group or kit invariant.
    #[error("Invalid catalog data for {entity}: {reason}")]
    InvalidCatalog { entity: String, reason: String },

    /// No session can accept the request (never opened, closed, or already committed).
    #[error("Session closed: {0}")]
    SessionClosed(String),

    /// The cart rejected a unit after earlier units of the same commit were added.
    #[error("Commit interrupted after {committed} of {requested} units: {reason}")]
    PartialCommit {
        committed: u32,
        requested: u32,
        reason: String,
    },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
