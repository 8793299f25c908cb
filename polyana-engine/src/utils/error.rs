//! Engine Error Taxonomy
//!
//! One enum for every failure the engine surfaces to callers:
//!
//! | Group | Variants | Caller action |
//! |-------|----------|---------------|
//! | Allocation | `Conflict`, `InvalidWindow`, `ResourceUnknown` | retry with different input |
//! | Lifecycle | `InvalidTransition`, `HoldExpired` | rejected request |
//! | Ledger | `ShiftAlreadyOpen`, `ShiftNotOpen`, `NothingToCollect` | blocking message to staff |
//! | Config | `NoTariffConfigured` | fix the price list |
//!
//! Collaborator failures (messaging, weather feed) never reach this
//! type; the scheduler logs and swallows them.

use thiserror::Error;

use crate::store::StoreError;

/// Engine error enum
#[derive(Debug, Error)]
pub enum AppError {
    // ========== Allocation Errors ==========
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Unknown resource: {0}")]
    ResourceUnknown(String),

    // ========== Lifecycle Errors ==========
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Hold expired: {0}")]
    HoldExpired(String),

    // ========== Ledger Preconditions ==========
    #[error("Shift already open on box {0}")]
    ShiftAlreadyOpen(String),

    #[error("Shift not open: {0}")]
    ShiftNotOpen(String),

    #[error("Nothing to collect on box {0}")]
    NothingToCollect(String),

    // ========== Configuration Errors ==========
    #[error("No tariff configured for {0}")]
    NoTariffConfigured(String),

    // ========== Generic ==========
    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_window(msg: impl Into<String>) -> Self {
        Self::InvalidWindow(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type for engine operations
pub type AppResult<T> = Result<T, AppError>;
