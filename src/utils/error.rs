//! Error types for the image shrinker.
//!
//! Provides the error hierarchy used by the compression pipeline. Every
//! variant carries a human-readable message so the orchestrator can reduce a
//! failure to the text recorded on the item.

use std::io;
use thiserror::Error;
use serde::Serialize;
use crate::core::ItemId;

/// Main error type for compression and front-end operations.
///
/// Decode and encode failures are caught at the orchestrator boundary and
/// recorded as item-level `error` status; they never reach the submitter.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum ShrinkError {
    /// Input could not be interpreted as an image
    #[error("Decode error: {0}")]
    Decode(String),

    /// Encoding surface unavailable or produced no output
    #[error("Encode error: {0}")]
    Encode(String),

    /// Settings or input validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),

    /// Task scheduling or join failure
    #[error("Processing error: {0}")]
    Processing(String),
}

/// Convenience result type for shrinker operations.
pub type ShrinkResult<T> = Result<T, ShrinkError>;

/// Rejected state-container updates.
///
/// The update is dropped and the item left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Transition would move the item backwards or skip a state
    #[error("Item {id}: cannot move from {from} to {to}")]
    InvalidTransition {
        id: ItemId,
        from: &'static str,
        to: &'static str,
    },
    /// An item with this id is already tracked
    #[error("Item {0} already exists")]
    Duplicate(ItemId),
}

// Helper methods for error creation
impl ShrinkError {
    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::IO(msg.into())
    }

    pub fn processing<T: Into<String>>(msg: T) -> Self {
        Self::Processing(msg.into())
    }
}

impl From<io::Error> for ShrinkError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ShrinkError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Processing(format!("Task panicked: {err}"))
    }
}
