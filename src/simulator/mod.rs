//! Margin trade simulator
//!
//! Margin gate, trade execution, metric refresh, reward and snapshot per step

mod engine;
mod execution;

pub use engine::MarginTradeSimulator;

use crate::account::{Action, InvalidAction};
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;

/// Invalid simulator input. State is untouched when one is returned.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error(transparent)]
    InvalidAction(#[from] InvalidAction),
    #[error("Price must be finite and > 0, got {0}")]
    InvalidPrice(f64),
    #[error("Volume must be finite and >= 0, got {0}")]
    InvalidVolume(f64),
}

impl From<Infallible> for SimError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Outcome of one `execute` call
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExecutionReport {
    pub action: Action,
    /// False when the margin gate turned the action into a hold
    pub executed: bool,
    pub reward: f64,
}
