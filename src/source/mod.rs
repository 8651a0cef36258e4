//! Price data sources
//!
//! The simulator only consumes prices; where they come from sits behind
//! [`DataSource`]. Only the in-memory replay implementation ships.

mod replay;
pub mod synthetic;

pub use replay::ReplaySource;
pub use synthetic::SyntheticSeries;

use crate::account::Side;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Order identifier
pub type OrderId = Uuid;

/// A single price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl PriceTick {
    pub fn new(price: f64) -> Self {
        Self {
            price,
            timestamp: None,
        }
    }

    pub fn at(price: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            price,
            timestamp: Some(timestamp),
        }
    }
}

/// An executed simulator order forwarded to the source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub side: Side,
    pub price: f64,
    pub volume: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Data source errors
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Price series is empty")]
    Empty,
    #[error("Invalid price {price} at index {index}")]
    InvalidPrice { index: usize, price: f64 },
    #[error("Failed to read price series: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse price series: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Supplier of prices and sink for executed orders
pub trait DataSource {
    /// Next price, or `None` when the source is exhausted
    fn next_price(&mut self) -> Option<PriceTick>;

    /// Record an executed order
    fn commit_order(&mut self, order: &Order) -> Result<OrderId, SourceError>;
}
