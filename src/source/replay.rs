//! In-memory price replay

use super::{DataSource, Order, OrderId, PriceTick, SourceError, SyntheticSeries};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

/// One element of a JSON price series: a bare number or a stamped tick
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTick {
    Price(f64),
    Tick {
        price: f64,
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },
}

impl From<RawTick> for PriceTick {
    fn from(raw: RawTick) -> Self {
        match raw {
            RawTick::Price(price) => PriceTick::new(price),
            RawTick::Tick { price, timestamp } => PriceTick { price, timestamp },
        }
    }
}

/// Replays a stored series in order and keeps committed orders in memory
#[derive(Debug, Clone)]
pub struct ReplaySource {
    ticks: Vec<PriceTick>,
    cursor: usize,
    orders: Vec<(OrderId, Order)>,
}

impl ReplaySource {
    /// Build from stamped ticks. Every price must be finite and positive.
    pub fn from_ticks(ticks: Vec<PriceTick>) -> Result<Self, SourceError> {
        if ticks.is_empty() {
            return Err(SourceError::Empty);
        }
        if let Some((index, tick)) = ticks
            .iter()
            .enumerate()
            .find(|(_, t)| !t.price.is_finite() || t.price <= 0.0)
        {
            return Err(SourceError::InvalidPrice {
                index,
                price: tick.price,
            });
        }

        Ok(Self {
            ticks,
            cursor: 0,
            orders: Vec::new(),
        })
    }

    /// Build from bare prices
    pub fn from_prices(prices: Vec<f64>) -> Result<Self, SourceError> {
        Self::from_ticks(prices.into_iter().map(PriceTick::new).collect())
    }

    /// Parse a JSON array of numbers or `{timestamp, price}` objects
    pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
        let raw: Vec<RawTick> = serde_json::from_str(json)?;
        Self::from_ticks(raw.into_iter().map(PriceTick::from).collect())
    }

    /// Load a JSON price series from disk
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Generate a seeded synthetic series of `len` ticks
    pub fn synthetic(len: usize, seed: u64) -> Result<Self, SourceError> {
        Self::from_ticks(SyntheticSeries::new(seed).generate(len))
    }

    /// All prices of the series
    pub fn prices(&self) -> Vec<f64> {
        self.ticks.iter().map(|t| t.price).collect()
    }

    pub fn ticks(&self) -> &[PriceTick] {
        &self.ticks
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Ticks not yet replayed
    pub fn remaining(&self) -> usize {
        self.ticks.len() - self.cursor
    }

    pub fn committed_orders(&self) -> &[(OrderId, Order)] {
        &self.orders
    }
}

impl DataSource for ReplaySource {
    fn next_price(&mut self) -> Option<PriceTick> {
        let tick = self.ticks.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(tick)
    }

    fn commit_order(&mut self, order: &Order) -> Result<OrderId, SourceError> {
        let order_id = OrderId::new_v4();
        self.orders.push((order_id, order.clone()));
        tracing::debug!(
            ?order_id,
            side = ?order.side,
            price = order.price,
            volume = order.volume,
            "Order committed"
        );
        Ok(order_id)
    }
}
