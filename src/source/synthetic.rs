//! Seeded synthetic price series

use super::PriceTick;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random-walk price generator, reproducible for a given seed
pub struct SyntheticSeries {
    rng: StdRng,
    base_price: f64,
    /// Maximum fractional move per step
    step_volatility: f64,
    interval_minutes: i64,
    start: DateTime<Utc>,
}

/// 2024-01-01T00:00:00Z
fn default_start() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::days(19_723)
}

impl SyntheticSeries {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_price: 50_000.0,
            step_volatility: 0.001,
            interval_minutes: 1,
            start: default_start(),
        }
    }

    pub fn with_base_price(mut self, base_price: f64) -> Self {
        self.base_price = base_price;
        self
    }

    pub fn with_volatility(mut self, step_volatility: f64) -> Self {
        self.step_volatility = step_volatility;
        self
    }

    /// Generate `len` stamped ticks starting at the base price
    pub fn generate(&mut self, len: usize) -> Vec<PriceTick> {
        let mut ticks = Vec::with_capacity(len);
        let mut price = self.base_price;

        for i in 0..len {
            let timestamp = self.start + Duration::minutes(i as i64 * self.interval_minutes);
            ticks.push(PriceTick::at(price, timestamp));

            let shock = if self.step_volatility > 0.0 {
                self.rng.gen_range(-self.step_volatility..self.step_volatility)
            } else {
                0.0
            };
            price *= 1.0 + shock;
        }

        ticks
    }
}
