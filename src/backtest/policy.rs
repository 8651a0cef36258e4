//! Trading policies driving the episode runner

use crate::account::{AccountInfo, Action};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Size of the discrete action space: indices 0..=200
pub const ACTION_SPACE: usize = 201;

/// What a policy wants to do on one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Hold,
    /// Go long with this fraction of equity (0, 1]
    Long(f64),
    /// Go short with this fraction of equity (0, 1]
    Short(f64),
}

impl Decision {
    /// Map a discrete action index to a signed equity fraction.
    ///
    /// Index 100 is hold, 0 is a full short and 200 a full long. Larger
    /// indices are clamped to 200.
    pub fn from_discrete(index: usize) -> Self {
        let index = index.min(ACTION_SPACE - 1);
        let fraction = (index as f64 - 100.0) * 0.01;

        if fraction > 0.0 {
            Decision::Long(fraction)
        } else if fraction < 0.0 {
            Decision::Short(fraction.abs())
        } else {
            Decision::Hold
        }
    }

    pub fn action(&self) -> Action {
        match self {
            Decision::Hold => Action::Hold,
            Decision::Long(_) => Action::Long,
            Decision::Short(_) => Action::Short,
        }
    }

    /// Unsigned equity fraction, 0 for hold
    pub fn fraction(&self) -> f64 {
        match self {
            Decision::Hold => 0.0,
            Decision::Long(f) | Decision::Short(f) => *f,
        }
    }
}

/// Chooses a decision each step
pub trait Policy {
    fn decide(&mut self, info: &AccountInfo, price: f64) -> Decision;
}

/// Replays a fixed list of discrete action indices, then holds
#[derive(Debug, Clone)]
pub struct ScriptedPolicy {
    indices: Vec<usize>,
    cursor: usize,
}

impl ScriptedPolicy {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices, cursor: 0 }
    }
}

impl Policy for ScriptedPolicy {
    fn decide(&mut self, _info: &AccountInfo, _price: f64) -> Decision {
        match self.indices.get(self.cursor) {
            Some(&index) => {
                self.cursor += 1;
                Decision::from_discrete(index)
            }
            None => Decision::Hold,
        }
    }
}

/// Uniformly random discrete actions from a seeded RNG
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn decide(&mut self, _info: &AccountInfo, _price: f64) -> Decision {
        Decision::from_discrete(self.rng.gen_range(0..ACTION_SPACE))
    }
}
