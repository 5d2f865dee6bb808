//! Operation generator for deterministic simulation testing.
//!
//! Produces random but reproducible sequences of index operations. Names
//! are drawn from a fixed pool so that inserts collide with existing names
//! and deletes hit both present and absent names.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for operation generation.
#[derive(Debug, Clone)]
pub struct OpGenConfig {
    /// Probability of an insert (0.0 - 1.0).
    pub insert_rate: f64,
    /// Probability of a delete, checked after `insert_rate`.
    pub delete_rate: f64,
    /// Number of distinct names operations draw from.
    pub name_pool_size: usize,
}

impl Default for OpGenConfig {
    fn default() -> Self {
        Self {
            insert_rate: 0.5,
            delete_rate: 0.35,
            name_pool_size: 200,
        }
    }
}

/// One index operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Insert(String),
    Delete(String),
    Search(String),
}

/// Generator for random [`Op`] sequences.
///
/// Given the same seed and configuration, the sequence is identical.
pub struct OpGenerator {
    rng: StdRng,
    config: OpGenConfig,
    pool: Vec<String>,
}

impl OpGenerator {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, OpGenConfig::default())
    }

    #[must_use]
    pub fn with_config(seed: u64, config: OpGenConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let pool = (0..config.name_pool_size.max(1))
            .map(|_| {
                let len = rng.random_range(1..=8);
                (0..len)
                    .map(|_| char::from(rng.random_range(b'a'..=b'z')))
                    .collect()
            })
            .collect();

        Self { rng, config, pool }
    }

    /// Generate the next operation.
    pub fn next_op(&mut self) -> Op {
        let name = self.pick_name();
        let roll: f64 = self.rng.random();
        if roll < self.config.insert_rate {
            Op::Insert(name)
        } else if roll < self.config.insert_rate + self.config.delete_rate {
            Op::Delete(name)
        } else {
            Op::Search(name)
        }
    }

    fn pick_name(&mut self) -> String {
        let index = self.rng.random_range(0..self.pool.len());
        self.pool[index].clone()
    }
}

impl Iterator for OpGenerator {
    type Item = Op;

    fn next(&mut self) -> Option<Op> {
        Some(self.next_op())
    }
}
