//! Main simulator harness for deterministic simulation testing.
//!
//! Drives a [`BTree`] with generated operations, mirrors each one on the
//! model and checks invariants after every step.

use crate::index::{BTree, Order};

use super::invariants::{InvariantChecker, InvariantViolation, Model};
use super::op_gen::{Op, OpGenConfig, OpGenerator};

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Order of the simulated tree.
    pub order: Order,
    /// Operation generation configuration.
    pub op_config: OpGenConfig,
}

impl SimulatorConfig {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            order: Order::DEFAULT,
            op_config: OpGenConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub const fn with_op_config(mut self, config: OpGenConfig) -> Self {
        self.op_config = config;
        self
    }
}

/// Results from a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The seed used for this simulation.
    pub seed: u64,
    /// Number of operations applied.
    pub ops_processed: u64,
    /// Inserts of new names and deletes of present names.
    pub successful_ops: u64,
    /// Duplicate inserts and deletes of absent names.
    pub failed_ops: u64,
    /// Largest height reached.
    pub max_height: usize,
    /// Violations detected, with the step they were found at.
    pub invariant_violations: Vec<(u64, InvariantViolation)>,
}

impl SimulationResult {
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.invariant_violations.is_empty()
    }
}

/// The simulator harness.
pub struct Simulator {
    config: SimulatorConfig,
    generator: OpGenerator,
    tree: BTree<String>,
    model: Model,
}

impl Simulator {
    #[must_use]
    pub fn new(config: SimulatorConfig) -> Self {
        let generator = OpGenerator::with_config(config.seed, config.op_config.clone());
        let tree = BTree::with_order(config.order);

        Self {
            config,
            generator,
            tree,
            model: Model::new(),
        }
    }

    #[must_use]
    pub const fn tree(&self) -> &BTree<String> {
        &self.tree
    }

    /// Apply `op_count` operations and collect any violations.
    ///
    /// Stops at the first structural violation, since later steps would
    /// only report its consequences.
    pub fn run(&mut self, op_count: u64) -> SimulationResult {
        let mut result = SimulationResult {
            seed: self.config.seed,
            ops_processed: 0,
            successful_ops: 0,
            failed_ops: 0,
            max_height: 0,
            invariant_violations: Vec::new(),
        };

        for step in 0..op_count {
            let op = self.generator.next_op();
            let outcome = self.apply(&op);
            result.ops_processed += 1;

            match outcome {
                Ok(true) => result.successful_ops += 1,
                Ok(false) => result.failed_ops += 1,
                Err(violation) => result.invariant_violations.push((step, violation)),
            }

            if let Err(violation) = InvariantChecker::check(&self.tree, &self.model) {
                tracing::warn!(seed = self.config.seed, step, ?op, %violation, "invariant violated");
                result.invariant_violations.push((step, violation));
                break;
            }
            result.max_height = result.max_height.max(self.tree.height());
        }

        tracing::debug!(
            seed = self.config.seed,
            ops = result.ops_processed,
            violations = result.invariant_violations.len(),
            "simulation finished"
        );
        result
    }

    /// Apply one operation to both the tree and the model.
    ///
    /// Returns whether the operation took effect.
    fn apply(&mut self, op: &Op) -> Result<bool, InvariantViolation> {
        let (applied, expected) = match op {
            Op::Insert(name) => {
                let applied = self.tree.insert(name.clone()).is_ok();
                (applied, self.model.insert(name))
            }
            Op::Delete(name) => {
                let before = (!self.model.contains(name)).then(|| format!("{:?}", self.tree));
                let applied = self.tree.delete(name).is_some();
                if let Some(before) = before
                    && before != format!("{:?}", self.tree)
                {
                    return Err(InvariantViolation::ShapeChanged { name: name.clone() });
                }
                (applied, self.model.delete(name))
            }
            Op::Search(name) => {
                let found = self.tree.search(name).is_some();
                (found, self.model.contains(name))
            }
        };

        if applied == expected {
            Ok(applied)
        } else {
            Err(InvariantViolation::WrongResult {
                op: format!("{op:?}"),
                expected,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_many_seeds_and_orders() {
        for t in 2..=5 {
            let order = Order::new(t).unwrap();
            for seed in 0..20 {
                let mut sim = Simulator::new(SimulatorConfig::new(seed).with_order(order));
                let result = sim.run(2_000);
                assert!(
                    result.passed(),
                    "t={t} seed={seed}: {:?}",
                    result.invariant_violations
                );
                assert_eq!(result.ops_processed, 2_000);
            }
        }
    }

    #[test]
    fn test_insert_heavy_run_grows_tree() {
        let config = OpGenConfig {
            insert_rate: 0.9,
            delete_rate: 0.05,
            name_pool_size: 500,
        };
        let order = Order::new(2).unwrap();
        let mut sim = Simulator::new(
            SimulatorConfig::new(99)
                .with_order(order)
                .with_op_config(config),
        );

        let result = sim.run(3_000);
        assert!(result.passed(), "{:?}", result.invariant_violations);
        assert!(result.max_height >= 4, "height {}", result.max_height);
        assert!(sim.tree().len() > 100);
    }

    #[test]
    fn test_delete_heavy_run_drains_tree() {
        let fill = OpGenConfig {
            insert_rate: 1.0,
            delete_rate: 0.0,
            name_pool_size: 64,
        };
        let drain = OpGenConfig {
            insert_rate: 0.0,
            delete_rate: 1.0,
            name_pool_size: 64,
        };

        let order = Order::new(3).unwrap();
        let mut sim = Simulator::new(SimulatorConfig::new(5).with_order(order).with_op_config(fill));
        assert!(sim.run(1_000).passed());

        // Same seed, same pool: the drain phase deletes the names just inserted.
        let mut drain_sim = Simulator::new(
            SimulatorConfig::new(5)
                .with_order(order)
                .with_op_config(drain),
        );
        drain_sim.tree = std::mem::take(&mut sim.tree);
        drain_sim.model = std::mem::take(&mut sim.model);

        let result = drain_sim.run(5_000);
        assert!(result.passed(), "{:?}", result.invariant_violations);
        assert!(drain_sim.tree().is_empty());
        assert!(drain_sim.tree().root().is_none());
    }

    #[test]
    fn test_runs_are_deterministic() {
        let a = Simulator::new(SimulatorConfig::new(11)).run(500);
        let b = Simulator::new(SimulatorConfig::new(11)).run(500);
        assert_eq!(a.successful_ops, b.successful_ops);
        assert_eq!(a.failed_ops, b.failed_ops);
        assert_eq!(a.max_height, b.max_height);
    }
}
