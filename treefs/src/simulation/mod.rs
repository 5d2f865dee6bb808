//! Deterministic simulation testing for the directory index.
//!
//! - Reproducible random operation generation
//! - A reference model every operation is mirrored on
//! - Invariant checking after each operation
//!
//! Given the same seed, execution is identical, so a failing seed can be
//! replayed on its own.
//!
//! # Usage
//!
//! ```
//! use treefs::index::Order;
//! use treefs::simulation::{Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig::new(12345).with_order(Order::new(2).unwrap());
//! let mut sim = Simulator::new(config);
//! let result = sim.run(1000);
//!
//! assert!(result.passed());
//! ```

mod invariants;
mod op_gen;
mod simulator;

pub use invariants::{InvariantChecker, InvariantViolation, Model};
pub use op_gen::{Op, OpGenConfig, OpGenerator};
pub use simulator::{SimulationResult, Simulator, SimulatorConfig};
