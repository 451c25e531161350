//! The input modeling module provides a foundation for the stochastic
//! solvers.  The module includes the random variable distributions the
//! solvers sample from, and a structure around seeded random number
//! generation.

pub mod dynamic_rng;
pub mod random_variable;

pub use dynamic_rng::{dyn_rng, seeded_rng, DynRng, SimulationRng};
pub use random_variable::Continuous as ContinuousRandomVariable;
