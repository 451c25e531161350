//! The simulator module turns a Petri net into a dynamical system and
//! solves it.  One `Problem` (net, initial marking, time span, rate
//! constants) can be handed to any solver:
//!
//! - `OdeSolver` integrates the deterministic mass action equations
//! - `SdeSolver` samples the chemical Langevin equation
//! - `JumpSolver` samples the exact discrete-state jump process
//!
//! Every solver returns a `Trajectory`.  Solvers are trait objects behind
//! the `Solver` wrapper, which serializes as `{id, type, ...}` through the
//! `solver_factory` registry, so scenarios can name their solvers in YAML
//! or JSON and custom solvers can be registered alongside the built-in
//! ones.  `Services` carries the seeded random number generator that all
//! stochastic solvers draw from.

pub mod ensemble;
pub mod jump;
pub mod ode;
pub mod problem;
pub mod sde;
pub mod services;
pub mod solver;
pub mod solver_factory;
pub mod solver_repr;
pub mod solver_trait;
pub mod trajectory;
pub mod web;

pub use self::ensemble::{Ensemble, EnsembleSummary};
pub use self::jump::{Aggregator, JumpSolver};
pub use self::ode::{OdeMethod, OdeSolver};
pub use self::problem::Problem;
pub use self::sde::{Callback, SdeSolver};
pub use self::services::Services;
pub use self::solver::Solver;
pub use self::solver_repr::SolverRepr;
pub use self::solver_trait::{
    Reportable, ReportableSolver, SerializableSolver, Solve, SolverClone,
};
pub use self::trajectory::{Interpolation, Trajectory};
pub use self::web::WebScenario;
