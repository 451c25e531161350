//! # Overview
//! "Epinet" composes compartmental epidemic models from small building
//! blocks, and simulates the composite as a deterministic ODE, a chemical
//! Langevin SDE, or an exact jump process.
//!
//! This repository contains:
//!
//! * An epidemiology theory, with compartments (S, E, I, R, D) as object
//! types and processes (transmission, exposure, illness, recovery, death)
//! as typed generators.
//! * Petri nets and open Petri nets, with building block templates that
//! decorate each generator.
//! * Composition, through algebraic terms and wiring diagrams, glued into
//! one Petri net by `oapply`.
//! * Solvers for the mass action ODE, the chemical Langevin SDE, and the
//! jump process, with seeded random number generation and ensembles.
//! * Output analysis framework, for analyzing stochastic solver outputs
//! statistically.
//! * Scenarios, for describing complete experiments in YAML or JSON.
//!
//! Epinet is compatible with a wide variety of compilation targets,
//! including WASM, through `simulator::web::WebScenario`.
pub mod composition;
pub mod input_modeling;
pub mod nets;
pub mod output_analysis;
pub mod scenario;
pub mod simulator;
pub mod theory;
pub mod utils;
