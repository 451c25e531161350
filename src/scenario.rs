//! A scenario is the complete, serializable description of an experiment:
//! the composite model as a term, the initial populations and rate
//! constants keyed by name, the time span, the seed, and the solvers to run.
//! Scenarios are read from and written to YAML or JSON.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::composition::{Term, WiringDiagram};
use crate::nets::{EpidemiologyBlocks, OpenPetriNet};
use crate::simulator::{
    JumpSolver, OdeSolver, Problem, Reportable, SdeSolver, Services, Solve, Solver, Trajectory,
};
use crate::utils::errors::SimulationError;

fn default_seed() -> u64 {
    crate::input_modeling::dynamic_rng::DEFAULT_SEED
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    name: String,
    model: Term,
    initial: BTreeMap<String, f64>,
    parameters: BTreeMap<String, f64>,
    tspan: (f64, f64),
    #[serde(default = "default_seed")]
    seed: u64,
    solvers: Vec<Solver>,
    /// Spacing of the output grid.  Solutions are reported at every solver
    /// step when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    samples: Option<f64>,
}

/// The solution of one solver of a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub id: String,
    pub status: String,
    pub trajectory: Trajectory,
}

fn insert_all(values: &[(&str, f64)]) -> BTreeMap<String, f64> {
    values
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

impl Scenario {
    pub fn new(
        name: &str,
        model: Term,
        initial: BTreeMap<String, f64>,
        parameters: BTreeMap<String, f64>,
        tspan: (f64, f64),
        seed: u64,
        solvers: Vec<Solver>,
    ) -> Self {
        Self {
            name: name.to_string(),
            model,
            initial,
            parameters,
            tspan,
            seed,
            solvers,
            samples: None,
        }
    }

    /// The SIR tutorial: transmission then recovery, 990 susceptible and 10
    /// infected individuals over 40 time units, solved as an ODE, an SDE,
    /// and a jump process.
    pub fn sir_tutorial() -> Self {
        Self::new(
            "sir",
            Term::sir(),
            insert_all(&[("S", 990.0), ("I", 10.0), ("R", 0.0)]),
            insert_all(&[("transmission", 0.005), ("recovery", 0.25)]),
            (0.0, 40.0),
            1234,
            vec![
                Solver::new(String::from("ode"), Box::new(OdeSolver::default())),
                Solver::new(String::from("sde"), Box::new(SdeSolver::default())),
                Solver::new(String::from("jump"), Box::new(JumpSolver::default())),
            ],
        )
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, SimulationError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a scenario file, choosing the format by extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&std::fs::read_to_string(path)?),
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?),
            _ => Err(SimulationError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }

    pub fn to_yaml(&self) -> Result<String, SimulationError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &Term {
        &self.model
    }

    pub fn tspan(&self) -> (f64, f64) {
        self.tspan
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn solvers(&self) -> &[Solver] {
        &self.solvers
    }

    pub fn samples(&self) -> Option<f64> {
        self.samples
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Move the end of the time span.  Validated when the problem is built.
    pub fn set_tmax(&mut self, tmax: f64) {
        self.tspan.1 = tmax;
    }

    pub fn set_samples(&mut self, samples: Option<f64>) {
        self.samples = samples;
    }

    pub fn diagram(&self) -> Result<WiringDiagram, SimulationError> {
        WiringDiagram::from_term(&self.model)
    }

    /// Decorate the model with the epidemiology building blocks.
    pub fn compose(&self) -> Result<OpenPetriNet, SimulationError> {
        self.diagram()?.oapply(&EpidemiologyBlocks)
    }

    pub fn problem(&self) -> Result<Problem, SimulationError> {
        Problem::with_named_values(
            self.compose()?.into_apex(),
            &self.initial,
            self.tspan,
            &self.parameters,
        )
    }

    fn solve(&mut self, problem: &Problem, index: usize) -> Result<Run, SimulationError> {
        let samples = self.samples;
        let seed = self.seed;
        let solver = &mut self.solvers[index];
        let mut services = Services::seeded(seed);
        let mut trajectory = solver.solve(problem, &mut services)?;
        if let Some(spacing) = samples {
            trajectory = trajectory.sample_every(spacing)?;
        }
        tracing::info!(
            solver = solver.id(),
            points = trajectory.len(),
            status = %solver.status(),
            "solved"
        );
        Ok(Run {
            id: solver.id().to_string(),
            status: solver.status(),
            trajectory,
        })
    }

    /// Solve the problem with every solver, in order.  Each solver starts
    /// from a fresh random stream seeded with the scenario seed, so the
    /// result of one solver does not depend on the others.
    pub fn run(&mut self) -> Result<Vec<Run>, SimulationError> {
        let problem = self.problem()?;
        tracing::info!(
            scenario = %self.name,
            species = problem.net().species_count(),
            transitions = problem.net().transition_count(),
            seed = self.seed,
            "running scenario"
        );
        (0..self.solvers.len())
            .map(|index| self.solve(&problem, index))
            .collect()
    }

    /// Solve the problem with one solver, by ID.
    pub fn run_solver(&mut self, solver_id: &str) -> Result<Run, SimulationError> {
        let index = self
            .solvers
            .iter()
            .position(|solver| solver.id() == solver_id)
            .ok_or(SimulationError::SolverNotFound)?;
        let problem = self.problem()?;
        self.solve(&problem, index)
    }

    /// The status of one solver, by ID.
    pub fn status(&self, solver_id: &str) -> Result<String, SimulationError> {
        self.solvers
            .iter()
            .find(|solver| solver.id() == solver_id)
            .map(|solver| solver.status())
            .ok_or(SimulationError::SolverNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tutorial_problem_follows_the_composed_net() {
        let problem = Scenario::sir_tutorial().problem().unwrap();
        assert_eq!(problem.net().species(), &["S", "I", "R"]);
        assert_eq!(problem.u0(), &[990.0, 10.0, 0.0]);
        assert_eq!(problem.params(), &[0.005, 0.25]);
        assert_eq!(problem.tspan(), (0.0, 40.0));
    }

    #[test]
    fn runs_are_independent_of_solver_order() {
        let mut scenario = Scenario::sir_tutorial();
        let all = scenario.run().unwrap();
        let jump = scenario.run_solver("jump").unwrap();
        assert_eq!(all[2].trajectory, jump.trajectory);
        assert!(scenario.status("jump").unwrap().starts_with("Fired"));
        assert!(matches!(
            scenario.run_solver("missing"),
            Err(SimulationError::SolverNotFound)
        ));
    }

    #[test]
    fn samples_resample_every_run() {
        let mut scenario = Scenario::sir_tutorial();
        scenario.set_samples(Some(10.0));
        for run in scenario.run().unwrap() {
            assert_eq!(run.trajectory.times(), &[0.0, 10.0, 20.0, 30.0, 40.0]);
        }
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        assert!(matches!(
            Scenario::from_path("scenario.toml"),
            Err(SimulationError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn bad_overrides_fail_at_problem_construction() {
        let mut scenario = Scenario::sir_tutorial();
        scenario.set_tmax(-1.0);
        assert!(matches!(
            scenario.problem(),
            Err(SimulationError::InvalidTimeSpan(_, _))
        ));
    }
}
