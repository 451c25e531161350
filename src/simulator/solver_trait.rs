use super::{Problem, Services, Trajectory};
use crate::utils::errors::SimulationError;

pub trait SolverClone {
    fn clone_box(&self) -> Box<dyn ReportableSolver>;
}

impl<T> SolverClone for T
where
    T: 'static + ReportableSolver + Clone,
{
    fn clone_box(&self) -> Box<dyn ReportableSolver> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn ReportableSolver> {
    fn clone(&self) -> Box<dyn ReportableSolver> {
        self.clone_box()
    }
}

pub trait SerializableSolver {
    fn get_type(&self) -> &'static str {
        "Solver"
    }
    fn serialize(&self) -> serde_yaml::Value {
        serde_yaml::Value::Null
    }
}

/// The `Solve` trait turns a problem into a trajectory.  How the net is
/// interpreted (as an ODE, an SDE, or a jump process) is up to the solver;
/// any randomness must come from `services`, so a seed reproduces a solve.
pub trait Solve: SolverClone + SerializableSolver {
    fn solve(
        &mut self,
        problem: &Problem,
        services: &mut Services,
    ) -> Result<Trajectory, SimulationError>;
}

/// Status reporting does not impact solver results.
pub trait Reportable {
    fn status(&self) -> String;
}

/// A `ReportableSolver` can both solve problems and report its status.
pub trait ReportableSolver: Solve + Reportable {}
