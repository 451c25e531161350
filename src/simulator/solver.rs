use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::solver_trait::{Reportable, ReportableSolver, SerializableSolver, Solve};
use super::{Problem, Services, Trajectory};
use crate::utils::errors::SimulationError;

/// `Solver` wraps a concrete solver and provides common ID functionality
/// (a struct field and associated accessor method).  Scenarios refer to
/// their runs by solver ID.
#[derive(Clone)]
pub struct Solver {
    id: String,
    inner: Box<dyn ReportableSolver>,
}

impl Solver {
    pub fn new(id: String, inner: Box<dyn ReportableSolver>) -> Self {
        Self { id, inner }
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl std::fmt::Debug for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("id", &self.id)
            .field("type", &self.inner.get_type())
            .finish()
    }
}

impl Serialize for Solver {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra_fields: serde_yaml::Value = self.inner.serialize();
        let mut solver = serializer.serialize_map(None)?;
        solver.serialize_entry("id", &self.id)?;
        solver.serialize_entry("type", self.inner.get_type())?;
        if let serde_yaml::Value::Mapping(map) = extra_fields {
            for (key, value) in map.iter() {
                solver.serialize_entry(&key, &value)?;
            }
        }
        solver.end()
    }
}

impl<'de> Deserialize<'de> for Solver {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = super::SolverRepr::deserialize(deserializer)?;
        let inner = super::solver_factory::create::<D>(&repr.kind, repr.config)?;
        Ok(Solver::new(repr.id, inner))
    }
}

impl SerializableSolver for Solver {
    fn get_type(&self) -> &'static str {
        self.inner.get_type()
    }

    fn serialize(&self) -> serde_yaml::Value {
        self.inner.serialize()
    }
}

impl Solve for Solver {
    fn solve(
        &mut self,
        problem: &Problem,
        services: &mut Services,
    ) -> Result<Trajectory, SimulationError> {
        tracing::debug!(solver = %self.id, kind = self.inner.get_type(), "solving");
        self.inner.solve(problem, services)
    }
}

impl Reportable for Solver {
    fn status(&self) -> String {
        self.inner.status()
    }
}

impl ReportableSolver for Solver {}
