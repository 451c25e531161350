use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lazy_static::lazy_static;
use serde::de;
use serde::Deserializer;

use super::solver_trait::ReportableSolver;

/// Builds a solver from its configuration keys, reporting why a
/// configuration was rejected.
pub type SolverConstructor =
    fn(serde_yaml::Value) -> Result<Box<dyn ReportableSolver>, serde_yaml::Error>;

/// The built-in solver types.  Custom registrations are accepted by
/// `create` but not listed in unknown-variant errors.
static VARIANTS: &[&str] = &["OdeSolver", "SdeSolver", "JumpSolver"];

lazy_static! {
    static ref CONSTRUCTORS: Mutex<HashMap<&'static str, SolverConstructor>> = {
        let mut m = HashMap::new();
        m.insert("OdeSolver", super::OdeSolver::from_value as SolverConstructor);
        m.insert("SdeSolver", super::SdeSolver::from_value as SolverConstructor);
        m.insert("JumpSolver", super::JumpSolver::from_value as SolverConstructor);
        Mutex::new(m)
    };
}

fn constructors() -> MutexGuard<'static, HashMap<&'static str, SolverConstructor>> {
    CONSTRUCTORS.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn register(solver_type: &'static str, solver_constructor: SolverConstructor) {
    constructors().insert(solver_type, solver_constructor);
}

pub fn is_registered(solver_type: &str) -> bool {
    constructors().contains_key(solver_type)
}

pub fn create<'de, D: Deserializer<'de>>(
    solver_type: &str,
    extra_fields: serde_yaml::Value,
) -> Result<Box<dyn ReportableSolver>, D::Error> {
    let constructor = constructors().get(solver_type).copied();
    match constructor {
        Some(constructor) => constructor(extra_fields).map_err(|err| {
            de::Error::custom(format!(
                "invalid configuration for solver type `{}`: {}",
                solver_type, err
            ))
        }),
        None => Err(de::Error::unknown_variant(solver_type, VARIANTS)),
    }
}
