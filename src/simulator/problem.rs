use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::nets::PetriNet;
use crate::utils::errors::SimulationError;

/// A simulation problem: a Petri net, its initial marking, the time span to
/// simulate, and one mass action rate constant per transition.  The same
/// problem is solved as an ODE, an SDE, or a jump process, depending on the
/// solver it is handed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    net: PetriNet,
    u0: Vec<f64>,
    tspan: (f64, f64),
    params: Vec<f64>,
}

fn check_value(name: &str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidValue {
            name: name.to_string(),
            value,
        })
    }
}

impl Problem {
    /// Construct a problem, validating the marking and parameters against
    /// the net, and the time span.
    pub fn new(
        net: PetriNet,
        u0: Vec<f64>,
        tspan: (f64, f64),
        params: Vec<f64>,
    ) -> Result<Self, SimulationError> {
        if u0.len() != net.species_count() {
            return Err(SimulationError::InitialStateLength {
                expected: net.species_count(),
                got: u0.len(),
            });
        }
        if params.len() != net.transition_count() {
            return Err(SimulationError::ParameterLength {
                expected: net.transition_count(),
                got: params.len(),
            });
        }
        let (t0, t1) = tspan;
        if !(t0.is_finite() && t1.is_finite() && t0 < t1) {
            return Err(SimulationError::InvalidTimeSpan(t0, t1));
        }
        for (name, value) in net.species().iter().zip(u0.iter()) {
            check_value(name, *value)?;
        }
        for (transition, value) in net.transitions().iter().zip(params.iter()) {
            check_value(&transition.name, *value)?;
        }
        Ok(Self {
            net,
            u0,
            tspan,
            params,
        })
    }

    /// Construct a problem from values keyed by species and transition
    /// names.  Every species and transition needs a value, and every key
    /// must name one.
    pub fn with_named_values(
        net: PetriNet,
        initial: &BTreeMap<String, f64>,
        tspan: (f64, f64),
        parameters: &BTreeMap<String, f64>,
    ) -> Result<Self, SimulationError> {
        for name in initial.keys() {
            net.species_index(name)?;
        }
        for name in parameters.keys() {
            net.transition_index(name)?;
        }
        let u0 = net
            .species()
            .iter()
            .map(|name| {
                initial
                    .get(name)
                    .copied()
                    .ok_or_else(|| SimulationError::MissingValue(name.clone()))
            })
            .collect::<Result<Vec<f64>, SimulationError>>()?;
        let params = net
            .transitions()
            .iter()
            .map(|transition| {
                parameters
                    .get(&transition.name)
                    .copied()
                    .ok_or_else(|| SimulationError::MissingValue(transition.name.clone()))
            })
            .collect::<Result<Vec<f64>, SimulationError>>()?;
        Self::new(net, u0, tspan, params)
    }

    /// The same problem over a different time span.
    pub fn with_tspan(&self, tspan: (f64, f64)) -> Result<Self, SimulationError> {
        Self::new(self.net.clone(), self.u0.clone(), tspan, self.params.clone())
    }

    pub fn net(&self) -> &PetriNet {
        &self.net
    }

    pub fn u0(&self) -> &[f64] {
        &self.u0
    }

    pub fn tspan(&self) -> (f64, f64) {
        self.tspan
    }

    pub fn params(&self) -> &[f64] {
        &self.params
    }
}
