use rand::Rng;
use serde::{Deserialize, Serialize};

use super::solver_trait::{Reportable, ReportableSolver, SerializableSolver, Solve};
use super::trajectory::Interpolation;
use super::{Problem, Services, Trajectory};
use crate::input_modeling::{ContinuousRandomVariable, DynRng};
use crate::utils::errors::SimulationError;

use epinet_derive::SerializableSolver;

/// Exact stochastic simulation algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Aggregator {
    /// Gillespie's direct method: one exponential waiting time at the total
    /// propensity, then one transition chosen in proportion to its
    /// propensity.
    Direct,
    /// Gillespie's first reaction method: one exponential waiting time per
    /// enabled transition, and the earliest fires.
    FirstReaction,
}

impl Default for Aggregator {
    fn default() -> Self {
        Aggregator::Direct
    }
}

impl Aggregator {
    /// The waiting time and index of the next transition, or `None` when
    /// no transition is enabled.
    fn next_event(
        &self,
        propensities: &[f64],
        rng: &DynRng,
    ) -> Result<Option<(f64, usize)>, SimulationError> {
        let total: f64 = propensities.iter().sum();
        if total <= 0.0 {
            return Ok(None);
        }
        match self {
            Aggregator::Direct => {
                let waiting = ContinuousRandomVariable::Exp { lambda: total }.random_variate(rng)?;
                let target = rng.borrow_mut().gen::<f64>() * total;
                let mut cumulative = 0.0;
                let mut chosen = None;
                for (index, propensity) in propensities.iter().enumerate() {
                    if *propensity <= 0.0 {
                        continue;
                    }
                    chosen = Some(index);
                    cumulative += propensity;
                    if target < cumulative {
                        break;
                    }
                }
                // Rounding can leave the target just past the final sum, in
                // which case the last enabled transition fires.
                Ok(chosen.map(|index| (waiting, index)))
            }
            Aggregator::FirstReaction => {
                let mut earliest: Option<(f64, usize)> = None;
                for (index, propensity) in propensities.iter().enumerate() {
                    if *propensity <= 0.0 {
                        continue;
                    }
                    let waiting =
                        ContinuousRandomVariable::Exp { lambda: *propensity }.random_variate(rng)?;
                    if earliest.map_or(true, |(best, _)| waiting < best) {
                        earliest = Some((waiting, index));
                    }
                }
                Ok(earliest)
            }
        }
    }
}

fn default_max_events() -> usize {
    1_000_000
}

/// The jump solver samples the discrete-state continuous-time Markov chain
/// of the net, where each transition fires at its combinatorial mass action
/// propensity and moves whole individuals between species.
#[derive(Debug, Clone, Serialize, Deserialize, SerializableSolver)]
#[serde(rename_all = "camelCase")]
pub struct JumpSolver {
    #[serde(default)]
    aggregator: Aggregator,
    #[serde(default = "default_max_events")]
    max_events: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saveat: Option<f64>,
    #[serde(skip)]
    state: State,
}

#[derive(Debug, Clone, Default)]
struct State {
    events: usize,
    final_time: Option<f64>,
}

impl Default for JumpSolver {
    fn default() -> Self {
        Self::new(Aggregator::Direct, default_max_events(), None)
    }
}

impl JumpSolver {
    pub fn new(aggregator: Aggregator, max_events: usize, saveat: Option<f64>) -> Self {
        Self {
            aggregator,
            max_events,
            saveat,
            state: State::default(),
        }
    }

    pub fn aggregator(&self) -> Aggregator {
        self.aggregator
    }

    pub fn max_events(&self) -> usize {
        self.max_events
    }

    pub fn events(&self) -> usize {
        self.state.events
    }
}

impl Solve for JumpSolver {
    fn solve(
        &mut self,
        problem: &Problem,
        services: &mut Services,
    ) -> Result<Trajectory, SimulationError> {
        let net = problem.net();
        for (species, value) in net.species().iter().zip(problem.u0()) {
            if value.fract() != 0.0 {
                return Err(SimulationError::NonIntegerMarking {
                    species: species.clone(),
                    value: *value,
                });
            }
        }
        self.state = State::default();
        let stoichiometry = net.stoichiometry();
        let rng = services.global_rng();
        let (t0, t1) = problem.tspan();
        let mut trajectory = Trajectory::new(net.species().to_vec(), Interpolation::Step);
        let mut marking = problem.u0().to_vec();
        trajectory.push(t0, &marking);

        let mut time = t0;
        loop {
            let propensities = net.propensities(&marking, problem.params());
            let (waiting, transition) = match self.aggregator.next_event(&propensities, &rng)? {
                Some(event) => event,
                None => break,
            };
            if time + waiting > t1 {
                break;
            }
            if self.state.events == self.max_events {
                return Err(SimulationError::EventLimitExceeded(self.max_events));
            }
            time += waiting;
            for (value, delta) in marking.iter_mut().zip(&stoichiometry[transition]) {
                *value += *delta as f64;
            }
            trajectory.push(time, &marking);
            self.state.events += 1;
        }
        if trajectory.final_time().map_or(true, |last| last < t1) {
            trajectory.push(t1, &marking);
        }
        self.state.final_time = Some(t1);
        tracing::debug!(
            events = self.state.events,
            seed = services.seed(),
            "sampled jump process"
        );
        match self.saveat {
            Some(spacing) => trajectory.sample_every(spacing),
            None => Ok(trajectory),
        }
    }
}

impl Reportable for JumpSolver {
    fn status(&self) -> String {
        match self.state.final_time {
            Some(time) => format!("Fired {} events up to t = {}", self.state.events, time),
            None => String::from("Idle"),
        }
    }
}

impl ReportableSolver for JumpSolver {}
