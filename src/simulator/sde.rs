use serde::{Deserialize, Serialize};

use super::solver_trait::{Reportable, ReportableSolver, SerializableSolver, Solve};
use super::trajectory::Interpolation;
use super::{Problem, Services, Trajectory};
use crate::input_modeling::ContinuousRandomVariable;
use crate::utils::errors::SimulationError;

use epinet_derive::SerializableSolver;

/// Callbacks run after every accepted step, and may adjust the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Callback {
    /// Project negative components back to zero.  Populations cannot be
    /// negative, but the Gaussian noise of the Langevin equation can push
    /// small compartments below zero.
    PositiveDomain,
}

impl Callback {
    fn apply(&self, state: &mut [f64]) -> usize {
        match self {
            Callback::PositiveDomain => {
                let mut projected = 0;
                for value in state.iter_mut().filter(|value| **value < 0.0) {
                    *value = 0.0;
                    projected += 1;
                }
                projected
            }
        }
    }
}

fn default_dt() -> f64 {
    0.01
}

fn default_callbacks() -> Vec<Callback> {
    vec![Callback::PositiveDomain]
}

/// The SDE solver integrates the chemical Langevin equation of the net,
/// `du = Σ_j (out_j - in_j) (a_j(u) dt + √a_j(u) dW_j)`, with the
/// Euler-Maruyama scheme and independent Wiener increments per transition.
/// The drift is the mass action ODE, so the noise vanishes as populations
/// grow.
#[derive(Debug, Clone, Serialize, Deserialize, SerializableSolver)]
#[serde(rename_all = "camelCase")]
pub struct SdeSolver {
    #[serde(default = "default_dt")]
    dt: f64,
    #[serde(default = "default_callbacks")]
    callbacks: Vec<Callback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saveat: Option<f64>,
    #[serde(skip)]
    state: State,
}

#[derive(Debug, Clone, Default)]
struct State {
    steps: usize,
    projections: usize,
    final_time: Option<f64>,
}

impl Default for SdeSolver {
    fn default() -> Self {
        Self::new(default_dt(), default_callbacks(), None)
    }
}

impl SdeSolver {
    pub fn new(dt: f64, callbacks: Vec<Callback>, saveat: Option<f64>) -> Self {
        Self {
            dt,
            callbacks,
            saveat,
            state: State::default(),
        }
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn callbacks(&self) -> &[Callback] {
        &self.callbacks
    }
}

impl Solve for SdeSolver {
    fn solve(
        &mut self,
        problem: &Problem,
        services: &mut Services,
    ) -> Result<Trajectory, SimulationError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimulationError::InvalidSolverConfiguration(format!(
                "dt must be positive, got {}",
                self.dt
            )));
        }
        self.state = State::default();
        let net = problem.net();
        let stoichiometry = net.stoichiometry();
        let rng = services.global_rng();
        let (t0, t1) = problem.tspan();
        let mut trajectory = Trajectory::new(net.species().to_vec(), Interpolation::Linear);
        let mut state = problem.u0().to_vec();
        trajectory.push(t0, &state);

        let mut time = t0;
        let mut step = 0usize;
        while time < t1 {
            step += 1;
            let next = (t0 + step as f64 * self.dt).min(t1);
            let h = next - time;
            let wiener = ContinuousRandomVariable::Normal {
                mean: 0.0,
                std_dev: h.sqrt(),
            };
            let rates = net.mass_action_rates(&state, problem.params());
            for (rate, change) in rates.iter().zip(stoichiometry.iter()) {
                let increment = rate * h + rate.sqrt() * wiener.random_variate(&rng)?;
                for (value, delta) in state.iter_mut().zip(change.iter()) {
                    *value += *delta as f64 * increment;
                }
            }
            for callback in &self.callbacks {
                self.state.projections += callback.apply(&mut state);
            }
            time = next;
            if !state.iter().all(|value| value.is_finite()) {
                return Err(SimulationError::NonFiniteState(time));
            }
            trajectory.push(time, &state);
            self.state.steps += 1;
        }
        self.state.final_time = Some(time);
        tracing::debug!(
            steps = self.state.steps,
            projections = self.state.projections,
            seed = services.seed(),
            "integrated chemical Langevin SDE"
        );
        match self.saveat {
            Some(spacing) => trajectory.sample_every(spacing),
            None => Ok(trajectory),
        }
    }
}

impl Reportable for SdeSolver {
    fn status(&self) -> String {
        match self.state.final_time {
            Some(time) => format!(
                "Integrated to t = {} in {} steps ({} projections)",
                time, self.state.steps, self.state.projections
            ),
            None => String::from("Idle"),
        }
    }
}

impl ReportableSolver for SdeSolver {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nets::PetriNet;

    fn decay() -> Problem {
        let mut net = PetriNet::new();
        let i = net.add_species("I");
        let r = net.add_species("R");
        net.add_transition_from_places("recovery", &[i], &[r])
            .unwrap();
        Problem::new(net, vec![5.0, 0.0], (0.0, 10.0), vec![1.0]).unwrap()
    }

    #[test]
    fn positive_domain_keeps_populations_non_negative() {
        let mut solver = SdeSolver::new(0.05, vec![Callback::PositiveDomain], None);
        for seed in 0..20 {
            let trajectory = solver
                .solve(&decay(), &mut Services::seeded(seed))
                .unwrap();
            assert!(trajectory
                .states()
                .iter()
                .all(|state| state.iter().all(|value| *value >= 0.0)));
        }
    }

    #[test]
    fn noise_conserves_the_total_without_callbacks() {
        let mut solver = SdeSolver::new(0.01, vec![], None);
        let trajectory = solver.solve(&decay(), &mut Services::seeded(3)).unwrap();
        // Every increment moves mass between I and R.
        assert!(trajectory
            .states()
            .iter()
            .all(|state| (state[0] + state[1] - 5.0).abs() < 1.0e-9));
        assert_eq!(trajectory.final_time(), Some(10.0));
    }

    #[test]
    fn same_seed_same_path() {
        let mut solver = SdeSolver::default();
        let a = solver.solve(&decay(), &mut Services::seeded(1234)).unwrap();
        let b = solver.solve(&decay(), &mut Services::seeded(1234)).unwrap();
        let c = solver.solve(&decay(), &mut Services::seeded(4321)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let solver: SdeSolver = serde_yaml::from_str("dt: 0.02").unwrap();
        assert_eq!(solver.dt(), 0.02);
        assert_eq!(solver.callbacks(), &[Callback::PositiveDomain]);
        let solver: SdeSolver = serde_yaml::from_str("callbacks: []").unwrap();
        assert!(solver.callbacks().is_empty());
    }
}
