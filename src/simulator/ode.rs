use serde::{Deserialize, Serialize};

use super::solver_trait::{Reportable, ReportableSolver, SerializableSolver, Solve};
use super::trajectory::Interpolation;
use super::{Problem, Services, Trajectory};
use crate::nets::PetriNet;
use crate::utils::errors::SimulationError;

use epinet_derive::SerializableSolver;

/// Explicit Runge-Kutta methods for the mass action ODE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OdeMethod {
    /// The classic fourth order method, with a fixed step
    Rk4 { dt: f64 },
    /// The adaptive Dormand-Prince 5(4) pair
    #[serde(rename_all = "camelCase")]
    DormandPrince {
        rtol: f64,
        atol: f64,
        initial_dt: f64,
    },
}

impl Default for OdeMethod {
    fn default() -> Self {
        OdeMethod::Rk4 { dt: 0.1 }
    }
}

impl OdeMethod {
    pub fn dormand_prince() -> Self {
        OdeMethod::DormandPrince {
            rtol: 1.0e-6,
            atol: 1.0e-8,
            initial_dt: 0.01,
        }
    }

    fn validate(&self) -> Result<(), SimulationError> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SimulationError::InvalidSolverConfiguration(format!(
                    "{} must be positive, got {}",
                    name, value
                )))
            }
        };
        match self {
            OdeMethod::Rk4 { dt } => positive("dt", *dt),
            OdeMethod::DormandPrince {
                rtol,
                atol,
                initial_dt,
            } => {
                positive("rtol", *rtol)?;
                positive("atol", *atol)?;
                positive("initialDt", *initial_dt)
            }
        }
    }
}

/// The ODE solver integrates the deterministic mass action dynamics of the
/// net, `du/dt = Σ_j k_j Π_i u_i^m_ij (out_j - in_j)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, SerializableSolver)]
#[serde(rename_all = "camelCase")]
pub struct OdeSolver {
    #[serde(default)]
    method: OdeMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saveat: Option<f64>,
    #[serde(skip)]
    state: State,
}

#[derive(Debug, Clone, Default)]
struct State {
    accepted: usize,
    rejected: usize,
    final_time: Option<f64>,
}

impl OdeSolver {
    pub fn new(method: OdeMethod, saveat: Option<f64>) -> Self {
        Self {
            method,
            saveat,
            state: State::default(),
        }
    }

    pub fn method(&self) -> &OdeMethod {
        &self.method
    }

    fn integrate_rk4(
        &mut self,
        problem: &Problem,
        dt: f64,
        trajectory: &mut Trajectory,
    ) -> Result<(), SimulationError> {
        let (t0, t1) = problem.tspan();
        let mut system = System::new(problem.net(), problem.params());
        let mut state = problem.u0().to_vec();
        let mut step = 0usize;
        let mut time = t0;
        while time < t1 {
            step += 1;
            // Recompute from the step count, so long runs do not accumulate
            // rounding in the time grid.
            let next = (t0 + step as f64 * dt).min(t1);
            state = system.rk4_step(&state, next - time);
            time = next;
            check_finite(&state, time)?;
            trajectory.push(time, &state);
            self.state.accepted += 1;
        }
        Ok(())
    }

    fn integrate_dormand_prince(
        &mut self,
        problem: &Problem,
        rtol: f64,
        atol: f64,
        initial_dt: f64,
        trajectory: &mut Trajectory,
    ) -> Result<(), SimulationError> {
        let (t0, t1) = problem.tspan();
        let mut system = System::new(problem.net(), problem.params());
        let mut state = problem.u0().to_vec();
        let mut time = t0;
        let mut dt = initial_dt.min(t1 - t0);
        while time < t1 {
            if dt < 1.0e-12 * time.abs().max(1.0) {
                return Err(SimulationError::StepSizeUnderflow(time));
            }
            let h = dt.min(t1 - time);
            let (candidate, error) = system.dormand_prince_step(&state, h);
            let norm = error_norm(&state, &candidate, &error, rtol, atol);
            if !norm.is_finite() {
                check_finite(&candidate, time + h)?;
            }
            if norm <= 1.0 {
                time = if t1 - (time + h) <= 1.0e-12 * t1.abs().max(1.0) {
                    t1
                } else {
                    time + h
                };
                state = candidate;
                check_finite(&state, time)?;
                trajectory.push(time, &state);
                self.state.accepted += 1;
                dt = h * step_factor(norm, 10.0);
            } else {
                self.state.rejected += 1;
                dt = h * step_factor(norm, 1.0);
            }
        }
        Ok(())
    }
}

/// The usual `0.9 err^(-1/5)` controller, clamped to `[0.2, max]`.
fn step_factor(norm: f64, max: f64) -> f64 {
    if norm == 0.0 {
        return max;
    }
    (0.9 * norm.powf(-0.2)).max(0.2).min(max)
}

fn error_norm(state: &[f64], candidate: &[f64], error: &[f64], rtol: f64, atol: f64) -> f64 {
    if state.is_empty() {
        return 0.0;
    }
    let sum: f64 = state
        .iter()
        .zip(candidate)
        .zip(error)
        .map(|((y, y_new), e)| {
            let scale = atol + rtol * y.abs().max(y_new.abs());
            (e / scale).powi(2)
        })
        .sum();
    (sum / state.len() as f64).sqrt()
}

fn check_finite(state: &[f64], time: f64) -> Result<(), SimulationError> {
    if state.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(SimulationError::NonFiniteState(time))
    }
}

// Dormand-Prince tableau.  The field is autonomous, so the nodes are unused.
const A: [[f64; 6]; 7] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
        0.0,
    ],
    [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
    ],
];
/// Fifth order weights minus the embedded fourth order weights.
const E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

/// The mass action vector field of a net, with scratch space for stages.
struct System<'a> {
    net: &'a PetriNet,
    params: &'a [f64],
    stages: Vec<Vec<f64>>,
    scratch: Vec<f64>,
}

impl<'a> System<'a> {
    fn new(net: &'a PetriNet, params: &'a [f64]) -> Self {
        let species = net.species_count();
        Self {
            net,
            params,
            stages: vec![vec![0.0; species]; 7],
            scratch: vec![0.0; species],
        }
    }

    fn stage(&mut self, index: usize, state: &[f64], h: f64, weights: &[f64]) {
        let stages = &self.stages;
        for (i, value) in self.scratch.iter_mut().enumerate() {
            *value = state[i]
                + h * weights
                    .iter()
                    .enumerate()
                    .map(|(j, weight)| weight * stages[j][i])
                    .sum::<f64>();
        }
        self.net
            .vector_field(&self.scratch, self.params, &mut self.stages[index]);
    }

    fn rk4_step(&mut self, state: &[f64], h: f64) -> Vec<f64> {
        self.stage(0, state, h, &[]);
        self.stage(1, state, h, &[0.5]);
        self.stage(2, state, h, &[0.0, 0.5]);
        self.stage(3, state, h, &[0.0, 0.0, 1.0]);
        state
            .iter()
            .enumerate()
            .map(|(i, value)| {
                value
                    + h / 6.0
                        * (self.stages[0][i]
                            + 2.0 * self.stages[1][i]
                            + 2.0 * self.stages[2][i]
                            + self.stages[3][i])
            })
            .collect()
    }

    /// One Dormand-Prince step: the fifth order solution and the local
    /// error estimate.
    fn dormand_prince_step(&mut self, state: &[f64], h: f64) -> (Vec<f64>, Vec<f64>) {
        for index in 0..6 {
            self.stage(index, state, h, &A[index][..index]);
        }
        let candidate: Vec<f64> = state
            .iter()
            .enumerate()
            .map(|(i, value)| {
                value
                    + h * A[6]
                        .iter()
                        .enumerate()
                        .map(|(j, weight)| weight * self.stages[j][i])
                        .sum::<f64>()
            })
            .collect();
        self.net
            .vector_field(&candidate, self.params, &mut self.stages[6]);
        let error = (0..state.len())
            .map(|i| {
                h * E
                    .iter()
                    .enumerate()
                    .map(|(j, weight)| weight * self.stages[j][i])
                    .sum::<f64>()
            })
            .collect();
        (candidate, error)
    }
}

impl Solve for OdeSolver {
    fn solve(
        &mut self,
        problem: &Problem,
        _services: &mut Services,
    ) -> Result<Trajectory, SimulationError> {
        self.method.validate()?;
        self.state = State::default();
        let mut trajectory =
            Trajectory::new(problem.net().species().to_vec(), Interpolation::Linear);
        trajectory.push(problem.tspan().0, problem.u0());
        match self.method.clone() {
            OdeMethod::Rk4 { dt } => self.integrate_rk4(problem, dt, &mut trajectory)?,
            OdeMethod::DormandPrince {
                rtol,
                atol,
                initial_dt,
            } => self.integrate_dormand_prince(problem, rtol, atol, initial_dt, &mut trajectory)?,
        }
        self.state.final_time = trajectory.final_time();
        tracing::debug!(
            accepted = self.state.accepted,
            rejected = self.state.rejected,
            "integrated mass action ODE"
        );
        match self.saveat {
            Some(spacing) => trajectory.sample_every(spacing),
            None => Ok(trajectory),
        }
    }
}

impl Reportable for OdeSolver {
    fn status(&self) -> String {
        match self.state.final_time {
            Some(time) => format!(
                "Integrated to t = {} in {} steps ({} rejected)",
                time, self.state.accepted, self.state.rejected
            ),
            None => String::from("Idle"),
        }
    }
}

impl ReportableSolver for OdeSolver {}
