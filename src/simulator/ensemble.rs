use serde::{Deserialize, Serialize};

use super::solver_trait::Solve;
use super::{Problem, Services, Trajectory};
use crate::output_analysis::{ConfidenceInterval, IndependentSample};
use crate::utils::errors::SimulationError;

/// Replications of one stochastic solver on one problem.  Replications
/// draw from the same random stream one after another, so they are
/// independent, and the ensemble as a whole is reproducible from the seed
/// of the services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ensemble {
    trajectories: Vec<Trajectory>,
}

/// Per species and sample time, the mean over an ensemble and its
/// confidence interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsembleSummary {
    species: Vec<String>,
    times: Vec<f64>,
    means: Vec<Vec<f64>>,
    intervals: Vec<Vec<ConfidenceInterval<f64>>>,
}

impl Ensemble {
    pub fn run<S: Solve + ?Sized>(
        solver: &mut S,
        problem: &Problem,
        services: &mut Services,
        replications: usize,
    ) -> Result<Self, SimulationError> {
        if replications == 0 {
            return Err(SimulationError::InvalidSolverConfiguration(String::from(
                "an ensemble needs at least one replication",
            )));
        }
        let trajectories = (0..replications)
            .map(|_| solver.solve(problem, services))
            .collect::<Result<Vec<Trajectory>, SimulationError>>()?;
        tracing::info!(replications, "ran ensemble");
        Ok(Self { trajectories })
    }

    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// The peak of one species in every replication, as a sample.
    pub fn peaks(&self, species: &str) -> Result<IndependentSample<f64>, SimulationError> {
        let peaks = self
            .trajectories
            .iter()
            .map(|trajectory| trajectory.peak(species).map(|(_, value)| value))
            .collect::<Result<Vec<f64>, SimulationError>>()?;
        IndependentSample::post(peaks)
    }

    /// Summarise the ensemble at the given times with two-sided `1 - alpha`
    /// confidence intervals of the mean.
    pub fn summary(&self, times: &[f64], alpha: f64) -> Result<EnsembleSummary, SimulationError> {
        let species = match self.trajectories.first() {
            Some(trajectory) => trajectory.species().to_vec(),
            None => return Err(SimulationError::EmptySample),
        };
        let sampled = self
            .trajectories
            .iter()
            .map(|trajectory| trajectory.sample_at(times))
            .collect::<Result<Vec<Trajectory>, SimulationError>>()?;
        let mut means = Vec::with_capacity(times.len());
        let mut intervals = Vec::with_capacity(times.len());
        for point in 0..times.len() {
            let mut point_means = Vec::with_capacity(species.len());
            let mut point_intervals = Vec::with_capacity(species.len());
            for index in 0..species.len() {
                let sample = IndependentSample::post(
                    sampled
                        .iter()
                        .map(|trajectory| trajectory.states()[point][index])
                        .collect(),
                )?;
                point_means.push(sample.point_estimate_mean());
                point_intervals.push(sample.confidence_interval_mean(alpha)?);
            }
            means.push(point_means);
            intervals.push(point_intervals);
        }
        Ok(EnsembleSummary {
            species,
            times: times.to_vec(),
            means,
            intervals,
        })
    }
}

impl EnsembleSummary {
    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Means, indexed `[time][species]`.
    pub fn means(&self) -> &[Vec<f64>] {
        &self.means
    }

    /// Confidence intervals, indexed `[time][species]`.
    pub fn intervals(&self) -> &[Vec<ConfidenceInterval<f64>>] {
        &self.intervals
    }

    /// The mean trajectory of the ensemble.
    pub fn mean_trajectory(&self, interpolation: super::Interpolation) -> Trajectory {
        let mut trajectory = Trajectory::new(self.species.clone(), interpolation);
        for (time, state) in self.times.iter().zip(self.means.iter()) {
            trajectory.push(*time, state);
        }
        trajectory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nets::PetriNet;
    use crate::simulator::{Interpolation, JumpSolver, OdeSolver};

    fn decay() -> Problem {
        let mut net = PetriNet::new();
        let i = net.add_species("I");
        let r = net.add_species("R");
        net.add_transition_from_places("recovery", &[i], &[r])
            .unwrap();
        Problem::new(net, vec![100.0, 0.0], (0.0, 4.0), vec![0.5]).unwrap()
    }

    #[test]
    fn jump_ensemble_brackets_the_ode_mean() {
        let mut services = Services::seeded(1234);
        let ensemble =
            Ensemble::run(&mut JumpSolver::default(), &decay(), &mut services, 200).unwrap();
        let summary = ensemble.summary(&[0.0, 2.0], 0.001).unwrap();
        assert_eq!(summary.means()[0], vec![100.0, 0.0]);
        // E[I(2)] = 100 e^(-1); each replication is binomial(100, e^(-1)).
        let expected = 100.0 * (-1.0f64).exp();
        assert!(summary.intervals()[1][0].contains(expected));
        let ode = OdeSolver::default()
            .solve(&decay(), &mut services)
            .unwrap()
            .state_at(2.0)
            .unwrap();
        assert!((summary.means()[1][0] - ode[0]).abs() < 2.0);
        let mean = summary.mean_trajectory(Interpolation::Linear);
        assert_eq!(mean.len(), 2);
    }

    #[test]
    fn peaks_form_a_sample() {
        let mut services = Services::seeded(1);
        let ensemble =
            Ensemble::run(&mut JumpSolver::default(), &decay(), &mut services, 10).unwrap();
        let peaks = ensemble.peaks("R").unwrap();
        assert_eq!(peaks.len(), 10);
        assert!(ensemble.peaks("Q").is_err());
    }

    #[test]
    fn empty_ensembles_are_rejected() {
        let mut services = Services::default();
        assert!(Ensemble::run(&mut JumpSolver::default(), &decay(), &mut services, 0).is_err());
    }
}
