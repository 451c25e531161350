//! Random variables drive the stochastic solvers: exponential waiting
//! times and uniform selections for jump processes, and normal Wiener
//! increments for stochastic differential equations.  Distributions are
//! wrapped in the `Continuous` enum, with their common parameterizations.

use rand::distributions::Distribution;
use serde::{Deserialize, Serialize};
use rand_distr::{Exp, Normal, Uniform};

use super::dynamic_rng::DynRng;
use crate::utils::errors::SimulationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Continuous {
    Exp { lambda: f64 },
    Normal { mean: f64, std_dev: f64 },
    /// Range is inclusive of min, exclusive of max: [min, max)
    Uniform { min: f64, max: f64 },
}

impl Continuous {
    /// The generation of random variates drives stochastic behaviors during
    /// solver execution.  This function requires the random number
    /// generator of the solver services, and produces a f64 random variate.
    pub fn random_variate(&self, rng: &DynRng) -> Result<f64, SimulationError> {
        let mut rng = rng.borrow_mut();
        match self {
            Continuous::Exp { lambda } => Ok(Exp::new(*lambda)?.sample(&mut *rng)),
            Continuous::Normal { mean, std_dev } => {
                Ok(Normal::new(*mean, *std_dev)?.sample(&mut *rng))
            }
            Continuous::Uniform { min, max } => Ok(Uniform::new(*min, *max).sample(&mut *rng)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_modeling::dynamic_rng::seeded_rng;
    use crate::utils::{sample_mean, sample_variance};

    fn sample(variable: Continuous, sample_size: usize) -> Vec<f64> {
        let rng = seeded_rng(7);
        (0..sample_size)
            .map(|_| variable.random_variate(&rng).unwrap())
            .collect()
    }

    #[test]
    fn exponential_samples_match_expectation() {
        let points = sample(Continuous::Exp { lambda: 4.0 }, 10000);
        let mean = sample_mean(&points);
        assert!((mean - 0.25).abs() < 0.01);
    }

    #[test]
    fn normal_samples_match_expectation() {
        let points = sample(
            Continuous::Normal {
                mean: 0.0,
                std_dev: 0.5,
            },
            10000,
        );
        let mean = sample_mean(&points);
        assert!(mean.abs() < 0.02);
        assert!((sample_variance(&points, &mean) - 0.25).abs() < 0.02);
    }

    #[test]
    fn uniform_samples_stay_in_range() {
        let points = sample(Continuous::Uniform { min: 7.0, max: 11.0 }, 1000);
        assert!(points.iter().all(|point| *point >= 7.0 && *point < 11.0));
    }

    #[test]
    fn invalid_parameters_are_errors() {
        let rng = seeded_rng(7);
        assert!(Continuous::Exp { lambda: -1.0 }.random_variate(&rng).is_err());
        assert!(Continuous::Normal {
            mean: 0.0,
            std_dev: -1.0
        }
        .random_variate(&rng)
        .is_err());
    }

    #[test]
    fn equal_seeds_give_equal_streams() {
        let variable = Continuous::Uniform { min: 0.0, max: 1.0 };
        let (a, b) = (seeded_rng(1234), seeded_rng(1234));
        let left: Vec<f64> = (0..5).map(|_| variable.random_variate(&a).unwrap()).collect();
        let right: Vec<f64> = (0..5).map(|_| variable.random_variate(&b).unwrap()).collect();
        assert_eq!(left, right);
    }
}
