//! The utilities module provides general capabilities, that may span the
//! theory, nets, composition, simulator, and output analysis modules.  The
//! utilities are centered around debugging/traceability, rendering, and
//! common arithmetic.

pub mod errors;
#[cfg(feature = "cli")]
pub mod logger;
pub mod plot;

/// This function calculates the sample mean from a set of points - a simple
/// arithmetic mean.
pub fn sample_mean(points: &[f64]) -> f64 {
    points.iter().sum::<f64>() / (points.len() as f64)
}

/// This function calculates sample variance, given a set of points and the
/// sample mean.
pub fn sample_variance(points: &[f64], mean: &f64) -> f64 {
    points
        .iter()
        .fold(0.0, |acc, point| acc + (point - mean).powi(2))
        / (points.len() as f64)
}

/// Binomial coefficient C(n, k) for a (possibly fractional) count `n`,
/// computed as the falling factorial over k!.  Counts below k yield zero.
pub fn binomial(n: f64, k: u32) -> f64 {
    if n < k as f64 {
        return 0.0;
    }
    (0..k).fold(1.0, |acc, j| acc * (n - j as f64) / (j as f64 + 1.0))
}

/// Factorial of a small multiplicity, as f64.
pub fn factorial(k: u32) -> f64 {
    (1..=k).fold(1.0, |acc, j| acc * j as f64)
}

/// When the `console_error_panic_hook` feature is enabled, we can call the
/// `set_panic_hook` function at least once during initialization, and then
/// we will get better error messages if our code ever panics.
///
/// For more details see
/// <https://github.com/rustwasm/console_error_panic_hook#readme>
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binomial_matches_pascal() {
        assert![binomial(5.0, 0) == 1.0];
        assert![binomial(5.0, 1) == 5.0];
        assert![binomial(5.0, 2) == 10.0];
        assert![binomial(1.0, 2) == 0.0];
    }

    #[test]
    fn factorial_of_small_multiplicities() {
        assert![factorial(0) == 1.0];
        assert![factorial(3) == 6.0];
    }

    #[test]
    fn sample_statistics() {
        let points = [1.0, 2.0, 3.0, 4.0];
        let mean = sample_mean(&points);
        assert![mean == 2.5];
        assert![sample_variance(&points, &mean) == 1.25];
    }
}
