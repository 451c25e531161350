//! Critical values of Student's t distribution, for confidence intervals on
//! the mean.  The two-sided tail probability is the regularized incomplete
//! beta function `I_{df/(df+t^2)}(df/2, 1/2)`, inverted by bisection.

use num_traits::Float;

const LANCZOS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection formula
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let t = x + 7.5;
    let series = LANCZOS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS[0], |acc, (i, c)| acc + c / (x + i as f64));
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

/// Continued fraction for the incomplete beta function (modified Lentz).
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    let tiny = 1.0e-300;
    let (qab, qap, qam) = (a + b, a + 1.0, a - 1.0);
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < tiny {
        d = tiny;
    }
    d = 1.0 / d;
    let mut h = d;
    for m in 1..300 {
        let m = m as f64;
        let m2 = 2.0 * m;
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < tiny {
            d = tiny;
        }
        c = 1.0 + aa / c;
        if c.abs() < tiny {
            c = tiny;
        }
        d = 1.0 / d;
        h *= d * c;
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < tiny {
            d = tiny;
        }
        c = 1.0 + aa / c;
        if c.abs() < tiny {
            c = tiny;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < 1.0e-15 {
            break;
        }
    }
    h
}

fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let front = (ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln())
        .exp();
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Probability that |T| exceeds `t`, for T with `df` degrees of freedom.
fn two_sided_tail(t: f64, df: f64) -> f64 {
    regularized_incomplete_beta(df / 2.0, 0.5, df / (df + t * t))
}

/// The critical value `t` with `P(|T| > t) = alpha`, for `df` degrees of
/// freedom.  Returns NaN for alpha outside (0, 1) or zero degrees of freedom.
pub fn t_score<T: Float>(alpha: T, df: usize) -> T {
    let alpha = match alpha.to_f64() {
        Some(alpha) if alpha > 0.0 && alpha < 1.0 && df > 0 => alpha,
        _ => return T::nan(),
    };
    let df = df as f64;
    let mut upper = 1.0;
    while two_sided_tail(upper, df) > alpha {
        upper *= 2.0;
    }
    let mut lower = 0.0;
    for _ in 0..200 {
        let mid = 0.5 * (lower + upper);
        if two_sided_tail(mid, df) > alpha {
            lower = mid;
        } else {
            upper = mid;
        }
        if upper - lower < 1.0e-14 * upper {
            break;
        }
    }
    T::from(0.5 * (lower + upper)).unwrap_or_else(T::nan)
}
