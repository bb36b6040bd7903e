//! A minimal two-sample Kolmogorov–Smirnov test, used to compare a chain against independent
//! reference draws from the same target.

use std::cmp::Ordering;

use crate::error::KsError;

/// Stores the result of a two-sample KS test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResult {
    /// Whether the null hypothesis (both samples share a distribution) is rejected at `level`.
    pub is_rejected: bool,
    pub statistic: f64,
    pub p_value: f64,
    pub level: f64,
}

/// Performs a two-sample KS test at the given significance level. NaN values are ignored.
pub fn two_sample_ks_test(
    sample_1: &[f64],
    sample_2: &[f64],
    level: f64,
) -> Result<TestResult, KsError> {
    let a = sorted_finite(sample_1, 1)?;
    let b = sorted_finite(sample_2, 2)?;
    let statistic = ks_statistic_sorted(&a, &b);
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let z = (n1 * n2 / (n1 + n2)).sqrt() * statistic;
    let p_value = qks(z)?;
    Ok(TestResult {
        is_rejected: p_value < level,
        statistic,
        p_value,
        level,
    })
}

fn sorted_finite(sample: &[f64], which: usize) -> Result<Vec<f64>, KsError> {
    let mut out: Vec<f64> = sample.iter().copied().filter(|x| !x.is_nan()).collect();
    if out.is_empty() {
        return Err(KsError::EmptySample(which));
    }
    out.sort_unstable_by(cmp_f64);
    Ok(out)
}

/// Walks both sorted samples in lockstep. Ties are consumed together, so the CDFs are
/// only compared between distinct values.
fn ks_statistic_sorted(a: &[f64], b: &[f64]) -> f64 {
    let (n, m) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0, 0);
    let mut d: f64 = 0.0;
    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / n - j as f64 / m).abs());
    }
    d
}

/// Complementary CDF of the Kolmogorov distribution (*Numerical Recipes*, third edition).
fn qks(z: f64) -> Result<f64, KsError> {
    if z < 0.0 {
        return Err(KsError::NegativeStatistic(z));
    }
    if z == 0.0 {
        return Ok(1.0);
    }
    if z < 1.18 {
        return Ok(1.0 - pks(z));
    }
    let x = (-2.0 * z * z).exp();
    Ok(2.0 * (x - x.powi(4) + x.powi(9)))
}

/// CDF of the Kolmogorov distribution for `0 < z < 1.18`.
fn pks(z: f64) -> f64 {
    let y = (-1.233_700_550_136_169_7 / (z * z)).exp();
    2.256_758_334_191_025 * (-y.ln()).sqrt() * (y + y.powi(9) + y.powi(25) + y.powi(49))
}

/// Total order on floats with NaN last.
fn cmp_f64(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).unwrap_or_else(|| b.is_nan().cmp(&a.is_nan()).reverse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn statistic(a: &[f64], b: &[f64]) -> Result<f64, KsError> {
        two_sample_ks_test(a, b, 0.05).map(|result| result.statistic)
    }

    #[test]
    fn statistic_of_shifted_samples() {
        let d = statistic(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]).unwrap();
        assert_abs_diff_eq!(d, 1.0 / 3.0, epsilon = 1e-12);
        let d = statistic(&[0.0, 1.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_abs_diff_eq!(d, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn statistic_extremes() {
        assert_eq!(statistic(&[1.0, 2.0, 3.0], &[3.0, 1.0, 2.0]).unwrap(), 0.0);
        assert_eq!(statistic(&[1.0, 2.0], &[10.0, 11.0]).unwrap(), 1.0);
        assert_eq!(statistic(&[2.0], &[5.0]).unwrap(), 1.0);
    }

    #[test]
    fn statistic_handles_ties() {
        let d = statistic(&[1.0, 1.0, 1.0, 2.0, 2.0], &[1.0, 1.0, 2.0, 2.0, 2.0]).unwrap();
        assert_abs_diff_eq!(d, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn empty_samples_are_errors() {
        assert_eq!(statistic(&[], &[1.0]), Err(KsError::EmptySample(1)));
        assert_eq!(statistic(&[1.0], &[f64::NAN]), Err(KsError::EmptySample(2)));
    }

    #[test]
    fn p_value_of_repeated_pattern() {
        let base = [0.12, 0.25, 0.25, 0.78, 0.99, 0.33, 0.15, 0.5];
        let s1: Vec<f64> = base.iter().cycle().take(8 * 20).copied().collect();
        let mut other = base;
        other[7] = 0.51;
        let s2: Vec<f64> = other.iter().cycle().take(8 * 20).copied().collect();

        let result = two_sample_ks_test(&s1, &s2, 0.05).unwrap();
        assert_abs_diff_eq!(result.statistic, 0.125, epsilon = 1e-12);
        assert_abs_diff_eq!(result.p_value, 0.1641, epsilon = 1e-4);
        assert!(!result.is_rejected);
    }

    #[test]
    fn kolmogorov_distribution_values() {
        assert_eq!(qks(0.0).unwrap(), 1.0);
        assert!(qks(-1.0).is_err());
        assert_abs_diff_eq!(1.0 - qks(1.23).unwrap(), 0.9029731024047791, epsilon = 1e-8);
        assert_abs_diff_eq!(1.0 - qks(2.34).unwrap(), 0.9999649260833611, epsilon = 1e-8);
        assert_abs_diff_eq!(pks(0.5), 1.0 - qks(0.5).unwrap(), epsilon = 1e-15);
    }

    #[test]
    fn nan_sorts_last() {
        let mut s = [f64::NAN, 2.0, f64::NAN, 1.0];
        s.sort_by(cmp_f64);
        assert_eq!(&s[..2], &[1.0, 2.0]);
        assert!(s[2].is_nan() && s[3].is_nan());
    }
}
