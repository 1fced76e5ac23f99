use crate::error::{Result, StatError};
use crate::nonparametric::ranks::rank_with_ties;
use statrs::distribution::{ContinuousCDF, Normal};

/// Largest number of non-zero differences for which the exact signed-rank
/// distribution is enumerated. Beyond this, or when absolute differences
/// tie, the normal approximation is used.
const EXACT_LIMIT: usize = 25;

/// Result of the Wilcoxon signed-rank test
#[derive(Debug, Clone)]
pub struct WilcoxonResult {
    /// The test statistic, min(W+, W-)
    pub statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Number of non-zero paired differences
    pub n_nonzero: usize,
    /// Whether the exact distribution was used
    pub exact: bool,
}

/// Perform the two-sided Wilcoxon signed-rank test on paired samples.
///
/// Zero differences are discarded before ranking. A pair of identical
/// vectors carries no information to separate the treatments; the p-value
/// is then defined as exactly 1.0 rather than an error.
///
/// # Arguments
/// * `x` - First treatment's outcomes
/// * `y` - Second treatment's outcomes, paired with `x` by observation
///
/// # Returns
/// * `WilcoxonResult` containing the statistic and two-sided p-value
pub fn wilcoxon_signed_rank(x: &[f64], y: &[f64]) -> Result<WilcoxonResult> {
    if x.len() != y.len() {
        return Err(StatError::InvalidInput(format!(
            "paired samples differ in length: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    if x.is_empty() {
        return Err(StatError::InvalidInput(
            "paired samples must not be empty".to_string(),
        ));
    }

    let differences: Vec<f64> = x
        .iter()
        .zip(y.iter())
        .map(|(a, b)| a - b)
        .filter(|d| *d != 0.0)
        .collect();

    if differences.is_empty() {
        return Ok(WilcoxonResult {
            statistic: 0.0,
            p_value: 1.0,
            n_nonzero: 0,
            exact: true,
        });
    }

    let n = differences.len();
    let abs_differences: Vec<f64> = differences.iter().map(|d| d.abs()).collect();
    let (ranks, tie_sizes) = rank_with_ties(&abs_differences)?;

    let w_plus: f64 = differences
        .iter()
        .zip(ranks.iter())
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| *r)
        .sum();
    let w_minus = (n * (n + 1)) as f64 / 2.0 - w_plus;
    let statistic = w_plus.min(w_minus);

    let (p_value, exact) = if n <= EXACT_LIMIT && tie_sizes.is_empty() {
        (exact_p_value(statistic, n), true)
    } else {
        (approximate_p_value(statistic, n, &tie_sizes), false)
    };

    Ok(WilcoxonResult {
        statistic,
        p_value,
        n_nonzero: n,
        exact,
    })
}

/// Exact two-sided p-value by counting rank subsets.
///
/// Without ties the ranks are the integers 1..n, and W+ is the sum of a
/// uniformly random subset of them; the subset-sum counts give the null
/// distribution directly.
fn exact_p_value(statistic: f64, n: usize) -> f64 {
    let max_sum = n * (n + 1) / 2;
    let mut counts = vec![0u64; max_sum + 1];
    counts[0] = 1;
    for r in 1..=n {
        for w in (r..=max_sum).rev() {
            counts[w] += counts[w - r];
        }
    }

    let t = statistic.round() as usize;
    let at_or_below: u64 = counts[..=t].iter().sum();
    let total = (1u64 << n) as f64;
    (2.0 * at_or_below as f64 / total).min(1.0)
}

/// Normal approximation with tie-corrected variance.
fn approximate_p_value(statistic: f64, n: usize, tie_sizes: &[usize]) -> f64 {
    let n_f = n as f64;
    let mean = n_f * (n_f + 1.0) / 4.0;
    let tie_term: f64 = tie_sizes
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum();
    let variance = n_f * (n_f + 1.0) * (2.0 * n_f + 1.0) / 24.0 - tie_term / 48.0;

    let z = (statistic - mean) / variance.sqrt();
    let normal = Normal::new(0.0, 1.0).unwrap();
    (2.0 * normal.cdf(z)).min(1.0)
}
