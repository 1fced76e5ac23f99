use crate::error::Result;
use crate::nonparametric::ranks::average_ranks;
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor};

/// Result of the chi-square-distributed Friedman test
#[derive(Debug, Clone)]
pub struct ChiSquareFriedmanResult {
    /// The chi-square statistic
    pub statistic: f64,
    /// Degrees of freedom (k-1)
    pub df: f64,
    /// The p-value
    pub p_value: f64,
    /// Mean rank of each treatment, column-wise over the rank matrix
    pub average_ranks: Vec<f64>,
    /// Number of observations
    pub n: usize,
    /// Whether ranks represent a maximization of the outcome
    pub maximize_outcome: bool,
}

/// Result of the F-distributed (Iman-Davenport) Friedman test
#[derive(Debug, Clone)]
pub struct FriedmanResult {
    /// The F statistic
    pub statistic: f64,
    /// First number of degrees of freedom (k-1)
    pub df_1: f64,
    /// Second number of degrees of freedom ((k-1)(n-1))
    pub df_2: f64,
    /// The p-value
    pub p_value: f64,
    /// The underlying chi-square test result
    pub chi_square: ChiSquareFriedmanResult,
}

/// Perform the Friedman test with a chi-square-distributed statistic.
///
/// Tests the null hypothesis that all k treatments have the same
/// distribution over the n observations, using within-row ranks.
///
/// # Arguments
/// * `matrix` - The (n, k) outcome matrix, one row per observation
/// * `maximize_outcome` - Whether larger outcomes are better
///
/// # Returns
/// * `ChiSquareFriedmanResult` containing the statistic, df, p-value, and
///   the average ranks of the treatments
pub fn chi_square_distributed(
    matrix: &[Vec<f64>],
    maximize_outcome: bool,
) -> Result<ChiSquareFriedmanResult> {
    let ranks = average_ranks(matrix, maximize_outcome)?;
    let n = matrix.len();
    let k = ranks.len();
    let n_f = n as f64;
    let k_f = k as f64;

    // chi2 = 12n/(k(k+1)) * sum_j (R_j - (k+1)/2)^2
    let center = (k_f + 1.0) / 2.0;
    let spread: f64 = ranks.iter().map(|r| (r - center).powi(2)).sum();
    let statistic = 12.0 * n_f / (k_f * (k_f + 1.0)) * spread;

    let df = k_f - 1.0;
    let chi_sq = ChiSquared::new(df).unwrap();
    let p_value = 1.0 - chi_sq.cdf(statistic);

    Ok(ChiSquareFriedmanResult {
        statistic,
        df,
        p_value,
        average_ranks: ranks,
        n,
        maximize_outcome,
    })
}

/// Perform the Friedman test with an F-distributed statistic.
///
/// The Iman-Davenport variant is less conservative than the chi-square
/// variant and is the one used as the omnibus gate of the pipeline.
///
/// # Arguments
/// * `matrix` - The (n, k) outcome matrix, one row per observation
/// * `maximize_outcome` - Whether larger outcomes are better
///
/// # Returns
/// * `FriedmanResult` containing the F statistic, both dfs, the p-value,
///   and the underlying chi-square result
pub fn f_distributed(matrix: &[Vec<f64>], maximize_outcome: bool) -> Result<FriedmanResult> {
    let chi_square = chi_square_distributed(matrix, maximize_outcome)?;
    let n_f = chi_square.n as f64;
    let k_f = chi_square.average_ranks.len() as f64;

    let df_1 = k_f - 1.0;
    let df_2 = (k_f - 1.0) * (n_f - 1.0);

    // F = (n-1) chi2 / (n(k-1) - chi2); the denominator reaches zero when
    // every observation ranks the treatments identically
    let denom = n_f * (k_f - 1.0) - chi_square.statistic;
    let (statistic, p_value) = if denom > 0.0 {
        let statistic = (n_f - 1.0) * chi_square.statistic / denom;
        let f = FisherSnedecor::new(df_1, df_2).unwrap();
        (statistic, 1.0 - f.cdf(statistic))
    } else {
        (f64::INFINITY, 0.0)
    };

    Ok(FriedmanResult {
        statistic,
        df_1,
        df_2,
        p_value,
        chi_square,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Catalyst yields from a classic worked example: 4 batches, 3 catalysts.
    fn catalysts() -> Vec<Vec<f64>> {
        vec![
            vec![84.5, 78.4, 83.1],
            vec![82.8, 79.1, 79.9],
            vec![79.1, 78.0, 77.8],
            vec![80.2, 76.0, 77.9],
        ]
    }

    fn transpose(matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let k = matrix[0].len();
        (0..k)
            .map(|j| matrix.iter().map(|row| row[j]).collect())
            .collect()
    }

    #[test]
    fn test_chi_square_catalysts() {
        let r = chi_square_distributed(&catalysts(), false).unwrap();
        assert!((r.statistic - 6.5).abs() < 1e-9);
        assert!(r.p_value < 0.05);
        assert!((r.df - 2.0).abs() < 1e-12);
        assert_eq!(r.average_ranks.len(), 3);
        assert_eq!(r.n, 4);
    }

    #[test]
    fn test_chi_square_catalysts_transposed() {
        let r = chi_square_distributed(&transpose(&catalysts()), false).unwrap();
        assert!((r.statistic - 7.4).abs() < 1e-9);
        assert!(r.p_value >= 0.05);
        assert!((r.df - 3.0).abs() < 1e-12);
        assert_eq!(r.average_ranks.len(), 4);
        assert_eq!(r.n, 3);
    }

    #[test]
    fn test_chi_square_trees() {
        let growth = vec![
            vec![6.0, 4.0, 3.0, 3.0],
            vec![4.0, 3.0, 3.0, 2.0],
            vec![4.0, 2.0, 1.0, 1.0],
            vec![2.0, 1.0, 2.0, 1.0],
        ];
        let matrix = transpose(&growth);
        let r = chi_square_distributed(&matrix, false).unwrap();
        assert!((r.statistic - 9.525).abs() < 1e-9);
        assert!(r.p_value < 0.05);

        // F-distributed variant agrees on the ranks and is less conservative
        let r_f = f_distributed(&matrix, false).unwrap();
        assert!(r_f.p_value <= r.p_value);
        assert_eq!(r_f.chi_square.average_ranks, r.average_ranks);
    }

    #[test]
    fn test_f_distributed_dfs() {
        let r = f_distributed(&catalysts(), false).unwrap();
        assert!((r.df_1 - 2.0).abs() < 1e-12);
        assert!((r.df_2 - 6.0).abs() < 1e-12);
        assert!(r.p_value > 0.0 && r.p_value < 1.0);
    }

    #[test]
    fn test_f_distributed_perfect_consistency() {
        // Identical rankings in every row drive the F denominator to zero.
        let matrix = vec![
            vec![1.0, 2.0, 3.0],
            vec![1.5, 2.5, 3.5],
            vec![1.1, 2.1, 3.1],
            vec![1.2, 2.2, 3.2],
        ];
        let r = f_distributed(&matrix, false).unwrap();
        assert!(r.statistic.is_infinite());
        assert_eq!(r.p_value, 0.0);
    }

    #[test]
    fn test_no_difference_yields_high_p() {
        // A cyclic design where each treatment wins equally often: all
        // average ranks equal, statistic zero.
        let matrix = vec![
            vec![1.0, 2.0, 3.0],
            vec![2.0, 3.0, 1.0],
            vec![3.0, 1.0, 2.0],
            vec![1.0, 2.0, 3.0],
            vec![2.0, 3.0, 1.0],
            vec![3.0, 1.0, 2.0],
        ];
        let r = f_distributed(&matrix, false).unwrap();
        assert!(r.chi_square.statistic.abs() < 1e-12);
        assert!(r.p_value >= 0.99);
    }

    #[test]
    fn test_maximize_flag_recorded() {
        let r = chi_square_distributed(&catalysts(), true).unwrap();
        assert!(r.maximize_outcome);
        // Maximizing yield makes the first catalyst best (rank closest to 1)
        let best = r
            .average_ranks
            .iter()
            .cloned()
            .fold(f64::INFINITY, f64::min);
        assert!((r.average_ranks[0] - best).abs() < 1e-12);
    }
}
