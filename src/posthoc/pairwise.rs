use crate::error::Result;
use crate::nonparametric::ranks::validate_matrix;
use crate::nonparametric::wilcoxon::wilcoxon_signed_rank;

/// Raw two-sided p-value for one unordered pair of treatments.
#[derive(Debug, Clone, Copy)]
pub struct PairwisePValue {
    /// The larger treatment index of the pair
    pub i: usize,
    /// The smaller treatment index of the pair
    pub j: usize,
    /// Two-sided p-value of the signed-rank test
    pub p_value: f64,
}

/// Run the Wilcoxon signed-rank test for every unordered pair of treatments.
///
/// Pairs are emitted in row-major lower-triangle order (i > j). The pairs
/// are independent of each other, but this fixed ordering is what makes the
/// sequential Holm adjustment downstream reproducible.
///
/// # Arguments
/// * `matrix` - The (n, k) outcome matrix, one row per observation
///
/// # Returns
/// * The k(k-1)/2 raw p-values, one per pair
pub fn pairwise_tests(matrix: &[Vec<f64>]) -> Result<Vec<PairwisePValue>> {
    validate_matrix(matrix)?;
    let k = matrix[0].len();

    let mut results = Vec::with_capacity(k * (k - 1) / 2);
    for i in 1..k {
        for j in 0..i {
            let x: Vec<f64> = matrix.iter().map(|row| row[i]).collect();
            let y: Vec<f64> = matrix.iter().map(|row| row[j]).collect();
            let r = wilcoxon_signed_rank(&x, &y)?;
            results.push(PairwisePValue {
                i,
                j,
                p_value: r.p_value,
            });
        }
    }

    Ok(results)
}
