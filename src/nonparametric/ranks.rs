use crate::error::{Result, StatError};

/// Sort data by value and return index-value pairs.
fn sort_indexed(data: &[f64]) -> Vec<(usize, f64)> {
    let mut indexed: Vec<(usize, f64)> = data.iter().cloned().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
    indexed
}

/// Find the end index of a tie group starting at `start`.
fn find_tie_group_end(indexed: &[(usize, f64)], start: usize) -> usize {
    let value = indexed[start].1;
    indexed[start..]
        .iter()
        .take_while(|(_, v)| *v == value)
        .count()
        + start
}

/// Assign average rank to a tie group and optionally record tie size.
fn assign_tie_group_ranks(
    indexed: &[(usize, f64)],
    ranks: &mut [f64],
    start: usize,
    end: usize,
    tie_sizes: Option<&mut Vec<usize>>,
) {
    let avg_rank = (start + 1 + end) as f64 / 2.0;
    for item in indexed.iter().take(end).skip(start) {
        ranks[item.0] = avg_rank;
    }
    if let Some(ties) = tie_sizes {
        let tie_size = end - start;
        if tie_size > 1 {
            ties.push(tie_size);
        }
    }
}

/// Compute ranks of data with average tie handling (matching R's rank(ties.method="average")).
///
/// # Arguments
/// * `data` - The data to rank
///
/// # Returns
/// * Vector of ranks (1-indexed, ties get average rank)
pub fn rank(data: &[f64]) -> Result<Vec<f64>> {
    if data.is_empty() {
        return Err(StatError::InvalidInput("data must not be empty".to_string()));
    }

    let indexed = sort_indexed(data);
    let mut ranks = vec![0.0; data.len()];

    let mut i = 0;
    while i < indexed.len() {
        let j = find_tie_group_end(&indexed, i);
        assign_tie_group_ranks(&indexed, &mut ranks, i, j, None);
        i = j;
    }

    Ok(ranks)
}

/// Internal helper: compute ranks and return tie information for correction
pub(crate) fn rank_with_ties(data: &[f64]) -> Result<(Vec<f64>, Vec<usize>)> {
    if data.is_empty() {
        return Err(StatError::InvalidInput("data must not be empty".to_string()));
    }

    let indexed = sort_indexed(data);
    let mut ranks = vec![0.0; data.len()];
    let mut tie_sizes = Vec::new();

    let mut i = 0;
    while i < indexed.len() {
        let j = find_tie_group_end(&indexed, i);
        assign_tie_group_ranks(&indexed, &mut ranks, i, j, Some(&mut tie_sizes));
        i = j;
    }

    Ok((ranks, tie_sizes))
}

/// Validate an (n, k) outcome matrix: at least 2 observations and 2
/// treatments, consistent row lengths, finite values only.
pub(crate) fn validate_matrix(matrix: &[Vec<f64>]) -> Result<()> {
    if matrix.len() < 2 {
        return Err(StatError::InvalidInput(
            "at least 2 observations are required".to_string(),
        ));
    }

    let k = matrix[0].len();
    if k < 2 {
        return Err(StatError::InvalidInput(
            "at least 2 treatments are required".to_string(),
        ));
    }

    for (i, row) in matrix.iter().enumerate() {
        if row.len() != k {
            return Err(StatError::InvalidInput(format!(
                "observation {} has {} outcomes, expected {}",
                i,
                row.len(),
                k
            )));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(StatError::InvalidInput(format!(
                "observation {} contains a non-finite outcome",
                i
            )));
        }
    }

    Ok(())
}

/// Compute the average rank of each treatment over an (n, k) outcome matrix.
///
/// Each row (observation) is ranked on its own with ties averaged, so that
/// the best outcome receives rank 1. When `maximize_outcome` is true the
/// largest value is best; otherwise the smallest. Per-treatment ranks are
/// then averaged over all rows.
///
/// # Arguments
/// * `matrix` - The outcome matrix, one row per observation
/// * `maximize_outcome` - Whether larger outcomes are better
///
/// # Returns
/// * Vector of k mean ranks, each in [1, k]
pub fn average_ranks(matrix: &[Vec<f64>], maximize_outcome: bool) -> Result<Vec<f64>> {
    validate_matrix(matrix)?;

    let n = matrix.len();
    let k = matrix[0].len();
    let mut totals = vec![0.0; k];
    let mut row_buf: Vec<f64> = Vec::with_capacity(k);

    for row in matrix {
        row_buf.clear();
        if maximize_outcome {
            row_buf.extend(row.iter().map(|v| -v));
        } else {
            row_buf.extend_from_slice(row);
        }
        let row_ranks = rank(&row_buf)?;
        for (total, r) in totals.iter_mut().zip(row_ranks) {
            *total += r;
        }
    }

    Ok(totals.into_iter().map(|t| t / n as f64).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_rank_ties_averaged() {
        let ranks = rank(&[1.0, 3.0, 2.0, 3.0, 5.0]).unwrap();
        assert_eq!(ranks, vec![1.0, 3.5, 2.0, 3.5, 5.0]);
    }

    #[test]
    fn test_rank_empty_error() {
        assert!(rank(&[]).is_err());
    }

    #[test]
    fn test_average_ranks_minimize() {
        let matrix = vec![vec![1.0, 2.0, 3.0], vec![1.0, 3.0, 2.0]];
        let ranks = average_ranks(&matrix, false).unwrap();
        assert!((ranks[0] - 1.0).abs() < TOL);
        assert!((ranks[1] - 2.5).abs() < TOL);
        assert!((ranks[2] - 2.5).abs() < TOL);
    }

    #[test]
    fn test_average_ranks_maximize_inverts() {
        // Without ties, flipping the direction maps rank r to k + 1 - r.
        let matrix = vec![
            vec![0.3, 0.1, 0.7, 0.2],
            vec![0.9, 0.4, 0.6, 0.8],
            vec![0.5, 0.2, 0.9, 0.1],
        ];
        let k = 4.0;
        let min_ranks = average_ranks(&matrix, false).unwrap();
        let max_ranks = average_ranks(&matrix, true).unwrap();
        for (lo, hi) in min_ranks.iter().zip(max_ranks.iter()) {
            assert!((lo + hi - (k + 1.0)).abs() < TOL);
        }
    }

    #[test]
    fn test_average_ranks_sum_invariant() {
        // Row ranks always sum to k(k+1)/2, so the mean ranks do too,
        // for arbitrary data including ties.
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let n = 12;
        let k = 5usize;
        let matrix: Vec<Vec<f64>> = (0..n)
            .map(|_| (0..k).map(|_| (rng.gen::<f64>() * 4.0).round()).collect())
            .collect();
        let ranks = average_ranks(&matrix, false).unwrap();
        let sum: f64 = ranks.iter().sum();
        let expected = (k * (k + 1)) as f64 / 2.0;
        assert!((sum - expected).abs() < 1e-9);
        for r in &ranks {
            assert!(*r >= 1.0 && *r <= k as f64);
        }
    }

    #[test]
    fn test_validate_too_few_observations() {
        let matrix = vec![vec![1.0, 2.0]];
        assert!(average_ranks(&matrix, false).is_err());
    }

    #[test]
    fn test_validate_too_few_treatments() {
        let matrix = vec![vec![1.0], vec![2.0]];
        assert!(average_ranks(&matrix, false).is_err());
    }

    #[test]
    fn test_validate_ragged_rows() {
        let matrix = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]];
        assert!(average_ranks(&matrix, false).is_err());
    }

    #[test]
    fn test_validate_non_finite() {
        let matrix = vec![vec![1.0, f64::NAN], vec![2.0, 3.0]];
        assert!(average_ranks(&matrix, false).is_err());
    }
}
