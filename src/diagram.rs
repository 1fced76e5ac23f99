use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{Result, StatError};
use crate::nonparametric::friedman::{f_distributed, FriedmanResult};
use crate::posthoc::{adjust, maximal_cliques, pairwise_tests, Adjustment, PairwisePValue};

/// Memoization key for one `get_groups` call.
type GroupKey = (u64, Adjustment);

/// The statistical core of a critical difference diagram.
///
/// Construction consumes an (n, k) outcome matrix once, computes the
/// average ranks and the Friedman omnibus test, and runs the signed-rank
/// test for every treatment pair. Groups of indistinguishable treatments
/// are then derived on demand per (alpha, adjustment) and memoized for the
/// lifetime of the value; the inputs are never mutated afterwards.
pub struct Diagram {
    treatment_names: Vec<String>,
    friedman: FriedmanResult,
    pairwise: Vec<PairwisePValue>,
    groups: RefCell<HashMap<GroupKey, Vec<Vec<usize>>>>,
}

impl Diagram {
    /// Build the diagram core from an outcome matrix.
    ///
    /// # Arguments
    /// * `matrix` - The (n, k) outcome matrix, one row per observation
    /// * `treatment_names` - Optional names for the k treatments; defaults
    ///   to "treatment 0", "treatment 1", ...
    /// * `maximize_outcome` - Whether larger outcomes are better
    ///
    /// # Errors
    /// `StatError::InvalidInput` if the matrix has fewer than 2 rows or
    /// columns, is ragged, contains non-finite values, or the name count
    /// does not match the number of columns.
    pub fn new(
        matrix: &[Vec<f64>],
        treatment_names: Option<Vec<String>>,
        maximize_outcome: bool,
    ) -> Result<Self> {
        let friedman = f_distributed(matrix, maximize_outcome)?;
        let k = friedman.chi_square.average_ranks.len();

        let treatment_names = match treatment_names {
            Some(names) => {
                if names.len() != k {
                    return Err(StatError::InvalidInput(format!(
                        "{} treatment names given for {} treatments",
                        names.len(),
                        k
                    )));
                }
                names
            }
            None => (0..k).map(|i| format!("treatment {}", i)).collect(),
        };

        let pairwise = pairwise_tests(matrix)?;

        Ok(Self {
            treatment_names,
            friedman,
            pairwise,
            groups: RefCell::new(HashMap::new()),
        })
    }

    /// Mean rank of each treatment, in treatment order.
    pub fn average_ranks(&self) -> &[f64] {
        &self.friedman.chi_square.average_ranks
    }

    /// Mean rank of the treatment with the given name, if it exists.
    pub fn average_rank(&self, name: &str) -> Option<f64> {
        self.treatment_names
            .iter()
            .position(|n| n == name)
            .map(|i| self.average_ranks()[i])
    }

    /// Names of the treatments, in column order of the input matrix.
    pub fn treatment_names(&self) -> &[String] {
        &self.treatment_names
    }

    /// Whether ranks represent a maximization of the outcome.
    pub fn maximize_outcome(&self) -> bool {
        self.friedman.chi_square.maximize_outcome
    }

    /// The F-distributed Friedman test result gating the pipeline.
    pub fn friedman(&self) -> &FriedmanResult {
        &self.friedman
    }

    /// Raw pairwise signed-rank p-values, in lower-triangle order.
    pub fn pairwise_p_values(&self) -> &[PairwisePValue] {
        &self.pairwise
    }

    /// Get the groups of indistinguishable treatments, as index sets.
    ///
    /// If the Friedman test fails to reject at `alpha`, post-hoc tests are
    /// not meaningful and all treatments form a single group. Otherwise the
    /// pairwise p-values are adjusted and every maximal clique of the
    /// "not significantly different" graph becomes one group. Groups may
    /// overlap; each treatment belongs to at least one group.
    ///
    /// Results are memoized per (alpha, adjustment), so repeated calls on
    /// the same diagram return identical output.
    ///
    /// # Errors
    /// `StatError::InvalidParameter` if `alpha` is not inside (0, 1).
    pub fn get_groups(&self, alpha: f64, adjustment: Adjustment) -> Result<Vec<Vec<usize>>> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(StatError::InvalidParameter(format!(
                "alpha must be in (0, 1), got {}",
                alpha
            )));
        }

        let key = (alpha.to_bits(), adjustment);
        if let Some(groups) = self.groups.borrow().get(&key) {
            return Ok(groups.clone());
        }

        let groups = self.compute_groups(alpha, adjustment);
        self.groups.borrow_mut().insert(key, groups.clone());
        Ok(groups)
    }

    /// Get the groups of indistinguishable treatments, as name sets.
    pub fn get_group_names(
        &self,
        alpha: f64,
        adjustment: Adjustment,
    ) -> Result<Vec<Vec<String>>> {
        let groups = self.get_groups(alpha, adjustment)?;
        Ok(groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|&i| self.treatment_names[i].clone())
                    .collect()
            })
            .collect())
    }

    fn compute_groups(&self, alpha: f64, adjustment: Adjustment) -> Vec<Vec<usize>> {
        let k = self.treatment_names.len();

        // Omnibus gate: without a significant Friedman result, the
        // treatments are one indistinguishable group.
        if self.friedman.p_value >= alpha {
            return vec![(0..k).collect()];
        }

        let raw: Vec<f64> = self.pairwise.iter().map(|p| p.p_value).collect();
        let adjusted = adjust(&raw, adjustment);

        let mut adjacency = vec![vec![false; k]; k];
        for (pair, &p) in self.pairwise.iter().zip(adjusted.iter()) {
            if p.is_finite() && p >= alpha {
                adjacency[pair.i][pair.j] = true;
                adjacency[pair.j][pair.i] = true;
            }
        }

        maximal_cliques(&adjacency)
    }
}
