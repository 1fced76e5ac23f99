use std::str::FromStr;

use crate::error::{Result, StatError};

/// Multiple testing adjustment controlling the family-wise error rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adjustment {
    /// Holm's step-down method. Uniformly at least as powerful as
    /// Bonferroni, but couples all pairwise decisions through the sorted
    /// order of the raw p-values.
    Holm,
    /// Bonferroni's single-step method, adjusting each p-value on its own.
    Bonferroni,
}

impl FromStr for Adjustment {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "holm" => Ok(Adjustment::Holm),
            "bonferroni" => Ok(Adjustment::Bonferroni),
            other => Err(StatError::InvalidParameter(format!(
                "adjustment must be \"holm\" or \"bonferroni\", got \"{}\"",
                other
            ))),
        }
    }
}

/// Adjust raw p-values for multiple comparisons.
///
/// Returns the adjusted p-values in the same order as the input.
pub fn adjust(p_values: &[f64], adjustment: Adjustment) -> Vec<f64> {
    match adjustment {
        Adjustment::Holm => holm(p_values),
        Adjustment::Bonferroni => bonferroni(p_values),
    }
}

/// Bonferroni correction: p_adj = min(1, p * m).
fn bonferroni(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len() as f64;
    p_values.iter().map(|&p| (p * m).min(1.0)).collect()
}

/// Holm's step-down correction.
///
/// Sorts the p-values ascending, scales the i-th smallest by (m - i),
/// and takes a running maximum over the sorted order so that adjusted
/// values never decrease, then clips at 1.
fn holm(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let mut adjusted = vec![0.0; m];
    let mut running_max = 0.0f64;
    for (position, &idx) in order.iter().enumerate() {
        let scaled = p_values[idx] * (m - position) as f64;
        running_max = running_max.max(scaled);
        adjusted[idx] = running_max.min(1.0);
    }
    adjusted
}
