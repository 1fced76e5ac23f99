//! Statistical core for critical difference diagrams.
//!
//! A critical difference diagram compares k treatments (e.g. algorithms)
//! over n observations (e.g. datasets) and shows which treatments are
//! statistically indistinguishable from one another. This crate implements
//! the underlying pipeline: within-row average ranks, the Friedman omnibus
//! test as a gate, pairwise Wilcoxon signed-rank tests, Holm or Bonferroni
//! adjustment, and maximal-clique grouping of treatments that cannot be
//! separated. Rendering the diagram itself is left to downstream crates
//! that consume the ranks and groups.
//!
//! ```
//! use critdd::{Adjustment, Diagram};
//!
//! // 4 observations of 3 treatments; lower outcomes are better.
//! let matrix = vec![
//!     vec![0.10, 0.30, 0.32],
//!     vec![0.12, 0.28, 0.31],
//!     vec![0.08, 0.33, 0.29],
//!     vec![0.11, 0.27, 0.30],
//! ];
//! let diagram = Diagram::new(&matrix, None, false).unwrap();
//! assert_eq!(diagram.average_ranks()[0], 1.0);
//!
//! let groups = diagram.get_groups(0.05, Adjustment::Holm).unwrap();
//! assert!(!groups.is_empty());
//! ```

pub mod diagram;
pub mod error;
pub mod nonparametric;
pub mod posthoc;

pub use diagram::Diagram;
pub use error::{Result, StatError};
pub use posthoc::Adjustment;
