mod adjust;
mod cliques;
mod pairwise;

pub use adjust::{adjust, Adjustment};
pub use cliques::maximal_cliques;
pub use pairwise::{pairwise_tests, PairwisePValue};
