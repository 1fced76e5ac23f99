pub mod friedman;
pub mod ranks;
pub mod wilcoxon;

pub use friedman::{
    chi_square_distributed, f_distributed, ChiSquareFriedmanResult, FriedmanResult,
};
pub use ranks::{average_ranks, rank};
pub use wilcoxon::{wilcoxon_signed_rank, WilcoxonResult};
