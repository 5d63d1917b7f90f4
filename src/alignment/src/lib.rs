//! Pairwise/multi-entry alignment model: the `Alignment` table itself,
//! column scoring, the split enumerator + split-mapping restriction, and
//! the iterative refiner that drives improvement of a multi-structure
//! alignment.

mod alignment;
mod error;
mod nw_realigner;
mod refiner;
mod scoring;
mod split;
mod split_mapping;

pub use alignment::Alignment;
pub use error::AlignmentError;
pub use nw_realigner::NeedlemanWunschRealigner;
pub use refiner::{
    refine, AcceptedRound, RealignError, Realigner, RefinerConfig, RefinerOutcome, RefinerReport,
};
pub use scoring::{score_columns, ColumnScoreVariants, ScoringVariant};
pub use split::{enumerate_splits, singleton_splits, spanning_tree_splits, AlignmentSplit};
pub use split_mapping::{build_split_mapping, AlignmentSplitMapping};
