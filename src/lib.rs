//! Top-level crate wiring the three structural-bioinformatics cores —
//! superposition (`superpose`), alignment refinement (`alignment`), and
//! hierarchical clustering (`cluster`) — into a single pipeline surface
//! behind one thin entrypoint.

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::{PipelineConfig, CATH_TOOLS_DATA_DIR};
pub use error::{PipelineError, PipelineErrorKind, PipelineStep, WithPipelineStep};
pub use pipeline::{run_clustering, run_refinement, run_superposition, AlignmentCoordsProvider};
