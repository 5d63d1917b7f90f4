use std::fmt;

use thiserror::Error;

/// Which pipeline stage a [`PipelineError`] originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Tally,
    Refine,
    Superpose,
    Cluster,
    Io,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStep::Tally => "tally",
            PipelineStep::Refine => "alignment refinement",
            PipelineStep::Superpose => "superposition",
            PipelineStep::Cluster => "clustering",
            PipelineStep::Io => "io",
        };
        write!(f, "{name}")
    }
}

/// The per-crate failure a [`PipelineError`] wraps.
#[derive(Error, Debug)]
pub enum PipelineErrorKind {
    #[error(transparent)]
    Tally(#[from] structure::TallyError),

    #[error(transparent)]
    Alignment(#[from] alignment::AlignmentError),

    #[error(transparent)]
    Superpose(#[from] superpose::SuperposeError),

    #[error(transparent)]
    Cluster(#[from] cluster::ClusterError),

    #[error(transparent)]
    Io(#[from] cath_io::IoError),
}

/// A single structured pipeline error: which step failed, the
/// underlying per-crate error, and the call-site location it was raised at.
#[derive(Debug)]
pub struct PipelineError {
    pub step: PipelineStep,
    pub location: &'static std::panic::Location<'static>,
    pub kind: PipelineErrorKind,
}

impl PipelineError {
    #[track_caller]
    pub fn new(step: PipelineStep, kind: impl Into<PipelineErrorKind>) -> Self {
        Self { step, location: std::panic::Location::caller(), kind: kind.into() }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} step failed [{}]: {}", self.step, self.location, self.kind)
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Bubbles a foreign `Result` into a [`PipelineError`] tagged with `step`,
/// recording the call site exactly as `located_error::LocatedError` does for
/// `anyhow` errors.
pub trait WithPipelineStep<T> {
    fn step(self, step: PipelineStep) -> Result<T, PipelineError>;
}

impl<T, E> WithPipelineStep<T> for Result<T, E>
where
    E: Into<PipelineErrorKind>,
{
    #[track_caller]
    fn step(self, step: PipelineStep) -> Result<T, PipelineError> {
        self.map_err(|e| PipelineError::new(step, e))
    }
}
