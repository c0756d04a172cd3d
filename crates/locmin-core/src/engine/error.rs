use crate::core::io::candidates::CandidateError;
use crate::core::io::resume::ResumeFileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Invalid candidate structure: {source}")]
    Candidate {
        #[from]
        source: CandidateError,
    },

    #[error("Descent from '{start}' did not terminate within {steps} steps")]
    DescentLimit { start: String, steps: usize },

    #[error("Resume file error: {source}")]
    ResumeFile {
        #[from]
        source: ResumeFileError,
    },

    #[error("I/O error while reading candidates: {0}")]
    Io(#[from] std::io::Error),
}
