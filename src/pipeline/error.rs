use std::path::PathBuf;

use crate::text::ExtractionError;

/// Conditions no fallback can paper over.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("could not read document: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("no readable text found in {0}")]
    NoText(PathBuf),
    #[error("no audio clip could be synthesized")]
    NoAudio,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
