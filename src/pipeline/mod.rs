pub mod converter;
pub mod error;

pub use converter::{ConversionResult, Converter};
pub use error::PipelineError;
