pub mod config;
pub mod outputs;
pub mod pipeline;
pub mod script;
pub mod services;
pub mod text;

// Re-export specific items if needed for convenient access
pub use config::{Preferences, Settings};
pub use pipeline::{ConversionResult, Converter, PipelineError};
pub use script::{DialogueSegment, Speaker};
