pub mod client;

pub use client::{ClientConfig, GenerationError, GenerationRequest, LLMService, TextGenerator};
