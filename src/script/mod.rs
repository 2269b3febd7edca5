pub mod fallback;
pub mod generator;
pub mod parser;
pub mod prompt;
pub mod types;

pub use fallback::{fallback_script, placeholder_dialogue};
pub use generator::{resolve_script, ScriptGenerator};
pub use parser::{clean_utterance, parse_dialogue};
pub use prompt::{build_prompt, Continuity};
pub use types::{DialogueSegment, Speaker};
