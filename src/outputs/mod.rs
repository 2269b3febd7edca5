pub mod assembler;
pub mod retry;
pub mod synthesizer;
pub mod transcript;

pub use assembler::{
    manifest_contents, manifest_path, AssemblyError, AssemblyStrategy, AudioAssembler,
    FirstClipOnly, RawConcat, StreamCopyConcat,
};
pub use retry::{AttemptFailure, RetryPolicy};
pub use synthesizer::{AudioClip, SpeechSynthesizer, VoiceMap};
pub use transcript::{load_transcript, save_transcript, transcript_path};
