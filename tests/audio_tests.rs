use async_trait::async_trait;
use notecast::outputs::{
    manifest_path, AssemblyError, AssemblyStrategy, AudioAssembler, FirstClipOnly, RawConcat,
    RetryPolicy, SpeechSynthesizer, VoiceMap,
};
use notecast::script::DialogueSegment;
use notecast::services::tts::{SpeechEngine, SpeechError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Writes `clip_bytes` bytes per call and remembers which voice was asked for.
struct FixedSizeEngine {
    clip_bytes: usize,
    calls: AtomicUsize,
    voices: Mutex<Vec<String>>,
}

impl FixedSizeEngine {
    fn new(clip_bytes: usize) -> Self {
        Self {
            clip_bytes,
            calls: AtomicUsize::new(0),
            voices: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SpeechEngine for FixedSizeEngine {
    async fn synthesize(
        &self,
        _text: &str,
        voice: &str,
        output: &Path,
    ) -> Result<(), SpeechError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.voices.lock().unwrap().push(voice.to_string());
        tokio::fs::write(output, vec![0u8; self.clip_bytes]).await?;
        Ok(())
    }
}

/// Fails the first call, then behaves.
struct FlakyEngine {
    calls: AtomicUsize,
}

#[async_trait]
impl SpeechEngine for FlakyEngine {
    async fn synthesize(
        &self,
        _text: &str,
        _voice: &str,
        output: &Path,
    ) -> Result<(), SpeechError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(SpeechError::Request("connection refused".to_string()));
        }
        tokio::fs::write(output, vec![1u8; 4096]).await?;
        Ok(())
    }
}

fn dialogue() -> Vec<DialogueSegment> {
    vec![
        DialogueSegment::host("Welcome to the show."),
        DialogueSegment::expert("Happy to be here today."),
        DialogueSegment::host("Let's get started then."),
    ]
}

fn synthesizer(engine: Arc<dyn SpeechEngine>) -> SpeechSynthesizer {
    SpeechSynthesizer::new(engine, VoiceMap::default(), RetryPolicy::immediate(2))
}

async fn write_clip(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    tokio::fs::write(&path, bytes).await.unwrap();
    path
}

#[tokio::test]
async fn test_tiny_clips_are_dropped_after_retries() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(FixedSizeEngine::new(10));
    let synth = synthesizer(engine.clone());

    let clips = synth
        .synthesize(&[DialogueSegment::host("This clip will be far too small.")], dir.path())
        .await
        .unwrap();

    assert!(clips.is_empty());
    assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_clips_are_named_by_position_and_speaker() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(FixedSizeEngine::new(2000));
    let synth = synthesizer(engine.clone());

    let clips = synth.synthesize(&dialogue(), dir.path()).await.unwrap();

    let names: Vec<String> = clips
        .iter()
        .map(|c| c.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["segment_000_HOST.mp3", "segment_001_EXPERT.mp3", "segment_002_HOST.mp3"]
    );
    assert_eq!(
        *engine.voices.lock().unwrap(),
        vec!["en-US-GuyNeural", "en-US-JennyNeural", "en-US-GuyNeural"]
    );
}

#[tokio::test]
async fn test_unspeakable_segments_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(FixedSizeEngine::new(2000));
    let synth = synthesizer(engine.clone());

    let segments = vec![
        DialogueSegment::host("  ok "),
        DialogueSegment::expert("A real sentence here."),
    ];
    let clips = synth.synthesize(&segments, dir.path()).await.unwrap();

    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0].index, 1);
    assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_engine_error_is_retried() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(FlakyEngine {
        calls: AtomicUsize::new(0),
    });
    let synth = synthesizer(engine.clone());

    let clips = synth
        .synthesize(&[DialogueSegment::expert("Second time lucky.")], dir.path())
        .await
        .unwrap();

    assert_eq!(clips.len(), 1);
    assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_nothing_to_combine() {
    let dir = tempfile::tempdir().unwrap();
    let assembler = AudioAssembler::with_concat_tool("ffmpeg", Duration::from_secs(5));

    let combined = assembler.combine(&[], &dir.path().join("show.mp3")).await;
    assert!(combined.is_none());
}

/// Runs the default ladder with `binary` as the concat tool and expects the
/// raw concatenation rung to produce the output.
async fn assert_raw_concat_with(binary: &str) {
    let dir = tempfile::tempdir().unwrap();
    let a = write_clip(dir.path(), "segment_000_HOST.mp3", &[1u8; 1500]).await;
    let b = write_clip(dir.path(), "segment_001_EXPERT.mp3", &[2u8; 2500]).await;
    let output = dir.path().join("show.mp3");

    let assembler = AudioAssembler::with_concat_tool(binary, Duration::from_secs(5));
    let combined = assembler.combine(&[a, b], &output).await;

    assert_eq!(combined.as_deref(), Some(output.as_path()));
    let bytes = tokio::fs::read(&output).await.unwrap();
    assert_eq!(bytes.len(), 4000);
    assert!(bytes[..1500].iter().all(|&b| b == 1));
    assert!(bytes[1500..].iter().all(|&b| b == 2));
    assert!(!manifest_path(&output).exists());
}

#[tokio::test]
async fn test_missing_concat_tool_falls_back_to_raw_concat() {
    assert_raw_concat_with("/nonexistent/bin/ffmpeg-notecast").await;
}

// `true` exits 0 without writing anything: a clean exit alone is not success.
#[cfg(unix)]
#[tokio::test]
async fn test_concat_tool_without_output_falls_back_to_raw_concat() {
    assert_raw_concat_with("true").await;
}

#[cfg(unix)]
#[tokio::test]
async fn test_failing_concat_tool_falls_back_to_raw_concat() {
    assert_raw_concat_with("false").await;
}

struct AlwaysFails;

#[async_trait]
impl AssemblyStrategy for AlwaysFails {
    fn name(&self) -> &'static str {
        "always-fails"
    }

    async fn assemble(&self, _clips: &[PathBuf], _output: &Path) -> Result<(), AssemblyError> {
        Err(AssemblyError::Timeout(Duration::from_secs(1)))
    }
}

#[tokio::test]
async fn test_first_clip_is_last_resort() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_clip(dir.path(), "a.mp3", &[7u8; 1200]).await;
    let b = write_clip(dir.path(), "b.mp3", &[8u8; 1300]).await;
    let output = dir.path().join("show.mp3");

    let assembler = AudioAssembler::new(vec![Box::new(AlwaysFails), Box::new(FirstClipOnly)]);
    let combined = assembler.combine(&[a, b], &output).await;

    assert!(combined.is_some());
    assert_eq!(tokio::fs::read(&output).await.unwrap(), vec![7u8; 1200]);
}

#[tokio::test]
async fn test_every_strategy_failing_yields_none() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone.mp3");
    let output = dir.path().join("nested/missing/show.mp3");

    let assembler = AudioAssembler::new(vec![
        Box::new(AlwaysFails),
        Box::new(RawConcat),
        Box::new(FirstClipOnly),
    ]);
    assert!(assembler.combine(&[missing], &output).await.is_none());
}
