use std::path::{Path, PathBuf};

use crate::script::types::DialogueSegment;

/// `<dir>/<stem>_script.json` for an output audio path.
pub fn transcript_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "podcast".to_string());
    output.with_file_name(format!("{}_script.json", stem))
}

/// Writes the transcript as a pretty-printed JSON array of `{speaker, text}`.
pub async fn save_transcript(dialogue: &[DialogueSegment], path: &Path) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(dialogue)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    tokio::fs::write(path, json).await
}

pub async fn load_transcript(path: &Path) -> std::io::Result<Vec<DialogueSegment>> {
    let raw = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&raw).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_named_after_output_stem() {
        assert_eq!(
            transcript_path(Path::new("output/report.mp3")),
            PathBuf::from("output/report_script.json")
        );
        assert_eq!(transcript_path(Path::new("show")), PathBuf::from("show_script.json"));
    }
}
