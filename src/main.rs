use anyhow::{bail, Context, Result};
use clap::Parser;
use notecast::config::{load_settings, Depth, Length, Preferences, Tone};
use notecast::text::DocumentKind;
use notecast::Converter;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Turn a document into a two-voice podcast episode.
#[derive(Parser, Debug)]
#[command(name = "notecast")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// PDF or plain-text document to convert
    document: PathBuf,

    /// Output audio path (defaults to output/<document name>.mp3)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only read roughly this many pages of text (0 reads everything)
    #[arg(long, default_value_t = 3)]
    max_pages: usize,

    /// Read the whole document
    #[arg(long, conflicts_with = "max_pages")]
    all_pages: bool,

    /// Preferences as a JSON object, e.g. '{"tone":"casual","humor":false}'
    #[arg(long)]
    preferences: Option<String>,

    /// casual, conversational or professional
    #[arg(long)]
    tone: Option<Tone>,

    /// short, medium or long
    #[arg(long)]
    length: Option<Length>,

    /// overview, balanced or deep-dive
    #[arg(long)]
    depth: Option<Depth>,

    /// Allow light humor in the script
    #[arg(long)]
    humor: Option<bool>,

    /// Extra configuration file (TOML/YAML/JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn preferences(&self) -> Preferences {
        let mut prefs = self
            .preferences
            .as_deref()
            .map(Preferences::from_json)
            .unwrap_or_default();
        if let Some(tone) = self.tone {
            prefs.tone = tone;
        }
        if let Some(length) = self.length {
            prefs.length = length;
        }
        if let Some(depth) = self.depth {
            prefs.depth = depth;
        }
        if let Some(humor) = self.humor {
            prefs.humor = humor;
        }
        prefs
    }
}

/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "podcast".to_string()
    } else {
        trimmed.to_string()
    }
}

fn default_output(document: &Path) -> PathBuf {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from("output").join(format!("{}.mp3", sanitize_file_name(&stem)))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let cli = Cli::parse();

    if DocumentKind::from_path(&cli.document).is_none() {
        bail!("Invalid file type: {} (expected .pdf or .txt)", cli.document.display());
    }
    if !cli.document.is_file() {
        bail!("Document not found: {}", cli.document.display());
    }

    let settings = load_settings(cli.config.as_deref()).context("loading configuration")?;
    let preferences = cli.preferences();
    let output = cli.output.clone().unwrap_or_else(|| default_output(&cli.document));
    let max_pages = (!cli.all_pages).then_some(cli.max_pages);

    tracing::info!(
        document = %cli.document.display(),
        output = %output.display(),
        ?preferences,
        "Converting"
    );

    let converter = Converter::from_settings(&settings);
    let result = converter
        .convert(&cli.document, &output, &preferences, max_pages)
        .await
        .with_context(|| format!("converting {}", cli.document.display()))?;

    let audio = result.require_audio().context("Audio file not created")?;
    let filename = audio
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    tracing::info!(path = %audio.display(), "Conversion complete");

    let summary = json!({
        "success": true,
        "filename": filename,
        "path": audio.display().to_string(),
        "transcript": result.transcript,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("My Report (final)"), "My_Report__final");
        assert_eq!(sanitize_file_name("../../etc"), "etc");
        assert_eq!(sanitize_file_name("..."), "podcast");
    }

    #[test]
    fn output_defaults_to_output_dir() {
        assert_eq!(
            default_output(Path::new("uploads/Annual Report.pdf")),
            PathBuf::from("output/Annual_Report.mp3")
        );
    }

    #[test]
    fn flags_override_json_preferences() {
        let cli = Cli::parse_from([
            "notecast",
            "doc.pdf",
            "--preferences",
            r#"{"tone":"casual","length":"long"}"#,
            "--length",
            "short",
            "--humor",
            "false",
        ]);
        let prefs = cli.preferences();
        assert_eq!(prefs.tone, Tone::Casual);
        assert_eq!(prefs.length, Length::Short);
        assert!(!prefs.humor);
    }
}
