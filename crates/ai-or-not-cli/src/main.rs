use std::path::PathBuf;

use ai_or_not::{Detector, EnsembleKind, InferenceReport};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "ai-or-not")]
#[command(about = "Detect AI-generated text", long_about = None)]
struct Cli {
    /// Text to analyze (if not provided, reads from stdin)
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Read text from file
    #[arg(short, long, value_name = "PATH", conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Ensemble to run
    #[arg(short, long, value_enum, default_value_t = Mode::Unigram)]
    model: Mode,

    /// Directory holding versioned model artifacts
    #[arg(long, value_name = "DIR", default_value = "model_artifacts")]
    artifacts: PathBuf,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "human")]
    format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy)]
enum Mode {
    Unigram,
    Bigram,
}

impl From<Mode> for EnsembleKind {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Unigram => Self::Unigram,
            Mode::Bigram => Self::Bigram,
        }
    }
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormat {
    /// Output just the verdict
    Label,
    /// Output the fused AI probability as a float 0-1
    Probability,
    /// Output the full report as JSON
    Json,
    /// Human-readable output with confidence (default)
    Human,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let text = read_input(&cli)?;

    let detector =
        Detector::load(&cli.artifacts).context("Failed to load model artifacts")?;
    let report = detector.infer(&text, cli.model.into())?;

    output_report(&report, cli.format)
}

/// Resolve the input text from CLI args.
///
/// Priority: text arg > file > stdin.
fn read_input(cli: &Cli) -> Result<String> {
    use std::io::Read;

    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }

    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer)
}

/// Output the report in the requested format.
fn output_report(report: &InferenceReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Label => {
            println!("{}", report.verdict());
        }
        OutputFormat::Probability => {
            println!("{:.4}", report.fused_probability());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(report)?);
        }
        OutputFormat::Human => {
            println!("Result: {}", report.verdict());
            println!("Confidence: {}", report.confidence());
            println!("P(AI): {:.1}%", report.fused_probability() * 100.0);
        }
    }
    Ok(())
}
