//! Classify one audio clip.

use anyhow::{bail, Result};
use clap::Parser;
use scene_infer::analyzer::SceneAnalyzer;
use scene_infer::model::ClipSpec;
use scene_infer::wav::read_wav;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(about = "Classify the scene in a WAV clip")]
struct Args {
    /// WAV clip to classify (16-bit PCM or float32, 32 kHz)
    clip: PathBuf,

    /// Path to the exported ONNX model
    #[arg(long, default_value = "assets/passt_model.onnx")]
    model: PathBuf,

    /// Label CSV file; defaults to the candidate files next to the model
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Number of predictions to report
    #[arg(long, default_value_t = 3)]
    top_k: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scene_infer=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let spec = ClipSpec::new();

    let clip = read_wav(&args.clip)?;
    if clip.sample_rate != spec.sample_rate {
        bail!(
            "clip is sampled at {} Hz but the model expects {} Hz",
            clip.sample_rate,
            spec.sample_rate
        );
    }
    info!(
        clip = %args.clip.display(),
        seconds = clip.duration_seconds(),
        "clip loaded"
    );

    let mut analyzer =
        SceneAnalyzer::load(&args.model, args.labels.as_deref(), spec)?.with_top_k(args.top_k);
    let result = analyzer.classify(&clip.samples, clip.samples.len())?;
    println!("{}", result.format_for_display());
    Ok(())
}
