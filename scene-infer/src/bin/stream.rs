//! Sliding-window analysis of a long recording.
//!
//! Prints one block per analyzed window with its end offset in the clip,
//! or a silence notice for windows under the amplitude gate.

use anyhow::{bail, Result};
use clap::Parser;
use scene_infer::analyzer::SceneAnalyzer;
use scene_infer::model::ClipSpec;
use scene_infer::stream::{analyze_stream, StreamConfig};
use scene_infer::wav::read_wav;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Analyze a long WAV recording window by window")]
struct Args {
    /// WAV recording to analyze
    clip: PathBuf,

    /// Path to the exported ONNX model
    #[arg(long, default_value = "assets/passt_model.onnx")]
    model: PathBuf,

    /// Label CSV file; defaults to the candidate files next to the model
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Seconds of audio between inferences
    #[arg(long, default_value_t = 2.0)]
    interval: f32,
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

    let mut analyzer = SceneAnalyzer::load(&args.model, args.labels.as_deref(), spec)?;
    let config = StreamConfig {
        interval_seconds: args.interval,
        ..StreamConfig::default()
    };

    let reports = analyze_stream(&mut analyzer, &clip.samples, &config)?;
    if reports.is_empty() {
        println!("clip is shorter than one model window; nothing to analyze");
        return Ok(());
    }
    for report in reports {
        match report.result {
            Some(result) => {
                println!("[t={:.1}s]", report.offset_seconds);
                println!("{}", result.format_for_display());
            }
            None => println!("[t={:.1}s] silence", report.offset_seconds),
        }
    }
    Ok(())
}
