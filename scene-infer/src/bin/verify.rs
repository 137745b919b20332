//! Smoke check for the exported scene model.
//!
//! Loads the artifact, runs one all-zero forward pass, and prints the
//! output tensor shape. A missing artifact aborts before anything is
//! loaded; load or inference failures propagate with their raw cause so
//! the operator sees exactly what broke.

use anyhow::Result;
use clap::Parser;
use scene_infer::model::{format_shape, ClipSpec, SceneModel};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Check that the exported scene model is loadable")]
struct Args {
    /// Path to the exported ONNX model
    #[arg(long, default_value = "assets/passt_model.onnx")]
    model: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scene_infer=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let mut model = SceneModel::load(&args.model, ClipSpec::new())?;
    let shape = model.smoke_test()?;
    println!("logits shape: {}", format_shape(&shape));
    Ok(())
}
