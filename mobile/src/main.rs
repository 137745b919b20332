use clap::Parser;
use mobile::demo_clip;
use scene_infer::model::ClipSpec;
use std::path::PathBuf;

#[derive(Parser)]
struct Args {
    /// Output file for the synthetic test clip
    #[arg(long, default_value = "clip.wav")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    demo_clip(&args.out, &ClipSpec::new())?;
    println!("Saved test clip to {:?}", args.out);
    Ok(())
}
