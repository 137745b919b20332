use mobile::demo_clip;
use scene_infer::dsp::mean_abs;
use scene_infer::model::ClipSpec;
use scene_infer::wav::read_wav;
use tempfile::NamedTempFile;

#[test]
fn demo_clip_spans_one_model_window() -> anyhow::Result<()> {
    let spec = ClipSpec::new();
    let file = NamedTempFile::new()?;
    demo_clip(file.path(), &spec)?;

    let clip = read_wav(file.path())?;
    assert_eq!(clip.sample_rate, spec.sample_rate);
    assert_eq!(clip.samples.len(), spec.expected_samples());
    Ok(())
}

#[test]
fn demo_clip_is_audible() -> anyhow::Result<()> {
    let spec = ClipSpec::new();
    let file = NamedTempFile::new()?;
    demo_clip(file.path(), &spec)?;

    let clip = read_wav(file.path())?;
    // A half-amplitude sine averages well above the silence gate.
    assert!(mean_abs(&clip.samples) > 0.1);
    Ok(())
}
