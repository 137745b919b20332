//! Embeddable analyzer runtime for host applications.
//!
//! Wraps the core analyzer behind a small handle type plus a C FFI surface
//! so a mobile or desktop host can load the model once and classify
//! recorded buffers.

use anyhow::Result;
use scene_infer::analyzer::{SceneAnalyzer, SceneResult};
use scene_infer::model::ClipSpec;
use scene_infer::wav::write_wav;
use std::f32::consts::TAU;
use std::path::Path;

pub mod ffi;
pub use ffi::*;

/// An opened analyzer owned by the host application.
pub struct AnalyzerHandle {
    analyzer: SceneAnalyzer,
}

impl AnalyzerHandle {
    /// Open the model and label table. `labels_path` may be `None`, in
    /// which case the candidate label files next to the model are probed.
    pub fn open(model_path: &Path, labels_path: Option<&Path>) -> Result<Self> {
        let analyzer = SceneAnalyzer::load(model_path, labels_path, ClipSpec::new())?;
        Ok(Self { analyzer })
    }

    /// Classify a recorded buffer of normalized mono samples.
    pub fn classify(&mut self, samples: &[f32]) -> Result<SceneResult> {
        self.analyzer.classify(samples, samples.len())
    }

    /// Run the all-zero load check and report the output shape.
    pub fn smoke_test(&mut self) -> Result<Vec<i64>> {
        self.analyzer.smoke_test()
    }

    pub fn spec(&self) -> &ClipSpec {
        self.analyzer.spec()
    }
}

/// Write a synthetic test clip (a 440 Hz tone spanning one model window)
/// so the runtime can be exercised without recorded audio.
pub fn demo_clip(path: &Path, spec: &ClipSpec) -> Result<()> {
    let samples: Vec<f32> = (0..spec.expected_samples())
        .map(|i| {
            let t = i as f32 / spec.sample_rate as f32;
            0.5 * (TAU * 440.0 * t).sin()
        })
        .collect();
    write_wav(path, spec.sample_rate, &samples)
}
