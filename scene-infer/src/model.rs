//! Loading and running the exported scene-classification model.

use anyhow::{bail, Context, Result};
use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::{debug, info};

/// Fixed input contract of the exported model.
#[derive(Clone, Debug)]
pub struct ClipSpec {
    /// Sample rate the model was trained at.
    pub sample_rate: u32,
    /// Clip length in seconds.
    pub clip_seconds: u32,
}

impl Default for ClipSpec {
    fn default() -> Self {
        Self {
            sample_rate: 32_000,
            clip_seconds: 10,
        }
    }
}

impl ClipSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of samples in one model window.
    pub fn expected_samples(&self) -> usize {
        (self.sample_rate * self.clip_seconds) as usize
    }
}

/// Verify that the artifact exists before any load is attempted.
pub fn ensure_artifact(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("model artifact not found: {}", path.display());
    }
    Ok(())
}

/// The all-zero input used for the load smoke test. Always exactly one
/// window of zero-valued samples.
pub fn dummy_input(spec: &ClipSpec) -> Vec<f32> {
    vec![0.0; spec.expected_samples()]
}

/// Render an output shape as a tuple of integers.
pub fn format_shape(shape: &[i64]) -> String {
    let dims: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
    format!("({})", dims.join(", "))
}

/// A loaded, invocable scene model.
pub struct SceneModel {
    session: Session,
    input_name: String,
    output_name: String,
    spec: ClipSpec,
}

impl SceneModel {
    /// Load the ONNX artifact at `path`. The file must exist; a missing
    /// path fails before ONNX Runtime is touched.
    pub fn load<P: AsRef<Path>>(path: P, spec: ClipSpec) -> Result<Self> {
        let path = path.as_ref();
        ensure_artifact(path)?;

        ort::init().commit()?;
        info!(path = %path.display(), "loading scene model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(1)?
            .commit_from_file(path)
            .with_context(|| format!("failed to load model from {}", path.display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "waveform".to_string());
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "logits".to_string());

        info!(
            input = %input_name,
            output = %output_name,
            samples = spec.expected_samples(),
            "scene model ready"
        );

        Ok(Self {
            session,
            input_name,
            output_name,
            spec,
        })
    }

    pub fn spec(&self) -> &ClipSpec {
        &self.spec
    }

    /// One forward pass over a single window. The waveform must hold
    /// exactly one window of samples; the input tensor is shaped `(1, N)`.
    ///
    /// Returns the raw output shape together with the logits as a
    /// `(batch, classes)` matrix.
    pub fn forward(&mut self, waveform: &[f32]) -> Result<(Vec<i64>, Array2<f32>)> {
        use ort::value::Tensor;

        let expected = self.spec.expected_samples();
        if waveform.len() != expected {
            bail!(
                "waveform must hold exactly {} samples, got {}",
                expected,
                waveform.len()
            );
        }

        let shape = vec![1_i64, waveform.len() as i64];
        let input = Tensor::from_array((shape, waveform.to_vec()))
            .context("failed to create input tensor")?;

        let outputs = self.session.run(ort::inputs![&self.input_name => input])?;
        let (out_shape, data) = extract_logits(&outputs, &self.output_name)?;

        let (rows, cols) = match out_shape.as_slice() {
            [n] => (1, *n as usize),
            [b, n] => (*b as usize, *n as usize),
            _ => (1, data.len()),
        };
        let logits = Array2::from_shape_vec((rows, cols), data)
            .context("output tensor shape does not match its data")?;

        Ok((out_shape, logits))
    }

    /// Run the deterministic all-zero dummy pass and report the output
    /// shape. This is the load smoke test: it exercises deserialization
    /// and one full forward computation without touching any parameters.
    pub fn smoke_test(&mut self) -> Result<Vec<i64>> {
        let dummy = dummy_input(&self.spec);
        let (shape, _logits) = self.forward(&dummy)?;
        Ok(shape)
    }
}

fn extract_logits(
    outputs: &ort::session::SessionOutputs,
    output_name: &str,
) -> Result<(Vec<i64>, Vec<f32>)> {
    if let Some(output) = outputs.get(output_name) {
        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            return Ok((shape.iter().copied().collect(), data.to_vec()));
        }
    }

    // The export may name its outputs differently; take the first float
    // tensor the session produced.
    for (name, output) in outputs.iter() {
        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            debug!(output = %name, "using fallback output tensor");
            return Ok((shape.iter().copied().collect(), data.to_vec()));
        }
    }

    bail!("model produced no float tensor output")
}
