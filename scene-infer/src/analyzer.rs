//! Scene classification on top of the loaded model.

use crate::dsp::fit_to_window;
use crate::labels::LabelTable;
use crate::model::{ClipSpec, SceneModel};
use anyhow::Result;
use std::cmp::Ordering;
use std::fmt::Write;
use std::path::Path;
use tracing::debug;

const DEFAULT_TOP_K: usize = 3;

/// One ranked class prediction.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

/// Ranked predictions for one window.
#[derive(Debug, Clone)]
pub struct SceneResult {
    predictions: Vec<Prediction>,
}

impl SceneResult {
    pub fn new(predictions: Vec<Prediction>) -> Self {
        Self { predictions }
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    /// Numbered display lines, best prediction first.
    pub fn format_for_display(&self) -> String {
        if self.predictions.is_empty() {
            return "no model output".to_string();
        }
        let mut out = String::new();
        for (i, prediction) in self.predictions.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {} confidence={:.2}",
                i + 1,
                prediction.label,
                prediction.confidence
            );
        }
        out.trim_end().to_string()
    }
}

pub fn sigmoid(value: f32) -> f32 {
    let exp = value.exp();
    exp / (1.0 + exp)
}

/// Turn raw logits into the top-k predictions: per-class sigmoid
/// confidence, ranked descending, labels resolved against the table.
pub fn rank_predictions(logits: &[f32], labels: &LabelTable, top_k: usize) -> Vec<Prediction> {
    if logits.is_empty() {
        return Vec::new();
    }
    let confidences: Vec<f32> = logits.iter().map(|&v| sigmoid(v)).collect();
    let mut order: Vec<usize> = (0..confidences.len()).collect();
    order.sort_by(|&a, &b| {
        confidences[b]
            .partial_cmp(&confidences[a])
            .unwrap_or(Ordering::Equal)
    });
    order
        .into_iter()
        .take(top_k)
        .map(|index| Prediction {
            label: labels.get(index),
            confidence: confidences[index],
        })
        .collect()
}

/// The classifier: loaded model plus label table.
pub struct SceneAnalyzer {
    model: SceneModel,
    labels: LabelTable,
    top_k: usize,
}

impl SceneAnalyzer {
    pub fn new(model: SceneModel, labels: LabelTable) -> Self {
        Self {
            model,
            labels,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Load model and labels together. When `labels_path` is absent the
    /// candidate label files next to the model are probed.
    pub fn load(model_path: &Path, labels_path: Option<&Path>, spec: ClipSpec) -> Result<Self> {
        let model = SceneModel::load(model_path, spec)?;
        let labels = match labels_path {
            Some(path) => LabelTable::load(path)?,
            None => {
                let dir = model_path.parent().unwrap_or_else(|| Path::new("."));
                LabelTable::load_default(dir)?
            }
        };
        Ok(Self::new(model, labels))
    }

    pub fn spec(&self) -> &ClipSpec {
        self.model.spec()
    }

    /// Classify one recording. The buffer is padded or truncated to the
    /// model window before the forward pass; `valid_samples` bounds the
    /// usable part of the buffer (zero means all of it).
    pub fn classify(&mut self, buffer: &[f32], valid_samples: usize) -> Result<SceneResult> {
        let window = fit_to_window(buffer, valid_samples, self.spec().expected_samples());
        let (_, logits) = self.model.forward(&window)?;
        debug!(classes = logits.ncols(), "forward pass complete");
        let row = logits.row(0).to_vec();
        Ok(SceneResult::new(rank_predictions(
            &row,
            &self.labels,
            self.top_k,
        )))
    }

    /// The load smoke test, forwarded from the model.
    pub fn smoke_test(&mut self) -> Result<Vec<i64>> {
        self.model.smoke_test()
    }
}
