use core::fmt;
use std::path::Path;
use std::sync::Mutex;

use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::{Tensor, Value},
};
use sprs::CsMat;

use crate::{DetectError, Result};

/// One sparse feature row per text, width fixed by the paired vectorizer.
pub type FeatureVector = CsMat<f32>;

/// A classifier's hard decision for a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryLabel {
    Human,
    Ai,
}

impl BinaryLabel {
    /// Returns true if this label is the positive (AI) class
    #[must_use]
    pub fn is_ai(&self) -> bool {
        matches!(self, Self::Ai)
    }
}

impl fmt::Display for BinaryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => write!(f, "Human"),
            Self::Ai => write!(f, "AI"),
        }
    }
}

impl From<BinaryLabel> for i64 {
    fn from(label: BinaryLabel) -> Self {
        match label {
            BinaryLabel::Human => 0,
            BinaryLabel::Ai => 1,
        }
    }
}

/// One model's output for one feature row.
#[derive(Debug, Clone, Copy)]
pub struct ModelScore {
    /// The model's own hard decision, independent of any fused decision.
    pub label: BinaryLabel,
    /// Calibrated probability of the positive (AI) class.
    pub probability: f64,
}

/// A pre-trained classifier behind a narrow scoring interface.
///
/// Implementations are immutable after construction and safe to share across
/// concurrent inference calls. Both operations are idempotent; the concrete
/// scoring algorithm is fully substitutable behind this trait.
pub trait ScoringModel: Send + Sync {
    /// Probability that the features belong to the positive (AI) class.
    fn probability(&self, features: &FeatureVector) -> Result<f64>;

    /// The model's own hard decision for the features.
    fn decide(&self, features: &FeatureVector) -> Result<BinaryLabel>;

    /// Trained input width, when the backing artifact declares one.
    fn input_width(&self) -> Option<usize> {
        None
    }

    /// Label and probability together.
    fn score(&self, features: &FeatureVector) -> Result<ModelScore> {
        Ok(ModelScore {
            label: self.decide(features)?,
            probability: self.probability(features)?,
        })
    }
}

/// ONNX-backed scoring model.
///
/// Expects the sklearn classifier export convention: output 0 carries hard
/// labels (i64), output 1 carries per-class probability rows (f32) with the
/// positive class in column 1. The session is guarded by a mutex because
/// `Session::run` takes `&mut self`.
pub struct OnnxModel {
    session: Mutex<Session>,
    input_name: String,
}

impl OnnxModel {
    /// Load a model from an ONNX file on disk.
    pub fn from_file(path: &Path) -> ort::Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(path)?;
        let input_name = session.inputs()[0].name().to_string();
        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }

    fn run(&self, features: &FeatureVector) -> Result<ModelScore> {
        let input = prepare_input(features)?;
        let input_name = self.input_name.clone();
        let mut session = self.session.lock().unwrap();
        let outputs = session.run(ort::inputs![input_name => input])?;

        // First output: hard labels (e.g. [0] or [1])
        let labels = outputs[0].try_extract_array::<i64>()?;
        let raw_label = labels
            .iter()
            .copied()
            .next()
            .ok_or(DetectError::MalformedOutput("empty label output"))?;
        let label = if raw_label == 0 {
            BinaryLabel::Human
        } else {
            BinaryLabel::Ai
        };

        // Second output: class probabilities (e.g. [[P(human), P(AI)]])
        let probs_array = outputs[1]
            .try_extract_array::<f32>()?
            .into_dimensionality::<ndarray::Ix2>()
            .map_err(|_| DetectError::MalformedOutput("probability output is not 2d"))?;
        if probs_array.ncols() < 2 {
            return Err(DetectError::MalformedOutput(
                "probability output has fewer than two classes",
            ));
        }
        let probability = f64::from(probs_array.row(0)[1]);

        Ok(ModelScore { label, probability })
    }
}

impl ScoringModel for OnnxModel {
    fn probability(&self, features: &FeatureVector) -> Result<f64> {
        Ok(self.run(features)?.probability)
    }

    fn decide(&self, features: &FeatureVector) -> Result<BinaryLabel> {
        Ok(self.run(features)?.label)
    }

    fn score(&self, features: &FeatureVector) -> Result<ModelScore> {
        self.run(features)
    }
}

fn prepare_input(features: &FeatureVector) -> ort::Result<Value<ort::value::TensorValueType<f32>>> {
    let dense = features.to_dense();
    let shape = dense.shape().to_vec();
    let data = dense.into_raw_vec_and_offset().0.into_boxed_slice();

    let input = Tensor::from_array((shape, data))?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_label_wire_values() {
        assert_eq!(i64::from(BinaryLabel::Human), 0);
        assert_eq!(i64::from(BinaryLabel::Ai), 1);
    }

    #[test]
    fn test_binary_label_display() {
        assert_eq!(BinaryLabel::Human.to_string(), "Human");
        assert_eq!(BinaryLabel::Ai.to_string(), "AI");
        assert!(BinaryLabel::Ai.is_ai());
        assert!(!BinaryLabel::Human.is_ai());
    }

    #[test]
    fn test_default_score_combines_both_operations() {
        struct Stub;
        impl ScoringModel for Stub {
            fn probability(&self, _: &FeatureVector) -> Result<f64> {
                Ok(0.75)
            }
            fn decide(&self, _: &FeatureVector) -> Result<BinaryLabel> {
                Ok(BinaryLabel::Ai)
            }
        }

        let features = CsMat::zero((1, 4));
        let score = Stub.score(&features).unwrap();
        assert_eq!(score.label, BinaryLabel::Ai);
        assert!((score.probability - 0.75).abs() < f64::EPSILON);
    }
}
