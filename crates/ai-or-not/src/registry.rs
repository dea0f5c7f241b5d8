use core::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use ai_or_not_preprocessing::pre_processor::CountVectorizer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ensemble::{Ensemble, EnsembleScore};
use crate::interpret::{interpret, ConfidenceTier, Verdict};
use crate::model::OnnxModel;
use crate::{DetectError, Result};

/// Model artifact version served by this build.
///
/// Artifacts live under `<artifacts_dir>/<MODEL_VERSION>/`; bump this when
/// releasing a new artifact set.
pub const MODEL_VERSION: &str = "1.0.0";

const NB_UNIGRAM_FILENAME: &str = "nb-unigram.onnx";
const LR_UNIGRAM_FILENAME: &str = "lr-unigram.onnx";
const UNIGRAM_VECTORIZER_FILENAME: &str = "unigram-vectorizer.bin";
const RF_BIGRAM_FILENAME: &str = "rf-bigram.onnx";
const LGB_BIGRAM_FILENAME: &str = "lgb-bigram.onnx";
const BIGRAM_VECTORIZER_FILENAME: &str = "bigram-vectorizer.bin";

/// Required artifact filenames (relative to the version directory)
const REQUIRED_ARTIFACTS: &[&str] = &[
    NB_UNIGRAM_FILENAME,
    LR_UNIGRAM_FILENAME,
    UNIGRAM_VECTORIZER_FILENAME,
    RF_BIGRAM_FILENAME,
    LGB_BIGRAM_FILENAME,
    BIGRAM_VECTORIZER_FILENAME,
];

/// Which ensemble to run for a request. Closed set: anything else is rejected
/// at the boundary before it reaches the orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnsembleKind {
    #[default]
    Unigram,
    Bigram,
}

impl fmt::Display for EnsembleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unigram => write!(f, "unigram"),
            Self::Bigram => write!(f, "bigram"),
        }
    }
}

impl FromStr for EnsembleKind {
    type Err = DetectError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "unigram" => Ok(Self::Unigram),
            "bigram" => Ok(Self::Bigram),
            other => Err(DetectError::UnknownMode(other.to_string())),
        }
    }
}

/// Unigram-ensemble result with mode-scoped field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnigramReport {
    pub nb_prediction_uni: i64,
    pub lr_prediction_uni: i64,
    pub combined_prediction_uni: i64,
    pub nb_probs_uni: f64,
    pub lr_probs_uni: f64,
    pub combined_probs_uni: f64,
    pub combined_label_uni: Verdict,
    pub combined_confidence_uni: ConfidenceTier,
}

impl UnigramReport {
    fn from_score(score: &EnsembleScore) -> Self {
        let interp = interpret(Some(score.fused.probability));
        Self {
            nb_prediction_uni: score.first.label.into(),
            lr_prediction_uni: score.second.label.into(),
            combined_prediction_uni: score.fused.label.into(),
            nb_probs_uni: score.first.probability,
            lr_probs_uni: score.second.probability,
            combined_probs_uni: score.fused.probability,
            combined_label_uni: interp.label,
            combined_confidence_uni: interp.confidence,
        }
    }
}

/// Bigram-ensemble result with mode-scoped field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BigramReport {
    pub rf_prediction_bi: i64,
    pub lgb_prediction_bi: i64,
    pub combined_prediction_bi: i64,
    pub rf_probs_bi: f64,
    pub lgb_probs_bi: f64,
    pub combined_probs_bi: f64,
    pub combined_label_bi: Verdict,
    pub combined_confidence_bi: ConfidenceTier,
}

impl BigramReport {
    fn from_score(score: &EnsembleScore) -> Self {
        let interp = interpret(Some(score.fused.probability));
        Self {
            rf_prediction_bi: score.first.label.into(),
            lgb_prediction_bi: score.second.label.into(),
            combined_prediction_bi: score.fused.label.into(),
            rf_probs_bi: score.first.probability,
            lgb_probs_bi: score.second.probability,
            combined_probs_bi: score.fused.probability,
            combined_label_bi: interp.label,
            combined_confidence_bi: interp.confidence,
        }
    }
}

/// One inference result. Field sets are scoped by the selected mode and never
/// merged across modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InferenceReport {
    Unigram(UnigramReport),
    Bigram(BigramReport),
}

impl InferenceReport {
    #[must_use]
    pub fn fused_probability(&self) -> f64 {
        match self {
            Self::Unigram(r) => r.combined_probs_uni,
            Self::Bigram(r) => r.combined_probs_bi,
        }
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Unigram(r) => r.combined_label_uni,
            Self::Bigram(r) => r.combined_label_bi,
        }
    }

    #[must_use]
    pub fn confidence(&self) -> ConfidenceTier {
        match self {
            Self::Unigram(r) => r.combined_confidence_uni,
            Self::Bigram(r) => r.combined_confidence_bi,
        }
    }
}

/// Process-wide immutable registry of both ensembles.
///
/// Built once at startup and injected into request handling; entirely
/// stateless across calls.
#[derive(Debug)]
pub struct Detector {
    unigram: Ensemble,
    bigram: Ensemble,
}

impl Detector {
    /// Assemble a detector from already-built ensembles.
    ///
    /// This is the seam for test doubles; production code goes through
    /// [`Detector::load`].
    #[must_use]
    pub fn from_parts(unigram: Ensemble, bigram: Ensemble) -> Self {
        Self { unigram, bigram }
    }

    /// Load all six artifacts from `<artifacts_dir>/<MODEL_VERSION>/` and
    /// validate each extractor/model pairing with a probe inference.
    ///
    /// # Errors
    ///
    /// Any missing, unreadable, or mismatched artifact fails the whole load;
    /// the service must not accept traffic in that state.
    pub fn load(artifacts_dir: &Path) -> Result<Self> {
        let version_dir = artifacts_dir.join(MODEL_VERSION);
        for &name in REQUIRED_ARTIFACTS {
            if !version_dir.join(name).exists() {
                return Err(DetectError::MissingArtifact(name));
            }
        }

        let unigram = Ensemble::new(
            load_vectorizer(&version_dir, UNIGRAM_VECTORIZER_FILENAME)?,
            load_model(&version_dir, NB_UNIGRAM_FILENAME)?,
            load_model(&version_dir, LR_UNIGRAM_FILENAME)?,
        )?;
        let bigram = Ensemble::new(
            load_vectorizer(&version_dir, BIGRAM_VECTORIZER_FILENAME)?,
            load_model(&version_dir, RF_BIGRAM_FILENAME)?,
            load_model(&version_dir, LGB_BIGRAM_FILENAME)?,
        )?;

        unigram.validate()?;
        bigram.validate()?;

        info!(
            version = MODEL_VERSION,
            unigram_features = unigram.num_features(),
            bigram_features = bigram.num_features(),
            "Model registry loaded"
        );
        Ok(Self::from_parts(unigram, bigram))
    }

    /// Classify one text with the selected ensemble.
    ///
    /// Runs the extractor once, both members once each, fuses, interprets,
    /// and assembles the mode-scoped report. Deterministic: identical
    /// arguments yield identical results.
    pub fn infer(&self, text: &str, mode: EnsembleKind) -> Result<InferenceReport> {
        if text.is_empty() {
            return Err(DetectError::EmptyText);
        }
        debug!(%mode, chars = text.len(), "Running inference");

        match mode {
            EnsembleKind::Unigram => {
                let score = self.unigram.score(text)?;
                Ok(InferenceReport::Unigram(UnigramReport::from_score(&score)))
            }
            EnsembleKind::Bigram => {
                let score = self.bigram.score(text)?;
                Ok(InferenceReport::Bigram(BigramReport::from_score(&score)))
            }
        }
    }
}

fn load_vectorizer(dir: &Path, name: &'static str) -> Result<CountVectorizer> {
    let bytes = std::fs::read(dir.join(name)).map_err(|e| DetectError::Artifact {
        name,
        reason: e.to_string(),
    })?;
    CountVectorizer::from_bytes(&bytes).map_err(|e| DetectError::Artifact {
        name,
        reason: e.to_string(),
    })
}

fn load_model(dir: &Path, name: &'static str) -> Result<Arc<OnnxModel>> {
    let model = OnnxModel::from_file(&dir.join(name)).map_err(|e| DetectError::Artifact {
        name,
        reason: e.to_string(),
    })?;
    Ok(Arc::new(model))
}
