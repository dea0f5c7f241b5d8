//! # ai-or-not
//!
//! Dual-ensemble AI text detection built with Rust.
//!
//! Two fixed ensembles decide whether a text reads as AI-generated or
//! human-written: a unigram ensemble (naive Bayes + logistic regression over
//! unigram counts) and a bigram ensemble (random forest + gradient boosting
//! over bigram counts). Each request runs exactly one ensemble; the two
//! member probabilities are averaged and the mean is mapped to a verdict and
//! a human-readable confidence tier.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ai_or_not::{Detector, EnsembleKind};
//!
//! let detector = Detector::load(Path::new("model_artifacts"))?;
//!
//! let report = detector.infer("Some text to analyze", EnsembleKind::Unigram)?;
//! println!(
//!     "{} ({}), P(AI) = {:.2}",
//!     report.verdict(),
//!     report.confidence(),
//!     report.fused_probability()
//! );
//! # Ok::<(), ai_or_not::DetectError>(())
//! ```
//!
//! ## Custom models
//!
//! The scoring algorithm is substitutable behind [`ScoringModel`]; fusion and
//! interpretation never look inside the models. [`Detector::from_parts`]
//! assembles a detector from hand-built [`Ensemble`]s, which is also the seam
//! test doubles use.

mod ensemble;
mod error;
mod interpret;
mod model;
mod registry;

pub use ensemble::{fuse, Ensemble, EnsembleScore, FusedScore};
pub use error::{DetectError, Result};
pub use interpret::{interpret, ConfidenceTier, Interpretation, Verdict};
pub use model::{BinaryLabel, FeatureVector, ModelScore, OnnxModel, ScoringModel};
pub use registry::{
    BigramReport, Detector, EnsembleKind, InferenceReport, UnigramReport, MODEL_VERSION,
};
