use std::fmt;
use std::sync::Arc;

use ai_or_not_preprocessing::pre_processor::CountVectorizer;
use sprs::CsMat;
use tracing::debug;

use crate::model::{BinaryLabel, FeatureVector, ModelScore, ScoringModel};
use crate::{DetectError, Result};

/// Mean-fused probability and the hard decision derived from it.
#[derive(Debug, Clone, Copy)]
pub struct FusedScore {
    pub probability: f64,
    pub label: BinaryLabel,
}

/// Fuse two member probabilities into one score.
///
/// The fused probability is the unweighted arithmetic mean. The fused label
/// is a strict threshold on the mean: a tie at exactly 0.5 reads as human,
/// regardless of the members' own hard labels.
#[must_use]
pub fn fuse(p1: f64, p2: f64) -> FusedScore {
    let probability = (p1 + p2) / 2.0;
    let label = if probability > 0.5 {
        BinaryLabel::Ai
    } else {
        BinaryLabel::Human
    };
    FusedScore { probability, label }
}

/// Both members' raw outputs plus the fused score for one text.
#[derive(Debug, Clone, Copy)]
pub struct EnsembleScore {
    pub first: ModelScore,
    pub second: ModelScore,
    pub fused: FusedScore,
}

/// Two scoring models sharing one feature extractor.
///
/// Immutable after construction; shared read-only across concurrent calls.
pub struct Ensemble {
    extractor: CountVectorizer,
    first: Arc<dyn ScoringModel>,
    second: Arc<dyn ScoringModel>,
}

impl fmt::Debug for Ensemble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ensemble")
            .field("num_features", &self.extractor.num_features())
            .finish_non_exhaustive()
    }
}

impl Ensemble {
    /// Pair an extractor with its two models.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::DimensionMismatch`] when a model declares a
    /// trained input width that differs from the extractor's feature width.
    /// A mismatched pairing is a deployment bug, not a caller error.
    pub fn new(
        extractor: CountVectorizer,
        first: Arc<dyn ScoringModel>,
        second: Arc<dyn ScoringModel>,
    ) -> Result<Self> {
        let actual = extractor.num_features();
        for model in [&first, &second] {
            if let Some(expected) = model.input_width() {
                if expected != actual {
                    return Err(DetectError::DimensionMismatch { expected, actual });
                }
            }
        }
        Ok(Self {
            extractor,
            first,
            second,
        })
    }

    /// Extract features once, score both members, fuse.
    pub fn score(&self, text: &str) -> Result<EnsembleScore> {
        let features: FeatureVector = self.extractor.transform(&[text]);
        debug!(
            features = features.nnz(),
            width = features.cols(),
            "Scoring text against ensemble members"
        );
        let first = self.first.score(&features)?;
        let second = self.second.score(&features)?;
        let fused = fuse(first.probability, second.probability);
        Ok(EnsembleScore {
            first,
            second,
            fused,
        })
    }

    /// Run one throwaway inference against an all-zeros feature row.
    ///
    /// Surfaces extractor/model pairing problems the models do not declare
    /// statically (e.g. an ONNX graph with a different input width) at load
    /// time instead of on the first real request.
    pub fn validate(&self) -> Result<()> {
        let probe: FeatureVector = CsMat::zero((1, self.extractor.num_features()));
        self.first.score(&probe)?;
        self.second.score(&probe)?;
        Ok(())
    }

    #[must_use]
    pub fn num_features(&self) -> usize {
        self.extractor.num_features()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_or_not_preprocessing::pre_processor::VectorizerParams;

    struct FixedModel {
        probability: f64,
        width: Option<usize>,
    }

    impl FixedModel {
        fn new(probability: f64) -> Arc<Self> {
            Arc::new(Self {
                probability,
                width: None,
            })
        }

        fn with_width(probability: f64, width: usize) -> Arc<Self> {
            Arc::new(Self {
                probability,
                width: Some(width),
            })
        }
    }

    impl ScoringModel for FixedModel {
        fn probability(&self, _: &FeatureVector) -> Result<f64> {
            Ok(self.probability)
        }

        fn decide(&self, _: &FeatureVector) -> Result<BinaryLabel> {
            Ok(if self.probability > 0.5 {
                BinaryLabel::Ai
            } else {
                BinaryLabel::Human
            })
        }

        fn input_width(&self) -> Option<usize> {
            self.width
        }
    }

    fn test_extractor() -> CountVectorizer {
        CountVectorizer::fit(
            &["the quick brown fox", "a lazy dog sleeps"],
            VectorizerParams::new(1..=1, 1),
        )
    }

    #[test]
    fn test_fuse_is_exact_mean() {
        let cases = [(0.8, 0.6, 0.7), (0.1, 0.2, 0.15), (0.0, 1.0, 0.5)];
        for (p1, p2, expected) in cases {
            let fused = fuse(p1, p2);
            assert!(
                (fused.probability - expected).abs() < 1e-9,
                "fuse({p1}, {p2}) = {}, expected {expected}",
                fused.probability
            );
        }
    }

    #[test]
    fn test_fuse_label_threshold_is_strict() {
        assert_eq!(fuse(0.8, 0.6).label, BinaryLabel::Ai);
        assert_eq!(fuse(0.1, 0.2).label, BinaryLabel::Human);
        // Tie at exactly 0.5 resolves to human
        assert_eq!(fuse(0.5, 0.5).label, BinaryLabel::Human);
        assert_eq!(fuse(0.0, 1.0).label, BinaryLabel::Human);
    }

    #[test]
    fn test_fused_label_ignores_member_hard_labels() {
        // Members disagree (0.9 says AI, 0.2 says human); the fused decision
        // only looks at the mean.
        let score = fuse(0.9, 0.2);
        assert!((score.probability - 0.55).abs() < 1e-9);
        assert_eq!(score.label, BinaryLabel::Ai);
    }

    #[test]
    fn test_ensemble_scores_both_members() {
        let ensemble = Ensemble::new(
            test_extractor(),
            FixedModel::new(0.8),
            FixedModel::new(0.6),
        )
        .unwrap();

        let score = ensemble.score("the quick brown fox").unwrap();
        assert!((score.first.probability - 0.8).abs() < f64::EPSILON);
        assert!((score.second.probability - 0.6).abs() < f64::EPSILON);
        assert!((score.fused.probability - 0.7).abs() < 1e-9);
        assert_eq!(score.fused.label, BinaryLabel::Ai);
    }

    #[test]
    fn test_ensemble_rejects_mismatched_width() {
        let extractor = test_extractor();
        let wrong_width = extractor.num_features() + 3;
        let result = Ensemble::new(
            extractor,
            FixedModel::with_width(0.8, wrong_width),
            FixedModel::new(0.6),
        );
        assert!(matches!(
            result,
            Err(DetectError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_ensemble_accepts_matching_width() {
        let extractor = test_extractor();
        let width = extractor.num_features();
        let ensemble = Ensemble::new(
            extractor,
            FixedModel::with_width(0.8, width),
            FixedModel::with_width(0.6, width),
        );
        assert!(ensemble.is_ok());
        assert!(ensemble.unwrap().validate().is_ok());
    }
}
