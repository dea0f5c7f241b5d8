use core::fmt;

use serde::{Deserialize, Serialize};

/// User-facing classification of a fused probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "AI-generated")]
    AiGenerated,
    #[serde(rename = "Human-written")]
    HumanWritten,
    Unknown,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AiGenerated => write!(f, "AI-generated"),
            Self::HumanWritten => write!(f, "Human-written"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Discrete, human-readable confidence derived from a fused probability.
///
/// The tier boundaries are a user-facing contract: lower bounds are inclusive
/// and boundary values belong to the higher-probability tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceTier {
    #[serde(rename = "Very high confidence")]
    VeryHigh,
    #[serde(rename = "High confidence")]
    High,
    #[serde(rename = "Likely")]
    Likely,
    #[serde(rename = "Some evidence")]
    SomeEvidence,
    #[serde(rename = "Uncertain")]
    Uncertain,
    #[serde(rename = "Some evidence (human)")]
    SomeEvidenceHuman,
    #[serde(rename = "Likely human")]
    LikelyHuman,
    Unknown,
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VeryHigh => write!(f, "Very high confidence"),
            Self::High => write!(f, "High confidence"),
            Self::Likely => write!(f, "Likely"),
            Self::SomeEvidence => write!(f, "Some evidence"),
            Self::Uncertain => write!(f, "Uncertain"),
            Self::SomeEvidenceHuman => write!(f, "Some evidence (human)"),
            Self::LikelyHuman => write!(f, "Likely human"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Verdict and confidence tier for one fused probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub label: Verdict,
    pub confidence: ConfidenceTier,
}

/// Map a fused probability to a verdict and confidence tier.
///
/// Pure and total: `None` (no ensemble could be scored) yields the Unknown
/// interpretation rather than an error. The verdict threshold is strictly
/// greater than 0.5, so exactly 0.5 reads as human-written.
#[must_use]
pub fn interpret(probability: Option<f64>) -> Interpretation {
    let Some(p) = probability else {
        return Interpretation {
            label: Verdict::Unknown,
            confidence: ConfidenceTier::Unknown,
        };
    };

    let label = if p > 0.5 {
        Verdict::AiGenerated
    } else {
        Verdict::HumanWritten
    };

    let confidence = if p >= 0.95 {
        ConfidenceTier::VeryHigh
    } else if p >= 0.90 {
        ConfidenceTier::High
    } else if p >= 0.75 {
        ConfidenceTier::Likely
    } else if p >= 0.60 {
        ConfidenceTier::SomeEvidence
    } else if p >= 0.40 {
        ConfidenceTier::Uncertain
    } else if p >= 0.25 {
        ConfidenceTier::SomeEvidenceHuman
    } else {
        ConfidenceTier::LikelyHuman
    };

    Interpretation { label, confidence }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_threshold_is_strict() {
        assert_eq!(interpret(Some(0.5000001)).label, Verdict::AiGenerated);
        assert_eq!(interpret(Some(0.5)).label, Verdict::HumanWritten);
        assert_eq!(interpret(Some(0.4999999)).label, Verdict::HumanWritten);
    }

    #[test]
    fn test_tier_lower_bounds_are_inclusive() {
        assert_eq!(interpret(Some(0.95)).confidence, ConfidenceTier::VeryHigh);
        assert_eq!(interpret(Some(0.9499999)).confidence, ConfidenceTier::High);
        assert_eq!(interpret(Some(0.90)).confidence, ConfidenceTier::High);
        assert_eq!(interpret(Some(0.75)).confidence, ConfidenceTier::Likely);
        assert_eq!(interpret(Some(0.60)).confidence, ConfidenceTier::SomeEvidence);
        assert_eq!(interpret(Some(0.40)).confidence, ConfidenceTier::Uncertain);
        assert_eq!(
            interpret(Some(0.25)).confidence,
            ConfidenceTier::SomeEvidenceHuman
        );
        assert_eq!(
            interpret(Some(0.2499999)).confidence,
            ConfidenceTier::LikelyHuman
        );
    }

    #[test]
    fn test_extremes() {
        let certain_ai = interpret(Some(1.0));
        assert_eq!(certain_ai.label, Verdict::AiGenerated);
        assert_eq!(certain_ai.confidence, ConfidenceTier::VeryHigh);

        let certain_human = interpret(Some(0.0));
        assert_eq!(certain_human.label, Verdict::HumanWritten);
        assert_eq!(certain_human.confidence, ConfidenceTier::LikelyHuman);
    }

    #[test]
    fn test_absent_probability_is_unknown() {
        let unknown = interpret(None);
        assert_eq!(unknown.label, Verdict::Unknown);
        assert_eq!(unknown.confidence, ConfidenceTier::Unknown);
    }

    #[test]
    fn test_uncertain_band_spans_the_verdict_boundary() {
        // Both sides of 0.5 sit in the same tier; only the verdict flips.
        let below = interpret(Some(0.45));
        let above = interpret(Some(0.55));
        assert_eq!(below.confidence, ConfidenceTier::Uncertain);
        assert_eq!(above.confidence, ConfidenceTier::Uncertain);
        assert_eq!(below.label, Verdict::HumanWritten);
        assert_eq!(above.label, Verdict::AiGenerated);
    }

    #[test]
    fn test_wire_strings() {
        assert_eq!(
            serde_json::to_string(&Verdict::AiGenerated).unwrap(),
            "\"AI-generated\""
        );
        assert_eq!(
            serde_json::to_string(&Verdict::HumanWritten).unwrap(),
            "\"Human-written\""
        );
        assert_eq!(
            serde_json::to_string(&ConfidenceTier::SomeEvidenceHuman).unwrap(),
            "\"Some evidence (human)\""
        );
        assert_eq!(
            serde_json::to_string(&ConfidenceTier::Unknown).unwrap(),
            "\"Unknown\""
        );
    }
}
