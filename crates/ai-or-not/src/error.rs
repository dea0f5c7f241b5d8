use thiserror::Error;

/// Errors produced while loading artifacts or scoring text.
///
/// Caller errors (bad request input) are distinguished from configuration and
/// inference failures so the host can map them to the right response class.
#[derive(Error, Debug)]
pub enum DetectError {
    /// The request carried no text.
    #[error("No text provided")]
    EmptyText,

    /// The requested ensemble name is not a supported mode.
    #[error("Invalid model type selected")]
    UnknownMode(String),

    /// A required artifact file is absent from the artifact directory.
    #[error("Missing model artifact: {0}")]
    MissingArtifact(&'static str),

    /// An artifact exists but could not be read or decoded.
    #[error("Failed to load artifact {name}: {reason}")]
    Artifact { name: &'static str, reason: String },

    /// The extractor's feature width does not match what a model was trained against.
    #[error("Feature dimension mismatch: extractor produces {actual}, model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A model produced output that does not follow the classifier contract.
    #[error("Malformed model output: {0}")]
    MalformedOutput(&'static str),

    /// ONNX Runtime failure during scoring.
    #[error("Inference error: {0}")]
    Inference(#[from] ort::Error),
}

impl DetectError {
    /// True for errors caused by the caller's input (400-class), as opposed to
    /// configuration or scoring failures (fatal at startup, 500-class per request).
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::EmptyText | Self::UnknownMode(_))
    }
}

/// Convenience alias for `std::result::Result<T, DetectError>`.
pub type Result<T> = std::result::Result<T, DetectError>;
