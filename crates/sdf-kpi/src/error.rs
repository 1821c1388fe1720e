//! Error types for KPI evaluation and project operations.

use std::path::PathBuf;

use sdf_models::{KpiId, KpiKind};
use thiserror::Error;

/// Errors that can occur while building, evaluating or registering KPIs.
#[derive(Error, Debug)]
pub enum KpiError {
    /// Payload does not have the shape its kind requires.
    #[error("invalid {kind} payload: {reason}")]
    InvalidPayload { kind: KpiKind, reason: String },

    /// A KPI declared without phases or development types.
    #[error("empty {0}")]
    EmptyApplicability(&'static str),

    /// A KPI identifier registered twice in one project.
    #[error("KPI identifier already exists: {0}")]
    DuplicateKpi(KpiId),

    /// A question without a selected reply.
    #[error("reply for question {question:?} was not selected")]
    MissingReply { question: String },

    /// A selected reply that is not one of the question's options.
    #[error("reply {reply:?} is not an option of question {question:?}")]
    UnknownReply { question: String, reply: String },

    /// Normalisation or classification needs thresholds that are not set.
    #[error("good and leading practice thresholds are required")]
    MissingThresholds,

    /// Normalisation is only defined for numeric KPI kinds.
    #[error("normalisation is not implemented for {0} KPIs")]
    NormalisationNotImplemented(KpiKind),

    /// Status classification needs a non-zero raw score.
    #[error("a raw score is required to define the KPI status")]
    MissingRawScore,

    /// Raw score fell outside every status band.
    #[error("status evaluation out of bounds: raw {raw}, good {good}, leading {leading}")]
    StatusOutOfBounds { raw: f64, good: f64, leading: f64 },

    /// Failed to read a definition file.
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a definition file.
    #[error("failed to parse definition: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Result type alias for KPI operations.
pub type Result<T> = std::result::Result<T, KpiError>;
