//! Errors raised where raw provider data enters the domain model

use thiserror::Error;

/// Input that cannot be turned into a time series
///
/// The insight engine itself never fails; this is raised at the boundary,
/// before a series reaches it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InsightError {
    #[error("Malformed {parameter} series at {timestamp}: {detail}")]
    InputShape {
        parameter: String,
        timestamp: String,
        detail: String,
    },

    #[error("Malformed {parameter} series: expected an object keyed by timestamp")]
    NotAnObject { parameter: String },
}

impl InsightError {
    pub fn parameter(&self) -> &str {
        match self {
            InsightError::InputShape { parameter, .. } => parameter,
            InsightError::NotAnObject { parameter } => parameter,
        }
    }
}
