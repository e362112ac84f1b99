//! Image analysis models for the weed and insect detectors

use serde::{Deserialize, Serialize};

use crate::models::ChatRole;

/// Which analyzer to run on a field photo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DetectionKind {
    Weed,
    Insect,
}

impl std::fmt::Display for DetectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionKind::Weed => write!(f, "weed"),
            DetectionKind::Insect => write!(f, "insect"),
        }
    }
}

/// Photo to analyze, as a data URL or bare base64
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRequest {
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionReply {
    pub role: ChatRole,
    pub content: String,
}
