pub mod fake_service;
pub mod rekognition_service;

use async_trait::async_trait;
use shared::Label;

pub const DEFAULT_MAX_LABELS: i32 = 15;
pub const DEFAULT_MIN_CONFIDENCE: f32 = 35.0;

/// Limits passed along with every labeling call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelQuery {
    pub max_labels: i32,
    pub min_confidence: f32,
}

impl Default for LabelQuery {
    fn default() -> Self {
        Self {
            max_labels: DEFAULT_MAX_LABELS,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("Rekognition error: {0}")]
    Rekognition(String),
    #[error("Vision service unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait VisionClient: Send + Sync {
    async fn detect_labels(
        &self,
        image: Vec<u8>,
        query: &LabelQuery,
    ) -> Result<Vec<Label>, VisionError>;
}
