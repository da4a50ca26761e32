use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use shared::Label;

use super::{LabelQuery, VisionClient, VisionError};

/// In-process stand-in for the vision service. Applies the query limits the
/// way the real service does and records every call.
pub struct FakeVision {
    labels: Vec<Label>,
    failure: Option<String>,
    calls: AtomicUsize,
    last_image: Mutex<Option<Vec<u8>>>,
}

impl FakeVision {
    pub fn new(labels: Vec<Label>) -> Self {
        Self {
            labels,
            failure: None,
            calls: AtomicUsize::new(0),
            last_image: Mutex::new(None),
        }
    }

    #[cfg(test)]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new(vec![])
        }
    }

    /// Fixed labels for running the app locally without AWS credentials.
    pub fn sample() -> Self {
        Self::new(vec![
            Label::new("Animal", 99.1),
            Label::new("Cat", 97.4),
            Label::new("Pet", 93.0),
            Label::new("Whiskers", 71.8),
            Label::new("Couch", 38.2),
            Label::new("Blanket", 12.5),
        ])
    }

    #[cfg(test)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn last_image(&self) -> Option<Vec<u8>> {
        self.last_image.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl VisionClient for FakeVision {
    async fn detect_labels(
        &self,
        image: Vec<u8>,
        query: &LabelQuery,
    ) -> Result<Vec<Label>, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_image.lock() {
            *guard = Some(image);
        }

        if let Some(message) = &self.failure {
            return Err(VisionError::Unavailable(message.clone()));
        }

        let max_labels = usize::try_from(query.max_labels).unwrap_or(0);
        Ok(self
            .labels
            .iter()
            .filter(|label| label.confidence >= f64::from(query.min_confidence))
            .take(max_labels)
            .cloned()
            .collect())
    }
}
