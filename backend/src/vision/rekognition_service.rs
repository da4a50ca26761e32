use async_trait::async_trait;
use aws_sdk_rekognition::Client;
use aws_sdk_rekognition::error::{DisplayErrorContext, SdkError};
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Image, Label as RekognitionLabel};
use shared::Label;

use super::{LabelQuery, VisionClient, VisionError};

#[derive(Clone)]
pub struct RekognitionService {
    client: Client,
}

impl RekognitionService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VisionClient for RekognitionService {
    async fn detect_labels(
        &self,
        image: Vec<u8>,
        query: &LabelQuery,
    ) -> Result<Vec<Label>, VisionError> {
        log::debug!(
            "Calling DetectLabels with {} bytes (max_labels={}, min_confidence={})",
            image.len(),
            query.max_labels,
            query.min_confidence
        );

        let output = self
            .client
            .detect_labels()
            .image(Image::builder().bytes(Blob::new(image)).build())
            .max_labels(query.max_labels)
            .min_confidence(query.min_confidence)
            .send()
            .await
            .map_err(to_vision_error)?;

        Ok(output.labels().iter().map(to_label).collect())
    }
}

/// Requests that never got an answer are reported as the service being
/// unavailable. Everything else is an error returned by Rekognition.
fn to_vision_error<E, R>(error: SdkError<E, R>) -> VisionError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&error).to_string();
    match error {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            VisionError::Unavailable(message)
        }
        _ => VisionError::Rekognition(message),
    }
}

fn to_label(label: &RekognitionLabel) -> Label {
    Label::new(
        label.name().unwrap_or_default(),
        label.confidence().map(f64::from).unwrap_or(0.0),
    )
}
