use std::sync::Arc;

use log::{error, info};
use shared::{ImageInput, Label, LabelRequest};

use crate::error::LabelError;
use crate::image_source::{ImageFetcher, decode_base64_image};
use crate::vision::{LabelQuery, VisionClient};

/// One labeling pass: resolve the image bytes, ask the vision service, hand
/// back canonical labels. Holds no per-request state.
#[derive(Clone)]
pub struct LabelService {
    fetcher: Arc<dyn ImageFetcher>,
    vision: Arc<dyn VisionClient>,
    query: LabelQuery,
}

impl LabelService {
    pub fn new(
        fetcher: Arc<dyn ImageFetcher>,
        vision: Arc<dyn VisionClient>,
        query: LabelQuery,
    ) -> Self {
        Self {
            fetcher,
            vision,
            query,
        }
    }

    pub async fn label(&self, request: &LabelRequest) -> Result<Vec<Label>, LabelError> {
        let input = request.image_input().ok_or(LabelError::MissingImage)?;

        let result = self.label_input(&input).await;
        match &result {
            Ok(labels) => info!("Detected labels: {:?}", labels),
            Err(e) => error!("Labeling failed: {}", e),
        }
        result
    }

    async fn label_input(&self, input: &ImageInput) -> Result<Vec<Label>, LabelError> {
        let image = self.load_image(input).await?;
        let labels = self.vision.detect_labels(image, &self.query).await?;
        Ok(labels)
    }

    async fn load_image(&self, input: &ImageInput) -> Result<Vec<u8>, LabelError> {
        let image = match input {
            ImageInput::Base64(data) => {
                info!("Decoding inline image ({} chars)", data.len());
                decode_base64_image(data)?
            }
            ImageInput::Url(url) => {
                info!("Fetching image from {}", url);
                self.fetcher.fetch(url).await?
            }
        };

        if image.is_empty() {
            return Err(LabelError::EmptyImage);
        }
        Ok(image)
    }
}
