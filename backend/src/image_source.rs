use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use futures::StreamExt;
use url::Url;

use crate::error::LabelError;

// Browsers and hand-built payloads disagree on padding, so accept either.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Drops a `data:<mime>;base64,` prefix, i.e. everything up to and including
/// the first comma.
pub fn strip_data_url_prefix(data: &str) -> &str {
    data.split_once(',').map_or(data, |(_, payload)| payload)
}

pub fn decode_base64_image(data: &str) -> Result<Vec<u8>, LabelError> {
    let payload: String = strip_data_url_prefix(data)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(LENIENT_BASE64.decode(payload)?)
}

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LabelError>;
}

#[derive(Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
    max_bytes: Option<usize>,
}

impl HttpImageFetcher {
    pub fn new(timeout: Option<Duration>, max_bytes: Option<usize>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            max_bytes,
        })
    }

    fn check_size(&self, size: usize) -> Result<(), LabelError> {
        match self.max_bytes {
            Some(limit) if size > limit => Err(LabelError::ImageTooLarge { limit }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LabelError> {
        let url = Url::parse(url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LabelError::UnsupportedScheme(url.scheme().to_string()));
        }

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LabelError::FetchStatus(status.as_u16()));
        }

        if let Some(length) = response.content_length() {
            self.check_size(usize::try_from(length).unwrap_or(usize::MAX))?;
        }

        let mut image_data = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let data = chunk?;
            image_data.extend_from_slice(&data);
            self.check_size(image_data.len())?;
        }

        log::info!("Fetched {} bytes from {}", image_data.len(), url);
        Ok(image_data)
    }
}
