pub mod analysis;
pub mod color;
pub mod normalize;
pub mod progress;

use serde::{Deserialize, Serialize};

/// Error text returned by the label service when a request names no image.
pub const MISSING_IMAGE_MESSAGE: &str = "Provide imageUrl or imageBase64";

/// Where the image bytes come from. A base64 payload may still carry its
/// `data:<mime>;base64,` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    Url(String),
    Base64(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LabelRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
}

impl LabelRequest {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            image_url: Some(url.into()),
            image_base64: None,
        }
    }

    pub fn from_base64(data: impl Into<String>) -> Self {
        Self {
            image_url: None,
            image_base64: Some(data.into()),
        }
    }

    /// Picks the image source for this request. Inline data wins over a URL
    /// when both are set; empty strings count as absent.
    pub fn image_input(&self) -> Option<ImageInput> {
        fn present(field: &Option<String>) -> Option<String> {
            field.as_deref().filter(|value| !value.is_empty()).map(str::to_owned)
        }

        present(&self.image_base64)
            .map(ImageInput::Base64)
            .or_else(|| present(&self.image_url).map(ImageInput::Url))
    }
}

impl From<ImageInput> for LabelRequest {
    fn from(input: ImageInput) -> Self {
        match input {
            ImageInput::Url(url) => Self::from_url(url),
            ImageInput::Base64(data) => Self::from_base64(data),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Label {
    pub name: String,
    pub confidence: f64,
}

impl Label {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LabelResponse {
    pub labels: Vec<Label>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case_fields() {
        let json = serde_json::to_value(LabelRequest::from_url("https://example.com/cat.jpg")).unwrap();
        assert_eq!(json, serde_json::json!({ "imageUrl": "https://example.com/cat.jpg" }));

        let json = serde_json::to_value(LabelRequest::from_base64("AAAA")).unwrap();
        assert_eq!(json, serde_json::json!({ "imageBase64": "AAAA" }));
    }

    #[test]
    fn test_base64_takes_priority_over_url() {
        let a: LabelRequest =
            serde_json::from_str(r#"{"imageUrl":"https://x/y.png","imageBase64":"AAAA"}"#).unwrap();
        let b: LabelRequest =
            serde_json::from_str(r#"{"imageBase64":"AAAA","imageUrl":"https://x/y.png"}"#).unwrap();

        assert_eq!(a.image_input(), Some(ImageInput::Base64("AAAA".into())));
        assert_eq!(a.image_input(), b.image_input());
    }

    #[test]
    fn test_missing_or_empty_fields_yield_no_input() {
        let empty: LabelRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.image_input(), None);

        let blank: LabelRequest =
            serde_json::from_str(r#"{"imageUrl":"","imageBase64":""}"#).unwrap();
        assert_eq!(blank.image_input(), None);

        let url_only: LabelRequest =
            serde_json::from_str(r#"{"imageUrl":"https://x/y.png","imageBase64":""}"#).unwrap();
        assert_eq!(url_only.image_input(), Some(ImageInput::Url("https://x/y.png".into())));
    }

    #[test]
    fn test_request_from_image_input() {
        let request = LabelRequest::from(ImageInput::Base64("data:image/png;base64,AAAA".into()));
        assert_eq!(request.image_base64.as_deref(), Some("data:image/png;base64,AAAA"));
        assert!(request.image_url.is_none());
    }
}
