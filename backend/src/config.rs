use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::vision::{DEFAULT_MAX_LABELS, DEFAULT_MIN_CONFIDENCE, LabelQuery};

const DEFAULT_CONFIG_PATH: &str = "config/labeler.yaml";
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisionProvider {
    #[default]
    Rekognition,
    Fake,
}

impl FromStr for VisionProvider {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rekognition" => Ok(VisionProvider::Rekognition),
            "fake" => Ok(VisionProvider::Fake),
            _ => Err(()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("{0}")]
    OutOfRange(String),
}

/// Service settings. Loaded from an optional YAML file, then overridden by
/// environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelerConfig {
    pub host: String,
    pub port: u16,
    pub aws_region: Option<String>,
    pub vision_provider: VisionProvider,
    pub max_labels: i32,
    pub min_confidence: f32,
    pub image_fetch_timeout_secs: Option<u64>,
    pub max_image_bytes: Option<usize>,
    pub max_request_bytes: usize,
    pub frontend_dir: Option<String>,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            aws_region: None,
            vision_provider: VisionProvider::default(),
            max_labels: DEFAULT_MAX_LABELS,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            image_fetch_timeout_secs: None,
            max_image_bytes: None,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            frontend_dir: None,
        }
    }
}

impl LabelerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_file_path() {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::from_yaml_file(&path)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = parse_var(&lookup, "PORT")? {
            self.port = port;
        }
        if let Some(region) = lookup("AWS_REGION") {
            self.aws_region = Some(region);
        }
        if let Some(provider) = lookup("VISION_PROVIDER") {
            self.vision_provider = match provider.parse() {
                Ok(parsed) => parsed,
                Err(()) => {
                    return Err(ConfigError::InvalidValue {
                        key: "VISION_PROVIDER",
                        value: provider,
                    });
                }
            };
        }
        if let Some(max_labels) = parse_var(&lookup, "MAX_LABELS")? {
            self.max_labels = max_labels;
        }
        if let Some(min_confidence) = parse_var(&lookup, "MIN_CONFIDENCE")? {
            self.min_confidence = min_confidence;
        }
        if let Some(timeout) = parse_var(&lookup, "IMAGE_FETCH_TIMEOUT_SECS")? {
            self.image_fetch_timeout_secs = Some(timeout);
        }
        if let Some(max_bytes) = parse_var(&lookup, "MAX_IMAGE_BYTES")? {
            self.max_image_bytes = Some(max_bytes);
        }
        if let Some(max_bytes) = parse_var(&lookup, "MAX_REQUEST_BYTES")? {
            self.max_request_bytes = max_bytes;
        }
        if let Some(dir) = lookup("FRONTEND_DIR") {
            self.frontend_dir = Some(dir);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_labels < 1 {
            return Err(ConfigError::OutOfRange(format!(
                "max_labels must be at least 1, got {}",
                self.max_labels
            )));
        }
        if !(0.0..=100.0).contains(&self.min_confidence) {
            return Err(ConfigError::OutOfRange(format!(
                "min_confidence must be within 0..=100, got {}",
                self.min_confidence
            )));
        }
        if self.image_fetch_timeout_secs == Some(0) {
            return Err(ConfigError::OutOfRange(
                "image_fetch_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn label_query(&self) -> LabelQuery {
        LabelQuery {
            max_labels: self.max_labels,
            min_confidence: self.min_confidence,
        }
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.image_fetch_timeout_secs.map(Duration::from_secs)
    }

    pub fn frontend_dir(&self) -> String {
        if let Some(dir) = &self.frontend_dir {
            return dir.clone();
        }
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            format!("{}/../frontend/dist", manifest_dir)
        } else {
            "/usr/src/app/frontend/dist".to_string()
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("LABELER_CONFIG") {
        return Some(PathBuf::from(path));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_PATH);
    default.exists().then_some(default)
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    match value.trim().parse() {
        Ok(parsed) => Ok(Some(parsed)),
        Err(_) => Err(ConfigError::InvalidValue { key, value }),
    }
}
