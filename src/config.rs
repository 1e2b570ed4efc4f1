use anyhow::Result;
use serde::Deserialize;

use crate::capture::CaptureConstraints;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub api: ApiConfig,
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "form-check".to_string(),
        }
    }
}

/// Analysis service location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base address; requests go to `{base_url}/analyze`
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

/// Camera/microphone and recorder settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Requested video width in pixels
    pub width: u32,
    /// Requested video height in pixels
    pub height: u32,
    /// Whether to request a microphone track alongside video
    pub audio: bool,
    /// Codec the recorder is asked to negotiate
    pub mime_type: String,
    /// Capacity of the fragment channel between recorder and session
    pub fragment_buffer: usize,
    /// Fragment size in bytes for replay devices
    pub fragment_size: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            audio: true,
            mime_type: "video/webm;codecs=vp9".to_string(),
            fragment_buffer: 256,
            fragment_size: 64 * 1024,
        }
    }
}

impl CaptureConfig {
    pub fn constraints(&self) -> CaptureConstraints {
        CaptureConstraints {
            width: self.width,
            height: self.height,
            audio: self.audio,
        }
    }
}

impl Config {
    /// Load from `path` (any extension the `config` crate knows, e.g. `.toml`),
    /// then apply `FORM_CHECK__SECTION__KEY` environment overrides.
    ///
    /// A missing file is not an error; defaults fill the gaps.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("FORM_CHECK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
