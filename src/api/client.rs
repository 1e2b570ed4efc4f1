use reqwest::multipart::{Form, Part};
use tracing::{error, info};

use super::error::Error;
use super::messages::AnalysisResult;
use crate::artifact::VideoArtifact;
use crate::config::ApiConfig;

/// File name sent for an anonymous reference recording
pub const DEFAULT_REFERENCE_NAME: &str = "reference.webm";
/// File name sent for an anonymous user recording
pub const DEFAULT_USER_NAME: &str = "user.webm";

/// Submits a reference video and a user video for comparison
#[async_trait::async_trait]
pub trait AnalysisClient: Send + Sync {
    /// One round trip; no retries
    async fn analyze(
        &self,
        reference: &VideoArtifact,
        user: &VideoArtifact,
    ) -> Result<AnalysisResult, Error>;
}

/// `AnalysisClient` that posts multipart form data to `{base_url}/analyze`
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnalysisClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, Error> {
        Self::new(config.base_url.clone())
    }

    pub fn endpoint(&self) -> String {
        format!("{}/analyze", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(
        &self,
        reference: &VideoArtifact,
        user: &VideoArtifact,
    ) -> Result<AnalysisResult, Error> {
        let form = Form::new()
            .part("reference", video_part(reference, DEFAULT_REFERENCE_NAME)?)
            .part("user", video_part(user, DEFAULT_USER_NAME)?);

        let url = self.endpoint();

        info!(
            "Submitting videos to {} (reference={} bytes, user={} bytes)",
            url,
            reference.size(),
            user.size()
        );

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!("Analysis request rejected: {}", status);
            return Err(Error::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let result: AnalysisResult = response.json().await?;

        info!(
            "Analysis complete ({} reference frames, {} user frames)",
            result.reference_frames, result.user_frames
        );

        Ok(result)
    }
}

/// Multipart part for an artifact; recordings get `default_name`
fn video_part(artifact: &VideoArtifact, default_name: &str) -> Result<Part, Error> {
    let file_name = artifact.file_name().unwrap_or(default_name).to_string();

    let part = Part::bytes(artifact.bytes().to_vec())
        .file_name(file_name)
        .mime_str(artifact.mime_type())?;

    Ok(part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = HttpAnalysisClient::new("http://127.0.0.1:8000/").unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:8000/analyze");

        let client = HttpAnalysisClient::new("http://analysis.local").unwrap();
        assert_eq!(client.endpoint(), "http://analysis.local/analyze");
    }
}
