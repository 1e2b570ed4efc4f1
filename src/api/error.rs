use thiserror::Error;

/// Upload/analysis request errors
#[derive(Error, Debug)]
pub enum Error {
    /// The service answered with a non-success status
    #[error("Analysis failed: {status} {reason}")]
    Status { status: u16, reason: String },

    /// Connection, request building or body decoding failed
    #[error("Analysis request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl Error {
    /// HTTP status code, if the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }
}
