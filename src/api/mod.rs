pub mod client;
pub mod error;
pub mod messages;

pub use client::{AnalysisClient, HttpAnalysisClient};
pub use error::Error;
pub use messages::AnalysisResult;
