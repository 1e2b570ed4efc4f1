// Integration tests for the HTTP analysis client
//
// Each test starts an in-process axum server on an ephemeral port that
// plays the analysis service.

use anyhow::Result;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use form_check::api::{AnalysisClient, Error, HttpAnalysisClient};
use form_check::VideoArtifact;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct ReceivedPart {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

type Received = Arc<Mutex<Vec<ReceivedPart>>>;

async fn serve(router: Router) -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(format!("http://{}", addr))
}

async fn record_parts(State(received): State<Received>, mut multipart: Multipart) -> Json<Value> {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let part = ReceivedPart {
            name: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            data: field.bytes().await.unwrap().to_vec(),
        };
        received.lock().await.push(part);
    }

    Json(json!({
        "feedback": "Great job, excellent extension!",
        "reference_frames": 120,
        "user_frames": 118
    }))
}

async fn recording_server() -> Result<(String, Received)> {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/analyze", post(record_parts))
        .with_state(Arc::clone(&received));

    Ok((serve(router).await?, received))
}

#[tokio::test]
async fn test_analyze_sends_named_parts_and_parses_result() -> Result<()> {
    let (base_url, received) = recording_server().await?;
    let client = HttpAnalysisClient::new(base_url)?;

    let reference = VideoArtifact::file("pro-squat.mp4", "video/mp4", b"reference bytes".to_vec());
    let user = VideoArtifact::file("my-squat.mov", "video/quicktime", b"user bytes".to_vec());

    let result = client.analyze(&reference, &user).await?;

    assert_eq!(result.feedback, "Great job, excellent extension!");
    assert_eq!(result.reference_frames, 120);
    assert_eq!(result.user_frames, 118);
    assert_eq!(result.error, None);

    let parts = received.lock().await;
    assert_eq!(parts.len(), 2);

    assert_eq!(parts[0].name, "reference");
    assert_eq!(parts[0].file_name.as_deref(), Some("pro-squat.mp4"));
    assert_eq!(parts[0].content_type.as_deref(), Some("video/mp4"));
    assert_eq!(parts[0].data, b"reference bytes");

    assert_eq!(parts[1].name, "user");
    assert_eq!(parts[1].file_name.as_deref(), Some("my-squat.mov"));
    assert_eq!(parts[1].data, b"user bytes");

    Ok(())
}

#[tokio::test]
async fn test_recordings_get_default_file_names() -> Result<()> {
    let (base_url, received) = recording_server().await?;
    let client = HttpAnalysisClient::new(base_url)?;

    let reference = VideoArtifact::recording(vec![1, 2, 3]);
    let user = VideoArtifact::recording(vec![4, 5]);

    client.analyze(&reference, &user).await?;

    let parts = received.lock().await;
    assert_eq!(parts[0].file_name.as_deref(), Some("reference.webm"));
    assert_eq!(parts[0].content_type.as_deref(), Some("video/webm"));
    assert_eq!(parts[1].file_name.as_deref(), Some("user.webm"));

    Ok(())
}

#[tokio::test]
async fn test_server_error_status_is_reported() -> Result<()> {
    let router = Router::new().route(
        "/analyze",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let client = HttpAnalysisClient::new(serve(router).await?)?;

    let video = VideoArtifact::recording(vec![0; 4]);
    let err = client.analyze(&video, &video).await.unwrap_err();

    assert!(matches!(err, Error::Status { status: 500, .. }));
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "Analysis failed: 500 Internal Server Error");

    Ok(())
}

#[tokio::test]
async fn test_embedded_analysis_error_is_a_result() -> Result<()> {
    let router = Router::new().route(
        "/analyze",
        post(|| async { Json(json!({ "error": "Pose could not be detected in one or both videos." })) }),
    );
    let client = HttpAnalysisClient::new(serve(router).await?)?;

    let video = VideoArtifact::recording(vec![0; 4]);
    let result = client.analyze(&video, &video).await?;

    assert_eq!(
        result.error.as_deref(),
        Some("Pose could not be detected in one or both videos.")
    );

    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_transport_error() -> Result<()> {
    let router = Router::new().route("/analyze", post(|| async { "not json" }));
    let client = HttpAnalysisClient::new(serve(router).await?)?;

    let video = VideoArtifact::recording(vec![0; 4]);
    let err = client.analyze(&video, &video).await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)));

    Ok(())
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() -> Result<()> {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = HttpAnalysisClient::new(format!("http://{}", addr))?;
    let video = VideoArtifact::recording(vec![0; 4]);
    let err = client.analyze(&video, &video).await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(err.status(), None);

    Ok(())
}
