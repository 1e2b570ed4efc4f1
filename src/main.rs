use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use form_check::{
    CaptureSession, Config, DeviceFactory, DeviceSource, Dropzone, FormCheck, HttpAnalysisClient,
    Slot, VideoArtifact, VideoPreview,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "form-check", version, about = "Compare your form against a reference video")]
struct Cli {
    /// Config file (extension optional)
    #[arg(long, default_value = "config/form-check")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a reference video and your attempt for feedback
    Analyze {
        /// Reference video
        #[arg(long)]
        reference: PathBuf,
        /// Your attempt
        #[arg(long)]
        user: PathBuf,
    },
    /// Record a clip from the camera, or replay a file through the recorder
    Record {
        /// Where to write the recording
        #[arg(long)]
        output: PathBuf,
        /// Replay this file instead of opening the camera
        #[arg(long)]
        replay: Option<PathBuf>,
        /// Stop after this many seconds (Ctrl-C stops early)
        #[arg(long, default_value_t = 5)]
        seconds: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "form_check=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Form Check v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    match cli.command {
        Command::Analyze { reference, user } => analyze(&cfg, reference, user).await,
        Command::Record {
            output,
            replay,
            seconds,
        } => record(&cfg, output, replay, seconds).await,
    }
}

async fn analyze(cfg: &Config, reference: PathBuf, user: PathBuf) -> Result<()> {
    let client = HttpAnalysisClient::from_config(&cfg.api)?;
    let mut form_check = FormCheck::new(client);
    let dropzone = Dropzone::new();

    for (slot, path) in [(Slot::Reference, reference), (Slot::User, user)] {
        let artifact = VideoArtifact::open(&path).await?;
        if let Some(artifact) = dropzone.browse(vec![artifact]) {
            println!("{:?}: {}", slot, VideoPreview::new(&artifact));
            form_check.select(slot, artifact);
        }
    }

    println!("Analyzing...");
    form_check.submit().await;

    let view = form_check.response_view();
    println!("\n{}", view);

    if view.is_error() {
        std::process::exit(1);
    }

    Ok(())
}

async fn record(
    cfg: &Config,
    output: PathBuf,
    replay: Option<PathBuf>,
    seconds: u64,
) -> Result<()> {
    let source = match replay {
        Some(path) => DeviceSource::Replay(path),
        None => DeviceSource::Camera,
    };

    let device = DeviceFactory::create(source, &cfg.capture);
    let mut session = CaptureSession::new(device, &cfg.capture);

    if session.start_preview().await.is_err() {
        bail!(
            "{}",
            session.error().unwrap_or("Could not access camera")
        );
    }

    session.start_recording()?;
    println!("Recording for up to {}s (Ctrl-C to stop)...", seconds);

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(seconds)) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted; finishing recording");
        }
    }

    session.stop_recording().await;

    let Some(artifact) = session.take_recording() else {
        bail!("Recording produced no video");
    };

    tokio::fs::write(&output, artifact.bytes())
        .await
        .with_context(|| format!("Failed to write recording: {}", output.display()))?;

    println!("Saved {} to {}", VideoPreview::new(&artifact), output.display());

    Ok(())
}
