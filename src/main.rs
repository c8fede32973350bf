//! gesture-cue: turns a gesture classifier's per-frame output into cues
//!
//! Reads one JSON line of `{label, probability}` predictions per frame from
//! stdin (or the file named by `GESTURE_CUE_INPUT`), stabilizes the stream
//! and reports triggered cues and display changes.
//!
//! Not in scope:
//! - Model loading and inference, webcam capture
//! - Real audio playback and image rendering (cues are logged)

use anyhow::{Context, Result};
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gesture_cue::config::Config;
use gesture_cue::cue::{BroadcastSink, CueTable};
use gesture_cue::events::CueEvent;
use gesture_cue::lifecycle::ShutdownSignal;
use gesture_cue::meter::spawn_meter_logger;
use gesture_cue::observation::ObservationSource;
use gesture_cue::stabilizer::{Detector, MonotonicClock, Stabilizer};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "gesture-cue starting");

    let config = Config::load()?;
    info!(
        input = ?config.input_path,
        frame_interval = ?config.frame_interval(),
        "configuration loaded"
    );

    let shutdown = ShutdownSignal::new();

    // Observation source -> detector
    let (source_tx, source_rx) = mpsc::channel(32);
    // Detector -> cue presenter
    let (event_tx, cue_rx) = broadcast::channel::<CueEvent>(64);

    let stabilizer = Stabilizer::new(config.stabilizer.clone())
        .with_armed_labels(config.cues.armed_labels());
    let mut detector = Detector::new(stabilizer, MonotonicClock, BroadcastSink::new(event_tx));

    // The source is dropped at the end of this block so the channel closes
    // when the reader hits end of input
    let source_task = {
        let source = ObservationSource::new(source_tx);
        match &config.input_path {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("failed to open input {}", path.display()))?;
                source.spawn(file, config.frame_interval())?
            }
            None => source.spawn(tokio::io::stdin(), config.frame_interval())?,
        }
    };

    let cue_task = tokio::spawn(present_cues(config.cues.clone(), cue_rx));

    spawn_meter_logger();

    info!("daemon initialized, entering main loop");

    tokio::select! {
        summary = detector.run(source_rx) => {
            info!(?summary, "input exhausted");
        }

        result = shutdown.wait() => {
            let reason = result.context("failed to listen for shutdown signals")?;
            info!(%reason, "shutdown signal received");
        }
    }

    info!("shutting down...");

    source_task.abort();
    // Dropping the detector closes the event channel; let the presenter drain it
    drop(detector);
    if let Err(e) = cue_task.await {
        warn!(?e, "cue presenter ended abnormally");
    }

    info!("gesture-cue stopped");

    Ok(())
}

/// Present cue events until the detector goes away
async fn present_cues(cues: CueTable, mut cue_rx: broadcast::Receiver<CueEvent>) {
    loop {
        match cue_rx.recv().await {
            Ok(event) => present_cue(&cues, &event),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(skipped = n, "cue event receiver lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Stand-in for the audio/visual output: log which asset would be used
fn present_cue(cues: &CueTable, event: &CueEvent) {
    match event {
        CueEvent::CueTriggered { label } => match cues.sound_for(label.as_str()) {
            Some(sound) => info!(%label, sound = %sound.display(), "playing cue"),
            None => info!(%label, "cue triggered without sound"),
        },
        CueEvent::DisplayChanged { label: Some(label) } => {
            let image = cues.image_for(Some(label));
            info!(%label, ?image, "detected");
        }
        CueEvent::DisplayChanged { label: None } => {
            let image = cues.image_for(None);
            info!(?image, "no gesture detected");
        }
    }
}
