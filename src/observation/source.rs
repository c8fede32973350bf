//! Line-oriented observation source
//!
//! Stands in for the classifier and capture source: each input line is one
//! frame's classifier output. Runs on its own tokio task and forwards frames
//! to the detector over an mpsc channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::prediction::Prediction;

/// Events sent from the observation source to the detector
#[derive(Debug, Clone)]
pub enum SourceEvent {
    /// Classifier output for one frame
    Frame(Vec<Prediction>),
    /// The classifier or capture failed for this frame
    Failed(String),
}

/// Errors that can occur in the observation source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("observation source is already running")]
    AlreadyRunning,

    /// The reader itself failed; undecodable lines are reported as frames instead
    #[error("failed to read classifier output: {0}")]
    Read(#[from] std::io::Error),
}

/// Wire shape of one input line
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FrameLine {
    Predictions(Vec<Prediction>),
    Failure { error: String },
}

/// Reads classifier output from an async reader and forwards it as frames
pub struct ObservationSource {
    event_tx: mpsc::Sender<SourceEvent>,
    running: Arc<AtomicBool>,
}

impl ObservationSource {
    /// Create a new observation source
    pub fn new(event_tx: mpsc::Sender<SourceEvent>) -> Self {
        Self {
            event_tx,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start reading frames from `reader` on a new task
    ///
    /// With `pace` set, frames are released no faster than one per interval,
    /// which replays a recorded session at its original frame rate. The task
    /// finishes at end of input or when the receiving side is dropped, and
    /// yields the number of frames forwarded. Drop the source afterwards so
    /// the channel closes once the task is done.
    pub fn spawn<R>(
        &self,
        reader: R,
        pace: Option<Duration>,
    ) -> Result<JoinHandle<Result<u64, SourceError>>, SourceError>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(SourceError::AlreadyRunning);
        }

        let event_tx = self.event_tx.clone();
        let running = Arc::clone(&self.running);

        Ok(tokio::spawn(async move {
            info!(?pace, "observation source started");

            let result = read_frames(reader, pace, event_tx).await;
            match &result {
                Ok(frames) => info!(frames, "observation source stopped"),
                Err(e) => error!(?e, "observation source error"),
            }

            running.store(false, Ordering::SeqCst);
            result
        }))
    }

    /// Check if the source is currently running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

async fn read_frames<R>(
    reader: R,
    pace: Option<Duration>,
    event_tx: mpsc::Sender<SourceEvent>,
) -> Result<u64, SourceError>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut ticker = pace.map(|period| {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });
    let mut frames = 0u64;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            debug!("end of classifier output");
            break;
        }

        // A line that is not UTF-8 is a bad frame, not a broken stream
        let event = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => parse_line(line.trim()),
            Err(e) => SourceEvent::Failed(format!("malformed classifier output: {e}")),
        };

        if let Some(ticker) = ticker.as_mut() {
            ticker.tick().await;
        }

        if event_tx.send(event).await.is_err() {
            warn!("failed to send frame - channel closed?");
            break;
        }
        frames += 1;
    }

    Ok(frames)
}

/// Turn one input line into a source event
///
/// Lines that are neither a prediction list nor an error object count as
/// upstream failures.
pub(crate) fn parse_line(line: &str) -> SourceEvent {
    match serde_json::from_str::<FrameLine>(line) {
        Ok(FrameLine::Predictions(predictions)) => SourceEvent::Frame(predictions),
        Ok(FrameLine::Failure { error }) => SourceEvent::Failed(error),
        Err(e) => SourceEvent::Failed(format!("malformed classifier output: {e}")),
    }
}
