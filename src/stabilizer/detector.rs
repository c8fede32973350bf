//! Detector loop driving the stabilizer
//!
//! Receives frames from the observation source, reduces each to its top
//! prediction, ticks the stabilizer at the clock's current time and hands
//! the side effects to a `CueSink`.

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::cue::CueSink;
use crate::meter::METER;
use crate::observation::{top_prediction, Prediction, SourceEvent};

use super::clock::Clock;
use super::machine::{Stabilizer, TickOutcome, Verdict};

/// Counts kept over a detector run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames that produced a tick
    pub frames: u64,
    /// Frames dropped because of an upstream failure or no predictions
    pub skipped: u64,
    /// Cues fired
    pub triggers: u64,
}

/// Single consumer of classifier frames
pub struct Detector<C, S> {
    stabilizer: Stabilizer,
    clock: C,
    sink: S,
    summary: RunSummary,
}

impl<C: Clock, S: CueSink> Detector<C, S> {
    pub fn new(stabilizer: Stabilizer, clock: C, sink: S) -> Self {
        Self {
            stabilizer,
            clock,
            sink,
            summary: RunSummary::default(),
        }
    }

    pub fn stabilizer(&self) -> &Stabilizer {
        &self.stabilizer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Run the detector until the source channel closes
    pub async fn run(&mut self, mut source_rx: mpsc::Receiver<SourceEvent>) -> RunSummary {
        info!("detector started");

        while let Some(event) = source_rx.recv().await {
            self.handle(event);
        }

        info!(
            frames = self.summary.frames,
            skipped = self.summary.skipped,
            triggers = self.summary.triggers,
            "detector stopped"
        );
        self.summary
    }

    /// Handle one event from the observation source
    pub fn handle(&mut self, event: SourceEvent) -> Option<TickOutcome> {
        match event {
            SourceEvent::Frame(predictions) => self.process(&predictions),
            SourceEvent::Failed(reason) => {
                warn!(%reason, "prediction failed, skipping frame");
                self.skip();
                None
            }
        }
    }

    /// Tick the stabilizer with the top prediction of a frame
    pub fn process(&mut self, predictions: &[Prediction]) -> Option<TickOutcome> {
        let Some(observation) = top_prediction(predictions) else {
            debug!("frame without predictions, skipping");
            self.skip();
            return None;
        };

        let now = self.clock.now();
        let outcome = self.stabilizer.tick(observation, now);
        self.summary.frames += 1;
        METER.tick_frame();

        match &outcome.verdict {
            Verdict::Detected {
                label,
                avg_probability,
            } => {
                debug!(%label, confidence = %format!("{:.2}%", avg_probability * 100.0), "detected");
            }
            Verdict::DisplayHeld => trace!(showing = %outcome.display, "display held"),
            Verdict::NoDetection => {}
        }

        if let Some(label) = &outcome.triggered {
            self.summary.triggers += 1;
            self.sink.play(label);
        }
        if outcome.display_changed {
            self.sink.render(&outcome.display);
        }

        Some(outcome)
    }

    fn skip(&mut self) {
        self.summary.skipped += 1;
        METER.tick_skipped();
    }
}
