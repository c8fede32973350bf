//! Sinks receiving cue side effects

use tokio::sync::broadcast;
use tracing::debug;

use crate::events::CueEvent;
use crate::observation::ClassLabel;
use crate::stabilizer::DisplayState;

/// Receiver of the audio/visual side effects of the detector
///
/// Calls are fire-and-forget: a sink never reports back.
pub trait CueSink {
    /// A class has triggered its cue
    fn play(&mut self, label: &ClassLabel);

    /// The display state changed
    fn render(&mut self, display: &DisplayState);
}

/// Publishes cue side effects as `CueEvent`s
pub struct BroadcastSink {
    event_tx: broadcast::Sender<CueEvent>,
}

impl BroadcastSink {
    pub fn new(event_tx: broadcast::Sender<CueEvent>) -> Self {
        Self { event_tx }
    }

    fn emit(&self, event: CueEvent) {
        debug!(?event, "emitting cue event");
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}

impl CueSink for BroadcastSink {
    fn play(&mut self, label: &ClassLabel) {
        self.emit(CueEvent::CueTriggered {
            label: label.clone(),
        });
    }

    fn render(&mut self, display: &DisplayState) {
        self.emit(CueEvent::DisplayChanged {
            label: display.active.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_sink_emits_events() {
        let (tx, mut rx) = broadcast::channel(16);
        let mut sink = BroadcastSink::new(tx);

        sink.play(&ClassLabel::from("Dance"));
        sink.render(&DisplayState::default());

        assert!(matches!(
            rx.try_recv(),
            Ok(CueEvent::CueTriggered { label }) if label.as_str() == "Dance"
        ));
        assert!(matches!(
            rx.try_recv(),
            Ok(CueEvent::DisplayChanged { label: None })
        ));
    }

    #[test]
    fn test_broadcast_sink_without_subscribers() {
        let (tx, rx) = broadcast::channel(16);
        drop(rx);
        let mut sink = BroadcastSink::new(tx);
        sink.play(&ClassLabel::from("Start"));
    }
}
