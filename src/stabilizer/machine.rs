//! Detection stabilizer state machine
//!
//! Turns a noisy stream of top-class observations into stable detections.
//! Each label keeps its own smoothing buffer, hold timer and cooldown; the
//! display state is shared and decides what the UI should show.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use tracing::{debug, info, trace};

use crate::config::StabilizerConfig;
use crate::observation::{ClassLabel, Observation};

use super::buffer::SmoothingBuffer;

/// What the UI should currently show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    /// Confirmed class on display, `None` for the neutral view
    pub active: Option<ClassLabel>,
    /// When the current display was entered, `None` before the first transition
    pub since: Option<Instant>,
}

impl DisplayState {
    pub fn is_neutral(&self) -> bool {
        self.active.is_none()
    }
}

impl std::fmt::Display for DisplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.active {
            Some(label) => write!(f, "{}", label),
            None => write!(f, "neutral"),
        }
    }
}

/// How a single tick was classified
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// A confirmed detection is still inside its display hold
    DisplayHeld,
    /// The smoothed probability is below the confidence threshold
    NoDetection,
    /// The smoothed probability reached the confidence threshold
    Detected {
        label: ClassLabel,
        avg_probability: f32,
    },
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Display state after the tick
    pub display: DisplayState,
    /// Label whose cue fired on this tick
    pub triggered: Option<ClassLabel>,
    pub verdict: Verdict,
    /// The tick entered a new display (neutral, or a fresh trigger)
    pub display_changed: bool,
}

/// Per-label tracking state
#[derive(Debug)]
struct LabelTrack {
    buffer: SmoothingBuffer,
    hold_start: Option<Instant>,
    last_played: Option<Instant>,
}

impl LabelTrack {
    fn new(buffer_size: usize) -> Self {
        Self {
            buffer: SmoothingBuffer::new(buffer_size),
            hold_start: None,
            last_played: None,
        }
    }
}

/// Smoothing and debounce filter over per-frame classifier output
pub struct Stabilizer {
    config: StabilizerConfig,
    /// Labels allowed to trigger; `None` arms every label
    armed: Option<HashSet<ClassLabel>>,
    tracks: HashMap<ClassLabel, LabelTrack>,
    display: DisplayState,
    last_neutral_at: Option<Instant>,
}

impl Stabilizer {
    /// Create a stabilizer in the neutral state with every label armed
    pub fn new(config: StabilizerConfig) -> Self {
        Self {
            config,
            armed: None,
            tracks: HashMap::new(),
            display: DisplayState::default(),
            last_neutral_at: None,
        }
    }

    /// Restrict triggering to the given labels
    ///
    /// Unarmed labels are still reported as detections but never fire.
    pub fn with_armed_labels(mut self, labels: impl IntoIterator<Item = ClassLabel>) -> Self {
        self.armed = Some(labels.into_iter().collect());
        self
    }

    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    /// Current display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Check whether `label` may trigger
    pub fn is_armed(&self, label: &ClassLabel) -> bool {
        self.armed
            .as_ref()
            .map_or(true, |armed| armed.contains(label))
    }

    /// Smoothed probability of a label, if it was ever observed
    pub fn average(&self, label: &str) -> Option<f32> {
        self.tracks.get(label).map(|track| track.buffer.average())
    }

    /// Whether a hold timer is running for a label
    pub fn is_holding(&self, label: &str) -> bool {
        self.tracks
            .get(label)
            .map_or(false, |track| track.hold_start.is_some())
    }

    /// Feed one observation taken at `now`
    pub fn tick(&mut self, observation: &Observation, now: Instant) -> TickOutcome {
        let label = &observation.label;
        let avg_probability = self.track_mut(label).buffer.push(observation.probability);

        if self.display_is_held(now) {
            trace!(%label, avg_probability, "display hold active");
            return self.outcome(Verdict::DisplayHeld, None, false);
        }

        if avg_probability < self.config.confidence_threshold {
            self.track_mut(label).hold_start = None;
            let changed = self.enter_neutral(now);
            return self.outcome(Verdict::NoDetection, None, changed);
        }

        let triggered = self.advance_hold(label, avg_probability, now);
        let changed = triggered.is_some();
        if let Some(label) = &triggered {
            info!(%label, avg_probability, "detection confirmed");
            self.display = DisplayState {
                active: Some(label.clone()),
                since: Some(now),
            };
        }

        let verdict = Verdict::Detected {
            label: label.clone(),
            avg_probability,
        };
        self.outcome(verdict, triggered, changed)
    }

    fn track_mut(&mut self, label: &ClassLabel) -> &mut LabelTrack {
        let buffer_size = self.config.buffer_size;
        self.tracks
            .entry(label.clone())
            .or_insert_with(|| LabelTrack::new(buffer_size))
    }

    /// A confirmed detection is shown for at least the display hold
    fn display_is_held(&self, now: Instant) -> bool {
        match (&self.display.active, self.display.since) {
            (Some(_), Some(since)) => {
                now.saturating_duration_since(since) < self.config.display_hold()
            }
            _ => false,
        }
    }

    /// Switch to the neutral display unless the neutral debounce blocks it.
    /// Returns true when a class display was replaced.
    fn enter_neutral(&mut self, now: Instant) -> bool {
        let already_neutral = self.display.is_neutral();
        let debounced = self.last_neutral_at.map_or(true, |at| {
            now.saturating_duration_since(at) > self.config.neutral_hold()
        });

        if !already_neutral && !debounced {
            trace!("neutral transition debounced");
            return false;
        }

        if !already_neutral {
            debug!(from = %self.display, "display back to neutral");
        }
        self.display = DisplayState {
            active: None,
            since: Some(now),
        };
        self.last_neutral_at = Some(now);
        !already_neutral
    }

    /// Run the hold timer and cooldown for a label at or above threshold.
    /// Returns the label when its cue fires.
    fn advance_hold(
        &mut self,
        label: &ClassLabel,
        avg_probability: f32,
        now: Instant,
    ) -> Option<ClassLabel> {
        let hold_time = self.config.hold_time();
        let cooldown = self.config.cooldown();
        let eligible = self.is_armed(label) && avg_probability <= self.config.max_threshold;
        let track = self.track_mut(label);

        if !eligible {
            track.hold_start = None;
            return None;
        }

        let hold_start = *track.hold_start.get_or_insert(now);
        if now.saturating_duration_since(hold_start) < hold_time {
            return None;
        }

        // Hold reached: the timer restarts whether or not the cooldown allows a cue
        track.hold_start = None;

        let cooled_down = track
            .last_played
            .map_or(true, |played| now.saturating_duration_since(played) > cooldown);
        if !cooled_down {
            debug!(%label, "cue suppressed by cooldown");
            return None;
        }

        track.last_played = Some(now);
        Some(label.clone())
    }

    fn outcome(
        &self,
        verdict: Verdict,
        triggered: Option<ClassLabel>,
        display_changed: bool,
    ) -> TickOutcome {
        TickOutcome {
            display: self.display.clone(),
            triggered,
            verdict,
            display_changed,
        }
    }
}
