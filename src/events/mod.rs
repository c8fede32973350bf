//! Events module for cue side effects
//!
//! Structured events published by the detector when a cue fires or the
//! display changes.

use serde::{Deserialize, Serialize};

use crate::observation::ClassLabel;

/// Events emitted by the detector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CueEvent {
    /// A class held high confidence long enough and its cue fired
    CueTriggered { label: ClassLabel },

    /// The display switched to a class, or back to neutral
    DisplayChanged {
        /// Class now on display, `None` for neutral
        label: Option<ClassLabel>,
    },
}

impl std::fmt::Display for CueEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CueEvent::CueTriggered { label } => write!(f, "CUE_TRIGGERED ({})", label),
            CueEvent::DisplayChanged { label: Some(label) } => {
                write!(f, "DISPLAY_CHANGED ({})", label)
            }
            CueEvent::DisplayChanged { label: None } => write!(f, "DISPLAY_CHANGED (neutral)"),
        }
    }
}
