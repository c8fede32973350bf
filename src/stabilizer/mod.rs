//! Detection stabilizer module
//!
//! Smooths per-frame classifier output and debounces it into stable
//! detections:
//! - Moving average over the last few probabilities of each class
//! - Hold time before a class may trigger, cooldown before it may again
//! - Display hold after a trigger, neutral debounce afterwards

mod buffer;
mod clock;
mod detector;
mod machine;

pub use buffer::SmoothingBuffer;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use detector::{Detector, RunSummary};
pub use machine::{DisplayState, Stabilizer, TickOutcome, Verdict};
