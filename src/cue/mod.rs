//! Cue module for the audio/visual side of a detection
//!
//! The detector reports triggers and display changes through `CueSink`;
//! what a cue looks and sounds like comes from the `CueTable`.

mod sink;
mod table;

pub use sink::{BroadcastSink, CueSink};
pub use table::{Cue, CueTable};
