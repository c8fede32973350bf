//! Observation module for per-frame classifier output
//!
//! Reads classifier predictions line by line and reduces each frame to
//! the single top-scoring observation the stabilizer consumes.

mod prediction;
mod source;

pub use prediction::{top_prediction, ClassLabel, Observation, Prediction};
pub use source::{ObservationSource, SourceError, SourceEvent};
