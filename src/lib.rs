//! gesture-cue: stabilizes per-frame gesture classifications into cues
//!
//! A classifier produces one list of `{label, probability}` per camera
//! frame. This crate smooths that stream, waits for a class to stay
//! confident long enough, and fires the class's sound and image cue while
//! suppressing flicker and rapid re-triggers.
//!
//! Model loading, camera capture and real audio/video output stay outside;
//! the daemon reads classifier output as JSON lines and reports cues as
//! events.

pub mod config;
pub mod cue;
pub mod events;
pub mod lifecycle;
pub mod meter;
pub mod observation;
pub mod stabilizer;
