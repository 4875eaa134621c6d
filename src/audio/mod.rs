//! Audio graph and device output.
//!
//! The graph is owned by the cpal callback; the UI talks to it only through
//! `AudioCmd` messages and reads the shared analyser window.

pub mod analyser;
pub mod automation;
pub mod engine;
pub mod graph;
pub mod mixer;
pub mod oscillator;
pub mod scheduler;
