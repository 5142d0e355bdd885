//! # Anima Limbic Runtime
//!
//! Runs `anima_core` characters as long-lived tokio actors.
//!
//! ## Architecture
//!
//! Each character is owned by one background task that:
//! 1. Receives scene steps, stimuli and turn requests over a channel
//! 2. Applies them to its `Psyche` strictly in order
//! 3. Publishes a fresh snapshot on a watch channel after every mutation
//!
//! An optional heartbeat feeds wall-clock time in as soft-decay scene steps.
//! [`Cast`] keeps one actor per character id.

mod cast;
mod heartbeat;
mod system;

pub use cast::Cast;
pub use heartbeat::HeartbeatConfig;
pub use system::{LimbicSystem, SharedView, Turn};
