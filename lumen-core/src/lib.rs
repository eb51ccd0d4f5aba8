//! # LUMEN Core
//!
//! Playback graph assembly and bus handling for the LUMEN media player.
//! Demuxing, decoding, format conversion, synchronization, and rendering
//! all happen inside GStreamer; this crate wires the graph together and
//! observes its messages.

// ============================================================================
// Input Resolution
// ============================================================================
pub mod uri;

// ============================================================================
// Stream Classification
// ============================================================================
pub mod stream;

// ============================================================================
// Playback Graph
// ============================================================================
pub mod graph;

// ============================================================================
// Bus Event Loop
// ============================================================================
pub mod bus;

// ============================================================================
// Version
// ============================================================================
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
