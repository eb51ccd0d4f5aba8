//! Bus event loop.
//!
//! Playback is observed through the pipeline's message bus. The loop
//! blocks with an infinite timeout and ends on the first terminal
//! message: an element error or end-of-stream.

use gstreamer as gst;
use gstreamer::prelude::*;

// ============================================================================
// Outcome
// ============================================================================

/// Terminal condition that ended the message loop. Both are normal
/// process exits; a stream error is logged, not propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The whole input was played.
    EndOfStream,
    /// An element reported a fatal stream error; details were logged.
    StreamError,
}

// ============================================================================
// Event Loop
// ============================================================================

/// Block on the bus until a terminal message arrives.
///
/// State-change messages are reported only when they originate from the
/// top-level pipeline; child elements transition far more often and are
/// not interesting at this level.
pub fn run_to_completion(pipeline: &gst::Pipeline, bus: &gst::Bus) -> RunOutcome {
    for msg in bus.iter_timed(gst::ClockTime::NONE) {
        use gst::MessageView;

        match msg.view() {
            MessageView::Error(err) => {
                let source = err
                    .src()
                    .map(|s| s.path_string().to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                tracing::error!("error received from {}: {}", source, err.error());
                match err.debug() {
                    Some(debug_info) => {
                        tracing::error!("debugging information: {}", debug_info)
                    }
                    None => tracing::error!("debugging information: none"),
                }
                return RunOutcome::StreamError;
            }
            MessageView::Eos(..) => {
                tracing::info!("end of stream reached");
                return RunOutcome::EndOfStream;
            }
            MessageView::StateChanged(change) => {
                let from_pipeline = change
                    .src()
                    .map(|s| s == pipeline.upcast_ref::<gst::Object>())
                    .unwrap_or(false);
                if from_pipeline {
                    tracing::info!(
                        "pipeline state changed from {:?} to {:?}",
                        change.old(),
                        change.current()
                    );
                }
            }
            _ => {}
        }
    }

    // iter_timed with an infinite timeout only runs out when the bus is
    // flushing, i.e. the pipeline is already being torn down.
    RunOutcome::EndOfStream
}
