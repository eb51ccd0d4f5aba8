//! Playback graph assembly.
//!
//! Builds the fixed element graph around `uridecodebin`:
//!
//! ```text
//!                 ┌─► audioconvert ─ audioresample ─ volume ─ autoaudiosink
//! uridecodebin ───┤
//!    (dynamic)    └─► videoconvert ─ autovideosink
//! ```
//!
//! The source's output pads only appear once the framework has inspected
//! the input, so the converter chains are pre-linked here and the source
//! is wired later from the pad-added handler.

use gstreamer as gst;
use gstreamer::prelude::*;
use thiserror::Error;

use crate::stream::{self, LinkDecision, StreamKind};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("GStreamer initialization failed: {0}")]
    Init(#[from] gst::glib::Error),

    #[error("could not create element {name}: {source}")]
    ElementCreate {
        name: &'static str,
        source: gst::glib::BoolError,
    },

    #[error("could not add elements to the pipeline: {0}")]
    Assemble(gst::glib::BoolError),

    #[error("could not link the {chain} chain: {source}")]
    ChainLink {
        chain: &'static str,
        source: gst::glib::BoolError,
    },

    #[error("pipeline has no message bus")]
    NoBus,

    #[error("could not change pipeline state: {0}")]
    StateChange(#[from] gst::StateChangeError),
}

// ============================================================================
// Options
// ============================================================================

/// Build-time options for the playback graph.
#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
    /// Linear volume for the audio chain; applied clamped to `0.0..=1.0`.
    pub volume: f64,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self { volume: 1.0 }
    }
}

fn effective_volume(volume: f64) -> f64 {
    volume.clamp(0.0, 1.0)
}

// ============================================================================
// Playback Graph
// ============================================================================

/// The assembled pipeline and the elements the pad-added handler and the
/// bus loop need by name. All handles are reference-counted by GStreamer;
/// dropping the graph drives the pipeline back to Null and releases them.
pub struct PlaybackGraph {
    pipeline: gst::Pipeline,
    source: gst::Element,
    audio_convert: gst::Element,
    video_convert: gst::Element,
    audio_sink: gst::Element,
    video_sink: gst::Element,
}

impl PlaybackGraph {
    /// Assemble the graph for the given `file://` URI. The source stays
    /// unlinked; its pads are wired on discovery.
    pub fn build(uri: &str, options: &GraphOptions) -> Result<Self, GraphError> {
        gst::init()?;

        let source = make_element("uridecodebin")?;
        let audio_convert = make_element("audioconvert")?;
        let audio_resample = make_element("audioresample")?;
        let volume = make_element("volume")?;
        let audio_sink = make_element("autoaudiosink")?;
        let video_convert = make_element("videoconvert")?;
        let video_sink = make_element("autovideosink")?;

        source.set_property("uri", uri);
        volume.set_property("volume", effective_volume(options.volume));

        let pipeline = gst::Pipeline::with_name("playback");
        pipeline
            .add_many([
                &source,
                &audio_convert,
                &audio_resample,
                &volume,
                &audio_sink,
                &video_convert,
                &video_sink,
            ])
            .map_err(GraphError::Assemble)?;

        gst::Element::link_many([&audio_convert, &audio_resample, &volume, &audio_sink]).map_err(
            |source| GraphError::ChainLink {
                chain: "audio",
                source,
            },
        )?;
        gst::Element::link_many([&video_convert, &video_sink]).map_err(|source| {
            GraphError::ChainLink {
                chain: "video",
                source,
            }
        })?;

        let graph = Self {
            pipeline,
            source,
            audio_convert,
            video_convert,
            audio_sink,
            video_sink,
        };
        graph.connect_pad_added();
        Ok(graph)
    }

    /// Register the dynamic-link handler on the source. The closure runs
    /// on a framework thread, so it only captures weak element refs that
    /// are upgraded per invocation.
    fn connect_pad_added(&self) {
        let audio_convert = self.audio_convert.downgrade();
        let video_convert = self.video_convert.downgrade();
        self.source.connect_pad_added(move |source, pad| {
            let Some(audio_convert) = audio_convert.upgrade() else {
                return;
            };
            let Some(video_convert) = video_convert.upgrade() else {
                return;
            };
            handle_new_pad(source, pad, &audio_convert, &video_convert);
        });
    }

    /// Start playback. `uridecodebin` begins inspecting the input and the
    /// pad-added handler completes the wiring.
    pub fn play(&self) -> Result<(), GraphError> {
        tracing::debug!(
            "starting playback: {} -> {} / {}",
            self.source.name(),
            self.audio_sink.name(),
            self.video_sink.name()
        );
        self.pipeline.set_state(gst::State::Playing)?;
        Ok(())
    }

    pub fn bus(&self) -> Result<gst::Bus, GraphError> {
        self.pipeline.bus().ok_or(GraphError::NoBus)
    }

    pub fn pipeline(&self) -> &gst::Pipeline {
        &self.pipeline
    }
}

impl Drop for PlaybackGraph {
    fn drop(&mut self) {
        if let Err(err) = self.pipeline.set_state(gst::State::Null) {
            tracing::warn!("could not reset pipeline during shutdown: {err}");
        }
    }
}

// ============================================================================
// Dynamic Linking
// ============================================================================

fn make_element(factory: &'static str) -> Result<gst::Element, GraphError> {
    gst::ElementFactory::make(factory)
        .build()
        .map_err(|source| GraphError::ElementCreate {
            name: factory,
            source,
        })
}

/// React to one newly discovered elementary stream: classify its caps and
/// perform the one-time link to the matching converter chain.
fn handle_new_pad(
    source: &gst::Element,
    pad: &gst::Pad,
    audio_convert: &gst::Element,
    video_convert: &gst::Element,
) {
    tracing::info!("received new pad {} from {}", pad.name(), source.name());

    let caps = pad
        .current_caps()
        .unwrap_or_else(|| pad.query_caps(None));
    let Some(structure) = caps.structure(0) else {
        tracing::warn!("pad {} exposes no caps structure, ignoring", pad.name());
        return;
    };
    let caps_name = structure.name();

    let (Some(audio_pad), Some(video_pad)) = (
        audio_convert.static_pad("sink"),
        video_convert.static_pad("sink"),
    ) else {
        tracing::warn!("converter element is missing its sink pad");
        return;
    };

    match stream::decide(caps_name, audio_pad.is_linked(), video_pad.is_linked()) {
        LinkDecision::Link(kind) => {
            let sink_pad = match kind {
                StreamKind::Audio => &audio_pad,
                StreamKind::Video => &video_pad,
            };
            match pad.link(sink_pad) {
                Ok(_) => tracing::info!("linked {} stream ({})", kind.label(), caps_name),
                Err(err) => tracing::warn!(
                    "type is {} but the {} link failed: {:?}",
                    caps_name,
                    kind.label(),
                    err
                ),
            }
        }
        LinkDecision::AlreadyLinked(kind) => {
            tracing::info!(
                "already linked ({}), ignoring pad {}",
                kind.label(),
                pad.name()
            );
        }
        LinkDecision::Ignore => {
            tracing::info!(
                "pad {} has type {} which is not raw audio/video, ignoring",
                pad.name(),
                caps_name
            );
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = GraphOptions::default();
        assert_eq!(options.volume, 1.0);
    }

    #[test]
    fn test_volume_is_clamped() {
        assert_eq!(effective_volume(0.5), 0.5);
        assert_eq!(effective_volume(-2.0), 0.0);
        assert_eq!(effective_volume(7.0), 1.0);
    }
}
