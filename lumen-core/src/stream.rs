//! Elementary stream classification and link decisions.
//!
//! `uridecodebin` announces each discovered stream through the pad-added
//! signal. The handler needs two answers about the negotiated caps: which
//! converter chain the stream belongs to, and whether that chain is still
//! unlinked. Both are answered here as pure functions so the policy can
//! be exercised without a running pipeline.

// ============================================================================
// Types
// ============================================================================

/// Media type of a dynamically added stream, derived from the name of the
/// leading caps structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Audio,
    Video,
}

impl StreamKind {
    /// Classify a caps structure name such as `audio/x-raw` or
    /// `video/x-raw, format=(string)NV12`. Only raw streams can feed the
    /// converter chains; anything else is `None`.
    pub fn classify(caps_name: &str) -> Option<Self> {
        if caps_name.starts_with("audio/x-raw") {
            Some(Self::Audio)
        } else if caps_name.starts_with("video/x-raw") {
            Some(Self::Video)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

/// What to do with one newly announced pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDecision {
    /// Link the pad to the converter chain for this kind.
    Link(StreamKind),
    /// A stream of this kind is already wired; leave the pad alone.
    AlreadyLinked(StreamKind),
    /// Not a raw audio/video stream; leave the pad alone.
    Ignore,
}

// ============================================================================
// Link Policy
// ============================================================================

/// Decide what to do with a newly announced pad. `audio_linked` and
/// `video_linked` reflect whether the matching converter sink pad is
/// already connected; at most one link per media type ever succeeds.
pub fn decide(caps_name: &str, audio_linked: bool, video_linked: bool) -> LinkDecision {
    match StreamKind::classify(caps_name) {
        Some(StreamKind::Audio) if audio_linked => LinkDecision::AlreadyLinked(StreamKind::Audio),
        Some(StreamKind::Audio) => LinkDecision::Link(StreamKind::Audio),
        Some(StreamKind::Video) if video_linked => LinkDecision::AlreadyLinked(StreamKind::Video),
        Some(StreamKind::Video) => LinkDecision::Link(StreamKind::Video),
        None => LinkDecision::Ignore,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_raw_audio() {
        assert_eq!(StreamKind::classify("audio/x-raw"), Some(StreamKind::Audio));
        assert_eq!(
            StreamKind::classify("audio/x-raw, format=(string)S16LE, rate=(int)44100"),
            Some(StreamKind::Audio)
        );
    }

    #[test]
    fn test_classify_raw_video() {
        assert_eq!(StreamKind::classify("video/x-raw"), Some(StreamKind::Video));
        assert_eq!(
            StreamKind::classify("video/x-raw, format=(string)NV12, width=(int)1920"),
            Some(StreamKind::Video)
        );
    }

    #[test]
    fn test_classify_rejects_non_raw() {
        // Encoded streams and subtitle tracks must not match.
        assert_eq!(StreamKind::classify("video/x-h264"), None);
        assert_eq!(StreamKind::classify("audio/mpeg"), None);
        assert_eq!(StreamKind::classify("text/x-raw"), None);
        assert_eq!(StreamKind::classify(""), None);
    }

    #[test]
    fn test_first_stream_of_each_kind_links() {
        assert_eq!(
            decide("audio/x-raw", false, false),
            LinkDecision::Link(StreamKind::Audio)
        );
        assert_eq!(
            decide("video/x-raw", false, false),
            LinkDecision::Link(StreamKind::Video)
        );
    }

    #[test]
    fn test_second_stream_of_linked_kind_is_ignored() {
        assert_eq!(
            decide("audio/x-raw", true, false),
            LinkDecision::AlreadyLinked(StreamKind::Audio)
        );
        assert_eq!(
            decide("video/x-raw", false, true),
            LinkDecision::AlreadyLinked(StreamKind::Video)
        );
    }

    #[test]
    fn test_linked_audio_does_not_block_video() {
        assert_eq!(
            decide("video/x-raw", true, false),
            LinkDecision::Link(StreamKind::Video)
        );
    }

    #[test]
    fn test_unknown_kind_is_ignored_regardless_of_state() {
        assert_eq!(decide("text/x-raw", false, false), LinkDecision::Ignore);
        assert_eq!(decide("application/x-id3", true, true), LinkDecision::Ignore);
    }
}
