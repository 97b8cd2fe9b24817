use serde::Serialize;
use serde_with::SerializeDisplay;

/// Why a listening session ended.
#[derive(Debug, Clone, Eq, PartialEq, derive_more::Display, SerializeDisplay)]
pub enum ListenStopReason {
    /// The listener reached the requested max frame count.
    #[display("reached max frames ({_0})")]
    ReachedLimit(usize),
    /// The user interrupted the listener.
    #[display("interrupted by user")]
    Interrupted,
    /// The link will not deliver more data.
    #[display("link stream closed")]
    StreamClosed,
}

/// Summary returned when a listen session exits.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ListenSummary {
    link: String,
    received_frames: usize,
    decode_errors: usize,
    stop_reason: ListenStopReason,
}

impl ListenSummary {
    pub(crate) fn new(
        link: String,
        received_frames: usize,
        decode_errors: usize,
        stop_reason: ListenStopReason,
    ) -> Self {
        Self {
            link,
            received_frames,
            decode_errors,
            stop_reason,
        }
    }

    /// Description of the link that was listened on.
    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Number of status frames decoded successfully.
    #[must_use]
    pub fn received_frames(&self) -> usize {
        self.received_frames
    }

    /// Number of inbound payloads that failed to decode.
    #[must_use]
    pub fn decode_errors(&self) -> usize {
        self.decode_errors
    }

    /// Returns the reason the listen session ended.
    #[must_use]
    pub fn stop_reason(&self) -> &ListenStopReason {
        &self.stop_reason
    }
}
