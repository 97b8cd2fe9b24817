use std::time::Duration;

use bon::Builder;
use serde::Serialize;
use serde_with::serde_as;
use tokio::time::sleep;
use tracing::{debug, instrument};

use super::{
    ControllerToLcdFrame, FrameCodec, FrameMode, LegacyPatternTypeMapping, PatternTable,
    PatternTypeMapping, Rgb,
};
use crate::error::ProtocolError;
use crate::link::LinkSession;
use crate::protocol::{NUM_ZONES, ProtocolRevision};

/// Gap between enumeration frames, giving the LCD time to store each entry.
pub const DEFAULT_ENUMERATION_DELAY: Duration = Duration::from_millis(100);

/// One controller frame written to the link.
#[serde_as]
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SentFrame {
    pattern_index: u8,
    pattern_name: String,
    mode: FrameMode,
    mode_byte: u8,
    zone_colours: Vec<Rgb>,
    #[serde_as(as = "serde_with::hex::Hex<serde_with::formats::Uppercase>")]
    bytes: Vec<u8>,
}

impl SentFrame {
    pub(crate) fn new(frame: &ControllerToLcdFrame, bytes: &[u8]) -> Self {
        Self {
            pattern_index: frame.pattern_index(),
            pattern_name: frame.pattern_name().to_string(),
            mode: frame.mode(),
            mode_byte: frame.mode().as_protocol_byte(),
            zone_colours: frame.zone_colours().to_vec(),
            bytes: bytes.to_vec(),
        }
    }

    #[must_use]
    pub fn pattern_index(&self) -> u8 {
        self.pattern_index
    }

    #[must_use]
    pub fn pattern_name(&self) -> &str {
        &self.pattern_name
    }

    #[must_use]
    pub fn mode(&self) -> FrameMode {
        self.mode
    }

    /// Raw byte written at the mode offset.
    #[must_use]
    pub fn mode_byte(&self) -> u8 {
        self.mode_byte
    }

    /// Zone colours in canonical zone order.
    #[must_use]
    pub fn zone_colours(&self) -> &[Rgb] {
        &self.zone_colours
    }

    /// Encoded frame exactly as written.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Pattern enumeration request parameters.
///
/// ```
/// use std::time::Duration;
///
/// use isbed_mock::{EnumerationRequest, ProtocolRevision};
///
/// let request = EnumerationRequest::builder()
///     .revision(ProtocolRevision::V1)
///     .delay(Duration::ZERO)
///     .build();
/// assert_eq!(ProtocolRevision::V1, request.revision());
/// ```
#[derive(Debug, Clone, Copy, Builder)]
pub struct EnumerationRequest {
    #[builder(default)]
    revision: ProtocolRevision,
    #[builder(default = DEFAULT_ENUMERATION_DELAY)]
    delay: Duration,
}

impl EnumerationRequest {
    #[must_use]
    pub fn revision(&self) -> ProtocolRevision {
        self.revision
    }

    /// Pause after every frame except the last.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Result of a completed enumeration.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct EnumerationReceipt {
    revision: ProtocolRevision,
    frames: Vec<SentFrame>,
}

impl EnumerationReceipt {
    pub(crate) fn new(revision: ProtocolRevision, frames: Vec<SentFrame>) -> Self {
        Self { revision, frames }
    }

    #[must_use]
    pub fn revision(&self) -> ProtocolRevision {
        self.revision
    }

    /// Frames in the order they were written.
    #[must_use]
    pub fn frames(&self) -> &[SentFrame] {
        &self.frames
    }
}

/// Announces every known pattern to the LCD unit.
///
/// Each entry goes out as its own controller frame with all zones black.
/// Under revision 1 only pattern 0 enables the colour wheel; under revision 2
/// the mode byte comes from a [`PatternTypeMapping`].
pub struct PatternEnumerationHandler;

impl PatternEnumerationHandler {
    fn frames_for(
        table: PatternTable,
        mapping: &dyn PatternTypeMapping,
    ) -> Vec<ControllerToLcdFrame> {
        table
            .iter()
            .map(|(index, name)| {
                ControllerToLcdFrame::new(
                    index,
                    name,
                    table.mode_for(index, index == 0, mapping),
                    vec![Rgb::BLACK; NUM_ZONES],
                )
            })
            .collect()
    }

    /// Sends the full pattern table using the controller's legacy mapping.
    ///
    /// ```
    /// # async fn demo(session: &mut isbed_mock::LinkSession) -> Result<(), isbed_mock::ProtocolError> {
    /// use isbed_mock::{EnumerationRequest, PatternEnumerationHandler};
    ///
    /// let receipt = PatternEnumerationHandler::enumerate(session, EnumerationRequest::builder().build()).await?;
    /// assert_eq!(10, receipt.frames().len());
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or a link write fails.
    pub async fn enumerate(
        session: &mut LinkSession,
        request: EnumerationRequest,
    ) -> Result<EnumerationReceipt, ProtocolError> {
        Self::enumerate_with_mapping(session, request, &LegacyPatternTypeMapping).await
    }

    /// Sends the full pattern table with a caller-supplied revision 2 mapping.
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or a link write fails.
    #[instrument(skip(session, mapping), level = "info", fields(revision = %request.revision))]
    pub async fn enumerate_with_mapping(
        session: &mut LinkSession,
        request: EnumerationRequest,
        mapping: &dyn PatternTypeMapping,
    ) -> Result<EnumerationReceipt, ProtocolError> {
        let table = PatternTable::for_revision(request.revision);
        let frames = Self::frames_for(table, mapping);
        let total = frames.len();
        let mut sent = Vec::with_capacity(total);

        for (position, frame) in frames.iter().enumerate() {
            let bytes = FrameCodec::encode_controller_frame(frame)?;
            session.send_frame(&bytes).await?;
            debug!(
                index = frame.pattern_index(),
                name = frame.pattern_name(),
                mode = frame.mode().as_protocol_byte(),
                "pattern announced"
            );
            sent.push(SentFrame::new(frame, &bytes));

            if position + 1 < total && !request.delay.is_zero() {
                sleep(request.delay).await;
            }
        }

        Ok(EnumerationReceipt::new(request.revision, sent))
    }
}
