use tracing::{info, instrument};

use super::{
    ControllerToLcdFrame, FrameCodec, LegacyPatternTypeMapping, PatternTable, PatternTypeMapping,
    Rgb, SentFrame,
};
use crate::error::ProtocolError;
use crate::link::LinkSession;
use crate::protocol::{NUM_ZONES, ProtocolRevision};

/// A colour change for the currently selected pattern.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ColourUpdate {
    revision: ProtocolRevision,
    pattern_index: u8,
    zone_colours: [Rgb; NUM_ZONES],
}

impl ColourUpdate {
    /// Creates a colour update.
    ///
    /// ```
    /// use isbed_mock::{ColourPreset, ColourUpdate, ProtocolRevision};
    ///
    /// let update = ColourUpdate::new(ProtocolRevision::V2, 4, ColourPreset::Cool.zone_colours());
    /// assert_eq!(4, update.pattern_index());
    /// ```
    #[must_use]
    pub fn new(
        revision: ProtocolRevision,
        pattern_index: u8,
        zone_colours: [Rgb; NUM_ZONES],
    ) -> Self {
        Self {
            revision,
            pattern_index,
            zone_colours,
        }
    }

    #[must_use]
    pub fn revision(&self) -> ProtocolRevision {
        self.revision
    }

    #[must_use]
    pub fn pattern_index(&self) -> u8 {
        self.pattern_index
    }

    #[must_use]
    pub fn zone_colours(&self) -> [Rgb; NUM_ZONES] {
        self.zone_colours
    }
}

/// Handler for colour updates.
pub struct ColourUpdateHandler;

impl ColourUpdateHandler {
    /// Builds the controller frame for an update.
    ///
    /// The pattern name wraps around the table, so any index resolves to a
    /// name. Revision 1 updates never enable the colour wheel.
    fn frame_for(update: &ColourUpdate, mapping: &dyn PatternTypeMapping) -> ControllerToLcdFrame {
        let table = PatternTable::for_revision(update.revision);
        let wrapped = usize::from(update.pattern_index) % table.len();
        let name = u8::try_from(wrapped)
            .ok()
            .and_then(|index| table.name(index))
            .unwrap_or(super::UNKNOWN_PATTERN_NAME);

        ControllerToLcdFrame::new(
            update.pattern_index,
            name,
            table.mode_for(update.pattern_index, false, mapping),
            update.zone_colours.to_vec(),
        )
    }

    /// Sends a colour update using the controller's legacy mapping.
    ///
    /// ```
    /// # async fn demo(session: &mut isbed_mock::LinkSession) -> Result<(), isbed_mock::ProtocolError> {
    /// use isbed_mock::{ColourPreset, ColourUpdate, ColourUpdateHandler, ProtocolRevision};
    ///
    /// let update = ColourUpdate::new(ProtocolRevision::V2, 0, ColourPreset::Rainbow.zone_colours());
    /// let sent = ColourUpdateHandler::send(session, update).await?;
    /// assert_eq!("Rotate", sent.pattern_name());
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or the link write fails.
    pub async fn send(
        session: &mut LinkSession,
        update: ColourUpdate,
    ) -> Result<SentFrame, ProtocolError> {
        Self::send_with_mapping(session, update, &LegacyPatternTypeMapping).await
    }

    /// Sends a colour update with a caller-supplied revision 2 mapping.
    ///
    /// # Errors
    ///
    /// Returns an error when frame encoding fails or the link write fails.
    #[instrument(skip(session, mapping), level = "debug")]
    pub async fn send_with_mapping(
        session: &mut LinkSession,
        update: ColourUpdate,
        mapping: &dyn PatternTypeMapping,
    ) -> Result<SentFrame, ProtocolError> {
        let frame = Self::frame_for(&update, mapping);
        let bytes = FrameCodec::encode_controller_frame(&frame)?;
        session.send_frame(&bytes).await?;
        info!(
            pattern = frame.pattern_name(),
            mode = frame.mode().as_protocol_byte(),
            "colour update sent"
        );
        Ok(SentFrame::new(&frame, &bytes))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::handlers::{ColourPreset, FrameMode};
    use crate::protocol::PatternType;

    #[rstest]
    #[case(ProtocolRevision::V1, 2, "Fade")]
    #[case(ProtocolRevision::V2, 2, "Strobe")]
    #[case(ProtocolRevision::V1, 12, "Fade")]
    #[case(ProtocolRevision::V2, 19, "Aurora")]
    fn name_wraps_around_the_table(
        #[case] revision: ProtocolRevision,
        #[case] index: u8,
        #[case] expected: &str,
    ) {
        let update = ColourUpdate::new(revision, index, ColourPreset::Red.zone_colours());
        let frame = ColourUpdateHandler::frame_for(&update, &LegacyPatternTypeMapping);
        assert_eq!(expected, frame.pattern_name());
        assert_eq!(index, frame.pattern_index());
    }

    #[test]
    fn revision_one_updates_disable_colour_wheel() {
        let update = ColourUpdate::new(ProtocolRevision::V1, 0, ColourPreset::Blue.zone_colours());
        let frame = ColourUpdateHandler::frame_for(&update, &LegacyPatternTypeMapping);
        assert_eq!(FrameMode::ColorWheel(false), frame.mode());
    }

    #[test]
    fn revision_two_updates_use_mapping() {
        let update = ColourUpdate::new(ProtocolRevision::V2, 1, ColourPreset::Warm.zone_colours());
        let frame = ColourUpdateHandler::frame_for(&update, &LegacyPatternTypeMapping);
        assert_eq!(FrameMode::PatternType(PatternType::Static), frame.mode());
        assert_eq!(ColourPreset::Warm.zone_colours().as_slice(), frame.zone_colours());
    }
}
