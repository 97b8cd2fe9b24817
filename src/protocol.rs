use clap::ValueEnum;
use serde_with::SerializeDisplay;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Number of independently addressable LED zones on the bed frame.
pub const NUM_ZONES: usize = 4;

/// Width of the zero-padded pattern-name field in controller frames.
pub const PATTERN_NAME_LEN: usize = 16;

/// Encoded size of a controller → LCD frame.
pub const CONTROLLER_FRAME_LEN: usize = 1 + PATTERN_NAME_LEN + 1 + NUM_ZONES * 3;

/// Encoded size of an LCD → controller status frame.
pub const LCD_FRAME_LEN: usize = 1 + 1 + NUM_ZONES + 3 + 1;

/// LED zones in canonical wire order.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, EnumIter, Display, IntoStaticStr, SerializeDisplay,
)]
pub enum Zone {
    #[strum(to_string = "cage")]
    Cage,
    #[strum(to_string = "center")]
    Center,
    #[strum(to_string = "front")]
    Front,
    #[strum(to_string = "headboard")]
    Headboard,
}

impl Zone {
    /// Position of this zone inside every per-zone field.
    ///
    /// ```
    /// use isbed_mock::Zone;
    ///
    /// assert_eq!(0, Zone::Cage.wire_index());
    /// assert_eq!(3, Zone::Headboard.wire_index());
    /// ```
    #[must_use]
    pub const fn wire_index(self) -> usize {
        match self {
            Self::Cage => 0,
            Self::Center => 1,
            Self::Front => 2,
            Self::Headboard => 3,
        }
    }

    /// Lower-case zone label, e.g. `headboard`.
    #[must_use]
    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Returns all zones in canonical wire order.
pub fn zones() -> impl Iterator<Item = Zone> {
    Zone::iter()
}

/// Revision of the controller frame's mode-byte semantics.
///
/// Both revisions share the 30-byte layout but are wire-incompatible: byte 17
/// is a colour-wheel flag in revision 1 and a pattern-type enum in revision 2.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, Default, EnumIter, Display, SerializeDisplay, ValueEnum,
)]
pub enum ProtocolRevision {
    /// Mode byte is a colour-wheel flag. No status frames are sent back.
    #[strum(to_string = "v1")]
    #[value(name = "v1")]
    V1,
    /// Mode byte is a pattern type. The LCD reports status frames.
    #[default]
    #[strum(to_string = "v2")]
    #[value(name = "v2")]
    V2,
}

impl ProtocolRevision {
    /// Returns whether the LCD sends status frames under this revision.
    #[must_use]
    pub const fn has_status_frames(self) -> bool {
        matches!(self, Self::V2)
    }
}

/// Rendering mode carried in the revision 2 mode byte.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, EnumIter, Display, SerializeDisplay)]
pub enum PatternType {
    #[strum(to_string = "unknown")]
    Unknown,
    #[strum(to_string = "static")]
    Static,
    #[strum(to_string = "strobe")]
    Strobe,
    #[strum(to_string = "rotate")]
    Rotate,
    #[strum(to_string = "fade")]
    Fade,
    #[strum(to_string = "blink")]
    Blink,
    #[strum(to_string = "cached")]
    Cached,
}

impl PatternType {
    /// Returns the raw protocol byte.
    ///
    /// ```
    /// use isbed_mock::PatternType;
    ///
    /// assert_eq!(2, PatternType::Strobe.as_protocol_byte());
    /// assert_eq!(6, PatternType::Cached.as_protocol_byte());
    /// ```
    #[must_use]
    pub const fn as_protocol_byte(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Static => 1,
            Self::Strobe => 2,
            Self::Rotate => 3,
            Self::Fade => 4,
            Self::Blink => 5,
            Self::Cached => 6,
        }
    }

    /// Maps a raw protocol byte back to a pattern type.
    ///
    /// Bytes outside the known range map to [`PatternType::Unknown`].
    #[must_use]
    pub fn from_protocol_byte(value: u8) -> Self {
        Self::iter()
            .find(|candidate| candidate.as_protocol_byte() == value)
            .unwrap_or(Self::Unknown)
    }
}
