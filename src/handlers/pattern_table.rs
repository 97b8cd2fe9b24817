use crate::protocol::{PatternType, ProtocolRevision};

use super::FrameMode;

/// Label shown for indices the table does not know about.
pub const UNKNOWN_PATTERN_NAME: &str = "Unknown";

const REVISION_1_PATTERNS: [&str; 10] = [
    "Rotate", "Static", "Fade", "Blink", "Rainbow", "Fire", "Ocean", "Forest", "Sunset", "Aurora",
];

const REVISION_2_PATTERNS: [&str; 10] = [
    "Rotate", "Static", "Strobe", "Blink", "Rainbow", "Fire", "Ocean", "Forest", "Sunset",
    "Aurora",
];

/// Maps a pattern index to the revision 2 pattern-type byte.
pub trait PatternTypeMapping: Send + Sync {
    /// Returns the pattern type announced for `pattern_index`.
    fn pattern_type(&self, pattern_index: u8) -> PatternType;
}

impl<F> PatternTypeMapping for F
where
    F: Fn(u8) -> PatternType + Send + Sync,
{
    fn pattern_type(&self, pattern_index: u8) -> PatternType {
        self(pattern_index)
    }
}

/// Mapping used by the existing controller: indices 1 and 2 announce
/// `Static` and `Strobe`, every other index announces `Cached`.
///
/// ```
/// use isbed_mock::{LegacyPatternTypeMapping, PatternType, PatternTypeMapping};
///
/// assert_eq!(PatternType::Strobe, LegacyPatternTypeMapping.pattern_type(2));
/// assert_eq!(PatternType::Cached, LegacyPatternTypeMapping.pattern_type(0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyPatternTypeMapping;

impl PatternTypeMapping for LegacyPatternTypeMapping {
    fn pattern_type(&self, pattern_index: u8) -> PatternType {
        // TODO: confirm with the firmware owners whether index 0 should announce
        // `Rotate` instead of `Cached`.
        match pattern_index {
            1 => PatternType::Static,
            2 => PatternType::Strobe,
            _ => PatternType::Cached,
        }
    }
}

/// Ordered pattern names mirrored from the controller firmware.
///
/// This is a best-effort copy used for enumeration and display. The firmware
/// owns the authoritative list.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PatternTable {
    revision: ProtocolRevision,
    names: &'static [&'static str],
}

impl PatternTable {
    /// Returns the table matching a protocol revision.
    ///
    /// ```
    /// use isbed_mock::{PatternTable, ProtocolRevision};
    ///
    /// assert_eq!(Some("Fade"), PatternTable::for_revision(ProtocolRevision::V1).name(2));
    /// assert_eq!(Some("Strobe"), PatternTable::for_revision(ProtocolRevision::V2).name(2));
    /// ```
    #[must_use]
    pub const fn for_revision(revision: ProtocolRevision) -> Self {
        let names: &'static [&'static str] = match revision {
            ProtocolRevision::V1 => &REVISION_1_PATTERNS,
            ProtocolRevision::V2 => &REVISION_2_PATTERNS,
        };
        Self { revision, names }
    }

    /// Revision this table belongs to.
    #[must_use]
    pub const fn revision(&self) -> ProtocolRevision {
        self.revision
    }

    /// Number of known patterns.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the name at `index`, if known.
    #[must_use]
    pub fn name(&self, index: u8) -> Option<&'static str> {
        self.names.get(usize::from(index)).copied()
    }

    /// Returns the name at `index`, or `"Unknown"`.
    ///
    /// ```
    /// use isbed_mock::{PatternTable, ProtocolRevision};
    ///
    /// let table = PatternTable::for_revision(ProtocolRevision::V2);
    /// assert_eq!("Unknown", table.name_or_unknown(200));
    /// ```
    #[must_use]
    pub fn name_or_unknown(&self, index: u8) -> &'static str {
        self.name(index).unwrap_or(UNKNOWN_PATTERN_NAME)
    }

    /// Iterates `(index, name)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &'static str)> + '_ {
        (0u8..=u8::MAX).zip(self.names.iter().copied())
    }

    /// Builds the mode byte announced for `index` under this table's revision.
    ///
    /// Revision 1 carries `colour_wheel` as-is; revision 2 asks `mapping`.
    pub fn mode_for(
        &self,
        index: u8,
        colour_wheel: bool,
        mapping: &dyn PatternTypeMapping,
    ) -> FrameMode {
        match self.revision {
            ProtocolRevision::V1 => FrameMode::ColorWheel(colour_wheel),
            ProtocolRevision::V2 => FrameMode::PatternType(mapping.pattern_type(index)),
        }
    }
}
