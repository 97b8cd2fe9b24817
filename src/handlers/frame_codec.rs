use std::fmt;

use serde::Serialize;
use serde_with::SerializeDisplay;
use thiserror::Error;

use crate::protocol::{
    CONTROLLER_FRAME_LEN, LCD_FRAME_LEN, NUM_ZONES, PATTERN_NAME_LEN, PatternType,
    ProtocolRevision, Zone,
};

use super::Rgb;

const NAME_OFFSET: usize = 1;
const MODE_OFFSET: usize = NAME_OFFSET + PATTERN_NAME_LEN;
const ZONE_COLOURS_OFFSET: usize = MODE_OFFSET + 1;
const BRIGHTNESS_OFFSET: usize = 2;
const SELECTED_COLOUR_OFFSET: usize = BRIGHTNESS_OFFSET + NUM_ZONES;
const FREQUENCY_OFFSET: usize = SELECTED_COLOUR_OFFSET + 3;

/// Errors returned by frame encoding and decoding.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum FrameCodecError {
    /// The pattern name cannot be represented as ASCII.
    #[error("pattern name `{name}` contains non-ASCII characters")]
    NonAsciiPatternName { name: String },
    /// The frame does not carry exactly one colour per zone.
    #[error("expected {expected} zone colours, got {actual}")]
    InvalidZoneCount { expected: usize, actual: usize },
    /// The inbound buffer is not exactly one status frame long.
    #[error("invalid status frame size: expected {expected} bytes, got {actual}")]
    InvalidFrameSize { expected: usize, actual: usize },
}

/// Mode byte of a controller frame, tagged with the revision that defines it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, SerializeDisplay)]
pub enum FrameMode {
    /// Revision 1: enables the LCD colour wheel for this pattern.
    ColorWheel(bool),
    /// Revision 2: selects the pattern rendering mode.
    PatternType(PatternType),
}

impl FrameMode {
    /// Returns the protocol revision this mode byte belongs to.
    ///
    /// ```
    /// use isbed_mock::{FrameMode, PatternType, ProtocolRevision};
    ///
    /// assert_eq!(ProtocolRevision::V1, FrameMode::ColorWheel(true).revision());
    /// assert_eq!(
    ///     ProtocolRevision::V2,
    ///     FrameMode::PatternType(PatternType::Static).revision()
    /// );
    /// ```
    #[must_use]
    pub const fn revision(self) -> ProtocolRevision {
        match self {
            Self::ColorWheel(_) => ProtocolRevision::V1,
            Self::PatternType(_) => ProtocolRevision::V2,
        }
    }

    /// Returns the raw byte written at offset 17.
    ///
    /// ```
    /// use isbed_mock::{FrameMode, PatternType};
    ///
    /// assert_eq!(1, FrameMode::ColorWheel(true).as_protocol_byte());
    /// assert_eq!(6, FrameMode::PatternType(PatternType::Cached).as_protocol_byte());
    /// ```
    #[must_use]
    pub const fn as_protocol_byte(self) -> u8 {
        match self {
            Self::ColorWheel(enabled) => enabled as u8,
            Self::PatternType(pattern_type) => pattern_type.as_protocol_byte(),
        }
    }
}

impl fmt::Display for FrameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColorWheel(true) => f.write_str("colour wheel"),
            Self::ColorWheel(false) => f.write_str("fixed colours"),
            Self::PatternType(pattern_type) => write!(f, "{pattern_type}"),
        }
    }
}

/// Frame sent from the controller to the LCD unit.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ControllerToLcdFrame {
    pattern_index: u8,
    pattern_name: String,
    mode: FrameMode,
    zone_colours: Vec<Rgb>,
}

impl ControllerToLcdFrame {
    /// Creates a controller frame.
    ///
    /// Field widths are only checked when the frame is encoded.
    ///
    /// ```
    /// use isbed_mock::{ControllerToLcdFrame, FrameMode, Rgb};
    ///
    /// let frame = ControllerToLcdFrame::new(0, "Rotate", FrameMode::ColorWheel(true), vec![Rgb::BLACK; 4]);
    /// assert_eq!("Rotate", frame.pattern_name());
    /// ```
    #[must_use]
    pub fn new(
        pattern_index: u8,
        pattern_name: impl Into<String>,
        mode: FrameMode,
        zone_colours: Vec<Rgb>,
    ) -> Self {
        Self {
            pattern_index,
            pattern_name: pattern_name.into(),
            mode,
            zone_colours,
        }
    }

    /// Returns the pattern index.
    #[must_use]
    pub fn pattern_index(&self) -> u8 {
        self.pattern_index
    }

    /// Returns the pattern name as given, before truncation or padding.
    #[must_use]
    pub fn pattern_name(&self) -> &str {
        &self.pattern_name
    }

    /// Returns the tagged mode byte.
    #[must_use]
    pub fn mode(&self) -> FrameMode {
        self.mode
    }

    /// Returns the zone colours in canonical zone order.
    #[must_use]
    pub fn zone_colours(&self) -> &[Rgb] {
        &self.zone_colours
    }
}

/// Status frame sent from the LCD unit back to the controller.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct LcdToControllerFrame {
    selected_pattern_index: u8,
    displayed_pattern_index: u8,
    zone_brightnesses: [u8; NUM_ZONES],
    selected_colour: Rgb,
    frequency: u8,
}

impl LcdToControllerFrame {
    /// Creates a status frame from already-decoded fields.
    #[must_use]
    pub const fn new(
        selected_pattern_index: u8,
        displayed_pattern_index: u8,
        zone_brightnesses: [u8; NUM_ZONES],
        selected_colour: Rgb,
        frequency: u8,
    ) -> Self {
        Self {
            selected_pattern_index,
            displayed_pattern_index,
            zone_brightnesses,
            selected_colour,
            frequency,
        }
    }

    /// Index of the pattern picked on the LCD's own controls.
    #[must_use]
    pub fn selected_pattern_index(&self) -> u8 {
        self.selected_pattern_index
    }

    /// Index of the pattern currently rendered.
    #[must_use]
    pub fn displayed_pattern_index(&self) -> u8 {
        self.displayed_pattern_index
    }

    /// Per-zone brightness percentages in canonical zone order.
    ///
    /// Values are passed through as received and may exceed 100.
    #[must_use]
    pub fn zone_brightnesses(&self) -> [u8; NUM_ZONES] {
        self.zone_brightnesses
    }

    /// Brightness percentage of one zone.
    #[must_use]
    pub fn zone_brightness(&self, zone: Zone) -> u8 {
        self.zone_brightnesses[zone.wire_index()]
    }

    /// Colour picked on the LCD's own controls.
    #[must_use]
    pub fn selected_colour(&self) -> Rgb {
        self.selected_colour
    }

    /// Raw frequency byte, in tenths of a hertz.
    #[must_use]
    pub fn frequency(&self) -> u8 {
        self.frequency
    }

    /// Frequency in hertz derived from the raw byte.
    ///
    /// ```
    /// use isbed_mock::FrameCodec;
    ///
    /// let frame = FrameCodec::decode_lcd_frame(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 25])?;
    /// assert_eq!(2.5, frame.frequency_hz());
    /// # Ok::<(), isbed_mock::FrameCodecError>(())
    /// ```
    #[must_use]
    pub fn frequency_hz(&self) -> f32 {
        f32::from(self.frequency) / 10.0
    }
}

/// Encodes controller frames and decodes LCD status frames.
pub struct FrameCodec;

impl FrameCodec {
    /// Encodes a 30-byte controller frame.
    ///
    /// The name is truncated to 16 bytes or zero-padded on the right.
    ///
    /// # Errors
    ///
    /// Returns an error when the pattern name is not ASCII or when the frame
    /// does not carry exactly four zone colours.
    ///
    /// ```
    /// use isbed_mock::{ControllerToLcdFrame, FrameCodec, FrameMode, Rgb};
    ///
    /// let frame = ControllerToLcdFrame::new(3, "Fire", FrameMode::ColorWheel(false), vec![Rgb::BLACK; 4]);
    /// let bytes = FrameCodec::encode_controller_frame(&frame)?;
    /// assert_eq!(30, bytes.len());
    /// assert_eq!(b"Fire\0\0\0\0\0\0\0\0\0\0\0\0", &bytes[1..17]);
    /// # Ok::<(), isbed_mock::FrameCodecError>(())
    /// ```
    pub fn encode_controller_frame(
        frame: &ControllerToLcdFrame,
    ) -> Result<[u8; CONTROLLER_FRAME_LEN], FrameCodecError> {
        if !frame.pattern_name.is_ascii() {
            return Err(FrameCodecError::NonAsciiPatternName {
                name: frame.pattern_name.clone(),
            });
        }
        if frame.zone_colours.len() != NUM_ZONES {
            return Err(FrameCodecError::InvalidZoneCount {
                expected: NUM_ZONES,
                actual: frame.zone_colours.len(),
            });
        }

        let mut bytes = [0u8; CONTROLLER_FRAME_LEN];
        bytes[0] = frame.pattern_index;

        let name = frame.pattern_name.as_bytes();
        let name_len = name.len().min(PATTERN_NAME_LEN);
        bytes[NAME_OFFSET..NAME_OFFSET + name_len].copy_from_slice(&name[..name_len]);

        bytes[MODE_OFFSET] = frame.mode.as_protocol_byte();

        for (zone_bytes, colour) in bytes[ZONE_COLOURS_OFFSET..]
            .chunks_exact_mut(3)
            .zip(&frame.zone_colours)
        {
            zone_bytes.copy_from_slice(&colour.to_bytes());
        }
        Ok(bytes)
    }

    /// Decodes a 10-byte LCD status frame.
    ///
    /// Field values are not range-checked.
    ///
    /// # Errors
    ///
    /// Returns an error when `bytes` is not exactly 10 bytes long.
    ///
    /// ```
    /// use isbed_mock::{FrameCodec, Rgb};
    ///
    /// let frame = FrameCodec::decode_lcd_frame(&[1, 2, 10, 20, 30, 40, 255, 0, 0, 50])?;
    /// assert_eq!(2, frame.displayed_pattern_index());
    /// assert_eq!(Rgb::new(255, 0, 0), frame.selected_colour());
    /// # Ok::<(), isbed_mock::FrameCodecError>(())
    /// ```
    pub fn decode_lcd_frame(bytes: &[u8]) -> Result<LcdToControllerFrame, FrameCodecError> {
        let Ok(bytes) = <&[u8; LCD_FRAME_LEN]>::try_from(bytes) else {
            return Err(FrameCodecError::InvalidFrameSize {
                expected: LCD_FRAME_LEN,
                actual: bytes.len(),
            });
        };

        let mut zone_brightnesses = [0u8; NUM_ZONES];
        zone_brightnesses
            .copy_from_slice(&bytes[BRIGHTNESS_OFFSET..BRIGHTNESS_OFFSET + NUM_ZONES]);

        Ok(LcdToControllerFrame {
            selected_pattern_index: bytes[0],
            displayed_pattern_index: bytes[1],
            zone_brightnesses,
            selected_colour: Rgb::new(
                bytes[SELECTED_COLOUR_OFFSET],
                bytes[SELECTED_COLOUR_OFFSET + 1],
                bytes[SELECTED_COLOUR_OFFSET + 2],
            ),
            frequency: bytes[FREQUENCY_OFFSET],
        })
    }
}
