use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use palette::{FromColor, Hsv, Srgb};
use serde_with::SerializeDisplay;
use strum_macros::{Display, EnumIter};
use thiserror::Error;

use crate::protocol::NUM_ZONES;

/// RGB colour value.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, SerializeDisplay)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// All channels off.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates an RGB colour.
    ///
    /// ```
    /// use isbed_mock::Rgb;
    ///
    /// let colour = Rgb::new(255, 127, 0);
    /// assert_eq!(255, colour.r);
    /// ```
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the channels in wire order.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Errors returned when parsing a colour from text.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ColourParseError {
    #[error("colour `{value}` must be six hexadecimal digits (RRGGBB)")]
    InvalidHexColour { value: String },
}

impl FromStr for Rgb {
    type Err = ColourParseError;

    /// Parses `RRGGBB`, with or without a leading `#`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        let invalid = || ColourParseError::InvalidHexColour {
            value: value.to_string(),
        };
        let mut channels = [0u8; 3];
        hex::decode_to_slice(digits, &mut channels).map_err(|_error| invalid())?;
        Ok(Self::new(channels[0], channels[1], channels[2]))
    }
}

/// Named four-zone colour sets used for colour updates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, EnumIter, Display, ValueEnum)]
#[strum(serialize_all = "snake_case")]
pub enum ColourPreset {
    Red,
    Green,
    Blue,
    White,
    /// Cage red, center orange, front green, headboard blue.
    Rainbow,
    Warm,
    Cool,
}

impl ColourPreset {
    /// Returns one colour per zone in canonical zone order.
    ///
    /// ```
    /// use isbed_mock::{ColourPreset, Rgb};
    ///
    /// let colours = ColourPreset::Rainbow.zone_colours();
    /// assert_eq!(Rgb::new(255, 127, 0), colours[1]);
    /// ```
    #[must_use]
    pub const fn zone_colours(self) -> [Rgb; NUM_ZONES] {
        match self {
            Self::Red => [Rgb::new(255, 0, 0); NUM_ZONES],
            Self::Green => [Rgb::new(0, 255, 0); NUM_ZONES],
            Self::Blue => [Rgb::new(0, 0, 255); NUM_ZONES],
            Self::White => [Rgb::new(255, 255, 255); NUM_ZONES],
            Self::Rainbow => [
                Rgb::new(255, 0, 0),
                Rgb::new(255, 127, 0),
                Rgb::new(0, 255, 0),
                Rgb::new(0, 0, 255),
            ],
            Self::Warm => [
                Rgb::new(255, 100, 0),
                Rgb::new(255, 50, 0),
                Rgb::new(255, 150, 50),
                Rgb::new(255, 75, 25),
            ],
            Self::Cool => [
                Rgb::new(0, 100, 255),
                Rgb::new(0, 200, 200),
                Rgb::new(100, 0, 255),
                Rgb::new(0, 150, 255),
            ],
        }
    }
}

/// Endless sweep around the hue wheel producing one colour per zone.
///
/// Zones are offset from each other by a quarter turn; saturation and value
/// stay at full scale.
#[derive(Debug, Clone)]
pub struct HueRamp {
    hue: u16,
    step: u16,
}

impl HueRamp {
    const FULL_TURN: u16 = 360;
    const ZONE_OFFSET: u16 = Self::FULL_TURN / NUM_ZONES as u16;

    /// Creates a ramp advancing `step_degrees` per frame.
    ///
    /// A step of zero is treated as one degree.
    ///
    /// ```
    /// use isbed_mock::{HueRamp, Rgb};
    ///
    /// let mut ramp = HueRamp::new(30);
    /// let first = ramp.next().expect("hue ramp never ends");
    /// assert_eq!(Rgb::new(255, 0, 0), first[0]);
    /// ```
    #[must_use]
    pub fn new(step_degrees: u16) -> Self {
        Self {
            hue: 0,
            step: step_degrees.clamp(1, Self::FULL_TURN),
        }
    }
}

impl Iterator for HueRamp {
    type Item = [Rgb; NUM_ZONES];

    fn next(&mut self) -> Option<Self::Item> {
        let mut colours = [Rgb::BLACK; NUM_ZONES];
        for (position, colour) in (0u16..).zip(colours.iter_mut()) {
            *colour = hue_to_rgb(self.hue + position * Self::ZONE_OFFSET);
        }
        self.hue = (self.hue + self.step) % Self::FULL_TURN;
        Some(colours)
    }
}

/// Converts a hue in degrees to a fully saturated, full-value colour.
fn hue_to_rgb(hue: u16) -> Rgb {
    let hsv: Hsv = Hsv::new(f32::from(hue % HueRamp::FULL_TURN), 1.0, 1.0);
    let rgb: Srgb = Srgb::from_color(hsv);
    let rgb: Srgb<u8> = rgb.into_format();
    Rgb::new(rgb.red, rgb.green, rgb.blue)
}
