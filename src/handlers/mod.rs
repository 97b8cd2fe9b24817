mod colour;
mod colour_update;
mod enumeration;
mod frame_codec;
mod pattern_table;
mod status;

pub use self::colour::{ColourParseError, ColourPreset, HueRamp, Rgb};
pub use self::colour_update::{ColourUpdate, ColourUpdateHandler};
pub use self::enumeration::{
    DEFAULT_ENUMERATION_DELAY, EnumerationReceipt, EnumerationRequest, PatternEnumerationHandler,
    SentFrame,
};
pub use self::frame_codec::{
    ControllerToLcdFrame, FrameCodec, FrameCodecError, FrameMode, LcdToControllerFrame,
};
pub use self::pattern_table::{
    LegacyPatternTypeMapping, PatternTable, PatternTypeMapping, UNKNOWN_PATTERN_NAME,
};
pub use self::status::{StatusEvent, StatusHandler};
