mod app;
mod cli;
mod error;
mod handlers;
mod link;
mod protocol;
mod telemetry;
mod terminal;
mod utils;

pub use app::{
    RunOptions, fake_link_client, link_client, run, run_with_clients_and_options,
    run_with_options, serial_link_client,
};
pub use cli::{
    Args, Command, DemoArgs, DemoSource, EnumerateArgs, FakeArgs, LinkArgs, ListenArgs, LogLevel,
    OutputFormat, SendArgs,
};
pub use error::{FixtureError, LinkError, ProtocolError};
pub use handlers::{
    ColourParseError, ColourPreset, ColourUpdate, ColourUpdateHandler, ControllerToLcdFrame,
    DEFAULT_ENUMERATION_DELAY, EnumerationReceipt, EnumerationRequest, FrameCodec,
    FrameCodecError, FrameMode, HueRamp, LcdToControllerFrame, LegacyPatternTypeMapping,
    PatternEnumerationHandler, PatternTable, PatternTypeMapping, Rgb, SentFrame, StatusEvent,
    StatusHandler, UNKNOWN_PATTERN_NAME,
};
pub use link::{
    DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT, LinkClient, LinkConfig, LinkSession,
    ListenStopReason, ListenSummary, Transport, WriteLog,
};
pub use protocol::{
    CONTROLLER_FRAME_LEN, LCD_FRAME_LEN, NUM_ZONES, PATTERN_NAME_LEN, PatternType,
    ProtocolRevision, Zone, zones,
};
pub use terminal::{SystemTerminalClient, TerminalClient};
