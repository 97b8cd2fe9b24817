use derive_more::From;
use thiserror::Error;

use crate::handlers::FrameCodecError;

/// Errors returned by link transports.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("failed to open serial port `{port}`")]
    OpenPort {
        port: String,
        source: serialport::Error,
    },
    #[error("serial port `{port}` I/O failed")]
    Io {
        port: String,
        source: std::io::Error,
    },
    #[error("the link has no more frames to deliver")]
    StreamClosed,
    #[error("the link session was already closed")]
    SessionClosed,
    #[error("blocking serial task failed")]
    BlockingTask(#[from] tokio::task::JoinError),
    #[error("failed while waiting for Ctrl+C")]
    CtrlC { source: std::io::Error },
}

/// Errors returned when parsing fake link fixtures.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum FixtureError {
    #[error("fake reply payload cannot be empty")]
    EmptyReply,
    #[error("fake reply `{value}` is not valid hexadecimal")]
    InvalidHex { value: String },
}

/// Errors returned when validating runtime options.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub(crate) enum CliConfigError {
    #[error("--port is required unless --fake is set")]
    MissingPort,
    #[error("revision {revision} has no LCD status frames; use --revision v2 to listen")]
    NoStatusFrames {
        revision: crate::protocol::ProtocolRevision,
    },
}

/// Errors returned by telemetry initialisation.
#[derive(Debug, Error)]
pub(crate) enum TelemetryError {
    #[error("failed to install tracing subscriber")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Top-level protocol errors wrapping module-specific error types.
#[derive(Debug, Error, From)]
pub enum ProtocolError {
    #[error(transparent)]
    #[from(FrameCodecError, Box<FrameCodecError>)]
    FrameCodec(Box<FrameCodecError>),
    #[error(transparent)]
    #[from(LinkError, Box<LinkError>)]
    Link(Box<LinkError>),
}
