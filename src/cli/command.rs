use std::time::Duration;

use bon::Builder;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::level_filters::LevelFilter;

use crate::cli::demo::DemoArgs;
use crate::cli::enumerate::EnumerateArgs;
use crate::cli::listen::ListenArgs;
use crate::cli::send::SendArgs;
use crate::error::{CliConfigError, FixtureError};
use crate::link::{DEFAULT_BAUD_RATE, FakeLinkConfig, HexPayload, LinkConfig, WriteLog};
use crate::protocol::ProtocolRevision;

/// Command-line options for the IS Bed mock controller.
#[derive(Debug, Parser)]
#[command(
    name = "isbed-mock",
    about = "Drive an IS Bed LCD unit over a serial link, standing in for the LED controller."
)]
pub struct Args {
    /// Serial device the LCD unit is attached to (e.g. `/dev/ttyUSB0`).
    #[arg(long, global = true)]
    port: Option<String>,
    /// Serial baud rate.
    #[arg(long, global = true, default_value_t = DEFAULT_BAUD_RATE)]
    baud_rate: u32,
    /// How long one status read waits before giving up (e.g. `100ms`).
    #[arg(long, global = true, default_value = "100ms", value_parser = parse_duration)]
    read_timeout: Duration,
    /// Protocol revision spoken by the LCD firmware.
    #[arg(long, global = true, value_enum, default_value_t = ProtocolRevision::V2)]
    revision: ProtocolRevision,
    /// Uses an in-memory fake link instead of a serial port.
    #[arg(long, global = true)]
    fake: bool,
    /// Status payload the fake link replies with, as hexadecimal bytes. Repeat for more replies.
    #[arg(long = "fake-reply", global = true, requires = "fake")]
    fake_replies: Vec<HexPayload>,
    /// Artificial delay before each fake reply (e.g. `100ms`).
    #[arg(long, global = true, requires = "fake", value_parser = parse_duration)]
    fake_reply_delay: Option<Duration>,
    #[arg(skip)]
    fake_write_log: WriteLog,
    /// Log verbosity; overrides `RUST_LOG`.
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,
    /// Output style. Defaults to `pretty` on a terminal and `json` otherwise.
    #[arg(long, global = true, value_enum)]
    output_format: Option<OutputFormat>,
    #[command(subcommand)]
    command: Command,
}

impl Args {
    /// Creates argument values directly without CLI parsing.
    ///
    /// ```
    /// use isbed_mock::{Args, Command, ListenArgs};
    ///
    /// let patterns = Args::new(Command::Patterns).with_port("/dev/ttyUSB0");
    /// let listen = Args::new(Command::Listen(ListenArgs::new(Some(10))));
    /// let _ = (patterns, listen);
    /// ```
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: crate::link::DEFAULT_READ_TIMEOUT,
            revision: ProtocolRevision::default(),
            fake: false,
            fake_replies: Vec::new(),
            fake_reply_delay: None,
            fake_write_log: WriteLog::default(),
            log_level: None,
            output_format: None,
            command,
        }
    }

    /// Selects the serial device to open.
    #[must_use]
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Selects the protocol revision.
    #[must_use]
    pub fn with_revision(mut self, revision: ProtocolRevision) -> Self {
        self.revision = revision;
        self
    }

    /// Enables fake link mode with pre-parsed fake configuration.
    #[must_use]
    pub fn with_fake(mut self, fake: FakeArgs) -> Self {
        let FakeArgs {
            replies,
            write_log,
            reply_delay,
        } = fake;

        self.fake = true;
        self.fake_replies = replies.unwrap_or_default();
        self.fake_reply_delay = Some(reply_delay);
        self.fake_write_log = write_log;
        self
    }

    /// Returns the requested log level, if any.
    #[must_use]
    pub fn log_level(&self) -> Option<LogLevel> {
        self.log_level
    }

    /// Returns the requested output format, if any.
    #[must_use]
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output_format
    }

    #[must_use]
    pub fn revision(&self) -> ProtocolRevision {
        self.revision
    }

    /// Splits parsed CLI arguments into the command and the link to open.
    ///
    /// # Errors
    ///
    /// Returns an error if no serial port was given outside fake mode.
    pub fn into_command_and_link(self) -> anyhow::Result<(Command, LinkArgs)> {
        let Args {
            port,
            baud_rate,
            read_timeout,
            revision: _,
            fake,
            fake_replies,
            fake_reply_delay,
            fake_write_log,
            log_level: _,
            output_format: _,
            command,
        } = self;

        let link = if fake {
            LinkArgs::Fake(FakeArgs {
                replies: (!fake_replies.is_empty()).then_some(fake_replies),
                write_log: fake_write_log,
                reply_delay: fake_reply_delay.unwrap_or(Duration::ZERO),
            })
        } else {
            let Some(port) = port else {
                return Err(CliConfigError::MissingPort.into());
            };
            LinkArgs::Serial(
                LinkConfig::builder()
                    .port(port)
                    .baud_rate(baud_rate)
                    .read_timeout(read_timeout)
                    .build(),
            )
        };

        Ok((command, link))
    }
}

/// Link selected on the command line.
#[derive(Debug)]
pub enum LinkArgs {
    /// Open a real serial port.
    Serial(LinkConfig),
    /// Use the in-memory fake link.
    Fake(FakeArgs),
}

/// Fake link arguments for programmatic runs.
///
/// ```
/// use isbed_mock::{FakeArgs, WriteLog};
///
/// let write_log = WriteLog::new();
/// let fake = FakeArgs::builder()
///     .replies(&["0001646464640000FF0A"])?
///     .write_log(write_log.clone())
///     .build();
/// let _ = fake;
/// # Ok::<(), isbed_mock::FixtureError>(())
/// ```
#[derive(Debug, Builder)]
pub struct FakeArgs {
    #[builder(with = |values: &[&str]| -> std::result::Result<_, FixtureError> {
        values.iter().map(|value| value.parse()).collect()
    })]
    replies: Option<Vec<HexPayload>>,
    #[builder(default)]
    write_log: WriteLog,
    #[builder(default)]
    reply_delay: Duration,
}

impl FakeArgs {
    /// Handle on the log of frames the fake link receives.
    #[must_use]
    pub fn write_log(&self) -> &WriteLog {
        &self.write_log
    }

    pub(crate) fn into_link_config(self) -> FakeLinkConfig {
        let Self {
            replies,
            write_log,
            reply_delay,
        } = self;

        FakeLinkConfig::builder()
            .maybe_replies(replies)
            .write_log(write_log)
            .reply_delay(reply_delay)
            .build()
    }
}

/// Supported CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the pattern table for the selected revision.
    Patterns,
    /// Announce every known pattern to the LCD unit, one frame per pattern.
    Enumerate(EnumerateArgs),
    /// Send one colour update for a pattern.
    Send(SendArgs),
    /// Keep sending colour updates until stopped.
    Demo(DemoArgs),
    /// Print status frames reported by the LCD unit (revision 2 only).
    Listen(ListenArgs),
}

/// Log verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub(crate) fn as_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }
}

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables and lines.
    #[default]
    Pretty,
    /// Machine-readable JSON documents.
    Json,
}

pub(crate) fn parse_duration(value: &str) -> Result<Duration, String> {
    humantime::parse_duration(value).map_err(|error| error.to_string())
}
