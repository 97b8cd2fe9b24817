use std::io;

use anyhow::Result;
use bon::Builder;
use tracing::instrument;

use crate::cli::ui::Painter;
use crate::cli::{Command, FakeArgs, LinkArgs, LogLevel, OutputFormat};
use crate::link::{LinkBackend, LinkClient, LinkConfig, link_client_from_backend};
use crate::protocol::ProtocolRevision;
use crate::telemetry;
use crate::terminal::{SystemTerminalClient, TerminalClient};

/// Creates a link client that opens a real serial port.
#[must_use]
pub fn serial_link_client(config: LinkConfig) -> Box<dyn LinkClient> {
    link_client_from_backend(LinkBackend::Serial(config))
}

/// Creates a link client backed by the in-memory fake link.
#[must_use]
pub fn fake_link_client(fake_args: FakeArgs) -> Box<dyn LinkClient> {
    link_client_from_backend(LinkBackend::Fake(fake_args.into_link_config()))
}

/// Creates the link client selected on the command line.
#[must_use]
pub fn link_client(link: LinkArgs) -> Box<dyn LinkClient> {
    match link {
        LinkArgs::Serial(config) => serial_link_client(config),
        LinkArgs::Fake(fake_args) => fake_link_client(fake_args),
    }
}

/// Settings shared by every command run.
///
/// ```
/// use isbed_mock::{OutputFormat, ProtocolRevision, RunOptions};
///
/// let options = RunOptions::builder()
///     .revision(ProtocolRevision::V1)
///     .output_format(OutputFormat::Json)
///     .build();
/// assert_eq!(ProtocolRevision::V1, options.revision());
/// ```
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct RunOptions {
    #[builder(default)]
    revision: ProtocolRevision,
    #[builder(default)]
    output_format: OutputFormat,
    log_level: Option<LogLevel>,
}

impl RunOptions {
    #[must_use]
    pub fn revision(&self) -> ProtocolRevision {
        self.revision
    }

    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    #[must_use]
    pub fn log_level(&self) -> Option<LogLevel> {
        self.log_level
    }
}

/// Runs the CLI command with default options against the process terminal.
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, the link fails, or
/// output writing fails.
pub async fn run<W>(command: Command, out: &mut W, link_client: Box<dyn LinkClient>) -> Result<()>
where
    W: io::Write,
{
    run_with_options(command, out, link_client, RunOptions::default()).await
}

/// Runs the CLI command with explicit options against the process terminal.
///
/// ```
/// # async fn run() -> anyhow::Result<()> {
/// use clap::Parser;
///
/// let args = isbed_mock::Args::try_parse_from([
///     "isbed-mock",
///     "--log-level",
///     "debug",
///     "--fake",
///     "send",
///     "--pattern",
///     "2",
///     "--preset",
///     "blue",
/// ])?;
/// let options = isbed_mock::RunOptions::builder()
///     .revision(args.revision())
///     .maybe_log_level(args.log_level())
///     .build();
/// let (command, link) = args.into_command_and_link()?;
/// let mut out = Vec::new();
/// isbed_mock::run_with_options(command, &mut out, isbed_mock::link_client(link), options).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, the link fails, or
/// output writing fails.
pub async fn run_with_options<W>(
    command: Command,
    out: &mut W,
    link_client: Box<dyn LinkClient>,
    options: RunOptions,
) -> Result<()>
where
    W: io::Write,
{
    run_with_clients_and_options(command, out, &SystemTerminalClient, link_client, options).await
}

/// Runs the CLI command with injected clients.
///
/// ```
/// # async fn run() -> anyhow::Result<()> {
/// use isbed_mock::{Command, FakeArgs, OutputFormat, RunOptions, WriteLog};
///
/// struct FakeTerminal;
/// impl isbed_mock::TerminalClient for FakeTerminal {
///     fn stdout_is_terminal(&self) -> bool { false }
///     fn stderr_is_terminal(&self) -> bool { false }
/// }
///
/// let write_log = WriteLog::new();
/// let link = isbed_mock::fake_link_client(FakeArgs::builder().write_log(write_log.clone()).build());
/// let mut out = Vec::new();
/// isbed_mock::run_with_clients_and_options(
///     Command::Patterns,
///     &mut out,
///     &FakeTerminal,
///     link,
///     RunOptions::builder().output_format(OutputFormat::Json).build(),
/// ).await?;
/// assert!(write_log.is_empty());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, the link fails, or
/// output writing fails.
#[instrument(
    skip(out, terminal_client, link_client),
    level = "info",
    fields(command = %command_name(&command), revision = %options.revision())
)]
pub async fn run_with_clients_and_options<W>(
    command: Command,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
    link_client: Box<dyn LinkClient>,
    options: RunOptions,
) -> Result<()>
where
    W: io::Write,
{
    telemetry::initialise_tracing(
        "isbed-mock",
        terminal_client.stderr_is_terminal(),
        options.log_level().map(LogLevel::as_level_filter),
    )?;

    let painter = Painter::new(terminal_client.stdout_is_terminal());
    let revision = options.revision();
    let output_format = options.output_format();
    match command {
        Command::Patterns => crate::cli::patterns::run(revision, out, output_format, &painter),
        Command::Enumerate(args) => {
            crate::cli::enumerate::run(link_client, &args, revision, out, output_format, &painter)
                .await
        }
        Command::Send(args) => {
            crate::cli::send::run(link_client, &args, revision, out, output_format, &painter).await
        }
        Command::Demo(args) => {
            crate::cli::demo::run(link_client, &args, revision, out, output_format, &painter).await
        }
        Command::Listen(args) => {
            crate::cli::listen::run(link_client, &args, revision, out, output_format, &painter)
                .await
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Patterns => "patterns",
        Command::Enumerate(_args) => "enumerate",
        Command::Send(_args) => "send",
        Command::Demo(_args) => "demo",
        Command::Listen(_args) => "listen",
    }
}
