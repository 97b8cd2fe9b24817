use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::instrument;

use crate::cli::OutputFormat;
use crate::cli::command::parse_duration;
use crate::cli::output::{CommandOutput, write_json_line};
use crate::cli::ui::{EnumerationView, Painter, label_current_span};
use crate::handlers::{DEFAULT_ENUMERATION_DELAY, EnumerationRequest, PatternEnumerationHandler};
use crate::link::LinkClient;
use crate::protocol::ProtocolRevision;

/// Arguments for the `enumerate` command.
#[derive(Debug, Args)]
pub struct EnumerateArgs {
    /// Pause between pattern frames (e.g. `100ms`).
    #[arg(long, default_value = "100ms", value_parser = parse_duration)]
    delay: Duration,
}

impl EnumerateArgs {
    /// Creates enumerate arguments with an explicit inter-frame delay.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for EnumerateArgs {
    fn default() -> Self {
        Self::new(DEFAULT_ENUMERATION_DELAY)
    }
}

/// Executes the `enumerate` command.
#[instrument(skip_all, level = "info", fields(progress = true, %revision))]
pub(crate) async fn run<W>(
    client: Box<dyn LinkClient>,
    args: &EnumerateArgs,
    revision: ProtocolRevision,
    out: &mut W,
    output_format: OutputFormat,
    painter: &Painter,
) -> Result<()>
where
    W: io::Write,
{
    label_current_span(
        "Announcing patterns to the LCD",
        &format!("{} Patterns announced", "✓".green()),
    );
    let mut session = client.open().await?;
    let request = EnumerationRequest::builder()
        .revision(revision)
        .delay(args.delay)
        .build();
    let receipt = PatternEnumerationHandler::enumerate(&mut session, request).await;
    session.close();
    let receipt = receipt?;

    match output_format {
        OutputFormat::Pretty => {
            writeln!(out, "{}", EnumerationView::new(&receipt, painter))?;
        }
        OutputFormat::Json => {
            write_json_line(out, &CommandOutput::Enumerated { receipt: &receipt })?;
        }
    }
    Ok(())
}
