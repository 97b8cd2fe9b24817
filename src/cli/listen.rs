use std::io;

use anyhow::Result;
use clap::Args;

use crate::cli::OutputFormat;
use crate::cli::output::{CommandOutput, write_json_line};
use crate::cli::ui::{DecodeErrorView, ListenReadyView, ListenSummaryView, Painter, StatusLineView};
use crate::error::CliConfigError;
use crate::handlers::{PatternTable, StatusEvent, StatusHandler};
use crate::link::LinkClient;
use crate::protocol::ProtocolRevision;
use crate::utils::format_hex;

/// Arguments for the `listen` command.
#[derive(Debug, Args)]
pub struct ListenArgs {
    /// Stop after this many decoded status frames. If omitted, listen until Ctrl+C.
    #[arg(long)]
    max_frames: Option<usize>,
}

impl ListenArgs {
    /// Creates listen arguments with an optional frame limit.
    #[must_use]
    pub fn new(max_frames: Option<usize>) -> Self {
        Self { max_frames }
    }

    pub(crate) fn max_frames(&self) -> Option<usize> {
        self.max_frames
    }
}

/// Executes the `listen` command.
pub(crate) async fn run<W>(
    client: Box<dyn LinkClient>,
    args: &ListenArgs,
    revision: ProtocolRevision,
    out: &mut W,
    output_format: OutputFormat,
    painter: &Painter,
) -> Result<()>
where
    W: io::Write,
{
    if !revision.has_status_frames() {
        return Err(CliConfigError::NoStatusFrames { revision }.into());
    }

    let table = PatternTable::for_revision(revision);
    let mut session = client.open().await?;
    let link = session.describe();
    let ready = match output_format {
        OutputFormat::Pretty => writeln!(out, "{}", ListenReadyView::new(&link, revision, painter))
            .map_err(anyhow::Error::from),
        OutputFormat::Json => write_json_line(
            out,
            &CommandOutput::ListenStarted {
                link: link.clone(),
                revision,
            },
        ),
    };
    if let Err(error) = ready {
        session.close();
        return Err(error);
    }

    let mut write_error: Option<anyhow::Error> = None;
    let listen_result = StatusHandler::listen(&mut session, args.max_frames(), |index, event| {
        if write_error.is_some() {
            return;
        }
        if let Err(error) = write_event(out, output_format, painter, table, index, &event) {
            write_error = Some(error);
        }
    })
    .await;
    session.close();

    if let Some(error) = write_error {
        return Err(error);
    }
    let summary = listen_result?;
    match output_format {
        OutputFormat::Pretty => {
            writeln!(out)?;
            writeln!(out, "{}", ListenSummaryView::new(&summary, painter))?;
        }
        OutputFormat::Json => {
            write_json_line(out, &CommandOutput::ListenFinished { summary: &summary })?;
        }
    }

    Ok(())
}

fn write_event<W>(
    out: &mut W,
    output_format: OutputFormat,
    painter: &Painter,
    table: PatternTable,
    index: usize,
    event: &StatusEvent,
) -> Result<()>
where
    W: io::Write,
{
    match (output_format, event) {
        (OutputFormat::Pretty, StatusEvent::Status(status)) => {
            writeln!(out, "{}", StatusLineView::new(index, status, table, painter))?;
        }
        (OutputFormat::Pretty, StatusEvent::DecodeFailed { bytes, error }) => {
            writeln!(out, "{}", DecodeErrorView::new(index, bytes, error, painter))?;
        }
        (OutputFormat::Json, StatusEvent::Status(status)) => {
            write_json_line(
                out,
                &CommandOutput::Status {
                    index,
                    selected_pattern: table.name_or_unknown(status.selected_pattern_index()),
                    displayed_pattern: table.name_or_unknown(status.displayed_pattern_index()),
                    frequency_hz: status.frequency_hz(),
                    status,
                },
            )?;
        }
        (OutputFormat::Json, StatusEvent::DecodeFailed { bytes, error }) => {
            write_json_line(
                out,
                &CommandOutput::DecodeError {
                    index,
                    error: error.to_string(),
                    bytes: format_hex(bytes),
                },
            )?;
        }
    }
    Ok(())
}
