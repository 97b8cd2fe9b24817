use std::io;

use anyhow::Result;
use serde::Serialize;

use crate::cli::demo::DemoSummary;
use crate::handlers::{EnumerationReceipt, FrameMode, LcdToControllerFrame, SentFrame};
use crate::link::ListenSummary;
use crate::protocol::ProtocolRevision;

/// One pattern table entry in JSON output.
#[derive(Debug, Serialize)]
pub(crate) struct PatternEntry {
    pub(crate) index: u8,
    pub(crate) name: &'static str,
    pub(crate) mode: FrameMode,
    pub(crate) mode_byte: u8,
}

/// JSON document emitted by a command, one per line.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub(crate) enum CommandOutput<'a> {
    Patterns {
        revision: ProtocolRevision,
        patterns: Vec<PatternEntry>,
    },
    Enumerated {
        #[serde(flatten)]
        receipt: &'a EnumerationReceipt,
    },
    Sent {
        frame: &'a SentFrame,
    },
    DemoFrame {
        index: usize,
        frame: &'a SentFrame,
    },
    DemoFinished {
        #[serde(flatten)]
        summary: &'a DemoSummary,
    },
    ListenStarted {
        link: String,
        revision: ProtocolRevision,
    },
    Status {
        index: usize,
        selected_pattern: &'static str,
        displayed_pattern: &'static str,
        frequency_hz: f32,
        status: &'a LcdToControllerFrame,
    },
    DecodeError {
        index: usize,
        error: String,
        bytes: String,
    },
    ListenFinished {
        #[serde(flatten)]
        summary: &'a ListenSummary,
    },
}

/// Writes one compact JSON document followed by a newline.
pub(crate) fn write_json_line(out: &mut impl io::Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
