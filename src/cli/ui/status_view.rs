use std::fmt::{self, Display, Formatter};

use crate::handlers::{FrameCodecError, LcdToControllerFrame, PatternTable};
use crate::link::{ListenStopReason, ListenSummary};
use crate::protocol::{ProtocolRevision, zones};
use crate::utils::{format_hex, format_pattern};

use super::painter::Painter;

/// Renders the line printed before status frames start arriving.
pub(crate) struct ListenReadyView<'a> {
    link: &'a str,
    revision: ProtocolRevision,
    painter: &'a Painter,
}

impl<'a> ListenReadyView<'a> {
    pub(crate) fn new(link: &'a str, revision: ProtocolRevision, painter: &'a Painter) -> Self {
        Self {
            link,
            revision,
            painter,
        }
    }
}

impl Display for ListenReadyView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.painter.heading("Listening on"),
            self.painter.value(self.link),
            self.painter.muted(format!(
                "(revision {}, Ctrl+C to stop)",
                self.revision
            ))
        )
    }
}

/// Renders one decoded status frame as a single line.
pub(crate) struct StatusLineView<'a> {
    index: usize,
    status: &'a LcdToControllerFrame,
    table: PatternTable,
    painter: &'a Painter,
}

impl<'a> StatusLineView<'a> {
    pub(crate) fn new(
        index: usize,
        status: &'a LcdToControllerFrame,
        table: PatternTable,
        painter: &'a Painter,
    ) -> Self {
        Self {
            index,
            status,
            table,
            painter,
        }
    }
}

impl Display for StatusLineView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let displayed = self.status.displayed_pattern_index();
        let selected = self.status.selected_pattern_index();
        let brightness = zones()
            .map(|zone| format!("{}={}%", zone.label(), self.status.zone_brightness(zone)))
            .collect::<Vec<_>>()
            .join(" ");

        write!(
            f,
            "{} displayed={} selected={} colour={} frequency={:.1} Hz {}",
            self.painter.muted(format!("[{:04}]", self.index)),
            self.painter.value(format_pattern(
                displayed,
                self.table.name_or_unknown(displayed)
            )),
            format_pattern(selected, self.table.name_or_unknown(selected)),
            self.painter.swatch(self.status.selected_colour()),
            self.status.frequency_hz(),
            self.painter.muted(brightness)
        )
    }
}

/// Renders an inbound payload that failed to decode.
pub(crate) struct DecodeErrorView<'a> {
    index: usize,
    bytes: &'a [u8],
    error: &'a FrameCodecError,
    painter: &'a Painter,
}

impl<'a> DecodeErrorView<'a> {
    pub(crate) fn new(
        index: usize,
        bytes: &'a [u8],
        error: &'a FrameCodecError,
        painter: &'a Painter,
    ) -> Self {
        Self {
            index,
            bytes,
            error,
            painter,
        }
    }
}

impl Display for DecodeErrorView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.painter.muted(format!("[{:04}]", self.index)),
            self.painter.warning("decode error:"),
            self.error,
            self.painter.muted(format!("raw={}", format_hex(self.bytes)))
        )
    }
}

/// Renders the listen session summary.
pub(crate) struct ListenSummaryView<'a> {
    summary: &'a ListenSummary,
    painter: &'a Painter,
}

impl<'a> ListenSummaryView<'a> {
    pub(crate) fn new(summary: &'a ListenSummary, painter: &'a Painter) -> Self {
        Self { summary, painter }
    }
}

impl Display for ListenSummaryView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let stop_reason = match self.summary.stop_reason() {
            ListenStopReason::ReachedLimit(_) => {
                self.painter.success(self.summary.stop_reason().to_string())
            }
            ListenStopReason::Interrupted | ListenStopReason::StreamClosed => {
                self.painter.warning(self.summary.stop_reason().to_string())
            }
        };
        write!(
            f,
            "{} {} {}",
            self.painter.heading("Stopped:"),
            stop_reason,
            self.painter.value(format!(
                "- received {} status frame(s), {} decode error(s)",
                self.summary.received_frames(),
                self.summary.decode_errors()
            ))
        )
    }
}
