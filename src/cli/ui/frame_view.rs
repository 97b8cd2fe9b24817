use std::fmt::{self, Display, Formatter};

use crate::cli::demo::{DemoStopReason, DemoSummary};
use crate::handlers::{EnumerationReceipt, SentFrame};
use crate::protocol::zones;
use crate::utils::{format_hex, format_pattern};

use super::painter::Painter;
use super::table::Table;

fn mode_label(frame: &SentFrame) -> String {
    format!("{} (0x{:02X})", frame.mode(), frame.mode_byte())
}

/// Renders the frames written by a pattern enumeration.
pub(crate) struct EnumerationView<'a> {
    receipt: &'a EnumerationReceipt,
    painter: &'a Painter,
}

impl<'a> EnumerationView<'a> {
    pub(crate) fn new(receipt: &'a EnumerationReceipt, painter: &'a Painter) -> Self {
        Self { receipt, painter }
    }
}

impl Display for EnumerationView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rows = self
            .receipt
            .frames()
            .iter()
            .map(|frame| {
                vec![
                    frame.pattern_index().to_string(),
                    self.painter.value(frame.pattern_name()),
                    mode_label(frame),
                    self.painter.muted(format_hex(frame.bytes())),
                ]
            })
            .collect();
        let heading = format!(
            "Enumerated {} pattern(s) for revision {}:",
            self.receipt.frames().len(),
            self.receipt.revision()
        );

        write!(f, "{}", self.painter.heading(heading))?;
        write!(
            f,
            "\n{}",
            Table::grid(["index", "name", "mode", "frame"], rows)
        )
    }
}

/// Renders a single colour update.
pub(crate) struct SentFrameView<'a> {
    frame: &'a SentFrame,
    painter: &'a Painter,
}

impl<'a> SentFrameView<'a> {
    pub(crate) fn new(frame: &'a SentFrame, painter: &'a Painter) -> Self {
        Self { frame, painter }
    }
}

impl Display for SentFrameView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut rows = vec![
            (
                "pattern",
                self.painter.value(format_pattern(
                    self.frame.pattern_index(),
                    self.frame.pattern_name(),
                )),
            ),
            ("mode", mode_label(self.frame)),
        ];
        rows.extend(
            zones()
                .zip(self.frame.zone_colours())
                .map(|(zone, colour)| (zone.label(), self.painter.swatch(*colour))),
        );
        rows.push(("frame", self.painter.muted(format_hex(self.frame.bytes()))));

        write!(f, "{}", self.painter.heading("Sent colour update:"))?;
        write!(f, "\n{}", Table::key_value(self.painter, rows))
    }
}

/// Renders one demo frame as a single line.
pub(crate) struct DemoFrameView<'a> {
    index: usize,
    frame: &'a SentFrame,
    painter: &'a Painter,
}

impl<'a> DemoFrameView<'a> {
    pub(crate) fn new(index: usize, frame: &'a SentFrame, painter: &'a Painter) -> Self {
        Self {
            index,
            frame,
            painter,
        }
    }
}

impl Display for DemoFrameView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let colours = self
            .frame
            .zone_colours()
            .iter()
            .map(|colour| self.painter.swatch(*colour))
            .collect::<Vec<_>>()
            .join(" ");
        write!(
            f,
            "{} {} {}",
            self.painter.muted(format!("[{:04}]", self.index)),
            self.painter.value(format_pattern(
                self.frame.pattern_index(),
                self.frame.pattern_name()
            )),
            colours
        )
    }
}

/// Renders the demo summary line.
pub(crate) struct DemoSummaryView<'a> {
    summary: &'a DemoSummary,
    painter: &'a Painter,
}

impl<'a> DemoSummaryView<'a> {
    pub(crate) fn new(summary: &'a DemoSummary, painter: &'a Painter) -> Self {
        Self { summary, painter }
    }
}

impl Display for DemoSummaryView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let stop_reason = self.summary.stop_reason();
        let stop_reason = match stop_reason {
            DemoStopReason::ReachedLimit(_) => self.painter.success(stop_reason.to_string()),
            DemoStopReason::Interrupted => self.painter.warning(stop_reason.to_string()),
        };
        write!(
            f,
            "{} {} {}",
            self.painter.heading("Stopped:"),
            stop_reason,
            self.painter
                .value(format!("- sent {} frame(s)", self.summary.frames_sent()))
        )
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use rstest::rstest;

    use super::*;
    use crate::handlers::{
        ColourPreset, ControllerToLcdFrame, FrameCodec, FrameMode, Rgb,
    };
    use crate::protocol::{NUM_ZONES, PatternType, ProtocolRevision};

    fn sent(index: u8, name: &str, mode: FrameMode, zone_colours: [Rgb; NUM_ZONES]) -> SentFrame {
        let frame = ControllerToLcdFrame::new(index, name, mode, zone_colours.to_vec());
        let bytes = FrameCodec::encode_controller_frame(&frame).expect("test frame encodes");
        SentFrame::new(&frame, &bytes)
    }

    #[test]
    fn sent_frame_lists_zones_and_raw_bytes() {
        let painter = Painter::new(false);
        let frame = sent(
            2,
            "Strobe",
            FrameMode::PatternType(PatternType::Strobe),
            ColourPreset::Rainbow.zone_colours(),
        );
        assert_snapshot!(SentFrameView::new(&frame, &painter).to_string(), @r"
        Sent colour update:
        ╭───────────┬───────────────────────────────────────────────────────────────────────────────────────────╮
        │ field     │ value                                                                                     │
        ├───────────┼───────────────────────────────────────────────────────────────────────────────────────────┤
        │ pattern   │ 2 (Strobe)                                                                                │
        │ mode      │ strobe (0x02)                                                                             │
        │ cage      │ #FF0000                                                                                   │
        │ center    │ #FF7F00                                                                                   │
        │ front     │ #00FF00                                                                                   │
        │ headboard │ #0000FF                                                                                   │
        │ frame     │ 02 53 74 72 6F 62 65 00 00 00 00 00 00 00 00 00 00 02 FF 00 00 FF 7F 00 00 FF 00 00 00 FF │
        ╰───────────┴───────────────────────────────────────────────────────────────────────────────────────────╯
        ");
    }

    #[test]
    fn enumeration_lists_every_frame() {
        let painter = Painter::new(false);
        let receipt = EnumerationReceipt::new(
            ProtocolRevision::V1,
            vec![
                sent(0, "Rotate", FrameMode::ColorWheel(true), [Rgb::BLACK; NUM_ZONES]),
                sent(1, "Static", FrameMode::ColorWheel(false), [Rgb::BLACK; NUM_ZONES]),
            ],
        );
        assert_snapshot!(EnumerationView::new(&receipt, &painter).to_string(), @r"
        Enumerated 2 pattern(s) for revision v1:
        ╭───────┬────────┬──────────────────────┬───────────────────────────────────────────────────────────────────────────────────────────╮
        │ index │ name   │ mode                 │ frame                                                                                     │
        ├───────┼────────┼──────────────────────┼───────────────────────────────────────────────────────────────────────────────────────────┤
        │ 0     │ Rotate │ colour wheel (0x01)  │ 00 52 6F 74 61 74 65 00 00 00 00 00 00 00 00 00 00 01 00 00 00 00 00 00 00 00 00 00 00 00 │
        │ 1     │ Static │ fixed colours (0x00) │ 01 53 74 61 74 69 63 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 │
        ╰───────┴────────┴──────────────────────┴───────────────────────────────────────────────────────────────────────────────────────────╯
        ");
    }

    #[test]
    fn demo_frame_is_one_line() {
        let painter = Painter::new(false);
        let frame = sent(
            0,
            "Rotate",
            FrameMode::PatternType(PatternType::Cached),
            ColourPreset::Warm.zone_colours(),
        );
        assert_snapshot!(
            DemoFrameView::new(7, &frame, &painter).to_string(),
            @"[0007] 0 (Rotate) #FF6400 #FF3200 #FF9632 #FF4B19"
        );
    }

    #[rstest]
    #[case::reached_limit(DemoStopReason::ReachedLimit(3), "Stopped: reached max frames (3) - sent 3 frame(s)")]
    #[case::interrupted(DemoStopReason::Interrupted, "Stopped: interrupted by user - sent 3 frame(s)")]
    fn demo_summary_renders_stop_reason(#[case] stop_reason: DemoStopReason, #[case] expected: &str) {
        let painter = Painter::new(false);
        let summary = DemoSummary::new(3, stop_reason);
        pretty_assertions::assert_eq!(expected, DemoSummaryView::new(&summary, &painter).to_string());
    }
}
