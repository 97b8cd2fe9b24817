use std::io;
use std::time::Duration;

use anyhow::Result;
use bon::Builder;
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_with::SerializeDisplay;
use tokio::time::sleep;
use tracing::instrument;

use crate::cli::OutputFormat;
use crate::cli::command::parse_duration;
use crate::cli::output::{CommandOutput, write_json_line};
use crate::cli::ui::{DemoFrameView, DemoSummaryView, Painter, label_current_span};
use crate::error::LinkError;
use crate::handlers::{ColourPreset, ColourUpdate, ColourUpdateHandler, HueRamp, PatternTable, Rgb};
use crate::link::{LinkClient, LinkSession};
use crate::protocol::{NUM_ZONES, ProtocolRevision};

const DEFAULT_HUE_STEP: u16 = 15;

/// Preset order used by the demo; the pattern advances after the last one.
const DEMO_PRESETS: [ColourPreset; 7] = [
    ColourPreset::Red,
    ColourPreset::Green,
    ColourPreset::Blue,
    ColourPreset::White,
    ColourPreset::Rainbow,
    ColourPreset::Warm,
    ColourPreset::Cool,
];

/// Where demo colours come from.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum)]
pub enum DemoSource {
    /// Cycle the named presets, moving to the next pattern after each full cycle.
    #[default]
    Presets,
    /// Sweep the hue wheel on a fixed pattern.
    HueRamp,
}

/// Arguments for the `demo` command.
///
/// ```
/// use std::time::Duration;
///
/// use isbed_mock::{DemoArgs, DemoSource};
///
/// let args = DemoArgs::builder()
///     .interval(Duration::ZERO)
///     .max_frames(14)
///     .source(DemoSource::Presets)
///     .build();
/// let _ = args;
/// ```
#[derive(Debug, Args, Builder)]
pub struct DemoArgs {
    /// Pause between colour updates (e.g. `500ms`).
    #[arg(long, default_value = "1s", value_parser = parse_duration)]
    #[builder(default = Duration::from_secs(1))]
    interval: Duration,
    /// Stop after this many frames. If omitted, run until Ctrl+C.
    #[arg(long)]
    max_frames: Option<usize>,
    /// Colour source.
    #[arg(long, value_enum, default_value_t = DemoSource::Presets)]
    #[builder(default)]
    source: DemoSource,
    /// Pattern index the demo starts on.
    #[arg(long, default_value_t = 0)]
    #[builder(default)]
    start_pattern: u8,
    /// Hue advance per frame for `hue-ramp`, in degrees.
    #[arg(long, default_value_t = DEFAULT_HUE_STEP)]
    #[builder(default = DEFAULT_HUE_STEP)]
    hue_step: u16,
}

/// Why a demo run ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq, derive_more::Display, SerializeDisplay)]
pub enum DemoStopReason {
    #[display("reached max frames ({_0})")]
    ReachedLimit(usize),
    #[display("interrupted by user")]
    Interrupted,
}

/// Summary printed when a demo run ends.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub(crate) struct DemoSummary {
    frames_sent: usize,
    stop_reason: DemoStopReason,
}

impl DemoSummary {
    pub(crate) fn new(frames_sent: usize, stop_reason: DemoStopReason) -> Self {
        Self {
            frames_sent,
            stop_reason,
        }
    }

    pub(crate) fn frames_sent(&self) -> usize {
        self.frames_sent
    }

    pub(crate) fn stop_reason(&self) -> DemoStopReason {
        self.stop_reason
    }
}

/// Endless sequence of `(pattern index, zone colours)` demo frames.
#[derive(Debug)]
struct DemoSequence {
    colours: ColourSource,
    pattern_index: u8,
    pattern_count: u8,
}

#[derive(Debug)]
enum ColourSource {
    Presets { next_preset: usize },
    HueRamp(HueRamp),
}

impl DemoSequence {
    fn new(args: &DemoArgs, table: PatternTable) -> Self {
        let pattern_count = u8::try_from(table.len()).unwrap_or(u8::MAX).max(1);
        let colours = match args.source {
            DemoSource::Presets => ColourSource::Presets { next_preset: 0 },
            DemoSource::HueRamp => ColourSource::HueRamp(HueRamp::new(args.hue_step)),
        };

        Self {
            colours,
            pattern_index: args.start_pattern % pattern_count,
            pattern_count,
        }
    }

    fn next_frame(&mut self) -> (u8, [Rgb; NUM_ZONES]) {
        match &mut self.colours {
            ColourSource::Presets { next_preset } => {
                let frame = (
                    self.pattern_index,
                    DEMO_PRESETS[*next_preset].zone_colours(),
                );
                *next_preset = (*next_preset + 1) % DEMO_PRESETS.len();
                if *next_preset == 0 {
                    self.pattern_index = (self.pattern_index + 1) % self.pattern_count;
                }
                frame
            }
            ColourSource::HueRamp(ramp) => (
                self.pattern_index,
                ramp.next().unwrap_or([Rgb::BLACK; NUM_ZONES]),
            ),
        }
    }
}

/// Executes the `demo` command.
pub(crate) async fn run<W>(
    client: Box<dyn LinkClient>,
    args: &DemoArgs,
    revision: ProtocolRevision,
    out: &mut W,
    output_format: OutputFormat,
    painter: &Painter,
) -> Result<()>
where
    W: io::Write,
{
    let mut session = client.open().await?;
    let result = run_with_session(&mut session, args, revision, out, output_format, painter).await;
    session.close();
    result
}

#[instrument(
    skip_all,
    level = "info",
    fields(progress = true, source = ?args.source, max_frames = ?args.max_frames)
)]
async fn run_with_session<W>(
    session: &mut LinkSession,
    args: &DemoArgs,
    revision: ProtocolRevision,
    out: &mut W,
    output_format: OutputFormat,
    painter: &Painter,
) -> Result<()>
where
    W: io::Write,
{
    label_current_span("Sending demo colour updates", "Demo finished");
    let mut sequence = DemoSequence::new(args, PatternTable::for_revision(revision));
    let mut sent = 0usize;

    let stop_reason = loop {
        if let Some(limit) = args.max_frames
            && sent >= limit
        {
            break DemoStopReason::ReachedLimit(limit);
        }

        let (pattern_index, zone_colours) = sequence.next_frame();
        let frame = ColourUpdateHandler::send(
            session,
            ColourUpdate::new(revision, pattern_index, zone_colours),
        )
        .await?;
        sent += 1;
        match output_format {
            OutputFormat::Pretty => {
                writeln!(out, "{}", DemoFrameView::new(sent, &frame, painter))?;
            }
            OutputFormat::Json => {
                write_json_line(
                    out,
                    &CommandOutput::DemoFrame {
                        index: sent,
                        frame: &frame,
                    },
                )?;
            }
        }

        if let Some(limit) = args.max_frames
            && sent >= limit
        {
            break DemoStopReason::ReachedLimit(limit);
        }

        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.map_err(|source| LinkError::CtrlC { source })?;
                break DemoStopReason::Interrupted;
            }
            () = sleep(args.interval) => {}
        }
    };

    let summary = DemoSummary::new(sent, stop_reason);
    match output_format {
        OutputFormat::Pretty => {
            writeln!(out)?;
            writeln!(out, "{}", DemoSummaryView::new(&summary, painter))?;
        }
        OutputFormat::Json => {
            write_json_line(out, &CommandOutput::DemoFinished { summary: &summary })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(source: DemoSource, start_pattern: u8) -> DemoArgs {
        DemoArgs::builder()
            .interval(Duration::ZERO)
            .source(source)
            .start_pattern(start_pattern)
            .hue_step(90)
            .build()
    }

    #[test]
    fn presets_advance_pattern_after_a_full_cycle() {
        let mut sequence = DemoSequence::new(
            &args(DemoSource::Presets, 0),
            PatternTable::for_revision(ProtocolRevision::V2),
        );
        let frames: Vec<_> = (0..8).map(|_| sequence.next_frame()).collect();

        assert_eq!((0, ColourPreset::Red.zone_colours()), frames[0]);
        assert_eq!((0, ColourPreset::Cool.zone_colours()), frames[6]);
        assert_eq!((1, ColourPreset::Red.zone_colours()), frames[7]);
    }

    #[test]
    fn presets_wrap_back_to_first_pattern() {
        let mut sequence = DemoSequence::new(
            &args(DemoSource::Presets, 9),
            PatternTable::for_revision(ProtocolRevision::V1),
        );
        for _ in 0..DEMO_PRESETS.len() {
            assert_eq!(9, sequence.next_frame().0);
        }
        assert_eq!(0, sequence.next_frame().0);
    }

    #[test]
    fn start_pattern_is_folded_into_the_table() {
        let sequence = DemoSequence::new(
            &args(DemoSource::Presets, 23),
            PatternTable::for_revision(ProtocolRevision::V2),
        );
        assert_eq!(3, sequence.pattern_index);
    }

    #[test]
    fn hue_ramp_stays_on_one_pattern() {
        let mut sequence = DemoSequence::new(
            &args(DemoSource::HueRamp, 4),
            PatternTable::for_revision(ProtocolRevision::V2),
        );
        let first = sequence.next_frame();
        let second = sequence.next_frame();

        assert_eq!(4, first.0);
        assert_eq!(4, second.0);
        assert_eq!(first.1[1], second.1[0]);
    }
}
