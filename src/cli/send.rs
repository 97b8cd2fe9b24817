use std::io;

use anyhow::{Result, bail};
use clap::Args;

use crate::cli::OutputFormat;
use crate::cli::output::{CommandOutput, write_json_line};
use crate::cli::ui::{Painter, SentFrameView};
use crate::handlers::{ColourPreset, ColourUpdate, ColourUpdateHandler, Rgb};
use crate::link::LinkClient;
use crate::protocol::{NUM_ZONES, ProtocolRevision};

/// Arguments for the `send` command.
#[derive(Debug, Args)]
pub struct SendArgs {
    /// Pattern index; names wrap around the pattern table.
    #[arg(long)]
    pattern: u8,
    #[command(flatten)]
    colours: ColourSourceArgs,
}

/// Exactly one of a preset or four explicit colours.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct ColourSourceArgs {
    /// Named colour set.
    #[arg(long, value_enum)]
    preset: Option<ColourPreset>,
    /// Four `RRGGBB` colours in zone order: cage, center, front, headboard.
    #[arg(
        long = "colour",
        num_args = NUM_ZONES,
        value_names = ["CAGE", "CENTER", "FRONT", "HEADBOARD"]
    )]
    colours: Option<Vec<Rgb>>,
}

impl SendArgs {
    /// Sends a named preset.
    ///
    /// ```
    /// use isbed_mock::{ColourPreset, SendArgs};
    ///
    /// let args = SendArgs::with_preset(3, ColourPreset::Warm);
    /// let _ = args;
    /// ```
    #[must_use]
    pub fn with_preset(pattern: u8, preset: ColourPreset) -> Self {
        Self {
            pattern,
            colours: ColourSourceArgs {
                preset: Some(preset),
                colours: None,
            },
        }
    }

    /// Sends one explicit colour per zone.
    #[must_use]
    pub fn with_colours(pattern: u8, colours: [Rgb; NUM_ZONES]) -> Self {
        Self {
            pattern,
            colours: ColourSourceArgs {
                preset: None,
                colours: Some(colours.to_vec()),
            },
        }
    }

    fn zone_colours(&self) -> Result<[Rgb; NUM_ZONES]> {
        match (&self.colours.preset, &self.colours.colours) {
            (Some(preset), _) => Ok(preset.zone_colours()),
            (None, Some(colours)) => match <[Rgb; NUM_ZONES]>::try_from(colours.as_slice()) {
                Ok(colours) => Ok(colours),
                Err(_error) => bail!(
                    "expected {NUM_ZONES} colours (one per zone), got {}",
                    colours.len()
                ),
            },
            (None, None) => bail!("either --preset or --colour is required"),
        }
    }
}

/// Executes the `send` command.
pub(crate) async fn run<W>(
    client: Box<dyn LinkClient>,
    args: &SendArgs,
    revision: ProtocolRevision,
    out: &mut W,
    output_format: OutputFormat,
    painter: &Painter,
) -> Result<()>
where
    W: io::Write,
{
    let update = ColourUpdate::new(revision, args.pattern, args.zone_colours()?);
    let mut session = client.open().await?;
    let sent = ColourUpdateHandler::send(&mut session, update).await;
    session.close();
    let sent = sent?;

    match output_format {
        OutputFormat::Pretty => {
            writeln!(out, "{}", SentFrameView::new(&sent, painter))?;
        }
        OutputFormat::Json => {
            write_json_line(out, &CommandOutput::Sent { frame: &sent })?;
        }
    }
    Ok(())
}
