use std::io;

use anyhow::Result;

use crate::cli::OutputFormat;
use crate::cli::output::{CommandOutput, PatternEntry, write_json_line};
use crate::cli::ui::{Painter, PatternTableView};
use crate::handlers::{LegacyPatternTypeMapping, PatternTable};
use crate::protocol::ProtocolRevision;

/// Executes the `patterns` command. No link is opened.
pub(crate) fn run<W>(
    revision: ProtocolRevision,
    out: &mut W,
    output_format: OutputFormat,
    painter: &Painter,
) -> Result<()>
where
    W: io::Write,
{
    let table = PatternTable::for_revision(revision);
    match output_format {
        OutputFormat::Pretty => {
            writeln!(out, "{}", PatternTableView::new(table, painter))?;
        }
        OutputFormat::Json => {
            let patterns = table
                .iter()
                .map(|(index, name)| {
                    let mode = table.mode_for(index, index == 0, &LegacyPatternTypeMapping);
                    PatternEntry {
                        index,
                        name,
                        mode,
                        mode_byte: mode.as_protocol_byte(),
                    }
                })
                .collect();
            write_json_line(out, &CommandOutput::Patterns { revision, patterns })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn json_lists_every_pattern() {
        let mut out = Vec::new();
        run(
            ProtocolRevision::V1,
            &mut out,
            OutputFormat::Json,
            &Painter::new(false),
        )
        .expect("patterns command succeeds");

        let value: serde_json::Value =
            serde_json::from_slice(&out).expect("output is one JSON document");
        assert_eq!("patterns", value["event"]);
        assert_eq!("v1", value["revision"]);
        assert_eq!(10, value["patterns"].as_array().map_or(0, Vec::len));
        assert_eq!("colour wheel", value["patterns"][0]["mode"]);
        assert_eq!(0, value["patterns"][1]["mode_byte"]);
    }
}
