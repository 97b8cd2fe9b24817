use std::fmt::{self, Display, Formatter};

use crate::handlers::{LegacyPatternTypeMapping, PatternTable};

use super::painter::Painter;
use super::table::Table;

/// Renders a pattern table with the mode byte each entry is announced with.
pub(crate) struct PatternTableView<'a> {
    table: PatternTable,
    painter: &'a Painter,
}

impl<'a> PatternTableView<'a> {
    pub(crate) fn new(table: PatternTable, painter: &'a Painter) -> Self {
        Self { table, painter }
    }
}

impl Display for PatternTableView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rows = self
            .table
            .iter()
            .map(|(index, name)| {
                let mode = self
                    .table
                    .mode_for(index, index == 0, &LegacyPatternTypeMapping);
                vec![
                    index.to_string(),
                    self.painter.value(name),
                    format!("0x{:02X}", mode.as_protocol_byte()),
                    mode.to_string(),
                ]
            })
            .collect();
        let heading = format!("Pattern table (revision {}):", self.table.revision());

        write!(f, "{}", self.painter.heading(heading))?;
        write!(
            f,
            "\n{}",
            Table::grid(["index", "name", "mode byte", "mode"], rows)
        )
    }
}
