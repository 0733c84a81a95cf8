//! file: cli/src/output.rs
//! description: terminal rendering for pulsec commands. Styles are plain
//! `console` styles, so colors drop out automatically when stdout is not a
//! terminal.

use std::io::{self, Write};

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};
use console::Style;
use rust_decimal::Decimal;
use serde::Serialize;

/// Styles for different output elements
pub struct FormatStyle {
    pub title: Style,
    pub warning: Style,
    pub error: Style,
    pub success: Style,
}

impl Default for FormatStyle {
    fn default() -> Self {
        FormatStyle {
            title: Style::new().bold().underlined(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            success: Style::new().green().bold(),
        }
    }
}

/// One row of the `check` table: the folding result of a single drive.
#[derive(Debug, Clone, Serialize)]
pub struct DriveRow {
    pub coupling: String,
    pub field: String,
    pub modulation: String,
    pub duration: Decimal,
    pub value: Decimal,
    pub is_constant: bool,
}

pub fn drive_table(rows: &[DriveRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "coupling", "field", "sites", "duration", "end value", "constant",
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.coupling),
            Cell::new(&row.field),
            Cell::new(&row.modulation),
            Cell::new(row.duration),
            Cell::new(row.value),
            Cell::new(if row.is_constant { "yes" } else { "no" }),
        ]);
    }
    table
}

/// Printer that writes styled lines into any `Write`.
pub struct OutputHandler<T: Write> {
    out: T,
    formatting: FormatStyle,
}

impl<T: Write> OutputHandler<T> {
    pub fn new(out: T) -> Self {
        OutputHandler {
            out,
            formatting: FormatStyle::default(),
        }
    }

    /// Write one line, optionally styled.
    pub fn line(&mut self, text: &str, style: Option<&Style>) -> io::Result<()> {
        match style {
            Some(s) => writeln!(self.out, "{}", s.apply_to(text)),
            None => writeln!(self.out, "{}", text),
        }
    }

    pub fn title(&mut self, text: &str) -> io::Result<()> {
        let style = self.formatting.title.clone();
        self.line(text, Some(&style))
    }

    pub fn table(&mut self, table: &Table) -> io::Result<()> {
        writeln!(self.out, "{table}")
    }

    pub fn verdict(&mut self, is_constant: bool) -> io::Result<()> {
        let (text, style) = if is_constant {
            ("circuit is constant", self.formatting.success.clone())
        } else {
            ("circuit is not constant", self.formatting.warning.clone())
        };
        self.line(text, Some(&style))
    }

    pub fn json<S: Serialize>(&mut self, value: &S) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        writeln!(self.out, "{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_every_drive() {
        let rows = vec![
            DriveRow {
                coupling: "rydberg".into(),
                field: "detuning".into(),
                modulation: "uniform".into(),
                duration: Decimal::from(4),
                value: Decimal::from(2),
                is_constant: true,
            },
            DriveRow {
                coupling: "rydberg".into(),
                field: "rabi.amplitude".into(),
                modulation: "vector mask".into(),
                duration: Decimal::from(4),
                value: Decimal::ZERO,
                is_constant: false,
            },
        ];
        let rendered = drive_table(&rows).to_string();
        assert!(rendered.contains("rabi.amplitude"));
        assert!(rendered.contains("vector mask"));
        assert!(rendered.contains("yes"));
        assert!(rendered.contains("no"));
    }

    #[test]
    fn verdict_is_written_to_the_sink() {
        let mut buf = Vec::new();
        {
            let mut out = OutputHandler::new(&mut buf);
            out.verdict(false).unwrap();
        }
        let text = console::strip_ansi_codes(&String::from_utf8_lossy(&buf)).to_string();
        assert_eq!(text.trim(), "circuit is not constant");
    }
}
