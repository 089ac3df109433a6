// Exportable report: raw aggregated values plus a display-ready grid

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::{Fields, PortId};

/// Column alignment hint for console renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Header row (optional) plus body rows of preformatted cells.
/// Alignment and widths are presentation hints only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
    pub align: Vec<Align>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub widths: Vec<usize>,
}

impl Table {
    pub fn new(align: Vec<Align>) -> Self {
        Self {
            align,
            ..Default::default()
        }
    }

    pub fn with_widths(mut self, widths: Vec<usize>) -> Self {
        self.widths = widths;
        self
    }

    pub fn set_header(&mut self, header: Vec<String>) {
        self.header = Some(header);
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn column_count(&self) -> usize {
        self.header
            .iter()
            .chain(self.rows.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    /// Width of column `i`: the hint if given, widened to fit the longest cell.
    fn width_of(&self, i: usize) -> usize {
        let content = self
            .header
            .iter()
            .chain(self.rows.iter())
            .filter_map(|r| r.get(i))
            .map(|c| c.chars().count())
            .max()
            .unwrap_or(0);
        self.widths.get(i).copied().unwrap_or(0).max(content)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, table: &Table, row: &[String]) -> fmt::Result {
    let cols = table.column_count();
    let mut line = String::new();
    for i in 0..cols {
        let cell = row.get(i).map(String::as_str).unwrap_or("");
        let w = table.width_of(i);
        let padded = match table.align.get(i).copied().unwrap_or(Align::Left) {
            Align::Left => format!("{cell:<w$}"),
            Align::Center => format!("{cell:^w$}"),
            Align::Right => format!("{cell:>w$}"),
        };
        if i > 0 {
            line.push_str(" | ");
        }
        line.push_str(&padded);
    }
    writeln!(f, "{}", line.trim_end())
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref header) = self.header {
            write_row(f, self, header)?;
            let total: usize = (0..self.column_count()).map(|i| self.width_of(i)).sum::<usize>()
                + 3 * self.column_count().saturating_sub(1);
            writeln!(f, "{}", "-".repeat(total))?;
        }
        for row in &self.rows {
            write_row(f, self, row)?;
        }
        Ok(())
    }
}

/// Global reports are a single flat mapping; port reports are keyed by port id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawData {
    Flat(Fields),
    PerPort(BTreeMap<PortId, Fields>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportableReport {
    pub raw_data: RawData,
    pub table: Table,
}

/// Report name (e.g. "port_statistics") -> report. Empty for unknown kinds.
pub type Reports = BTreeMap<&'static str, ExportableReport>;
