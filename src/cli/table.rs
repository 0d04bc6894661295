//! Table formatting utilities for report output
//!
//! Every table the CLI prints goes through [`Table`], which renders the same
//! rows as markdown, aligned columns, or CSV.

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::Path;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{format_qty, truncate_str};
use crate::cli::OutputFormat;

/// Widest a column may grow in aligned output
const MAX_COLUMN_WIDTH: usize = 40;

/// A typed cell value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Plain text
    Text(String),
    /// Quantity, right aligned
    Qty(f64),
    /// Quantity that may be absent
    OptionalQty(Option<f64>),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Get raw string value (no formatting, for CSV output)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Qty(q) => format_qty(*q),
            CellValue::OptionalQty(opt) => opt.map(format_qty).unwrap_or_default(),
            CellValue::Empty => String::new(),
        }
    }

    /// Format for aligned output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Text(s) => {
                format!("{:<width$}", truncate_str(s, width), width = width)
            }
            CellValue::Qty(q) => format!("{:>width$}", format_qty(*q), width = width),
            CellValue::OptionalQty(Some(q)) => CellValue::Qty(*q).format_tsv(width),
            CellValue::OptionalQty(None) | CellValue::Empty => {
                format!("{:>width$}", style("-").dim(), width = width)
            }
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        self.raw().replace('|', "\\|")
    }

    /// Get the display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        self.raw().chars().count().max(1)
    }
}

/// Header plus rows, rendered on demand
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render in the given format. JSON is produced by callers from the
    /// underlying data, so it falls back to markdown here.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Csv => self.render_csv(),
            OutputFormat::Tsv => Ok(self.render_tsv()),
            OutputFormat::Auto | OutputFormat::Md | OutputFormat::Json => Ok(self.render_md()),
        }
    }

    fn render_md(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.headers.clone());
        for row in &self.rows {
            builder.push_record(row.iter().map(CellValue::format_md).collect::<Vec<_>>());
        }
        let mut rendered = builder.build().with(Style::markdown()).to_string();
        rendered.push('\n');
        rendered
    }

    fn render_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        self.write_records(&mut writer)?;
        let bytes = writer
            .into_inner()
            .map_err(|e| miette::miette!("failed to flush CSV output: {}", e.error()))?;
        String::from_utf8(bytes).into_diagnostic()
    }

    fn render_tsv(&self) -> String {
        let widths = self.calculate_widths();
        let mut out = String::new();

        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, &w)| format!("{:<width$}", style(truncate_str(h, w)).bold(), width = w))
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in &self.rows {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, &w)| row.get(i).unwrap_or(&CellValue::Empty).format_tsv(w))
                .collect();
            out.push_str(cells.join(" ").trim_end());
            out.push('\n');
        }

        out
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let content = self
                    .rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(CellValue::display_width)
                    .max()
                    .unwrap_or(0);
                header.chars().count().max(content).min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    /// Write the table as a CSV file
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path).into_diagnostic()?;
        self.write_records(&mut writer)?;
        writer.flush().into_diagnostic()
    }

    fn write_records<W: std::io::Write>(&self, writer: &mut csv::Writer<W>) -> Result<()> {
        writer.write_record(&self.headers).into_diagnostic()?;
        for row in &self.rows {
            // Pad short rows so every record has the header's width
            let record: Vec<String> = (0..self.headers.len())
                .map(|i| row.get(i).map(CellValue::raw).unwrap_or_default())
                .collect();
            writer.write_record(&record).into_diagnostic()?;
        }
        Ok(())
    }
}
