//! Tabular writers for the labeled dataset.

use crate::{
    error::{GenError, GenResult},
    label::{OutputRow, COLUMNS},
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    Labeled,
    /// Drops the `fraud` column: input for a classifier to predict on.
    Unlabeled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Csv,
    Jsonl,
}

impl FromStr for OutputFormat {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "jsonl" | "json-lines" => Ok(Self::Jsonl),
            other => Err(GenError::invalid("format", format!("unknown format '{other}'"))),
        }
    }
}

fn column_count(mode: LabelMode) -> usize {
    match mode {
        LabelMode::Labeled => COLUMNS.len(),
        LabelMode::Unlabeled => COLUMNS.len() - 1,
    }
}

/// Quote a cell when it holds a separator, quote or line break.
fn escape_cell(cell: &str) -> Cow<'_, str> {
    if cell.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", cell.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(cell)
    }
}

pub fn write_csv<W: Write>(rows: &[OutputRow], mode: LabelMode, mut out: W) -> GenResult<()> {
    let n = column_count(mode);
    writeln!(out, "{}", COLUMNS[..n].join(","))?;
    for row in rows {
        let cells = row.cells();
        let line: Vec<Cow<'_, str>> = cells[..n].iter().map(|c| escape_cell(c)).collect();
        writeln!(out, "{}", line.join(","))?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_jsonl<W: Write>(rows: &[OutputRow], mode: LabelMode, mut out: W) -> GenResult<()> {
    for row in rows {
        match mode {
            LabelMode::Labeled => serde_json::to_writer(&mut out, row)?,
            LabelMode::Unlabeled => {
                let mut value = serde_json::to_value(row)?;
                if let Some(fields) = value.as_object_mut() {
                    fields.remove("fraud");
                }
                serde_json::to_writer(&mut out, &value)?;
            }
        }
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_rows<W: Write>(
    rows: &[OutputRow],
    format: OutputFormat,
    mode: LabelMode,
    out: W,
) -> GenResult<()> {
    match format {
        OutputFormat::Csv => write_csv(rows, mode, out),
        OutputFormat::Jsonl => write_jsonl(rows, mode, out),
    }
}
