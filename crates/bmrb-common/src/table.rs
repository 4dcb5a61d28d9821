//! CSV tables written per BMRB entry
//!
//! Two layouts are produced:
//!
//! - `shift_data_<id>.csv`: `Residue,C,CA,CB`
//! - `final_data_<id>.csv`: `Residue,C,CA,CB,Secondary_Structure`
//!
//! Missing shift values are written as the literal `None`. A header row is
//! always written, even for an empty table.

use crate::error::Result;
use crate::types::{EnrichedRow, RecordId, SecondaryStructure, ShiftRow, MISSING_VALUE};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const SHIFT_HEADER: [&str; 4] = ["Residue", "C", "CA", "CB"];
pub const ENRICHED_HEADER: [&str; 5] = ["Residue", "C", "CA", "CB", "Secondary_Structure"];

/// `<dir>/shift_data_<id>.csv`
pub fn shift_table_path(output_dir: &Path, id: &RecordId) -> PathBuf {
    output_dir.join(format!("shift_data_{}.csv", id))
}

/// `<dir>/final_data_<id>.csv`
pub fn enriched_table_path(output_dir: &Path, id: &RecordId) -> PathBuf {
    output_dir.join(format!("final_data_{}.csv", id))
}

#[derive(Serialize)]
struct EnrichedRecord<'a> {
    #[serde(rename = "Residue")]
    residue: &'a str,
    #[serde(rename = "C")]
    c: &'a str,
    #[serde(rename = "CA")]
    ca: &'a str,
    #[serde(rename = "CB")]
    cb: &'a str,
    #[serde(rename = "Secondary_Structure")]
    secondary_structure: SecondaryStructure,
}

impl<'a> From<&'a EnrichedRow> for EnrichedRecord<'a> {
    fn from(row: &'a EnrichedRow) -> Self {
        Self {
            residue: &row.shift.residue,
            c: row.shift.c.as_deref().unwrap_or(MISSING_VALUE),
            ca: row.shift.ca.as_deref().unwrap_or(MISSING_VALUE),
            cb: row.shift.cb.as_deref().unwrap_or(MISSING_VALUE),
            secondary_structure: row.secondary_structure,
        }
    }
}

#[derive(Deserialize)]
struct OwnedEnrichedRecord {
    #[serde(rename = "Residue")]
    residue: String,
    #[serde(rename = "C")]
    c: String,
    #[serde(rename = "CA")]
    ca: String,
    #[serde(rename = "CB")]
    cb: String,
    #[serde(rename = "Secondary_Structure")]
    secondary_structure: SecondaryStructure,
}

fn from_sentinel(value: String) -> Option<String> {
    if value == MISSING_VALUE || value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Write a shift table to any writer
pub fn write_shift_rows<W: Write>(writer: W, rows: &[ShiftRow]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(SHIFT_HEADER)?;
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Read a shift table from any reader
pub fn read_shift_rows<R: Read>(reader: R) -> Result<Vec<ShiftRow>> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in csv.deserialize::<ShiftRow>() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Write an enriched table to any writer
pub fn write_enriched_rows<W: Write>(writer: W, rows: &[EnrichedRow]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(ENRICHED_HEADER)?;
    for row in rows {
        csv.serialize(EnrichedRecord::from(row))?;
    }
    csv.flush()?;
    Ok(())
}

/// Read an enriched table from any reader
pub fn read_enriched_rows<R: Read>(reader: R) -> Result<Vec<EnrichedRow>> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in csv.deserialize::<OwnedEnrichedRecord>() {
        let record = record?;
        rows.push(EnrichedRow {
            shift: ShiftRow::new(
                record.residue,
                from_sentinel(record.c),
                from_sentinel(record.ca),
                from_sentinel(record.cb),
            ),
            secondary_structure: record.secondary_structure,
        });
    }
    Ok(rows)
}

pub fn write_shift_table(path: impl AsRef<Path>, rows: &[ShiftRow]) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_shift_rows(file, rows)
}

pub fn read_shift_table(path: impl AsRef<Path>) -> Result<Vec<ShiftRow>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_shift_rows(file)
}

pub fn write_enriched_table(path: impl AsRef<Path>, rows: &[EnrichedRow]) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_enriched_rows(file, rows)
}

pub fn read_enriched_table(path: impl AsRef<Path>) -> Result<Vec<EnrichedRow>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_enriched_rows(file)
}
