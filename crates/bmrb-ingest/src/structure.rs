//! Secondary structure from PDB HELIX / SHEET records
//!
//! Only the residue span of each record is read, from the fixed columns of
//! the PDB format (1-indexed, inclusive):
//!
//! | Record | Start   | End     |
//! |--------|---------|---------|
//! | HELIX  | 22 - 25 | 34 - 37 |
//! | SHEET  | 23 - 26 | 34 - 37 |

use bmrb_common::types::{
    EnrichedRow, SecondaryStructure, ShiftRow, StructureKind, StructureRange,
};
use bmrb_common::{BmrbError, Result};

pub const HELIX_RECORD: &str = "HELIX";
pub const SHEET_RECORD: &str = "SHEET";

/// Columns `first..=last` (1-indexed); clamped to the line length
fn column(line: &str, first: usize, last: usize) -> &str {
    let start = (first - 1).min(line.len());
    let end = last.min(line.len());
    line.get(start..end).unwrap_or_default()
}

fn integer_field(line: &str, first: usize, last: usize, record: &str, field: &str) -> Result<i64> {
    let raw = column(line, first, last).trim();
    raw.parse().map_err(|_| {
        BmrbError::parse(format!(
            "{} record has invalid {} residue '{}' in columns {}-{}: {}",
            record, field, raw, first, last, line
        ))
    })
}

/// Residue span of a HELIX record
pub fn parse_helix_record(line: &str) -> Result<StructureRange> {
    let start = integer_field(line, 22, 25, HELIX_RECORD, "start")?;
    let end = integer_field(line, 34, 37, HELIX_RECORD, "end")?;
    Ok(StructureRange::new(StructureKind::Helix, start, end))
}

/// Residue span of a SHEET record
pub fn parse_sheet_record(line: &str) -> Result<StructureRange> {
    let start = integer_field(line, 23, 26, SHEET_RECORD, "start")?;
    let end = integer_field(line, 34, 37, SHEET_RECORD, "end")?;
    Ok(StructureRange::new(StructureKind::Sheet, start, end))
}

/// All HELIX and SHEET ranges of a PDB file, in file order
///
/// A single malformed record fails the whole file.
pub fn parse_structure_ranges(pdb_text: &str) -> Result<Vec<StructureRange>> {
    let mut ranges = Vec::new();

    for line in pdb_text.lines() {
        if line.starts_with(HELIX_RECORD) {
            ranges.push(parse_helix_record(line.trim())?);
        } else if line.starts_with(SHEET_RECORD) {
            ranges.push(parse_sheet_record(line.trim())?);
        }
    }

    Ok(ranges)
}

/// Label each row with the first range containing its residue number
pub fn assign_secondary_structure(
    rows: &[ShiftRow],
    ranges: &[StructureRange],
) -> Result<Vec<EnrichedRow>> {
    rows.iter()
        .map(|row| {
            let position = row.residue_number()?;
            let secondary_structure = ranges
                .iter()
                .find(|range| range.contains(position))
                .map(|range| SecondaryStructure::from(range.kind))
                .unwrap_or_default();

            Ok(EnrichedRow {
                shift: row.clone(),
                secondary_structure,
            })
        })
        .collect()
}
