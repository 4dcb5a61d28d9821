//! AVS validation report parser
//!
//! `AVS_full.txt` lists each residue on a line containing `Overall:`, followed
//! by detail lines. The average carbon shifts sit on a line such as:
//!
//! ```text
//!   15 GLY   Overall: ...
//!      Ave C Shift Values>>  C::173.9<TAB>CA::45.3
//! ```
//!
//! Only C, CA and CB are kept; an absent atom becomes `None`.

use bmrb_common::types::ShiftRow;
use bmrb_common::{BmrbError, Result};
use std::collections::HashMap;

/// Separates the residue label from its summary on a residue line
pub const RESIDUE_MARKER: &str = "Overall:";

/// Marks the line carrying average carbon shifts
pub const SHIFT_LINE_MARKER: &str = "Ave C Shift Values>>";

const PAYLOAD_DELIMITER: &str = ">>";
const PAIR_SEPARATOR: &str = "::";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParserState {
    AwaitingResidue,
    AwaitingShiftLine { residue: String },
}

/// Line-driven parser for AVS reports
///
/// The residue stays current after its shift line is consumed, so repeated
/// shift lines under one residue each produce a row.
#[derive(Debug)]
pub struct AvsParser {
    state: ParserState,
    rows: Vec<ShiftRow>,
}

impl AvsParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::AwaitingResidue,
            rows: Vec::new(),
        }
    }

    /// Parse a complete report
    pub fn parse(text: &str) -> Result<Vec<ShiftRow>> {
        let mut parser = Self::new();
        for (index, line) in text.lines().enumerate() {
            parser
                .feed_line(line)
                .map_err(|e| BmrbError::parse(format!("AVS line {}: {}", index + 1, e)))?;
        }
        Ok(parser.finish())
    }

    pub fn feed_line(&mut self, line: &str) -> Result<()> {
        let line = line.trim();

        if line.contains(RESIDUE_MARKER) {
            let residue = line
                .split(RESIDUE_MARKER)
                .next()
                .unwrap_or_default()
                .trim();

            self.state = if residue.is_empty() {
                ParserState::AwaitingResidue
            } else {
                ParserState::AwaitingShiftLine {
                    residue: residue.to_string(),
                }
            };
        } else if line.contains(SHIFT_LINE_MARKER) {
            let values = parse_shift_payload(line)?;
            if let ParserState::AwaitingShiftLine { residue } = &self.state {
                self.rows.push(ShiftRow::new(
                    residue.clone(),
                    values.get("C").cloned(),
                    values.get("CA").cloned(),
                    values.get("CB").cloned(),
                ));
            }
        }

        Ok(())
    }

    pub fn finish(self) -> Vec<ShiftRow> {
        self.rows
    }
}

impl Default for AvsParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Tab-separated `ATOM::value` pairs following the first `>>`
fn parse_shift_payload(line: &str) -> Result<HashMap<String, String>> {
    let payload = line.split(PAYLOAD_DELIMITER).nth(1).unwrap_or_default().trim();
    let mut values = HashMap::new();

    for item in payload.split('\t').filter(|item| item.contains(PAIR_SEPARATOR)) {
        let mut parts = item.split(PAIR_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => {
                values.insert(key.trim().to_string(), value.trim().to_string());
            },
            _ => {
                return Err(BmrbError::parse(format!("malformed shift pair '{}'", item)));
            },
        }
    }

    Ok(values)
}
