//! Domain types shared across the ingest pipeline

use crate::error::{BmrbError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Sentinel written in place of a missing shift value
pub const MISSING_VALUE: &str = "None";

// ============================================================================
// Record identifiers
// ============================================================================

/// Numeric BMRB entry identifier (e.g. "4020")
///
/// Ordering follows the integer value, so "99" sorts before "100".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create an identifier from a string of ASCII digits
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BmrbError::parse(format!(
                "BMRB identifier must be numeric, got '{}'",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn significant_digits(&self) -> &str {
        let trimmed = self.0.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.significant_digits(), other.significant_digits());
        a.len()
            .cmp(&b.len())
            .then_with(|| a.cmp(b))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = BmrbError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

// ============================================================================
// Structural candidates
// ============================================================================

/// Four-character PDB code referenced from a BMRB entry summary
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PdbCode(String);

impl PdbCode {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(BmrbError::parse(format!(
                "PDB code must be 4 alphanumeric characters, got '{}'",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PdbCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Shift rows
// ============================================================================

/// Average carbon chemical shifts for one residue of an AVS report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRow {
    /// Residue label as printed in the report (e.g. "15 GLY")
    #[serde(rename = "Residue")]
    pub residue: String,

    #[serde(rename = "C", with = "missing_sentinel")]
    pub c: Option<String>,

    #[serde(rename = "CA", with = "missing_sentinel")]
    pub ca: Option<String>,

    #[serde(rename = "CB", with = "missing_sentinel")]
    pub cb: Option<String>,
}

impl ShiftRow {
    pub fn new(
        residue: impl Into<String>,
        c: Option<String>,
        ca: Option<String>,
        cb: Option<String>,
    ) -> Self {
        Self {
            residue: residue.into(),
            c,
            ca,
            cb,
        }
    }

    /// First run of digits in the residue label, read as the residue position
    pub fn residue_number(&self) -> Result<i64> {
        let start = self
            .residue
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| {
                BmrbError::parse(format!("Residue '{}' has no sequence number", self.residue))
            })?;
        let digits: String = self.residue[start..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        Ok(digits.parse()?)
    }
}

/// Serialises `None` as the literal "None" and reads it back the same way
mod missing_sentinel {
    use super::MISSING_VALUE;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(MISSING_VALUE))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == MISSING_VALUE || raw.is_empty() {
            None
        } else {
            Some(raw)
        })
    }
}

// ============================================================================
// Secondary structure
// ============================================================================

/// Kind of an annotated range in a PDB coordinate file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StructureKind {
    Helix,
    Sheet,
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureKind::Helix => write!(f, "HELIX"),
            StructureKind::Sheet => write!(f, "SHEET"),
        }
    }
}

/// Inclusive residue span taken from a HELIX or SHEET record
///
/// `start <= end` is not checked; an inverted range simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureRange {
    pub kind: StructureKind,
    pub start: i64,
    pub end: i64,
}

impl StructureRange {
    pub fn new(kind: StructureKind, start: i64, end: i64) -> Self {
        Self { kind, start, end }
    }

    pub fn contains(&self, position: i64) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Per-residue secondary structure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SecondaryStructure {
    #[serde(rename = "HELIX")]
    Helix,
    #[serde(rename = "SHEET")]
    Sheet,
    #[default]
    #[serde(rename = "None")]
    Unassigned,
}

impl From<StructureKind> for SecondaryStructure {
    fn from(kind: StructureKind) -> Self {
        match kind {
            StructureKind::Helix => SecondaryStructure::Helix,
            StructureKind::Sheet => SecondaryStructure::Sheet,
        }
    }
}

impl fmt::Display for SecondaryStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecondaryStructure::Helix => write!(f, "HELIX"),
            SecondaryStructure::Sheet => write!(f, "SHEET"),
            SecondaryStructure::Unassigned => write!(f, "{}", MISSING_VALUE),
        }
    }
}

/// Shift row joined with its secondary structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRow {
    pub shift: ShiftRow,
    pub secondary_structure: SecondaryStructure,
}
