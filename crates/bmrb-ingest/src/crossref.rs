//! PDB cross-references from a BMRB entry summary page

use bmrb_common::types::PdbCode;
use bmrb_common::{BmrbError, Result};
use clap::ValueEnum;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Rows whose text contains this token are scanned for codes
pub const PDB_ROW_MARKER: &str = "PDB";

/// Link label on the summary page that looks like a code but is not one
pub const PLACEHOLDER_CODE: &str = "RCSB";

/// Which matching table rows contribute codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RowPolicy {
    /// Union of codes from every row mentioning PDB
    #[default]
    AllRows,
    /// Only the last row mentioning PDB
    LastRow,
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract candidate PDB codes from summary-page HTML
///
/// The last `<td>` of each row mentioning PDB is searched for standalone
/// four-character uppercase/digit tokens. The result is sorted, free of
/// duplicates and never contains [`PLACEHOLDER_CODE`].
pub fn parse_pdb_candidates(html: &str, policy: RowPolicy) -> Result<Vec<PdbCode>> {
    let document = Html::parse_document(html);
    let row_selector =
        Selector::parse("tr").map_err(|e| BmrbError::parse(format!("Invalid row selector: {:?}", e)))?;
    let cell_selector =
        Selector::parse("td").map_err(|e| BmrbError::parse(format!("Invalid cell selector: {:?}", e)))?;
    let code_pattern = Regex::new(r"\b[A-Z0-9]{4}\b")?;

    let mut found: Vec<String> = Vec::new();

    for row in document.select(&row_selector) {
        let row_text: String = row.text().collect();
        if !row_text.contains(PDB_ROW_MARKER) {
            continue;
        }

        let Some(cell) = row.select(&cell_selector).last() else {
            debug!("Row mentions PDB but has no data cells, skipping");
            continue;
        };

        let text = cell_text(cell);
        let codes = code_pattern.find_iter(&text).map(|m| m.as_str().to_string());

        match policy {
            RowPolicy::AllRows => found.extend(codes),
            RowPolicy::LastRow => found = codes.collect(),
        }
    }

    found
        .into_iter()
        .filter(|code| code != PLACEHOLDER_CODE)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(PdbCode::new)
        .collect()
}
