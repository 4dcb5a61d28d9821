//! BMRB Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, tabular output, and error handling for the BMRB shift ingest
//! workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`BmrbError`] and the [`Result`] alias
//! - **Types**: record identifiers, shift rows, structure ranges and enriched rows
//! - **Tables**: CSV readers and writers for the shift and enriched tables
//! - **Logging**: tracing subscriber setup shared by every binary
//!
//! # Example
//!
//! ```no_run
//! use bmrb_common::table;
//! use bmrb_common::types::ShiftRow;
//!
//! fn save(rows: &[ShiftRow]) -> bmrb_common::Result<()> {
//!     table::write_shift_table("shift_data_4020.csv", rows)?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use error::{BmrbError, Result};
