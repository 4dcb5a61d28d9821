//! BMRB Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Collects average carbon chemical shifts from BMRB entries and labels each
//! residue with the secondary structure of a related PDB entry.
//!
//! # Data Sources
//!
//! - **BMRB search grid**: entry discovery
//! - **BMRB AVS reports**: per-residue average C / CA / CB shifts
//! - **BMRB summary pages**: related PDB codes
//! - **PDBe entry files**: HELIX / SHEET records
//!
//! # Example
//!
//! ```no_run
//! use bmrb_ingest::config::{BmrbHttpConfig, DEFAULT_SEARCH_URL};
//! use bmrb_ingest::client::BmrbClient;
//! use bmrb_ingest::pipeline::{Pipeline, PipelineOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = BmrbClient::new(BmrbHttpConfig::default())?;
//!     let mut pipeline = Pipeline::new(client, PipelineOptions::default());
//!     let report = pipeline.run(DEFAULT_SEARCH_URL, 10).await?;
//!     println!("{:?}", report.stats());
//!     Ok(())
//! }
//! ```

pub mod avs;
pub mod client;
pub mod config;
pub mod crossref;
pub mod discovery;
pub mod pipeline;
pub mod selection;
pub mod structure;

pub use client::BmrbClient;
pub use config::BmrbHttpConfig;
pub use pipeline::{EntryOutcome, Pipeline, PipelineOptions, PipelineReport, PipelineStats};
