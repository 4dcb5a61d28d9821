//! Per-entry ingest pipeline
//!
//! For every discovered entry:
//! 1. Fetch the AVS report, extract shift rows, write `shift_data_<id>.csv`
//! 2. Fetch the summary page, extract candidate PDB codes
//! 3. If both are non-empty: pick a candidate, fetch its PDB file, label each
//!    residue and write `final_data_<id>.csv`
//!
//! A failure in one entry never stops the run; each entry ends with an
//! [`EntryOutcome`] that the caller can inspect.

use crate::avs::AvsParser;
use crate::client::BmrbClient;
use crate::crossref::{parse_pdb_candidates, RowPolicy};
use crate::discovery::discover;
use crate::selection::{CandidateSelector, SelectionStrategy};
use crate::structure::{assign_secondary_structure, parse_structure_ranges};
use bmrb_common::table::{
    enriched_table_path, shift_table_path, write_enriched_table, write_shift_table,
};
use bmrb_common::types::{PdbCode, RecordId, SecondaryStructure, ShiftRow};
use bmrb_common::{BmrbError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, instrument, warn};

/// Options for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory receiving the CSV tables (created if missing)
    pub output_dir: PathBuf,

    pub selection: SelectionStrategy,

    pub row_policy: RowPolicy,

    /// Draw a progress bar over entries
    pub show_progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            selection: SelectionStrategy::default(),
            row_policy: RowPolicy::default(),
            show_progress: false,
        }
    }
}

/// Step of the per-entry pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Shifts,
    CrossReference,
    Annotation,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Shifts => write!(f, "shifts"),
            Stage::CrossReference => write!(f, "cross_reference"),
            Stage::Annotation => write!(f, "annotation"),
        }
    }
}

/// Why an entry was not annotated although nothing failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoShiftRows,
    NoCandidates,
}

/// Result of processing one entry
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryOutcome {
    Annotated {
        candidate: PdbCode,
        rows: usize,
        helix: usize,
        sheet: usize,
        shift_table: PathBuf,
        enriched_table: PathBuf,
    },
    Skipped {
        reason: SkipReason,
        shift_table: Option<PathBuf>,
    },
    Failed {
        stage: Stage,
        kind: String,
        error: String,
    },
}

impl EntryOutcome {
    fn failed(stage: Stage, err: &BmrbError) -> Self {
        EntryOutcome::Failed {
            stage,
            kind: err.kind().to_string(),
            error: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    pub bmrb_id: RecordId,
    #[serde(flatten)]
    pub outcome: EntryOutcome,
}

/// Counts over a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub discovered: usize,
    pub annotated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub search_url: String,
    pub requested: usize,
    pub discovered: Vec<RecordId>,
    /// Set when the search page could not be fetched or parsed
    pub discovery_error: Option<String>,
    pub entries: Vec<EntryReport>,
}

impl PipelineReport {
    pub fn stats(&self) -> PipelineStats {
        let mut stats = PipelineStats {
            discovered: self.discovered.len(),
            ..PipelineStats::default()
        };
        for entry in &self.entries {
            match entry.outcome {
                EntryOutcome::Annotated { .. } => stats.annotated += 1,
                EntryOutcome::Skipped { .. } => stats.skipped += 1,
                EntryOutcome::Failed { .. } => stats.failed += 1,
            }
        }
        stats
    }
}

/// Sequential BMRB → PDB annotation pipeline
pub struct Pipeline {
    client: BmrbClient,
    options: PipelineOptions,
    selector: Box<dyn CandidateSelector>,
}

impl Pipeline {
    pub fn new(client: BmrbClient, options: PipelineOptions) -> Self {
        let selector = options.selection.selector();
        Self {
            client,
            options,
            selector,
        }
    }

    /// Replace the built-in selection strategy with a caller-supplied one
    pub fn with_selector(mut self, selector: Box<dyn CandidateSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Discover up to `count` entries from `search_url` and process each
    ///
    /// Only an unusable output directory is an error here. A failed discovery
    /// is recorded in [`PipelineReport::discovery_error`].
    pub async fn run(&mut self, search_url: &str, count: usize) -> Result<PipelineReport> {
        std::fs::create_dir_all(&self.options.output_dir)?;

        let mut report = PipelineReport {
            search_url: search_url.to_string(),
            requested: count,
            discovered: Vec::new(),
            discovery_error: None,
            entries: Vec::new(),
        };

        match discover(&self.client, search_url, count).await {
            Ok(ids) => report.discovered = ids,
            Err(e) => {
                error!(url = %search_url, error = %e, kind = e.kind(), "Entry discovery failed");
                report.discovery_error = Some(e.to_string());
                return Ok(report);
            },
        }

        if report.discovered.is_empty() {
            warn!(url = %search_url, "Search returned no BMRB entries");
        }

        let progress = self.progress_bar(report.discovered.len());

        for id in report.discovered.clone() {
            progress.set_message(format!("BMRB {}", id));
            let outcome = self.process_entry(&id).await;
            report.entries.push(EntryReport {
                bmrb_id: id,
                outcome,
            });
            progress.inc(1);
        }

        progress.finish_and_clear();

        let stats = report.stats();
        info!(
            discovered = stats.discovered,
            annotated = stats.annotated,
            skipped = stats.skipped,
            failed = stats.failed,
            "Pipeline completed"
        );

        Ok(report)
    }

    /// Run shifts, cross-reference and (when possible) annotation for one entry
    #[instrument(skip(self, id), fields(bmrb_id = %id))]
    pub async fn process_entry(&mut self, id: &RecordId) -> EntryOutcome {
        let shifts = self.extract_shifts(id).await;
        let candidates = self.extract_candidates(id).await;

        let (rows, shift_table) = match shifts {
            Ok(found) => found,
            Err(e) => {
                warn!(stage = %Stage::Shifts, kind = e.kind(), error = %e, "Shift extraction failed");
                return EntryOutcome::failed(Stage::Shifts, &e);
            },
        };

        let candidates = match candidates {
            Ok(found) => found,
            Err(e) => {
                warn!(stage = %Stage::CrossReference, kind = e.kind(), error = %e, "PDB cross-reference failed");
                return EntryOutcome::failed(Stage::CrossReference, &e);
            },
        };

        if rows.is_empty() {
            info!("No shift rows, skipping annotation");
            return EntryOutcome::Skipped {
                reason: SkipReason::NoShiftRows,
                shift_table: Some(shift_table),
            };
        }

        if candidates.is_empty() {
            info!("No PDB candidates, skipping annotation");
            return EntryOutcome::Skipped {
                reason: SkipReason::NoCandidates,
                shift_table: Some(shift_table),
            };
        }

        match self.annotate(id, &rows, &candidates).await {
            Ok((candidate, enriched_table, helix, sheet)) => EntryOutcome::Annotated {
                candidate,
                rows: rows.len(),
                helix,
                sheet,
                shift_table,
                enriched_table,
            },
            Err(e) => {
                warn!(stage = %Stage::Annotation, kind = e.kind(), error = %e, "Structure annotation failed");
                EntryOutcome::failed(Stage::Annotation, &e)
            },
        }
    }

    async fn extract_shifts(&self, id: &RecordId) -> Result<(Vec<ShiftRow>, PathBuf)> {
        let report = self.client.fetch_avs_report(id).await?;
        let rows = AvsParser::parse(&report)?;

        let path = shift_table_path(&self.options.output_dir, id);
        write_shift_table(&path, &rows)?;
        info!(rows = rows.len(), path = %path.display(), "Shift table written");

        Ok((rows, path))
    }

    async fn extract_candidates(&self, id: &RecordId) -> Result<Vec<PdbCode>> {
        let html = self.client.fetch_summary_page(id).await?;
        let candidates = parse_pdb_candidates(&html, self.options.row_policy)?;
        info!(
            count = candidates.len(),
            candidates = ?candidates.iter().map(PdbCode::as_str).collect::<Vec<_>>(),
            "PDB candidates"
        );
        Ok(candidates)
    }

    async fn annotate(
        &mut self,
        id: &RecordId,
        rows: &[ShiftRow],
        candidates: &[PdbCode],
    ) -> Result<(PdbCode, PathBuf, usize, usize)> {
        let candidate = self
            .selector
            .select(candidates)
            .cloned()
            .ok_or_else(|| BmrbError::data_absent(format!("No PDB candidate selected for {}", id)))?;
        info!(pdb_id = %candidate, "Selected PDB structure");

        let pdb_text = self.client.fetch_pdb_entry(&candidate).await?;
        let ranges = parse_structure_ranges(&pdb_text)?;
        let enriched = assign_secondary_structure(rows, &ranges)?;

        let count = |label: SecondaryStructure| {
            enriched
                .iter()
                .filter(|row| row.secondary_structure == label)
                .count()
        };
        let (helix, sheet) = (count(SecondaryStructure::Helix), count(SecondaryStructure::Sheet));

        let path = enriched_table_path(&self.options.output_dir, id);
        write_enriched_table(&path, &enriched)?;
        info!(
            pdb_id = %candidate,
            ranges = ranges.len(),
            helix,
            sheet,
            path = %path.display(),
            "Enriched table written"
        );

        Ok((candidate, path, helix, sheet))
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar
    }
}
