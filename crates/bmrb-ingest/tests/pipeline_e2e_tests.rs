//! End-to-end tests for the ingest pipeline
//!
//! A wiremock server stands in for both BMRB and PDBe. Covered:
//! - Annotated, skipped and failed entries in one run
//! - Output file naming and contents
//! - Discovery failure
//! - Cross-reference failure and entries without shift rows
//! - Reproducible output with the default selection strategy

use bmrb_common::table::{read_enriched_table, read_shift_table};
use bmrb_common::types::{PdbCode, SecondaryStructure};
use bmrb_ingest::crossref::RowPolicy;
use bmrb_ingest::pipeline::{EntryOutcome, SkipReason, Stage};
use bmrb_ingest::selection::{CandidateSelector, SelectionStrategy};
use bmrb_ingest::{BmrbClient, BmrbHttpConfig, Pipeline, PipelineOptions, PipelineStats};
use std::path::Path;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const SEARCH_PAGE: &str = r#"<html><body><table>
<tr><td><a href="/data_library/summary/index.php?bmrbId=6000">6000</a></td></tr>
<tr><td><a href="/data_library/summary/index.php?bmrbId=15">15</a></td></tr>
<tr><td><a href="/data_library/summary/index.php?bmrbId=4020">4020</a></td></tr>
<tr><td><a href="/data_library/summary/index.php?bmrbId=5000">5000</a></td></tr>
<tr><td><a href="/data_library/summary/index.php?bmrbId=15">15 again</a></td></tr>
<tr><td><a href="/data_library/summary/index.php?bmrbId=90000">beyond the limit</a></td></tr>
</table></body></html>"#;

const AVS_REPORT: &str = "\
Assigned chemical shift validation report
   5 SER   Overall: 0.99
        Ave C Shift Values>>\tC::174.6\tCA::58.3\tCB::63.8
  15 GLY   Overall: 0.97
        Ave C Shift Values>>\tC::173.9\tCA::45.3
  27 ALA   Overall: 0.92
        Ave C Shift Values>>\tC::177.2\tCA::52.6\tCB::19.1
";

const SUMMARY_WITH_PDB: &str = r#"<html><body><table>
<tr><td>Entry title</td><td>Test protein</td></tr>
<tr><td>PDB</td><td><a href="/s">2XYZ</a> <a href="/s">1ABC</a> <a href="/s">RCSB</a></td></tr>
</table></body></html>"#;

const SUMMARY_WITHOUT_PDB: &str = r#"<html><body><table>
<tr><td>Entry title</td><td>Unrelated</td></tr>
</table></body></html>"#;

const PDB_1ABC: &str = "\
HEADER    TEST PROTEIN
HELIX    1   1 GLY A   10  LEU A   20  1                                  11
SHEET    1   A 2 ALA A  25  VAL A  30  0
ATOM      1  N   MET A   1      11.104  13.207   2.100  1.00  0.00           N
END
";

const PDB_2XYZ: &str = "\
HEADER    TEST PROTEIN
SHEET    1   A 2 GLY A   1  ALA A  40  0
END
";

const PDB_MALFORMED: &str = "\
HELIX    1   1 GLY A   ab  LEU A   20  1
";

async fn mount_text(server: &MockServer, url_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_summary(server: &MockServer, id: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/data_library/summary/index.php"))
        .and(query_param("bmrbId", id))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn avs_path(id: &str) -> String {
    format!("/ftp/pub/bmrb/entry_directories/bmr{}/validation/AVS_full.txt", id)
}

/// Mock server with four entries:
/// - 15: annotated from 1ABC
/// - 4020: shifts but no PDB candidates
/// - 5000: AVS report missing (404)
/// - 6000: candidate PDB file is malformed
async fn start_bmrb_mock() -> MockServer {
    let server = MockServer::start().await;

    mount_text(&server, "/search/query_grid/", SEARCH_PAGE).await;

    mount_text(&server, &avs_path("15"), AVS_REPORT).await;
    mount_summary(&server, "15", SUMMARY_WITH_PDB).await;
    mount_text(&server, "/pdbe/entry-files/pdb1abc.ent", PDB_1ABC).await;
    mount_text(&server, "/pdbe/entry-files/pdb2xyz.ent", PDB_2XYZ).await;

    mount_text(&server, &avs_path("4020"), AVS_REPORT).await;
    mount_summary(&server, "4020", SUMMARY_WITHOUT_PDB).await;

    mount_summary(&server, "5000", SUMMARY_WITH_PDB).await;

    mount_text(&server, &avs_path("6000"), AVS_REPORT).await;
    mount_summary(
        &server,
        "6000",
        "<table><tr><td>PDB</td><td>9BAD</td></tr></table>",
    )
    .await;
    mount_text(&server, "/pdbe/entry-files/pdb9bad.ent", PDB_MALFORMED).await;

    server
}

fn pipeline_for(server: &MockServer, output_dir: &Path, selection: SelectionStrategy) -> Pipeline {
    let config = BmrbHttpConfig::builder()
        .bmrb_base_url(server.uri())
        .pdbe_base_url(server.uri())
        .timeout_secs(5)
        .build();
    let client = BmrbClient::new(config).expect("client");

    Pipeline::new(
        client,
        PipelineOptions {
            output_dir: output_dir.to_path_buf(),
            selection,
            row_policy: RowPolicy::AllRows,
            show_progress: false,
        },
    )
}

fn search_url(server: &MockServer) -> String {
    format!("{}/search/query_grid/", server.uri())
}

#[tokio::test]
async fn test_run_classifies_each_entry() {
    let server = start_bmrb_mock().await;
    let out = TempDir::new().unwrap();
    let mut pipeline = pipeline_for(&server, out.path(), SelectionStrategy::First);

    let report = pipeline.run(&search_url(&server), 4).await.unwrap();

    let ids: Vec<&str> = report.discovered.iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["15", "4020", "5000", "6000"]);
    assert!(report.discovery_error.is_none());
    assert_eq!(
        report.stats(),
        PipelineStats {
            discovered: 4,
            annotated: 1,
            skipped: 1,
            failed: 2,
        }
    );

    match &report.entries[0].outcome {
        EntryOutcome::Annotated {
            candidate,
            rows,
            helix,
            sheet,
            ..
        } => {
            assert_eq!(candidate, &PdbCode::new("1ABC").unwrap());
            assert_eq!((*rows, *helix, *sheet), (3, 1, 1));
        },
        other => panic!("15 should be annotated, got {:?}", other),
    }

    assert!(matches!(
        report.entries[1].outcome,
        EntryOutcome::Skipped {
            reason: SkipReason::NoCandidates,
            ..
        }
    ));
    assert!(matches!(
        report.entries[2].outcome,
        EntryOutcome::Failed {
            stage: Stage::Shifts,
            ..
        }
    ));
    match &report.entries[3].outcome {
        EntryOutcome::Failed { stage, kind, .. } => {
            assert_eq!(*stage, Stage::Annotation);
            assert_eq!(kind, "parse");
        },
        other => panic!("6000 should fail annotation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_output_files() {
    let server = start_bmrb_mock().await;
    let out = TempDir::new().unwrap();
    let mut pipeline = pipeline_for(&server, out.path(), SelectionStrategy::First);

    pipeline.run(&search_url(&server), 4).await.unwrap();

    let shift_csv = std::fs::read_to_string(out.path().join("shift_data_15.csv")).unwrap();
    assert_eq!(
        shift_csv,
        "Residue,C,CA,CB\n\
         5 SER,174.6,58.3,63.8\n\
         15 GLY,173.9,45.3,None\n\
         27 ALA,177.2,52.6,19.1\n"
    );

    let final_csv = std::fs::read_to_string(out.path().join("final_data_15.csv")).unwrap();
    assert_eq!(
        final_csv,
        "Residue,C,CA,CB,Secondary_Structure\n\
         5 SER,174.6,58.3,63.8,None\n\
         15 GLY,173.9,45.3,None,HELIX\n\
         27 ALA,177.2,52.6,19.1,SHEET\n"
    );

    // Skipped: shift table only
    assert!(out.path().join("shift_data_4020.csv").exists());
    assert!(!out.path().join("final_data_4020.csv").exists());

    // Shift fetch failed: nothing written
    assert!(!out.path().join("shift_data_5000.csv").exists());
    assert!(!out.path().join("final_data_5000.csv").exists());

    // Annotation failed: no partial enriched table
    assert!(out.path().join("shift_data_6000.csv").exists());
    assert!(!out.path().join("final_data_6000.csv").exists());
}

#[tokio::test]
async fn test_discovery_failure_is_reported_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/query_grid/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let mut pipeline = pipeline_for(&server, out.path(), SelectionStrategy::First);
    let report = pipeline.run(&search_url(&server), 10).await.unwrap();

    assert!(report.discovered.is_empty());
    assert!(report.entries.is_empty());
    assert!(report.discovery_error.unwrap().contains("500"));
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_zero_count_processes_nothing() {
    let server = start_bmrb_mock().await;
    let out = TempDir::new().unwrap();
    let mut pipeline = pipeline_for(&server, out.path(), SelectionStrategy::First);

    let report = pipeline.run(&search_url(&server), 0).await.unwrap();
    assert_eq!(report.stats(), PipelineStats::default());
    assert!(report.discovery_error.is_none());
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let server = start_bmrb_mock().await;
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    pipeline_for(&server, first.path(), SelectionStrategy::First)
        .run(&search_url(&server), 2)
        .await
        .unwrap();
    pipeline_for(&server, second.path(), SelectionStrategy::First)
        .run(&search_url(&server), 2)
        .await
        .unwrap();

    for name in ["shift_data_15.csv", "final_data_15.csv", "shift_data_4020.csv"] {
        let a = std::fs::read(first.path().join(name)).unwrap();
        let b = std::fs::read(second.path().join(name)).unwrap();
        assert_eq!(a, b, "{} differs between runs", name);
    }

    let rows = read_shift_table(first.path().join("shift_data_15.csv")).unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn test_seeded_random_selection_uses_a_listed_candidate() {
    let server = start_bmrb_mock().await;
    let out = TempDir::new().unwrap();
    let mut pipeline = pipeline_for(
        &server,
        out.path(),
        SelectionStrategy::Random { seed: Some(7) },
    );

    let report = pipeline.run(&search_url(&server), 1).await.unwrap();
    match &report.entries[0].outcome {
        EntryOutcome::Annotated { candidate, .. } => {
            assert!(["1ABC", "2XYZ"].contains(&candidate.as_str()));
        },
        other => panic!("expected annotation, got {:?}", other),
    }
}

struct LastCandidate;

impl CandidateSelector for LastCandidate {
    fn select<'a>(&mut self, candidates: &'a [PdbCode]) -> Option<&'a PdbCode> {
        candidates.last()
    }
}

#[tokio::test]
async fn test_caller_supplied_selector() {
    let server = start_bmrb_mock().await;
    let out = TempDir::new().unwrap();
    let mut pipeline = pipeline_for(&server, out.path(), SelectionStrategy::First)
        .with_selector(Box::new(LastCandidate));

    pipeline.run(&search_url(&server), 1).await.unwrap();

    // 2XYZ has a single sheet spanning residues 1-40
    let rows = read_enriched_table(out.path().join("final_data_15.csv")).unwrap();
    assert!(rows
        .iter()
        .all(|row| row.secondary_structure == SecondaryStructure::Sheet));
}

const AVS_WITHOUT_RESIDUES: &str = "\
Assigned chemical shift validation report
No assigned carbon shifts
        Ave C Shift Values>>\tC::174.6\tCA::58.3
";

/// Mock server with two entries that never reach annotation:
/// - 7000: no shift rows, summary page unavailable (500)
/// - 8000: no shift rows, summary page lists a candidate
async fn start_unannotated_mock() -> MockServer {
    let server = MockServer::start().await;

    mount_text(
        &server,
        "/search/query_grid/",
        r#"<a href="/data_library/summary/index.php?bmrbId=8000">8000</a>
<a href="/data_library/summary/index.php?bmrbId=7000">7000</a>"#,
    )
    .await;

    mount_text(&server, &avs_path("7000"), AVS_WITHOUT_RESIDUES).await;
    Mock::given(method("GET"))
        .and(path("/data_library/summary/index.php"))
        .and(query_param("bmrbId", "7000"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    mount_text(&server, &avs_path("8000"), AVS_WITHOUT_RESIDUES).await;
    mount_summary(&server, "8000", SUMMARY_WITH_PDB).await;
    mount_text(&server, "/pdbe/entry-files/pdb1abc.ent", PDB_1ABC).await;

    server
}

#[tokio::test]
async fn test_entries_without_annotation_keep_header_only_tables() {
    let server = start_unannotated_mock().await;
    let out = TempDir::new().unwrap();
    let mut pipeline = pipeline_for(&server, out.path(), SelectionStrategy::First);

    let report = pipeline.run(&search_url(&server), 10).await.unwrap();

    let ids: Vec<&str> = report.discovered.iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["7000", "8000"]);
    assert_eq!(
        report.stats(),
        PipelineStats {
            discovered: 2,
            annotated: 0,
            skipped: 1,
            failed: 1,
        }
    );

    match &report.entries[0].outcome {
        EntryOutcome::Failed { stage, kind, error } => {
            assert_eq!(*stage, Stage::CrossReference);
            assert_eq!(kind, "network");
            assert!(error.contains("500"));
        },
        other => panic!("7000 should fail cross-referencing, got {:?}", other),
    }

    assert!(matches!(
        report.entries[1].outcome,
        EntryOutcome::Skipped {
            reason: SkipReason::NoShiftRows,
            shift_table: Some(_),
        }
    ));

    for id in ["7000", "8000"] {
        let shift_csv =
            std::fs::read_to_string(out.path().join(format!("shift_data_{}.csv", id))).unwrap();
        assert_eq!(shift_csv, "Residue,C,CA,CB\n");
        assert!(!out.path().join(format!("final_data_{}.csv", id)).exists());
    }
}
