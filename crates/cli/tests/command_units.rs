use std::fs;

use asm_difftest::commands::{
    abbreviate_calls, format_scan_report, generate_command, list_formats_command, require_file,
    resolve_config, run_command, scan_command, show_inventory_command, RunMetadata,
};
use asm_difftest::{canonicalize_or_current, sha256_bytes, sha256_file};
use difftest_core::analysis::{analyze, AnalysisOptions};
use difftest_core::model::SourceCorpus;
use tempfile::tempdir;

const SAMPLE: &str = include_str!("fixtures/sample.asm");

fn path_str(path: &std::path::Path) -> String {
    path.to_str().expect("utf-8 path").to_string()
}

#[test]
fn abbreviates_long_call_lists() {
    let calls: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
    assert_eq!(abbreviate_calls(&calls), "A, B, C ... +1 more");
    assert_eq!(abbreviate_calls(&calls[..2]), "A, B");
    assert_eq!(abbreviate_calls(&[]), "");
}

#[test]
fn sha256_bytes_matches_known_vector() {
    assert_eq!(
        sha256_bytes(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn sha256_file_matches_in_memory_hash() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("game.asm");
    fs::write(&path, SAMPLE).expect("write");
    assert_eq!(sha256_file(&path).expect("hash"), sha256_bytes(SAMPLE.as_bytes()));
    assert!(sha256_file(&dir.path().join("missing")).is_err());
}

#[test]
fn resolve_config_applies_overrides() {
    let dir = tempdir().expect("tempdir");
    let config_path = dir.path().join("difftest.yaml");
    fs::write(&config_path, "trial_count: 3\nformat: json\n").expect("write config");

    let config = resolve_config(Some(&path_str(&config_path)), None, None).expect("config");
    assert_eq!(config.trial_count, 3);
    assert_eq!(config.format, "json");

    let config =
        resolve_config(Some(&path_str(&config_path)), Some(7), Some("kotlin")).expect("config");
    assert_eq!(config.trial_count, 7);
    assert_eq!(config.format, "kotlin");

    let err = resolve_config(None, Some(0), None).unwrap_err();
    assert!(err.to_string().contains("--trials must be at least 1"));
}

#[test]
fn require_file_names_the_missing_input() {
    let dir = tempdir().expect("tempdir");
    let err = require_file(&dir.path().join("gone.asm"), "Assembly corpus").unwrap_err();
    assert!(err.to_string().starts_with("Assembly corpus does not exist"));
    assert!(require_file(dir.path(), "Assembly corpus").is_err());
}

#[test]
fn canonicalize_or_current_joins_missing_paths_to_cwd() {
    let cwd = std::env::current_dir().expect("cwd");
    let resolved = canonicalize_or_current("definitely-not-here.txt").expect("resolve");
    assert_eq!(resolved, cwd.join("definitely-not-here.txt"));
}

#[test]
fn scan_report_lists_counts_and_tables() {
    let corpus = SourceCorpus::from_text(SAMPLE);
    let analysis = analyze(&corpus, &AnalysisOptions::default()).expect("analysis");
    let report = format_scan_report(&analysis, "Sample");

    assert!(report.starts_with("Total labels: 9\nUnique call targets: 9\n"));
    assert!(report.contains("Sample Function Analysis"));
    assert!(report.contains("Excluded candidates: 2\n"));
    assert!(report.contains("Denylisted: 1\n"));
    assert!(report.contains("Testable functions: 5\n"));
    assert!(report.contains("  InitBuffer"));
    assert!(report.contains("-> JumpEngine\n"));
    assert!(!report.contains("Label redefinitions"));
}

/// Command functions chained directly: scan -> generate -> show-inventory.
#[test]
fn commands_chain_through_the_listing() {
    let dir = tempdir().expect("tempdir");
    let corpus = dir.path().join("game.asm");
    let listing = dir.path().join("functions.txt");
    let suite = dir.path().join("suite.kt");
    fs::write(&corpus, SAMPLE).expect("write corpus");

    scan_command(&path_str(&corpus), None, &path_str(&listing), false).expect("scan");
    assert!(listing.exists());

    generate_command(&path_str(&listing), None, Some(4), Some("kotlin"), Some(&path_str(&suite)))
        .expect("generate");
    let source = fs::read_to_string(&suite).expect("suite");
    assert!(source.contains("numTests = 4"));
    assert!(source.contains("class FunctionsDifferentialTest {"));

    show_inventory_command(&path_str(&listing), true).expect("show inventory");
    list_formats_command(false).expect("list formats");
}

#[test]
fn run_command_writes_metadata() {
    let dir = tempdir().expect("tempdir");
    let corpus = dir.path().join("game.asm");
    let out = dir.path().join("artifacts");
    fs::write(&corpus, SAMPLE).expect("write corpus");

    run_command(&path_str(&corpus), None, Some(2), Some("json"), &path_str(&out), false)
        .expect("run");

    let metadata: RunMetadata = serde_json::from_str(
        &fs::read_to_string(out.join("run_metadata.json")).expect("metadata"),
    )
    .expect("metadata json");
    assert_eq!(metadata.trial_count, 2);
    assert_eq!(metadata.format, "json");
    assert_eq!(metadata.corpus_hash, sha256_bytes(SAMPLE.as_bytes()));
    assert_eq!(
        metadata.listing_hash,
        sha256_bytes(fs::read_to_string(out.join("functions.txt")).expect("listing").as_bytes())
    );
    assert!(out.join("FunctionsDifferentialTest.json").exists());

    let err = run_command(&path_str(&corpus), None, None, None, &path_str(&out), false)
        .unwrap_err();
    assert!(err.to_string().contains("Output already exists"));
}

/// --force replaces only generated artifacts; the corpus and other files in the root survive.
#[test]
fn run_force_keeps_unrelated_files_in_out_dir() {
    let dir = tempdir().expect("tempdir");
    let corpus = dir.path().join("game.asm");
    let notes = dir.path().join("my_notes.txt");
    fs::write(&corpus, SAMPLE).expect("write corpus");
    fs::write(&notes, "keep me").expect("write notes");
    let out = path_str(dir.path());

    let err = run_command(&path_str(&corpus), None, None, None, &out, false).unwrap_err();
    assert!(err.to_string().contains("--force"));

    run_command(&path_str(&corpus), None, None, None, &out, true).expect("first forced run");
    run_command(&path_str(&corpus), None, None, None, &out, true).expect("second forced run");

    assert_eq!(fs::read_to_string(&corpus).expect("corpus"), SAMPLE);
    assert_eq!(fs::read_to_string(&notes).expect("notes"), "keep me");
    assert!(dir.path().join("functions.txt").exists());
    assert!(dir.path().join("suite.json").exists());
    assert!(dir.path().join("run_metadata.json").exists());
    assert!(dir.path().join("FunctionsDifferentialTest.rs").exists());
}

#[test]
fn run_force_refuses_to_overwrite_corpus_named_like_an_artifact() {
    let dir = tempdir().expect("tempdir");
    let corpus = dir.path().join("functions.txt");
    fs::write(&corpus, SAMPLE).expect("write corpus");

    let err = run_command(&path_str(&corpus), None, None, None, &path_str(dir.path()), true)
        .unwrap_err();
    assert!(err.to_string().contains("Refusing to overwrite the corpus"));
    assert_eq!(fs::read_to_string(&corpus).expect("corpus"), SAMPLE);
}
