use difftest_core::analysis::{analyze, AnalysisOptions};
use difftest_core::model::SourceCorpus;
use difftest_core::version;

#[test]
fn version_is_non_empty() {
    let v = version();
    assert!(!v.is_empty());
}

/// The smallest useful corpus: one caller, one callee.
#[test]
fn single_call_yields_one_leaf_function() {
    let corpus = SourceCorpus::from_text("Main:\n  jsr F\n  rts\nF:\n  lda #$01\n  rts\n");
    let analysis = analyze(&corpus, &AnalysisOptions::default()).expect("analysis succeeds");

    assert_eq!(analysis.classified.leaf_names(), vec!["F".to_string()]);
    assert!(analysis.classified.non_leaf.is_empty());
    let f = analysis.inventory.get("F").expect("F resolved");
    assert_eq!(f.instruction_count, 1);
    assert!(f.well_formed());
}

#[test]
fn corpus_lines_are_numbered_from_zero() {
    let corpus = SourceCorpus::from_text("a\r\nb\nc");
    let numbers: Vec<usize> = corpus.lines().iter().map(|l| l.number).collect();
    assert_eq!(numbers, vec![0, 1, 2]);
    assert_eq!(corpus.lines()[0].text, "a");
    assert!(!corpus.is_blank());
    assert!(SourceCorpus::from_text("  \n\t\n").is_blank());
}
