use difftest_core::analysis::{scan, AsmSyntax, LineMatcher, RedefinitionPolicy};
use difftest_core::model::SourceCorpus;

const DUPLICATE_LABELS: &str = "\
Main:
  jsr Dup
  rts
Dup:
  rts
Dup:
  lda #$00
  jsr Main
  rts
";

fn matcher() -> LineMatcher {
    LineMatcher::new(&AsmSyntax::default()).expect("default syntax compiles")
}

#[test]
fn records_labels_at_line_start_and_call_targets_anywhere() {
    let corpus = SourceCorpus::from_text(
        "Reset:\n  jsr InitPPU\n  jmp Reset\nInitPPU:\n  lda #$00\n  rts\n  jsr Orphan\n",
    );
    let result = scan(&corpus, &matcher(), RedefinitionPolicy::FirstWins);

    assert_eq!(result.labels.len(), 2);
    assert_eq!(result.labels.get("Reset"), Some(&0));
    assert_eq!(result.labels.get("InitPPU"), Some(&3));
    let targets: Vec<&str> = result.call_targets.iter().map(String::as_str).collect();
    assert_eq!(targets, vec!["InitPPU", "Orphan"]);
}

#[test]
fn indented_labels_are_not_definitions() {
    let corpus = SourceCorpus::from_text("  Inner:\n  rts\nOuter:\n  rts\n");
    let result = scan(&corpus, &matcher(), RedefinitionPolicy::FirstWins);
    assert!(result.labels.contains_key("Outer"));
    assert!(!result.labels.contains_key("Inner"));
}

#[test]
fn calls_inside_comments_are_ignored() {
    let corpus = SourceCorpus::from_text("Main:\n  lda #$00 ; jsr Ghost\n; jsr Phantom\n  rts\n");
    let result = scan(&corpus, &matcher(), RedefinitionPolicy::FirstWins);
    assert!(result.call_targets.is_empty(), "unexpected targets: {:?}", result.call_targets);
}

#[test]
fn call_mnemonic_matching_is_case_insensitive() {
    let corpus = SourceCorpus::from_text("Main:\n  JSR Upper\n  jsr lower\n  rts\n");
    let result = scan(&corpus, &matcher(), RedefinitionPolicy::FirstWins);
    assert!(result.call_targets.contains("Upper"));
    assert!(result.call_targets.contains("lower"));
}

#[test]
fn empty_inputs_yield_empty_sets() {
    let corpus = SourceCorpus::from_text("; nothing but comments\n\n  .db $00\n");
    let result = scan(&corpus, &matcher(), RedefinitionPolicy::FirstWins);
    assert!(result.labels.is_empty());
    assert!(result.call_targets.is_empty());
    assert!(result.candidates().is_empty());
}

#[test]
fn first_definition_wins_by_default_and_redefinition_is_reported() {
    let corpus = SourceCorpus::from_text(DUPLICATE_LABELS);
    let result = scan(&corpus, &matcher(), RedefinitionPolicy::default());

    assert_eq!(result.labels.get("Dup"), Some(&3));
    assert_eq!(result.redefinitions.len(), 1);
    assert_eq!(result.redefinitions[0].name, "Dup");
    assert_eq!(result.redefinitions[0].first_position, 3);
    assert_eq!(result.redefinitions[0].position, 5);
}

#[test]
fn last_wins_policy_keeps_latest_position() {
    let corpus = SourceCorpus::from_text(DUPLICATE_LABELS);
    let result = scan(&corpus, &matcher(), RedefinitionPolicy::LastWins);
    assert_eq!(result.labels.get("Dup"), Some(&5));
    assert_eq!(result.redefinitions.len(), 1);
}

#[test]
fn exclude_policy_drops_the_name_from_candidates() {
    let corpus = SourceCorpus::from_text(DUPLICATE_LABELS);
    let result = scan(&corpus, &matcher(), RedefinitionPolicy::Exclude);

    assert!(!result.labels.contains_key("Dup"));
    let candidates: Vec<String> = result.candidates().into_iter().map(|l| l.name).collect();
    assert_eq!(candidates, vec!["Main".to_string()]);
    let excluded = result.excluded_candidates();
    assert_eq!(excluded.len(), 1);
    assert_eq!(excluded[0].name, "Dup");
    assert_eq!(excluded[0].position, 3);
}

#[test]
fn custom_call_mnemonics_are_honored() {
    let syntax = AsmSyntax {
        call_mnemonics: vec!["call".into()],
        return_mnemonics: vec!["ret".into()],
        comment_prefix: ";".into(),
    };
    let matcher = LineMatcher::new(&syntax).expect("syntax compiles");
    let corpus = SourceCorpus::from_text("main:\n  call draw\n  jsr NotACall\n  ret\n");
    let result = scan(&corpus, &matcher, RedefinitionPolicy::FirstWins);
    let targets: Vec<&str> = result.call_targets.iter().map(String::as_str).collect();
    assert_eq!(targets, vec!["draw"]);
}

#[test]
fn empty_mnemonic_lists_are_rejected() {
    let syntax = AsmSyntax { call_mnemonics: vec![], ..AsmSyntax::default() };
    assert!(LineMatcher::new(&syntax).is_err());
    let syntax = AsmSyntax { return_mnemonics: vec![], ..AsmSyntax::default() };
    assert!(LineMatcher::new(&syntax).is_err());
}
