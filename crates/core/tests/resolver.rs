use difftest_core::analysis::resolver::resolve_candidate;
use difftest_core::analysis::{
    resolve, scan, AsmSyntax, ExclusionReason, LineMatcher, RedefinitionPolicy,
};
use difftest_core::model::{CallEdge, Label, SourceCorpus};

const SAMPLE: &str = include_str!("fixtures/sample.asm");

fn matcher() -> LineMatcher {
    LineMatcher::new(&AsmSyntax::default()).expect("default syntax compiles")
}

fn resolve_text(text: &str) -> difftest_core::analysis::Resolution {
    let corpus = SourceCorpus::from_text(text);
    let matcher = matcher();
    let scanned = scan(&corpus, &matcher, RedefinitionPolicy::FirstWins);
    resolve(&corpus, &scanned, &matcher)
}

#[test]
fn sample_corpus_resolves_expected_functions() {
    let resolution = resolve_text(SAMPLE);

    assert_eq!(resolution.candidate_count, 8);
    assert_eq!(
        resolution.inventory.names(),
        vec!["Dispatcher", "GameLoop", "InitBuffer", "JumpEngine", "NextLabel", "ReadJoypad"]
    );

    let init = resolution.inventory.get("InitBuffer").expect("InitBuffer");
    assert_eq!(init.start_position, 6);
    assert_eq!(init.end_position, 9);
    assert_eq!(init.instruction_count, 2);
    assert!(init.is_leaf());

    let game_loop = resolution.inventory.get("GameLoop").expect("GameLoop");
    assert_eq!(game_loop.instruction_count, 3);
    assert_eq!(game_loop.outgoing_calls, vec!["InitBuffer", "ReadJoypad", "InitBuffer"]);

    let dispatcher = resolution.inventory.get("Dispatcher").expect("Dispatcher");
    assert_eq!(dispatcher.instruction_count, 1);
    assert_eq!(dispatcher.outgoing_calls, vec!["JumpEngine"]);

    assert_eq!(resolution.inventory.get("JumpEngine").map(|f| f.instruction_count), Some(3));
    assert_eq!(resolution.inventory.get("NextLabel").map(|f| f.instruction_count), Some(0));
}

/// Directives and data lines belong to the body but are not instructions.
#[test]
fn directives_are_not_counted() {
    let resolution = resolve_text(SAMPLE);
    let read = resolution.inventory.get("ReadJoypad").expect("ReadJoypad");
    assert_eq!(read.instruction_count, 2);
    assert!(read.is_leaf());
}

#[test]
fn sample_corpus_reports_exclusions() {
    let resolution = resolve_text(SAMPLE);
    assert_eq!(resolution.excluded.len(), 2);

    let falls = resolution.excluded.iter().find(|e| e.name == "FallsThrough").expect("excluded");
    assert_eq!(falls.start_position, 23);
    assert_eq!(
        falls.reason,
        ExclusionReason::FellThrough { next_label: "NextLabel".into(), position: 25 }
    );

    let unterminated =
        resolution.excluded.iter().find(|e| e.name == "Unterminated").expect("excluded");
    assert_eq!(unterminated.reason, ExclusionReason::Unterminated);
    assert!(!resolution.inventory.contains("Missing"));
    assert!(!resolution.inventory.contains("Start"));
}

#[test]
fn label_before_return_excludes_the_candidate() {
    let resolution = resolve_text("Main:\n  jsr H\n  rts\nH:\nG:\n  rts\n");
    assert!(!resolution.inventory.contains("H"));
    assert_eq!(resolution.excluded.len(), 1);
    assert!(matches!(
        &resolution.excluded[0].reason,
        ExclusionReason::FellThrough { next_label, .. } if next_label == "G"
    ));
}

#[test]
fn body_with_only_a_return_is_a_function() {
    let resolution = resolve_text("Main:\n  jsr Nop\n  rts\nNop:\n  rts\n");
    let nop = resolution.inventory.get("Nop").expect("Nop resolved");
    assert_eq!(nop.instruction_count, 0);
    assert_eq!(nop.start_position, 3);
    assert_eq!(nop.end_position, 4);
}

#[test]
fn blank_and_comment_lines_are_skipped() {
    let resolution =
        resolve_text("Main:\n  jsr F\n  rts\nF:\n\n; setup\n  lda #$01 ; load\n\n  rts\n");
    let f = resolution.inventory.get("F").expect("F resolved");
    assert_eq!(f.instruction_count, 1);
    assert_eq!(f.end_position, 8);
}

#[test]
fn indented_label_terminates_a_body() {
    let resolution = resolve_text("Main:\n  jsr F\n  rts\nF:\n  lda #$01\n  Inner:\n  rts\n");
    assert!(!resolution.inventory.contains("F"));
    assert!(matches!(
        &resolution.excluded[0].reason,
        ExclusionReason::FellThrough { next_label, position: 5 } if next_label == "Inner"
    ));
}

#[test]
fn recursive_calls_make_a_non_leaf() {
    let resolution = resolve_text("Main:\n  jsr Loop\n  rts\nLoop:\n  dex\n  jsr Loop\n  rts\n");
    let looped = resolution.inventory.get("Loop").expect("Loop resolved");
    assert_eq!(looped.outgoing_calls, vec!["Loop"]);
    assert!(!looped.is_leaf());
    assert_eq!(
        looped.call_edges().collect::<Vec<_>>(),
        vec![CallEdge { caller: "Loop".into(), callee: "Loop".into() }]
    );
}

#[test]
fn uppercase_mnemonics_are_recognized() {
    let resolution = resolve_text("MAIN:\n  JSR SUB\n  RTS\nSUB:\n  LDA #$01\n  RTS\n");
    let sub = resolution.inventory.get("SUB").expect("SUB resolved");
    assert_eq!(sub.instruction_count, 1);
}

#[test]
fn assignments_are_not_instructions() {
    let resolution = resolve_text("Main:\n  jsr F\n  rts\nF:\n  tmp = $00\n  inx\n  rts\n");
    assert_eq!(resolution.inventory.get("F").map(|f| f.instruction_count), Some(1));
}

#[test]
fn redefined_label_is_excluded_under_exclude_policy() {
    let corpus = SourceCorpus::from_text(
        "Main:\n  jsr Dup\n  rts\nDup:\n  rts\nDup:\n  lda #$00\n  jsr Main\n  rts\n",
    );
    let matcher = matcher();
    let scanned = scan(&corpus, &matcher, RedefinitionPolicy::Exclude);
    let resolution = resolve(&corpus, &scanned, &matcher);

    assert!(!resolution.inventory.contains("Dup"));
    assert_eq!(resolution.candidate_count, 2);
    let dup = resolution.excluded.iter().find(|e| e.name == "Dup").expect("Dup excluded");
    assert_eq!(dup.reason, ExclusionReason::Redefined);
    assert_eq!(dup.start_position, 3);
}

#[test]
fn last_wins_resolves_the_later_body() {
    let corpus = SourceCorpus::from_text(
        "Main:\n  jsr Dup\n  rts\nDup:\n  rts\nDup:\n  lda #$00\n  jsr Main\n  rts\n",
    );
    let matcher = matcher();
    let scanned = scan(&corpus, &matcher, RedefinitionPolicy::LastWins);
    let resolution = resolve(&corpus, &scanned, &matcher);

    let dup = resolution.inventory.get("Dup").expect("Dup resolved");
    assert_eq!(dup.start_position, 5);
    assert_eq!(dup.end_position, 8);
    assert_eq!(dup.instruction_count, 2);
    assert_eq!(dup.outgoing_calls, vec!["Main"]);
}

#[test]
fn resolve_candidate_reports_end_of_corpus() {
    let corpus = SourceCorpus::from_text("Tail:\n  lda #$00\n  sta $10\n");
    let label = Label { name: "Tail".into(), position: 0 };
    let err = resolve_candidate(&corpus, &label, &matcher()).unwrap_err();
    assert_eq!(err, ExclusionReason::Unterminated);
    assert_eq!(err.to_string(), "end of corpus before a return");
}
