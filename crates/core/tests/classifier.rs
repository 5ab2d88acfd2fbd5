use difftest_core::analysis::{analyze, classify, AnalysisOptions, Denylist};
use difftest_core::model::{Function, FunctionInventory, SourceCorpus};

const SAMPLE: &str = include_str!("fixtures/sample.asm");

fn function(name: &str, calls: &[&str]) -> Function {
    Function {
        name: name.to_string(),
        start_position: 0,
        end_position: 1,
        instruction_count: calls.len(),
        outgoing_calls: calls.iter().map(|c| c.to_string()).collect(),
    }
}

#[test]
fn partitions_sample_inventory_and_applies_default_denylist() {
    let corpus = SourceCorpus::from_text(SAMPLE);
    let analysis = analyze(&corpus, &AnalysisOptions::default()).expect("analysis succeeds");

    assert_eq!(analysis.classified.leaf_names(), vec!["InitBuffer", "NextLabel", "ReadJoypad"]);
    assert_eq!(analysis.classified.non_leaf_names(), vec!["Dispatcher", "GameLoop"]);
    assert_eq!(analysis.classified.denied, vec!["JumpEngine"]);
    assert_eq!(analysis.classified.len(), 5);
}

/// Every inventory entry lands in exactly one of leaf, non-leaf, denied.
#[test]
fn partition_is_exhaustive_and_disjoint() {
    let inventory: FunctionInventory = vec![
        function("Zeta", &[]),
        function("Alpha", &["Zeta"]),
        function("Mid", &[]),
        function("Table", &["Alpha"]),
    ]
    .into_iter()
    .collect();
    let classified = classify(&inventory, &Denylist::new(["Table"]));

    assert_eq!(classified.leaf_names(), vec!["Mid", "Zeta"]);
    assert_eq!(classified.non_leaf_names(), vec!["Alpha"]);
    assert_eq!(classified.denied, vec!["Table"]);
    assert_eq!(classified.len() + classified.denied.len(), inventory.len());
    for name in classified.leaf_names() {
        assert!(!classified.non_leaf_names().contains(&name));
    }
}

#[test]
fn empty_denylist_keeps_every_function() {
    let inventory: FunctionInventory =
        vec![function("JumpEngine", &[]), function("Caller", &["JumpEngine"])].into_iter().collect();
    let classified = classify(&inventory, &Denylist::empty());
    assert!(classified.denied.is_empty());
    assert_eq!(classified.leaf_names(), vec!["JumpEngine"]);
    assert_eq!(classified.non_leaf_names(), vec!["Caller"]);
}

#[test]
fn denylisted_names_missing_from_inventory_are_ignored() {
    let inventory: FunctionInventory = vec![function("Only", &[])].into_iter().collect();
    let classified = classify(&inventory, &Denylist::new(["Absent"]));
    assert!(classified.denied.is_empty());
    assert_eq!(classified.leaf_names(), vec!["Only"]);
}

#[test]
fn empty_inventory_classifies_to_empty_sets() {
    let classified = classify(&FunctionInventory::new(), &Denylist::default());
    assert!(classified.is_empty());
    assert!(classified.denied.is_empty());
}

#[test]
fn default_denylist_names_jump_engine() {
    let denylist = Denylist::default();
    assert!(denylist.contains("JumpEngine"));
    assert!(!denylist.is_empty());
    assert_eq!(denylist.names().count(), 1);
}

#[test]
fn inventory_collects_call_edges_in_order() {
    let inventory: FunctionInventory = vec![
        function("B", &["A", "A"]),
        function("A", &[]),
    ]
    .into_iter()
    .collect();
    let edges: Vec<(String, String)> =
        inventory.call_edges().into_iter().map(|e| (e.caller, e.callee)).collect();
    assert_eq!(
        edges,
        vec![("B".to_string(), "A".to_string()), ("B".to_string(), "A".to_string())]
    );
    assert_eq!(inventory.leaf_set().len(), 1);
    assert_eq!(inventory.non_leaf_set().len(), 1);
}
