//! Complete runs from input files to the written table.

use crate::common::{AMBIGUOUS, CHAIN, Workspace, graph, pipeline, policy, read_rows};
use minacl_core::{
    AclRule, Config, Decision, ObjectiveStrategy, RequestKey, SolveStatus, Warning,
};
use minacl_pipeline::{DEFAULT_OUTPUT_FILE, Pipeline, write_acl_path};
use std::sync::Arc;

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

#[tokio::test]
async fn test_single_chain_yields_one_permit() {
    let ws = Workspace::new();
    let graph_path = ws.graph(&CHAIN);
    let policy_path = ws.policy(&[&["owns", "member"]]);
    let output = ws.path(DEFAULT_OUTPUT_FILE);

    let report = pipeline().run_paths(&graph_path, &policy_path).await.unwrap();
    write_acl_path(&report.acl, &output).unwrap();

    assert_eq!(report.status, SolveStatus::Optimal);
    assert!(report.warnings.is_empty());
    assert_eq!(
        read_rows(&output),
        vec![
            row(&["User", "Resource", "Decision"]),
            row(&["A", "C", "Permit"]),
        ]
    );
}

#[tokio::test]
async fn test_ambiguous_pattern_forces_a_deny() {
    let report = pipeline()
        .run_parallel(Arc::new(graph(&AMBIGUOUS)), &policy(&[&["owns", "member"]]))
        .await
        .unwrap();

    assert_eq!(report.stats.u1, 1);
    assert_eq!(report.stats.u2, 1);
    let permits: Vec<&AclRule> = report.acl.with_decision(Decision::Permit).collect();
    let denies: Vec<&AclRule> = report.acl.with_decision(Decision::Deny).collect();
    assert_eq!(
        permits,
        vec![&AclRule::new(&RequestKey::new("A", "C"), Decision::Permit)]
    );
    assert_eq!(denies.len(), 1);
    assert_eq!(denies[0].target, "C");
    assert!(denies[0].source == "B" || denies[0].source == "D");
}

#[test]
fn test_shared_unique_pattern_is_covered_once() {
    // E -owns-> D -member-> C gives (E, C) the same authorizing pattern as
    // (A, C); exact cover keeps exactly one of the two permits.
    let edges = [
        ("A", "B", "owns"),
        ("B", "C", "member"),
        ("D", "C", "member"),
        ("E", "D", "owns"),
    ];
    let report = pipeline()
        .run(&graph(&edges), &policy(&[&["owns", "member"]]))
        .unwrap();

    assert_eq!(report.stats.authorized, 2);
    assert_eq!(report.acl.deny_count(), 0);
    assert_eq!(report.acl.permit_count(), 1);
    let permit = &report.acl.rules[0];
    assert_eq!(permit.target, "C");
    assert!(permit.source == "A" || permit.source == "E");
}

#[test]
fn test_degenerate_policy_yields_empty_acl() {
    let report = pipeline()
        .run(&graph(&AMBIGUOUS), &policy(&[&["viewer"]]))
        .unwrap();

    assert_eq!(report.status, SolveStatus::Optimal);
    assert!(report.acl.is_empty());
    assert_eq!(report.stats.authorized, 0);
    assert_eq!(report.stats.u1 + report.stats.u2, 0);
    assert!(matches!(
        report.warnings.as_slice(),
        [Warning::DegeneratePolicy { .. }]
    ));
    assert!(report.check_status().is_ok());
}

#[test]
fn test_weighted_objective_agrees_on_small_input() {
    let config = Config {
        objective: ObjectiveStrategy::Weighted,
        ..Config::default()
    };
    let report = Pipeline::new(config)
        .unwrap()
        .run(&graph(&AMBIGUOUS), &policy(&[&["owns", "member"]]))
        .unwrap();
    assert_eq!(report.acl.permit_count(), 1);
    assert_eq!(report.acl.deny_count(), 1);
}

#[test]
fn test_revisits_extend_patterns_through_cycles() {
    let cycle = [("A", "B", "r"), ("B", "A", "r")];
    let rules = policy(&[&["r", "r", "r"]]);

    let with_revisits = pipeline().run(&graph(&cycle), &rules).unwrap();
    assert_eq!(with_revisits.stats.authorized, 2);
    assert_eq!(with_revisits.acl.permit_count(), 1);

    let config = Config {
        allow_revisits: false,
        ..Config::default()
    };
    let simple_only = Pipeline::new(config)
        .unwrap()
        .run(&graph(&cycle), &rules)
        .unwrap();
    assert_eq!(simple_only.stats.authorized, 0);
    assert!(simple_only.acl.is_empty());
}
