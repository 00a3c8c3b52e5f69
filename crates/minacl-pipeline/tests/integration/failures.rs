//! Input errors and non-optimal solver statuses.

use crate::common::{AMBIGUOUS, FixedStatusOracle, Workspace, graph, pipeline, policy, read_rows};
use minacl_core::{Config, Error, SolveStatus};
use minacl_pipeline::{Pipeline, write_acl_path};

#[test]
fn test_infeasible_writes_header_only() {
    let ws = Workspace::new();
    let output = ws.path("out.csv");
    let oracle = FixedStatusOracle::new(SolveStatus::Infeasible);

    let report = pipeline()
        .with_oracle(oracle.clone())
        .run(&graph(&AMBIGUOUS), &policy(&[&["owns", "member"]]))
        .unwrap();
    write_acl_path(&report.acl, &output).unwrap();

    assert_eq!(report.status, SolveStatus::Infeasible);
    assert_eq!(read_rows(&output), vec![vec!["User", "Resource", "Decision"]]);
    assert!(matches!(
        report.check_status().unwrap_err(),
        Error::ModelInfeasible { .. }
    ));
    // The deny-minimization phase failed, so no second phase ran.
    assert_eq!(oracle.calls(), 1);
}

#[test]
fn test_timed_out_reports_limit() {
    let config = Config {
        solver_time_limit_secs: 42,
        ..Config::default()
    };
    let report = Pipeline::new(config)
        .unwrap()
        .with_oracle(FixedStatusOracle::new(SolveStatus::TimedOut))
        .run(&graph(&AMBIGUOUS), &policy(&[&["owns", "member"]]))
        .unwrap();

    assert!(report.acl.is_empty());
    let err = report.check_status().unwrap_err();
    assert!(matches!(err, Error::ModelTimedOut { seconds: 42, .. }));
    assert!(err.is_model_status());
}

#[test]
fn test_unbounded_is_surfaced() {
    let report = pipeline()
        .with_oracle(FixedStatusOracle::new(SolveStatus::Unbounded))
        .run(&graph(&AMBIGUOUS), &policy(&[&["owns", "member"]]))
        .unwrap();
    assert!(matches!(
        report.check_status().unwrap_err(),
        Error::ModelUnbounded { .. }
    ));
}

#[tokio::test]
async fn test_malformed_graph_aborts_before_solving() {
    let ws = Workspace::new();
    let graph_path = ws.write("system_graph.csv", "source,target,label\nA,B,owns\nA,B\n");
    let policy_path = ws.policy(&[&["owns"]]);
    let oracle = FixedStatusOracle::new(SolveStatus::Optimal);

    let err = pipeline()
        .with_oracle(oracle.clone())
        .run_paths(&graph_path, &policy_path)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Parse { line: 3, .. }));
    assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn test_header_only_graph_is_empty() {
    let ws = Workspace::new();
    let graph_path = ws.write("system_graph.csv", "source,target,label\n");
    let policy_path = ws.policy(&[&["owns"]]);

    let err = pipeline()
        .run_paths(&graph_path, &policy_path)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EmptyGraph { .. }));
}

#[test]
fn test_zero_hop_bound_is_empty() {
    let config = Config {
        max_hop_length: 0,
        ..Config::default()
    };
    let err = Pipeline::new(config)
        .unwrap()
        .run(&graph(&AMBIGUOUS), &policy(&[&["owns"]]))
        .unwrap_err();
    assert!(matches!(err, Error::EmptyGraph { .. }));
}

#[tokio::test]
async fn test_missing_policy_file() {
    let ws = Workspace::new();
    let graph_path = ws.graph(&AMBIGUOUS);
    let err = pipeline()
        .run_paths(&graph_path, &ws.path("absent.txt"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io { path: Some(_), .. }));
}
