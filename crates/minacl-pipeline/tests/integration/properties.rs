//! Whole-pipeline properties over random small graphs.

use crate::common::{graph, policy};
use minacl_core::{Config, Decision, Error, SolveStatus};
use minacl_graph::{EnumerationOptions, enumerate_patterns};
use minacl_pipeline::Pipeline;
use minacl_policy::classify;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

const NODES: [&str; 5] = ["a", "b", "c", "d", "e"];
const LABELS: [&str; 3] = ["owns", "member", "viewer"];
const POLICIES: [&[&str]; 4] = [
    &["owns"],
    &["owns", "member"],
    &["member", "viewer"],
    &["viewer"],
];

type EdgeList = Vec<(&'static str, &'static str, &'static str)>;

fn arb_edges() -> impl Strategy<Value = EdgeList> {
    prop::collection::vec((0..NODES.len(), 0..NODES.len(), 0..LABELS.len()), 1..8).prop_map(
        |edges| {
            edges
                .into_iter()
                .map(|(s, t, l)| (NODES[s], NODES[t], LABELS[l]))
                .collect()
        },
    )
}

fn arb_policy() -> impl Strategy<Value = Vec<&'static [&'static str]>> {
    prop::collection::btree_set(0..POLICIES.len(), 0..3)
        .prop_map(|idxs| idxs.into_iter().map(|i| POLICIES[i]).collect())
}

fn small_config() -> Config {
    Config {
        max_hop_length: 3,
        ..Config::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn acl_never_permits_and_denies_the_same_pair(edges in arb_edges(), rules in arb_policy()) {
        let pipeline = Pipeline::new(small_config()).unwrap();
        let Ok(report) = pipeline.run(&graph(&edges), &policy(&rules)) else {
            // Self-loops only: nothing to enumerate.
            return Ok(());
        };
        prop_assert!(matches!(report.status, SolveStatus::Optimal | SolveStatus::Infeasible));

        let permitted: BTreeSet<(&str, &str)> = report
            .acl
            .with_decision(Decision::Permit)
            .map(|r| (r.source.as_str(), r.target.as_str()))
            .collect();
        for deny in report.acl.with_decision(Decision::Deny) {
            prop_assert!(!permitted.contains(&(deny.source.as_str(), deny.target.as_str())));
        }
    }

    #[test]
    fn permits_are_authorized_and_denies_are_not(edges in arb_edges(), rules in arb_policy()) {
        let g = graph(&edges);
        let p = policy(&rules);
        let Ok(report) = Pipeline::new(small_config()).unwrap().run(&g, &p) else {
            return Ok(());
        };

        let options = EnumerationOptions { max_hop_length: 3, allow_revisits: true };
        let classification = classify(enumerate_patterns(&g, options), &p);
        let authorized: BTreeSet<(String, String)> = classification
            .authorized
            .iter()
            .map(|r| (r.key.source.clone(), r.key.target.clone()))
            .collect();

        for rule in &report.acl.rules {
            let pair = (rule.source.clone(), rule.target.clone());
            match rule.decision {
                Decision::Permit => prop_assert!(authorized.contains(&pair)),
                Decision::Deny => prop_assert!(!authorized.contains(&pair)),
            }
        }
    }

    #[test]
    fn zero_hops_is_always_empty(edges in arb_edges()) {
        let config = Config { max_hop_length: 0, ..Config::default() };
        let err = Pipeline::new(config).unwrap().run(&graph(&edges), &policy(&[&["owns"]])).unwrap_err();
        prop_assert!(matches!(err, Error::EmptyGraph { .. }), "unexpected error: {}", err);
    }

    #[test]
    fn parallel_run_agrees_with_sequential(edges in arb_edges(), rules in arb_policy()) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .build()
            .unwrap();
        let config = Config { workers: Some(3), ..small_config() };
        let pipeline = Pipeline::new(config).unwrap();
        let p = policy(&rules);

        let sequential = pipeline.run(&graph(&edges), &p);
        let parallel = runtime.block_on(pipeline.run_parallel(Arc::new(graph(&edges)), &p));
        match (sequential, parallel) {
            (Ok(s), Ok(q)) => {
                prop_assert_eq!(s.status, q.status);
                prop_assert_eq!(s.stats, q.stats);
                prop_assert_eq!(s.acl.permit_count(), q.acl.permit_count());
                prop_assert_eq!(s.acl.deny_count(), q.acl.deny_count());
            }
            (Err(_), Err(_)) => {}
            (s, q) => prop_assert!(false, "runs disagree: {:?} vs {:?}", s.is_ok(), q.is_ok()),
        }
    }
}
