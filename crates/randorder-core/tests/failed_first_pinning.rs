//! Failed-first: previously failed tests run first, in collection order,
//! while everything behind them is still shuffled.

use randorder_core::{
    BucketType, GuardOutcome, MarkerTable, NodeItem, RandomOrderConfig, RunPlan, Seed, StrategyRegistry,
    TestItem,
};

fn collection() -> Vec<NodeItem> {
    let mut items = Vec::new();
    for f in 0..5 {
        for t in 0..6 {
            items.push(NodeItem::parse(&format!("tests/test_{f}.py::test_{t}")));
        }
    }
    items
}

#[test]
fn last_failed_tests_are_pinned_first() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("lastfailed");
    std::fs::write(
        &cache,
        r#"{"tests/test_3.py::test_4": true, "tests/test_1.py::test_2": true}"#,
    )
    .unwrap();

    for seed in 0..25u64 {
        let cfg = RandomOrderConfig {
            bucket: Some(BucketType::Module),
            seed: Some(Seed::Number(seed)),
            failed_first: true,
            last_failed_path: Some(cache.clone()),
            ..Default::default()
        };
        let plan = RunPlan::from_config(&cfg);
        let mut items = collection();
        let outcome = plan.apply(&mut items, &StrategyRegistry::builtin()).unwrap();

        assert_eq!(outcome, GuardOutcome::Shuffled);
        assert_eq!(items[0].node_id(), "tests/test_1.py::test_2");
        assert_eq!(items[1].node_id(), "tests/test_3.py::test_4");
        assert_eq!(items.len(), 30);
    }
}

#[test]
fn rest_of_the_run_still_shuffles() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("lastfailed");
    std::fs::write(&cache, r#"{"tests/test_0.py::test_0": true}"#).unwrap();

    let tails: std::collections::BTreeSet<Vec<String>> = (0..10u64)
        .map(|seed| {
            let plan = RunPlan::from_config(&RandomOrderConfig {
                seed: Some(Seed::Number(seed)),
                failed_first: true,
                last_failed_path: Some(cache.clone()),
                ..Default::default()
            });
            let mut items = collection();
            plan.apply(&mut items, &StrategyRegistry::builtin()).unwrap();
            assert_eq!(items[0].node_id(), "tests/test_0.py::test_0");
            items[1..].iter().map(|i| i.node_id().to_string()).collect()
        })
        .collect();
    assert!(tails.len() > 1);
}

#[test]
fn missing_cache_means_plain_shuffle() {
    let dir = tempfile::tempdir().unwrap();
    let plan = RunPlan::from_config(&RandomOrderConfig {
        seed: Some(Seed::Number(7)),
        failed_first: true,
        last_failed_path: Some(dir.path().join("absent")),
        ..Default::default()
    });
    let mut items = collection();
    assert_eq!(
        plan.apply(&mut items, &StrategyRegistry::builtin()).unwrap(),
        GuardOutcome::Shuffled
    );
}

#[test]
fn corrupt_cache_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("lastfailed");
    std::fs::write(&cache, "not json").unwrap();
    let plan = RunPlan::from_config(&RandomOrderConfig {
        failed_first: true,
        last_failed_path: Some(cache),
        ..Default::default()
    });
    let mut items = collection();
    let err = plan.apply(&mut items, &StrategyRegistry::builtin()).unwrap_err();
    assert!(err.to_string().contains("malformed last-failed cache"));
    assert_eq!(items, collection());
}

#[test]
fn failed_test_in_disabled_module_still_leads() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("lastfailed");
    std::fs::write(
        &cache,
        r#"{"tests/test_2.py::test_1": true, "tests/test_0.py::test_3": true}"#,
    )
    .unwrap();
    let mut markers = MarkerTable::new();
    markers.disable("tests/test_2.py");

    for seed in 0..50u64 {
        let plan = RunPlan::from_config(&RandomOrderConfig {
            bucket: Some(BucketType::Module),
            seed: Some(Seed::Number(seed)),
            failed_first: true,
            last_failed_path: Some(cache.clone()),
            ..Default::default()
        });
        let mut items = collection();
        markers.apply(&mut items);
        plan.apply(&mut items, &StrategyRegistry::builtin()).unwrap();

        let head: Vec<&str> = items[..2].iter().map(|i| i.node_id()).collect();
        assert_eq!(
            head,
            vec!["tests/test_0.py::test_3", "tests/test_2.py::test_1"],
            "seed {seed}"
        );
    }
}
