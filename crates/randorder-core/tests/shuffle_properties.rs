//! Ordering invariants over generated collections.
//!
//! Every strategy must keep the exact multiset of items, keep buckets
//! contiguous, and be reproducible from its seed.

use std::collections::BTreeSet;

use proptest::prelude::*;
use randorder_core::disable::disable_key;
use randorder_core::{
    randomize, BucketType, GuardOutcome, MarkerTable, NodeItem, RunSession, Seed, StrategyRegistry,
    TestItem,
};

/// Collection shaped like a real run: files, optional classes, tests.
fn collection(shape: &[(u8, u8, u8)]) -> Vec<NodeItem> {
    let mut items = Vec::new();
    for (f, &(classes, tests, free)) in shape.iter().enumerate() {
        let file = format!("tests/pkg{}/test_{f}.py", f % 2);
        for t in 0..free {
            items.push(NodeItem::parse(&format!("{file}::test_free_{t}")));
        }
        for c in 0..classes {
            for t in 0..tests {
                items.push(NodeItem::parse(&format!("{file}::TestC{c}::test_{t}")));
            }
        }
    }
    items
}

fn ids(items: &[NodeItem]) -> Vec<String> {
    items.iter().map(|i| i.node_id().to_string()).collect()
}

fn shape() -> impl Strategy<Value = Vec<(u8, u8, u8)>> {
    prop::collection::vec((0u8..3, 1u8..4, 0u8..4), 0..6)
}

fn bucket_type() -> impl Strategy<Value = BucketType> {
    prop::sample::select(vec![
        BucketType::Global,
        BucketType::Package,
        BucketType::Module,
        BucketType::Class,
        BucketType::Parent,
        BucketType::Grandparent,
    ])
}

fn run(items: &mut Vec<NodeItem>, bucket_type: BucketType, seed: u64) -> GuardOutcome {
    randomize(
        items,
        &RunSession::new(),
        &StrategyRegistry::builtin(),
        bucket_type,
        Some(disable_key),
        Some(&Seed::Number(seed)),
    )
    .expect("no integrity violation")
}

proptest! {
    #[test]
    fn identity_is_preserved(shape in shape(), bt in bucket_type(), seed in any::<u64>()) {
        let mut items = collection(&shape);
        let before = ids(&items);
        run(&mut items, bt, seed);
        let after = ids(&items);

        prop_assert_eq!(before.len(), after.len());
        let a: BTreeSet<_> = before.into_iter().collect();
        let b: BTreeSet<_> = after.into_iter().collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn module_buckets_stay_contiguous(shape in shape(), seed in any::<u64>()) {
        let mut items = collection(&shape);
        run(&mut items, BucketType::Module, seed);

        // Each file is collected as one run, so it must come back as one.
        let mut finished = BTreeSet::new();
        let mut current: Option<&str> = None;
        for item in &items {
            if current != Some(item.location()) {
                if let Some(prev) = current {
                    finished.insert(prev.to_string());
                }
                prop_assert!(!finished.contains(item.location()), "file split: {}", item.location());
                current = Some(item.location());
            }
        }
    }

    #[test]
    fn same_seed_same_order(shape in shape(), bt in bucket_type(), seed in any::<u64>()) {
        let mut a = collection(&shape);
        let mut b = collection(&shape);
        run(&mut a, bt, seed);
        run(&mut b, bt, seed);
        prop_assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn disabled_module_keeps_order(shape in shape(), seed in any::<u64>()) {
        prop_assume!(!shape.is_empty());
        let mut items = collection(&shape);
        let mut markers = MarkerTable::new();
        markers.disable("tests/pkg0/test_0.py");
        markers.apply(&mut items);

        let fixed = |items: &[NodeItem]| -> Vec<String> {
            items
                .iter()
                .filter(|i| i.location() == "tests/pkg0/test_0.py" && i.class().is_none())
                .map(|i| i.node_id().to_string())
                .collect()
        };
        let before = fixed(&items);
        run(&mut items, BucketType::Module, seed);
        prop_assert_eq!(before, fixed(&items));
    }
}

#[test]
fn unseeded_runs_vary() {
    let base = collection(&[(2, 3, 0), (2, 3, 0), (1, 3, 2)]);
    let mut seen = BTreeSet::new();
    for _ in 0..20 {
        let mut items = base.clone();
        randomize(
            &mut items,
            &RunSession::new(),
            &StrategyRegistry::builtin(),
            BucketType::Module,
            None,
            None,
        )
        .unwrap();
        seen.insert(ids(&items));
    }
    assert!(seen.len() > 1, "20 unseeded runs produced one ordering");
}

#[test]
fn empty_and_single_item_runs() {
    for bt in [BucketType::Global, BucketType::Module, BucketType::Parent] {
        let mut empty: Vec<NodeItem> = vec![];
        assert_eq!(run(&mut empty, bt, 1), GuardOutcome::Shuffled);
        assert!(empty.is_empty());

        let mut one = vec![NodeItem::parse("a/test_x.py::test_1")];
        assert_eq!(run(&mut one, bt, 1), GuardOutcome::Shuffled);
        assert_eq!(ids(&one), vec!["a/test_x.py::test_1".to_string()]);
    }
}
