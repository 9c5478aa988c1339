mod common;

use common::assert_close;
use greedy_bst::{
    BuildConfig, GreedyBst, GreedyBstError, Rank, RootRank, TreeBuilder, WeightFormula, MAX_KEYS,
};
use test_case::test_case;

fn pipeline(root_rank: RootRank, weights: WeightFormula) -> GreedyBst {
    GreedyBst::new(BuildConfig {
        root_rank,
        weights,
        ..BuildConfig::default()
    })
}

fn layout(probabilities: &[f64], root_rank: RootRank) -> Vec<(u128, Rank)> {
    TreeBuilder::new(root_rank)
        .build(probabilities)
        .expect("build succeeds")
        .slots()
        .map(|(slot, key)| (slot.get(), key.rank))
        .collect()
}

#[test_case(&[0.1, 0.2, 0.4, 0.3], 1.6 ; "four keys")]
#[test_case(&[0.5], 0.5 ; "single key")]
#[test_case(&[0.25, 0.25, 0.25, 0.25], 2.5 ; "all equal")]
#[test_case(&[0.05, 0.1, 0.15, 0.3, 0.4], 1.8 ; "left spine")]
fn one_based_legacy_cost(probabilities: &[f64], expected: f64) {
    let result = pipeline(RootRank::OneBased, WeightFormula::Legacy)
        .evaluate(probabilities)
        .expect("evaluation succeeds");
    assert_close(result.cost, expected);
    assert!(result.tree.is_complete());
}

#[test_case(&[0.1, 0.2, 0.4, 0.3], 1.8 ; "four keys")]
#[test_case(&[0.5], 0.5 ; "single key")]
#[test_case(&[0.25, 0.25, 0.25, 0.25], 2.5 ; "all equal")]
#[test_case(&[0.05, 0.1, 0.15, 0.3, 0.4], 1.05 ; "drops rank equal to root")]
fn zero_based_legacy_cost(probabilities: &[f64], expected: f64) {
    let result = pipeline(RootRank::ZeroBased, WeightFormula::Legacy)
        .evaluate(probabilities)
        .expect("evaluation succeeds");
    assert_close(result.cost, expected);
}

#[test_case(&[0.1, 0.2, 0.4, 0.3], 1.7 ; "four keys")]
#[test_case(&[0.05, 0.1, 0.15, 0.3, 0.4], 2.1 ; "left spine")]
fn exact_depth_cost(probabilities: &[f64], expected: f64) {
    let result = pipeline(RootRank::OneBased, WeightFormula::Exact)
        .evaluate(probabilities)
        .expect("evaluation succeeds");
    assert_close(result.cost, expected);
}

#[test]
fn worked_example_layout() {
    // 3 at the root, 4 to its right, 2 to its left, then 1 under 2
    assert_eq!(
        layout(&[0.1, 0.2, 0.4, 0.3], RootRank::OneBased),
        vec![(0, 3), (1, 2), (2, 4), (3, 1)]
    );
}

#[test]
fn zero_based_root_shifts_the_shape() {
    // Root compares as 2; the real rank 2 passes the root and lands under 4.
    assert_eq!(
        layout(&[0.1, 0.2, 0.4, 0.3], RootRank::ZeroBased),
        vec![(0, 2), (1, 1), (2, 4), (5, 2)]
    );
}

#[test]
fn zero_based_root_only_shifts_the_root_comparison() {
    // A root at position 0 compares as 0 but stays an occupied slot, so a
    // single key still costs its own probability and every other rank
    // lands to the right of the root.
    let pipeline = GreedyBst::new(BuildConfig::zero_based_root());
    let single = pipeline.evaluate(&[0.5]).expect("evaluation succeeds");
    assert_close(single.cost, 0.5);
    assert_eq!(single.tree.root().map(|key| key.rank), Some(0));

    assert_eq!(
        layout(&[0.25, 0.25, 0.25, 0.25], RootRank::ZeroBased),
        vec![(0, 0), (2, 2), (6, 3), (14, 4)]
    );
}

#[test]
fn dropped_rank_leaves_later_ranks_placed() {
    let result = pipeline(RootRank::ZeroBased, WeightFormula::Legacy)
        .evaluate(&[0.05, 0.1, 0.15, 0.3, 0.4])
        .expect("evaluation succeeds");
    assert_eq!(result.tree.len(), 4);
    assert_eq!(result.tree.unplaced(), &[4]);
    let placed: Vec<Rank> = result.tree.placements().map(|(_, key)| key.rank).collect();
    assert_eq!(placed, vec![4, 3, 2, 1]);
}

#[test]
fn equal_probabilities_place_in_rank_order() {
    let tree = TreeBuilder::default()
        .build(&[0.25; 4])
        .expect("build succeeds");
    let placed: Vec<Rank> = tree.placements().map(|(_, key)| key.rank).collect();
    assert_eq!(placed, vec![1, 2, 3, 4]);

    let slots: Vec<u128> = tree.slots().map(|(slot, _)| slot.get()).collect();
    assert_eq!(slots, vec![0, 2, 6, 14]);
}

#[test]
fn deepest_chain_fits_capacity() {
    // Ascending probabilities build a left spine of MAX_KEYS levels.
    let probabilities: Vec<f64> = (1..=MAX_KEYS).map(|rank| rank as f64).collect();
    let tree = TreeBuilder::default()
        .build(&probabilities)
        .expect("build succeeds");
    assert!(tree.is_complete());
    assert_eq!(tree.height(), MAX_KEYS as u32);

    let mut too_many = probabilities;
    too_many.push(0.0);
    assert!(matches!(
        TreeBuilder::default().build(&too_many),
        Err(GreedyBstError::CapacityExceeded { max: MAX_KEYS, .. })
    ));
}

#[test]
fn configured_limit_is_enforced_by_pipeline() {
    let pipeline = GreedyBst::new(BuildConfig {
        max_keys: 2,
        ..BuildConfig::default()
    });
    assert!(pipeline.evaluate(&[0.5, 0.5]).is_ok());
    assert!(matches!(
        pipeline.evaluate(&[0.2, 0.3, 0.5]),
        Err(GreedyBstError::CapacityExceeded { keys: 3, max: 2 })
    ));
}
