//! Tests for weighted fusion renormalization.
mod common;
use common::*;
use sekkei::prelude::*;

fn total(system: &UtilitySystem, fusion: &ElementId) -> f32 {
    system.weights_into(fusion).iter().sum()
}

#[test]
fn test_editing_one_weight_rebalances_the_rest() {
    let (mut system, c1, c2, fusion) = create_weighted_us();

    assert!(system.set_weight(&c1, 0.3));
    let weights = system.weights_into(&fusion);

    assert!((weights[0] - 0.3).abs() < 1e-6);
    assert!((weights[1] - 0.7).abs() < 1e-6);
    assert!((total(&system, &fusion) - 1.0).abs() < 1e-6);

    // A second edit keeps the sum at 1 as well.
    assert!(system.set_weight(&c2, 0.25));
    assert!((total(&system, &fusion) - 1.0).abs() < 1e-6);
}

#[test]
fn test_rebalance_is_proportional_to_current_weights() {
    let (mut system, c1, _, fusion) = create_weighted_us();
    let thirst = system.add_node(UtilityKind::Variable, "Thirst", Rect::at(0.0, 400.0));
    system.add_connection(&thirst, &fusion).expect("nodes exist");

    // Three factors at weight 1 each; pinning one to 0.5 splits the
    // correction across the other two in proportion to their weights.
    assert!(system.set_weight(&c1, 0.5));
    let weights = system.weights_into(&fusion);
    assert!((weights[0] - 0.5).abs() < 1e-6);
    assert!((weights[1] - 0.25).abs() < 1e-6);
    assert!((weights[2] - 0.25).abs() < 1e-6);
}

#[test]
fn test_zero_siblings_split_the_remainder_equally() {
    let (mut system, c1, c2, fusion) = create_weighted_us();

    system.set_weight(&c2, 0.0);
    assert!((total(&system, &fusion) - 1.0).abs() < 1e-6);

    // The only sibling sits at zero, so it absorbs the whole remainder.
    system.set_weight(&c1, 0.6);
    let weights = system.weights_into(&fusion);
    assert!((weights[0] - 0.6).abs() < 1e-6);
    assert!((weights[1] - 0.4).abs() < 1e-6);
}

#[test]
fn test_weights_are_rounded_to_two_decimals() {
    let (mut system, c1, _, fusion) = create_weighted_us();

    system.set_weight(&c1, 0.333_333);
    let weights = system.weights_into(&fusion);
    assert!((weights[0] - 0.33).abs() < 1e-6);
    assert!((weights[1] - 0.67).abs() < 1e-6);
}

#[test]
fn test_non_weighted_fusions_are_left_alone() {
    let (mut system, c1, _, fusion) = create_weighted_us();
    system.node_mut(&fusion).expect("node exists").fusion = FusionKind::GetMax;

    system.set_weight(&c1, 0.2);
    let weights = system.weights_into(&fusion);
    assert!((weights[0] - 0.2).abs() < 1e-6);
    assert!((weights[1] - 1.0).abs() < 1e-6);
}
