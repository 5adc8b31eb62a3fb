//! Tests for level assignment.

use super::level::{LevelGenerator, DEFAULT_SEED};
use super::params::MAX_LEVELS;

#[test]
fn test_same_seed_same_levels() {
    let multiplier = 1.0 / 16f64.ln();
    let a = LevelGenerator::new(42, multiplier);
    let b = LevelGenerator::new(42, multiplier);

    let levels_a: Vec<usize> = (0..100).map(|_| a.next_level()).collect();
    let levels_b: Vec<usize> = (0..100).map(|_| b.next_level()).collect();

    assert_eq!(levels_a, levels_b);
}

#[test]
fn test_zero_seed_is_replaced() {
    let multiplier = 1.0 / 16f64.ln();
    let zero = LevelGenerator::new(0, multiplier);
    let default = LevelGenerator::new(DEFAULT_SEED, multiplier);

    for _ in 0..20 {
        assert_eq!(zero.next_level(), default.next_level());
    }
}

#[test]
fn test_level_distribution_decays() {
    let m = 16f64;
    let generator = LevelGenerator::new(7, 1.0 / m.ln());
    let samples = 20_000;

    let mut histogram = [0usize; MAX_LEVELS];
    for _ in 0..samples {
        histogram[generator.next_level()] += 1;
    }

    // P(level >= 1) = 1/M
    let above_zero = samples - histogram[0];
    let ratio = above_zero as f64 / samples as f64;
    assert!(
        (ratio - 1.0 / m).abs() < 0.02,
        "expected ~{:.3} of nodes above layer 0, got {ratio:.3}",
        1.0 / m
    );
    assert!(histogram[0] > histogram[1]);
    assert!(histogram[1] >= histogram[2]);
}

#[test]
fn test_levels_are_capped() {
    // Huge multiplier pushes almost every draw past the cap
    let generator = LevelGenerator::new(3, 1e6);

    for _ in 0..100 {
        assert!(generator.next_level() < MAX_LEVELS);
    }
}
