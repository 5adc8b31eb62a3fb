//! Tests for `distance` module

use super::distance::*;
use crate::error::Error;

#[test]
fn test_euclidean_distance() {
    let a = vec![0.0, 0.0, 0.0];
    let b = vec![3.0, 4.0, 0.0];

    let distance = DistanceMetric::Euclidean.distance(&a, &b).unwrap();

    assert!((distance - 5.0).abs() < 1e-6);
    // Raw distance is squared
    assert!((DistanceMetric::Euclidean.raw_distance(&a, &b) - 25.0).abs() < 1e-5);
}

#[test]
fn test_angular_distance() {
    let a = vec![1.0, 0.0, 0.0];
    let same = vec![2.0, 0.0, 0.0];
    let orthogonal = vec![0.0, 1.0, 0.0];
    let opposite = vec![-1.0, 0.0, 0.0];

    assert!(DistanceMetric::Angular.distance(&a, &same).unwrap().abs() < 1e-6);
    assert!((DistanceMetric::Angular.distance(&a, &orthogonal).unwrap() - 1.0).abs() < 1e-6);
    assert!((DistanceMetric::Angular.distance(&a, &opposite).unwrap() - 2.0).abs() < 1e-6);
}

#[test]
fn test_angular_zero_vector_is_maximally_uncertain() {
    let zero = vec![0.0; 4];
    let b = vec![1.0, 2.0, 3.0, 4.0];

    let distance = DistanceMetric::Angular.distance(&zero, &b).unwrap();

    assert!((distance - 1.0).abs() < 1e-6);
}

#[test]
fn test_inner_product_is_negated() {
    let a = vec![1.0, 2.0, 3.0];
    let b = vec![4.0, 5.0, 6.0];

    let distance = DistanceMetric::InnerProduct.distance(&a, &b).unwrap();

    assert!((distance + 32.0).abs() < 1e-5);
    assert!((DistanceMetric::InnerProduct.to_similarity(distance) - 32.0).abs() < 1e-5);
}

#[test]
fn test_hamming_counts_differing_components() {
    let a = vec![1.0, 0.0, 1.0, 0.0, 5.0];
    let b = vec![1.0, 1.0, 1.0, 1.0, 5.0];

    let distance = DistanceMetric::Hamming.distance(&a, &b).unwrap();

    assert!((distance - 2.0).abs() < f64::EPSILON);
}

#[test]
fn test_distance_rejects_length_mismatch() {
    let a = vec![1.0, 2.0];
    let b = vec![1.0, 2.0, 3.0];

    for metric in DistanceMetric::ALL {
        let err = metric.distance(&a, &b).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        );
    }
}

#[test]
fn test_symmetric_metrics() {
    let a: Vec<f32> = (0..19).map(|i| (i as f32 * 0.37).sin()).collect();
    let b: Vec<f32> = (0..19).map(|i| (i as f32 * 0.11).cos()).collect();

    for metric in DistanceMetric::ALL {
        let ab = metric.distance(&a, &b).unwrap();
        let ba = metric.distance(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-5, "{metric} should be symmetric");
    }
}

#[test]
fn test_simd_matches_scalar_with_remainder() {
    // 19 = 2 full lanes + 3 remainder
    let a: Vec<f32> = (0..19).map(|i| i as f32 * 0.5).collect();
    let b: Vec<f32> = (0..19).map(|i| 10.0 - i as f32).collect();

    let scalar_l2: f32 = a.iter().zip(&b).map(|(x, y)| (x - y) * (x - y)).sum();
    let scalar_dot: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();

    assert!((DistanceMetric::Euclidean.raw_distance(&a, &b) - scalar_l2).abs() < 1e-2);
    assert!((DistanceMetric::InnerProduct.raw_distance(&a, &b) + scalar_dot).abs() < 1e-2);
}

#[test]
fn test_lower_raw_distance_is_closer_for_every_metric() {
    let query = vec![1.0, 1.0, 0.0, 0.0];
    let near = vec![1.0, 1.0, 0.0, 0.0];
    let far = vec![-1.0, 0.0, 1.0, 1.0];

    for metric in DistanceMetric::ALL {
        assert!(
            metric.raw_distance(&query, &near) < metric.raw_distance(&query, &far),
            "{metric}: identical vector must rank first"
        );
    }
}

#[test]
fn test_allows_negative_distance() {
    assert!(DistanceMetric::InnerProduct.allows_negative_distance());
    assert!(!DistanceMetric::Euclidean.allows_negative_distance());
    assert!(!DistanceMetric::Angular.allows_negative_distance());
    assert!(!DistanceMetric::Hamming.allows_negative_distance());
}

#[test]
fn test_metric_serialization() {
    for metric in DistanceMetric::ALL {
        let json = serde_json::to_string(&metric).unwrap();
        assert_eq!(json, format!("\"{}\"", metric.as_str()));
        let deserialized: DistanceMetric = serde_json::from_str(&json).unwrap();
        assert_eq!(metric, deserialized);
    }
}

#[test]
fn test_metric_aliases() {
    let angular: DistanceMetric = serde_json::from_str("\"cosine\"").unwrap();
    let inner: DistanceMetric = serde_json::from_str("\"dot_product\"").unwrap();

    assert_eq!(angular, DistanceMetric::Angular);
    assert_eq!(inner, DistanceMetric::InnerProduct);
}
