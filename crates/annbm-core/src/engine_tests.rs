//! Tests for `engine` module

use crate::config::AnnBmConfig;
use crate::distance::DistanceMetric;
use crate::engine::{AnnBm, SearchHit};
use crate::error::Error;
use crate::index::hnsw::HnswIndexParams;

fn params(metric: DistanceMetric) -> HnswIndexParams {
    HnswIndexParams::new(16, 200, metric, false)
}

fn two_points() -> AnnBm {
    let index = AnnBm::new(2, params(DistanceMetric::Euclidean)).expect("valid params");
    index.set_value(0, &[0.0, 0.0]).expect("insert");
    index.set_value(1, &[10.0, 10.0]).expect("insert");
    index
}

fn lids(hits: &[SearchHit]) -> Vec<u32> {
    hits.iter().map(|h| h.lid).collect()
}

// =========================================================================
// Construction
// =========================================================================

#[test]
fn test_new_index_is_empty() {
    let index = AnnBm::new(4, params(DistanceMetric::Angular)).expect("valid params");

    assert!(index.is_empty());
    assert_eq!(index.num_docs(), 0);
    assert_eq!(index.dimension(), 4);
    assert_eq!(index.metric(), DistanceMetric::Angular);
    assert!(index.enable_sort());
}

#[test]
fn test_zero_dimension_rejected() {
    let result = AnnBm::new(0, HnswIndexParams::default());

    assert!(matches!(result, Err(Error::InvalidParams(_))));
}

#[test]
fn test_invalid_params_rejected() {
    let result = AnnBm::new(2, HnswIndexParams::new(1, 10, DistanceMetric::Euclidean, false));

    assert!(matches!(result, Err(Error::InvalidParams(_))));
}

#[test]
fn test_from_config_applies_search_defaults() {
    let mut config = AnnBmConfig::default();
    config.hnsw.max_links = 8;
    config.search.enable_sort = false;
    config.search.max_distance = 5.0;

    let index = AnnBm::from_config(2, &config).expect("valid config");

    assert_eq!(index.params().max_links, 8);
    assert!(!index.enable_sort());

    index.set_value(0, &[0.0, 0.0]).expect("insert");
    index.set_value(1, &[10.0, 10.0]).expect("insert");
    let hits = index.find_top_k_default(2, &[1.0, 1.0]).expect("search");
    assert_eq!(lids(&hits), vec![0]);
}

#[test]
fn test_from_invalid_config_rejected() {
    let mut config = AnnBmConfig::default();
    config.logging.level = "loud".to_string();

    let result = AnnBm::from_config(2, &config);

    assert!(matches!(result, Err(Error::Config(_))));
}

// =========================================================================
// Two-point scenario
// =========================================================================

#[test]
fn test_two_points_near_origin() {
    let index = two_points();

    let hits = index.find_top_k(2, &[1.0, 1.0], 10, f64::MAX).expect("search");

    assert_eq!(lids(&hits), vec![0, 1]);
    assert!((hits[0].distance - 2f64.sqrt()).abs() < 1e-6);
    assert!((hits[1].distance - 162f64.sqrt()).abs() < 1e-4);
}

#[test]
fn test_two_points_near_far_corner() {
    let index = two_points();

    let hits = index.find_top_k(2, &[9.0, 9.0], 10, f64::MAX).expect("search");

    assert_eq!(lids(&hits), vec![1, 0]);
}

#[test]
fn test_max_distance_zero_returns_nothing() {
    let index = two_points();

    let hits = index.find_top_k(2, &[1.0, 1.0], 10, 0.0).expect("search");

    assert!(hits.is_empty());
}

#[test]
fn test_max_distance_is_inclusive() {
    let index = two_points();

    let hits = index.find_top_k(2, &[0.0, 0.0], 10, 0.0).expect("search");

    assert_eq!(lids(&hits), vec![0]);
}

#[test]
fn test_k_truncates() {
    let index = two_points();

    let hits = index.find_top_k(1, &[9.0, 9.0], 10, f64::MAX).expect("search");

    assert_eq!(lids(&hits), vec![1]);
}

// =========================================================================
// Errors
// =========================================================================

#[test]
fn test_set_value_wrong_dimension() {
    let index = two_points();

    let err = index.set_value(2, &[1.0, 2.0, 3.0]).expect_err("wrong length");

    assert_eq!(err, Error::DimensionMismatch { expected: 2, actual: 3 });
    assert!(!index.contains(2));
}

#[test]
fn test_query_wrong_dimension() {
    let index = two_points();

    let err = index.find_top_k(1, &[1.0], 10, f64::MAX).expect_err("wrong length");

    assert_eq!(err.code(), "ANNBM-001");
}

#[test]
fn test_get_unknown_identifier() {
    let index = two_points();

    assert_eq!(index.get_value(99), Err(Error::UnknownIdentifier(99)));
}

#[test]
fn test_invalid_search_arguments() {
    let index = two_points();
    let query = [1.0, 1.0];

    for (k, budget, max_distance) in [
        (0, 10, f64::MAX),
        (5, 4, f64::MAX),
        (1, 10, f64::NAN),
        (1, 10, -0.5),
    ] {
        let result = index.find_top_k(k, &query, budget, max_distance);
        assert!(
            matches!(result, Err(Error::InvalidArgument(_))),
            "k={k} budget={budget} max_distance={max_distance}"
        );
    }
}

#[test]
fn test_negative_max_distance_allowed_for_inner_product() {
    let index = AnnBm::new(2, params(DistanceMetric::InnerProduct)).expect("valid params");
    index.set_value(0, &[1.0, 0.0]).expect("insert");
    index.set_value(1, &[3.0, 0.0]).expect("insert");

    let hits = index.find_top_k(2, &[1.0, 0.0], 10, -2.0).expect("search");

    assert_eq!(lids(&hits), vec![1]);
    assert!((hits[0].distance + 3.0).abs() < 1e-6);
}

// =========================================================================
// Overwrite and point reads
// =========================================================================

#[test]
fn test_get_value_returns_stored_vector() {
    let index = two_points();

    assert_eq!(index.get_value(1).expect("present"), vec![10.0, 10.0]);
}

#[test]
fn test_overwrite_replaces_vector_and_position() {
    let index = two_points();

    index.set_value(0, &[20.0, 20.0]).expect("overwrite");

    assert_eq!(index.num_docs(), 2);
    assert_eq!(index.get_value(0).expect("present"), vec![20.0, 20.0]);
    let hits = index.find_top_k(2, &[1.0, 1.0], 10, f64::MAX).expect("search");
    assert_eq!(lids(&hits), vec![1, 0]);
}

#[test]
fn test_sparse_identifiers() {
    let index = AnnBm::new(1, params(DistanceMetric::Euclidean)).expect("valid params");

    index.set_value(u32::MAX, &[1.0]).expect("insert");
    index.set_value(7, &[2.0]).expect("insert");

    assert!(index.contains(u32::MAX));
    assert!(!index.contains(0));
    let hits = index.find_top_k(2, &[0.0], 2, f64::MAX).expect("search");
    assert_eq!(lids(&hits), vec![u32::MAX, 7]);
}

// =========================================================================
// Metrics and ordering
// =========================================================================

#[test]
fn test_inner_product_orders_by_descending_dot() {
    let index = AnnBm::new(2, params(DistanceMetric::InnerProduct)).expect("valid params");
    index.set_value(0, &[1.0, 0.0]).expect("insert");
    index.set_value(1, &[5.0, 0.0]).expect("insert");
    index.set_value(2, &[2.0, 0.0]).expect("insert");

    let hits = index.find_top_k(3, &[1.0, 0.0], 10, f64::MAX).expect("search");

    assert_eq!(lids(&hits), vec![1, 2, 0]);
    assert!((hits[0].distance + 5.0).abs() < 1e-6);
}

#[test]
fn test_angular_zero_vector() {
    let index = AnnBm::new(2, params(DistanceMetric::Angular)).expect("valid params");
    index.set_value(0, &[0.0, 0.0]).expect("insert");
    index.set_value(1, &[1.0, 1.0]).expect("insert");

    let hits = index.find_top_k(2, &[2.0, 2.0], 10, f64::MAX).expect("search");

    assert_eq!(lids(&hits), vec![1, 0]);
    assert!(hits[0].distance.abs() < 1e-6);
    assert!((hits[1].distance - 1.0).abs() < 1e-6);
}

#[test]
fn test_hamming_counts_components() {
    let index = AnnBm::new(3, params(DistanceMetric::Hamming)).expect("valid params");
    index.set_value(0, &[1.0, 0.0, 1.0]).expect("insert");
    index.set_value(1, &[0.0, 0.0, 0.0]).expect("insert");

    let hits = index.find_top_k(2, &[1.0, 1.0, 1.0], 10, f64::MAX).expect("search");

    assert_eq!(lids(&hits), vec![0, 1]);
    assert!((hits[0].distance - 1.0).abs() < f64::EPSILON);
    assert!((hits[1].distance - 3.0).abs() < f64::EPSILON);
}

#[test]
fn test_ties_broken_by_identifier() {
    let index = AnnBm::new(1, params(DistanceMetric::Euclidean)).expect("valid params");
    index.set_value(9, &[1.0]).expect("insert");
    index.set_value(3, &[-1.0]).expect("insert");
    index.set_value(5, &[1.0]).expect("insert");

    let hits = index.find_top_k(3, &[0.0], 10, f64::MAX).expect("search");

    assert_eq!(lids(&hits), vec![3, 5, 9]);
}

#[test]
fn test_disabled_sort_keeps_graph_order() {
    let index = AnnBm::new(1, params(DistanceMetric::Euclidean)).expect("valid params");
    index.set_value(9, &[1.0]).expect("insert");
    index.set_value(3, &[-1.0]).expect("insert");
    index.set_enable_sort(false);

    let hits = index.find_top_k(2, &[0.0], 10, f64::MAX).expect("search");

    // Equal distances stay in insertion order
    assert_eq!(lids(&hits), vec![9, 3]);
}

#[test]
fn test_exact_search_matches_scenario() {
    let index = two_points();

    let hits = index.find_top_k_exact(2, &[9.0, 9.0], f64::MAX).expect("search");

    assert_eq!(lids(&hits), vec![1, 0]);
}

// =========================================================================
// Introspection
// =========================================================================

#[test]
fn test_links_and_stats() {
    let index = two_points();

    assert_eq!(index.links(0, 0), Some(vec![1]));
    assert_eq!(index.links(1, 0), Some(vec![0]));
    assert_eq!(index.links(42, 0), None);

    let stats = index.graph_stats();
    assert_eq!(stats.node_count, 2);
    assert!(stats.total_links >= 2);
    assert_eq!(stats.asymmetric_links, 0);
}

#[test]
fn test_index_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AnnBm>();
}

#[test]
fn test_stats_and_hits_serialize() {
    let index = two_points();
    let hits = index.find_top_k(1, &[0.0, 0.0], 4, f64::MAX).expect("search");

    let stats_json = serde_json::to_value(index.graph_stats()).expect("serialize");
    let hits_json = serde_json::to_string(&hits).expect("serialize");

    assert_eq!(stats_json["node_count"], 2);
    assert_eq!(hits_json, r#"[{"lid":0,"distance":0.0}]"#);
}

#[test]
fn test_two_points_with_k_above_size() {
    let index = two_points();

    let near_origin = index.find_top_k(10, &[1.0, 1.0], 210, 1e300).expect("search");
    let near_corner = index.find_top_k(10, &[9.0, 9.0], 210, 1e300).expect("search");

    assert_eq!(lids(&near_origin), vec![0, 1]);
    assert_eq!(lids(&near_corner), vec![1, 0]);
}
