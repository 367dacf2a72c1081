//! MetricStore primitives used directly, without the ingest pipeline.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::collections::BTreeMap;

use common::{tags, ts};
use inmem_metrics_core::model::{MetricType, MetricValue, Tagset};
use inmem_metrics_core::{MetricStore, MetricsError};

#[test]
fn put_creates_levels_and_returns_stored_value() {
    let store = MetricStore::new();
    let a = tags(&[("svc", "a")]);

    let v = store.put("p1", ts(10), &a, "cpu", MetricValue::Integer(3));
    assert_eq!(v, MetricValue::Integer(3));
    assert!(store.contains_project("p1"));

    let rows = store.range_scan("p1", ts(10), ts(10)).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, ts(10));
    assert_eq!(rows[0].1[0].0, a);
    assert_eq!(rows[0].1[0].1["cpu"], MetricValue::Integer(3));
}

#[test]
fn update_sees_current_value() {
    let store = MetricStore::new();
    let a = tags(&[("svc", "a")]);

    store.put("p1", ts(10), &a, "cpu", MetricValue::Integer(3));
    let next = store.update("p1", ts(10), &a, "cpu", |cur| {
        assert_eq!(cur, Some(MetricValue::Integer(3)));
        MetricValue::Integer(8)
    });
    assert_eq!(next, MetricValue::Integer(8));
}

#[test]
fn range_scan_of_unknown_project_is_not_found() {
    let store = MetricStore::new();
    let err = store.range_scan("ghost", ts(0), ts(10)).unwrap_err();
    assert!(matches!(err, MetricsError::NotFound(_)));
}

#[test]
fn range_scan_is_ascending_and_inclusive() {
    let store = MetricStore::new();
    let a = tags(&[("svc", "a")]);
    for t in [30, 10, 20, 40] {
        store.put("p1", ts(t), &a, "g", MetricValue::Float(t as f64));
    }
    let times: Vec<_> = store
        .range_scan("p1", ts(10), ts(30))
        .unwrap()
        .into_iter()
        .map(|(t, _)| t)
        .collect();
    assert_eq!(times, vec![ts(10), ts(20), ts(30)]);

    assert!(store.range_scan("p1", ts(30), ts(10)).unwrap().is_empty());
}

#[test]
fn predecessor_is_strictly_earlier() {
    let store = MetricStore::new();
    let a = tags(&[("svc", "a")]);
    store.put("p1", ts(10), &a, "cpu", MetricValue::Integer(1));
    store.put("p1", ts(20), &a, "cpu", MetricValue::Integer(2));

    assert_eq!(store.predecessor_value("p1", ts(20), &a, "cpu"), Some(MetricValue::Integer(1)));
    assert_eq!(store.predecessor_value("p1", ts(25), &a, "cpu"), Some(MetricValue::Integer(2)));
    assert_eq!(store.predecessor_value("p1", ts(10), &a, "cpu"), None);
    assert_eq!(store.predecessor_value("p1", ts(20), &a, "mem"), None);
    assert_eq!(store.predecessor_value("p2", ts(20), &a, "cpu"), None);
}

#[test]
fn predecessor_searches_past_many_unrelated_timestamps() {
    let store = MetricStore::new();
    let a = tags(&[("svc", "a")]);
    let b = tags(&[("svc", "b")]);
    store.put("p1", ts(0), &a, "cpu", MetricValue::Integer(42));
    for t in 1..=200 {
        store.put("p1", ts(t), &b, "cpu", MetricValue::Integer(t));
    }
    assert_eq!(store.predecessor_value("p1", ts(500), &a, "cpu"), Some(MetricValue::Integer(42)));
}

#[test]
fn predecessor_tracks_cells_written_out_of_order() {
    let store = MetricStore::new();
    let a = tags(&[("svc", "a")]);
    store.put("p1", ts(30), &a, "cpu", MetricValue::Integer(3));
    store.put("p1", ts(10), &a, "cpu", MetricValue::Integer(1));
    store.put("p1", ts(20), &a, "mem", MetricValue::Integer(9));

    assert_eq!(store.predecessor_value("p1", ts(10), &a, "cpu"), None);
    assert_eq!(store.predecessor_value("p1", ts(20), &a, "cpu"), Some(MetricValue::Integer(1)));
    assert_eq!(store.predecessor_value("p1", ts(31), &a, "cpu"), Some(MetricValue::Integer(3)));
    assert_eq!(store.predecessor_value("p1", ts(31), &a, "mem"), Some(MetricValue::Integer(9)));
}

#[test]
fn tagsets_compare_as_sets() {
    let store = MetricStore::new();
    let ab = Tagset::new().with("svc", "a").with("region", "us");
    let ba = Tagset::new().with("region", "us").with("svc", "a");
    store.put("p1", ts(10), &ab, "g", MetricValue::Float(1.0));
    store.put("p1", ts(10), &ba, "g", MetricValue::Float(2.0));

    let rows = store.range_scan("p1", ts(10), ts(10)).unwrap();
    assert_eq!(rows[0].1.len(), 1);
    assert_eq!(rows[0].1[0].1["g"], MetricValue::Float(2.0));
}

#[test]
fn declare_metadata_is_write_once() {
    let store = MetricStore::new();
    assert!(store.declare_metadata("p1", "m", MetricType::Counter).unwrap());
    assert!(!store.declare_metadata("p1", "m", MetricType::Counter).unwrap());
    let err = store.declare_metadata("p1", "m", MetricType::Gauge).unwrap_err();
    assert!(matches!(err, MetricsError::MetadataConflict { .. }));
    assert_eq!(store.get_metadata("p1", "m"), Some(MetricType::Counter));
}

#[test]
fn declare_all_is_all_or_nothing() {
    let store = MetricStore::new();
    store.declare_metadata("p1", "m", MetricType::Counter).unwrap();

    let batch: BTreeMap<String, MetricType> = [
        ("a".to_string(), MetricType::Gauge),
        ("m".to_string(), MetricType::Gauge),
    ]
    .into_iter()
    .collect();
    assert!(store.declare_all("p1", &batch).is_err());
    assert_eq!(store.get_metadata("p1", "a"), None);

    let ok: BTreeMap<String, MetricType> = [
        ("a".to_string(), MetricType::Gauge),
        ("m".to_string(), MetricType::Counter),
    ]
    .into_iter()
    .collect();
    assert_eq!(store.declare_all("p1", &ok).unwrap(), 1);
}

#[test]
fn listings() {
    let store = MetricStore::new();
    assert!(store.list_projects().is_empty());
    assert!(store.list_metric_names("p1").is_empty());

    store.declare_metadata("p1", "x", MetricType::Gauge).unwrap();
    store.declare_metadata("p2", "y", MetricType::Gauge).unwrap();
    assert_eq!(store.list_projects().into_iter().collect::<Vec<_>>(), vec!["p1", "p2"]);
    assert_eq!(store.list_metric_names("p2").into_iter().collect::<Vec<_>>(), vec!["y"]);
}
