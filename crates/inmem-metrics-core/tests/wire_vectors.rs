//! JSON vectors for the request and response shapes.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use inmem_metrics_core::model::{
    MetricType, MetricValue, MultipleMetricsStoreRequest, MultipleMetricsTimeRangeQuery,
};
use inmem_metrics_core::MetricsService;

fn load(name: &str) -> String {
    fs::read_to_string(format!("tests/vectors/{name}")).unwrap()
}

#[test]
fn parse_store_request() {
    let req: MultipleMetricsStoreRequest = serde_json::from_str(&load("store_request.json")).unwrap();
    assert_eq!(req.project, "project1");
    assert_eq!(req.timestamp.to_rfc3339(), "2022-05-27T07:32:00+00:00");
    assert_eq!(req.metadata_map["metric1"].metric_type, MetricType::Counter);
    assert_eq!(req.metadata_map["load"].metric_type, MetricType::Gauge);
    assert_eq!(req.metrics_values.len(), 2);
    assert_eq!(req.metrics_values[0].tags.get("region"), Some("us"));
    assert_eq!(req.metrics_values[0].values["metric1"], MetricValue::Integer(125));
    assert_eq!(req.metrics_values[0].values["load"], MetricValue::Float(0.75));
}

#[test]
fn unknown_metric_type_fails_to_parse() {
    let err = serde_json::from_str::<MultipleMetricsStoreRequest>(&load("store_request_bad_type.json"))
        .unwrap_err();
    assert!(err.to_string().contains("HISTOGRAM"));
}

#[test]
fn unknown_fields_are_rejected() {
    let raw = r#"{"project":"p","timestamp":"2022-05-27T07:32:00Z","metadata":{}}"#;
    assert!(serde_json::from_str::<MultipleMetricsStoreRequest>(raw).is_err());
}

#[test]
fn missing_time_bound_fails_to_parse() {
    let raw = r#"{"project":"p","timeFrom":"2022-05-27T07:32:00Z","metricNames":["m"]}"#;
    assert!(serde_json::from_str::<MultipleMetricsTimeRangeQuery>(raw).is_err());
}

#[test]
fn stored_vector_answers_range_query_vector() {
    let svc = MetricsService::default();
    let req: MultipleMetricsStoreRequest = serde_json::from_str(&load("store_request.json")).unwrap();
    svc.store_metrics(&req).unwrap();

    let q: MultipleMetricsTimeRangeQuery = serde_json::from_str(&load("range_query.json")).unwrap();
    let batch = svc.query(&q).unwrap();

    let json = serde_json::to_value(&batch).unwrap();
    assert_eq!(json["metricsMetadata"]["metric1"]["metricType"], "COUNTER");
    assert_eq!(json["metricsMetadata"].as_object().unwrap().len(), 1);
    assert_eq!(json["metricsValues"].as_array().unwrap().len(), 1);
    assert_eq!(json["metricsValues"][0]["tags"]["svc"], "svc1");
    assert_eq!(json["metricsValues"][0]["time"], "2022-05-27T07:32:00Z");
    assert_eq!(json["metricsValues"][0]["values"]["metric1"], 125);
    assert!(json["metricsValues"][0]["values"].get("load").is_none());
}
