//! Concurrent writers on shared cells and metadata.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use common::{range, store_one, tags};
use inmem_metrics_core::model::{MetricType, MetricValue};
use inmem_metrics_core::{ErrorCode, MetricsService};

const THREADS: usize = 8;
const WRITES: usize = 250;

#[test]
fn same_cell_counter_writes_sum_exactly() {
    let svc = MetricsService::default();
    let a = tags(&[("svc", "a")]);
    let decl = [("hits", MetricType::Counter)];

    std::thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..WRITES {
                    let req = store_one("p1", 100, &decl, a.clone(), &[("hits", MetricValue::Integer(1))]);
                    svc.store_metrics(&req).unwrap();
                }
            });
        }
    });

    let batch = svc.query(&range("p1", 100, 100, &["hits"], &[])).unwrap();
    assert_eq!(
        batch.metrics_values[0].values["hits"],
        MetricValue::Integer((THREADS * WRITES) as i64)
    );
}

#[test]
fn concurrent_writers_across_timestamps_keep_the_counter_monotonic() {
    let svc = MetricsService::default();
    let a = tags(&[("svc", "a")]);
    let decl = [("hits", MetricType::Counter)];

    std::thread::scope(|s| {
        for worker in 0..THREADS {
            let svc = &svc;
            let a = a.clone();
            s.spawn(move || {
                for i in 0..WRITES {
                    let at = (i * THREADS + worker) as i64;
                    let req = store_one("p1", at, &decl, a.clone(), &[("hits", MetricValue::Integer(1))]);
                    svc.store_metrics(&req).unwrap();
                }
            });
        }
    });

    let batch = svc
        .query(&range("p1", 0, (THREADS * WRITES) as i64, &["hits"], &[]))
        .unwrap();
    assert_eq!(batch.metrics_values.len(), THREADS * WRITES);
    for group in &batch.metrics_values {
        match group.values["hits"] {
            MetricValue::Integer(v) => assert!(v >= 1),
            other => panic!("unexpected value shape: {other:?}"),
        }
    }
}

#[test]
fn racing_first_declarations_admit_exactly_one_type() {
    let svc = MetricsService::default();
    let conflicts = AtomicUsize::new(0);

    std::thread::scope(|s| {
        for worker in 0..THREADS {
            let svc = &svc;
            let conflicts = &conflicts;
            s.spawn(move || {
                let ty = if worker % 2 == 0 {
                    MetricType::Counter
                } else {
                    MetricType::Gauge
                };
                let req = store_one("p1", 100, &[("m", ty)], tags(&[]), &[]);
                if let Err(err) = svc.store_metrics(&req) {
                    assert_eq!(err.code(), ErrorCode::Conflict);
                    conflicts.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    let winner = svc.store().get_metadata("p1", "m").unwrap();
    let expected_losers = if winner == MetricType::Counter {
        THREADS / 2
    } else {
        THREADS - THREADS / 2
    };
    assert_eq!(conflicts.load(Ordering::Relaxed), expected_losers);
}
