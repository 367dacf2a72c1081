//! MetricStore: the concurrent in-memory index.
//!
//! Layout, outermost first:
//! - `project -> ProjectIndex` (`DashMap`)
//! - `timestamp -> TimeSlot` (ordered `BTreeMap` behind a `RwLock`)
//! - `tagset -> cells` (`DashMap`)
//! - `metric name -> value` (`DashMap`, one entry per cell)
//!
//! Beside the timeline each project keeps `(tagset, metric) -> timestamps`,
//! the set of timestamps where that series holds a value, so a predecessor is
//! one ordered lookup rather than a walk back through the timeline.
//!
//! Locks are taken in that order. A cell's read-modify-write runs inside its
//! `DashMap` entry guard; the only accesses made while holding it are one
//! series index lookup and a read of an *earlier* timestamp's cell, so guards
//! nest in descending time order and cannot form a cycle. The series index is
//! updated after the cell guard is released.

mod project;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{MetricsError, Result};
use crate::model::{MetricType, MetricValue, Tagset, Timestamp, ValueBag};

use project::ProjectIndex;

/// One timestamp of a range scan: every series stored there.
pub type ScanRow = (Timestamp, Vec<(Tagset, ValueBag)>);

#[derive(Default)]
pub struct MetricStore {
    projects: DashMap<String, Arc<ProjectIndex>>,
}

impl MetricStore {
    pub fn new() -> Self {
        Self {
            projects: DashMap::new(),
        }
    }

    fn project(&self, project: &str) -> Option<Arc<ProjectIndex>> {
        self.projects.get(project).map(|p| Arc::clone(p.value()))
    }

    fn project_or_create(&self, project: &str) -> Arc<ProjectIndex> {
        if let Some(index) = self.project(project) {
            return index;
        }
        Arc::clone(self.projects.entry(project.to_string()).or_default().value())
    }

    pub fn contains_project(&self, project: &str) -> bool {
        self.projects.contains_key(project)
    }

    /// Overwrite one cell, creating index levels as needed. Returns the value
    /// now stored.
    pub fn put(
        &self,
        project: &str,
        ts: Timestamp,
        tagset: &Tagset,
        metric: &str,
        value: MetricValue,
    ) -> MetricValue {
        self.update(project, ts, tagset, metric, |_| value)
    }

    /// Atomic read-modify-write of one cell.
    ///
    /// `f` receives the current value (if any) and returns the value to store.
    /// It runs while the cell is locked; it may read cells at earlier
    /// timestamps but must not touch this cell's timestamp.
    pub fn update<F>(
        &self,
        project: &str,
        ts: Timestamp,
        tagset: &Tagset,
        metric: &str,
        f: F,
    ) -> MetricValue
    where
        F: FnOnce(Option<MetricValue>) -> MetricValue,
    {
        let index = self.project_or_create(project);
        let cells = index.slot_or_create(ts).cells(tagset);
        let (next, created) = match cells.entry(metric.to_string()) {
            Entry::Occupied(mut cell) => {
                let next = f(Some(*cell.get()));
                cell.insert(next);
                (next, false)
            }
            Entry::Vacant(cell) => {
                let next = f(None);
                cell.insert(next);
                (next, true)
            }
        };
        if created {
            index.record(ts, tagset, metric);
        }
        next
    }

    pub fn get_metadata(&self, project: &str, metric: &str) -> Option<MetricType> {
        self.project(project)?.metadata(metric)
    }

    /// Declare `metric` as `ty`. Identical redeclaration is a no-op (`false`);
    /// a differing one is a `MetadataConflict`.
    pub fn declare_metadata(&self, project: &str, metric: &str, ty: MetricType) -> Result<bool> {
        self.project_or_create(project).declare(metric, ty)
    }

    /// Declare a batch atomically: either every entry is accepted or none is.
    /// Creates the project. Returns the number of newly declared metrics.
    pub fn declare_all(
        &self,
        project: &str,
        declarations: &BTreeMap<String, MetricType>,
    ) -> Result<usize> {
        self.project_or_create(project).declare_all(declarations)
    }

    /// Timestamps in `[from, to]` ascending, each with its series.
    pub fn range_scan(&self, project: &str, from: Timestamp, to: Timestamp) -> Result<Vec<ScanRow>> {
        let index = self.project(project).ok_or_else(|| {
            MetricsError::NotFound(format!("no metrics stored for project '{project}'"))
        })?;
        Ok(index
            .slots_in(from, to)
            .into_iter()
            .map(|(ts, slot)| (ts, slot.snapshot()))
            .collect())
    }

    /// Value of the same series/metric at the latest earlier timestamp that
    /// holds one.
    pub fn predecessor_value(
        &self,
        project: &str,
        ts: Timestamp,
        tagset: &Tagset,
        metric: &str,
    ) -> Option<MetricValue> {
        self.project(project)?.predecessor_value(ts, tagset, metric)
    }

    pub fn list_projects(&self) -> BTreeSet<String> {
        self.projects.iter().map(|p| p.key().clone()).collect()
    }

    /// Declared metric names; empty for an unknown project.
    pub fn list_metric_names(&self, project: &str) -> BTreeSet<String> {
        self.project(project)
            .map(|p| p.metric_names())
            .unwrap_or_default()
    }
}
