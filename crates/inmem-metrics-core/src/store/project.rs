use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;

use crate::error::{MetricsError, Result};
use crate::model::{MetricType, MetricValue, Tagset, Timestamp, ValueBag};

/// Cells of one series at one timestamp: metric name -> value.
pub(crate) type SeriesCells = DashMap<String, MetricValue>;

/// One metric of one series across time.
type SeriesKey = (Tagset, String);

/// Everything stored at one timestamp of one project.
#[derive(Default)]
pub(crate) struct TimeSlot {
    series: DashMap<Tagset, Arc<SeriesCells>>,
}

impl TimeSlot {
    /// Cells of `tagset`, created on first use.
    pub(crate) fn cells(&self, tagset: &Tagset) -> Arc<SeriesCells> {
        if let Some(cells) = self.series.get(tagset) {
            return Arc::clone(cells.value());
        }
        Arc::clone(self.series.entry(tagset.clone()).or_default().value())
    }

    pub(crate) fn value(&self, tagset: &Tagset, metric: &str) -> Option<MetricValue> {
        let cells = self.series.get(tagset).map(|c| Arc::clone(c.value()))?;
        let value = cells.get(metric).map(|v| *v.value());
        value
    }

    /// Copy out every non-empty series, ordered by tagset.
    pub(crate) fn snapshot(&self) -> Vec<(Tagset, ValueBag)> {
        let series: Vec<(Tagset, Arc<SeriesCells>)> = self
            .series
            .iter()
            .map(|e| (e.key().clone(), Arc::clone(e.value())))
            .collect();

        let mut out: Vec<(Tagset, ValueBag)> = series
            .into_iter()
            .map(|(tags, cells)| {
                let bag: ValueBag = cells
                    .iter()
                    .map(|c| (c.key().clone(), *c.value()))
                    .collect();
                (tags, bag)
            })
            .filter(|(_, bag)| !bag.is_empty())
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

/// Per-project index: ordered timeline, per-series timestamp index and the
/// write-once metadata catalog.
///
/// Lock discipline: the timeline lock is only held to look up or insert slot
/// handles, never while a cell is being read or written. A series index entry
/// is only held for one ordered-set lookup or insert.
#[derive(Default)]
pub(crate) struct ProjectIndex {
    timeline: RwLock<BTreeMap<Timestamp, Arc<TimeSlot>>>,
    series: DashMap<SeriesKey, BTreeSet<Timestamp>>,
    catalog: RwLock<BTreeMap<String, MetricType>>,
}

impl ProjectIndex {
    pub(crate) fn slot_or_create(&self, ts: Timestamp) -> Arc<TimeSlot> {
        if let Some(slot) = self
            .timeline
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&ts)
        {
            return Arc::clone(slot);
        }
        let mut timeline = self.timeline.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(timeline.entry(ts).or_default())
    }

    /// Slots with `from <= ts <= to`, ascending.
    pub(crate) fn slots_in(&self, from: Timestamp, to: Timestamp) -> Vec<(Timestamp, Arc<TimeSlot>)> {
        if from > to {
            return Vec::new();
        }
        self.timeline
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .range(from..=to)
            .map(|(ts, slot)| (*ts, Arc::clone(slot)))
            .collect()
    }

    /// Note that `(tagset, metric)` now holds a value at `ts`.
    pub(crate) fn record(&self, ts: Timestamp, tagset: &Tagset, metric: &str) {
        self.series
            .entry((tagset.clone(), metric.to_string()))
            .or_default()
            .insert(ts);
    }

    /// Value of `(tagset, metric)` at the latest timestamp strictly before
    /// `ts` that holds one.
    pub(crate) fn predecessor_value(
        &self,
        ts: Timestamp,
        tagset: &Tagset,
        metric: &str,
    ) -> Option<MetricValue> {
        let key = (tagset.clone(), metric.to_string());
        let at = self.series.get(&key)?.range(..ts).next_back().copied()?;
        let slot = self
            .timeline
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&at)
            .map(Arc::clone)?;
        slot.value(tagset, metric)
    }

    pub(crate) fn metadata(&self, metric: &str) -> Option<MetricType> {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(metric)
            .copied()
    }

    /// Check-then-set one declaration. Returns `true` when newly inserted.
    pub(crate) fn declare(&self, metric: &str, ty: MetricType) -> Result<bool> {
        let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        match catalog.get(metric) {
            Some(existing) if *existing == ty => Ok(false),
            Some(existing) => Err(MetricsError::redeclared(metric, *existing, ty)),
            None => {
                catalog.insert(metric.to_string(), ty);
                Ok(true)
            }
        }
    }

    /// Check every declaration, then insert the new ones, under one write
    /// lock. On conflict nothing is inserted. Returns the number inserted.
    pub(crate) fn declare_all(&self, declarations: &BTreeMap<String, MetricType>) -> Result<usize> {
        let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        for (metric, ty) in declarations {
            if let Some(existing) = catalog.get(metric) {
                if existing != ty {
                    return Err(MetricsError::redeclared(metric, *existing, *ty));
                }
            }
        }
        let mut inserted = 0;
        for (metric, ty) in declarations {
            if !catalog.contains_key(metric) {
                catalog.insert(metric.clone(), *ty);
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    pub(crate) fn metric_names(&self) -> BTreeSet<String> {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}
