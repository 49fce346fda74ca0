//! Point-in-time aggregation of all data sources.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::identity::{SourceId, SourceKind, Timestamp};
use crate::record::Record;

/// One immutable aggregation of every configured source.
///
/// A missing field means "no data"; an id in `stale_sources` means the field
/// holds a cached record whose refresh failed. Renderers draw their own
/// indicators from those two facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    weather: Option<Record>,
    financial: Option<Record>,
    news: Option<Record>,
    calendar: Option<Record>,
    /// Sources without a dedicated slot, keyed by id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    extras: BTreeMap<SourceId, Record>,
    generated_at: Timestamp,
    stale_sources: BTreeSet<SourceId>,
}

impl Snapshot {
    /// Start assembling a snapshot stamped with `generated_at`.
    pub fn builder(generated_at: Timestamp) -> SnapshotBuilder {
        SnapshotBuilder {
            snapshot: Snapshot {
                weather: None,
                financial: None,
                news: None,
                calendar: None,
                extras: BTreeMap::new(),
                generated_at,
                stale_sources: BTreeSet::new(),
            },
        }
    }

    pub fn weather(&self) -> Option<&Record> {
        self.weather.as_ref()
    }

    pub fn financial(&self) -> Option<&Record> {
        self.financial.as_ref()
    }

    pub fn news(&self) -> Option<&Record> {
        self.news.as_ref()
    }

    pub fn calendar(&self) -> Option<&Record> {
        self.calendar.as_ref()
    }

    pub fn extras(&self) -> &BTreeMap<SourceId, Record> {
        &self.extras
    }

    pub fn generated_at(&self) -> Timestamp {
        self.generated_at
    }

    pub fn stale_sources(&self) -> &BTreeSet<SourceId> {
        &self.stale_sources
    }

    /// Look up any source's record by id.
    pub fn get(&self, id: &str) -> Option<&Record> {
        match SourceKind::from_id(id) {
            Some(SourceKind::Weather) => self.weather.as_ref(),
            Some(SourceKind::Financial) => self.financial.as_ref(),
            Some(SourceKind::News) => self.news.as_ref(),
            Some(SourceKind::Calendar) => self.calendar.as_ref(),
            None => self.extras.get(id),
        }
    }

    pub fn is_stale(&self, id: &str) -> bool {
        self.stale_sources.contains(id)
    }

    /// Number of sources that contributed a record.
    pub fn present_count(&self) -> usize {
        [&self.weather, &self.financial, &self.news, &self.calendar]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
            + self.extras.len()
    }
}

/// Write-once assembly of a [`Snapshot`].
#[derive(Debug)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    /// Place a record in the slot for `id`. A later insert for the same id wins.
    pub fn insert(&mut self, id: SourceId, record: Record) -> &mut Self {
        match id.kind() {
            Some(SourceKind::Weather) => self.snapshot.weather = Some(record),
            Some(SourceKind::Financial) => self.snapshot.financial = Some(record),
            Some(SourceKind::News) => self.snapshot.news = Some(record),
            Some(SourceKind::Calendar) => self.snapshot.calendar = Some(record),
            None => {
                self.snapshot.extras.insert(id, record);
            }
        }
        self
    }

    /// Insert a cached record that failed to refresh.
    pub fn insert_stale(&mut self, id: SourceId, record: Record) -> &mut Self {
        self.snapshot.stale_sources.insert(id.clone());
        self.insert(id, record)
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_builder_routes_well_known_and_extra_ids() {
        let mut builder = Snapshot::builder(Utc::now());
        builder
            .insert("weather".into(), Record::json(json!({"temp": 30})))
            .insert("tides".into(), Record::json(json!({"high": "06:12"})));
        let snapshot = builder.build();

        assert!(snapshot.weather().is_some());
        assert!(snapshot.news().is_none());
        assert_eq!(snapshot.extras().len(), 1);
        assert!(snapshot.get("tides").is_some());
        assert_eq!(snapshot.present_count(), 2);
        assert!(snapshot.stale_sources().is_empty());
    }

    #[test]
    fn test_insert_stale_marks_source() {
        let mut builder = Snapshot::builder(Utc::now());
        builder.insert_stale("news".into(), Record::json(json!([])));
        let snapshot = builder.build();

        assert!(snapshot.is_stale("news"));
        assert!(snapshot.news().is_some());
    }

    #[test]
    fn test_serialized_field_names() {
        let mut builder = Snapshot::builder(Utc::now());
        builder.insert_stale("calendar".into(), Record::json(json!({"weekday": "Friday"})));
        let value = serde_json::to_value(builder.build()).unwrap();

        assert!(value.get("weather").unwrap().is_null());
        assert_eq!(value["calendar"]["data"]["weekday"], "Friday");
        assert_eq!(value["stale_sources"], json!(["calendar"]));
        assert!(value.get("extras").is_none());
        assert!(value.get("generated_at").is_some());
    }
}
