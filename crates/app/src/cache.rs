//! Reading cache — the latest *valid* reading of every sensor.

use std::collections::{BTreeMap, HashMap};

use domotik_domain::id::DeviceId;
use domotik_domain::reading::Reading;

/// Currently trusted readings, one per sensor.
///
/// Only the registry's poll writes here: a valid reading replaces the
/// entry, an invalid one evicts it. No invalid reading is ever resident.
#[derive(Debug, Default, Clone)]
pub struct ReadingCache {
    entries: HashMap<DeviceId, Reading>,
}

impl ReadingCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn update(&mut self, reading: Reading) {
        if reading.is_valid() {
            self.entries.insert(reading.sensor_id.clone(), reading);
        } else if self.entries.remove(&reading.sensor_id).is_some() {
            tracing::debug!(sensor_id = %reading.sensor_id, "evicted cached reading");
        }
    }

    #[must_use]
    pub fn get(&self, sensor_id: &str) -> Option<&Reading> {
        self.entries.get(sensor_id)
    }

    /// Owned copy ordered by sensor id.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<DeviceId, Reading> {
        self.entries
            .iter()
            .map(|(id, reading)| (id.clone(), reading.clone()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domotik_domain::reading::{Measurement, SensorKind};

    fn gas(level: f32, at: u64) -> Reading {
        Reading::valid(DeviceId::new("gas1"), at, Measurement::Gas { level })
    }

    #[test]
    fn should_store_valid_reading() {
        let mut cache = ReadingCache::new();
        cache.update(gas(120.0, 0));
        assert_eq!(cache.get("gas1").map(|r| r.timestamp), Some(0));
    }

    #[test]
    fn should_overwrite_with_newer_reading() {
        let mut cache = ReadingCache::new();
        cache.update(gas(120.0, 0));
        cache.update(gas(130.0, 1_000));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("gas1").map(|r| r.timestamp), Some(1_000));
    }

    #[test]
    fn should_evict_on_invalid_reading() {
        let mut cache = ReadingCache::new();
        cache.update(gas(120.0, 0));
        cache.update(Reading::invalid(DeviceId::new("gas1"), SensorKind::Gas, 1_000));
        assert!(cache.get("gas1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn should_never_insert_invalid_reading() {
        let mut cache = ReadingCache::new();
        cache.update(Reading::invalid(DeviceId::new("gas1"), SensorKind::Gas, 0));
        assert!(cache.is_empty());
    }

    #[test]
    fn should_snapshot_in_id_order() {
        let mut cache = ReadingCache::new();
        cache.update(Reading::valid(
            DeviceId::new("pir1"),
            0,
            Measurement::Motion { detected: true },
        ));
        cache.update(gas(10.0, 0));
        let ids: Vec<_> = cache.snapshot().into_keys().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["gas1", "pir1"]);
    }
}
