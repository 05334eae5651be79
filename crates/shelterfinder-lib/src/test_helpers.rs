// Test-only helpers for `shelterfinder-lib` unit tests
#![allow(dead_code)]
use crate::catalog::{ShelterRecord, DEFAULT_ACCEPTED_GROUP};

/// Builder to create `ShelterRecord` instances in tests with sensible defaults.
pub struct ShelterBuilder {
    record: ShelterRecord,
}

impl ShelterBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            record: ShelterRecord {
                name: name.to_string(),
                address: format!("{name} address"),
                lat: 0.0,
                lng: 0.0,
                accepted_group: DEFAULT_ACCEPTED_GROUP.to_string(),
                remarks: None,
                distance_km: None,
            },
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.record.lat = lat;
        self.record.lng = lng;
        self
    }

    pub fn address(mut self, address: &str) -> Self {
        self.record.address = address.to_string();
        self
    }

    pub fn remarks(mut self, remarks: &str) -> Self {
        self.record.remarks = Some(remarks.to_string());
        self
    }

    pub fn build(self) -> ShelterRecord {
        self.record
    }
}
