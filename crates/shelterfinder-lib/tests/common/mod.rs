//! Shared fixtures, providers and helpers for integration tests.

use std::future::{self, Future};
use std::path::{Path, PathBuf};

use shelterfinder_lib::{
    AppConfig, AppController, DatasetSource, GeoPoint, LocationError, LocationProvider,
    MemoryList, MemoryMap, MemoryStatus, PositionOptions, EARTH_RADIUS_KM,
};

pub type TestController = AppController<MemoryMap, MemoryList, MemoryStatus>;

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Sample Morioka dataset: 8 rows, 6 with usable coordinates.
#[allow(dead_code)]
pub fn sample_dataset() -> PathBuf {
    fixtures_dir().join("shelters_sample.csv")
}

#[allow(dead_code)]
pub fn controller_for(dataset: DatasetSource) -> TestController {
    AppController::new(
        AppConfig::new(dataset),
        MemoryMap::default(),
        MemoryList::default(),
        MemoryStatus::default(),
    )
}

/// Point `km` kilometers due north of `origin` along its meridian.
#[allow(dead_code)]
pub fn north_of(origin: GeoPoint, km: f64) -> GeoPoint {
    GeoPoint::new(origin.lat + (km / EARTH_RADIUS_KM).to_degrees(), origin.lng)
}

/// Write a CSV with the standard Japanese header and the given data rows.
#[allow(dead_code)]
pub fn write_dataset(dir: &Path, rows: &[String]) -> PathBuf {
    let mut csv = String::from("施設・場所名,住所,緯度,経度,受入対象者,備考\n");
    for row in rows {
        csv.push_str(row);
        csv.push('\n');
    }
    let path = dir.join("03000_1.csv");
    std::fs::write(&path, csv).expect("write dataset");
    path
}

/// A device that accepts the request but never answers.
#[allow(dead_code)]
pub struct NeverAnswers;

impl LocationProvider for NeverAnswers {
    fn is_supported(&self) -> bool {
        true
    }

    fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> impl Future<Output = Result<GeoPoint, LocationError>> {
        future::pending()
    }
}

/// A device whose user refused location access.
#[allow(dead_code)]
pub struct Denied;

impl LocationProvider for Denied {
    fn is_supported(&self) -> bool {
        true
    }

    fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> impl Future<Output = Result<GeoPoint, LocationError>> {
        future::ready(Err(LocationError::PermissionDenied))
    }
}
