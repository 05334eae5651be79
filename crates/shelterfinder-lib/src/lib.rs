//! Shelter finder library entry points.
//!
//! This crate loads an evacuation shelter dataset, resolves the user's
//! position (falling back to a fixed reference point), ranks shelters by
//! great-circle distance, and keeps map markers and list cards in sync.
//! Front ends supply the map, list and status surfaces and the positioning
//! capability; everything else lives here.
//!

#![deny(warnings)]

pub mod app;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod locale;
pub mod location;
pub mod memory;
pub mod output;
pub mod presentation;
pub mod ranking;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use app::{AppController, StartupReport};
pub use catalog::{ShelterDataset, ShelterRecord, DEFAULT_ACCEPTED_GROUP};
pub use config::{AppConfig, ZoomLevels, DEFAULT_POSITION, LOCATE_TIMEOUT, MAX_SHELTERS_TO_SHOW};
pub use dataset::{resolve_dataset_source, DatasetLoader, DatasetSource, DATASET_FILENAME};
pub use error::{Error, LocationError, Result};
pub use geo::{distance_km, GeoPoint, EARTH_RADIUS_KM};
pub use locale::Locale;
pub use location::{
    FixedLocation, LocationProvider, LocationResolver, NoLocation, PositionOptions,
    PositionSource, UserPosition,
};
pub use memory::{MemoryList, MemoryMap, MemoryStatus};
pub use output::SessionSnapshot;
pub use presentation::{
    ListSurface, MapSurface, MarkerId, MarkerKind, PresentationSync, ShelterCard, Status,
    StatusKind, StatusSurface,
};
pub use ranking::{rank_shelters, walking_minutes, RankedShelter, RankedView};
