//! Session configuration.
//!
//! Values come from, in order of precedence: explicit overrides applied by
//! the caller, `SHELTERFINDER_*` environment variables, then built-in
//! defaults.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::dataset::{resolve_dataset_source, DatasetSource};
use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::locale::Locale;

/// Iwate Prefectural Office, used when no live position is available.
pub const DEFAULT_POSITION: GeoPoint = GeoPoint::new(39.7036, 141.1570);

/// Number of ranked shelters rendered per pass.
pub const MAX_SHELTERS_TO_SHOW: usize = 20;

/// Bound on a single position request.
pub const LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_LAT_ENV: &str = "SHELTERFINDER_DEFAULT_LAT";
pub const DEFAULT_LNG_ENV: &str = "SHELTERFINDER_DEFAULT_LNG";
pub const MAX_SHELTERS_ENV: &str = "SHELTERFINDER_MAX_SHELTERS";
pub const LOCALE_ENV: &str = "SHELTERFINDER_LOCALE";

/// Zoom levels used for the different map views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomLevels {
    /// Overview shown before the user position is known.
    pub initial: u8,
    /// View centered on the user.
    pub user: u8,
    /// Close-up when a shelter is selected from the list.
    pub focus: u8,
}

impl Default for ZoomLevels {
    fn default() -> Self {
        Self {
            initial: 10,
            user: 14,
            focus: 16,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dataset: DatasetSource,
    pub default_position: GeoPoint,
    /// Human-readable name of the fallback area, used in the degraded status.
    pub default_area: Option<String>,
    pub max_shelters: usize,
    pub zoom: ZoomLevels,
    pub locate_timeout: Duration,
    pub locale: Locale,
}

impl AppConfig {
    /// Configuration with built-in defaults for the given dataset.
    pub fn new(dataset: DatasetSource) -> Self {
        Self {
            dataset,
            default_position: DEFAULT_POSITION,
            default_area: None,
            max_shelters: MAX_SHELTERS_TO_SHOW,
            zoom: ZoomLevels::default(),
            locate_timeout: LOCATE_TIMEOUT,
            locale: Locale::default(),
        }
    }

    /// Build a configuration from the environment.
    ///
    /// `dataset` takes precedence over `SHELTERFINDER_DATASET`.
    pub fn from_env(dataset: Option<&str>) -> Result<Self> {
        let mut config = Self::new(resolve_dataset_source(dataset)?);

        let lat = env_value::<f64>(DEFAULT_LAT_ENV)?;
        let lng = env_value::<f64>(DEFAULT_LNG_ENV)?;
        match (lat, lng) {
            (Some(lat), Some(lng)) => config.default_position = GeoPoint::new(lat, lng),
            (None, None) => {}
            _ => {
                return Err(Error::InvalidConfig {
                    message: format!(
                        "{DEFAULT_LAT_ENV} and {DEFAULT_LNG_ENV} must be set together"
                    ),
                })
            }
        }

        if let Some(limit) = env_value::<usize>(MAX_SHELTERS_ENV)? {
            config.max_shelters = limit;
        }
        if let Some(locale) = env::var(LOCALE_ENV).ok().filter(|v| !v.trim().is_empty()) {
            config.locale = locale.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_shelters == 0 {
            return Err(Error::InvalidConfig {
                message: "max shelters must be at least 1".to_string(),
            });
        }
        if !self.default_position.is_valid() {
            return Err(Error::InvalidConfig {
                message: format!(
                    "default position ({}, {}) is outside valid latitude/longitude ranges",
                    self.default_position.lat, self.default_position.lng
                ),
            });
        }
        Ok(())
    }

    /// Label for the fallback area in the configured locale.
    pub fn default_area_label(&self) -> String {
        if let Some(area) = &self.default_area {
            return area.clone();
        }
        if self.default_position == DEFAULT_POSITION {
            match self.locale {
                Locale::En => "the Iwate Prefectural Office".to_string(),
                Locale::Ja => "岩手県庁".to_string(),
            }
        } else {
            format!(
                "{:.4}, {:.4}",
                self.default_position.lat, self.default_position.lng
            )
        }
    }
}

fn env_value<T: FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    let Ok(raw) = env::var(name) else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|err| Error::InvalidConfig {
            message: format!("{name}={raw}: {err}"),
        })
}
