//! Single-shot user positioning.
//!
//! [`LocationResolver`] either yields a device fix or rejects with a
//! [`LocationError`]. Substituting a fallback position on rejection is left to
//! the caller.

use std::future::{self, Future};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::LOCATE_TIMEOUT;
use crate::error::LocationError;
use crate::geo::GeoPoint;

/// Options passed to the positioning capability on each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the capability may return. Zero disables caching.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: LOCATE_TIMEOUT,
            maximum_age: Duration::ZERO,
        }
    }
}

/// How the current user position was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSource {
    Device,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserPosition {
    #[serde(flatten)]
    pub point: GeoPoint,
    pub source: PositionSource,
}

impl UserPosition {
    pub fn device(point: GeoPoint) -> Self {
        Self {
            point,
            source: PositionSource::Device,
        }
    }

    pub fn fallback(point: GeoPoint) -> Self {
        Self {
            point,
            source: PositionSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == PositionSource::Fallback
    }
}

/// Device positioning capability.
pub trait LocationProvider {
    /// Whether the host offers positioning at all. Checked before every request.
    fn is_supported(&self) -> bool;

    /// Request one position fix.
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<GeoPoint, LocationError>>;
}

/// A provider that always reports the same position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation(pub GeoPoint);

impl LocationProvider for FixedLocation {
    fn is_supported(&self) -> bool {
        true
    }

    fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> impl Future<Output = Result<GeoPoint, LocationError>> {
        future::ready(Ok(self.0))
    }
}

/// A host without any positioning capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn is_supported(&self) -> bool {
        false
    }

    fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> impl Future<Output = Result<GeoPoint, LocationError>> {
        future::ready(Err(LocationError::Unsupported))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocationResolver {
    options: PositionOptions,
}

impl LocationResolver {
    pub fn new(options: PositionOptions) -> Self {
        Self { options }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(PositionOptions {
            timeout,
            ..PositionOptions::default()
        })
    }

    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    /// Resolve the device position once, bounded by the configured timeout.
    pub async fn resolve<P: LocationProvider>(
        &self,
        provider: &P,
    ) -> Result<GeoPoint, LocationError> {
        if !provider.is_supported() {
            warn!("geolocation capability unavailable");
            return Err(LocationError::Unsupported);
        }

        let request = provider.current_position(&self.options);
        let point = match tokio::time::timeout(self.options.timeout, request).await {
            Ok(Ok(point)) => point,
            Ok(Err(error)) => {
                warn!(%error, "position request failed");
                return Err(error);
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.options.timeout.as_secs(),
                    "position request timed out"
                );
                return Err(LocationError::Timeout {
                    timeout: self.options.timeout,
                });
            }
        };

        if !point.is_valid() {
            return Err(LocationError::Unavailable {
                message: format!(
                    "device reported invalid coordinates ({}, {})",
                    point.lat, point.lng
                ),
            });
        }

        debug!(lat = point.lat, lng = point.lng, "resolved device position");
        Ok(point)
    }
}
