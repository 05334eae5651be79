//! Session orchestration.
//!
//! [`AppController`] owns the shelter collection, the user position and the
//! three surfaces, and runs the startup sequence:
//! load dataset → create map → resolve position (fallback on failure) →
//! place user marker → rank → render.

use tracing::{info, warn};

use crate::catalog::ShelterRecord;
use crate::config::AppConfig;
use crate::dataset::DatasetLoader;
use crate::error::{Error, LocationError, Result};
use crate::geo::GeoPoint;
use crate::location::{LocationProvider, LocationResolver, PositionOptions, UserPosition};
use crate::output::SessionSnapshot;
use crate::presentation::{
    escape_html, ListSurface, MapSurface, MarkerId, MarkerKind, PresentationSync, Status,
    StatusSurface,
};
use crate::ranking::rank_shelters;

/// Outcome of [`AppController::start`].
#[derive(Debug, Clone, PartialEq)]
pub struct StartupReport {
    pub shelters_loaded: usize,
    pub rendered: usize,
    pub position: UserPosition,
    /// Why the device position was not used, when the fallback applied.
    pub location_error: Option<LocationError>,
}

impl StartupReport {
    pub fn is_degraded(&self) -> bool {
        self.position.is_fallback()
    }
}

#[derive(Debug, Default)]
struct SessionState {
    shelters: Vec<ShelterRecord>,
    position: Option<UserPosition>,
    user_marker: Option<MarkerId>,
    status: Option<Status>,
}

pub struct AppController<M, L, S> {
    config: AppConfig,
    map: M,
    list: L,
    status: S,
    presentation: PresentationSync,
    state: SessionState,
}

impl<M: MapSurface, L: ListSurface, S: StatusSurface> AppController<M, L, S> {
    pub fn new(config: AppConfig, map: M, list: L, status: S) -> Self {
        let presentation = PresentationSync::new(config.locale, config.zoom.focus);
        Self {
            config,
            map,
            list,
            status,
            presentation,
            state: SessionState::default(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn list(&self) -> &L {
        &self.list
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    pub fn presentation(&self) -> &PresentationSync {
        &self.presentation
    }

    pub fn shelters(&self) -> &[ShelterRecord] {
        &self.state.shelters
    }

    pub fn position(&self) -> Option<UserPosition> {
        self.state.position
    }

    /// Run the full startup sequence.
    ///
    /// Dataset errors are fatal: the error status is shown and nothing is
    /// placed on the map or list. Location errors fall back to the configured
    /// default position and only change the status text.
    pub async fn start<P: LocationProvider>(&mut self, provider: &P) -> Result<StartupReport> {
        let locale = self.config.locale;
        self.show(Status::info(locale.loading()));

        let shelters_loaded = match self.load_dataset().await {
            Ok(count) => count,
            Err(err) => {
                warn!(error = %err, "shelter dataset unavailable");
                self.show(Status::error(locale.fatal(&err)));
                return Err(err);
            }
        };

        self.map
            .create_map(self.config.default_position, self.config.zoom.initial);

        let resolver = LocationResolver::new(PositionOptions {
            timeout: self.config.locate_timeout,
            ..PositionOptions::default()
        });
        let (position, location_error) = match resolver.resolve(provider).await {
            Ok(point) => {
                self.map.set_view(point, self.config.zoom.user);
                (UserPosition::device(point), None)
            }
            Err(error) => {
                warn!(%error, "falling back to default position");
                self.show(Status::degraded(locale.location_failure(&error)));
                (UserPosition::fallback(self.config.default_position), Some(error))
            }
        };
        self.state.position = Some(position);
        self.place_user_marker();

        let rendered = self.refresh()?;
        if position.is_fallback() {
            self.show(Status::degraded(
                locale.degraded(&self.config.default_area_label()),
            ));
        } else {
            self.show(Status::info(locale.showing(rendered)));
        }

        info!(
            shelters = shelters_loaded,
            rendered,
            fallback = position.is_fallback(),
            "session started"
        );
        Ok(StartupReport {
            shelters_loaded,
            rendered,
            position,
            location_error,
        })
    }

    /// Load the configured dataset, replacing the current collection only on success.
    ///
    /// Markers and cards from an earlier ranking never outlive the records
    /// they describe: with a known position the new collection is ranked and
    /// rendered, otherwise the rendered entries are removed.
    pub async fn load_dataset(&mut self) -> Result<usize> {
        let dataset = DatasetLoader::new(self.config.dataset.clone())
            .load_dataset()
            .await?;
        self.state.shelters = dataset.records;
        if self.state.position.is_some() {
            self.refresh()?;
        } else {
            self.presentation.clear(&mut self.map, &mut self.list);
        }
        Ok(self.state.shelters.len())
    }

    /// Re-rank around the current position and rebuild markers and cards.
    pub fn refresh(&mut self) -> Result<usize> {
        let position = self.state.position.ok_or(Error::NoPosition)?;
        let view = rank_shelters(
            position.point,
            &mut self.state.shelters,
            self.config.max_shelters,
        );
        Ok(self.presentation.render(&view, &mut self.map, &mut self.list))
    }

    /// Accept a new device position and re-rank around it.
    pub fn relocate(&mut self, point: GeoPoint) -> Result<usize> {
        if !point.is_valid() {
            return Err(LocationError::Unavailable {
                message: format!("invalid coordinates ({}, {})", point.lat, point.lng),
            }
            .into());
        }
        self.state.position = Some(UserPosition::device(point));
        self.map.set_view(point, self.config.zoom.user);
        self.place_user_marker();

        let rendered = self.refresh()?;
        self.show(Status::info(self.config.locale.showing(rendered)));
        Ok(rendered)
    }

    /// Center the map on the user and reopen the user popup.
    ///
    /// Without a resolved position the map is left alone and a notice is shown.
    pub fn recenter(&mut self) -> Result<GeoPoint> {
        let Some(position) = self.state.position else {
            self.status.notify(&self.config.locale.no_position());
            return Err(Error::NoPosition);
        };
        self.map.set_view(position.point, self.config.zoom.user);
        if let Some(marker) = self.state.user_marker {
            self.map.open_popup(marker);
        }
        Ok(position.point)
    }

    /// A list entry was activated.
    pub fn select_list_entry(&mut self, index: usize) -> Option<MarkerId> {
        self.presentation
            .select_entry(index, &mut self.map, &mut self.list)
    }

    /// A shelter marker was activated.
    pub fn select_marker(&mut self, marker: MarkerId) -> Option<usize> {
        self.presentation.select_marker(marker, &mut self.list)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from_ranked(
            self.config.locale,
            self.state.status.clone(),
            self.state.position,
            &self.state.shelters,
            self.presentation.len(),
            self.presentation.selected(),
        )
    }

    fn place_user_marker(&mut self) {
        let Some(position) = self.state.position else {
            return;
        };
        if let Some(previous) = self.state.user_marker.take() {
            self.map.remove_marker(previous);
        }

        let label = if position.is_fallback() {
            self.config.locale.default_location()
        } else {
            self.config.locale.current_location()
        };
        let marker = self.map.add_marker(position.point, MarkerKind::User);
        self.map
            .bind_popup(marker, &format!("<b>{}</b>", escape_html(label)));
        self.map.open_popup(marker);
        self.state.user_marker = Some(marker);
    }

    fn show(&mut self, status: Status) {
        self.status.set_status(status.clone());
        self.state.status = Some(status);
    }
}
