//! Map markers and list cards for a ranked view, kept in step.
//!
//! Every pass tears down what the previous pass placed and rebuilds from the
//! new [`RankedView`]. Entries are addressed by their 0-based index in the
//! view; markers map back to that index through a lookup table so marker
//! clicks and list clicks resolve to the same entry.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::geo::GeoPoint;
use crate::locale::Locale;
use crate::ranking::{RankedShelter, RankedView};

/// Opaque handle for a marker placed on a [`MapSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MarkerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Shelter,
    User,
}

/// Map capability consumed by the presentation layer.
///
/// Marker clicks are reported back by the host through
/// [`PresentationSync::select_marker`].
pub trait MapSurface {
    fn create_map(&mut self, center: GeoPoint, zoom: u8);
    fn set_view(&mut self, center: GeoPoint, zoom: u8);
    fn add_marker(&mut self, position: GeoPoint, kind: MarkerKind) -> MarkerId;
    fn remove_marker(&mut self, marker: MarkerId);
    fn bind_popup(&mut self, marker: MarkerId, html: &str);
    fn open_popup(&mut self, marker: MarkerId);
}

/// Content of one list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelterCard {
    pub index: usize,
    pub rank: usize,
    pub name: String,
    pub address: String,
    pub accepted_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub distance_km: f64,
    pub distance_label: String,
    pub walking_minutes: u32,
    pub walking_label: String,
}

impl ShelterCard {
    pub fn from_ranked(shelter: &RankedShelter<'_>, locale: Locale) -> Self {
        let distance_km = shelter.distance_km();
        let walking_minutes = shelter.walking_minutes();
        Self {
            index: shelter.index,
            rank: shelter.rank(),
            name: shelter.record.name.clone(),
            address: shelter.record.address.clone(),
            accepted_group: shelter.record.accepted_group.clone(),
            remarks: shelter.record.remarks.clone(),
            distance_km,
            distance_label: locale.distance_label(distance_km),
            walking_minutes,
            walking_label: locale.walking_label(walking_minutes),
        }
    }

    /// Heading line, e.g. `3. Civic Hall`.
    pub fn title(&self) -> String {
        format!("{}. {}", self.rank, self.name)
    }
}

/// List capability consumed by the presentation layer.
pub trait ListSurface {
    fn clear(&mut self);
    fn append(&mut self, card: ShelterCard);
    /// Highlight the entry at `index`, clearing any other highlight.
    fn highlight(&mut self, index: Option<usize>);
    fn scroll_to(&mut self, index: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Info,
    Degraded,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn degraded(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Degraded,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// Status text region plus transient notices.
pub trait StatusSurface {
    fn set_status(&mut self, status: Status);
    fn notify(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy)]
struct RenderedEntry {
    marker: MarkerId,
    position: GeoPoint,
}

/// Owns the marker/card pairs of the current ranked view.
#[derive(Debug, Clone)]
pub struct PresentationSync {
    locale: Locale,
    focus_zoom: u8,
    entries: Vec<RenderedEntry>,
    by_marker: HashMap<MarkerId, usize>,
    selected: Option<usize>,
}

impl PresentationSync {
    pub fn new(locale: Locale, focus_zoom: u8) -> Self {
        Self {
            locale,
            focus_zoom,
            entries: Vec::new(),
            by_marker: HashMap::new(),
            selected: None,
        }
    }

    /// Number of rendered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn marker_at(&self, index: usize) -> Option<MarkerId> {
        self.entries.get(index).map(|entry| entry.marker)
    }

    /// Replace whatever is shown with `view`. Returns the number of entries rendered.
    pub fn render<M: MapSurface, L: ListSurface>(
        &mut self,
        view: &RankedView<'_>,
        map: &mut M,
        list: &mut L,
    ) -> usize {
        self.clear(map, list);

        for shelter in view.iter() {
            let position = shelter.record.position();
            let marker = map.add_marker(position, MarkerKind::Shelter);
            map.bind_popup(marker, &self.popup_html(&shelter));
            list.append(ShelterCard::from_ranked(&shelter, self.locale));

            self.by_marker.insert(marker, shelter.index);
            self.entries.push(RenderedEntry { marker, position });
        }

        debug!(entries = self.entries.len(), "rendered ranked shelters");
        self.entries.len()
    }

    /// Remove every marker and card placed by the previous pass.
    pub fn clear<M: MapSurface, L: ListSurface>(&mut self, map: &mut M, list: &mut L) {
        for entry in self.entries.drain(..) {
            map.remove_marker(entry.marker);
        }
        self.by_marker.clear();
        self.selected = None;
        list.clear();
    }

    /// Marker activated: highlight and reveal the matching list entry.
    pub fn select_marker<L: ListSurface>(
        &mut self,
        marker: MarkerId,
        list: &mut L,
    ) -> Option<usize> {
        let index = *self.by_marker.get(&marker)?;
        self.highlight(index, list);
        list.scroll_to(index);
        Some(index)
    }

    /// List entry activated: focus the map on its marker and highlight it.
    pub fn select_entry<M: MapSurface, L: ListSurface>(
        &mut self,
        index: usize,
        map: &mut M,
        list: &mut L,
    ) -> Option<MarkerId> {
        let entry = *self.entries.get(index)?;
        map.set_view(entry.position, self.focus_zoom);
        map.open_popup(entry.marker);
        self.highlight(index, list);
        Some(entry.marker)
    }

    fn highlight<L: ListSurface>(&mut self, index: usize, list: &mut L) {
        if self.selected == Some(index) {
            return;
        }
        self.selected = Some(index);
        list.highlight(Some(index));
    }

    fn popup_html(&self, shelter: &RankedShelter<'_>) -> String {
        format!(
            "<b>{}</b><br>{}<br>{}: {}",
            escape_html(&shelter.record.name),
            escape_html(&shelter.record.address),
            self.locale.distance_caption(),
            self.locale.distance_label(shelter.distance_km())
        )
    }
}

/// Escape text for inclusion in popup markup.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
