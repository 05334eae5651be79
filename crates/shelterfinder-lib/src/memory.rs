//! In-memory implementations of the map, list and status surfaces.
//!
//! They keep the state a real widget would show (marker set, open popup,
//! current view, cards, highlight) so headless front ends can render it and
//! tests can inspect it.

use std::collections::BTreeMap;

use crate::geo::GeoPoint;
use crate::presentation::{
    ListSurface, MapSurface, MarkerId, MarkerKind, ShelterCard, Status, StatusSurface,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub position: GeoPoint,
    pub kind: MarkerKind,
    pub popup: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryMap {
    created: bool,
    center: Option<GeoPoint>,
    zoom: Option<u8>,
    next_id: u64,
    markers: BTreeMap<MarkerId, PlacedMarker>,
    open_popup: Option<MarkerId>,
}

impl MemoryMap {
    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn center(&self) -> Option<GeoPoint> {
        self.center
    }

    pub fn zoom(&self) -> Option<u8> {
        self.zoom
    }

    pub fn markers(&self) -> impl Iterator<Item = (MarkerId, &PlacedMarker)> {
        self.markers.iter().map(|(id, marker)| (*id, marker))
    }

    pub fn marker(&self, marker: MarkerId) -> Option<&PlacedMarker> {
        self.markers.get(&marker)
    }

    pub fn has_marker(&self, marker: MarkerId) -> bool {
        self.markers.contains_key(&marker)
    }

    pub fn shelter_markers(&self) -> Vec<MarkerId> {
        self.markers_of(MarkerKind::Shelter)
    }

    pub fn user_markers(&self) -> Vec<MarkerId> {
        self.markers_of(MarkerKind::User)
    }

    pub fn popup(&self, marker: MarkerId) -> Option<&str> {
        self.markers.get(&marker)?.popup.as_deref()
    }

    pub fn open_popup_marker(&self) -> Option<MarkerId> {
        self.open_popup
    }

    fn markers_of(&self, kind: MarkerKind) -> Vec<MarkerId> {
        self.markers
            .iter()
            .filter(|(_, marker)| marker.kind == kind)
            .map(|(id, _)| *id)
            .collect()
    }
}

impl MapSurface for MemoryMap {
    fn create_map(&mut self, center: GeoPoint, zoom: u8) {
        self.created = true;
        self.set_view(center, zoom);
    }

    fn set_view(&mut self, center: GeoPoint, zoom: u8) {
        self.center = Some(center);
        self.zoom = Some(zoom);
    }

    fn add_marker(&mut self, position: GeoPoint, kind: MarkerKind) -> MarkerId {
        self.next_id += 1;
        let id = MarkerId(self.next_id);
        self.markers.insert(
            id,
            PlacedMarker {
                position,
                kind,
                popup: None,
            },
        );
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.markers.remove(&marker);
        if self.open_popup == Some(marker) {
            self.open_popup = None;
        }
    }

    fn bind_popup(&mut self, marker: MarkerId, html: &str) {
        if let Some(placed) = self.markers.get_mut(&marker) {
            placed.popup = Some(html.to_string());
        }
    }

    fn open_popup(&mut self, marker: MarkerId) {
        // only one popup is open at a time
        let has_popup = self
            .markers
            .get(&marker)
            .is_some_and(|placed| placed.popup.is_some());
        if has_popup {
            self.open_popup = Some(marker);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryList {
    cards: Vec<ShelterCard>,
    highlighted: Option<usize>,
    scrolled_to: Option<usize>,
}

impl MemoryList {
    pub fn cards(&self) -> &[ShelterCard] {
        &self.cards
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn scrolled_to(&self) -> Option<usize> {
        self.scrolled_to
    }
}

impl ListSurface for MemoryList {
    fn clear(&mut self) {
        self.cards.clear();
        self.highlighted = None;
        self.scrolled_to = None;
    }

    fn append(&mut self, card: ShelterCard) {
        self.cards.push(card);
    }

    fn highlight(&mut self, index: Option<usize>) {
        self.highlighted = index.filter(|i| *i < self.cards.len());
    }

    fn scroll_to(&mut self, index: usize) {
        if index < self.cards.len() {
            self.scrolled_to = Some(index);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStatus {
    current: Option<Status>,
    history: Vec<Status>,
    notices: Vec<String>,
}

impl MemoryStatus {
    pub fn current(&self) -> Option<&Status> {
        self.current.as_ref()
    }

    /// Every status shown, oldest first.
    pub fn history(&self) -> &[Status] {
        &self.history
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }
}

impl StatusSurface for MemoryStatus {
    fn set_status(&mut self, status: Status) {
        self.history.push(status.clone());
        self.current = Some(status);
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
