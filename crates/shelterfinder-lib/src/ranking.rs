//! Distance ranking of shelters around an origin.

use crate::catalog::ShelterRecord;
use crate::geo::GeoPoint;

/// Minutes per kilometer at the assumed walking pace (~4 km/h).
pub const WALKING_MINUTES_PER_KM: f64 = 15.0;

/// Estimated walking time, rounded up to whole minutes.
pub fn walking_minutes(distance_km: f64) -> u32 {
    (distance_km.max(0.0) * WALKING_MINUTES_PER_KM).ceil() as u32
}

/// The nearest shelters to an origin, in ascending distance order.
#[derive(Debug, Clone, Copy)]
pub struct RankedView<'a> {
    origin: GeoPoint,
    entries: &'a [ShelterRecord],
}

/// One entry of a [`RankedView`].
#[derive(Debug, Clone, Copy)]
pub struct RankedShelter<'a> {
    /// 0-based position in the view.
    pub index: usize,
    pub record: &'a ShelterRecord,
}

impl RankedShelter<'_> {
    /// 1-based rank for display.
    pub fn rank(&self) -> usize {
        self.index + 1
    }

    pub fn distance_km(&self) -> f64 {
        // every record in a view has been measured by `rank_shelters`
        self.record.distance_km.unwrap_or_default()
    }

    pub fn walking_minutes(&self) -> u32 {
        walking_minutes(self.distance_km())
    }
}

impl<'a> RankedView<'a> {
    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> &'a [ShelterRecord] {
        self.entries
    }

    pub fn get(&self, index: usize) -> Option<RankedShelter<'a>> {
        self.entries
            .get(index)
            .map(|record| RankedShelter { index, record })
    }

    pub fn iter(&self) -> impl Iterator<Item = RankedShelter<'a>> + 'a {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, record)| RankedShelter { index, record })
    }
}

/// Measure every shelter from `origin`, sort ascending, and keep the first `limit`.
///
/// The whole collection is reordered in place with a stable sort so that
/// equidistant shelters keep their prior relative order. Distances from any
/// earlier ranking are overwritten.
pub fn rank_shelters(
    origin: GeoPoint,
    shelters: &mut [ShelterRecord],
    limit: usize,
) -> RankedView<'_> {
    for shelter in shelters.iter_mut() {
        shelter.distance_km = Some(origin.distance_km(&shelter.position()));
    }

    shelters.sort_by(|a, b| {
        let a = a.distance_km.unwrap_or(f64::INFINITY);
        let b = b.distance_km.unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });

    let len = limit.min(shelters.len());
    RankedView {
        origin,
        entries: &shelters[..len],
    }
}
