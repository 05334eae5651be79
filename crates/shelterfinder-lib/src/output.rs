//! Serializable view of a session for hosts and tooling.

use serde::Serialize;

use crate::catalog::ShelterRecord;
use crate::locale::Locale;
use crate::location::UserPosition;
use crate::presentation::{ShelterCard, Status};
use crate::ranking::RankedShelter;

/// Serializable view of a session: what the status line, the user marker and
/// the shelter list currently show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub locale: Locale,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<UserPosition>,
    pub shelters_loaded: usize,
    pub shelters: Vec<ShelterCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<usize>,
}

impl SessionSnapshot {
    /// Build cards for the first `rendered` records, which are the ranked ones.
    pub(crate) fn from_ranked(
        locale: Locale,
        status: Option<Status>,
        position: Option<UserPosition>,
        records: &[ShelterRecord],
        rendered: usize,
        selected: Option<usize>,
    ) -> Self {
        let shelters = records
            .iter()
            .take(rendered)
            .enumerate()
            .map(|(index, record)| {
                ShelterCard::from_ranked(&RankedShelter { index, record }, locale)
            })
            .collect();
        Self {
            locale,
            status,
            position,
            shelters_loaded: records.len(),
            shelters,
            selected,
        }
    }

    pub fn selected_card(&self) -> Option<&ShelterCard> {
        self.shelters.get(self.selected?)
    }
}
