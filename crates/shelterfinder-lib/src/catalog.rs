//! Shelter records and tabular dataset parsing.
//!
//! The dataset is a CSV file whose first row names the columns. Columns are
//! located by label rather than by position so that files exported with extra
//! or reordered columns still load.

use std::collections::BTreeMap;
use std::io::Read;

use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geo::GeoPoint;

/// Accepted group assigned when a row leaves the column empty ("general").
pub const DEFAULT_ACCEPTED_GROUP: &str = "全般";

/// A designated evacuation facility read from the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelterRecord {
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub accepted_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Distance from the last ranking origin. `None` until ranked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl ShelterRecord {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// Parsed dataset together with row accounting.
#[derive(Debug, Clone, Default)]
pub struct ShelterDataset {
    pub records: Vec<ShelterRecord>,
    /// Data rows seen after the header.
    pub total_rows: usize,
    /// Rows dropped because latitude or longitude did not parse.
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Column {
    Name,
    Address,
    Latitude,
    Longitude,
    AcceptedGroup,
    Remarks,
}

impl Column {
    fn label(self) -> &'static str {
        match self {
            Column::Name => "施設・場所名",
            Column::Address => "住所",
            Column::Latitude => "緯度",
            Column::Longitude => "経度",
            Column::AcceptedGroup => "受入対象者",
            Column::Remarks => "備考",
        }
    }
}

// Canonical column -> accepted header labels (compared after normalization).
const SYNONYMS: &[(Column, &[&str])] = &[
    (
        Column::Name,
        &["施設・場所名", "施設名", "name", "facility", "facility_name"],
    ),
    (Column::Address, &["住所", "address"]),
    (Column::Latitude, &["緯度", "latitude", "lat"]),
    (Column::Longitude, &["経度", "longitude", "lng", "lon"]),
    (
        Column::AcceptedGroup,
        &["受入対象者", "accepted_group", "type"],
    ),
    (Column::Remarks, &["備考", "remarks", "notes"]),
];

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .collect()
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl ShelterDataset {
    /// Parse a CSV payload that has already been decoded to text.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Parse shelters from any CSV reader.
    ///
    /// Rows whose coordinates fail to parse are skipped. A dataset that ends
    /// up with no usable rows is rejected with [`Error::DataParse`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| Error::DataParse {
                message: format!("failed to read header row: {err}"),
            })?
            .clone();

        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let mut index_map: BTreeMap<Column, usize> = BTreeMap::new();
        for (column, alts) in SYNONYMS {
            if let Some(position) = alts
                .iter()
                .map(|alt| normalize_header(alt))
                .find_map(|alt| normalized.iter().position(|h| *h == alt))
            {
                index_map.insert(*column, position);
            }
        }

        let missing: Vec<&str> = [Column::Latitude, Column::Longitude]
            .into_iter()
            .filter(|c| !index_map.contains_key(c))
            .map(Column::label)
            .collect();
        if !missing.is_empty() {
            return Err(Error::DataParse {
                message: format!(
                    "missing required columns: {}. Available: {}",
                    missing.join(", "),
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        let mut dataset = ShelterDataset::default();
        for (offset, result) in csv_reader.records().enumerate() {
            // header occupies line 1
            let line = offset + 2;
            let record = result.map_err(|err| Error::DataParse {
                message: format!("row {line}: {err}"),
            })?;
            dataset.total_rows += 1;

            let get = |column: Column| {
                index_map
                    .get(&column)
                    .and_then(|&i| record.get(i))
                    .map(str::trim)
            };

            let coords = get(Column::Latitude)
                .and_then(parse_coordinate)
                .zip(get(Column::Longitude).and_then(parse_coordinate));
            let Some((lat, lng)) = coords else {
                debug!(line, "skipping shelter row without usable coordinates");
                dataset.skipped_rows += 1;
                continue;
            };

            let accepted_group = match get(Column::AcceptedGroup) {
                Some(group) if !group.is_empty() => group.to_string(),
                _ => DEFAULT_ACCEPTED_GROUP.to_string(),
            };

            dataset.records.push(ShelterRecord {
                name: get(Column::Name).unwrap_or_default().to_string(),
                address: get(Column::Address).unwrap_or_default().to_string(),
                lat,
                lng,
                accepted_group,
                remarks: get(Column::Remarks)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string),
                distance_km: None,
            });
        }

        if dataset.records.is_empty() {
            return Err(Error::DataParse {
                message: format!(
                    "dataset contains no usable rows ({} rows, {} without valid coordinates)",
                    dataset.total_rows, dataset.skipped_rows
                ),
            });
        }

        info!(
            shelters = dataset.records.len(),
            skipped = dataset.skipped_rows,
            "parsed shelter dataset"
        );
        Ok(dataset)
    }
}
