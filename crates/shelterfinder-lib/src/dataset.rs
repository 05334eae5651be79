//! Locating and retrieving the shelter dataset.
//!
//! A dataset source is either a local CSV file or an `http(s)` URL. Retrieval
//! is a single attempt with no timeout; failures surface immediately as
//! [`Error::DataFetch`] and the caller decides what to show.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use reqwest::Client;
use tracing::{debug, info};

use crate::catalog::{ShelterDataset, ShelterRecord};
use crate::error::{Error, Result};

/// File name of the published shelter list (Iwate prefecture open data).
pub const DATASET_FILENAME: &str = "03000_1.csv";

/// Environment variable overriding the dataset location.
pub const DATASET_ENV: &str = "SHELTERFINDER_DATASET";

/// Where the shelter CSV is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    Url(String),
}

impl DatasetSource {
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        DatasetSource::File(path.into())
    }

    pub fn url<U: Into<String>>(url: U) -> Self {
        DatasetSource::Url(url.into())
    }
}

impl FromStr for DatasetSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidConfig {
                message: "dataset location must not be empty".to_string(),
            });
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(DatasetSource::Url(trimmed.to_string()))
        } else {
            Ok(DatasetSource::File(PathBuf::from(trimmed)))
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::File(path) => write!(f, "{}", path.display()),
            DatasetSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Platform data directory location for the dataset.
pub fn default_dataset_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("org", "shelterfinder", "shelterfinder").ok_or_else(|| {
        Error::InvalidConfig {
            message: "failed to resolve project directories for the dataset".to_string(),
        }
    })?;
    Ok(dirs.data_dir().join(DATASET_FILENAME))
}

/// Resolve the dataset source.
///
/// Resolution order:
/// 1. Explicit `location` argument when provided.
/// 2. `SHELTERFINDER_DATASET` environment variable.
/// 3. `03000_1.csv` in the working directory, if it exists.
/// 4. `03000_1.csv` in the platform data directory.
pub fn resolve_dataset_source(location: Option<&str>) -> Result<DatasetSource> {
    if let Some(explicit) = location {
        return explicit.parse();
    }

    if let Ok(from_env) = env::var(DATASET_ENV) {
        if !from_env.trim().is_empty() {
            return from_env.parse();
        }
    }

    let local = Path::new(DATASET_FILENAME);
    if local.exists() {
        return Ok(DatasetSource::File(local.to_path_buf()));
    }

    Ok(DatasetSource::File(default_dataset_path()?))
}

/// Fetches and parses the shelter dataset from a [`DatasetSource`].
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    source: DatasetSource,
}

impl DatasetLoader {
    pub fn new(source: DatasetSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// Load and parse the dataset, returning only the usable records.
    pub async fn load(&self) -> Result<Vec<ShelterRecord>> {
        Ok(self.load_dataset().await?.records)
    }

    /// Load and parse the dataset, keeping row accounting.
    pub async fn load_dataset(&self) -> Result<ShelterDataset> {
        let text = self.fetch_text().await?;
        ShelterDataset::parse(&text)
    }

    /// Retrieve the raw payload as UTF-8 text.
    pub async fn fetch_text(&self) -> Result<String> {
        let bytes = match &self.source {
            DatasetSource::File(path) => read_file(path).await?,
            DatasetSource::Url(url) => fetch_url(url).await?,
        };
        debug!(source = %self.source, bytes = bytes.len(), "retrieved dataset payload");

        String::from_utf8(bytes).map_err(|err| Error::DataParse {
            message: format!("payload is not valid UTF-8: {err}"),
        })
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    info!(path = %path.display(), "reading shelter dataset");
    tokio::fs::read(path).await.map_err(|err| Error::DataFetch {
        location: path.display().to_string(),
        reason: err.to_string(),
    })
}

async fn fetch_url(url: &str) -> Result<Vec<u8>> {
    info!(url, "downloading shelter dataset");
    let fetch_error = |reason: String| Error::DataFetch {
        location: url.to_string(),
        reason,
    };

    let client = Client::builder()
        .user_agent(user_agent())
        .build()
        .map_err(|err| fetch_error(err.to_string()))?;
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|err| fetch_error(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(format!(
            "HTTP status {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )
        .trim_end()
        .to_string()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|err| fetch_error(err.to_string()))?;
    Ok(body.to_vec())
}

fn user_agent() -> String {
    format!("shelterfinder-lib/{}", env!("CARGO_PKG_VERSION"))
}
