//! User-visible strings.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, LocationError};

/// Language used for status texts, popups and list labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ja,
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "ja" | "jp" | "japanese" => Ok(Locale::Ja),
            other => Err(Error::InvalidConfig {
                message: format!("unsupported locale '{other}' (expected en or ja)"),
            }),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Ja => write!(f, "ja"),
        }
    }
}

impl Locale {
    pub fn loading(self) -> String {
        match self {
            Locale::En => "Loading shelter data...".to_string(),
            Locale::Ja => "避難所データを読み込み中...".to_string(),
        }
    }

    pub fn showing(self, count: usize) -> String {
        match self {
            Locale::En => format!("Showing the {count} shelters nearest to your location"),
            Locale::Ja => format!("現在地周辺 {count}件の避難所を表示中"),
        }
    }

    pub fn degraded(self, area: &str) -> String {
        match self {
            Locale::En => {
                format!("Your location could not be determined. Showing shelters around {area}.")
            }
            Locale::Ja => format!("位置情報が取得できませんでした。{area}周辺を表示します。"),
        }
    }

    pub fn fatal(self, error: &Error) -> String {
        match self {
            Locale::En => format!("An error occurred: {error}"),
            Locale::Ja => format!("エラーが発生しました: {error}"),
        }
    }

    /// Reason shown when a position request fails.
    pub fn location_failure(self, error: &LocationError) -> String {
        match (self, error) {
            (Locale::En, LocationError::Unsupported) => {
                "Geolocation is not supported on this device.".to_string()
            }
            (Locale::Ja, LocationError::Unsupported) => {
                "お使いの環境は位置情報に対応していません。".to_string()
            }
            (Locale::En, _) => {
                "Failed to get your location. Showing the default area instead.".to_string()
            }
            (Locale::Ja, _) => {
                "位置情報の取得に失敗しました。デフォルトの位置を表示します。".to_string()
            }
        }
    }

    pub fn no_position(self) -> String {
        match self {
            Locale::En => "Your current location has not been determined yet.".to_string(),
            Locale::Ja => "現在地が特定されていません。".to_string(),
        }
    }

    pub fn current_location(self) -> &'static str {
        match self {
            Locale::En => "Current location",
            Locale::Ja => "現在地",
        }
    }

    pub fn default_location(self) -> &'static str {
        match self {
            Locale::En => "Default location",
            Locale::Ja => "デフォルトの位置",
        }
    }

    pub fn distance_label(self, distance_km: f64) -> String {
        format!("{distance_km:.2} km")
    }

    pub fn distance_caption(self) -> &'static str {
        match self {
            Locale::En => "Distance",
            Locale::Ja => "距離",
        }
    }

    pub fn walking_label(self, minutes: u32) -> String {
        match self {
            Locale::En => format!("about {minutes} min walk"),
            Locale::Ja => format!("約{minutes}分"),
        }
    }
}
