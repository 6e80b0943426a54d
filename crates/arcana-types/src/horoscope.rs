//! Daily horoscope types.
//!
//! A horoscope is generated once per user per day in Vietnamese, the
//! canonical language. Other languages are produced by translating the
//! canonical reading and caching the result alongside it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Languages a reading can be served in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Vi,
    En,
}

impl Language {
    /// The language readings are generated in.
    pub const CANONICAL: Language = Language::Vi;

    pub fn is_canonical(self) -> bool {
        self == Self::CANONICAL
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Vi => write!(f, "vi"),
            Language::En => write!(f, "en"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vi" => Ok(Language::Vi),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckyColor {
    pub name: String,
    /// Hex code, e.g. `#FFD700`.
    pub code: String,
}

/// The generated content of one day's horoscope.
///
/// Accepts the camelCase keys the generator emits (`luckyNumber`,
/// `luckyColor`) as well as snake_case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoroscopeReading {
    pub zodiac: String,
    pub icon: String,
    pub summary: String,
    pub love: String,
    pub career: String,
    pub finance: String,
    pub health: String,
    #[serde(alias = "luckyNumber")]
    pub lucky_number: u8,
    #[serde(alias = "luckyColor")]
    pub lucky_color: LuckyColor,
}

/// A stored horoscope. Unique per `(user_id, date)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Horoscope {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub reading: HoroscopeReading,
    pub created_at: DateTime<Utc>,
}

impl Horoscope {
    pub fn new(user_id: Uuid, date: NaiveDate, reading: HoroscopeReading) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            date,
            reading,
            created_at: Utc::now(),
        }
    }
}

/// A horoscope as served to a client in a specific language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedHoroscope {
    pub id: Uuid,
    pub date: NaiveDate,
    pub language: Language,
    #[serde(flatten)]
    pub reading: HoroscopeReading,
}
