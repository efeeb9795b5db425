//! Record identity and lenient field codecs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque, stable record identifier.
///
/// Generated ids are time-ordered with a random suffix (UUID v7); imported
/// ids are kept verbatim, whatever their shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A record stored in a `Collection`.
pub trait Record: Clone + Serialize + for<'de> Deserialize<'de> {
    fn id(&self) -> &RecordId;
    fn set_id(&mut self, id: RecordId);
}

macro_rules! impl_record {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::model::record::Record for $ty {
                fn id(&self) -> &$crate::model::record::RecordId {
                    &self.id
                }

                fn set_id(&mut self, id: $crate::model::record::RecordId) {
                    self.id = id;
                }
            }
        )+
    };
}
pub(crate) use impl_record;

/// Calendar date field: blank or unparsable values read as `None`.
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

/// Timestamp field: blank or unparsable values read as `None`.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// Any JSON shape a numeric field may hold in stored or imported data.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Unsigned(u64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl LooseNumber {
    fn to_f64(&self) -> f64 {
        let value = match self {
            Self::Unsigned(value) => *value as f64,
            Self::Float(value) => *value,
            Self::Text(text) => text.trim().parse().unwrap_or(0.0),
            Self::Other(_) => 0.0,
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    fn to_u64(&self) -> u64 {
        match self {
            Self::Unsigned(value) => *value,
            Self::Text(text) => match text.trim().parse::<u64>() {
                Ok(value) => value,
                Err(_) => saturating_count(self.to_f64()),
            },
            _ => saturating_count(self.to_f64()),
        }
    }
}

/// Truncates toward zero; negatives read as 0, overflow as `u64::MAX`.
fn saturating_count(value: f64) -> u64 {
    value.max(0.0) as u64
}

/// Amount field: `null`, non-numeric text and non-finite values read as 0;
/// numeric text is parsed.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LooseNumber::deserialize(deserializer)?.to_f64())
}

/// Counter field: like [`lenient_f64`], then truncated and saturated into
/// `0..=u64::MAX`.
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LooseNumber::deserialize(deserializer)?.to_u64())
}

pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = LooseNumber::deserialize(deserializer)?.to_u64();
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Accepts RFC 3339 timestamps (`2024-01-01T00:00:00.000Z`).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
