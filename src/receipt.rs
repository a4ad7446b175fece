//! receipt model consumed by conditions
//!
//! every field is optional (or an empty list) so partially extracted receipts
//! can still be matched; conditions treat a missing field as "no match"

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// monetary total of a receipt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// ISO 4217 code, e.g. "EUR"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Amount {
    pub fn new(value: f64, currency: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            currency: Some(currency.into()),
        }
    }
}

/// metadata about where the purchase happened
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub place_type: Option<String>,
    #[serde(
        rename = "typeCategory",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub place_type_category: Option<String>,
}

/// an expense receipt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    /// local wall-clock date and time printed on the receipt
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// free-text header lines (shop name, address, ...)
    #[serde(
        default,
        deserialize_with = "deserialize_header",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub header: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<Place>,
}

/// accepts `2024-03-17T19:30:00` as well as RFC 3339 with an offset
/// (`2024-03-17T19:30:00.000Z`); an offset is dropped, keeping the wall-clock time
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    text.parse::<NaiveDateTime>()
        .or_else(|_| DateTime::parse_from_rfc3339(&text).map(|dt| dt.naive_local()))
        .map(Some)
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{}': {}", text, e)))
}

/// null list and null lines both read as "no line"
fn deserialize_header<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let lines = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(lines.into_iter().flatten().flatten().collect())
}

impl Receipt {
    pub fn with_amount(mut self, value: f64, currency: impl Into<String>) -> Self {
        self.amount = Some(Amount::new(value, currency));
        self
    }

    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    pub fn with_header_line(mut self, line: impl Into<String>) -> Self {
        self.header.push(line.into());
        self
    }

    pub fn with_place(
        mut self,
        place_type: Option<&str>,
        place_type_category: Option<&str>,
    ) -> Self {
        self.place = Some(Place {
            place_type: place_type.map(str::to_string),
            place_type_category: place_type_category.map(str::to_string),
        });
        self
    }

    /// the place type, if the receipt carries one
    pub fn place_type(&self) -> Option<&str> {
        self.place.as_ref()?.place_type.as_deref()
    }

    /// the place type category, if the receipt carries one
    pub fn place_type_category(&self) -> Option<&str> {
        self.place.as_ref()?.place_type_category.as_deref()
    }
}
