use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{OpsError, Result};

pub const OPSDESK_DIR: &str = ".opsdesk";

/// Identifier assigned by the backend. Numeric ids are kept in their decimal
/// text form so they can be spliced into request paths unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId(id.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId(id.to_string())
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0.parse::<u64>() {
            Ok(n) => serializer.serialize_u64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => RecordId(n.to_string()),
            Raw::Text(s) => RecordId(s),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerStatus {
    #[default]
    Active,
    Dormant,
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerStatus::Active => write!(f, "ACTIVE"),
            CustomerStatus::Dormant => write!(f, "DORMANT"),
        }
    }
}

impl FromStr for CustomerStatus {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(CustomerStatus::Active),
            "DORMANT" => Ok(CustomerStatus::Dormant),
            _ => Err(OpsError::InvalidStatus(s.to_string())),
        }
    }
}

pub const VALID_CUSTOMER_STATUSES: &[&str] = &["ACTIVE", "DORMANT"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    #[default]
    Unpaid,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "UNPAID",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "UNPAID" => Ok(InvoiceStatus::Unpaid),
            "PAID" => Ok(InvoiceStatus::Paid),
            "CANCELLED" => Ok(InvoiceStatus::Cancelled),
            _ => Err(OpsError::InvalidStatus(s.to_string())),
        }
    }
}

pub const VALID_INVOICE_STATUSES: &[&str] = &["UNPAID", "PAID", "CANCELLED"];

/// A geographic fix captured for a customer.
///
/// The API stores locations as `"latitude,longitude"` text; that encoding only
/// exists in [`location_wire`], everywhere else the pair stays structured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Encode as the API's `"latitude,longitude"` text form.
    pub fn to_wire(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }

    /// Parse the API's `"latitude,longitude"` text form.
    pub fn parse_wire(s: &str) -> Result<Self> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| OpsError::InvalidLocation(s.to_string()))?;
        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| OpsError::InvalidLocation(s.to_string()))?;
        let longitude: f64 = lng
            .trim()
            .parse()
            .map_err(|_| OpsError::InvalidLocation(s.to_string()))?;
        Ok(Self::new(latitude, longitude))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Latitude: {}, Longitude: {}",
            self.latitude, self.longitude
        )
    }
}

/// Serde adapter for `Option<Location>` fields on the wire.
///
/// Writes `"lat,lng"` or `null`. Reads that text form, a
/// `{latitude, longitude}` object, an empty string, or `null`. Text that
/// does not parse as a coordinate pair reads as no location.
pub mod location_wire {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Location;

    pub fn serialize<S: Serializer>(
        location: &Option<Location>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match location {
            Some(loc) => serializer.serialize_str(&loc.to_wire()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Location>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Pair(Location),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Pair(loc)) => Ok(Some(loc)),
            Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Raw::Text(s)) => match Location::parse_wire(&s) {
                Ok(loc) => Ok(Some(loc)),
                Err(e) => {
                    // Free-text locations must not fail the whole record
                    tracing::warn!("dropping location: {e}");
                    Ok(None)
                }
            },
        }
    }
}

/// Accept amounts sent as JSON numbers, numeric strings, or `null` (zero).
fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Raw::Number(n)) => Ok(n),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(0.0),
        Some(Raw::Text(s)) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: RecordId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "phoneNumber")]
    pub phone: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default, with = "location_wire")]
    pub location: Option<Location>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub monthly_charge: f64,
    #[serde(default)]
    pub status: CustomerStatus,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The customer summary embedded in an invoice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, alias = "phoneNumber")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: RecordId,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub customer: CustomerRef,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub invoice_amount: f64,
    #[serde(default)]
    pub status: InvoiceStatus,
}

impl Invoice {
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.customer.first_name, self.customer.last_name)
    }
}

/// The signed-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
