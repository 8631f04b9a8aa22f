// src/models/core.rs - Input records, listing candidates and outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::matching::address::normalize_address;
use crate::matching::normalize::clean_text;

/// One business record to resolve. Fields may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputRecord {
    pub name: String,
    pub address: String,
    pub district: String,
}

impl InputRecord {
    pub fn new(name: impl Into<String>, address: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            district: district.into(),
        }
    }

    /// Cleaned copy the scorer and decision engine work on: cleaned name and
    /// district, normalized address.
    pub fn prepared(&self) -> Self {
        Self {
            name: clean_text(&self.name),
            address: normalize_address(&self.address),
            district: clean_text(&self.district),
        }
    }
}

/// A latitude/longitude pair. Only ever constructed with both halves present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Both halves present and finite, or nothing.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some(Self::new(lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosedType {
    Temporary,
    Permanent,
    Unknown,
}

impl ClosedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClosedType::Temporary => "temporary",
            ClosedType::Permanent => "permanent",
            ClosedType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ClosedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosedStatus {
    pub is_closed: bool,
    pub closed_type: Option<ClosedType>,
}

impl ClosedStatus {
    pub fn open() -> Self {
        Self::default()
    }

    pub fn closed(closed_type: ClosedType) -> Self {
        Self {
            is_closed: true,
            closed_type: Some(closed_type),
        }
    }

    /// Label written to the output; closed listings without a type read "unknown".
    pub fn label(&self) -> Option<String> {
        if self.is_closed {
            Some(self.closed_type.unwrap_or(ClosedType::Unknown).as_str().to_string())
        } else {
            None
        }
    }
}

/// A listing returned by the lookup source. Read-only to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Candidate {
    pub displayed_name: String,
    pub displayed_address: String,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub closed: ClosedStatus,
    /// Listing URL; coordinates are read from it when the source gave none.
    pub url: Option<String>,
    /// Raw panel text, scanned for closure notices.
    pub panel_text: Option<String>,
    pub query_used: String,
    pub source_tag: String,
}

impl Candidate {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }

    /// True when the source gave back nothing usable at all.
    pub fn is_null(&self) -> bool {
        self.displayed_name.trim().is_empty()
            && self.displayed_address.trim().is_empty()
            && self.coordinates().is_none()
    }
}

/// Status codes written to the output sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusCode {
    OutsideArea,
    Found,
    Closed,
    CoordsOnly,
    NotFound,
}

impl StatusCode {
    pub fn code(&self) -> i32 {
        match self {
            StatusCode::OutsideArea => 0,
            StatusCode::Found => 1,
            StatusCode::Closed => 3,
            StatusCode::CoordsOnly => 5,
            StatusCode::NotFound => 99,
        }
    }

    /// Whether the outcome keeps the candidate's coordinates.
    pub fn keeps_coordinates(&self) -> bool {
        !matches!(self, StatusCode::NotFound)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Which policy branch produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionBranch {
    OutsideArea,
    NoCandidate,
    EchoWithoutAddress,
    Closed,
    GenericWeak,
    NameVeryStrong,
    AddressConfirmed,
    AddressMismatch,
    NameWithEmptyAddress,
    EmptyAddressWeakName,
    CoordsOnly,
    CoordsOnlyRejected,
    ScoreTooLow,
    /// Record carried its own coordinates; no lookup was made.
    ExistingCoordinates,
    /// Record had no usable name.
    Skipped,
    /// Every lookup for the record failed.
    LookupFailed,
}

/// Terminal result of the decision engine for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub status_code: StatusCode,
    pub status_label: String,
    pub closed_label: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub branch: DecisionBranch,
}
