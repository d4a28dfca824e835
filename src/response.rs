//! # Tagged response values
//!
//! Every answer of the [`IssTracker`](crate::tracker::IssTracker) is a [`ResponseValue`] tree. The
//! leaves are either text or a **measure**, a number that always travels with its unit string.
//! Maps are ordered, so the key set and key order of a response are the same for every call.
//!
//! ## Serialization
//!
//! Measures serialize with the attribute convention of the OEM feed itself:
//!
//! ```text
//! {"#text": 7.66, "@units": "km/s"}
//! ```
//!
//! [`ResponseValue::NoResult`] serializes as `null`; it marks a value that could not be produced,
//! e.g. no region under the ground track.
use std::collections::BTreeMap;

use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::{
    constants::{UNIT_DEG, UNIT_KM, UNIT_KM_PER_S},
    geodesy::GeodeticLocation,
    oem::StateVector,
    place::{Place, PlaceLookup},
};

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    Measure { value: f64, units: &'static str },
    Text(String),
    List(Vec<ResponseValue>),
    Map(BTreeMap<String, ResponseValue>),
    NoResult,
}

impl ResponseValue {
    pub fn measure(value: f64, units: &'static str) -> Self {
        ResponseValue::Measure { value, units }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ResponseValue::Text(text.into())
    }

    /// Build a map from `(key, value)` pairs.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, ResponseValue)>) -> Self {
        ResponseValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Value stored under `key` when `self` is a map.
    pub fn get(&self, key: &str) -> Option<&ResponseValue> {
        match self {
            ResponseValue::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Numeric value and unit when `self` is a measure.
    pub fn as_measure(&self) -> Option<(f64, &'static str)> {
        match self {
            ResponseValue::Measure { value, units } => Some((*value, *units)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Merge the entries of two maps, `other` wins on duplicate keys.
    ///
    /// Non-map values are left untouched.
    pub fn merge(mut self, other: ResponseValue) -> Self {
        if let (ResponseValue::Map(entries), ResponseValue::Map(extra)) = (&mut self, other) {
            entries.extend(extra);
        }
        self
    }
}

impl Serialize for ResponseValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ResponseValue::Measure { value, units } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("#text", value)?;
                map.serialize_entry("@units", units)?;
                map.end()
            }
            ResponseValue::Text(text) => serializer.serialize_str(text),
            ResponseValue::List(items) => items.serialize(serializer),
            ResponseValue::Map(entries) => entries.serialize(serializer),
            ResponseValue::NoResult => serializer.serialize_none(),
        }
    }
}

impl From<&StateVector> for ResponseValue {
    fn from(sv: &StateVector) -> Self {
        ResponseValue::map([
            ("EPOCH", ResponseValue::text(sv.epoch_text())),
            ("X", ResponseValue::measure(sv.position.x, UNIT_KM)),
            ("Y", ResponseValue::measure(sv.position.y, UNIT_KM)),
            ("Z", ResponseValue::measure(sv.position.z, UNIT_KM)),
            ("X_DOT", ResponseValue::measure(sv.velocity.x, UNIT_KM_PER_S)),
            ("Y_DOT", ResponseValue::measure(sv.velocity.y, UNIT_KM_PER_S)),
            ("Z_DOT", ResponseValue::measure(sv.velocity.z, UNIT_KM_PER_S)),
        ])
    }
}

impl From<&[StateVector]> for ResponseValue {
    fn from(state_vectors: &[StateVector]) -> Self {
        ResponseValue::List(state_vectors.iter().map(ResponseValue::from).collect())
    }
}

impl From<&GeodeticLocation> for ResponseValue {
    fn from(location: &GeodeticLocation) -> Self {
        ResponseValue::map([
            ("EPOCH", ResponseValue::text(location.epoch_text())),
            ("LATITUDE", ResponseValue::measure(location.latitude, UNIT_DEG)),
            ("LONGITUDE", ResponseValue::measure(location.longitude, UNIT_DEG)),
            ("ALTITUDE", ResponseValue::measure(location.altitude, UNIT_KM)),
        ])
    }
}

fn optional_text(text: &Option<String>) -> ResponseValue {
    text.as_deref()
        .map(ResponseValue::text)
        .unwrap_or(ResponseValue::NoResult)
}

impl From<&Place> for ResponseValue {
    fn from(place: &Place) -> Self {
        ResponseValue::map([
            ("COUNTRY", optional_text(&place.country)),
            ("COUNTRY_CODE", optional_text(&place.country_code)),
            ("STATE", optional_text(&place.state)),
            ("LOCALITY", optional_text(&place.locality)),
            ("DISPLAY_NAME", optional_text(&place.display_name)),
        ])
    }
}

impl From<&PlaceLookup> for ResponseValue {
    fn from(lookup: &PlaceLookup) -> Self {
        match lookup {
            PlaceLookup::Found(place) => ResponseValue::from(place),
            PlaceLookup::NoMatch => ResponseValue::NoResult,
        }
    }
}

impl From<&BTreeMap<String, String>> for ResponseValue {
    fn from(block: &BTreeMap<String, String>) -> Self {
        ResponseValue::map(
            block
                .iter()
                .map(|(k, v)| (k.clone(), ResponseValue::text(v.clone()))),
        )
    }
}
