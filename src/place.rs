//! # Place resolution
//!
//! Reverse geocoding is an external collaborator of the tracker: given the latitude and longitude
//! under the spacecraft, it names the region below, or reports that there is none (open ocean,
//! polar caps…). [`PlaceResolver`] is the seam; two implementations are provided:
//!
//! - [`NominatimResolver`] queries an OpenStreetMap Nominatim `reverse` endpoint.
//! - [`NoGeocoder`] never resolves anything, for offline use.
use serde::Deserialize;

use crate::{
    constants::Degree,
    env_state::TrackerEnv,
    tracker_errors::TrackerError,
};

/// Administrative description of a point on the ground.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Place {
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub state: Option<String>,
    pub locality: Option<String>,
    pub display_name: Option<String>,
}

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceLookup {
    Found(Place),
    NoMatch,
}

pub trait PlaceResolver {
    /// Name the region at (`latitude`, `longitude`), both in degrees.
    ///
    /// `Ok(PlaceLookup::NoMatch)` means the lookup succeeded but nothing lies there; `Err` means
    /// the resolver itself could not answer.
    fn resolve(&self, latitude: Degree, longitude: Degree) -> Result<PlaceLookup, TrackerError>;
}

/// Resolver that never finds a place.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeocoder;

impl PlaceResolver for NoGeocoder {
    fn resolve(&self, _latitude: Degree, _longitude: Degree) -> Result<PlaceLookup, TrackerError> {
        Ok(PlaceLookup::NoMatch)
    }
}

#[derive(Debug, Clone)]
pub struct NominatimResolver {
    env: TrackerEnv,
    url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    error: Option<String>,
    display_name: Option<String>,
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    county: Option<String>,
    state: Option<String>,
    region: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
}

impl NominatimResolver {
    pub fn new(env: TrackerEnv, url: impl Into<String>) -> Self {
        NominatimResolver {
            env,
            url: url.into(),
        }
    }
}

impl PlaceResolver for NominatimResolver {
    fn resolve(&self, latitude: Degree, longitude: Degree) -> Result<PlaceLookup, TrackerError> {
        let body = self.env.get_from_url(
            &self.url,
            &[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("zoom", "10".to_string()),
            ],
        )?;
        parse_nominatim(&body)
    }
}

/// Interpret the JSON body of a Nominatim `reverse` call.
///
/// Nominatim answers `{"error": "Unable to geocode"}` with a success status when no place
/// exists at the requested point, which maps to [`PlaceLookup::NoMatch`].
pub(crate) fn parse_nominatim(body: &str) -> Result<PlaceLookup, TrackerError> {
    let reply: NominatimReverse = serde_json::from_str(body)?;
    if reply.error.is_some() {
        return Ok(PlaceLookup::NoMatch);
    }

    let address = reply.address.unwrap_or_default();
    let place = Place {
        locality: address
            .city
            .or(address.town)
            .or(address.village)
            .or(address.county),
        state: address.state.or(address.region),
        country: address.country,
        country_code: address.country_code,
        display_name: reply.display_name,
    };

    if place == Place::default() {
        Ok(PlaceLookup::NoMatch)
    } else {
        Ok(PlaceLookup::Found(place))
    }
}
