//! # Inertial to geodetic conversion
//!
//! Converts the inertial position of a [`StateVector`] into latitude, longitude and altitude
//! above a **spherical** Earth.
//!
//! ## Model
//!
//! ```text
//! latitude  = atan2(Z, sqrt(X² + Y²))
//! longitude = atan2(Y, X) − θ(epoch)          wrapped to [-180°, 180°)
//! altitude  = sqrt(X² + Y² + Z²) − R⊕        R⊕ = 6378.137 km
//! ```
//!
//! where θ is the Greenwich sidereal angle of [`greenwich_sidereal_angle`]. The latitude is
//! geocentric, no ellipsoid flattening is applied. The same inputs always give the same output.
use hifitime::Epoch;

use crate::{
    constants::{Degree, Kilometer, EARTH_RADIUS_KM},
    oem::StateVector,
    time::{format_oem_epoch, greenwich_sidereal_angle},
};

/// Geodetic position of the spacecraft at one epoch, recomputed for every query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticLocation {
    pub epoch: Epoch,
    pub latitude: Degree,
    pub longitude: Degree,
    pub altitude: Kilometer,
}

impl GeodeticLocation {
    pub fn epoch_text(&self) -> String {
        format_oem_epoch(&self.epoch)
    }
}

/// Wrap a longitude in degrees into [-180, 180).
pub fn wrap_longitude(longitude: Degree) -> Degree {
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Geodetic coordinates of a state vector.
///
/// Arguments
/// ---------
/// * `state_vector`: the sample, position in km in the Earth-centered inertial frame
///
/// Return
/// ------
/// * latitude and longitude in degrees, altitude in km, tagged with the sample epoch
pub fn locate(state_vector: &StateVector) -> GeodeticLocation {
    let position = &state_vector.position;
    let (x, y, z) = (position.x, position.y, position.z);

    let latitude = z.atan2(x.hypot(y)).to_degrees();
    let inertial_longitude = y.atan2(x).to_degrees();
    let rotation = greenwich_sidereal_angle(&state_vector.epoch).to_degrees();

    GeodeticLocation {
        epoch: state_vector.epoch,
        latitude,
        longitude: wrap_longitude(inertial_longitude - rotation),
        altitude: position.norm() - EARTH_RADIUS_KM,
    }
}
