//! # Constants and type definitions for the ISS tracker
//!
//! This module centralizes the **physical constants**, **conversion factors** and **unit labels**
//! used throughout the crate.
//!
//! ## Overview
//!
//! - Geophysical constants (spherical Earth radius, sidereal rotation model)
//! - Unit conversions (degrees ↔ radians)
//! - Unit strings attached to every numeric output
//! - Type aliases documenting the unit carried by a bare `f64`

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Earth equatorial radius in kilometers (GRS1980/WGS84), used as a spherical Earth radius
pub const EARTH_RADIUS_KM: f64 = 6_378.137;

/// Greenwich sidereal angle at J2000.0 (2000-01-01 12:00:00 UTC), in degrees
pub const GST_J2000_DEG: f64 = 280.460_618_37;

/// Earth rotation rate with respect to the inertial frame, in degrees per day
pub const SIDEREAL_RATE_DEG_PER_DAY: f64 = 360.985_647_366_29;

// -------------------------------------------------------------------------------------------------
// Feed defaults
// -------------------------------------------------------------------------------------------------

/// Public NASA ISS trajectory data, OEM XML encoding, J2000 frame
pub const ISS_OEM_URL: &str =
    "https://nasa-public-data.s3.amazonaws.com/iss-coords/current/ISS_OEM/ISS.OEM_J2K_EPH.xml";

/// Public Nominatim reverse-geocoding endpoint
pub const NOMINATIM_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

// -------------------------------------------------------------------------------------------------
// Unit labels
// -------------------------------------------------------------------------------------------------

pub const UNIT_KM: &str = "km";
pub const UNIT_KM_PER_S: &str = "km/s";
pub const UNIT_DEG: &str = "deg";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Speed in kilometers per second
pub type KmPerSec = f64;
