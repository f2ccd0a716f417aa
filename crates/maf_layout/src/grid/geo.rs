//! Geographic coordinates and the Web Mercator projection used to reach local metres.
use std::f64::consts::PI;

use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mean earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Equatorial circumference used to scale Mercator units into metres.
pub const EARTH_CIRCUMFERENCE_M: f64 = 2.0 * PI * EARTH_RADIUS_M;

/// A longitude/latitude pair in degrees (WGS84).
///
/// Serialized as a GeoJSON position `[lng, lat]`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[f64; 2]", into = "[f64; 2]"))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoCoord {
    /// Longitude in degrees, east positive.
    pub lng: f64,
    /// Latitude in degrees, north positive.
    pub lat: f64,
}

impl GeoCoord {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for GeoCoord {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<GeoCoord> for [f64; 2] {
    fn from(value: GeoCoord) -> Self {
        [value.lng, value.lat]
    }
}

impl From<mint::Point2<f64>> for GeoCoord {
    fn from(value: mint::Point2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<GeoCoord> for mint::Point2<f64> {
    fn from(value: GeoCoord) -> Self {
        mint::Point2 {
            x: value.lng,
            y: value.lat,
        }
    }
}

/// Projects a geographic coordinate into Web Mercator unit space (`[0, 1]²`, y growing south).
pub fn to_mercator(geo: GeoCoord) -> DVec2 {
    let x = (180.0 + geo.lng) / 360.0;
    let y = (180.0 - (180.0 / PI) * (PI / 4.0 + geo.lat * PI / 360.0).tan().ln()) / 360.0;
    DVec2::new(x, y)
}

/// Inverse of [`to_mercator`].
pub fn from_mercator(m: DVec2) -> GeoCoord {
    let lng = m.x * 360.0 - 180.0;
    let y2 = 180.0 - m.y * 360.0;
    let lat = 360.0 / PI * (y2 * PI / 180.0).exp().atan() - 90.0;
    GeoCoord::new(lng, lat)
}

/// Number of metres covered by one Mercator unit at the given latitude.
pub fn meters_per_mercator_unit(lat: f64) -> f64 {
    EARTH_CIRCUMFERENCE_M * lat.to_radians().cos()
}
