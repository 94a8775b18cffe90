//! Latitude/longitude to globe-surface positions.
//!
//! The rendered sphere is Y-up with +Z facing the viewer at (0°, 0°) and +X
//! to the right. Textures disagree about where the prime meridian sits and
//! which way east runs, so the longitude sign and offset are calibration
//! constants fixed per scene rather than per call.

use super::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereCalibration {
    /// `1.0` or `-1.0`; flips east/west.
    pub lon_sign: f64,
    /// Added after the sign flip, in degrees.
    pub lon_offset_deg: f64,
}

impl Default for SphereCalibration {
    fn default() -> Self {
        Self {
            lon_sign: 1.0,
            lon_offset_deg: 0.0,
        }
    }
}

impl SphereCalibration {
    pub fn project(&self, lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
        let lat = lat_deg.to_radians();
        let lon = (lon_deg * self.lon_sign + self.lon_offset_deg).to_radians();
        let cos_lat = lat.cos();

        Vec3::new(
            radius * cos_lat * lon.sin(),
            radius * lat.sin(),
            radius * cos_lat * lon.cos(),
        )
    }

    /// Inverse of [`SphereCalibration::project`]; returns `(lat_deg, lon_deg)`.
    ///
    /// Longitude is wrapped to `(-180, 180]`. At the poles it is reported as 0.
    pub fn unproject(&self, p: Vec3) -> (f64, f64) {
        let r = p.length();
        if r <= 0.0 {
            return (0.0, 0.0);
        }
        let lat = (p.y / r).clamp(-1.0, 1.0).asin().to_degrees();
        let horizontal = (p.x * p.x + p.z * p.z).sqrt();
        if horizontal <= 1e-12 * r {
            return (lat, 0.0);
        }
        let raw = p.x.atan2(p.z).to_degrees();
        let lon = wrap_lon_deg((raw - self.lon_offset_deg) * self.lon_sign);
        (lat, lon)
    }
}

/// Project with the default calibration.
pub fn project(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
    SphereCalibration::default().project(lat_deg, lon_deg, radius)
}

pub fn wrap_lon_deg(lon: f64) -> f64 {
    let mut l = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if l <= -180.0 {
        l += 360.0;
    }
    l
}
