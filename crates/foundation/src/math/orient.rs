use super::{Quat, SphereCalibration, Vec3};

/// Where a focused point should end up, relative to the viewer's forward axis.
///
/// Both angles are right-handed rotations of the forward axis: positive yaw
/// (about +Y) swings it right, negative pitch (about +X) tilts it up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AimOffset {
    pub yaw_deg: f64,
    pub pitch_deg: f64,
}

impl Default for AimOffset {
    fn default() -> Self {
        Self {
            yaw_deg: 35.0,
            pitch_deg: -30.0,
        }
    }
}

impl AimOffset {
    pub fn centered() -> Self {
        Self {
            yaw_deg: 0.0,
            pitch_deg: 0.0,
        }
    }

    /// +Z rotated by pitch about X, then by yaw about Y.
    pub fn direction(&self) -> Vec3 {
        let q = Quat::from_euler_yxz(self.pitch_deg.to_radians(), self.yaw_deg.to_radians(), 0.0);
        q.rotate(Vec3::Z).normalize_or_zero()
    }
}

/// Rotation that brings the surface point `point` (globe-local) onto the
/// aim direction.
pub fn focus_rotation(point: Vec3, aim: AimOffset) -> Quat {
    let Some(v) = point.try_normalize() else {
        return Quat::IDENTITY;
    };
    Quat::from_unit_vectors(v, aim.direction())
}

/// [`focus_rotation`] for a latitude/longitude pair.
pub fn focus_rotation_lat_lon(
    calibration: &SphereCalibration,
    lat_deg: f64,
    lon_deg: f64,
    aim: AimOffset,
) -> Quat {
    focus_rotation(calibration.project(lat_deg, lon_deg, 1.0), aim)
}

#[cfg(test)]
mod tests {
    use super::{AimOffset, focus_rotation, focus_rotation_lat_lon};
    use crate::math::{Quat, SphereCalibration, Vec3};

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        let diff = a.distance(b);
        assert!(diff <= eps, "expected {a:?} ~= {b:?} (diff {diff})");
    }

    #[test]
    fn centered_aim_is_forward() {
        assert_vec_close(AimOffset::centered().direction(), Vec3::Z, 1e-12);
    }

    #[test]
    fn default_aim_is_right_and_up() {
        let d = AimOffset::default().direction();
        assert!(d.x > 0.0, "yaw 35 should push right: {d:?}");
        assert!(d.y > 0.0, "pitch -30 should tilt up: {d:?}");
        assert!((d.length() - 1.0).abs() < 1e-12);
        // Pitch about X by -30 deg takes +Z to (0, sin 30, cos 30).
        let pitch_only = AimOffset {
            yaw_deg: 0.0,
            pitch_deg: -30.0,
        }
        .direction();
        assert_vec_close(pitch_only, Vec3::new(0.0, 0.5, 3f64.sqrt() / 2.0), 1e-12);
    }

    #[test]
    fn focused_point_lands_on_aim() {
        let cal = SphereCalibration::default();
        let aim = AimOffset::default();
        for (lat, lon) in [(-7.7956, 110.3695), (52.3759, 9.732), (43.2389, 76.8897)] {
            let q = focus_rotation_lat_lon(&cal, lat, lon, aim);
            let p = cal.project(lat, lon, 1.0);
            assert_vec_close(q.rotate(p), aim.direction(), 1e-9);
        }
    }

    #[test]
    fn degenerate_point_is_identity() {
        assert_eq!(focus_rotation(Vec3::ZERO, AimOffset::default()), Quat::IDENTITY);
    }
}
