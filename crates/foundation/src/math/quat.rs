//! Unit quaternions for globe and camera orientation.
//!
//! Layout is `(x, y, z, w)` with `w` the scalar part. Composition follows
//! the usual convention: `a * b` applies `b` first, then `a`.

use super::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle_rad` about `axis` (need not be normalized).
    pub fn from_axis_angle(axis: Vec3, angle_rad: f64) -> Self {
        let Some(axis) = axis.try_normalize() else {
            return Self::IDENTITY;
        };
        let (s, c) = (angle_rad * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    pub fn from_rotation_x(angle_rad: f64) -> Self {
        Self::from_axis_angle(Vec3::X, angle_rad)
    }

    pub fn from_rotation_y(angle_rad: f64) -> Self {
        Self::from_axis_angle(Vec3::Y, angle_rad)
    }

    /// Euler angles in `YXZ` order: roll about Z first, then pitch about X,
    /// then yaw about Y.
    pub fn from_euler_yxz(pitch_rad: f64, yaw_rad: f64, roll_rad: f64) -> Self {
        Self::from_rotation_y(yaw_rad)
            * Self::from_rotation_x(pitch_rad)
            * Self::from_axis_angle(Vec3::Z, roll_rad)
    }

    /// Shortest rotation taking unit vector `a` onto unit vector `b`.
    pub fn from_unit_vectors(a: Vec3, b: Vec3) -> Self {
        let dot = a.dot(b).clamp(-1.0, 1.0);

        // Nearly opposite vectors: pick arbitrary orthogonal axis.
        if dot < -0.999999 {
            let mut axis = Vec3::X.cross(a);
            if axis.dot(axis) < 1e-12 {
                axis = Vec3::Y.cross(a);
            }
            let axis = axis.normalize_or_zero();
            return Self::new(axis.x, axis.y, axis.z, 0.0);
        }

        // Nearly identical vectors: return identity.
        if dot > 0.999999 {
            return Self::IDENTITY;
        }

        let axis = a.cross(b);
        Self::new(axis.x, axis.y, axis.z, 1.0 + dot).normalize()
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Self {
        let n = self.length();
        if n > 1e-10 {
            Self::new(self.x / n, self.y / n, self.z / n, self.w / n)
        } else {
            Self::IDENTITY
        }
    }

    /// Inverse for unit quaternions.
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    pub fn rotate(self, v: Vec3) -> Vec3 {
        let qv = Vec3::new(self.x, self.y, self.z);
        let t = qv.cross(v) * 2.0;
        v + t * self.w + qv.cross(t)
    }

    /// Rotation angle in `[0, PI]`, treating `q` and `-q` alike.
    pub fn angle(self) -> f64 {
        2.0 * self.w.abs().clamp(0.0, 1.0).acos()
    }

    /// Angle of the relative rotation between two orientations.
    pub fn angle_to(self, other: Self) -> f64 {
        (other * self.conjugate()).angle()
    }

    /// Spherical linear interpolation along the shortest arc.
    pub fn slerp(self, other: Self, t: f64) -> Self {
        let mut dot = self.dot(other);

        // If dot is negative, negate one quaternion to take shorter path.
        let mut b = other;
        if dot < 0.0 {
            b = Self::new(-b.x, -b.y, -b.z, -b.w);
            dot = -dot;
        }

        // If quaternions are very close, use linear interpolation.
        if dot > 0.9995 {
            return Self::new(
                self.x + t * (b.x - self.x),
                self.y + t * (b.y - self.y),
                self.z + t * (b.z - self.z),
                self.w + t * (b.w - self.w),
            )
            .normalize();
        }

        let theta_0 = dot.clamp(-1.0, 1.0).acos();
        let theta = theta_0 * t;
        let sin_theta = theta.sin();
        let sin_theta_0 = theta_0.sin();

        let s0 = theta.cos() - dot * sin_theta / sin_theta_0;
        let s1 = sin_theta / sin_theta_0;

        Self::new(
            s0 * self.x + s1 * b.x,
            s0 * self.y + s1 * b.y,
            s0 * self.z + s1 * b.z,
            s0 * self.w + s1 * b.w,
        )
    }
}

impl std::ops::Mul for Quat {
    type Output = Self;

    fn mul(self, b: Self) -> Self::Output {
        let a = self;
        Self::new(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }
}
