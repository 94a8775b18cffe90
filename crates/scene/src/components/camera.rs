use foundation::math::{
    Mat4, Vec2, Vec3, mat4_look_at_rh, mat4_mul, mat4_perspective_rh_z0, mat4_transform_point,
};

use crate::picking::Ray;

/// Perspective camera looking at a fixed target.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 6.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_deg: 60.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Ignores non-positive or non-finite sizes.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 && (width / height).is_finite() {
            self.aspect = width / height;
        }
    }

    pub fn view(&self) -> Mat4 {
        mat4_look_at_rh(self.position, self.target, self.up)
    }

    pub fn proj(&self) -> Mat4 {
        mat4_perspective_rh_z0(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        mat4_mul(self.proj(), self.view())
    }

    /// World-space ray through a point in normalized device coordinates
    /// (`x` right, `y` up, both in `[-1, 1]`).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        let tan_half = (0.5 * self.fov_y_deg.to_radians()).tan();

        let dir = forward + right * (ndc.x * tan_half * self.aspect) + up * (ndc.y * tan_half);
        Ray::new(self.position, dir.normalize_or_zero())
    }

    /// NDC of a world point, or `None` when it is behind the camera.
    pub fn project_to_ndc(&self, world: Vec3) -> Option<Vec2> {
        let clip = mat4_transform_point(self.view_proj(), world);
        if clip[3] <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            (clip[0] / clip[3]) as f64,
            (clip[1] / clip[3]) as f64,
        ))
    }
}

/// Pixel position (origin top-left) to NDC.
pub fn ndc_from_pixels(x_px: f64, y_px: f64, width_px: f64, height_px: f64) -> Option<Vec2> {
    if !(width_px > 0.0 && height_px > 0.0) {
        return None;
    }
    Some(Vec2::new(
        x_px / width_px * 2.0 - 1.0,
        1.0 - y_px / height_px * 2.0,
    ))
}
