//! Column-major `f32` matrices in the layout WGSL expects.

use super::{Quat, Vec3};

pub type Mat4 = [[f32; 4]; 4];

pub const MAT4_IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

pub fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    // Column-major matrix multiply: c = a * b
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

/// Right-handed perspective projection with depth range `[0, 1]`.
pub fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

pub fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalize_or_zero();
    let s = f.cross(up).normalize_or_zero();
    let u = s.cross(f);

    let ex = -s.dot(eye);
    let ey = -u.dot(eye);
    let ez = f.dot(eye);

    [
        [s.x as f32, u.x as f32, (-f.x) as f32, 0.0],
        [s.y as f32, u.y as f32, (-f.y) as f32, 0.0],
        [s.z as f32, u.z as f32, (-f.z) as f32, 0.0],
        [ex as f32, ey as f32, ez as f32, 1.0],
    ]
}

/// Model matrix: scale, then rotate, then translate.
pub fn mat4_from_scale_rotation_translation(scale: f64, rotation: Quat, translation: Vec3) -> Mat4 {
    let bx = rotation.rotate(Vec3::X) * scale;
    let by = rotation.rotate(Vec3::Y) * scale;
    let bz = rotation.rotate(Vec3::Z) * scale;
    [
        [bx.x as f32, bx.y as f32, bx.z as f32, 0.0],
        [by.x as f32, by.y as f32, by.z as f32, 0.0],
        [bz.x as f32, bz.y as f32, bz.z as f32, 0.0],
        [
            translation.x as f32,
            translation.y as f32,
            translation.z as f32,
            1.0,
        ],
    ]
}

pub fn mat4_transform_point(m: Mat4, p: Vec3) -> [f32; 4] {
    let (x, y, z) = (p.x as f32, p.y as f32, p.z as f32);
    let mut out = [0.0f32; 4];
    for (row, o) in out.iter_mut().enumerate() {
        *o = m[0][row] * x + m[1][row] * y + m[2][row] * z + m[3][row];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32, eps: f32) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn identity_is_neutral_for_mul() {
        let m = mat4_from_scale_rotation_translation(
            2.0,
            Quat::from_rotation_y(0.3),
            Vec3::new(1.0, 2.0, 3.0),
        );
        assert_eq!(mat4_mul(MAT4_IDENTITY, m), m);
        assert_eq!(mat4_mul(m, MAT4_IDENTITY), m);
    }

    #[test]
    fn model_matrix_scales_then_translates() {
        let m = mat4_from_scale_rotation_translation(
            0.5,
            Quat::IDENTITY,
            Vec3::new(-5.0, -3.1, 0.0),
        );
        let p = mat4_transform_point(m, Vec3::new(2.0, 0.0, 0.0));
        assert_close(p[0], -4.0, 1e-6);
        assert_close(p[1], -3.1, 1e-6);
        assert_close(p[3], 1.0, 1e-6);
    }

    #[test]
    fn look_at_puts_target_on_negative_z() {
        let view = mat4_look_at_rh(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, Vec3::Y);
        let p = mat4_transform_point(view, Vec3::ZERO);
        assert_close(p[0], 0.0, 1e-6);
        assert_close(p[1], 0.0, 1e-6);
        assert_close(p[2], -6.0, 1e-6);
    }
}
