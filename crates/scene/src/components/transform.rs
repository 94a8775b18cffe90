use foundation::math::{Mat4, Quat, Vec3, mat4_from_scale_rotation_translation};

/// Uniform-scale rigid transform of a scene group.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: f64,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: 1.0,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn translate(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Local point to parent space: scale, rotate, then translate.
    pub fn apply(&self, local: Vec3) -> Vec3 {
        self.rotation.rotate(local * self.scale) + self.position
    }

    pub fn model_matrix(&self) -> Mat4 {
        mat4_from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}
