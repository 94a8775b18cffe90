use foundation::math::{Mat4, SphereCalibration, Vec3};
use runtime::{Animatable, Property, TargetId, TweenKey, TweenValue};

use crate::components::{Camera, Transform};
use crate::markers::{MarkerRegistry, PointOfInterest};
use crate::picking::{MarkerHit, PickOptions, Ray, pick_markers};

pub const DEFAULT_GLOBE_RADIUS: f64 = 2.0;
/// Marker radius relative to the globe radius.
pub const DEFAULT_MARKER_LIFT: f64 = 1.005;

/// Everything the renderer draws: camera, globe group, starfield, curtain.
#[derive(Debug)]
pub struct World {
    pub camera: Camera,
    /// Transform of the globe group (globe mesh plus markers and labels).
    pub globe: Transform,
    pub globe_radius: f64,
    /// Starfield yaw (radians).
    pub starfield_rotation: f64,
    /// Full-bleed curtain coverage, `0` open to `1` covered.
    pub curtain_coverage: f64,
    pub markers: MarkerRegistry,
    pub calibration: SphereCalibration,
}

impl Default for World {
    fn default() -> Self {
        Self::new(&[], SphereCalibration::default(), DEFAULT_GLOBE_RADIUS, DEFAULT_MARKER_LIFT)
    }
}

impl World {
    pub fn new(
        points: &[PointOfInterest],
        calibration: SphereCalibration,
        globe_radius: f64,
        marker_lift: f64,
    ) -> Self {
        Self {
            camera: Camera::default(),
            globe: Transform::identity(),
            globe_radius,
            starfield_rotation: 0.0,
            curtain_coverage: 0.0,
            markers: MarkerRegistry::new(points, &calibration, globe_radius * marker_lift),
            calibration,
        }
    }

    pub fn globe_model(&self) -> Mat4 {
        self.globe.model_matrix()
    }

    pub fn marker_world_position(&self, index: usize) -> Option<Vec3> {
        self.markers.marker(index).map(|m| self.globe.apply(m.position))
    }

    pub fn pick(&self, ray: Ray, marker_radius: f64) -> Option<MarkerHit> {
        pick_markers(
            ray,
            &self.markers,
            &self.globe,
            PickOptions {
                marker_radius,
                globe_radius: self.globe_radius,
                ..PickOptions::default()
            },
        )
    }
}

impl Animatable for World {
    fn read(&self, key: TweenKey) -> Option<TweenValue> {
        match (key.target, key.property) {
            (TargetId::Globe, Property::Position) => Some(TweenValue::Vec3(self.globe.position)),
            (TargetId::Globe, Property::Scale) => Some(TweenValue::Scalar(self.globe.scale)),
            (TargetId::Globe, Property::Rotation) => Some(TweenValue::Quat(self.globe.rotation)),
            (TargetId::Camera, Property::Position) => Some(TweenValue::Vec3(self.camera.position)),
            (TargetId::Camera, Property::Target) => Some(TweenValue::Vec3(self.camera.target)),
            (TargetId::Curtain, Property::Coverage) => {
                Some(TweenValue::Scalar(self.curtain_coverage))
            }
            (TargetId::Marker(_) | TargetId::Label(_), _) => self.markers.read(key),
            _ => None,
        }
    }

    fn write(&mut self, key: TweenKey, value: TweenValue) {
        match (key.target, key.property, value) {
            (TargetId::Globe, Property::Position, TweenValue::Vec3(v)) => self.globe.position = v,
            (TargetId::Globe, Property::Scale, TweenValue::Scalar(s)) => self.globe.scale = s,
            (TargetId::Globe, Property::Rotation, TweenValue::Quat(q)) => {
                self.globe.rotation = q.normalize()
            }
            (TargetId::Camera, Property::Position, TweenValue::Vec3(v)) => self.camera.position = v,
            (TargetId::Camera, Property::Target, TweenValue::Vec3(v)) => self.camera.target = v,
            (TargetId::Curtain, Property::Coverage, TweenValue::Scalar(c)) => {
                self.curtain_coverage = c.clamp(0.0, 1.0)
            }
            (TargetId::Marker(_) | TargetId::Label(_), _, _) => self.markers.write(key, value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::World;
    use crate::markers::PointOfInterest;
    use foundation::math::{Quat, SphereCalibration, Vec2, Vec3};
    use runtime::{Animatable, Ease, Property, TargetId, TweenKey, TweenSpec, TweenValue, Tweener};

    fn world_with_points() -> World {
        let points = vec![PointOfInterest {
            title: "Hackathon".to_string(),
            country: "Kazakhstan".to_string(),
            city: "Almaty".to_string(),
            lat: 0.0,
            lon: 0.0,
            rating: None,
        }];
        World::new(&points, SphereCalibration::default(), 2.0, 1.005)
    }

    #[test]
    fn markers_are_lifted_off_the_surface() {
        let world = world_with_points();
        let p = world.marker_world_position(0).expect("marker");
        assert!((p.z - 2.01).abs() < 1e-12);
        assert!(world.marker_world_position(1).is_none());
    }

    #[test]
    fn tweens_drive_globe_and_camera() {
        let mut world = world_with_points();
        let mut tw = Tweener::new();
        let pos = TweenKey::new(TargetId::Globe, Property::Position);
        let rot = TweenKey::new(TargetId::Globe, Property::Rotation);
        let cam = TweenKey::new(TargetId::Camera, Property::Position);
        let target_q = Quat::from_rotation_y(0.8);

        tw.animate_to(
            &mut world,
            pos,
            TweenValue::Vec3(Vec3::new(-5.0, -3.1, 0.0)),
            TweenSpec::once(1.2, Ease::Power2Out),
        );
        tw.animate_to(
            &mut world,
            rot,
            TweenValue::Quat(target_q),
            TweenSpec::once(1.1, Ease::Power2InOut),
        );
        tw.animate_to(
            &mut world,
            cam,
            TweenValue::Vec3(Vec3::new(0.0, 1.0, 8.0)),
            TweenSpec::once(1.2, Ease::Power2Out),
        );
        for _ in 0..20 {
            tw.tick(0.1, &mut world);
        }
        assert_eq!(world.globe.position, Vec3::new(-5.0, -3.1, 0.0));
        assert!(world.globe.rotation.angle_to(target_q) < 1e-9);
        assert_eq!(world.camera.position, Vec3::new(0.0, 1.0, 8.0));
    }

    #[test]
    fn curtain_is_clamped_and_mismatched_values_ignored() {
        let mut world = World::default();
        let key = TweenKey::new(TargetId::Curtain, Property::Coverage);
        world.write(key, TweenValue::Scalar(1.7));
        assert_eq!(world.curtain_coverage, 1.0);
        world.write(key, TweenValue::Vec3(Vec3::X));
        assert_eq!(world.read(key), Some(TweenValue::Scalar(1.0)));
    }

    #[test]
    fn world_pick_uses_camera_rays() {
        let mut world = world_with_points();
        world.markers.set_visible(|_| true);
        let ray = world.camera.ray_from_ndc(Vec2::new(0.0, 0.0));
        assert_eq!(world.pick(ray, 0.06).map(|h| h.index), Some(0));
    }
}
