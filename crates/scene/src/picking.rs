use foundation::math::Vec3;

use crate::components::Transform;
use crate::markers::MarkerRegistry;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerHit {
    pub index: usize,
    pub distance: f64,
    pub point: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    /// Marker hit radius in globe-local units.
    pub marker_radius: f64,
    /// Radius of the occluding globe, globe-local.
    pub globe_radius: f64,
    pub max_distance: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            marker_radius: 0.06,
            globe_radius: 2.0,
            max_distance: 1.0e30,
        }
    }
}

/// Nearest entry distance of `ray` (unit direction) into a sphere.
///
/// A ray starting inside the sphere hits at 0.
pub fn ray_sphere_hit_t(ray: Ray, center: Vec3, radius: f64) -> Option<f64> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.dot(oc) - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let disc = b * b - c;
    if disc < 0.0 || b > 0.0 {
        return None;
    }
    Some(-b - disc.sqrt())
}

/// Ray picking of visible markers on a transformed globe.
///
/// Ordering contract:
/// - The closest hit along the (normalized) ray wins.
/// - If multiple markers are hit at the same distance, the lower index wins.
/// - Markers on the far side of the globe are occluded by it.
pub fn pick_markers(
    ray: Ray,
    markers: &MarkerRegistry,
    globe: &Transform,
    opts: PickOptions,
) -> Option<MarkerHit> {
    let dir = ray.dir.try_normalize()?;
    let ray = Ray::new(ray.origin, dir);

    let globe_t = ray_sphere_hit_t(ray, globe.position, opts.globe_radius * globe.scale);
    let pick_radius = opts.marker_radius * globe.scale;

    let mut best: Option<(f64, usize)> = None;
    for (index, marker) in markers.markers().iter().enumerate() {
        if !marker.visible {
            continue;
        }
        let center = globe.apply(marker.position);
        let Some(t) = ray_sphere_hit_t(ray, center, pick_radius) else {
            continue;
        };
        if t > opts.max_distance {
            continue;
        }
        if globe_t.is_some_and(|g| g + 1e-9 < t) {
            continue;
        }

        best = match best {
            Some((bt, bi)) if t.total_cmp(&bt).then_with(|| index.cmp(&bi)).is_ge() => {
                Some((bt, bi))
            }
            _ => Some((t, index)),
        };
    }

    let (distance, index) = best?;
    Some(MarkerHit {
        index,
        distance,
        point: ray.at(distance),
    })
}

#[cfg(test)]
mod tests {
    use super::{PickOptions, Ray, pick_markers, ray_sphere_hit_t};
    use crate::components::Transform;
    use crate::markers::{MarkerRegistry, PointOfInterest};
    use foundation::math::{SphereCalibration, Vec3};

    fn poi(lat: f64, lon: f64) -> PointOfInterest {
        PointOfInterest {
            title: String::new(),
            country: String::new(),
            city: String::new(),
            lat,
            lon,
            rating: Some(5),
        }
    }

    fn registry(points: &[(f64, f64)]) -> MarkerRegistry {
        let pois: Vec<_> = points.iter().map(|&(lat, lon)| poi(lat, lon)).collect();
        let mut reg = MarkerRegistry::new(&pois, &SphereCalibration::default(), 2.01);
        reg.set_visible(|_| true);
        reg
    }

    fn toward(origin: Vec3, target: Vec3) -> Ray {
        Ray::new(origin, target - origin)
    }

    #[test]
    fn sphere_hit_distance() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z);
        let t = ray_sphere_hit_t(ray, Vec3::ZERO, 2.0).expect("hit");
        assert!((t - 8.0).abs() < 1e-12);
        let beside = Ray::new(Vec3::new(3.0, 0.0, 10.0), -Vec3::Z);
        assert!(ray_sphere_hit_t(beside, Vec3::ZERO, 2.0).is_none());
        let away = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(ray_sphere_hit_t(away, Vec3::ZERO, 2.0).is_none());
    }

    #[test]
    fn ray_picks_front_marker() {
        let reg = registry(&[(0.0, 0.0), (0.0, 90.0)]);
        let eye = Vec3::new(0.0, 0.0, 6.0);
        let hit = pick_markers(
            toward(eye, Vec3::new(0.0, 0.0, 2.01)),
            &reg,
            &Transform::identity(),
            PickOptions::default(),
        )
        .expect("hit");
        assert_eq!(hit.index, 0);
        assert!(hit.distance < 4.0);
    }

    #[test]
    fn hidden_markers_are_skipped() {
        let mut reg = registry(&[(0.0, 0.0)]);
        reg.set_visible(|_| false);
        let ray = toward(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO);
        assert!(pick_markers(ray, &reg, &Transform::identity(), PickOptions::default()).is_none());
    }

    #[test]
    fn far_side_markers_are_occluded() {
        let reg = registry(&[(0.0, 180.0)]);
        let ray = toward(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO);
        assert!(pick_markers(ray, &reg, &Transform::identity(), PickOptions::default()).is_none());
    }

    #[test]
    fn tie_breaks_by_lower_index() {
        let reg = registry(&[(10.0, 20.0), (10.0, 20.0)]);
        let target = SphereCalibration::default().project(10.0, 20.0, 2.01);
        let ray = toward(target * 3.0, target);
        let hit =
            pick_markers(ray, &reg, &Transform::identity(), PickOptions::default()).expect("hit");
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn picking_follows_globe_transform() {
        let reg = registry(&[(0.0, 0.0)]);
        let globe = Transform {
            position: Vec3::new(-5.0, -3.1, 0.0),
            scale: 1.55,
            ..Transform::identity()
        };
        let marker_world = globe.apply(Vec3::new(0.0, 0.0, 2.01));
        let eye = Vec3::new(0.0, 0.0, 6.0);
        let hit = pick_markers(toward(eye, marker_world), &reg, &globe, PickOptions::default());
        assert_eq!(hit.map(|h| h.index), Some(0));
        let untransformed = toward(eye, Vec3::new(0.0, 0.0, 2.01));
        assert!(pick_markers(untransformed, &reg, &globe, PickOptions::default()).is_none());
    }
}
