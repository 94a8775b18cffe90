use foundation::math::Vec3;
use runtime::Ease;

use crate::config::{CurtainWindow, OrbitConfig, PoseConfig, PosesConfig};
use crate::section::{Partition, SectionState};

/// Where the globe group and camera rest while a section is active.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SectionPose {
    pub position: Vec3,
    pub scale: f64,
    pub camera: Vec3,
}

impl From<PoseConfig> for SectionPose {
    fn from(c: PoseConfig) -> Self {
        Self {
            position: c.position(),
            scale: c.scale,
            camera: c.camera(),
        }
    }
}

impl SectionPose {
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            scale: self.scale + (other.scale - self.scale) * t,
            camera: self.camera.lerp(other.camera, t),
        }
    }
}

pub fn pose_for(poses: &PosesConfig, section: SectionState) -> SectionPose {
    let c = match section {
        SectionState::Hero => poses.hero,
        SectionState::Focus => poses.focus,
        SectionState::Transition => poses.transition,
        SectionState::Showcase2 => poses.showcase,
        SectionState::Contacts => poses.contacts,
    };
    c.into()
}

/// Pose of `section` at pinned `progress`.
///
/// Across the hero band the globe travels from the hero pose toward the
/// focus pose (power1.inOut), arriving as the focus band begins. Every other
/// section rests at its own pose.
pub fn pose_at(
    poses: &PosesConfig,
    partition: &Partition,
    section: SectionState,
    progress: f64,
) -> SectionPose {
    let rest = pose_for(poses, section);
    if section != SectionState::Hero || progress.is_nan() {
        return rest;
    }
    let Some(band) = partition.band_of(SectionState::Hero) else {
        return rest;
    };
    let t = (progress - band.start) / (band.end - band.start);
    rest.lerp(pose_for(poses, SectionState::Focus), Ease::Power1InOut.apply(t))
}

/// Curtain coverage for a pinned progress value.
///
/// Zero before the window, one at and after its end, eased in between.
pub fn curtain_coverage(progress: f64, window: CurtainWindow) -> f64 {
    if progress.is_nan() || progress < window.start {
        return 0.0;
    }
    let len = window.end - window.start;
    if progress >= window.end || len <= 0.0 {
        return 1.0;
    }
    Ease::Power2Out.apply((progress - window.start) / len)
}

/// Elliptical camera path around the globe for the showcase section.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitPath {
    pub speed: f64,
    pub radius_x: f64,
    pub radius_z: f64,
    pub height: f64,
}

impl From<OrbitConfig> for OrbitPath {
    fn from(c: OrbitConfig) -> Self {
        Self {
            speed: c.speed,
            radius_x: c.radius_x,
            radius_z: c.radius_z,
            height: c.height,
        }
    }
}

impl OrbitPath {
    /// Camera offset from the orbit center at `angle` radians. Angle 0 sits
    /// in front of the globe, on +Z.
    pub fn offset(&self, angle: f64) -> Vec3 {
        Vec3::new(
            self.radius_x * angle.sin(),
            self.height,
            self.radius_z * angle.cos(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{OrbitPath, curtain_coverage, pose_at, pose_for};
    use crate::config::{CurtainWindow, OrbitConfig, PosesConfig};
    use crate::section::{Partition, SectionState};
    use foundation::math::Vec3;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn default_poses() {
        let poses = PosesConfig::default();
        let hero = pose_for(&poses, SectionState::Hero);
        assert_eq!(hero.position, Vec3::ZERO);
        assert_eq!(hero.scale, 0.9);
        assert_eq!(hero.camera, Vec3::new(0.0, 0.0, 6.0));
        let focus = pose_for(&poses, SectionState::Focus);
        assert_eq!(focus.position, Vec3::new(-5.0, -3.1, 0.0));
        assert_eq!(focus.scale, 1.55);
        assert_eq!(pose_for(&poses, SectionState::Transition), hero);
    }

    #[test]
    fn hero_pose_scrubs_toward_focus() {
        let poses = PosesConfig::default();
        let partition = Partition::default();
        let at = |p: f64| pose_at(&poses, &partition, SectionState::Hero, p);

        assert_eq!(at(0.0), pose_for(&poses, SectionState::Hero));
        assert_eq!(at(0.5), pose_for(&poses, SectionState::Focus));

        let mut prev = at(0.0);
        for i in 1..=50 {
            let pose = at(i as f64 * 0.01);
            assert!(pose.scale >= prev.scale);
            assert!(pose.position.x <= prev.position.x);
            assert!(pose.position.y <= prev.position.y);
            prev = pose;
        }

        // 90% through the band is 98% of the way with power1.inOut.
        let late = at(0.45);
        assert_close(late.position.x, -5.0 * 0.98, 1e-9);
        assert_close(late.scale, 0.9 + 0.65 * 0.98, 1e-9);
        let early = at(0.05);
        assert_close(early.position.x, -5.0 * 0.02, 1e-9);
    }

    #[test]
    fn other_sections_ignore_progress() {
        let poses = PosesConfig::default();
        let partition = Partition::default();
        for p in [0.5, 0.6, 0.74] {
            assert_eq!(
                pose_at(&poses, &partition, SectionState::Focus, p),
                pose_for(&poses, SectionState::Focus)
            );
        }
        assert_eq!(
            pose_at(&poses, &partition, SectionState::Transition, 0.9),
            pose_for(&poses, SectionState::Hero)
        );
        assert_eq!(
            pose_at(&poses, &partition, SectionState::Hero, f64::NAN),
            pose_for(&poses, SectionState::Hero)
        );
    }

    #[test]
    fn curtain_scrubs_inside_window() {
        let w = CurtainWindow::default();
        assert_eq!(curtain_coverage(0.5, w), 0.0);
        assert_eq!(curtain_coverage(0.68, w), 0.0);
        assert_eq!(curtain_coverage(0.75, w), 1.0);
        assert_eq!(curtain_coverage(0.9, w), 1.0);
        let mid = curtain_coverage(0.715, w);
        assert!(mid > 0.5 && mid < 1.0, "power2.out front-loads: {mid}");

        let mut prev = 0.0;
        for i in 0..=100 {
            let c = curtain_coverage(0.6 + i as f64 * 0.002, w);
            assert!(c >= prev);
            prev = c;
        }
    }

    #[test]
    fn zero_width_window_is_a_step() {
        let w = CurtainWindow { start: 0.7, end: 0.7 };
        assert_eq!(curtain_coverage(0.69, w), 0.0);
        assert_eq!(curtain_coverage(0.7, w), 1.0);
    }

    #[test]
    fn orbit_traces_an_ellipse() {
        let path = OrbitPath::from(OrbitConfig {
            radius_x: 4.0,
            radius_z: 6.0,
            height: 1.0,
            ..OrbitConfig::default()
        });
        let front = path.offset(0.0);
        assert_close(front.z, 6.0, 1e-12);
        assert_close(front.y, 1.0, 1e-12);
        let side = path.offset(std::f64::consts::FRAC_PI_2);
        assert_close(side.x, 4.0, 1e-12);
        assert_close(side.z, 0.0, 1e-12);
    }
}
