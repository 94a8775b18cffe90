//! The section state machine.
//!
//! Scroll signals are resolved into a [`SectionState`]; every change applies
//! the leaving section's exit effects and the entered section's entry effects
//! synchronously, before the next frame is drawn.

use std::collections::BTreeSet;

use tracing::{debug, info};

use foundation::math::{AimOffset, Quat, Vec2, Vec3, focus_rotation_lat_lon};
use foundation::time::{Time, TimeSpan};
use runtime::{
    Ease, EventBus, Frame, Job, JobHandle, ObserverId, Property, Scheduler, TargetId, TweenKey,
    TweenSpec, TweenValue, Tweener,
};
use scene::{PointOfInterest, World};

use crate::config::{ConfigError, NarrativeConfig, validate_points};
use crate::pose::{OrbitPath, SectionPose, curtain_coverage, pose_at, pose_for};
use crate::scroll::{RegionEdge, ScrollSignal};
use crate::section::{Partition, SectionState};

const GLOBE_POSITION: TweenKey = TweenKey::new(TargetId::Globe, Property::Position);
const GLOBE_SCALE: TweenKey = TweenKey::new(TargetId::Globe, Property::Scale);
const GLOBE_ROTATION: TweenKey = TweenKey::new(TargetId::Globe, Property::Rotation);
const CAMERA_POSITION: TweenKey = TweenKey::new(TargetId::Camera, Property::Position);
const CAMERA_TARGET: TweenKey = TweenKey::new(TargetId::Camera, Property::Target);
const CURTAIN: TweenKey = TweenKey::new(TargetId::Curtain, Property::Coverage);

/// Rate at which the orbiting camera converges on its path (1/s).
const ORBIT_FOLLOW_RATE: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    SectionChanged {
        from: SectionState,
        to: SectionState,
    },
    ActiveFocusChanged {
        index: usize,
    },
}

/// Observable controller state, for UI bindings and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    pub section: SectionState,
    pub active_index: usize,
    pub progress: f64,
    pub curtain_coverage: f64,
    pub visible_markers: Vec<usize>,
    pub blinking_markers: Vec<usize>,
    pub idle_rotation: bool,
    pub hover_enabled: bool,
    pub orbiting: bool,
    pub frame_callbacks: usize,
}

pub struct SceneController {
    config: NarrativeConfig,
    partition: Partition,
    aim: AimOffset,
    points: Vec<PointOfInterest>,
    world: World,
    tweener: Tweener,
    callbacks: Scheduler<World>,
    section: SectionState,
    active_index: usize,
    progress: f64,
    active_regions: BTreeSet<String>,
    scroll_lock: Option<TimeSpan>,
    idle_rotation: bool,
    hover_enabled: bool,
    orbit: Option<JobHandle>,
    pointer: Option<Vec2>,
    drag_x: Option<f64>,
    reduced_motion: bool,
    events: EventBus<ControllerEvent>,
    frame_index: u64,
}

impl std::fmt::Debug for SceneController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneController")
            .field("section", &self.section)
            .field("active_index", &self.active_index)
            .field("progress", &self.progress)
            .field("active_regions", &self.active_regions)
            .finish_non_exhaustive()
    }
}

impl SceneController {
    pub fn new(config: NarrativeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let partition = config.partition()?;
        let points = config.points.clone();
        let world = World::new(
            &points,
            config.sphere_calibration(),
            config.globe_radius,
            config.marker_lift,
        );

        let mut controller = Self {
            aim: config.aim_offset(),
            partition,
            points,
            world,
            tweener: Tweener::new(),
            callbacks: Scheduler::new(),
            section: SectionState::Hero,
            active_index: 0,
            progress: 0.0,
            active_regions: BTreeSet::new(),
            scroll_lock: None,
            idle_rotation: SectionState::Hero.idle_rotation(),
            hover_enabled: false,
            orbit: None,
            pointer: None,
            drag_x: None,
            reduced_motion: false,
            events: EventBus::new(),
            frame_index: 0,
            config,
        };

        let hero = controller.pose_now();
        controller.world.globe.position = hero.position;
        controller.world.globe.scale = hero.scale;
        controller.world.camera.position = hero.camera;
        Ok(controller)
    }

    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn tweener(&self) -> &Tweener {
        &self.tweener
    }

    pub fn section(&self) -> SectionState {
        self.section
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_point(&self) -> Option<&PointOfInterest> {
        self.points.get(self.active_index)
    }

    pub fn points(&self) -> &[PointOfInterest] {
        &self.points
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn curtain_coverage(&self) -> f64 {
        self.world.curtain_coverage
    }

    pub fn is_scroll_locked(&self, now: Time) -> bool {
        self.scroll_lock.is_some_and(|span| span.contains(now))
    }

    pub fn idle_rotation(&self) -> bool {
        self.idle_rotation
    }

    pub fn hover_enabled(&self) -> bool {
        self.hover_enabled
    }

    pub fn frame_callback_count(&self) -> usize {
        self.callbacks.job_count()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let markers = &self.world.markers;
        ControllerSnapshot {
            section: self.section,
            active_index: self.active_index,
            progress: self.progress,
            curtain_coverage: self.world.curtain_coverage,
            visible_markers: (0..markers.len())
                .filter(|&i| markers.marker(i).is_some_and(|m| m.visible))
                .collect(),
            blinking_markers: (0..markers.len())
                .filter(|&i| markers.is_blinking(i, &self.tweener))
                .collect(),
            idle_rotation: self.idle_rotation,
            hover_enabled: self.hover_enabled,
            orbiting: self
                .orbit
                .is_some_and(|h| self.callbacks.is_registered(h)),
            frame_callbacks: self.callbacks.job_count(),
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&ControllerEvent) + 'static) -> ObserverId {
        self.events.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Recorded events, oldest first.
    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        self.events.drain().into_iter().map(|e| e.payload).collect()
    }

    /// Apply one scroll update: region edges first, then progress.
    pub fn on_scroll(&mut self, signal: &ScrollSignal, now: Time) {
        for event in &signal.events {
            match event.edge {
                RegionEdge::Enter(_) => {
                    self.active_regions.insert(event.region.clone());
                }
                RegionEdge::Leave(_) => {
                    self.active_regions.remove(&event.region);
                }
            }
        }
        self.set_progress(signal.progress, now);
    }

    /// Update pinned progress and resolve the section. The section change
    /// lands before the progress-driven pose is followed.
    pub fn set_progress(&mut self, progress: f64, now: Time) {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let coverage = curtain_coverage(self.progress, self.config.curtain);
        self.tweener
            .set(&mut self.world, CURTAIN, TweenValue::Scalar(coverage));

        let next = self.resolve_section();
        if next != self.section {
            self.transition_to(next, now);
        } else if self.section == SectionState::Hero {
            let spec = TweenSpec::once(self.config.timing.scrub_s, Ease::Power2Out);
            self.animate_pose(self.pose_now(), spec);
        }
    }

    /// Resting pose of the current section at the current progress.
    fn pose_now(&self) -> SectionPose {
        pose_at(&self.config.poses, &self.partition, self.section, self.progress)
    }

    fn resolve_section(&self) -> SectionState {
        self.active_regions
            .iter()
            .filter_map(|name| self.config.section_for_region(name))
            .max()
            .unwrap_or_else(|| self.partition.section_at(self.progress))
    }

    fn transition_to(&mut self, next: SectionState, now: Time) {
        let prev = self.section;
        self.exit(prev);
        self.section = next;
        self.enter(next, now);
        info!(from = %prev, to = %next, progress = self.progress, "section changed");
        self.events.emit(
            self.frame_index,
            ControllerEvent::SectionChanged {
                from: prev,
                to: next,
            },
        );
    }

    fn exit(&mut self, section: SectionState) {
        match section {
            SectionState::Focus => {
                self.hide_markers();
                self.animate_neutral();
            }
            SectionState::Showcase2 => {
                self.stop_orbit();
                self.hide_markers();
            }
            SectionState::Hero | SectionState::Transition | SectionState::Contacts => {}
        }
        self.hover_enabled = false;
        self.drag_x = None;
    }

    fn enter(&mut self, section: SectionState, now: Time) {
        self.idle_rotation = section.idle_rotation();
        self.hover_enabled = section.hover_labels();

        match section {
            SectionState::Hero => {
                self.hide_markers();
                self.animate_neutral();
                self.animate_pose(self.pose_now(), self.pose_spec());
            }
            SectionState::Focus => {
                self.set_active(0);
                self.show_active_marker();
                let lock = TimeSpan::starting_at(now, self.config.timing.scroll_lock_ms / 1000.0);
                debug!(until = lock.end.seconds(), "scroll locked");
                self.scroll_lock = Some(lock);
                self.animate_pose(self.pose_now(), self.pose_spec());
                self.animate_focus_rotation();
            }
            SectionState::Transition | SectionState::Contacts => {
                self.hide_markers();
                self.animate_pose(self.pose_now(), self.pose_spec());
            }
            SectionState::Showcase2 => {
                self.show_active_marker();
                if self.config.orbit.enabled {
                    self.start_orbit();
                }
                self.animate_pose(self.pose_now(), self.pose_spec());
            }
        }
    }

    fn pose_spec(&self) -> TweenSpec {
        TweenSpec::once(self.config.timing.pose_s, Ease::Power2Out)
    }

    /// Animate the globe back to the hero pose with its rotation cleared.
    fn animate_neutral(&mut self) {
        let spec = self.pose_spec();
        self.animate_pose(pose_for(&self.config.poses, SectionState::Hero), spec);
        self.tweener.animate_to(
            &mut self.world,
            GLOBE_ROTATION,
            TweenValue::Quat(Quat::IDENTITY),
            spec,
        );
    }

    /// Globe placement tweens; the camera is left to the orbit while one runs.
    fn animate_pose(&mut self, pose: SectionPose, spec: TweenSpec) {
        let world = &mut self.world;
        let tw = &mut self.tweener;
        tw.animate_to(world, GLOBE_POSITION, TweenValue::Vec3(pose.position), spec);
        tw.animate_to(world, GLOBE_SCALE, TweenValue::Scalar(pose.scale), spec);
        if self.orbit.is_some() {
            tw.cancel_key(CAMERA_POSITION);
            tw.cancel_key(CAMERA_TARGET);
        } else {
            tw.animate_to(world, CAMERA_POSITION, TweenValue::Vec3(pose.camera), spec);
            tw.animate_to(world, CAMERA_TARGET, TweenValue::Vec3(Vec3::ZERO), spec);
        }
    }

    fn animate_focus_rotation(&mut self) {
        let Some(poi) = self.points.get(self.active_index) else {
            return;
        };
        let target = focus_rotation_lat_lon(&self.world.calibration, poi.lat, poi.lon, self.aim);
        self.tweener.animate_to(
            &mut self.world,
            GLOBE_ROTATION,
            TweenValue::Quat(target),
            TweenSpec::once(self.config.timing.focus_rotation_s, Ease::Power2InOut),
        );
    }

    fn hide_markers(&mut self) {
        let markers = &mut self.world.markers;
        markers.set_visible(|_| false);
        markers.pause_all_blinks(&mut self.tweener);
        markers.hide_all_labels(&mut self.tweener);
    }

    fn show_active_marker(&mut self) {
        let active = self.active_index;
        let markers = &mut self.world.markers;
        if markers.is_empty() {
            return;
        }
        markers.set_visible(|i| i == active);
        markers.set_blinking(Some(active), &mut self.tweener);
    }

    fn start_orbit(&mut self) {
        self.stop_orbit();
        let path = OrbitPath::from(self.config.orbit);
        let mut angle = 0.0f64;
        let job = Job::new("orbit", move |frame: Frame, world: &mut World| {
            angle += path.speed * frame.dt_s;
            let center = world.globe.position;
            let desired = center + path.offset(angle);
            let blend = 1.0 - (-ORBIT_FOLLOW_RATE * frame.dt_s).exp();
            world.camera.position = world.camera.position.lerp(desired, blend);
            world.camera.target = world.camera.target.lerp(center, blend);
        });
        self.orbit = Some(self.callbacks.add_job(job));
        debug!("orbit registered");
    }

    fn stop_orbit(&mut self) {
        if let Some(h) = self.orbit.take()
            && self.callbacks.cancel(h)
        {
            debug!("orbit cancelled");
        }
    }

    fn set_active(&mut self, index: usize) {
        if self.active_index != index {
            self.active_index = index;
            self.events.emit(
                self.frame_index,
                ControllerEvent::ActiveFocusChanged { index },
            );
        }
    }

    /// Make `index` the active point. Unknown indices are ignored.
    pub fn focus_on(&mut self, index: usize) -> bool {
        if index >= self.points.len() {
            return false;
        }
        self.set_active(index);
        if self.section.shows_active_marker() {
            self.show_active_marker();
        }
        if self.section == SectionState::Focus {
            self.animate_focus_rotation();
        }
        true
    }

    pub fn next(&mut self) {
        let n = self.points.len();
        if n > 0 {
            self.focus_on((self.active_index + 1) % n);
        }
    }

    pub fn previous(&mut self) {
        let n = self.points.len();
        if n > 0 {
            self.focus_on((self.active_index + n - 1) % n);
        }
    }

    /// Replace the point list, e.g. after fetching it. The active index
    /// resets to 0 and the current section's marker state is reapplied.
    pub fn set_points(&mut self, points: Vec<PointOfInterest>) -> Result<(), ConfigError> {
        validate_points(&points)?;
        self.world.markers.release(&mut self.tweener);
        self.world.markers = scene::MarkerRegistry::new(
            &points,
            &self.world.calibration,
            self.config.globe_radius * self.config.marker_lift,
        );
        self.points = points;
        self.set_active(0);
        if self.section.shows_active_marker() {
            self.show_active_marker();
        }
        if self.section == SectionState::Focus {
            self.animate_focus_rotation();
        }
        Ok(())
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.world.camera.set_viewport(width, height);
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
        let scale = if reduced {
            self.config.reduced_motion_scale
        } else {
            1.0
        };
        self.tweener.set_duration_scale(scale);
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Pointer position in NDC, `None` when it left the canvas.
    pub fn set_pointer(&mut self, ndc: Option<Vec2>) {
        self.pointer = ndc;
    }

    pub fn drag_begin(&mut self, x_px: f64) {
        if self.idle_rotation {
            self.drag_x = Some(x_px);
        }
    }

    /// Spin the globe about Y by the horizontal drag distance. Returns
    /// whether the globe moved.
    pub fn drag_move(&mut self, x_px: f64) -> bool {
        let Some(prev) = self.drag_x else {
            return false;
        };
        if !self.idle_rotation {
            self.drag_x = None;
            return false;
        }
        self.drag_x = Some(x_px);
        let delta = (x_px - prev) * self.config.drag_rad_per_px;
        self.spin_globe(delta);
        delta != 0.0
    }

    pub fn drag_end(&mut self) {
        self.drag_x = None;
    }

    fn spin_globe(&mut self, angle_rad: f64) {
        let q = Quat::from_rotation_y(angle_rad) * self.world.globe.rotation;
        self.world.globe.rotation = q.normalize();
    }

    /// Everything that happens once per visible frame, before drawing.
    pub fn advance_frame(&mut self, frame: Frame) {
        self.frame_index = frame.index;
        self.callbacks.run_frame(frame, &mut self.world);
        for key in self.tweener.tick(frame.dt_s, &mut self.world) {
            self.world.markers.on_tween_complete(key);
        }
        if self.idle_rotation {
            self.spin_globe(self.config.idle_speed * frame.dt_s);
        }
        self.world.starfield_rotation += self.config.starfield_speed * frame.dt_s;

        if self.hover_enabled {
            let hit = self.pointer.and_then(|ndc| {
                let ray = self.world.camera.ray_from_ndc(ndc);
                self.world.pick(ray, self.config.marker_pick_radius)
            });
            self.world
                .markers
                .update_hover(hit.map(|h| h.index), &mut self.tweener);
        }
    }

    /// Cancel every task and tween and drop the markers. Idempotent.
    pub fn release(&mut self) {
        self.stop_orbit();
        self.callbacks.clear();
        self.world.markers.release(&mut self.tweener);
        self.tweener.clear();
        self.pointer = None;
        self.drag_x = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{ControllerEvent, SceneController};
    use crate::config::NarrativeConfig;
    use crate::scroll::{Region, ScrollRange, ScrollTracker};
    use crate::section::{Band, SectionState};
    use foundation::math::{Quat, Vec2, Vec3};
    use foundation::time::Time;
    use pretty_assertions::assert_eq;
    use runtime::Frame;
    use scene::PointOfInterest;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn points(n: usize) -> Vec<PointOfInterest> {
        (0..n)
            .map(|i| PointOfInterest {
                title: format!("Award {i}"),
                country: "Country".to_string(),
                city: format!("City {i}"),
                lat: -40.0 + 20.0 * i as f64,
                lon: -150.0 + 60.0 * i as f64,
                rating: None,
            })
            .collect()
    }

    fn config(n: usize) -> NarrativeConfig {
        NarrativeConfig {
            points: points(n),
            ..NarrativeConfig::default()
        }
    }

    fn controller(n: usize) -> SceneController {
        SceneController::new(config(n)).expect("valid config")
    }

    fn settle(c: &mut SceneController, seconds: f64) {
        let steps = (seconds * 60.0).ceil() as u64;
        for i in 0..steps {
            c.advance_frame(Frame::new(i, 1.0 / 60.0));
        }
    }

    #[test]
    fn starts_in_hero() {
        let c = controller(3);
        let s = c.snapshot();
        assert_eq!(s.section, SectionState::Hero);
        assert!(s.visible_markers.is_empty());
        assert!(s.idle_rotation);
        assert!(!s.hover_enabled);
        assert_eq!(c.world().globe.scale, 0.9);
    }

    #[test]
    fn focus_entry_is_idempotent() {
        let mut c = controller(4);
        c.set_progress(0.6, Time(0.0));
        assert_eq!(c.section(), SectionState::Focus);
        c.focus_on(2);
        assert_eq!(c.snapshot().blinking_markers, vec![2]);

        c.set_progress(0.3, Time(1.0));
        assert_eq!(c.section(), SectionState::Hero);
        c.set_progress(0.6, Time(2.0));
        let again = c.snapshot();
        c.set_progress(0.6, Time(2.1));
        assert_eq!(c.snapshot(), again);

        assert_eq!(again.active_index, 0);
        assert_eq!(again.visible_markers, vec![0]);
        assert_eq!(again.blinking_markers, vec![0]);
        assert!(!again.idle_rotation);
        assert!(again.hover_enabled);
    }

    #[test]
    fn leaving_focus_hides_markers_and_labels() {
        let mut c = controller(3);
        c.set_progress(0.6, Time(0.0));
        settle(&mut c, 0.2);
        c.set_progress(0.2, Time(1.0));
        settle(&mut c, 0.5);
        let s = c.snapshot();
        assert!(s.visible_markers.is_empty());
        assert!(s.blinking_markers.is_empty());
        assert!(c.world().markers.labels().iter().all(|l| !l.visible));
    }

    #[test]
    fn index_wraps_both_ways() {
        let mut c = controller(5);
        for _ in 0..5 {
            c.next();
        }
        assert_eq!(c.active_index(), 0);
        c.previous();
        assert_eq!(c.active_index(), 4);
        assert!(!c.focus_on(5));
        assert_eq!(c.active_index(), 4);
        assert_eq!(c.active_point().map(|p| p.city.as_str()), Some("City 4"));
    }

    #[test]
    fn empty_point_list_is_harmless() {
        let mut c = controller(0);
        c.next();
        c.previous();
        assert!(!c.focus_on(0));
        c.set_progress(0.6, Time(0.0));
        assert_eq!(c.section(), SectionState::Focus);
        assert_eq!(c.active_index(), 0);
        assert!(c.active_point().is_none());
        assert!(c.snapshot().visible_markers.is_empty());
        settle(&mut c, 0.5);
    }

    #[test]
    fn scripted_scroll_walks_the_sections() {
        let mut config = config(5);
        config.partition = vec![
            Band {
                section: SectionState::Hero,
                start: 0.0,
                end: 0.35,
            },
            Band {
                section: SectionState::Focus,
                start: 0.35,
                end: 0.75,
            },
            Band {
                section: SectionState::Transition,
                start: 0.75,
                end: 1.0,
            },
        ];
        let mut c = SceneController::new(config).expect("valid");
        let mut tracker = ScrollTracker::new(ScrollRange::new(0.0, 1000.0), Vec::new());

        let mut seen = Vec::new();
        for (step, offset) in [0.0, 600.0, 800.0, 400.0].into_iter().enumerate() {
            if let Some(signal) = tracker.update(offset) {
                c.on_scroll(&signal, Time(step as f64));
            }
            settle(&mut c, 1.5);
            seen.push(c.snapshot());
        }

        let sections: Vec<_> = seen.iter().map(|s| s.section).collect();
        assert_eq!(
            sections,
            vec![
                SectionState::Hero,
                SectionState::Focus,
                SectionState::Transition,
                SectionState::Focus
            ]
        );
        assert!(seen[0].visible_markers.is_empty());
        assert_eq!(seen[1].visible_markers, vec![0]);
        assert_eq!(seen[1].blinking_markers, vec![0]);
        assert!(seen[2].visible_markers.is_empty());
        assert!(seen[2].blinking_markers.is_empty());
        assert_eq!(seen[2].curtain_coverage, 1.0);
        assert_eq!(seen[3].visible_markers, vec![0]);
        assert_eq!(seen[3].blinking_markers, vec![0]);
        assert_eq!(seen[3].curtain_coverage, 0.0);
    }

    #[test]
    fn focus_rotation_lands_active_point_on_aim() {
        let mut c = controller(3);
        c.set_progress(0.6, Time(0.0));
        settle(&mut c, 1.5);
        let world = c.world();
        let p = world.markers.marker(0).map(|m| m.position).expect("marker");
        let d = world.globe.rotation.rotate(p).normalize_or_zero();
        let aim = c.config().aim_offset().direction();
        assert!(d.distance(aim) < 1e-6, "{d:?} vs {aim:?}");
        assert_eq!(world.globe.position, Vec3::new(-5.0, -3.1, 0.0));
        assert_eq!(world.globe.scale, 1.55);
    }

    #[test]
    fn hero_returns_to_neutral() {
        let mut c = controller(3);
        c.set_progress(0.6, Time(0.0));
        settle(&mut c, 1.5);
        assert!(c.world().globe.rotation.angle() > 0.1);

        c.set_reduced_motion(true);
        c.set_progress(0.0, Time(2.0));
        let world = c.world();
        assert!(world.globe.rotation.angle_to(Quat::IDENTITY) < 1e-9);
        assert_eq!(world.globe.position, Vec3::ZERO);
        assert_eq!(world.globe.scale, 0.9);
        assert_eq!(world.camera.position, Vec3::new(0.0, 0.0, 6.0));
        assert!(c.idle_rotation());
    }

    #[test]
    fn leaving_focus_forward_resets_the_globe() {
        let mut c = controller(3);
        c.set_progress(0.6, Time(0.0));
        settle(&mut c, 2.0);
        assert!(c.world().globe.rotation.angle() > 0.1);

        c.set_progress(0.8, Time(2.0));
        assert_eq!(c.section(), SectionState::Transition);
        // Animated, not snapped.
        assert_eq!(c.world().globe.position, Vec3::new(-5.0, -3.1, 0.0));

        settle(&mut c, 0.3);
        let mid = c.world().globe;
        assert!(mid.position.x > -5.0 && mid.position.x < 0.0);
        assert!(mid.scale < 1.55 && mid.scale > 0.9);

        settle(&mut c, 2.0);
        let world = c.world();
        assert!(world.globe.position.distance(Vec3::ZERO) < 1e-9);
        assert!((world.globe.scale - 0.9).abs() < 1e-9);
        assert!(world.globe.rotation.angle_to(Quat::IDENTITY) < 1e-9);
        assert!(world.camera.position.distance(Vec3::new(0.0, 0.0, 6.0)) < 1e-9);
        assert!(c.snapshot().visible_markers.is_empty());
    }

    #[test]
    fn leaving_focus_for_the_showcase_clears_the_tilt() {
        let mut c = controller(3);
        let mut tracker = ScrollTracker::new(
            ScrollRange::new(0.0, 1000.0),
            vec![Region {
                name: "showcase".to_string(),
                range: ScrollRange::new(1500.0, 2000.0),
            }],
        );
        c.on_scroll(&tracker.update(600.0).expect("changed"), Time(0.0));
        settle(&mut c, 2.0);
        let up = Vec3::new(0.0, 1.0, 0.0);
        assert!(c.world().globe.rotation.rotate(up).distance(up) > 0.1);

        c.on_scroll(&tracker.update(1600.0).expect("changed"), Time(2.0));
        assert_eq!(c.section(), SectionState::Showcase2);
        settle(&mut c, 2.0);
        let globe = c.world().globe;
        // Only the idle spin about Y remains.
        assert!(globe.rotation.rotate(up).distance(up) < 1e-9);
        assert!(globe.position.distance(Vec3::new(2.2, 0.0, 0.0)) < 1e-9);
        assert!((globe.scale - 1.1).abs() < 1e-9);
    }

    #[test]
    fn hero_pose_follows_progress() {
        let mut c = controller(2);
        c.set_reduced_motion(true);
        let mut xs = Vec::new();
        for (i, p) in [0.05, 0.2, 0.35, 0.45].into_iter().enumerate() {
            c.set_progress(p, Time(i as f64));
            assert_eq!(c.section(), SectionState::Hero);
            xs.push(c.world().globe.position.x);
        }
        assert!(xs.windows(2).all(|w| w[1] < w[0]), "{xs:?}");
        assert!((xs[3] + 4.9).abs() < 1e-9);

        // Scrolling back up retraces the same poses.
        c.set_progress(0.05, Time(10.0));
        assert!((c.world().globe.position.x - xs[0]).abs() < 1e-12);
    }

    #[test]
    fn curtain_follows_progress_both_ways() {
        let mut c = controller(2);
        c.set_progress(0.6, Time(0.0));
        assert_eq!(c.curtain_coverage(), 0.0);
        c.set_progress(0.72, Time(0.1));
        let partial = c.curtain_coverage();
        assert!(partial > 0.0 && partial < 1.0);
        c.set_progress(0.8, Time(0.2));
        assert_eq!(c.curtain_coverage(), 1.0);
        c.set_progress(0.72, Time(0.3));
        assert_eq!(c.curtain_coverage(), partial);
        c.set_progress(0.5, Time(0.4));
        assert_eq!(c.curtain_coverage(), 0.0);
    }

    #[test]
    fn scroll_lock_expires_after_700ms() {
        let mut c = controller(2);
        assert!(!c.is_scroll_locked(Time(10.0)));
        c.set_progress(0.6, Time(10.0));
        assert!(c.is_scroll_locked(Time(10.0)));
        assert!(c.is_scroll_locked(Time(10.69)));
        assert!(!c.is_scroll_locked(Time(10.701)));
        assert!(!c.is_scroll_locked(Time(11.5)));
    }

    #[test]
    fn showcase_orbit_is_cleaned_up() {
        let mut c = controller(3);
        let mut tracker = ScrollTracker::new(
            ScrollRange::new(0.0, 1000.0),
            vec![Region {
                name: "showcase".to_string(),
                range: ScrollRange::new(1500.0, 2000.0),
            }],
        );
        let signal = tracker.update(1600.0).expect("changed");
        c.on_scroll(&signal, Time(0.0));
        assert_eq!(c.section(), SectionState::Showcase2);
        assert_eq!(c.frame_callback_count(), 1);
        let s = c.snapshot();
        assert!(s.orbiting && s.idle_rotation && s.hover_enabled);
        assert_eq!(s.blinking_markers, vec![0]);

        let start = c.world().camera.position;
        settle(&mut c, 1.0);
        assert_ne!(c.world().camera.position, start);

        let signal = tracker.update(2100.0).expect("changed");
        c.on_scroll(&signal, Time(2.0));
        assert_eq!(c.section(), SectionState::Transition);
        assert_eq!(c.frame_callback_count(), 0);
        assert!(!c.snapshot().orbiting);

        // Re-entry registers exactly one orbit again.
        let signal = tracker.update(1700.0).expect("changed");
        c.on_scroll(&signal, Time(3.0));
        let signal = tracker.update(1750.0).expect("changed");
        c.on_scroll(&signal, Time(3.1));
        assert_eq!(c.frame_callback_count(), 1);
    }

    #[test]
    fn highest_active_region_wins() {
        let mut c = controller(1);
        let mut tracker = ScrollTracker::new(
            ScrollRange::new(0.0, 100.0),
            vec![
                Region {
                    name: "contacts".to_string(),
                    range: ScrollRange::new(150.0, 400.0),
                },
                Region {
                    name: "showcase".to_string(),
                    range: ScrollRange::new(120.0, 300.0),
                },
            ],
        );
        c.on_scroll(&tracker.update(200.0).expect("changed"), Time(0.0));
        assert_eq!(c.section(), SectionState::Contacts);
        c.on_scroll(&tracker.update(130.0).expect("changed"), Time(0.1));
        assert_eq!(c.section(), SectionState::Showcase2);
        c.on_scroll(&tracker.update(50.0).expect("changed"), Time(0.2));
        assert_eq!(c.section(), SectionState::Focus);
    }

    #[test]
    fn observers_see_section_and_focus_changes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut c = controller(3);
        c.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        c.focus_on(1);
        c.set_progress(0.6, Time(0.0));
        assert_eq!(
            *seen.borrow(),
            vec![
                ControllerEvent::ActiveFocusChanged { index: 1 },
                ControllerEvent::ActiveFocusChanged { index: 0 },
                ControllerEvent::SectionChanged {
                    from: SectionState::Hero,
                    to: SectionState::Focus
                },
            ]
        );
        assert_eq!(c.drain_events().len(), 3);
    }

    #[test]
    fn drag_spins_only_while_idle() {
        let mut c = controller(2);
        c.drag_begin(100.0);
        assert!(c.drag_move(140.0));
        let angle = c.world().globe.rotation.angle();
        assert!((angle - 0.2).abs() < 1e-9);
        c.drag_end();
        assert!(!c.drag_move(200.0));

        c.set_progress(0.6, Time(0.0));
        c.drag_begin(0.0);
        assert!(!c.drag_move(50.0));
    }

    #[test]
    fn hover_shows_label_in_focus() {
        let mut c = controller(3);
        c.set_viewport(1280.0, 720.0);
        c.set_progress(0.6, Time(0.0));
        settle(&mut c, 1.5);

        let world = c.world();
        let marker = world.marker_world_position(0).expect("marker");
        let ndc = world.camera.project_to_ndc(marker).expect("visible");
        c.set_pointer(Some(ndc));
        c.advance_frame(Frame::new(100, 1.0 / 60.0));
        assert_eq!(c.world().markers.hovered(), Some(0));
        settle(&mut c, 0.5);
        assert!(c.world().markers.label(0).is_some_and(|l| l.visible && l.opacity == 1.0));

        c.set_pointer(None);
        settle(&mut c, 0.5);
        assert!(c.world().markers.label(0).is_some_and(|l| !l.visible));
    }

    #[test]
    fn hover_is_ignored_in_hero() {
        let mut c = controller(1);
        c.set_pointer(Some(Vec2::new(0.0, 0.0)));
        settle(&mut c, 0.2);
        assert_eq!(c.world().markers.hovered(), None);
    }

    #[test]
    fn reduced_motion_lands_poses_immediately() {
        let mut c = controller(2);
        c.set_reduced_motion(true);
        c.set_progress(0.6, Time(0.0));
        assert_eq!(c.world().globe.scale, 1.55);
        c.advance_frame(Frame::new(0, 1.0 / 60.0));
        let blink = c.world().markers.marker(0).map(|m| m.opacity);
        c.advance_frame(Frame::new(1, 1.0 / 60.0));
        assert_eq!(c.world().markers.marker(0).map(|m| m.opacity), blink);
    }

    #[test]
    fn set_points_rebuilds_markers() {
        let mut c = controller(2);
        c.set_progress(0.6, Time(0.0));
        c.focus_on(1);
        c.set_points(points(4)).expect("valid");
        let s = c.snapshot();
        assert_eq!(s.active_index, 0);
        assert_eq!(s.visible_markers, vec![0]);
        assert_eq!(c.world().markers.len(), 4);

        let mut bad = points(1);
        bad[0].lon = 200.0;
        assert!(c.set_points(bad).is_err());
        assert_eq!(c.world().markers.len(), 4);
    }

    #[test]
    fn release_is_idempotent() {
        let mut c = controller(3);
        c.set_progress(0.6, Time(0.0));
        c.release();
        c.release();
        assert!(c.tweener().is_empty());
        assert_eq!(c.frame_callback_count(), 0);
        assert!(c.world().markers.is_empty());
        settle(&mut c, 0.1);
    }
}
