//! Keyed property tweens.
//!
//! Each `(target, property)` pair owns at most one tween. Starting a new tween
//! on a key replaces the running one, and the new tween starts from whatever
//! value the property holds at that moment, so interrupted motion never jumps.

use std::collections::BTreeMap;

use foundation::math::{Quat, Vec3};

use crate::easing::Ease;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetId {
    Globe,
    Camera,
    Curtain,
    Marker(u32),
    Label(u32),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    Position,
    /// Point a camera looks at.
    Target,
    Scale,
    Rotation,
    Opacity,
    Coverage,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenKey {
    pub target: TargetId,
    pub property: Property,
}

impl TweenKey {
    pub const fn new(target: TargetId, property: Property) -> Self {
        Self { target, property }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TweenValue {
    Scalar(f64),
    Vec3(Vec3),
    Quat(Quat),
}

impl TweenValue {
    /// Mismatched kinds snap to `to`.
    pub fn interpolate(self, to: Self, t: f64) -> Self {
        match (self, to) {
            (TweenValue::Scalar(a), TweenValue::Scalar(b)) => TweenValue::Scalar(a + (b - a) * t),
            (TweenValue::Vec3(a), TweenValue::Vec3(b)) => TweenValue::Vec3(a.lerp(b, t)),
            (TweenValue::Quat(a), TweenValue::Quat(b)) => TweenValue::Quat(a.slerp(b, t)),
            (_, b) => b,
        }
    }

    pub fn as_scalar(self) -> Option<f64> {
        match self {
            TweenValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vec3(self) -> Option<Vec3> {
        match self {
            TweenValue::Vec3(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_quat(self) -> Option<Quat> {
        match self {
            TweenValue::Quat(v) => Some(v),
            _ => None,
        }
    }
}

/// Anything whose properties can be driven by a [`Tweener`].
pub trait Animatable {
    fn read(&self, key: TweenKey) -> Option<TweenValue>;
    fn write(&mut self, key: TweenKey, value: TweenValue);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Repeat {
    #[default]
    Once,
    /// Forward, backward, forward... until cancelled.
    YoyoForever,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TweenSpec {
    pub duration_s: f64,
    pub delay_s: f64,
    pub ease: Ease,
    pub repeat: Repeat,
}

impl TweenSpec {
    pub fn once(duration_s: f64, ease: Ease) -> Self {
        Self {
            duration_s,
            delay_s: 0.0,
            ease,
            repeat: Repeat::Once,
        }
    }

    pub fn yoyo(duration_s: f64, ease: Ease) -> Self {
        Self {
            repeat: Repeat::YoyoForever,
            ..Self::once(duration_s, ease)
        }
    }

    pub fn with_delay(mut self, delay_s: f64) -> Self {
        self.delay_s = delay_s;
        self
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenHandle(u64);

#[derive(Debug, Clone)]
struct Tween {
    handle: TweenHandle,
    from: TweenValue,
    to: TweenValue,
    spec: TweenSpec,
    elapsed_s: f64,
    paused: bool,
}

impl Tween {
    /// Value at the current elapsed time, and whether a one-shot tween is done.
    fn sample(&self) -> Option<(TweenValue, bool)> {
        let t = self.elapsed_s - self.spec.delay_s;
        if t < 0.0 {
            return None;
        }
        let d = self.spec.duration_s;
        match self.spec.repeat {
            Repeat::Once => {
                if d <= 0.0 || t >= d {
                    Some((self.to, true))
                } else {
                    let p = self.spec.ease.apply(t / d);
                    Some((self.from.interpolate(self.to, p), false))
                }
            }
            Repeat::YoyoForever => {
                if d <= 0.0 {
                    return Some((self.from, false));
                }
                let phase = t / d;
                let cycle = phase.floor();
                let frac = phase - cycle;
                let local = if (cycle as u64) % 2 == 0 { frac } else { 1.0 - frac };
                let p = self.spec.ease.apply(local);
                Some((self.from.interpolate(self.to, p), false))
            }
        }
    }
}

/// Drives every running tween of one scene.
#[derive(Debug)]
pub struct Tweener {
    tweens: BTreeMap<TweenKey, Tween>,
    finished_early: Vec<TweenKey>,
    next_handle: u64,
    duration_scale: f64,
}

impl Default for Tweener {
    fn default() -> Self {
        Self::new()
    }
}

impl Tweener {
    pub fn new() -> Self {
        Self {
            tweens: BTreeMap::new(),
            finished_early: Vec::new(),
            next_handle: 0,
            duration_scale: 1.0,
        }
    }

    /// Multiplier for every duration and delay of tweens started afterwards.
    /// `0.0` makes one-shot tweens land immediately.
    pub fn set_duration_scale(&mut self, scale: f64) {
        self.duration_scale = scale.max(0.0);
    }

    pub fn duration_scale(&self) -> f64 {
        self.duration_scale
    }

    /// Tween `key` from its current value to `to`, replacing any tween
    /// already running on that key.
    pub fn animate_to<W: Animatable + ?Sized>(
        &mut self,
        world: &mut W,
        key: TweenKey,
        to: TweenValue,
        spec: TweenSpec,
    ) -> TweenHandle {
        let handle = TweenHandle(self.next_handle);
        self.next_handle += 1;
        self.tweens.remove(&key);
        self.finished_early.retain(|k| *k != key);

        let spec = TweenSpec {
            duration_s: spec.duration_s.max(0.0) * self.duration_scale,
            delay_s: spec.delay_s.max(0.0) * self.duration_scale,
            ..spec
        };

        if spec.repeat == Repeat::Once && spec.duration_s <= 0.0 && spec.delay_s <= 0.0 {
            world.write(key, to);
            self.finished_early.push(key);
            return handle;
        }

        let from = world.read(key).unwrap_or(to);
        self.tweens.insert(
            key,
            Tween {
                handle,
                from,
                to,
                spec,
                elapsed_s: 0.0,
                paused: false,
            },
        );
        handle
    }

    /// Set `key` immediately, cancelling any tween on it.
    pub fn set<W: Animatable + ?Sized>(&mut self, world: &mut W, key: TweenKey, value: TweenValue) {
        self.tweens.remove(&key);
        self.finished_early.retain(|k| *k != key);
        world.write(key, value);
    }

    fn key_of(&self, handle: TweenHandle) -> Option<TweenKey> {
        self.tweens
            .iter()
            .find(|(_, t)| t.handle == handle)
            .map(|(k, _)| *k)
    }

    /// Stop the tween, leaving the property where it is. Idempotent.
    pub fn cancel(&mut self, handle: TweenHandle) -> bool {
        match self.key_of(handle) {
            Some(key) => self.tweens.remove(&key).is_some(),
            None => false,
        }
    }

    pub fn cancel_key(&mut self, key: TweenKey) -> bool {
        self.tweens.remove(&key).is_some()
    }

    pub fn pause(&mut self, handle: TweenHandle) -> bool {
        self.set_paused(handle, true)
    }

    pub fn resume(&mut self, handle: TweenHandle) -> bool {
        self.set_paused(handle, false)
    }

    fn set_paused(&mut self, handle: TweenHandle, paused: bool) -> bool {
        match self.tweens.values_mut().find(|t| t.handle == handle) {
            Some(t) => {
                t.paused = paused;
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, handle: TweenHandle) -> bool {
        self.tweens.values().any(|t| t.handle == handle)
    }

    pub fn is_playing(&self, handle: TweenHandle) -> bool {
        self.tweens.values().any(|t| t.handle == handle && !t.paused)
    }

    pub fn is_animating(&self, key: TweenKey) -> bool {
        self.tweens.contains_key(&key)
    }

    /// Final value of the tween running on `key`, if any.
    pub fn target_of(&self, key: TweenKey) -> Option<TweenValue> {
        self.tweens.get(&key).map(|t| t.to)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
        self.finished_early.clear();
    }

    /// Advance every unpaused tween by `dt_s` and write the sampled values.
    ///
    /// Returns the keys whose one-shot tween finished during this tick, in
    /// key order.
    pub fn tick<W: Animatable + ?Sized>(&mut self, dt_s: f64, world: &mut W) -> Vec<TweenKey> {
        let mut completed = std::mem::take(&mut self.finished_early);
        let dt_s = dt_s.max(0.0);

        for (key, tween) in &mut self.tweens {
            if tween.paused {
                continue;
            }
            tween.elapsed_s += dt_s;
            if let Some((value, done)) = tween.sample() {
                world.write(*key, value);
                if done {
                    completed.push(*key);
                }
            }
        }

        self.tweens
            .retain(|key, t| t.spec.repeat != Repeat::Once || !completed.contains(key));
        completed.sort();
        completed.dedup();
        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[derive(Default)]
    struct World {
        values: HashMap<TweenKey, TweenValue>,
    }

    impl Animatable for World {
        fn read(&self, key: TweenKey) -> Option<TweenValue> {
            self.values.get(&key).copied()
        }

        fn write(&mut self, key: TweenKey, value: TweenValue) {
            self.values.insert(key, value);
        }
    }

    impl World {
        fn scalar(&self, key: TweenKey) -> f64 {
            self.values
                .get(&key)
                .and_then(|v| v.as_scalar())
                .unwrap_or(f64::NAN)
        }
    }

    const OPACITY: TweenKey = TweenKey::new(TargetId::Label(0), Property::Opacity);
    const SCALE: TweenKey = TweenKey::new(TargetId::Globe, Property::Scale);

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn one_shot_reaches_target_and_reports_completion() {
        let mut world = World::default();
        world.write(OPACITY, TweenValue::Scalar(0.0));
        let mut tw = Tweener::new();
        tw.animate_to(
            &mut world,
            OPACITY,
            TweenValue::Scalar(1.0),
            TweenSpec::once(1.0, Ease::Linear),
        );

        assert!(tw.tick(0.5, &mut world).is_empty());
        assert_close(world.scalar(OPACITY), 0.5, 1e-12);
        assert_eq!(tw.tick(0.6, &mut world), vec![OPACITY]);
        assert_eq!(world.scalar(OPACITY), 1.0);
        assert!(tw.is_empty());
    }

    #[test]
    fn last_write_wins_without_overshoot() {
        let mut world = World::default();
        world.write(SCALE, TweenValue::Scalar(0.0));
        let mut tw = Tweener::new();
        let first = tw.animate_to(
            &mut world,
            SCALE,
            TweenValue::Scalar(10.0),
            TweenSpec::once(1.0, Ease::Power2Out),
        );
        tw.tick(0.1, &mut world);
        let mid = world.scalar(SCALE);
        let second = tw.animate_to(
            &mut world,
            SCALE,
            TweenValue::Scalar(2.0),
            TweenSpec::once(1.0, Ease::Power2Out),
        );

        assert!(!tw.is_active(first));
        assert!(tw.is_active(second));
        assert_eq!(tw.len(), 1);

        let mut prev = mid;
        for _ in 0..20 {
            tw.tick(0.1, &mut world);
            let v = world.scalar(SCALE);
            assert!(v <= prev + 1e-12, "moved away from new target: {prev} -> {v}");
            assert!(v >= 2.0 - 1e-12);
            prev = v;
        }
        assert_eq!(world.scalar(SCALE), 2.0);
    }

    #[test]
    fn yoyo_bounces_until_cancelled() {
        let mut world = World::default();
        world.write(OPACITY, TweenValue::Scalar(0.2));
        let mut tw = Tweener::new();
        let h = tw.animate_to(
            &mut world,
            OPACITY,
            TweenValue::Scalar(1.0),
            TweenSpec::yoyo(1.0, Ease::Linear),
        );

        tw.tick(1.0, &mut world);
        assert_close(world.scalar(OPACITY), 1.0, 1e-12);
        tw.tick(0.5, &mut world);
        assert_close(world.scalar(OPACITY), 0.6, 1e-12);
        tw.tick(0.5, &mut world);
        assert_close(world.scalar(OPACITY), 0.2, 1e-12);
        assert!(tw.tick(10.0, &mut world).is_empty());

        assert!(tw.cancel(h));
        assert!(!tw.cancel(h));
        let held = world.scalar(OPACITY);
        tw.tick(0.3, &mut world);
        assert_eq!(world.scalar(OPACITY), held);
    }

    #[test]
    fn paused_tween_holds_its_value() {
        let mut world = World::default();
        world.write(OPACITY, TweenValue::Scalar(0.0));
        let mut tw = Tweener::new();
        let h = tw.animate_to(
            &mut world,
            OPACITY,
            TweenValue::Scalar(1.0),
            TweenSpec::yoyo(2.0, Ease::Linear),
        );
        tw.tick(0.5, &mut world);
        assert!(tw.pause(h));
        assert!(!tw.is_playing(h));
        tw.tick(5.0, &mut world);
        assert_close(world.scalar(OPACITY), 0.25, 1e-12);
        assert!(tw.resume(h));
        tw.tick(0.5, &mut world);
        assert_close(world.scalar(OPACITY), 0.5, 1e-12);
    }

    #[test]
    fn zero_duration_lands_immediately() {
        let mut world = World::default();
        world.write(OPACITY, TweenValue::Scalar(0.0));
        let mut tw = Tweener::new();
        tw.set_duration_scale(0.0);
        tw.animate_to(
            &mut world,
            OPACITY,
            TweenValue::Scalar(1.0),
            TweenSpec::once(0.6, Ease::Power2Out),
        );
        assert_eq!(world.scalar(OPACITY), 1.0);
        assert_eq!(tw.tick(0.0, &mut world), vec![OPACITY]);

        tw.animate_to(
            &mut world,
            SCALE,
            TweenValue::Scalar(3.0),
            TweenSpec::yoyo(1.0, Ease::SineInOut),
        );
        tw.tick(0.7, &mut world);
        assert_eq!(world.scalar(SCALE), 3.0);
    }

    #[test]
    fn delay_postpones_first_write() {
        let mut world = World::default();
        world.write(OPACITY, TweenValue::Scalar(0.0));
        let mut tw = Tweener::new();
        tw.animate_to(
            &mut world,
            OPACITY,
            TweenValue::Scalar(1.0),
            TweenSpec::once(1.0, Ease::Linear).with_delay(0.5),
        );
        tw.tick(0.25, &mut world);
        assert_eq!(world.scalar(OPACITY), 0.0);
        tw.tick(0.75, &mut world);
        assert_close(world.scalar(OPACITY), 0.5, 1e-12);
    }

    #[test]
    fn quaternions_slerp() {
        let key = TweenKey::new(TargetId::Globe, Property::Rotation);
        let mut world = World::default();
        world.write(key, TweenValue::Quat(Quat::IDENTITY));
        let target = Quat::from_rotation_y(1.0);
        let mut tw = Tweener::new();
        tw.animate_to(
            &mut world,
            key,
            TweenValue::Quat(target),
            TweenSpec::once(2.0, Ease::Linear),
        );
        tw.tick(1.0, &mut world);
        let q = world.values[&key].as_quat().expect("quat");
        assert_close(q.angle_to(Quat::IDENTITY), 0.5, 1e-9);
        tw.tick(1.0, &mut world);
        assert_eq!(world.values[&key], TweenValue::Quat(target));
    }

    #[test]
    fn missing_start_value_snaps_to_target() {
        let mut world = World::default();
        let mut tw = Tweener::new();
        tw.animate_to(
            &mut world,
            OPACITY,
            TweenValue::Scalar(0.7),
            TweenSpec::once(1.0, Ease::Linear),
        );
        tw.tick(0.1, &mut world);
        assert_eq!(world.scalar(OPACITY), 0.7);
        assert_eq!(tw.target_of(OPACITY), Some(TweenValue::Scalar(0.7)));
    }
}
