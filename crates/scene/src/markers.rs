//! Location markers, their blink animation and hover labels.

use serde::{Deserialize, Serialize};

use foundation::math::{SphereCalibration, Vec3};
use runtime::{
    Animatable, Ease, Property, TargetId, TweenHandle, TweenKey, TweenSpec, TweenValue, Tweener,
};

/// Labels sit this much further out than their marker.
pub const LABEL_LIFT: f64 = 1.12;
pub const BLINK_HALF_CYCLE_S: f64 = 0.6;
pub const LABEL_FADE_S: f64 = 0.25;

/// An achievement location shown on the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub title: String,
    pub country: String,
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl PointOfInterest {
    pub fn label_text(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }

    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub poi_index: usize,
    /// Globe-local position, fixed at construction.
    pub position: Vec3,
    pub visible: bool,
    pub opacity: f64,
    blink: Option<TweenHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Globe-local position.
    pub position: Vec3,
    pub visible: bool,
    pub opacity: f64,
}

#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: Vec<Marker>,
    labels: Vec<Label>,
    hovered: Option<usize>,
}

fn opacity_key(target: TargetId) -> TweenKey {
    TweenKey::new(target, Property::Opacity)
}

impl MarkerRegistry {
    /// One marker and one label per point, placed at `radius` on the globe.
    pub fn new(points: &[PointOfInterest], calibration: &SphereCalibration, radius: f64) -> Self {
        let mut markers = Vec::with_capacity(points.len());
        let mut labels = Vec::with_capacity(points.len());
        for (i, poi) in points.iter().enumerate() {
            let position = calibration.project(poi.lat, poi.lon, radius);
            markers.push(Marker {
                poi_index: i,
                position,
                visible: false,
                opacity: 1.0,
                blink: None,
            });
            labels.push(Label {
                text: poi.label_text(),
                position: position * LABEL_LIFT,
                visible: false,
                opacity: 0.0,
            });
        }
        Self {
            markers,
            labels,
            hovered: None,
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn marker(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    pub fn label(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn visible_count(&self) -> usize {
        self.markers.iter().filter(|m| m.visible).count()
    }

    pub fn set_visible(&mut self, mut predicate: impl FnMut(usize) -> bool) {
        for (i, m) in self.markers.iter_mut().enumerate() {
            m.visible = predicate(i);
        }
    }

    /// Make `index` the only blinking marker. `None` (or an unknown index)
    /// pauses every blink.
    ///
    /// A paused blink keeps its phase and resumes from there.
    pub fn set_blinking(&mut self, index: Option<usize>, tweener: &mut Tweener) {
        for i in 0..self.markers.len() {
            let blink = self.markers[i].blink;
            if Some(i) != index {
                if let Some(h) = blink {
                    tweener.pause(h);
                }
                continue;
            }
            if let Some(h) = blink
                && tweener.resume(h)
            {
                continue;
            }
            let key = opacity_key(TargetId::Marker(i as u32));
            self.markers[i].opacity = 1.0;
            let h = tweener.animate_to(
                self,
                key,
                TweenValue::Scalar(0.0),
                TweenSpec::yoyo(BLINK_HALF_CYCLE_S, Ease::SineInOut),
            );
            self.markers[i].blink = Some(h);
        }
    }

    pub fn pause_all_blinks(&mut self, tweener: &mut Tweener) {
        self.set_blinking(None, tweener);
    }

    pub fn is_blinking(&self, index: usize, tweener: &Tweener) -> bool {
        self.markers
            .get(index)
            .and_then(|m| m.blink)
            .is_some_and(|h| tweener.is_playing(h))
    }

    pub fn blinking_count(&self, tweener: &Tweener) -> usize {
        (0..self.markers.len())
            .filter(|&i| self.is_blinking(i, tweener))
            .count()
    }

    /// Show the label of the marker under the pointer and fade out the rest.
    ///
    /// Only acts when the hovered marker changes.
    pub fn update_hover(&mut self, hit: Option<usize>, tweener: &mut Tweener) {
        let hit = hit.filter(|&i| i < self.labels.len());
        if hit == self.hovered {
            return;
        }
        self.hovered = hit;

        for i in 0..self.labels.len() {
            let key = opacity_key(TargetId::Label(i as u32));
            if Some(i) == hit {
                self.labels[i].visible = true;
                tweener.animate_to(
                    self,
                    key,
                    TweenValue::Scalar(1.0),
                    TweenSpec::once(LABEL_FADE_S, Ease::Power2Out),
                );
            } else if self.labels[i].visible {
                self.fade_out_label(i, tweener);
            }
        }
    }

    pub fn hide_all_labels(&mut self, tweener: &mut Tweener) {
        self.hovered = None;
        for i in 0..self.labels.len() {
            if self.labels[i].visible {
                self.fade_out_label(i, tweener);
            }
        }
    }

    fn fade_out_label(&mut self, index: usize, tweener: &mut Tweener) {
        let key = opacity_key(TargetId::Label(index as u32));
        if tweener.target_of(key) == Some(TweenValue::Scalar(0.0)) {
            return;
        }
        tweener.animate_to(
            self,
            key,
            TweenValue::Scalar(0.0),
            TweenSpec::once(LABEL_FADE_S, Ease::Power2Out),
        );
    }

    /// Hides a label once its fade-out has landed.
    pub fn on_tween_complete(&mut self, key: TweenKey) {
        if let TweenKey {
            target: TargetId::Label(i),
            property: Property::Opacity,
        } = key
            && let Some(label) = self.labels.get_mut(i as usize)
            && label.opacity <= 0.0
        {
            label.visible = false;
        }
    }

    /// Drop every marker and label along with their tweens. Idempotent.
    pub fn release(&mut self, tweener: &mut Tweener) {
        for i in 0..self.markers.len() {
            tweener.cancel_key(opacity_key(TargetId::Marker(i as u32)));
            tweener.cancel_key(opacity_key(TargetId::Label(i as u32)));
        }
        self.markers.clear();
        self.labels.clear();
        self.hovered = None;
    }
}

impl Animatable for MarkerRegistry {
    fn read(&self, key: TweenKey) -> Option<TweenValue> {
        match (key.target, key.property) {
            (TargetId::Marker(i), Property::Opacity) => self
                .markers
                .get(i as usize)
                .map(|m| TweenValue::Scalar(m.opacity)),
            (TargetId::Label(i), Property::Opacity) => self
                .labels
                .get(i as usize)
                .map(|l| TweenValue::Scalar(l.opacity)),
            _ => None,
        }
    }

    fn write(&mut self, key: TweenKey, value: TweenValue) {
        let Some(v) = value.as_scalar() else {
            return;
        };
        match (key.target, key.property) {
            (TargetId::Marker(i), Property::Opacity) => {
                if let Some(m) = self.markers.get_mut(i as usize) {
                    m.opacity = v.clamp(0.0, 1.0);
                }
            }
            (TargetId::Label(i), Property::Opacity) => {
                if let Some(l) = self.labels.get_mut(i as usize) {
                    l.opacity = v.clamp(0.0, 1.0);
                }
            }
            _ => {}
        }
    }
}
