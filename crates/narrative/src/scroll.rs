//! Scroll offset to pinned progress, plus edge-triggered region events.

use runtime::{EventBus, ObserverId};

use crate::config::LayoutConfig;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollRange {
    pub start_px: f64,
    pub end_px: f64,
}

impl ScrollRange {
    pub fn new(start_px: f64, end_px: f64) -> Self {
        Self { start_px, end_px }
    }

    /// Position of `offset_px` within the range, clamped to `[0, 1]`.
    ///
    /// A degenerate range is a step at `start_px`. NaN reads as 0.
    pub fn progress(&self, offset_px: f64) -> f64 {
        if offset_px.is_nan() {
            return 0.0;
        }
        let len = self.end_px - self.start_px;
        if !(len > 0.0) {
            return if offset_px >= self.start_px { 1.0 } else { 0.0 };
        }
        ((offset_px - self.start_px) / len).clamp(0.0, 1.0)
    }

    /// `start <= offset < end`.
    pub fn contains(&self, offset_px: f64) -> bool {
        offset_px >= self.start_px && offset_px < self.end_px
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Forward,
    Backward,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RegionEdge {
    Enter(ScrollDirection),
    Leave(ScrollDirection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionEvent {
    pub region: String,
    pub edge: RegionEdge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub range: ScrollRange,
}

#[derive(Debug, Clone)]
struct TrackedRegion {
    region: Region,
    inside: bool,
}

/// Named scroll regions with remembered containment.
#[derive(Debug, Clone, Default)]
pub struct RegionTracker {
    regions: Vec<TrackedRegion>,
}

impl RegionTracker {
    pub fn new(regions: Vec<Region>) -> Self {
        Self {
            regions: regions
                .into_iter()
                .map(|region| TrackedRegion {
                    region,
                    inside: false,
                })
                .collect(),
        }
    }

    /// Swap in new ranges; containment is kept per region name so the next
    /// update only reports genuine changes.
    pub fn set_regions(&mut self, regions: Vec<Region>) {
        let old = std::mem::take(&mut self.regions);
        self.regions = regions
            .into_iter()
            .map(|region| {
                let inside = old
                    .iter()
                    .find(|t| t.region.name == region.name)
                    .is_some_and(|t| t.inside);
                TrackedRegion { region, inside }
            })
            .collect();
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().map(|t| &t.region)
    }

    pub fn is_inside(&self, name: &str) -> bool {
        self.regions
            .iter()
            .any(|t| t.region.name == name && t.inside)
    }

    /// Events for moving from `prev_px` to `offset_px`, in region order.
    pub fn update(&mut self, prev_px: f64, offset_px: f64) -> Vec<RegionEvent> {
        let direction = if offset_px >= prev_px {
            ScrollDirection::Forward
        } else {
            ScrollDirection::Backward
        };
        let mut events = Vec::new();
        for t in &mut self.regions {
            let now = t.region.range.contains(offset_px);
            let mut push = |edge| {
                events.push(RegionEvent {
                    region: t.region.name.clone(),
                    edge,
                })
            };
            match (t.inside, now) {
                (false, true) => push(RegionEdge::Enter(direction)),
                (true, false) => push(RegionEdge::Leave(direction)),
                (false, false) => {
                    let r = t.region.range;
                    let jumped = match direction {
                        ScrollDirection::Forward => prev_px < r.start_px && offset_px >= r.end_px,
                        ScrollDirection::Backward => prev_px >= r.end_px && offset_px < r.start_px,
                    };
                    if jumped && r.start_px < r.end_px {
                        push(RegionEdge::Enter(direction));
                        push(RegionEdge::Leave(direction));
                    }
                }
                (true, true) => {}
            }
            t.inside = now;
        }
        events
    }
}

/// One scroll update as seen by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSignal {
    pub offset_px: f64,
    pub progress: f64,
    pub events: Vec<RegionEvent>,
}

/// Pinned range plus regions, fed raw scroll offsets.
pub struct ScrollTracker {
    pinned: ScrollRange,
    regions: RegionTracker,
    last_offset: Option<f64>,
    bus: EventBus<ScrollSignal>,
}

impl std::fmt::Debug for ScrollTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollTracker")
            .field("pinned", &self.pinned)
            .field("regions", &self.regions)
            .field("last_offset", &self.last_offset)
            .finish_non_exhaustive()
    }
}

impl ScrollTracker {
    pub fn new(pinned: ScrollRange, regions: Vec<Region>) -> Self {
        Self {
            pinned,
            regions: RegionTracker::new(regions),
            last_offset: None,
            bus: EventBus::with_history(0),
        }
    }

    pub fn from_layout(layout: &PageLayout) -> Self {
        Self::new(layout.pinned_range(), layout.regions())
    }

    pub fn set_layout(&mut self, layout: &PageLayout) {
        self.pinned = layout.pinned_range();
        self.regions.set_regions(layout.regions());
    }

    pub fn pinned(&self) -> ScrollRange {
        self.pinned
    }

    pub fn region_tracker(&self) -> &RegionTracker {
        &self.regions
    }

    pub fn last_offset(&self) -> Option<f64> {
        self.last_offset
    }

    /// `None` when the offset did not change. The first update behaves as if
    /// the page was scrolled there from the top.
    pub fn update(&mut self, offset_px: f64) -> Option<ScrollSignal> {
        if offset_px.is_nan() || self.last_offset == Some(offset_px) {
            return None;
        }
        let prev = self.last_offset.unwrap_or(f64::NEG_INFINITY);
        self.last_offset = Some(offset_px);

        let signal = ScrollSignal {
            offset_px,
            progress: self.pinned.progress(offset_px),
            events: self.regions.update(prev, offset_px),
        };
        self.bus.emit(0, signal.clone());
        Some(signal)
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ScrollSignal) + 'static) -> ObserverId {
        self.bus.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.bus.unsubscribe(id)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct RegionVh {
    name: String,
    start_vh: f64,
    end_vh: Option<f64>,
}

/// Page geometry kept in viewport heights so a resize only rescales it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    viewport_height_px: f64,
    pinned_start_vh: f64,
    pinned_end_vh: f64,
    regions: Vec<RegionVh>,
}

impl PageLayout {
    pub fn from_config(config: &LayoutConfig, viewport_height_px: f64) -> Self {
        Self {
            viewport_height_px: viewport_height_px.max(1.0),
            pinned_start_vh: config.pinned_start_vh,
            pinned_end_vh: config.pinned_start_vh + config.pinned_length_vh,
            regions: config
                .regions
                .iter()
                .map(|r| RegionVh {
                    name: r.name.clone(),
                    start_vh: r.start_vh,
                    end_vh: r.end_vh,
                })
                .collect(),
        }
    }

    /// Layout from DOM measurements at the current viewport height.
    pub fn measured(viewport_height_px: f64, pinned: ScrollRange, regions: &[Region]) -> Self {
        let vh = viewport_height_px.max(1.0);
        Self {
            viewport_height_px: vh,
            pinned_start_vh: pinned.start_px / vh,
            pinned_end_vh: pinned.end_px / vh,
            regions: regions
                .iter()
                .map(|r| RegionVh {
                    name: r.name.clone(),
                    start_vh: r.range.start_px / vh,
                    end_vh: r.range.end_px.is_finite().then(|| r.range.end_px / vh),
                })
                .collect(),
        }
    }

    pub fn viewport_height_px(&self) -> f64 {
        self.viewport_height_px
    }

    pub fn set_viewport_height(&mut self, px: f64) {
        if px > 0.0 && px.is_finite() {
            self.viewport_height_px = px;
        }
    }

    pub fn pinned_range(&self) -> ScrollRange {
        ScrollRange::new(
            self.pinned_start_vh * self.viewport_height_px,
            self.pinned_end_vh * self.viewport_height_px,
        )
    }

    pub fn regions(&self) -> Vec<Region> {
        self.regions
            .iter()
            .map(|r| Region {
                name: r.name.clone(),
                range: ScrollRange::new(
                    r.start_vh * self.viewport_height_px,
                    r.end_vh
                        .map_or(f64::INFINITY, |e| e * self.viewport_height_px),
                ),
            })
            .collect()
    }
}
