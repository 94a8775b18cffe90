//! Headless replay of a scroll script through the scene controller.
//!
//! Each step scrolls the page once and then runs a fixed number of 60 fps
//! frames, so tween-driven state (poses, label fades, the orbit) settles the
//! way it would in the browser.

use serde::Serialize;
use tracing::debug;

use foundation::time::Time;
use narrative::{
    ControllerEvent, DrawSurface, FrameView, NarrativeConfig, PageLayout, RenderLoop,
    SceneController, ScrollTracker, SectionState, SurfaceError,
};

pub const DEFAULT_STEPS: &str = "0.0,0.6,0.8,0.4";
pub const FRAME_DT_S: f64 = 1.0 / 60.0;
pub const VIEWPORT_HEIGHT_PX: f64 = 1000.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScrollStep {
    /// Pinned progress in `[0, 1]`.
    Progress(f64),
    /// Page offset in viewport heights, written `6vh`.
    ViewportHeights(f64),
}

impl ScrollStep {
    pub fn offset_px(self, layout: &PageLayout) -> f64 {
        match self {
            ScrollStep::Progress(p) => {
                let pinned = layout.pinned_range();
                pinned.start_px + p * (pinned.end_px - pinned.start_px)
            }
            ScrollStep::ViewportHeights(vh) => vh * layout.viewport_height_px(),
        }
    }
}

impl std::str::FromStr for ScrollStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (num, in_vh) = match s.strip_suffix("vh") {
            Some(n) => (n.trim(), true),
            None => (s, false),
        };
        let v: f64 = num
            .parse()
            .map_err(|_| format!("bad scroll step: {s:?}"))?;
        if !v.is_finite() {
            return Err(format!("bad scroll step: {s:?}"));
        }
        if in_vh {
            Ok(ScrollStep::ViewportHeights(v))
        } else if (0.0..=1.0).contains(&v) {
            Ok(ScrollStep::Progress(v))
        } else {
            Err(format!("progress step outside [0, 1]: {v}"))
        }
    }
}

/// Comma-separated steps, e.g. `0.0,0.6,6vh`.
pub fn parse_steps(list: &str) -> Result<Vec<ScrollStep>, String> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// Draw surface that only remembers the last frame.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    pub draws: u64,
    pub last: Option<FrameView>,
}

impl DrawSurface for HeadlessSurface {
    fn draw(&mut self, view: &FrameView) -> Result<(), SurfaceError> {
        self.draws += 1;
        self.last = Some(view.clone());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub steps: Vec<ScrollStep>,
    pub frames_per_step: u32,
    pub reduced_motion: bool,
    pub viewport_height_px: f64,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            steps: vec![
                ScrollStep::Progress(0.0),
                ScrollStep::Progress(0.6),
                ScrollStep::Progress(0.8),
                ScrollStep::Progress(0.4),
            ],
            frames_per_step: 90,
            reduced_motion: false,
            viewport_height_px: VIEWPORT_HEIGHT_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub offset_px: f64,
    pub progress: f64,
    pub section: SectionState,
    pub active_index: usize,
    pub visible_markers: Vec<usize>,
    pub blinking_markers: Vec<usize>,
    pub curtain_coverage: f64,
    /// Sampled at the moment of the scroll.
    pub scroll_locked: bool,
    pub globe_position: [f64; 3],
    pub globe_scale: f64,
    pub labels: Vec<String>,
    pub frame_callbacks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub step: usize,
    pub from: SectionState,
    pub to: SectionState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    pub transitions: Vec<Transition>,
    pub frames_drawn: u64,
}

pub fn run_replay(
    config: NarrativeConfig,
    options: &ReplayOptions,
) -> Result<ReplayReport, String> {
    let layout = PageLayout::from_config(&config.layout, options.viewport_height_px);
    let mut scroll = ScrollTracker::from_layout(&layout);
    let mut controller = SceneController::new(config).map_err(|e| e.to_string())?;
    controller.set_reduced_motion(options.reduced_motion);

    let mut render_loop = RenderLoop::new(controller);
    render_loop.start();
    let mut surface = HeadlessSurface::default();
    let mut now = Time(0.0);
    render_loop.tick(now, &mut surface);

    let mut steps = Vec::with_capacity(options.steps.len());
    let mut transitions = Vec::new();
    for (index, step) in options.steps.iter().enumerate() {
        let offset_px = step.offset_px(&layout);
        if let Some(signal) = scroll.update(offset_px) {
            debug!(
                step = index,
                offset_px,
                progress = signal.progress,
                region_events = signal.events.len(),
                "scroll"
            );
            render_loop.controller_mut().on_scroll(&signal, now);
        }
        let scroll_locked = render_loop.controller().is_scroll_locked(now);

        for _ in 0..options.frames_per_step {
            now = now.after(FRAME_DT_S);
            render_loop.tick(now, &mut surface);
        }

        for event in render_loop.controller_mut().drain_events() {
            if let ControllerEvent::SectionChanged { from, to } = event {
                transitions.push(Transition {
                    step: index,
                    from,
                    to,
                });
            }
        }

        let controller = render_loop.controller();
        let snapshot = controller.snapshot();
        let globe = &controller.world().globe;
        steps.push(StepReport {
            step: index,
            offset_px,
            progress: snapshot.progress,
            section: snapshot.section,
            active_index: snapshot.active_index,
            visible_markers: snapshot.visible_markers,
            blinking_markers: snapshot.blinking_markers,
            curtain_coverage: snapshot.curtain_coverage,
            scroll_locked,
            globe_position: globe.position.as_array(),
            globe_scale: globe.scale,
            labels: surface
                .last
                .as_ref()
                .map(|v| v.labels.iter().map(|l| l.text.clone()).collect())
                .unwrap_or_default(),
            frame_callbacks: snapshot.frame_callbacks,
        });
    }

    render_loop.release();
    Ok(ReplayReport {
        steps,
        transitions,
        frames_drawn: render_loop.frames_drawn(),
    })
}

/// Plain-text report, one line per step.
pub fn format_report(report: &ReplayReport) -> String {
    let mut out = String::new();
    for s in &report.steps {
        out.push_str(&format!(
            "step {:>2}  offset {:>8.1}px  progress {:.3}  {:<10} active {}  markers {:?}  blink {:?}  curtain {:.2}  locked {}  globe ({:.2}, {:.2}, {:.2}) x{:.2}  tasks {}\n",
            s.step,
            s.offset_px,
            s.progress,
            s.section.as_str(),
            s.active_index,
            s.visible_markers,
            s.blinking_markers,
            s.curtain_coverage,
            if s.scroll_locked { "yes" } else { "no" },
            s.globe_position[0],
            s.globe_position[1],
            s.globe_position[2],
            s.globe_scale,
            s.frame_callbacks,
        ));
    }
    for t in &report.transitions {
        out.push_str(&format!("step {:>2}: {} -> {}\n", t.step, t.from, t.to));
    }
    out.push_str(&format!("{} frames drawn\n", report.frames_drawn));
    out
}
