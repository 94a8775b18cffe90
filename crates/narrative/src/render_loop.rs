use tracing::warn;

use foundation::math::{Mat4, Vec2, Vec3};
use foundation::time::Time;
use runtime::{Frame, FrameClock};

use crate::controller::SceneController;
use crate::section::SectionState;

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub index: usize,
    pub world_position: Vec3,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelView {
    pub index: usize,
    pub text: String,
    /// Anchor in normalized device coordinates.
    pub ndc: Vec2,
    pub opacity: f64,
}

/// Immutable per-frame snapshot handed to a [`DrawSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub frame_index: u64,
    pub time: Time,
    pub section: SectionState,
    pub view_proj: Mat4,
    pub camera_position: Vec3,
    pub globe_model: Mat4,
    pub globe_radius: f64,
    pub starfield_rotation: f64,
    pub curtain_coverage: f64,
    /// Visible markers only.
    pub markers: Vec<MarkerView>,
    /// Visible labels in front of the camera.
    pub labels: Vec<LabelView>,
}

impl FrameView {
    pub fn capture(frame: Frame, controller: &SceneController) -> Self {
        let world = controller.world();
        let markers = world
            .markers
            .markers()
            .iter()
            .enumerate()
            .filter(|(_, m)| m.visible)
            .map(|(index, m)| MarkerView {
                index,
                world_position: world.globe.apply(m.position),
                opacity: m.opacity,
            })
            .collect();
        let labels = world
            .markers
            .labels()
            .iter()
            .enumerate()
            .filter(|(_, l)| l.visible)
            .filter_map(|(index, l)| {
                let ndc = world.camera.project_to_ndc(world.globe.apply(l.position))?;
                Some(LabelView {
                    index,
                    text: l.text.clone(),
                    ndc,
                    opacity: l.opacity,
                })
            })
            .collect();

        Self {
            frame_index: frame.index,
            time: frame.time,
            section: controller.section(),
            view_proj: world.camera.view_proj(),
            camera_position: world.camera.position,
            globe_model: world.globe_model(),
            globe_radius: world.globe_radius,
            starfield_rotation: world.starfield_rotation,
            curtain_coverage: world.curtain_coverage,
            markers,
            labels,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    Lost,
    OutOfMemory,
    Other(String),
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceError::Lost => write!(f, "surface lost"),
            SurfaceError::OutOfMemory => write!(f, "surface out of memory"),
            SurfaceError::Other(msg) => write!(f, "surface error: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

pub trait DrawSurface {
    fn draw(&mut self, view: &FrameView) -> Result<(), SurfaceError>;
}

/// Guards the single animation-frame registration.
#[derive(Debug, Default)]
pub struct FrameDriver {
    running: bool,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// `false` when already running; the caller must not register again.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Returns whether it was running. Safe to call repeatedly.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    Stopped,
    Hidden,
    Drawn,
    Failed,
}

#[derive(Debug)]
pub struct RenderLoop {
    controller: SceneController,
    clock: FrameClock,
    driver: FrameDriver,
    hidden: bool,
    frames_drawn: u64,
}

impl RenderLoop {
    pub fn new(controller: SceneController) -> Self {
        Self {
            controller,
            clock: FrameClock::new(),
            driver: FrameDriver::new(),
            hidden: false,
            frames_drawn: 0,
        }
    }

    pub fn controller(&self) -> &SceneController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SceneController {
        &mut self.controller
    }

    pub fn start(&mut self) -> bool {
        self.driver.start()
    }

    pub fn stop(&mut self) -> bool {
        let was_running = self.driver.stop();
        if was_running {
            self.clock.suspend();
        }
        was_running
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    pub fn set_document_hidden(&mut self, hidden: bool) {
        if hidden && !self.hidden {
            self.clock.suspend();
        }
        self.hidden = hidden;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// One animation frame at wall-clock `now`.
    pub fn tick(&mut self, now: Time, surface: &mut dyn DrawSurface) -> FrameOutcome {
        if !self.driver.is_running() {
            return FrameOutcome::Stopped;
        }
        if self.hidden {
            return FrameOutcome::Hidden;
        }

        let frame = self.clock.advance(now);
        self.controller.advance_frame(frame);

        let view = FrameView::capture(frame, &self.controller);
        match surface.draw(&view) {
            Ok(()) => {
                self.frames_drawn += 1;
                FrameOutcome::Drawn
            }
            Err(e) => {
                warn!(frame = frame.index, error = %e, "frame skipped");
                FrameOutcome::Failed
            }
        }
    }

    pub fn release(&mut self) {
        self.stop();
        self.controller.release();
    }
}
