//! Browser surface for the portfolio globe.
//!
//! The host page owns the DOM listeners and the `requestAnimationFrame`
//! chain and forwards everything here: scroll offsets, pointer input,
//! visibility and frame timestamps. `start_loop` answers whether the page
//! should schedule frames at all, so the chain is registered once.

use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use serde::Deserialize;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use foundation::math::Vec2;
use foundation::time::Time;
use narrative::{
    ConfigError, ControllerEvent, DrawSurface, FrameView, LabelView, LayoutConfig,
    NarrativeConfig, PageLayout, Region, RenderLoop, SceneController, ScrollRange, ScrollTracker,
    SurfaceError, points_from_json,
};
use scene::ndc_from_pixels;

mod wgpu;
use wgpu::{WgpuContext, init_wgpu_from_canvas_id, render_frame, resize_wgpu};

const LABEL_FONT_PX: f64 = 14.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width_px: f64,
    pub height_px: f64,
    pub pixel_ratio: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width_px: 1280.0,
            height_px: 720.0,
            pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    /// Backing-store size in device pixels.
    pub fn device_size(&self) -> (u32, u32) {
        let w = (self.width_px * self.pixel_ratio).round().max(1.0);
        let h = (self.height_px * self.pixel_ratio).round().max(1.0);
        (w as u32, h as u32)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct MeasuredRegion {
    name: String,
    start_px: f64,
    #[serde(default)]
    end_px: Option<f64>,
}

/// Regions measured by the page, as `[{ "name", "start_px", "end_px"? }]`.
/// A missing end runs to the bottom of the page.
pub fn measured_regions(json: &str) -> Result<Vec<Region>, serde_json::Error> {
    let measured: Vec<MeasuredRegion> = serde_json::from_str(json)?;
    Ok(measured
        .into_iter()
        .map(|r| Region {
            name: r.name,
            range: ScrollRange::new(r.start_px, r.end_px.unwrap_or(f64::INFINITY)),
        })
        .collect())
}

/// Layout in force after a configuration change. Positions measured by the
/// page outlive the configured `vh` layout.
pub fn layout_after_reconfigure(
    current: &PageLayout,
    measured: bool,
    config: &LayoutConfig,
    viewport_height_px: f64,
) -> PageLayout {
    if measured {
        current.clone()
    } else {
        PageLayout::from_config(config, viewport_height_px)
    }
}

/// Canvas pixel position of an NDC anchor.
pub fn label_anchor_px(ndc: Vec2, width_px: f64, height_px: f64) -> (f64, f64) {
    (
        (ndc.x + 1.0) * 0.5 * width_px,
        (1.0 - ndc.y) * 0.5 * height_px,
    )
}

/// CSS transform for the curtain; it grows upwards from the bottom edge.
pub fn curtain_transform(coverage: f64) -> String {
    format!("scaleY({:.4})", coverage.clamp(0.0, 1.0))
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

struct LabelOverlay {
    canvas: web_sys::HtmlCanvasElement,
    ctx: web_sys::CanvasRenderingContext2d,
}

impl LabelOverlay {
    fn from_canvas_id(document: &web_sys::Document, id: &str) -> Result<Self, JsValue> {
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str("label canvas missing"))?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<web_sys::CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn draw(&self, labels: &[LabelView], pixel_ratio: f64) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        self.ctx.clear_rect(0.0, 0.0, w, h);
        if labels.is_empty() {
            return;
        }
        self.ctx
            .set_font(&format!("{}px sans-serif", (LABEL_FONT_PX * pixel_ratio).round()));
        self.ctx.set_text_align("center");
        self.ctx.set_fill_style_str("#ffffff");
        for label in labels {
            let (x, y) = label_anchor_px(label.ndc, w, h);
            self.ctx.set_global_alpha(label.opacity.clamp(0.0, 1.0));
            if let Err(err) = self.ctx.fill_text(&label.text, x, y) {
                warn(&format!("label draw failed: {err:?}"));
            }
        }
        self.ctx.set_global_alpha(1.0);
    }
}

struct WebSurface<'a> {
    gpu: Option<&'a mut WgpuContext>,
    overlay: Option<&'a LabelOverlay>,
    curtain: Option<&'a web_sys::HtmlElement>,
    pixel_ratio: f64,
}

impl DrawSurface for WebSurface<'_> {
    fn draw(&mut self, view: &FrameView) -> Result<(), SurfaceError> {
        if let Some(ctx) = self.gpu.as_deref_mut() {
            render_frame(ctx, view)?;
        }
        if let Some(overlay) = self.overlay {
            overlay.draw(&view.labels, self.pixel_ratio);
        }
        if let Some(curtain) = self.curtain {
            curtain
                .style()
                .set_property("transform", &curtain_transform(view.curtain_coverage))
                .map_err(|e| SurfaceError::Other(format!("{e:?}")))?;
        }
        Ok(())
    }
}

struct App {
    render_loop: RenderLoop,
    scroll: ScrollTracker,
    layout: PageLayout,
    /// Set once the page reported measured region offsets.
    measured_layout: bool,
    viewport: Viewport,
    gpu: Option<WgpuContext>,
    overlay: Option<LabelOverlay>,
    curtain: Option<web_sys::HtmlElement>,
}

impl App {
    fn new(config: NarrativeConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        let layout = PageLayout::from_config(&config.layout, viewport.height_px);
        let scroll = ScrollTracker::from_layout(&layout);
        Ok(Self {
            render_loop: RenderLoop::new(build_controller(config, viewport)?),
            scroll,
            layout,
            measured_layout: false,
            viewport,
            gpu: None,
            overlay: None,
            curtain: None,
        })
    }

    fn controller(&mut self) -> &mut SceneController {
        self.render_loop.controller_mut()
    }

    /// Swap in a new configuration, keeping the mounted surfaces and the
    /// current scroll position.
    fn reconfigure(&mut self, config: NarrativeConfig, now: Time) -> Result<(), ConfigError> {
        let reduced = self.render_loop.controller().reduced_motion();
        let mut controller = build_controller(config, self.viewport)?;
        controller.set_reduced_motion(reduced);

        let was_running = self.render_loop.is_running();
        self.render_loop.release();
        self.render_loop = RenderLoop::new(controller);
        if was_running {
            self.render_loop.start();
        }

        self.layout = layout_after_reconfigure(
            &self.layout,
            self.measured_layout,
            &self.render_loop.controller().config().layout,
            self.viewport.height_px,
        );
        let offset = self.scroll.last_offset();
        self.scroll = ScrollTracker::from_layout(&self.layout);
        if let Some(offset) = offset {
            self.on_scroll(offset, now);
        }
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.controller()
            .set_viewport(viewport.width_px, viewport.height_px);
        self.layout.set_viewport_height(viewport.height_px);
        self.scroll.set_layout(&self.layout);

        let (w, h) = viewport.device_size();
        if let Some(ctx) = &mut self.gpu {
            resize_wgpu(ctx, w, h);
        }
        if let Some(overlay) = &self.overlay {
            overlay.resize(w, h);
        }
    }

    fn on_scroll(&mut self, offset_px: f64, now: Time) {
        if let Some(signal) = self.scroll.update(offset_px) {
            self.render_loop.controller_mut().on_scroll(&signal, now);
        }
    }

    fn frame(&mut self, now: Time) -> bool {
        let App {
            render_loop,
            viewport,
            gpu,
            overlay,
            curtain,
            ..
        } = self;
        let mut surface = WebSurface {
            gpu: gpu.as_mut(),
            overlay: overlay.as_ref(),
            curtain: curtain.as_ref(),
            pixel_ratio: viewport.pixel_ratio,
        };
        render_loop.tick(now, &mut surface);
        render_loop.is_running()
    }
}

fn build_controller(
    config: NarrativeConfig,
    viewport: Viewport,
) -> Result<SceneController, ConfigError> {
    let mut controller = SceneController::new(config)?;
    controller.set_viewport(viewport.width_px, viewport.height_px);
    controller.subscribe(|event| {
        if let ControllerEvent::SectionChanged { from, to } = event {
            log(&format!("section {from} -> {to}"));
        }
    });
    Ok(controller)
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|app| app.borrow_mut().as_mut().map(f))
}

fn ensure_app() {
    APP.with(|app| {
        let mut app = app.borrow_mut();
        if app.is_none() {
            match App::new(NarrativeConfig::default(), Viewport::default()) {
                Ok(a) => *app = Some(a),
                Err(err) => warn(&format!("default configuration rejected: {err}")),
            }
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    ensure_app();
    Ok(())
}

/// Attach the 3D canvas, the label overlay and the curtain element.
///
/// Resolves to `false` when no GPU adapter is available; the controller
/// keeps following scroll either way.
#[wasm_bindgen]
pub async fn mount(canvas_id: String, overlay_canvas_id: String, curtain_id: String) -> bool {
    ensure_app();
    let ctx = match init_wgpu_from_canvas_id(&canvas_id).await {
        Ok(ctx) => Some(ctx),
        Err(err) => {
            warn(&format!("wgpu init error: {err:?}"));
            None
        }
    };

    let document = web_sys::window().and_then(|w| w.document());
    let overlay = document.as_ref().and_then(|doc| {
        LabelOverlay::from_canvas_id(doc, &overlay_canvas_id)
            .map_err(|err| warn(&format!("labels disabled: {err:?}")))
            .ok()
    });
    let curtain = document.as_ref().and_then(|doc| {
        doc.get_element_by_id(&curtain_id)
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
    });
    if curtain.is_none() {
        warn("curtain element missing");
    }

    with_app(|app| {
        app.gpu = ctx;
        app.overlay = overlay;
        app.curtain = curtain;
        let viewport = app.viewport;
        app.set_viewport(viewport);
        app.gpu.is_some()
    })
    .unwrap_or(false)
}

#[wasm_bindgen]
pub fn is_available() -> bool {
    with_app(|app| app.gpu.is_some()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn configure(json: &str, now_ms: f64) -> Result<(), JsValue> {
    let config = NarrativeConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    ensure_app();
    with_app(|app| app.reconfigure(config, Time::from_millis(now_ms)))
        .unwrap_or(Ok(()))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Fetch a POI list; on failure the current points stay.
#[wasm_bindgen]
pub fn load_points(url: String) {
    spawn_local(async move {
        let points = match fetch_text(&url).await {
            Ok(text) => points_from_json(&text).map_err(|e| JsValue::from_str(&e.to_string())),
            Err(err) => Err(err),
        };
        match points {
            Ok(points) => {
                let count = points.len();
                let applied = with_app(|app| app.controller().set_points(points));
                match applied {
                    Some(Ok(())) => log(&format!("loaded {count} points")),
                    Some(Err(err)) => warn(&format!("points rejected: {err}")),
                    None => {}
                }
            }
            Err(err) => warn(&format!("Failed to fetch points: {err:?}")),
        }
    });
}

#[wasm_bindgen]
pub fn set_viewport(width: f64, height: f64, pixel_ratio: f64) {
    let viewport = Viewport {
        width_px: width.max(1.0),
        height_px: height.max(1.0),
        pixel_ratio: if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 },
    };
    with_app(|app| app.set_viewport(viewport));
}

/// Replace the configured page geometry with DOM measurements.
#[wasm_bindgen]
pub fn set_layout(
    pinned_start_px: f64,
    pinned_end_px: f64,
    regions_json: &str,
) -> Result<(), JsValue> {
    let regions = measured_regions(regions_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    with_app(|app| {
        app.layout = PageLayout::measured(
            app.viewport.height_px,
            ScrollRange::new(pinned_start_px, pinned_end_px),
            &regions,
        );
        app.measured_layout = true;
        app.scroll.set_layout(&app.layout);
    });
    Ok(())
}

#[wasm_bindgen]
pub fn on_scroll(offset_px: f64, now_ms: f64) {
    with_app(|app| app.on_scroll(offset_px, Time::from_millis(now_ms)));
}

/// Whether a wheel or touchmove at `now_ms` should be cancelled.
#[wasm_bindgen]
pub fn scroll_locked(now_ms: f64) -> bool {
    with_app(|app| {
        app.render_loop
            .controller()
            .is_scroll_locked(Time::from_millis(now_ms))
    })
    .unwrap_or(false)
}

#[wasm_bindgen]
pub fn pointer_move(x_px: f64, y_px: f64) {
    with_app(|app| {
        let ndc = ndc_from_pixels(x_px, y_px, app.viewport.width_px, app.viewport.height_px);
        let controller = app.controller();
        controller.set_pointer(ndc);
        controller.drag_move(x_px);
    });
}

#[wasm_bindgen]
pub fn pointer_down(x_px: f64) {
    with_app(|app| app.controller().drag_begin(x_px));
}

#[wasm_bindgen]
pub fn pointer_up() {
    with_app(|app| app.controller().drag_end());
}

#[wasm_bindgen]
pub fn pointer_leave() {
    with_app(|app| {
        let controller = app.controller();
        controller.set_pointer(None);
        controller.drag_end();
    });
}

#[wasm_bindgen]
pub fn set_document_hidden(hidden: bool) {
    with_app(|app| app.render_loop.set_document_hidden(hidden));
}

/// `true` only for the call that starts the loop; the page schedules
/// animation frames only then.
#[wasm_bindgen]
pub fn start_loop() -> bool {
    with_app(|app| app.render_loop.start()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn stop_loop() -> bool {
    with_app(|app| app.render_loop.stop()).unwrap_or(false)
}

/// One animation frame. Returns whether the page should request another.
#[wasm_bindgen]
pub fn frame(now_ms: f64) -> bool {
    with_app(|app| app.frame(Time::from_millis(now_ms))).unwrap_or(false)
}

#[wasm_bindgen]
pub fn set_reduced_motion(reduced: bool) {
    with_app(|app| app.controller().set_reduced_motion(reduced));
}

#[wasm_bindgen]
pub fn focus_on(index: u32) -> bool {
    with_app(|app| app.controller().focus_on(index as usize)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn next() {
    with_app(|app| app.controller().next());
}

#[wasm_bindgen]
pub fn previous() {
    with_app(|app| app.controller().previous());
}

#[wasm_bindgen]
pub fn current_section() -> String {
    with_app(|app| app.render_loop.controller().section().to_string()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn active_index() -> u32 {
    with_app(|app| app.render_loop.controller().active_index() as u32).unwrap_or(0)
}

/// The active point as JSON, or `null`.
#[wasm_bindgen]
pub fn active_point_json() -> String {
    with_app(|app| {
        app.render_loop
            .controller()
            .active_point()
            .and_then(|p| serde_json::to_string(p).ok())
    })
    .flatten()
    .unwrap_or_else(|| "null".to_string())
}

/// Stop the loop, cancel every task and drop the GPU resources.
/// Safe to call more than once.
#[wasm_bindgen]
pub fn teardown() {
    let app = APP.with(|app| app.borrow_mut().take());
    if let Some(mut app) = app {
        app.render_loop.release();
        if let Some(overlay) = &app.overlay {
            overlay.draw(&[], app.viewport.pixel_ratio);
        }
        log("portfolio scene released");
    }
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", resp.status())));
    }
    resp.text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
