//! Browser host (feature `web`, wasm32 only).
//!
//! Draws into an existing `<canvas>` through its 2D context, sized to the
//! browser window, animated with `requestAnimationFrame`, and re-seeded on
//! every window `resize` event.
//!
//! ```js
//! import init, { ParticleBackground } from "./backdrop.js";
//! await init();
//! const bg = new ParticleBackground(document.getElementById("bg"));
//! // later, when the page section goes away:
//! bg.detach();
//! ```

use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::canvas::Canvas;
use crate::color::Rgba;
use crate::config::FieldConfig;
use crate::error::BackdropError;
use crate::field::Viewport;
use crate::lifecycle::{Backdrop, Tick};
use crate::sparks::SparkConfig;

/// A `<canvas>` element and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// `None` when the element has no 2D context to give.
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, context })
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Canvas for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        self.context.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let ctx = &self.context;
        ctx.set_fill_style_str(&color.to_css());
        ctx.begin_path();
        if ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_ok()
        {
            ctx.fill();
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        let ctx = &self.context;
        ctx.set_stroke_style_str(&color.to_css());
        ctx.set_line_width(width as f64);
        ctx.begin_path();
        ctx.move_to(from.x as f64, from.y as f64);
        ctx.line_to(to.x as f64, to.y as f64);
        ctx.stroke();
    }
}

type SharedBackdrop = Rc<RefCell<Backdrop<CanvasSurface, StdRng>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A backdrop mounted on a page canvas and driven by the browser.
pub struct WebBackdrop {
    backdrop: SharedBackdrop,
    window: Option<Window>,
    frame: FrameCallback,
    frame_id: Rc<Cell<Option<i32>>>,
    on_resize: Option<Closure<dyn FnMut()>>,
}

impl WebBackdrop {
    /// Mount on `canvas` and start animating.
    ///
    /// A canvas without a 2D context yields an inert backdrop: no loop, no
    /// listener, no error.
    pub fn attach(
        canvas: HtmlCanvasElement,
        config: FieldConfig,
        sparks: Option<SparkConfig>,
    ) -> Result<Self, BackdropError> {
        let window = web_sys::window();
        let viewport = window.as_ref().map(viewport_of).unwrap_or_default();

        let opacity = config.layer_opacity;
        let surface = CanvasSurface::new(canvas);
        if let Some(surface) = &surface {
            let _ = surface
                .element()
                .style()
                .set_property("opacity", &opacity.to_string());
        }

        let mut backdrop = Backdrop::mount(surface, viewport, config, StdRng::from_entropy())?;
        if let Some(sparks) = sparks {
            backdrop = backdrop.with_sparks(sparks)?;
        }

        let mut host = Self {
            backdrop: Rc::new(RefCell::new(backdrop)),
            window,
            frame: Rc::new(RefCell::new(None)),
            frame_id: Rc::new(Cell::new(None)),
            on_resize: None,
        };
        if host.backdrop.borrow().is_active() {
            host.start();
        }
        Ok(host)
    }

    fn start(&mut self) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let backdrop = self.backdrop.clone();
        let frame = self.frame.clone();
        let frame_id = self.frame_id.clone();
        let raf_window = window.clone();
        *self.frame.borrow_mut() = Some(Closure::new(move || {
            frame_id.set(None);
            if backdrop.borrow_mut().tick() == Tick::Stopped {
                return;
            }
            if let Some(callback) = frame.borrow().as_ref() {
                match raf_window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(id) => frame_id.set(Some(id)),
                    Err(err) => log::warn!("requestAnimationFrame failed: {err:?}"),
                }
            }
        }));

        let backdrop = self.backdrop.clone();
        let resize_window = window.clone();
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            backdrop.borrow_mut().resize(viewport_of(&resize_window));
        });
        if let Err(err) = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref()) {
            log::warn!("could not listen for resize: {err:?}");
        }
        self.on_resize = Some(on_resize);

        if let Some(callback) = self.frame.borrow().as_ref() {
            match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                Ok(id) => self.frame_id.set(Some(id)),
                Err(err) => log::warn!("requestAnimationFrame failed: {err:?}"),
            }
        }
    }

    /// Stop the loop, drop the listener and release the canvas.
    ///
    /// After this returns no callback will draw again. Idempotent.
    pub fn detach(&mut self) {
        self.backdrop.borrow_mut().unmount();

        if let Some(window) = &self.window {
            if let Some(id) = self.frame_id.take() {
                let _ = window.cancel_animation_frame(id);
            }
            if let Some(on_resize) = self.on_resize.take() {
                let _ = window
                    .remove_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
            }
        }
        // Breaks the callback's reference to itself.
        self.frame.borrow_mut().take();
    }

    pub fn is_active(&self) -> bool {
        self.backdrop.borrow().is_active()
    }
}

impl Drop for WebBackdrop {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Window inner size in CSS pixels.
fn viewport_of(window: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32;
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

/// JavaScript handle: `new ParticleBackground(canvas)` mounts with the
/// default look, `detach()` tears it down.
#[wasm_bindgen]
pub struct ParticleBackground {
    inner: WebBackdrop,
}

#[wasm_bindgen]
impl ParticleBackground {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<ParticleBackground, JsValue> {
        WebBackdrop::attach(canvas, FieldConfig::default(), None)
            .map(|inner| Self { inner })
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Mount with the rising spark layer on top of the field.
    #[wasm_bindgen(js_name = withSparks)]
    pub fn with_sparks(canvas: HtmlCanvasElement) -> Result<ParticleBackground, JsValue> {
        WebBackdrop::attach(canvas, FieldConfig::default(), Some(SparkConfig::default()))
            .map(|inner| Self { inner })
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    pub fn detach(&mut self) {
        self.inner.detach();
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.inner.is_active()
    }
}
