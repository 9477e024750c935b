//! Native window host.
//!
//! Opens a winit window, mounts a [`Backdrop`] on a [`Recorder`], and
//! presents each recorded frame through [`GpuState`]. Redraws chain
//! themselves, so the field animates at the display's refresh rate.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::canvas::Recorder;
use crate::color::Rgba;
use crate::config::FieldConfig;
use crate::error::{BackdropError, GpuError};
use crate::field::Viewport;
use crate::gpu::GpuState;
use crate::lifecycle::{Backdrop, Tick};
use crate::sparks::SparkConfig;

/// Settings for [`run`].
#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub title: String,
    /// Initial inner size in logical pixels.
    pub width: u32,
    pub height: u32,
    pub field: FieldConfig,
    /// The rising spark layer, if any.
    pub sparks: Option<SparkConfig>,
    /// Page colour behind the layer.
    pub background: Rgba,
    /// Fixed seed; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "backdrop".to_string(),
            width: 1280,
            height: 720,
            field: FieldConfig::default(),
            sparks: Some(SparkConfig::default()),
            background: Rgba::NAVY,
            seed: None,
        }
    }
}

impl WindowOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.field = field;
        self
    }

    pub fn with_sparks(mut self, sparks: Option<SparkConfig>) -> Self {
        self.sparks = sparks;
        self
    }

    pub fn with_background(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Open a window and animate the backdrop until it is closed.
///
/// Blocks on the event loop. Configuration errors are reported before any
/// window opens.
pub fn run(options: WindowOptions) -> Result<(), BackdropError> {
    options.field.validate()?;
    if let Some(sparks) = &options.sparks {
        sparks.validate()?;
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(options);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    options: WindowOptions,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    backdrop: Option<Backdrop<Recorder, StdRng>>,
    error: Option<BackdropError>,
}

impl App {
    fn new(options: WindowOptions) -> Self {
        Self {
            options,
            window: None,
            gpu_state: None,
            backdrop: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), BackdropError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.options.title.as_str())
            .with_inner_size(LogicalSize::new(self.options.width, self.options.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let gpu_state = pollster::block_on(GpuState::new(window.clone(), self.options.background))?;

        let rng = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let size = window.inner_size();
        let mut backdrop = Backdrop::mount(
            Some(Recorder::new()),
            Viewport::new(size.width, size.height),
            self.options.field.clone(),
            rng,
        )?;
        if let Some(sparks) = &self.options.sparks {
            backdrop = backdrop.with_sparks(sparks.clone())?;
        }

        window.request_redraw();
        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        self.backdrop = Some(backdrop);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: BackdropError) {
        log::error!("{err}");
        self.error = Some(err);
        self.teardown();
        event_loop.exit();
    }

    fn teardown(&mut self) {
        if let Some(backdrop) = &mut self.backdrop {
            backdrop.unmount();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                if let Some(backdrop) = &mut self.backdrop {
                    backdrop.resize(Viewport::new(physical_size.width, physical_size.height));
                }
            }
            WindowEvent::RedrawRequested => {
                let (Some(backdrop), Some(gpu_state)) = (&mut self.backdrop, &mut self.gpu_state) else {
                    return;
                };
                if backdrop.tick() == Tick::Stopped {
                    return;
                }

                if let Some(frame) = backdrop.surface() {
                    let opacity = backdrop.field().config().layer_opacity;
                    match gpu_state.render(frame, opacity) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            self.fail(event_loop, GpuError::OutOfMemory.into());
                            return;
                        }
                        Err(e) => log::warn!("render error: {e:?}"),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = WindowOptions::default();
        assert_eq!((options.width, options.height), (1280, 720));
        assert_eq!(options.background, Rgba::NAVY);
        assert!(options.sparks.is_some());
        assert_eq!(options.field, FieldConfig::default());
    }

    #[test]
    fn test_builders() {
        let options = WindowOptions::default()
            .with_title("hero")
            .with_size(800, 600)
            .with_sparks(None)
            .with_seed(3);
        assert_eq!(options.title, "hero");
        assert_eq!((options.width, options.height), (800, 600));
        assert!(options.sparks.is_none());
        assert_eq!(options.seed, Some(3));
    }
}
