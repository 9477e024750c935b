//! GPU presentation of recorded frames.
//!
//! The simulator draws into a [`Recorder`]; [`GpuState::render`] replays that
//! frame with two instanced, alpha-blended pipelines in pixel space: one for
//! link segments and one for particle discs. Everything lives in the surface
//! format directly; there is no depth buffer because the layer is flat.

// WGSL shared by both shaders: the viewport uniform and the pixel-to-clip
// mapping. A macro so it can be spliced with `concat!`.
macro_rules! viewport_wgsl {
    () => {
        r#"
struct Viewport {
    size: vec2<f32>,
    opacity: f32,
    _pad: f32,
};

@group(0) @binding(0) var<uniform> viewport: Viewport;

// Pixels (origin top-left, y down) to clip space.
fn to_clip(p: vec2<f32>) -> vec4<f32> {
    let ndc = vec2<f32>(
        p.x / viewport.size.x * 2.0 - 1.0,
        1.0 - p.y / viewport.size.y * 2.0
    );
    return vec4<f32>(ndc, 0.0, 1.0);
}
"#
    };
}

mod dots;
mod links;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::canvas::{DrawCommand, Recorder};
use crate::color::Rgba;
use crate::error::GpuError;

pub use dots::{DotInstance, DOT_SHADER};
pub use links::{LineInstance, LINK_SHADER};

/// Pixel-to-clip mapping and layer opacity, shared by both pipelines.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    size: [f32; 2],
    opacity: f32,
    _pad: f32,
}

/// Surface, device and pipelines for one window.
pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    viewport_buffer: wgpu::Buffer,
    viewport_bind_group: wgpu::BindGroup,
    dots: dots::DotPipeline,
    links: links::LinkPipeline,
    background: wgpu::Color,
    // Scratch space reused across frames.
    dot_scratch: Vec<DotInstance>,
    line_scratch: Vec<LineInstance>,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, background: Rgba) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Backdrop Device"),
                    ..Default::default()
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Blend in sRGB-encoded space, as a 2D canvas does.
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let viewport_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Viewport Uniform Buffer"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let viewport_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Viewport Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let viewport_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Viewport Bind Group"),
            layout: &viewport_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_buffer.as_entire_binding(),
            }],
        });

        let dots = dots::DotPipeline::new(&device, &viewport_bind_group_layout, surface_format);
        let links = links::LinkPipeline::new(&device, &viewport_bind_group_layout, surface_format);

        let [r, g, b, a] = background.to_array();
        log::info!(
            "GPU ready: {} ({:?}), surface {:?} {}x{}",
            adapter.get_info().name,
            adapter.get_info().backend,
            surface_format,
            config.width,
            config.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            viewport_buffer,
            viewport_bind_group,
            dots,
            links,
            background: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            },
            dot_scratch: Vec::new(),
            line_scratch: Vec::new(),
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure with the current size after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Draw `frame` over the background at `opacity` and present it.
    pub fn render(&mut self, frame: &Recorder, opacity: f32) -> Result<(), wgpu::SurfaceError> {
        self.dot_scratch.clear();
        self.line_scratch.clear();
        for command in frame.commands() {
            match *command {
                DrawCommand::Circle { center, radius, color } => {
                    self.dot_scratch.push(DotInstance::new(center, radius, color));
                }
                DrawCommand::Line { from, to, color, width } => {
                    self.line_scratch.push(LineInstance::new(from, to, color, width));
                }
            }
        }

        let uniform = ViewportUniform {
            size: [self.config.width as f32, self.config.height as f32],
            opacity,
            _pad: 0.0,
        };
        self.queue
            .write_buffer(&self.viewport_buffer, 0, bytemuck::bytes_of(&uniform));
        self.dots.instances.upload(&self.device, &self.queue, &self.dot_scratch);
        self.links.instances.upload(&self.device, &self.queue, &self.line_scratch);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Backdrop Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Backdrop Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.viewport_bind_group, &[]);
            self.links.draw(&mut render_pass);
            self.dots.draw(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// A vertex buffer of per-instance data that grows on demand.
pub(crate) struct InstanceBuffer<T: Pod> {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: usize,
    len: u32,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Pod> InstanceBuffer<T> {
    const INITIAL_CAPACITY: usize = 256;

    pub(crate) fn new(device: &wgpu::Device, label: &'static str) -> Self {
        Self {
            label,
            buffer: create_instance_buffer::<T>(device, label, Self::INITIAL_CAPACITY),
            capacity: Self::INITIAL_CAPACITY,
            len: 0,
            _marker: std::marker::PhantomData,
        }
    }

    /// Replace the contents, reallocating if `data` does not fit.
    pub(crate) fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[T]) {
        if data.len() > self.capacity {
            self.capacity = data.len().next_power_of_two();
            self.buffer = create_instance_buffer::<T>(device, self.label, self.capacity);
            log::debug!("grew {} to {} instances", self.label, self.capacity);
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.len = data.len() as u32;
    }

    pub(crate) fn len(&self) -> u32 {
        self.len
    }

    pub(crate) fn slice(&self) -> wgpu::BufferSlice<'_> {
        let used = self.len as u64 * std::mem::size_of::<T>() as u64;
        self.buffer.slice(..used)
    }
}

fn create_instance_buffer<T: Pod>(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (capacity * std::mem::size_of::<T>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Instanced quad pipeline with straight alpha blending.
fn create_quad_pipeline(
    device: &wgpu::Device,
    viewport_layout: &wgpu::BindGroupLayout,
    surface_format: wgpu::TextureFormat,
    label: &str,
    source: &str,
    instance_layout: wgpu::VertexBufferLayout<'_>,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[viewport_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[instance_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
