//! Link segments between nearby particles.
//!
//! A segment is an instanced quad around the line, widened to at least one
//! pixel. Sub-pixel strokes keep their weight through alpha instead, which
//! is how a 2D canvas renders a `0.2` line width.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::{create_quad_pipeline, InstanceBuffer};
use crate::color::Rgba;

/// Per-instance segment data.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LineInstance {
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub color: [f32; 4],
    pub width: f32,
}

impl LineInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32x4,
        3 => Float32,
    ];

    pub fn new(from: Vec2, to: Vec2, color: Rgba, width: f32) -> Self {
        Self {
            from: from.to_array(),
            to: to.to_array(),
            color: color.to_array(),
            width,
        }
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

pub(crate) struct LinkPipeline {
    pipeline: wgpu::RenderPipeline,
    pub(crate) instances: InstanceBuffer<LineInstance>,
}

impl LinkPipeline {
    pub(crate) fn new(
        device: &wgpu::Device,
        viewport_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let pipeline = create_quad_pipeline(
            device,
            viewport_layout,
            surface_format,
            "Link Pipeline",
            LINK_SHADER,
            LineInstance::layout(),
        );
        Self {
            pipeline,
            instances: InstanceBuffer::new(device, "Link Instance Buffer"),
        }
    }

    pub(crate) fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.instances.len() == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.instances.slice());
        render_pass.draw(0..6, 0..self.instances.len());
    }
}

/// WGSL for [`LinkPipeline`]; `vs_main` and `fs_main`.
pub const LINK_SHADER: &str = concat!(
    viewport_wgsl!(),
    r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) across: f32,
    @location(2) half_width: f32,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) from_pos: vec2<f32>,
    @location(1) to_pos: vec2<f32>,
    @location(2) color: vec4<f32>,
    @location(3) width: f32,
) -> VertexOutput {
    var out: VertexOutput;

    let dir = to_pos - from_pos;
    let len = length(dir);
    if len < 0.0001 {
        // Zero-length: park outside the clip volume.
        out.clip_position = vec4<f32>(0.0, 0.0, -2.0, 1.0);
        out.color = vec4<f32>(0.0);
        out.across = 0.0;
        out.half_width = 0.0;
        return out;
    }

    let half_width = max(width, 1.0) * 0.5;
    let normal = vec2<f32>(-dir.y, dir.x) / len;
    let reach = half_width + 0.5;

    var ends = array<f32, 6>(0.0, 0.0, 1.0, 0.0, 1.0, 1.0);
    var sides = array<f32, 6>(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
    let along = ends[vertex_index];
    let side = sides[vertex_index];

    out.clip_position = to_clip(from_pos + dir * along + normal * side * reach);
    out.color = vec4<f32>(color.rgb, color.a * min(width, 1.0));
    out.across = side * reach;
    out.half_width = half_width;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let coverage = clamp(in.half_width + 0.5 - abs(in.across), 0.0, 1.0);
    if coverage <= 0.0 {
        discard;
    }
    return vec4<f32>(in.color.rgb, in.color.a * coverage * viewport.opacity);
}
"#
);
