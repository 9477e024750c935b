//! Particle and spark discs.
//!
//! Each disc is one instanced quad, one pixel larger than its radius so the
//! anti-aliased rim fits, shaded with the same coverage ramp the software
//! rasteriser uses.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::{create_quad_pipeline, InstanceBuffer};
use crate::color::Rgba;

/// Per-instance disc data.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct DotInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub color: [f32; 4],
}

impl DotInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32, 2 => Float32x4];

    pub fn new(center: Vec2, radius: f32, color: Rgba) -> Self {
        Self {
            center: center.to_array(),
            radius,
            color: color.to_array(),
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

pub(crate) struct DotPipeline {
    pipeline: wgpu::RenderPipeline,
    pub(crate) instances: InstanceBuffer<DotInstance>,
}

impl DotPipeline {
    pub(crate) fn new(
        device: &wgpu::Device,
        viewport_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let pipeline = create_quad_pipeline(
            device,
            viewport_layout,
            surface_format,
            "Dot Pipeline",
            DOT_SHADER,
            DotInstance::layout(),
        );
        Self {
            pipeline,
            instances: InstanceBuffer::new(device, "Dot Instance Buffer"),
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

/// WGSL for [`DotPipeline`]; `vs_main` and `fs_main`.
pub const DOT_SHADER: &str = concat!(
    viewport_wgsl!(),
    r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) local: vec2<f32>,
    @location(2) radius: f32,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) center: vec2<f32>,
    @location(1) radius: f32,
    @location(2) color: vec4<f32>,
) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
    );

    let local = corners[vertex_index] * (radius + 1.0);

    var out: VertexOutput;
    out.clip_position = to_clip(center + local);
    out.color = color;
    out.local = local;
    out.radius = radius;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let coverage = clamp(in.radius + 0.5 - length(in.local), 0.0, 1.0);
    if coverage <= 0.0 {
        discard;
    }
    return vec4<f32>(in.color.rgb, in.color.a * coverage * viewport.opacity);
}
"#
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<DotInstance>(), 28);
        let dot = DotInstance::new(Vec2::new(3.0, 4.0), 1.5, Rgba::CYAN.with_alpha(0.5));
        assert_eq!(dot.center, [3.0, 4.0]);
        assert_eq!(dot.color[3], 0.5);
    }
}
