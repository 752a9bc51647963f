use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::starfield::Starfield;
use crate::surface::StarStyle;
use crate::viewport::ViewportSize;

use super::common;

/// Draws the starfield as instanced screen-facing quads.
///
/// Star positions never change after generation, so the instance buffer is
/// uploaded once and only rewritten if the point count changes.
pub(super) struct StarPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform: wgpu::Buffer,

    instances: wgpu::Buffer,
    instance_capacity: usize,
    /// Number of stars currently uploaded; `None` until the first upload.
    uploaded: Option<usize>,

    style: StarStyle,
}

impl StarPass {
    pub(super) fn new(device: &wgpu::Device, format: wgpu::TextureFormat, style: StarStyle) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("starfolio star shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/stars.wgsl").into()),
        });

        let size = std::mem::size_of::<StarUniform>() as u64;
        let bgl = common::uniform_layout(
            device,
            "starfolio star bgl",
            size,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let uniform = common::uniform_buffer(device, "starfolio star ubo", size);
        let bind_group = common::bind_uniform(device, "starfolio star bind group", &bgl, &uniform);

        let pipeline = common::pipeline(
            device,
            "starfolio star pipeline",
            &shader,
            &bgl,
            &[StarInstance::layout()],
            wgpu::PrimitiveTopology::TriangleList,
            format,
        );

        Self {
            pipeline,
            bind_group,
            uniform,
            instances: common::vertex_buffer(
                device,
                "starfolio star instances",
                0,
                std::mem::size_of::<StarInstance>(),
            ),
            instance_capacity: 0,
            uploaded: None,
            style,
        }
    }

    /// Writes this frame's uniforms and, on first use, the star positions.
    pub(super) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view_projection: Mat4,
        starfield: &Starfield,
        viewport: ViewportSize,
    ) {
        if self.uploaded != Some(starfield.len()) {
            if starfield.len() > self.instance_capacity {
                self.instances.destroy();
                self.instance_capacity = starfield.len();
                self.instances = common::vertex_buffer(
                    device,
                    "starfolio star instances",
                    self.instance_capacity,
                    std::mem::size_of::<StarInstance>(),
                );
            }
            let raw: Vec<StarInstance> = starfield
                .points()
                .iter()
                .map(|p| StarInstance { pos: p.to_array() })
                .collect();
            queue.write_buffer(&self.instances, 0, bytemuck::cast_slice(&raw));
            self.uploaded = Some(starfield.len());
        }

        let uniform = StarUniform {
            mvp: (view_projection * starfield.model_matrix()).to_cols_array_2d(),
            color: self.style.color.with_opacity(self.style.opacity).to_array(),
            viewport: [viewport.width.max(1) as f32, viewport.height.max(1) as f32],
            point_size: self.style.point_size,
            _pad: 0.0,
        };
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(&uniform));
    }

    pub(super) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        let Some(count) = self.uploaded.filter(|n| *n > 0) else { return };
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.instances.slice(..));
        rpass.draw(0..6, 0..count as u32);
    }

    pub(super) fn destroy(&mut self) {
        self.instances.destroy();
        self.uniform.destroy();
        self.uploaded = None;
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Uniform layout (96 bytes):
///
///  offset  0  mvp         [[f32; 4]; 4]
///  offset 64  color       [f32; 4]
///  offset 80  viewport    [f32; 2]
///  offset 88  point_size  f32
///  offset 92  _pad        f32
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct StarUniform {
    mvp: [[f32; 4]; 4],
    color: [f32; 4],
    viewport: [f32; 2],
    point_size: f32,
    _pad: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct StarInstance {
    pos: [f32; 3],
}

impl StarInstance {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<StarUniform>(), 96);
        assert_eq!(std::mem::size_of::<StarInstance>(), 12);
    }
}
