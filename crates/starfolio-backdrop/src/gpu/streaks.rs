use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use starfolio_engine::paint::Color;

use crate::streak::Streak;

use super::common;

/// Draws every live streak as a line strip.
///
/// Vertices are rebuilt each frame: streaks move and fade every update, and a
/// scene rarely holds more than a handful of them.
pub(super) struct StreakPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform: wgpu::Buffer,

    vertices: wgpu::Buffer,
    vertex_capacity: usize,
    /// Vertex range of each streak drawn this frame.
    ranges: Vec<std::ops::Range<u32>>,

    color: Color,
}

impl StreakPass {
    pub(super) fn new(device: &wgpu::Device, format: wgpu::TextureFormat, color: Color) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("starfolio streak shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/streaks.wgsl").into()),
        });

        let size = std::mem::size_of::<StreakUniform>() as u64;
        let bgl = common::uniform_layout(
            device,
            "starfolio streak bgl",
            size,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let uniform = common::uniform_buffer(device, "starfolio streak ubo", size);
        let bind_group =
            common::bind_uniform(device, "starfolio streak bind group", &bgl, &uniform);

        let pipeline = common::pipeline(
            device,
            "starfolio streak pipeline",
            &shader,
            &bgl,
            &[StreakVertex::layout()],
            wgpu::PrimitiveTopology::LineStrip,
            format,
        );

        let vertex_capacity = 64;
        Self {
            pipeline,
            bind_group,
            uniform,
            vertices: common::vertex_buffer(
                device,
                "starfolio streak vbo",
                vertex_capacity,
                std::mem::size_of::<StreakVertex>(),
            ),
            vertex_capacity,
            ranges: Vec::new(),
            color,
        }
    }

    pub(super) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view_projection: Mat4,
        streaks: &[Streak],
    ) {
        self.ranges.clear();

        let mut raw: Vec<StreakVertex> = Vec::new();
        for streak in streaks.iter().filter(|s| s.is_alive()) {
            let start = raw.len() as u32;
            let alpha = streak.opacity();
            raw.extend(streak.world_points().map(|p| StreakVertex {
                pos: p.to_array(),
                alpha,
            }));
            self.ranges.push(start..raw.len() as u32);
        }

        if raw.is_empty() {
            return;
        }

        if raw.len() > self.vertex_capacity {
            self.vertices.destroy();
            self.vertex_capacity = raw.len().next_power_of_two();
            self.vertices = common::vertex_buffer(
                device,
                "starfolio streak vbo",
                self.vertex_capacity,
                std::mem::size_of::<StreakVertex>(),
            );
        }
        queue.write_buffer(&self.vertices, 0, bytemuck::cast_slice(&raw));

        let uniform = StreakUniform {
            view_proj: view_projection.to_cols_array_2d(),
            color: self.color.to_array(),
        };
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(&uniform));
    }

    pub(super) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        if self.ranges.is_empty() {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertices.slice(..));
        for range in &self.ranges {
            rpass.draw(range.clone(), 0..1);
        }
    }

    pub(super) fn destroy(&mut self) {
        self.vertices.destroy();
        self.uniform.destroy();
        self.ranges.clear();
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct StreakUniform {
    view_proj: [[f32; 4]; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct StreakVertex {
    pos: [f32; 3],
    alpha: f32,
}

impl StreakVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // pos
        1 => Float32    // alpha
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StreakVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_match_shader() {
        assert_eq!(std::mem::size_of::<StreakUniform>(), 80);
        assert_eq!(std::mem::size_of::<StreakVertex>(), 16);
    }
}
