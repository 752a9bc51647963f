use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};

use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

/// Three-stop top-to-bottom gradient; `middle` sits halfway down.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VerticalGradient {
    pub top: Color,
    pub middle: Color,
    pub bottom: Color,
}

impl VerticalGradient {
    pub fn new(top: Color, middle: Color, bottom: Color) -> Self {
        Self { top, middle, bottom }
    }

    /// Color at `t` in `[0, 1]` from the top edge. Out-of-range `t` is clamped.
    pub fn color_at(&self, t: f32) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        if t < 0.5 {
            lerp(self.top, self.middle, t * 2.0)
        } else {
            lerp(self.middle, self.bottom, (t - 0.5) * 2.0)
        }
    }
}

fn lerp(a: Color, b: Color, t: f32) -> Color {
    Color::from_premul(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
        a.a + (b.a - a.a) * t,
    )
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GradientUniform {
    top: [f32; 4],
    middle: [f32; 4],
    bottom: [f32; 4],
}

impl From<VerticalGradient> for GradientUniform {
    fn from(g: VerticalGradient) -> Self {
        Self {
            top: g.top.to_array(),
            middle: g.middle.to_array(),
            bottom: g.bottom.to_array(),
        }
    }
}

const UNIFORM_SIZE: u64 = std::mem::size_of::<GradientUniform>() as u64;

/// Fills the whole target with a [`VerticalGradient`].
///
/// Intended as the first draw of a frame; it overwrites what is underneath.
#[derive(Default)]
pub struct GradientFill {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    uniform: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
}

impl GradientFill {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        gradient: VerticalGradient,
    ) {
        self.ensure_pipeline(ctx);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(uniform) = self.uniform.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        ctx.queue
            .write_buffer(uniform, 0, bytemuck::bytes_of(&GradientUniform::from(gradient)));

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("starfolio gradient pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("starfolio gradient shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/gradient.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("starfolio gradient bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(UNIFORM_SIZE),
                    },
                    count: None,
                }],
            });

        let uniform = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("starfolio gradient uniform"),
            size: UNIFORM_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("starfolio gradient bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("starfolio gradient pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("starfolio gradient pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.uniform = Some(uniform);
        self.bind_group = Some(bind_group);
    }
}
