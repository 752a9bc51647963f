//! wgpu-backed render surface.
//!
//! Each surface renders into its own offscreen texture. The texture view is
//! published through the surface's [`OutputElement`] so the page can
//! composite it over the window.

mod common;
mod stars;
mod streaks;

use anyhow::{bail, ensure, Result};
use starfolio_engine::paint::Color;

use crate::mount::OutputElement;
use crate::surface::{RenderSurface, SceneFrame, SurfaceDescriptor, SurfaceFactory};
use crate::viewport::ViewportSize;

use stars::StarPass;
use streaks::StreakPass;

/// Creates [`GpuSurface`]s on a shared device.
///
/// `format` must match what the compositor samples into, usually the window
/// surface format.
#[derive(Clone)]
pub struct GpuSurfaceFactory {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
}

impl GpuSurfaceFactory {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        Self { device, queue, format }
    }
}

impl SurfaceFactory for GpuSurfaceFactory {
    fn create(&mut self, desc: &SurfaceDescriptor) -> Result<Box<dyn RenderSurface>> {
        ensure!(desc.size.is_valid(), "surface size {:?} has a zero dimension", desc.size);
        let max = self.device.limits().max_texture_dimension_2d;
        if desc.size.width > max || desc.size.height > max {
            bail!(
                "surface size {}x{} exceeds the device limit of {max}",
                desc.size.width,
                desc.size.height
            );
        }

        let output = OutputElement::new(desc.size);
        let (texture, view) = create_target(&self.device, self.format, desc.size);
        output.set_view(Some(view.clone()));

        log::debug!(
            "created gpu surface {}x{} ({:?})",
            desc.size.width,
            desc.size.height,
            self.format
        );

        Ok(Box::new(GpuSurface {
            stars: StarPass::new(&self.device, self.format, desc.stars),
            streaks: StreakPass::new(&self.device, self.format, desc.streak_color),
            device: self.device.clone(),
            queue: self.queue.clone(),
            format: self.format,
            clear_color: desc.clear_color,
            texture: Some(texture),
            view: Some(view),
            output,
        }))
    }
}

/// Offscreen render target plus the passes that draw a scene into it.
pub struct GpuSurface {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
    clear_color: Color,

    /// `None` once released.
    texture: Option<wgpu::Texture>,
    view: Option<wgpu::TextureView>,
    output: OutputElement,

    stars: StarPass,
    streaks: StreakPass,
}

impl RenderSurface for GpuSurface {
    fn output(&self) -> &OutputElement {
        &self.output
    }

    fn size(&self) -> ViewportSize {
        self.output.size()
    }

    fn resize(&mut self, size: ViewportSize) {
        if self.texture.is_none() || !size.is_valid() || self.output.size() == size {
            return;
        }
        let max = self.device.limits().max_texture_dimension_2d;
        if size.width > max || size.height > max {
            log::warn!(
                "ignoring resize to {}x{}: exceeds device limit {max}",
                size.width,
                size.height
            );
            return;
        }

        let (texture, view) = create_target(&self.device, self.format, size);
        if let Some(old) = self.texture.replace(texture) {
            old.destroy();
        }
        self.view = Some(view.clone());
        self.output.set_size(size);
        self.output.set_view(Some(view));
    }

    fn render(&mut self, frame: &SceneFrame<'_>) -> Result<()> {
        let Some(view) = self.view.as_ref() else {
            bail!("render on a released surface");
        };
        let size = self.output.size();

        self.stars.prepare(
            &self.device,
            &self.queue,
            frame.view_projection,
            frame.starfield,
            size,
        );
        self.streaks
            .prepare(&self.device, &self.queue, frame.view_projection, frame.streaks);

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("starfolio backdrop encoder"),
        });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("starfolio backdrop pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            self.stars.draw(&mut rpass);
            self.streaks.draw(&mut rpass);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        let Some(texture) = self.texture.take() else { return Ok(()) };
        self.output.set_view(None);
        self.view = None;
        self.stars.destroy();
        self.streaks.destroy();
        texture.destroy();
        log::debug!("released gpu surface");
        Ok(())
    }
}

fn create_target(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    size: ViewportSize,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("starfolio backdrop target"),
        size: wgpu::Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}
