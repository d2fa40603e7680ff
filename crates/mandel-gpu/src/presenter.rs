use std::sync::Arc;

use mandel_core::PixelBuffer;
use wgpu::{BindGroup, BindGroupLayout, Device, Queue, RenderPipeline, Sampler, Texture, TextureView};

use crate::context::GpuContext;
use crate::error::GpuError;
use crate::renderer::{draw_fullscreen, fullscreen_pipeline, FULLSCREEN_WGSL};

/// Texture mirroring a pixel buffer, rebuilt when the buffer size changes.
struct Upload {
    texture: Texture,
    bind_group: BindGroup,
    width: u32,
    height: u32,
}

/// Shows a CPU-rendered [`PixelBuffer`] by uploading it to a texture and
/// drawing a full-screen quad.
pub struct TexturePresenter {
    device: Arc<Device>,
    queue: Arc<Queue>,
    pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
    sampler: Sampler,
    upload: Option<Upload>,
}

impl TexturePresenter {
    pub fn new(ctx: &GpuContext, format: wgpu::TextureFormat) -> Result<Self, GpuError> {
        let device = &ctx.device;

        let module = GpuContext::validated(device, "fullscreen blit shader", || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("fullscreen"),
                source: wgpu::ShaderSource::Wgsl(FULLSCREEN_WGSL.into()),
            })
        })?;

        // binding 0 : pixel texture
        // binding 1 : sampler
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blit_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Nearest filtering keeps one texel per screen pixel crisp.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("blit_sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            ..Default::default()
        });

        let pipeline = GpuContext::validated(device, "fullscreen blit pipeline", || {
            fullscreen_pipeline(device, "blit", &module, &bind_group_layout, format)
        })?;

        Ok(Self {
            device: Arc::clone(&ctx.device),
            queue: Arc::clone(&ctx.queue),
            pipeline,
            bind_group_layout,
            sampler,
            upload: None,
        })
    }

    /// Uploads the last raster of `pixels` and draws it over `target`.
    /// Does nothing if the buffer has not been rendered at its current size.
    pub fn present(&mut self, pixels: &PixelBuffer, target: &TextureView) {
        let (width, height) = (pixels.width(), pixels.height());
        if pixels.pixels().len() != (width * height) as usize {
            log::warn!("pixel buffer not rendered at {width}×{height}, skipping present");
            return;
        }

        let stale = !matches!(&self.upload, Some(u) if u.width == width && u.height == height);
        if stale {
            self.upload = Some(self.create_upload(width, height));
            log::debug!("blit texture resized to {width}×{height}");
        }
        let Some(upload) = &self.upload else {
            return;
        };

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &upload.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(pixels.pixels()),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("blit-encoder"),
            });
        draw_fullscreen(&mut encoder, "blit-pass", target, &self.pipeline, &upload.bind_group);
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_upload(&self, width: u32, height: u32) -> Upload {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("cpu_pixels"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blit_bg"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        Upload {
            texture,
            bind_group,
            width,
            height,
        }
    }
}
