use std::sync::Arc;

use mandel_core::{RenderBackend, View};
use wgpu::{BindGroup, Buffer, Device, Queue, RenderPipeline, TextureView};

use crate::context::GpuContext;
use crate::error::GpuError;
use crate::renderer::{draw_fullscreen, fullscreen_pipeline};
use crate::uniforms::ViewUniforms;

pub const MANDELBROT_WGSL: &str = include_str!("../shaders/mandelbrot.wgsl");

/// Evaluates the fractal in a fragment shader, one invocation per pixel.
///
/// The only per-frame upload is a [`ViewUniforms`] block.
pub struct GpuBackend {
    device: Arc<Device>,
    queue: Arc<Queue>,
    pipeline: RenderPipeline,
    uniform_buf: Buffer,
    bind_group: BindGroup,
}

impl GpuBackend {
    pub fn new(ctx: &GpuContext, format: wgpu::TextureFormat) -> Result<Self, GpuError> {
        let device = &ctx.device;

        let module = GpuContext::validated(device, "mandelbrot.wgsl", || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("mandelbrot"),
                source: wgpu::ShaderSource::Wgsl(MANDELBROT_WGSL.into()),
            })
        })?;

        // binding 0 : ViewUniforms uniform buffer
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mandelbrot_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline = GpuContext::validated(device, "mandelbrot pipeline", || {
            fullscreen_pipeline(device, "mandelbrot", &module, &bind_group_layout, format)
        })?;

        let uniform_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("view_uniforms"),
            size: std::mem::size_of::<ViewUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mandelbrot_bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buf.as_entire_binding(),
            }],
        });

        log::info!("Mandelbrot shader pipeline ready ({format:?})");

        Ok(Self {
            device: Arc::clone(&ctx.device),
            queue: Arc::clone(&ctx.queue),
            pipeline,
            uniform_buf,
            bind_group,
        })
    }
}

impl RenderBackend for GpuBackend {
    type Target = TextureView;
    type Error = GpuError;

    fn name(&self) -> &'static str {
        "gpu"
    }

    fn render(&mut self, view: &View, target: &mut TextureView) -> Result<(), GpuError> {
        let uniforms = ViewUniforms::from_view(view);
        self.queue
            .write_buffer(&self.uniform_buf, 0, bytemuck::bytes_of(&uniforms));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("mandelbrot-encoder"),
            });
        draw_fullscreen(&mut encoder, "mandelbrot-pass", target, &self.pipeline, &self.bind_group);
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}
