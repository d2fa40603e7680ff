//! Renders the same view through the shader backend and the software
//! raster and compares the pixels. Skips when no GPU adapter is available.

use mandel_core::{CpuBackend, Dimensions, PixelBuffer, RenderBackend, Rgba, Stepping, View};
use mandel_gpu::{GpuBackend, GpuContext};

const WIDTH: u32 = 64; // 64 * 4 bytes = 256, no row padding needed for the readback
const HEIGHT: u32 = 48;

fn gpu_render(ctx: &GpuContext, view: &View) -> Vec<Rgba> {
    let format = wgpu::TextureFormat::Rgba8Unorm;
    let mut backend = GpuBackend::new(ctx, format).expect("shader backend");

    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("comparison_target"),
        size: wgpu::Extent3d {
            width: WIDTH,
            height: HEIGHT,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let mut target = texture.create_view(&Default::default());
    backend.render(view, &mut target).expect("gpu render");

    let readback = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("comparison_readback"),
        size: (WIDTH * HEIGHT * 4) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });
    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &readback,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(WIDTH * 4),
                rows_per_image: Some(HEIGHT),
            },
        },
        wgpu::Extent3d {
            width: WIDTH,
            height: HEIGHT,
            depth_or_array_layers: 1,
        },
    );
    ctx.queue.submit(std::iter::once(encoder.finish()));

    let slice = readback.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    ctx.device.poll(wgpu::Maintain::Wait);
    rx.recv().expect("map callback").expect("map readback");

    let pixels = bytemuck::cast_slice::<u8, Rgba>(&slice.get_mapped_range()).to_vec();
    readback.unmap();
    pixels
}

#[test]
fn gpu_matches_cpu_raster() {
    let ctx = match pollster::block_on(GpuContext::new_headless()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("skipping: {e}");
            return;
        }
    };

    for iterations in [16, 100] {
        let mut view = View::new();
        view.set_iterations(iterations);

        let gpu = gpu_render(&ctx, &view);

        let mut buf = PixelBuffer::new(Dimensions::new(WIDTH as i32, HEIGHT as i32));
        CpuBackend::new(Stepping::Exact)
            .render(&view, &mut buf)
            .expect("cpu render");

        assert_eq!(gpu.len(), buf.pixels().len());
        let matching = gpu.iter().zip(buf.pixels()).filter(|(a, b)| a == b).count();
        let ratio = matching as f64 / gpu.len() as f64;
        // f32 on the GPU against f64 on the CPU flips a few boundary pixels.
        assert!(ratio > 0.97, "iterations {iterations}: only {:.1}% of pixels agree", ratio * 100.0);
    }
}
