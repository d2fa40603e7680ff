use std::sync::Arc;

use wgpu::{Adapter, Device, Instance, Queue, Surface};

use crate::error::GpuError;

/// Adapter, device and queue shared by every pass. Device and queue are
/// reference-counted so backends can hold on to them.
pub struct GpuContext {
    pub adapter: Adapter,
    pub device: Arc<Device>,
    pub queue: Arc<Queue>,
}

impl GpuContext {
    /// Create a context able to present to `surface`.
    pub async fn new(instance: &Instance, surface: Option<&Surface<'_>>) -> Result<Self, GpuError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: surface,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        log::info!("GPU adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("mandel-gpu device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        Ok(Self {
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    /// Create a context with no surface. Used for offscreen rendering and tests.
    pub async fn new_headless() -> Result<Self, GpuError> {
        let instance = Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        Self::new(&instance, None).await
    }

    /// Surface format to render into. Prefers a linear format so gray levels
    /// reach the screen exactly as the colour table defines them.
    pub fn surface_format(&self, surface: &Surface<'_>) -> Result<wgpu::TextureFormat, GpuError> {
        let caps = surface.get_capabilities(&self.adapter);
        caps.formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(GpuError::NoSurfaceFormat)
    }

    /// Runs `build` inside a validation error scope and reports a failure
    /// under `resource`.
    pub(crate) fn validated<T>(
        device: &Device,
        resource: &'static str,
        build: impl FnOnce() -> T,
    ) -> Result<T, GpuError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = build();
        match pollster::block_on(device.pop_error_scope()) {
            None => Ok(value),
            Some(error) => {
                log::error!("{resource}: {error}");
                Err(GpuError::Setup {
                    resource,
                    message: error.to_string(),
                })
            }
        }
    }
}
