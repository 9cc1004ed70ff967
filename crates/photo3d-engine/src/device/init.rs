/// GPU setup options.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format when one exists.
    ///
    /// Photos uploaded as [`ColorSpace::Linear`](crate::render::ColorSpace)
    /// carry their encoded values straight through, so they want a linear
    /// surface to look unchanged.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Falls back to the first supported mode when unset or unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,

    /// Device limits to request. `None` asks for everything the adapter
    /// supports, which lifts `max_buffer_size` well past the 256 MiB default
    /// that full-resolution triangle meshes outgrow.
    pub required_limits: Option<wgpu::Limits>,

    /// Hint only; honoured per platform.
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    /// Settings matching an unconverted `Rgba8Unorm` photo texture.
    pub fn for_photos() -> Self {
        Self {
            prefer_srgb: false,
            ..Self::default()
        }
    }

    /// Limits to request from a device on an adapter supporting `adapter`.
    pub(crate) fn resolve_limits(&self, adapter: &wgpu::Limits) -> wgpu::Limits {
        self.required_limits.clone().unwrap_or_else(|| adapter.clone())
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: None,
            desired_maximum_frame_latency: 2,
        }
    }
}
