/// One acquired drawable plus the encoder recording into it.
///
/// Short-lived: holding it blocks acquisition of the next drawable, so it is
/// created and presented within a single `render_frame` call.
pub struct GpuFrame {
    surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl GpuFrame {
    pub(super) fn new(surface_texture: wgpu::SurfaceTexture, encoder: wgpu::CommandEncoder) -> Self {
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            surface_texture,
            view,
            encoder,
        }
    }

    pub(super) fn present(self, queue: &wgpu::Queue) {
        let Self {
            surface_texture,
            view,
            encoder,
        } = self;

        queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }
}
