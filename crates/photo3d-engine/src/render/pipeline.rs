//! The photo renderer: owns the GPU context, pipelines and the current photo.

use std::path::Path;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::camera::CameraState;
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};

use super::frame::{DrawCall, FrameOutcome, FramePlan, SkipReason};
use super::mesh::{GridDims, GridVertex, PointUniforms};
use super::settings::{PrimitiveMode, RenderSettings};
use super::texture::{ColorSpace, PhotoTexture, TextureError};
use super::transform::MatrixUniform;

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Renders a photo as a textured grid under a rotating camera.
///
/// Two states: `Uninitialized` (no GPU device could be created; every call is
/// a no-op) and `Ready`. Setup failure is logged once and never retried.
pub struct PhotoRenderer<'w> {
    state: RendererState<'w>,
}

enum RendererState<'w> {
    Uninitialized,
    Ready(Box<ReadyRenderer<'w>>),
}

impl<'w> PhotoRenderer<'w> {
    /// Creates the GPU context for `window` and builds all pipelines.
    ///
    /// Blocks on adapter/device acquisition. Never fails: on error the
    /// renderer starts out `Uninitialized`.
    pub fn new(window: &'w Window, init: GpuInit) -> Self {
        match pollster::block_on(Gpu::new(window, init)) {
            Ok(gpu) => Self::from_gpu(window, gpu),
            Err(e) => {
                log::error!("GPU setup failed, rendering disabled: {e:#}");
                Self::uninitialized()
            }
        }
    }

    /// Builds shaders and pipelines on an existing GPU context.
    ///
    /// A shader or pipeline validation failure leaves the renderer
    /// `Uninitialized`.
    pub fn from_gpu(window: &'w Window, gpu: Gpu<'w>) -> Self {
        match ReadyRenderer::new(window, gpu) {
            Ok(ready) => {
                log::info!("photo renderer ready");
                Self {
                    state: RendererState::Ready(Box::new(ready)),
                }
            }
            Err(e) => {
                log::error!("pipeline setup failed, rendering disabled: {e:#}");
                Self::uninitialized()
            }
        }
    }

    /// A renderer with no GPU behind it.
    pub fn uninitialized() -> Self {
        Self {
            state: RendererState::Uninitialized,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, RendererState::Ready(_))
    }

    /// Pixel size of the current photo, if one is loaded.
    pub fn image_size(&self) -> Option<(f32, f32)> {
        match &self.state {
            RendererState::Ready(r) => r.photo.as_ref().map(|p| p.texture.size_f32()),
            RendererState::Uninitialized => None,
        }
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if let RendererState::Ready(r) = &mut self.state {
            r.gpu.resize(new_size);
        }
    }

    /// Decodes and installs a new photo, replacing the current one.
    ///
    /// On failure the previous photo stays bound.
    pub fn load_image_bytes(
        &mut self,
        bytes: &[u8],
        color_space: ColorSpace,
    ) -> Result<(u32, u32), TextureError> {
        let RendererState::Ready(r) = &mut self.state else {
            return Err(TextureError::Unavailable);
        };
        let texture =
            PhotoTexture::from_bytes(r.gpu.device(), r.gpu.queue(), bytes, color_space)?;
        Ok(r.install_photo(texture))
    }

    /// Like [`load_image_bytes`](Self::load_image_bytes), reading from disk.
    pub fn load_image_path(
        &mut self,
        path: &Path,
        color_space: ColorSpace,
    ) -> Result<(u32, u32), TextureError> {
        let RendererState::Ready(r) = &mut self.state else {
            return Err(TextureError::Unavailable);
        };
        let texture = PhotoTexture::from_path(r.gpu.device(), r.gpu.queue(), path, color_space)?;
        Ok(r.install_photo(texture))
    }

    /// Draws one frame.
    ///
    /// Skips silently when uninitialized, when no photo is loaded or when the
    /// compositor has no drawable. The camera is only read.
    pub fn render_frame(&mut self, settings: RenderSettings, camera: &CameraState) -> FrameOutcome {
        match &mut self.state {
            RendererState::Ready(r) => r.render(settings, camera),
            RendererState::Uninitialized => FrameOutcome::Skipped(SkipReason::Uninitialized),
        }
    }
}

struct BoundPhoto {
    texture: PhotoTexture,
    bind_group: wgpu::BindGroup,
}

/// One pipeline per topology; wgpu fixes topology at pipeline creation.
struct TopologyPipelines {
    triangles: wgpu::RenderPipeline,
    points: wgpu::RenderPipeline,
    lines: wgpu::RenderPipeline,
}

impl TopologyPipelines {
    fn get(&self, mode: PrimitiveMode) -> &wgpu::RenderPipeline {
        match mode {
            PrimitiveMode::Triangles => &self.triangles,
            PrimitiveMode::Points => &self.points,
            PrimitiveMode::Lines => &self.lines,
        }
    }
}

struct ReadyRenderer<'w> {
    window: &'w Window,
    gpu: Gpu<'w>,
    frame_layout: wgpu::BindGroupLayout,
    photo_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    pipelines: TopologyPipelines,
    max_buffer_size: u64,
    photo: Option<BoundPhoto>,
}

/// Everything built once from the device: layouts, sampler and pipelines.
struct PhotoPipelines {
    frame_layout: wgpu::BindGroupLayout,
    photo_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    pipelines: TopologyPipelines,
}

const PHOTO_WGSL: &str = include_str!("shaders/photo.wgsl");

impl PhotoPipelines {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> anyhow::Result<Self> {
        Self::with_source(device, format, PHOTO_WGSL)
    }

    fn with_source(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        wgsl: &str,
    ) -> anyhow::Result<Self> {
        // Shader compilation and pipeline validation report through the scope
        // instead of the uncaptured-error handler.
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("photo3d photo shader"),
            source: wgpu::ShaderSource::Wgsl(wgsl.into()),
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("photo3d frame bgl"),
            entries: &[
                uniform_entry(0, std::mem::size_of::<MatrixUniform>()),
                uniform_entry(1, std::mem::size_of::<MatrixUniform>()),
                uniform_entry(2, std::mem::size_of::<MatrixUniform>()),
                uniform_entry(3, std::mem::size_of::<PointUniforms>()),
            ],
        });

        // The vertex stage reads the photo too, so both stages see the texture.
        let photo_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("photo3d photo bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("photo3d photo sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("photo3d pipeline layout"),
            bind_group_layouts: &[&frame_layout, &photo_layout],
            immediate_size: 0,
        });

        let build = |mode| create_pipeline(device, &pipeline_layout, &shader, format, mode);
        let pipelines = TopologyPipelines {
            triangles: build(PrimitiveMode::Triangles),
            points: build(PrimitiveMode::Points),
            lines: build(PrimitiveMode::Lines),
        };

        validation_result(pollster::block_on(scope.pop()))?;

        Ok(Self {
            frame_layout,
            photo_layout,
            sampler,
            pipelines,
        })
    }
}

fn validation_result<E: std::fmt::Display>(err: Option<E>) -> anyhow::Result<()> {
    match err {
        Some(err) => anyhow::bail!("photo pipeline validation failed: {err}"),
        None => Ok(()),
    }
}

impl<'w> ReadyRenderer<'w> {
    fn new(window: &'w Window, gpu: Gpu<'w>) -> anyhow::Result<Self> {
        let PhotoPipelines {
            frame_layout,
            photo_layout,
            sampler,
            pipelines,
        } = PhotoPipelines::new(gpu.device(), gpu.surface_format())?;
        let max_buffer_size = gpu.device().limits().max_buffer_size;

        Ok(Self {
            window,
            gpu,
            frame_layout,
            photo_layout,
            sampler,
            pipelines,
            max_buffer_size,
            photo: None,
        })
    }

    fn install_photo(&mut self, texture: PhotoTexture) -> (u32, u32) {
        let bind_group = self.gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("photo3d photo bind group"),
            layout: &self.photo_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let size = (texture.width(), texture.height());
        log::info!("photo loaded: {}x{}", size.0, size.1);
        self.photo = Some(BoundPhoto {
            texture,
            bind_group,
        });
        size
    }

    fn render(&mut self, settings: RenderSettings, camera: &CameraState) -> FrameOutcome {
        let Some(photo) = self.photo.as_ref() else {
            return FrameOutcome::Skipped(SkipReason::NoImage);
        };

        let viewport = self.gpu.viewport();
        if !viewport.is_valid() {
            return FrameOutcome::Skipped(SkipReason::ZeroSizedViewport);
        }

        let (width, height) = photo.texture.size_f32();
        let dims = GridDims::new(width, height, settings.step);
        if !dims.fits_buffer_limit(settings.mode, self.max_buffer_size) {
            let (vertex, index) = dims.buffer_sizes(settings.mode);
            log::warn!(
                "{} mesh for {width}x{height} at step {} needs {vertex}+{index} bytes, \
                 device limit is {} per buffer; raise the step",
                settings.mode,
                dims.step,
                self.max_buffer_size
            );
            return FrameOutcome::Skipped(SkipReason::MeshTooLarge);
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => FrameOutcome::Fatal,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        FrameOutcome::Skipped(SkipReason::SurfaceUnavailable)
                    }
                };
            }
        };

        let plan = FramePlan::build((width, height), settings, camera, viewport);
        let draw = plan.draw_call();
        let buffers = FrameBuffers::upload(self.gpu.device(), &self.frame_layout, &plan);

        log::trace!(
            "frame: mode={} vertices={} indices={} fov={:.1}",
            settings.mode,
            plan.mesh.vertex_count(),
            plan.mesh.index_count(),
            camera.field_of_view_deg()
        );

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("photo3d photo pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(self.pipelines.get(settings.mode));
            rpass.set_bind_group(0, &buffers.bind_group, &[]);
            rpass.set_bind_group(1, &photo.bind_group, &[]);
            rpass.set_vertex_buffer(0, buffers.vertices.slice(..));

            match (draw, buffers.indices.as_ref()) {
                (DrawCall::Indexed { index_count }, Some(ibo)) => {
                    rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..index_count, 0, 0..1);
                }
                (DrawCall::NonIndexed { vertex_count }, _) => {
                    rpass.draw(0..vertex_count, 0..1);
                }
                _ => {}
            }
        }

        self.window.pre_present_notify();
        self.gpu.submit(frame);

        FrameOutcome::Presented
    }
}

/// GPU buffers for a single frame. Dropped once the frame is submitted.
struct FrameBuffers {
    vertices: wgpu::Buffer,
    indices: Option<wgpu::Buffer>,
    bind_group: wgpu::BindGroup,
}

impl FrameBuffers {
    fn upload(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, plan: &FramePlan) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("photo3d grid vbo"),
            contents: bytemuck::cast_slice::<GridVertex, u8>(&plan.mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let indices = plan
            .mesh
            .indices
            .as_ref()
            .filter(|i| !i.is_empty())
            .map(|i| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("photo3d grid ibo"),
                    contents: bytemuck::cast_slice(i),
                    usage: wgpu::BufferUsages::INDEX,
                })
            });

        let t = &plan.transforms;
        let model = uniform_buffer(device, "photo3d model ubo", &MatrixUniform::from(t.model));
        let view = uniform_buffer(device, "photo3d view ubo", &MatrixUniform::from(t.view));
        let projection = uniform_buffer(
            device,
            "photo3d projection ubo",
            &MatrixUniform::from(t.projection),
        );
        let points = uniform_buffer(device, "photo3d points ubo", &plan.mesh.uniforms);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("photo3d frame bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: model.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: view.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: projection.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: points.as_entire_binding(),
                },
            ],
        });

        Self {
            vertices,
            indices,
            bind_group,
        }
    }
}

fn uniform_buffer<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, value: &T) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(value),
        usage: wgpu::BufferUsages::UNIFORM,
    })
}

fn uniform_entry(binding: u32, size: usize) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(size as u64),
        },
        count: None,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    mode: PrimitiveMode,
) -> wgpu::RenderPipeline {
    let (label, fs_entry) = match mode {
        PrimitiveMode::Triangles => ("photo3d triangles pipeline", "fs_surface"),
        PrimitiveMode::Points => ("photo3d points pipeline", "fs_sparse"),
        PrimitiveMode::Lines => ("photo3d lines pipeline", "fs_sparse"),
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[GridVertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: mode.topology(),
            strip_index_format: None,
            front_face: wgpu::FrontFace::Cw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninitialized_renderer_is_a_no_op() {
        let mut renderer = PhotoRenderer::uninitialized();
        let camera = CameraState::new(0.3, 0.1, 75.0);

        for mode in PrimitiveMode::ALL {
            let settings = RenderSettings {
                mode,
                ..Default::default()
            };
            assert_eq!(
                renderer.render_frame(settings, &camera),
                FrameOutcome::Skipped(SkipReason::Uninitialized)
            );
        }
        assert_eq!(camera, CameraState::new(0.3, 0.1, 75.0));
        assert!(!renderer.is_ready());
        assert_eq!(renderer.image_size(), None);
    }

    #[test]
    fn uninitialized_renderer_rejects_image_loads() {
        let mut renderer = PhotoRenderer::uninitialized();
        let err = renderer.load_image_bytes(&[0u8; 4], ColorSpace::Linear).unwrap_err();
        assert!(matches!(err, TextureError::Unavailable));
        renderer.resize(PhysicalSize::new(10, 10));
    }

    #[test]
    fn validation_errors_become_setup_errors() {
        assert!(validation_result::<String>(None).is_ok());
        let err = validation_result(Some("entry point `vs_main` not found")).unwrap_err();
        assert!(err.to_string().contains("vs_main"));
    }

    /// A device without a window, or `None` on machines with no adapter at all.
    fn headless_device() -> Option<wgpu::Device> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok()?;
        let (device, _queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("photo3d test device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .ok()?;
        Some(device)
    }

    #[test]
    fn photo_shader_builds_every_pipeline() {
        let Some(device) = headless_device() else {
            return;
        };
        if let Err(e) = PhotoPipelines::new(&device, wgpu::TextureFormat::Rgba8Unorm) {
            panic!("photo pipelines failed to build: {e:#}");
        }
    }

    #[test]
    fn broken_shader_is_reported_instead_of_panicking() {
        let Some(device) = headless_device() else {
            return;
        };
        let broken = "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return oops; }";
        let built = PhotoPipelines::with_source(&device, wgpu::TextureFormat::Rgba8Unorm, broken);
        assert!(built.is_err());
    }
}
