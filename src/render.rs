use crate::constants::CLEAR_COLOR;
use crate::core::{Camera, MeshData, ParticleField, Release, Stem};
use crate::scene::WebPlatform;
use web_sys as web;

mod helpers;
mod mesh;
mod particles;
mod textures;

pub use mesh::MeshGpu;
pub use particles::ParticleGpu;
pub use textures::MatcapTexture;

use crate::core::ProgramCache;
use mesh::{create_mesh_pipeline, MeshPipeline};
use particles::{create_particle_layout, create_particle_pipeline};

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    // Bound wherever a stem's matcap has not arrived yet
    placeholder: MatcapTexture,

    particle_bgl: wgpu::BindGroupLayout,
    particle_layout: wgpu::PipelineLayout,
    particle_pipelines: ProgramCache<wgpu::RenderPipeline>,
    mesh: MeshPipeline,

    clear_color: wgpu::Color,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let (depth_tex, depth_view) = helpers::create_depth_texture(&device, width, height);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("matcap_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let placeholder = MatcapTexture::placeholder(&device, &queue);
        let (particle_bgl, particle_layout) = create_particle_layout(&device);
        let mesh = create_mesh_pipeline(&device, format);

        let [r, g, b, a] = CLEAR_COLOR;
        log::info!("[gpu] surface {}x{} format {:?}", width, height, format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_tex,
            depth_view,
            sampler,
            placeholder,
            particle_bgl,
            particle_layout,
            particle_pipelines: ProgramCache::default(),
            mesh,
            clear_color: wgpu::Color { r, g, b, a },
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.config.width || height != self.config.height {
            self.config.width = width;
            self.config.height = height;
            self.reconfigure();
        }
    }

    /// Re-apply the surface configuration, e.g. after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_tex.destroy();
        let (tex, view) = helpers::create_depth_texture(&self.device, self.config.width, self.config.height);
        self.depth_tex = tex;
        self.depth_view = view;
    }

    pub fn create_matcap(&self, label: &str, img: &image::RgbaImage) -> MatcapTexture {
        MatcapTexture::from_rgba(
            &self.device,
            &self.queue,
            label,
            img.width(),
            img.height(),
            img.as_raw(),
        )
    }

    /// Upload a stem's particle rings, reusing the pipeline of any earlier
    /// stem with the same baked constants.
    pub fn create_particles(&mut self, field: &ParticleField) -> ParticleGpu {
        let device = &self.device;
        let layout = &self.particle_layout;
        let format = self.config.format;
        let pipeline = self
            .particle_pipelines
            .get_or_build(field.constants(), |program| {
                create_particle_pipeline(device, layout, program, format)
            })
            .clone();
        ParticleGpu::new(
            &self.device,
            &self.particle_bgl,
            pipeline,
            field,
            &self.placeholder,
            &self.sampler,
        )
    }

    pub fn create_mesh(&self, data: &MeshData) -> MeshGpu {
        MeshGpu::new(&self.device, &self.mesh.bgl, data, &self.placeholder, &self.sampler)
    }

    pub fn pipeline_builds(&self) -> usize {
        self.particle_pipelines.builds()
    }

    pub fn render(&mut self, camera: &Camera, stems: &mut [Stem<WebPlatform>]) -> Result<(), wgpu::SurfaceError> {
        let view_m = camera.view_matrix();
        let proj = camera.projection_matrix();
        let resolution = [self.config.width as f32, self.config.height as f32];

        for stem in stems.iter_mut().filter(|s| !s.is_disposed()) {
            let parts = stem.parts_mut();
            if let Some(p) = parts.particles {
                if let Some(tex) = parts.texture {
                    p.bind_matcap(&self.device, &self.particle_bgl, tex, &self.sampler);
                }
                p.write_frame(&self.queue, view_m * parts.group, proj, resolution, parts.field);
            }
            if let (Some(m), Some(model)) = (parts.mesh, parts.model) {
                if let Some(tex) = parts.texture {
                    m.bind_matcap(&self.device, &self.mesh.bgl, tex, &self.sampler);
                }
                m.write_frame(&self.queue, view_m * model, proj);
            }
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Opaque models first so the blended sprites depth-test against them
            rpass.set_pipeline(&self.mesh.pipeline);
            for stem in stems.iter().filter(|s| s.model_matrix().is_some()) {
                if let Some(m) = stem.mesh() {
                    m.draw(&mut rpass);
                }
            }
            for stem in stems.iter() {
                if let Some(p) = stem.particles() {
                    p.draw(&mut rpass);
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Tear down GPU objects owned by the renderer itself. Per-stem resources
    /// are released by their stems.
    pub fn dispose(self) {
        let Self {
            device,
            depth_tex,
            placeholder,
            mut particle_pipelines,
            ..
        } = self;
        log::debug!("[gpu] dropping {} particle pipelines", particle_pipelines.len());
        particle_pipelines.clear();
        placeholder.release();
        depth_tex.destroy();
        device.destroy();
    }
}
