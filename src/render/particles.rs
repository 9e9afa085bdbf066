use super::helpers::{create_uniform_buffer, depth_state, sampler_entry, storage_entry, texture_entry, uniform_entry};
use super::textures::MatcapTexture;
use crate::core::{ParticleField, ParticleProgram, Release};
use glam::Mat4;
use wgpu;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ParticleUniforms {
    pub(crate) model_view: [[f32; 4]; 4],
    pub(crate) projection: [[f32; 4]; 4],
    pub(crate) resolution: [f32; 2],
    pub(crate) time: f32,
    pub(crate) _pad: f32,
}

pub(crate) fn create_particle_layout(device: &wgpu::Device) -> (wgpu::BindGroupLayout, wgpu::PipelineLayout) {
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("particles_bgl"),
        entries: &[
            uniform_entry(0, wgpu::ShaderStages::VERTEX),
            storage_entry(1, wgpu::ShaderStages::VERTEX),
            texture_entry(2),
            sampler_entry(3),
        ],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("particles_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });
    (bgl, pl)
}

/// Build the pipeline for one specialised particle program.
pub(crate) fn create_particle_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    program: &ParticleProgram,
    color_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let c = program.constants();
    let label = format!("particles_{}x{}", c.number_of_rings, c.particles_per_ring);
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source: wgpu::ShaderSource::Wgsl(program.source().into()),
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_particle"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![0 => Float32x3],
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(depth_state(false)),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_particle"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

/// GPU side of one stem's particle rings: rest positions, the byte history
/// mirrored every frame, and a bind group pointing at the stem's matcap.
pub struct ParticleGpu {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    history_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_count: u32,
    matcap_bound: bool,
}

impl ParticleGpu {
    pub(crate) fn new(
        device: &wgpu::Device,
        bgl: &wgpu::BindGroupLayout,
        pipeline: wgpu::RenderPipeline,
        field: &ParticleField,
        matcap: &MatcapTexture,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particles_positions"),
            contents: bytemuck::cast_slice(field.positions()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uniform_buffer =
            create_uniform_buffer(device, "particles_uniforms", std::mem::size_of::<ParticleUniforms>());
        let history_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particles_history"),
            contents: field.history().as_slice(),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = Self::bind(device, bgl, &uniform_buffer, &history_buffer, matcap, sampler);
        Self {
            pipeline,
            vertex_buffer,
            uniform_buffer,
            history_buffer,
            bind_group,
            instance_count: field.vertex_count() as u32,
            matcap_bound: false,
        }
    }

    fn bind(
        device: &wgpu::Device,
        bgl: &wgpu::BindGroupLayout,
        uniforms: &wgpu::Buffer,
        history: &wgpu::Buffer,
        matcap: &MatcapTexture,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("particles_bg"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: history.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&matcap.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    /// Swap the placeholder for the stem's own matcap. Only rebinds once.
    pub(crate) fn bind_matcap(
        &mut self,
        device: &wgpu::Device,
        bgl: &wgpu::BindGroupLayout,
        matcap: &MatcapTexture,
        sampler: &wgpu::Sampler,
    ) {
        if self.matcap_bound {
            return;
        }
        self.bind_group = Self::bind(device, bgl, &self.uniform_buffer, &self.history_buffer, matcap, sampler);
        self.matcap_bound = true;
    }

    pub(crate) fn write_frame(
        &self,
        queue: &wgpu::Queue,
        model_view: Mat4,
        projection: Mat4,
        resolution: [f32; 2],
        field: &ParticleField,
    ) {
        let u = ParticleUniforms {
            model_view: model_view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            resolution,
            time: field.time(),
            _pad: 0.0,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&u));
        queue.write_buffer(&self.history_buffer, 0, field.history().as_slice());
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..6, 0..self.instance_count);
    }
}

impl Release for ParticleGpu {
    fn release(self) {
        self.vertex_buffer.destroy();
        self.uniform_buffer.destroy();
        self.history_buffer.destroy();
    }
}
