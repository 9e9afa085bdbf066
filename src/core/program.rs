use super::layout::RingParticleLayout;

/// Values baked into the particle program. They size arrays and drive index
/// arithmetic in the vertex stage, so any change needs a new program.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgramConstants {
    pub particles_per_ring: u32,
    pub number_of_rings: u32,
    pub point_size: f32,
    pub amplitude: f32,
}

impl ProgramConstants {
    pub fn new(layout: &RingParticleLayout, amplitude: f32) -> Self {
        Self {
            particles_per_ring: layout.particles_per_ring(),
            number_of_rings: layout.number_of_rings(),
            point_size: layout.point_size(),
            amplitude,
        }
    }

    pub fn history_len(&self) -> u32 {
        self.number_of_rings * self.particles_per_ring / 2
    }
}

/// WGSL source for one set of constants.
#[derive(Clone, Debug)]
pub struct ParticleProgram {
    constants: ProgramConstants,
    source: String,
}

impl ParticleProgram {
    pub fn compile(constants: ProgramConstants) -> Self {
        let source = PARTICLES_WGSL
            .replace("{{PARTICLES_PER_RING}}", &constants.particles_per_ring.to_string())
            .replace("{{HALF_RING}}", &(constants.particles_per_ring / 2).to_string())
            .replace("{{NUMBER_OF_RINGS}}", &constants.number_of_rings.to_string())
            .replace("{{HISTORY_LEN}}", &constants.history_len().to_string())
            .replace("{{POINT_SIZE}}", &wgsl_float(constants.point_size))
            .replace("{{AMPLITUDE}}", &wgsl_float(constants.amplitude));
        Self { constants, source }
    }

    #[inline]
    pub fn constants(&self) -> &ProgramConstants {
        &self.constants
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_compatible(&self, constants: &ProgramConstants) -> bool {
        self.constants == *constants
    }
}

/// Compiled artifacts keyed by the constants they were built from.
///
/// Stems with identical layouts share one entry; a layout change misses the
/// cache and triggers a fresh build.
pub struct ProgramCache<T> {
    entries: Vec<(ParticleProgram, T)>,
    builds: usize,
}

impl<T> Default for ProgramCache<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            builds: 0,
        }
    }
}

impl<T> ProgramCache<T> {
    pub fn get_or_build(
        &mut self,
        constants: ProgramConstants,
        build: impl FnOnce(&ParticleProgram) -> T,
    ) -> &T {
        let index = match self
            .entries
            .iter()
            .position(|(program, _)| program.is_compatible(&constants))
        {
            Some(i) => i,
            None => {
                let program = ParticleProgram::compile(constants);
                let artifact = build(&program);
                self.builds += 1;
                log::debug!(
                    "[program] built particle program ppr={} rings={} (total builds {})",
                    constants.particles_per_ring,
                    constants.number_of_rings,
                    self.builds
                );
                self.entries.push((program, artifact));
                self.entries.len() - 1
            }
        };
        &self.entries[index].1
    }

    pub fn builds(&self) -> usize {
        self.builds
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// `{:?}` keeps a decimal point or exponent, which WGSL needs for an f32 literal.
fn wgsl_float(v: f32) -> String {
    format!("{v:?}")
}

/// Particle program template. Placeholders in double braces are substituted by
/// `ParticleProgram::compile`.
pub const PARTICLES_WGSL: &str = r#"
const PARTICLES_PER_RING: u32 = {{PARTICLES_PER_RING}}u;
const HALF_RING: i32 = {{HALF_RING}};
const NUMBER_OF_RINGS: u32 = {{NUMBER_OF_RINGS}}u;
const HISTORY_LEN: u32 = {{HISTORY_LEN}}u;
const POINT_SIZE: f32 = {{POINT_SIZE}};
const AMPLITUDE: f32 = {{AMPLITUDE}};

struct Uniforms {
    model_view: mat4x4<f32>,
    projection: mat4x4<f32>,
    resolution: vec2<f32>,
    time: f32,
    _pad: f32,
};

@group(0) @binding(0) var<uniform> u: Uniforms;
// Byte magnitudes packed four per word, little endian.
@group(0) @binding(1) var<storage, read> history: array<u32>;
@group(0) @binding(2) var matcap_tex: texture_2d<f32>;
@group(0) @binding(3) var matcap_sampler: sampler;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) corner: vec2<f32>,
    @location(1) distance: f32,
};

fn magnitude(slot: u32) -> f32 {
    let i = min(slot, HISTORY_LEN - 1u);
    let word = history[i / 4u];
    return f32((word >> ((i % 4u) * 8u)) & 0xffu);
}

// Same as GLSL mat2(c, -s, s, c) * v.
fn rotate(v: vec2<f32>, a: f32) -> vec2<f32> {
    let s = sin(a);
    let c = cos(a);
    return vec2<f32>(c * v.x + s * v.y, -s * v.x + c * v.y);
}

@vertex
fn vs_particle(
    @builtin(vertex_index) corner_index: u32,
    @builtin(instance_index) vertex_id: u32,
    @location(0) position: vec3<f32>,
) -> VsOut {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
    );
    let ring = i32(vertex_id / PARTICLES_PER_RING);
    let particle = i32(vertex_id % PARTICLES_PER_RING);

    var out: VsOut;
    out.distance = length(position.xz);

    var p = position;
    let slot = ring * HALF_RING + particle - max(0, 2 * (particle - HALF_RING) + 1);
    p.y = AMPLITUDE * magnitude(u32(slot)) / 255.0;
    let xz = rotate(p.xz, u.time * (f32(ring) * 0.06 + 0.5));
    p = vec3<f32>(xz.x, p.y, xz.y);

    let view = u.model_view * vec4<f32>(p, 1.0);
    var clip = u.projection * view;
    let size_px = POINT_SIZE / -view.z;
    let corner = corners[corner_index];
    let offset = corner * size_px / max(u.resolution, vec2<f32>(1.0, 1.0)) * clip.w;
    clip = vec4<f32>(clip.xy + offset, clip.zw);

    out.clip = clip;
    out.corner = corner;
    return out;
}

@fragment
fn fs_particle(in: VsOut) -> @location(0) vec4<f32> {
    // Sprite coordinate with the origin top-left, as a point sprite would see it.
    let coord = vec2<f32>(in.corner.x * 0.5 + 0.5, 0.5 - in.corner.y * 0.5);
    let color = textureSample(matcap_tex, matcap_sampler, coord).rgb;
    if (distance(coord, vec2<f32>(0.5, 0.5)) > 0.5) {
        discard;
    }
    let alpha = 1.0 - smoothstep(0.7, 1.0, 2.0 * in.distance);
    return vec4<f32>(color, alpha);
}
"#;
