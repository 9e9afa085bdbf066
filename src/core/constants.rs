// Shared geometry/animation tuning constants used by the pure core and the web frontend.

// Ring layout
pub const MIN_RADIUS: f32 = 0.15; // innermost ring, also the model's fitted radius
pub const MAX_RADIUS: f32 = 0.5;

// Particle density is an exponent: particles per ring and analyser window are 2^density
pub const MIN_PARTICLE_DENSITY: u32 = 5;
pub const MAX_PARTICLE_DENSITY: u32 = 15;

// Ring drift: angular speed of ring `i` is time * (i * STEP + BASE) radians
pub const RING_ROTATION_BASE: f32 = 0.5;
pub const RING_ROTATION_STEP: f32 = 0.06;

// Sprite shading
pub const SPRITE_RADIUS: f32 = 0.5; // in sprite-coordinate units, fragments beyond are discarded
pub const FALLOFF_START: f32 = 0.7;
pub const FALLOFF_END: f32 = 1.0;

// Decorative model placement
pub const MODEL_TARGET_RADIUS: f32 = 0.15;
pub const MODEL_LIFT: f32 = 0.05;
// Applied once per update call, not scaled by elapsed time.
pub const MODEL_SPIN_PER_FRAME: f32 = 0.05;

// Byte magnitudes from the analyser
pub const MAGNITUDE_MAX: f32 = 255.0;

// Renderer pixel ratio cap
pub const MAX_PIXEL_RATIO: f64 = 2.0;
