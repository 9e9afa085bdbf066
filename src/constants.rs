// Camera, renderer and interaction tuning for the web frontend.
// Geometry and animation constants live in `core/constants.rs`.

// Camera
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.001;
pub const CAMERA_FAR: f32 = 10.0;
pub const CAMERA_Z: f32 = 1.0; // initial eye distance along +Z

// Orbit controls
pub const ORBIT_ROTATE_SPEED: f32 = 1.0;
pub const ORBIT_ZOOM_STEP: f32 = 0.95; // radius multiplier per wheel notch towards the target
pub const ORBIT_MIN_DISTANCE: f32 = 0.1;
pub const ORBIT_MAX_DISTANCE: f32 = 5.0;

// Renderer
pub const CLEAR_COLOR: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

// Positional audio
pub const PANNER_REF_DISTANCE: f32 = 1.0;
pub const PANNER_MAX_DISTANCE: f32 = 10_000.0;
pub const PANNER_ROLLOFF: f32 = 1.0;
pub const STEM_GAIN: f32 = 1.0;
