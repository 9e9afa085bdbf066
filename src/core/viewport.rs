use glam::{Mat4, Vec3};

use super::constants::MAX_PIXEL_RATIO;

/// Host window size in CSS pixels plus the device pixel ratio it reports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub css_width: f64,
    pub css_height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            css_width,
            css_height,
            device_pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f32 {
        (self.css_width / self.css_height.max(1.0)) as f32
    }

    /// Device pixel ratio capped to bound GPU cost.
    pub fn pixel_ratio(&self) -> f64 {
        let dpr = if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        };
        dpr.min(MAX_PIXEL_RATIO)
    }

    /// Backing-store size in physical pixels, never zero.
    pub fn backing_size(&self) -> (u32, u32) {
        let pr = self.pixel_ratio();
        let w = (self.css_width.max(0.0) * pr).floor() as u32;
        let h = (self.css_height.max(0.0) * pr).floor() as u32;
        (w.max(1), h.max(1))
    }
}

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn perspective(fovy_degrees: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: fovy_degrees.to_radians(),
            znear,
            zfar,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn apply_viewport(&mut self, viewport: &Viewport) {
        self.aspect = viewport.aspect();
    }

    /// Unit forward vector, used to orient the audio listener.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }
}
