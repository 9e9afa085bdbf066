use glam::Vec3;

/// Minimum polar angle so the camera never flips over the pole.
const POLE_EPSILON: f32 = 1.0e-6;

/// Orbit-style camera controller: drag to orbit around a target, wheel to dolly.
///
/// Spherical coordinates follow the usual convention: `theta` is the azimuth
/// around +Y measured from +Z, `phi` the polar angle from +Y.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    target: Vec3,
    radius: f32,
    theta: f32,
    phi: f32,
    min_distance: f32,
    max_distance: f32,
    rotate_speed: f32,
    zoom_step: f32,
    pub enabled: bool,
}

impl OrbitControls {
    pub fn new(eye: Vec3, target: Vec3, min_distance: f32, max_distance: f32) -> Self {
        let offset = eye - target;
        let radius = offset.length().max(POLE_EPSILON);
        let theta = offset.x.atan2(offset.z);
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        Self {
            target,
            radius: radius.clamp(min_distance, max_distance),
            theta,
            phi,
            min_distance,
            max_distance,
            rotate_speed: 1.0,
            zoom_step: 0.95,
            enabled: true,
        }
    }

    pub fn with_speeds(mut self, rotate_speed: f32, zoom_step: f32) -> Self {
        self.rotate_speed = rotate_speed;
        self.zoom_step = zoom_step;
        self
    }

    /// Orbit by a pointer drag of `dx, dy` pixels on an element `height_px` tall.
    /// A drag across the full height turns one full revolution.
    pub fn rotate(&mut self, dx: f32, dy: f32, height_px: f32) {
        if !self.enabled {
            return;
        }
        let h = height_px.max(1.0);
        let tau = std::f32::consts::TAU;
        self.theta -= tau * dx / h * self.rotate_speed;
        self.phi = (self.phi - tau * dy / h * self.rotate_speed)
            .clamp(POLE_EPSILON, std::f32::consts::PI - POLE_EPSILON);
    }

    /// Dolly from a wheel delta; negative deltas move closer.
    pub fn zoom(&mut self, wheel_delta_y: f32) {
        if !self.enabled || wheel_delta_y == 0.0 {
            return;
        }
        let factor = if wheel_delta_y < 0.0 {
            self.zoom_step
        } else {
            1.0 / self.zoom_step
        };
        self.radius = (self.radius * factor).clamp(self.min_distance, self.max_distance);
    }

    pub fn eye(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + self.radius
                * Vec3::new(
                    sin_phi * self.theta.sin(),
                    self.phi.cos(),
                    sin_phi * self.theta.cos(),
                )
    }

    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }
}
