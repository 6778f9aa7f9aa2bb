use crate::action::OrbitAction;
use glam::Vec3;
use rolestage_scene::PerspectiveCamera;
use std::f32::consts::{PI, TAU};

/// Fraction of the pending motion applied per update. Higher settles slower.
pub const DAMPING_FACTOR: f32 = 0.25;

/// Keeps the polar angle off the poles so `look_at` stays well defined.
const POLE_EPSILON: f32 = 1e-6;
/// Squared position change below which the camera counts as still.
const MOTION_EPSILON: f32 = 1e-6;

/// Spherical coordinates around +Y: `phi` from the pole, `theta` about Y
/// measured from +Z toward +X.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let s = self.phi.sin() * self.radius;
        Vec3::new(s * self.theta.sin(), self.phi.cos() * self.radius, s * self.theta.cos())
    }
}

/// Orbit controls: drag to orbit, wheel to dolly, secondary drag to pan.
///
/// Input only accumulates pending motion; [`OrbitControls::update`] applies
/// it to the camera. With damping enabled each update applies
/// `DAMPING_FACTOR` of what is pending and keeps the rest, so motion eases
/// out over the following frames.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enabled: bool,
    pub enable_damping: bool,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    damping_factor: f32,
    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,
    scale: f32,
}

impl OrbitControls {
    /// Controls orbiting `camera` around its current look-at target.
    pub fn new(camera: &PerspectiveCamera) -> Self {
        Self {
            target: camera.target,
            enabled: true,
            enable_damping: true,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            damping_factor: DAMPING_FACTOR,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }

    pub fn damping_factor(&self) -> f32 {
        self.damping_factor
    }

    /// Pending (theta, phi) rotation not yet applied to the camera.
    pub fn pending_rotation(&self) -> (f32, f32) {
        (self.delta_theta, self.delta_phi)
    }

    pub fn pending_pan(&self) -> Vec3 {
        self.pan_offset
    }

    /// Queue a gesture. `viewport_height` is in the same pixels as the deltas.
    pub fn handle(&mut self, action: OrbitAction, camera: &PerspectiveCamera, viewport_height: u32) {
        if !self.enabled {
            return;
        }
        let height = viewport_height.max(1) as f32;
        match action {
            OrbitAction::Rotate { dx, dy } => {
                self.rotate_left(TAU * dx * self.rotate_speed / height);
                self.rotate_up(TAU * dy * self.rotate_speed / height);
            }
            OrbitAction::Pan { dx, dy } => {
                // Scale so the target moves with the cursor at target depth.
                let half_fov = (camera.fov.to_radians() / 2.0).tan();
                let target_distance = (camera.position - self.target).length() * half_fov;
                let world_per_pixel = 2.0 * target_distance / height * self.pan_speed;
                self.pan_offset -= camera.right() * dx * world_per_pixel;
                self.pan_offset += camera.screen_up() * dy * world_per_pixel;
            }
            OrbitAction::Zoom(steps) => {
                self.scale *= 0.95_f32.powf(steps * self.zoom_speed);
            }
        }
    }

    fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Apply pending motion to `camera`. Returns `true` if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let last_position = camera.position;
        let last_target = self.target;

        let mut spherical = Spherical::from_offset(camera.position - self.target);

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        spherical.theta += self.delta_theta * step;
        spherical.phi += self.delta_phi * step;
        spherical.phi = spherical.phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset * step;

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if self.enable_damping {
            let keep = 1.0 - self.damping_factor;
            self.delta_theta *= keep;
            self.delta_phi *= keep;
            self.pan_offset *= keep;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        let moved = last_position.distance_squared(camera.position) > MOTION_EPSILON
            || last_target.distance_squared(self.target) > MOTION_EPSILON;
        if moved {
            tracing::trace!(
                "orbit: camera at ({:.2}, {:.2}, {:.2})",
                camera.position.x,
                camera.position.y,
                camera.position.z
            );
        }
        moved
    }
}
