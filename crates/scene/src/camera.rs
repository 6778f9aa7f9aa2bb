use glam::{Mat4, Vec3};

/// Perspective camera looking at a target point.
///
/// The projection matrix is cached: after changing `fov`, `aspect`, `near`
/// or `far` call [`PerspectiveCamera::update_projection_matrix`].
/// [`PerspectiveCamera::resize`] does both for the aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection: Mat4,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(60.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl PerspectiveCamera {
    pub const STAGE_POSITION: Vec3 = Vec3::new(30.0, 30.0, 30.0);

    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov,
            aspect,
            near,
            far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// The stage camera: 60° fov, aspect from the viewport, clip 0.1..1000,
    /// at (30, 30, 30) looking at the origin.
    ///
    /// A zero-area viewport keeps the default 16:9 aspect, same as
    /// [`PerspectiveCamera::resize`].
    pub fn for_viewport(width: u32, height: u32) -> Self {
        let mut camera = Self::default();
        camera.resize(width, height);
        camera.position = Self::STAGE_POSITION;
        camera.look_at(Vec3::ZERO);
        camera
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Recompute the aspect ratio for a new viewport size.
    ///
    /// Returns `false` and leaves the camera untouched for a zero-area
    /// viewport (a minimized window).
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.aspect = width as f32 / height as f32;
        self.update_projection_matrix();
        true
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// Unit vector from the camera toward its target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or_zero()
    }

    /// Camera-space up, orthogonal to `forward` and `right`.
    pub fn screen_up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_area_viewport_keeps_default_aspect() {
        for (w, h) in [(0, 0), (800, 0), (0, 600)] {
            let cam = PerspectiveCamera::for_viewport(w, h);
            assert_eq!(cam.aspect, 16.0 / 9.0, "{w}x{h}");
            assert!(cam.view_projection().is_finite(), "{w}x{h}");
            assert_eq!(cam.position, Vec3::new(30.0, 30.0, 30.0));
        }
    }

    #[test]
    fn stage_camera_parameters() {
        let cam = PerspectiveCamera::for_viewport(800, 600);
        assert_eq!(cam.fov, 60.0);
        assert_eq!(cam.near, 0.1);
        assert_eq!(cam.far, 1000.0);
        assert_eq!(cam.position, Vec3::new(30.0, 30.0, 30.0));
        assert_eq!(cam.target, Vec3::ZERO);
        assert_eq!(cam.aspect, 800.0 / 600.0);
    }

    #[test]
    fn resize_recomputes_aspect_and_projection() {
        let mut cam = PerspectiveCamera::for_viewport(800, 600);
        assert!((cam.aspect - 1.333_333_3).abs() < 1e-6);
        let before = cam.projection_matrix();

        assert!(cam.resize(1000, 500));
        assert_eq!(cam.aspect, 2.0);
        assert_ne!(cam.projection_matrix(), before);
        assert_eq!(
            cam.projection_matrix(),
            Mat4::perspective_rh(60.0_f32.to_radians(), 2.0, 0.1, 1000.0)
        );
    }

    #[test]
    fn resize_ignores_zero_area() {
        let mut cam = PerspectiveCamera::for_viewport(800, 600);
        let before = cam.clone();
        assert!(!cam.resize(0, 600));
        assert!(!cam.resize(800, 0));
        assert_eq!(cam, before);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = PerspectiveCamera::for_viewport(800, 600);
        let clip = cam.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn basis_is_orthonormal() {
        let cam = PerspectiveCamera::for_viewport(800, 600);
        let (f, r, u) = (cam.forward(), cam.right(), cam.screen_up());
        assert!(f.dot(r).abs() < 1e-6);
        assert!(f.dot(u).abs() < 1e-6);
        assert!((u.length() - 1.0).abs() < 1e-5);
        assert!(u.y > 0.0);
    }
}
