use rolestage_common::{ViewerConfig, WindowConfig};
use rolestage_input::{OrbitAction, OrbitControls, PointerTracker};
use rolestage_render::{extract, RenderList};
use rolestage_scene::{assemble_scene, PerspectiveCamera, Scene, SceneOptions};
use rolestage_tools::FrameStats;
use std::time::Instant;

/// Everything the frame loop touches, built once at startup.
///
/// The scene and its render list never change after construction; only the
/// camera, the controls and the stats move from frame to frame.
pub struct StageContext {
    pub scene: Scene,
    pub render_list: RenderList,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub stats: FrameStats,
    pub pointer: PointerTracker,
    viewport: (u32, u32),
}

impl StageContext {
    /// `width` and `height` are the window's inner size. A zero-area size (a
    /// window created minimized) falls back to the configured window size.
    pub fn new(config: &ViewerConfig, width: u32, height: u32, now: Instant) -> Self {
        let fallback = WindowConfig::default();
        let viewport = [
            (width, height),
            (config.window.width, config.window.height),
            (fallback.width, fallback.height),
        ]
        .into_iter()
        .find(|&(w, h)| w > 0 && h > 0)
        .unwrap_or((fallback.width, fallback.height));

        let scene = assemble_scene(&SceneOptions {
            shadows: config.shadows,
        });
        let render_list = extract(&scene);
        let camera = PerspectiveCamera::for_viewport(viewport.0, viewport.1);
        let controls = OrbitControls::new(&camera);

        tracing::info!(
            "stage ready: {} nodes, {} meshes, shadows {}",
            scene.node_count(),
            render_list.meshes.len(),
            if config.shadows { "on" } else { "off" }
        );

        Self {
            scene,
            render_list,
            camera,
            controls,
            stats: FrameStats::new(now),
            pointer: PointerTracker::new(),
            viewport,
        }
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Track a new viewport size. Zero-area sizes are ignored and return `false`.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.camera.resize(width, height) {
            return false;
        }
        self.viewport = (width, height);
        tracing::debug!("viewport {width}x{height}, aspect {:.3}", self.camera.aspect);
        true
    }

    pub fn apply(&mut self, action: OrbitAction) {
        self.controls.handle(action, &self.camera, self.viewport.1);
    }

    /// Per-frame update: controls first, then stats. Returns whether the camera moved.
    pub fn step(&mut self, now: Instant) -> bool {
        let moved = self.controls.update(&mut self.camera);
        self.stats.update(now);
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::time::Duration;

    fn stage() -> StageContext {
        StageContext::new(&ViewerConfig::default(), 800, 600, Instant::now())
    }

    #[test]
    fn resize_updates_aspect_exactly() {
        let mut stage = stage();
        assert_eq!(stage.camera.aspect, 800.0 / 600.0);
        assert!(stage.resize(1000, 500));
        assert_eq!(stage.camera.aspect, 2.0);
        assert_eq!(stage.viewport(), (1000, 500));
    }

    #[test]
    fn minimized_start_uses_configured_size() {
        let stage = StageContext::new(&ViewerConfig::default(), 0, 0, Instant::now());
        assert_eq!(stage.viewport(), (1280, 720));
        assert_eq!(stage.camera.aspect, 1280.0 / 720.0);
        assert!(stage.camera.view_projection().is_finite());

        let mut config = ViewerConfig::default();
        config.window.height = 0;
        let mut stage = StageContext::new(&config, 800, 0, Instant::now());
        assert_eq!(stage.viewport(), (1280, 720));
        assert!(stage.camera.view_projection().is_finite());
        assert!(stage.resize(800, 600));
        assert_eq!(stage.camera.aspect, 800.0 / 600.0);
    }

    #[test]
    fn minimized_window_is_ignored() {
        let mut stage = stage();
        assert!(!stage.resize(0, 0));
        assert!(!stage.resize(640, 0));
        assert_eq!(stage.viewport(), (800, 600));
        assert_eq!(stage.camera.aspect, 800.0 / 600.0);
    }

    #[test]
    fn head_stays_put_across_ticks() {
        let mut stage = stage();
        let start = Instant::now();
        stage.apply(OrbitAction::Rotate { dx: 120.0, dy: -40.0 });
        stage.apply(OrbitAction::Zoom(3.0));
        for i in 1..=120 {
            stage.step(start + Duration::from_millis(16 * i));
        }
        let head = stage.scene.find("head").unwrap();
        assert_eq!(head.transform.position, Vec3::new(0.0, 6.0, 0.0));
    }

    #[test]
    fn drag_moves_camera_and_eases_out() {
        let mut stage = stage();
        let start = Instant::now();
        let before = stage.camera.position;
        stage.apply(OrbitAction::Rotate { dx: 60.0, dy: 0.0 });
        assert!(stage.step(start + Duration::from_millis(16)));
        assert_ne!(stage.camera.position, before);

        // With nothing new queued, the motion decays away.
        let mut t = start + Duration::from_millis(16);
        for _ in 0..200 {
            t += Duration::from_millis(16);
            stage.step(t);
        }
        assert!(!stage.step(t + Duration::from_millis(16)));
    }

    #[test]
    fn stats_sample_after_a_second() {
        let mut stage = stage();
        let start = Instant::now();
        stage.stats = FrameStats::new(start);
        for i in 1..=61 {
            stage.step(start + Duration::from_secs_f64(i as f64 / 60.0));
        }
        let fps = stage.stats.fps_panel().value();
        assert!((fps - 60.0).abs() < 1.5, "fps {fps}");
    }
}
