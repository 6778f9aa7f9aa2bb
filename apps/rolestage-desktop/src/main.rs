mod overlay;
mod stage;

use anyhow::Result;
use clap::Parser;
use rolestage_common::ViewerConfig;
use rolestage_input::{DragButton, OrbitAction};
use rolestage_render_wgpu::{GpuContext, RendererOptions, WgpuRenderer};
use rolestage_tools::FrameStats;
use stage::StageContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser, Debug)]
#[command(name = "rolestage-desktop", about = "Stage viewer with orbit controls")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML viewer configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render the directional light's shadow map
    #[arg(long)]
    shadows: bool,

    /// Initial window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Initial window height in pixels
    #[arg(long)]
    height: Option<u32>,
}

impl Cli {
    /// Flags win over the config file.
    fn apply(&self, config: &mut ViewerConfig) {
        if self.shadows {
            config.shadows = true;
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
    }
}

/// Pixels of trackpad scroll that count as one wheel notch.
const PIXELS_PER_STEP: f64 = 50.0;

/// Wheel delta as zoom steps. Positive moves toward the target.
fn wheel_steps(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_STEP) as f32,
    }
}

fn drag_button(button: MouseButton) -> Option<DragButton> {
    match button {
        MouseButton::Left => Some(DragButton::Primary),
        MouseButton::Right => Some(DragButton::Secondary),
        _ => None,
    }
}

/// GPU resources that live as long as the window.
struct Gpu {
    context: GpuContext,
    renderer: WgpuRenderer,
    egui_ctx: egui::Context,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(window: &Arc<Window>, config: &ViewerConfig, stage: &StageContext) -> Result<Self> {
        let context = GpuContext::new(window.clone(), config.vsync)?;
        let (width, height) = context.size();
        let mut renderer = WgpuRenderer::new(
            &context.device,
            context.format(),
            width,
            height,
            RendererOptions::from(config),
        );
        renderer.prepare(&context.device, &stage.render_list)?;
        tracing::info!(
            "{} meshes resident for {} instances",
            renderer.mesh_count(),
            stage.render_list.meshes.len()
        );

        let egui_ctx = egui::Context::default();
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&context.device, context.format(), None, 1, false);

        Ok(Self {
            context,
            renderer,
            egui_ctx,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.context.resize(width, height) {
            self.renderer.resize(&self.context.device, width, height);
        }
    }

    fn draw_overlay(&mut self, window: &Window, view: &wgpu::TextureView, stats: &mut FrameStats) {
        let raw_input = self.egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| overlay::draw_stats(ctx, stats));
        self.egui_winit
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = self.context.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let device = &self.context.device;
        let queue = &self.context.queue;
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("overlay_encoder"),
        });
        self.egui_renderer
            .update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("overlay_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

struct StageApp {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    stage: Option<StageContext>,
    gpu: Option<Gpu>,
}

impl StageApp {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            window: None,
            stage: None,
            gpu: None,
        }
    }

    /// One tick: schedule the next frame, move the camera, count the frame,
    /// then draw the scene and the overlay.
    fn frame(&mut self) {
        let (Some(window), Some(stage), Some(gpu)) = (&self.window, &mut self.stage, &mut self.gpu) else {
            return;
        };

        window.request_redraw();
        stage.step(Instant::now());

        let output = match gpu.context.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.context.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer.render(
            &gpu.context.device,
            &gpu.context.queue,
            &view,
            &stage.camera,
            &stage.render_list,
        );
        gpu.draw_overlay(window, &view, &mut stage.stats);
        output.present();
    }
}

impl ApplicationHandler for StageApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.window.width, self.config.window.height));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let stage = StageContext::new(&self.config, size.width, size.height, Instant::now());
        let gpu = match Gpu::new(&window, &self.config, &stage) {
            Ok(gpu) => gpu,
            Err(e) => {
                tracing::error!("GPU initialization failed: {e:#}");
                event_loop.exit();
                return;
            }
        };

        window.request_redraw();
        self.window = Some(window);
        self.stage = Some(stage);
        self.gpu = Some(gpu);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) {
            let response = gpu.egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let (Some(stage), Some(gpu)) = (&mut self.stage, &mut self.gpu) {
                    if stage.resize(size.width, size.height) {
                        gpu.resize(size.width, size.height);
                    }
                }
            }
            WindowEvent::MouseInput { button, state, .. } => {
                if let (Some(stage), Some(button)) = (&mut self.stage, drag_button(button)) {
                    match state {
                        ElementState::Pressed => stage.pointer.press(button),
                        ElementState::Released => stage.pointer.release(button),
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(stage) = &mut self.stage {
                    if let Some(action) = stage.pointer.moved(position.x, position.y) {
                        stage.apply(action);
                    }
                }
            }
            WindowEvent::CursorLeft { .. } => {
                if let Some(stage) = &mut self.stage {
                    stage.pointer.reset();
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = wheel_steps(delta);
                if let Some(stage) = &mut self.stage {
                    if steps != 0.0 {
                        stage.apply(OrbitAction::Zoom(steps));
                    }
                }
            }
            WindowEvent::RedrawRequested => self.frame(),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = ViewerConfig::load_or_default(cli.config.as_deref())?;
    cli.apply(&mut config);

    tracing::info!(
        "rolestage-desktop starting: {}x{}, shadows {}",
        config.window.width,
        config.window.height,
        if config.shadows { "on" } else { "off" }
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = StageApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from(["rolestage-desktop", "--shadows", "--width", "640"]).unwrap();
        let mut config = ViewerConfig::default();
        cli.apply(&mut config);
        assert!(config.shadows);
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 720);
    }

    #[test]
    fn absent_flags_keep_config() {
        let cli = Cli::try_parse_from(["rolestage-desktop"]).unwrap();
        let mut config = ViewerConfig {
            shadows: true,
            ..ViewerConfig::default()
        };
        cli.apply(&mut config);
        assert!(config.shadows);
        assert!(cli.config.is_none());
    }

    #[test]
    fn wheel_maps_to_zoom_steps() {
        assert_eq!(wheel_steps(MouseScrollDelta::LineDelta(0.0, 2.0)), 2.0);
        assert_eq!(wheel_steps(MouseScrollDelta::LineDelta(0.0, -1.0)), -1.0);
        assert_eq!(
            wheel_steps(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -37.5))),
            -0.75
        );
        assert_eq!(
            wheel_steps(MouseScrollDelta::PixelDelta(PhysicalPosition::new(4.0, 0.0))),
            0.0
        );
    }

    #[test]
    fn trackpad_gesture_zooms_like_a_few_notches() {
        // A swipe arrives as many small pixel deltas.
        let total: f32 = (0..40)
            .map(|_| wheel_steps(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 5.0))))
            .sum();
        assert!((total - 4.0).abs() < 1e-4, "total {total}");
    }

    #[test]
    fn buttons_map_to_drags() {
        assert_eq!(drag_button(MouseButton::Left), Some(DragButton::Primary));
        assert_eq!(drag_button(MouseButton::Right), Some(DragButton::Secondary));
        assert_eq!(drag_button(MouseButton::Middle), None);
    }
}
