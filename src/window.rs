//! The windowed viewer: event handling and the per-frame sequence.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

use crate::camera::{OrbitControls, PerspectiveCamera};
use crate::config::ViewerConfig;
use crate::control_panel::ControlPanel;
#[cfg(feature = "egui")]
use crate::control_panel::{PanelAction, PanelStats};
use crate::error::ViewerError;
use crate::gpu::{GpuState, PointUploader, SceneFrame};
use crate::input::{Input, InputAction};
use crate::params::ParameterSet;
use crate::render_loop::RenderLoop;
use crate::scene::SceneHost;
use crate::textures::AlphaMap;
use crate::viewport::{Resize, Viewport};

/// Galaxy viewer application.
///
/// Owns the live [`ParameterSet`]. The control panel proposes replacements,
/// and each accepted one regenerates the displayed cloud.
pub struct Viewer {
    config: ViewerConfig,
    params: ParameterSet,
    rng: SmallRng,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    scene: SceneHost<PointUploader>,
    render_loop: RenderLoop,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    input: Input,
    panel: ControlPanel,
    viewport: Viewport,
    title_fps: Option<u32>,
    error: Option<ViewerError>,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        let params = config.galaxy.clone();
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let viewport = Viewport::new(config.width as f64, config.height as f64, 1.0);
        Self {
            camera: config.camera.projection(viewport.aspect()),
            controls: config.camera.controls(),
            panel: ControlPanel::new(&params, config.show_panel),
            config,
            params,
            rng,
            window: None,
            gpu: None,
            scene: SceneHost::new(),
            render_loop: RenderLoop::new(),
            input: Input::default(),
            viewport,
            title_fps: None,
            error: None,
        }
    }

    /// Open the window and run until it is closed.
    pub fn run(config: ViewerConfig) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut viewer = Viewer::new(config);
        event_loop.run_app(&mut viewer)?;

        match viewer.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Live parameters.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let size = window.inner_size();
        self.viewport = Viewport::from_physical(size.width, size.height, window.scale_factor());
        self.camera.set_aspect(self.viewport.aspect());
        self.input.set_scale_factor(window.scale_factor());

        let alpha_map = AlphaMap::load_or_default(self.config.particle_texture.as_deref());
        let gpu = pollster::block_on(GpuState::new(
            window.clone(),
            self.viewport.drawing_buffer_size(),
            self.config.background,
            self.config.blend_mode,
            &alpha_map,
        ))?;

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.regenerate();

        // Rotation counts from the first frame, not from process start.
        self.render_loop.restart_at(Instant::now());
        Ok(())
    }

    /// Build a fresh cloud from the live parameters and swap it in.
    fn regenerate(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let started = Instant::now();
        self.scene.regenerate(gpu.uploader(), &self.params, &mut self.rng);
        log::info!(
            "Generated {} points in {:.1} ms",
            self.scene.point_count(),
            started.elapsed().as_secs_f64() * 1000.0
        );
    }

    #[cfg(feature = "egui")]
    fn apply_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::Commit(params) => {
                self.params = params;
                self.regenerate();
            }
            PanelAction::Regenerate => self.regenerate(),
        }
    }

    fn apply_input(&mut self, action: InputAction) {
        let height = self.viewport.height as f32;
        match action {
            InputAction::Rotate { dx, dy } => self.controls.rotate(dx, dy, height),
            InputAction::Pan { dx, dy } => self.controls.pan(dx, dy, height, &self.camera),
            InputAction::Zoom(steps) => self.controls.zoom(steps),
            InputAction::PanKey(direction) => self.controls.pan_key(direction, height, &self.camera),
            InputAction::ToggleFullscreen => {
                let on = self.window.as_ref().is_some_and(|w| w.fullscreen().is_none());
                self.set_fullscreen(on);
            }
            InputAction::ExitFullscreen => self.set_fullscreen(false),
            InputAction::TogglePanel => {
                self.panel.toggle_visible();
                self.update_title(self.render_loop.time().fps());
            }
        }
    }

    fn set_fullscreen(&mut self, on: bool) {
        if let Some(window) = &self.window {
            if window.fullscreen().is_some() == on {
                return;
            }
            window.set_fullscreen(on.then_some(Fullscreen::Borderless(None)));
            log::debug!("Fullscreen {}", if on { "on" } else { "off" });
        }
    }

    /// Viewport, then camera aspect, then renderer size.
    fn handle_resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        let Some(window) = &self.window else {
            return;
        };
        let Some(resize) = Resize::plan(size.width, size.height, window.scale_factor()) else {
            return;
        };
        self.viewport = resize.viewport;
        self.camera.set_aspect(resize.aspect);
        if let Some(gpu) = &mut self.gpu {
            let (width, height) = resize.surface;
            gpu.resize(winit::dpi::PhysicalSize::new(width, height), resize.drawing_buffer);
        }
    }

    /// Show the FPS readout in the title while the panel can't show it.
    fn update_title(&mut self, fps: Option<u32>) {
        let Some(window) = &self.window else {
            return;
        };
        let panel_shows_fps = cfg!(feature = "egui") && self.panel.is_visible();
        let wanted = if panel_shows_fps { None } else { fps };
        if wanted == self.title_fps {
            return;
        }
        self.title_fps = wanted;
        match wanted {
            Some(fps) => window.set_title(&format!("{} - {} fps", self.config.title, fps)),
            None => window.set_title(&self.config.title),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let stats = self
            .render_loop
            .tick(Instant::now(), &self.params, &mut self.scene, &mut self.controls);

        #[cfg(feature = "egui")]
        let ui = self.run_panel(&stats);

        self.update_title(stats.fps);

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let frame = SceneFrame {
            view_proj: self.camera.projection_matrix() * self.controls.view_matrix(),
            rotation: self.scene.rotation(),
            point_size: self.params.point_size,
            points: self.scene.handle(),
        };

        #[cfg(feature = "egui")]
        let result = gpu.render(&frame, ui.as_ref());
        #[cfg(not(feature = "egui"))]
        let result = gpu.render(&frame);

        match result {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Skipped frame: {:?}", e),
        }
    }

    /// Run one egui pass and apply whatever the panel asked for.
    #[cfg(feature = "egui")]
    fn run_panel(&mut self, stats: &crate::render_loop::FrameStats) -> Option<crate::gpu::egui_integration::EguiFrameOutput> {
        let window = self.window.clone()?;
        let gpu = self.gpu.as_mut()?;

        gpu.egui.begin_frame(&window);
        let ctx = gpu.egui.ctx.clone();
        let panel_stats = PanelStats {
            fps: stats.fps,
            point_count: self.scene.point_count() as usize,
        };
        let action = self.panel.show(&ctx, &self.params, panel_stats);
        let output = gpu.egui.end_frame(&window);

        if let Some(action) = action {
            self.apply_panel_action(action);
        }
        Some(output)
    }

    #[cfg(feature = "egui")]
    fn ui_consumed(&mut self, event: &WindowEvent) -> bool {
        match (&mut self.gpu, &self.window) {
            (Some(gpu), Some(window)) => gpu.egui.on_window_event(window, event),
            _ => false,
        }
    }

    #[cfg(not(feature = "egui"))]
    fn ui_consumed(&mut self, _event: &WindowEvent) -> bool {
        false
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let consumed = self.ui_consumed(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.handle_resize(physical_size);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.input.set_scale_factor(scale_factor);
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.handle_resize(size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            other => {
                // Button releases always reach the tracker so a drag that
                // ends over the panel doesn't leave a button stuck.
                let is_release = matches!(
                    &other,
                    WindowEvent::MouseInput {
                        state: ElementState::Released,
                        ..
                    }
                );
                if consumed && !is_release {
                    return;
                }
                if let Some(action) = self.input.handle_event(&other, Instant::now()) {
                    self.apply_input(action);
                }
            }
        }
    }
}
