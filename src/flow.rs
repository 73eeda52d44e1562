//! The winit event loop driving one [`Renderer`] on a window [`Context`].
//!
//! The loop owns nothing scene-specific: it creates the window and the
//! context on `resumed`, hands the overlay label to the [`PlatformState`],
//! forwards pointer and key input and renders on every redraw. The finish
//! request raised by the back button (or by Escape) is polled after each
//! window event; once set, the renderer is released and the loop exits.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::{
    config::AppConfig,
    context::Context,
    platform::PlatformState,
    resources::texture::load_label_bitmap,
    scene::Renderer,
};

struct AppState {
    ctx: Context,
    renderer: Option<Renderer>,
}

impl AppState {
    fn release(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            renderer.release(&mut self.ctx);
        }
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: AppConfig,
    platform: Arc<PlatformState>,
    state: Option<AppState>,
    cursor: PhysicalPosition<f64>,
}

impl App {
    pub fn new(config: AppConfig, platform: Arc<PlatformState>) -> anyhow::Result<Self> {
        Ok(Self {
            async_runtime: tokio::runtime::Runtime::new()?,
            config,
            platform,
            state: None,
            cursor: PhysicalPosition::new(0.0, 0.0),
        })
    }

    /// Decodes the configured label image into the pending slot. The overlay
    /// still draws its background without one.
    fn stage_label(&self) {
        let assets = self.config.assets();
        match load_label_bitmap(&assets, &self.config.label_image) {
            Ok(label) => {
                if let Err(e) = self.platform.set_pending(label.width, label.height, label.pixels) {
                    log::warn!("Rejected back button label: {}", e);
                }
            }
            Err(e) => log::warn!("No back button label: {:#}", e),
        }
    }

    fn pointer_down(&self, x: f64, y: f64) {
        let Some(renderer) = self.state.as_ref().and_then(|s| s.renderer.as_ref()) else {
            return;
        };
        let hit = renderer.handle_pointer_down(x as f32, y as f32);
        log::debug!("Pointer down at ({:.0}, {:.0}), back button hit: {}", x, y, hit);
    }

    fn finish(&mut self, event_loop: &ActiveEventLoop) {
        log::info!("Closing {}", self.config.window_title());
        if let Some(state) = &mut self.state {
            state.release();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let (width, height) = self.config.window_size;
        let window_attributes = Window::default_attributes()
            .with_title(self.config.window_title())
            .with_inner_size(PhysicalSize::new(width, height));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => panic!("App initialization failed. Cannot create the window: {}", e),
        };

        let mut ctx = match self
            .async_runtime
            .block_on(Context::new(window, self.config.assets()))
        {
            Ok(ctx) => ctx,
            Err(e) => panic!("App initialization failed. Cannot create the main context: {:#}", e),
        };

        self.stage_label();
        let selection = self.platform.selection();
        log::info!(
            "Starting {} (example {}, scene {})",
            self.config.window_title(),
            selection.example_index(),
            selection.scene_index()
        );
        let renderer = match Renderer::new(
            &mut ctx,
            self.platform.clone(),
            self.config.level_file.as_deref(),
        ) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Renderer setup failed: {}", e);
                panic!("App initialization failed. Cannot create the renderer: {}", e);
            }
        };

        ctx.window().request_redraw();
        self.state = Some(AppState {
            ctx,
            renderer: Some(renderer),
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.state.is_none() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.finish(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(state) = &mut self.state {
                    state.ctx.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(AppState {
                    ctx,
                    renderer: Some(renderer),
                }) = &mut self.state
                {
                    renderer.render(ctx);
                    ctx.window().request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                log::trace!("Cursor at {:?}", position);
                self.cursor = position;
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.pointer_down(self.cursor.x, self.cursor.y),
            WindowEvent::Touch(touch) if touch.phase == TouchPhase::Started => {
                self.pointer_down(touch.location.x, touch.location.y)
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                log::debug!("Key pressed: {:?}", event.logical_key);
                if let Key::Named(NamedKey::Escape | NamedKey::BrowserBack) = event.logical_key {
                    self.platform.request_finish();
                }
            }
            _ => {}
        }

        if self.platform.take_finish_request() {
            self.finish(event_loop);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.release();
        }
    }
}

/// Opens the window for `config.selection` and runs until the example is
/// finished or the window is closed.
pub fn run(config: AppConfig, platform: Arc<PlatformState>) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, platform)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
