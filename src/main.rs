//! Vignette - an interactive 3D story told in short scenes
//!
//! A loading bar, a short quiz, then a run of small 3D vignettes the
//! viewer clicks through, ending on a question.

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use vignette::config::AppConfig;
use vignette::input::{InputAction, InputMapper};
use vignette::systems::{ExperienceSystem, RenderError, RenderSystem, WindowSystem};
use vignette_core::Story;

/// Main application state
struct App {
    config: AppConfig,
    window_system: Option<WindowSystem>,
    render_system: Option<RenderSystem>,
    experience: ExperienceSystem,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let story = Story::load(&config.story.path).unwrap_or_else(|e| {
            log::warn!(
                "Failed to load story '{}': {}. Using the built-in story.",
                config.story.path,
                e
            );
            Story::builtin()
        });
        log::info!(
            "Story '{}': {} quiz questions, {} scenes",
            story.title,
            story.quiz.len(),
            story.scene_count()
        );

        let experience = ExperienceSystem::new(story, &config);

        Self {
            config,
            window_system: None,
            render_system: None,
            experience,
        }
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: InputAction) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ToggleFullscreen => {
                if let Some(window_system) = &self.window_system {
                    window_system.toggle_fullscreen();
                }
            }
            action => {
                if !self.experience.apply(action) {
                    log::debug!("{:?} had no effect", action);
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.experience.update();

        if let Some(window_system) = &mut self.window_system {
            let status = self.experience.status();
            window_system.update_title(&status);
        }

        if let Some(render_system) = &mut self.render_system {
            match render_system.render_frame(self.experience.sequencer_mut()) {
                Ok(()) => {}
                Err(RenderError::SurfaceLost) => {
                    log::debug!("Surface lost, reconfigured");
                }
                Err(RenderError::OutOfMemory) => {
                    log::error!("GPU out of memory");
                    event_loop.exit();
                    return;
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        if let Some(window_system) = &self.window_system {
            window_system.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window_system.is_some() {
            return;
        }

        let window_system = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window_system) => window_system,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let render_system = match RenderSystem::new(
            window_system.window().clone(),
            self.config.rendering.clone(),
            &self.config.camera,
            self.config.window.vsync,
        ) {
            Ok(render_system) => render_system,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let (width, height) = render_system.size();
        self.experience.resize(width, height);
        log::info!("Window ready at {}x{}", width, height);

        window_system.request_redraw();
        self.window_system = Some(window_system);
        self.render_system = Some(render_system);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
                self.experience.resize(size.width, size.height);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat && event.state == ElementState::Pressed {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state) {
                        self.handle_action(event_loop, action);
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.experience.pointer_mut().process_cursor_moved(position);
            }

            WindowEvent::CursorLeft { .. } => {
                self.experience.pointer_mut().process_cursor_left();
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.experience.pointer_mut().process_mouse_button(button, state);
            }

            WindowEvent::Touch(touch) => {
                self.experience
                    .pointer_mut()
                    .process_touch(touch.phase, touch.location);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

fn main() {
    let config = AppConfig::load();

    // RUST_LOG wins over the configured level
    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(
            config
                .as_ref()
                .map(|c| c.debug.log_level.clone())
                .unwrap_or_else(|_| "info".to_string()),
        ),
    );
    logger.init();

    let config = config.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    log::info!("Starting {}", config.window.title);

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}
