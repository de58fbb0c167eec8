//! Standalone visualization window backed by winit.
//!
//! ```no_run
//! # use cerebra::data::SyntheticSource;
//! # use cerebra::renderer::MeshData;
//! # use cerebra::Viewer;
//! Viewer::new(SyntheticSource::new(11_293, 7), MeshData::demo_brain())
//!     .with_title("Cerebra")
//!     .run()
//!     .unwrap();
//! ```

use std::{sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::data::ArraySource;
use crate::engine::BrainRenderEngine;
use crate::error::CerebraError;
use crate::options::Options;
use crate::renderer::mesh::MeshData;

/// A standalone window that displays a probe recording over a brain mesh.
///
/// Construct via [`Viewer::new`], then call [`run`](Self::run) to enter
/// the event loop.
pub struct Viewer<S> {
    source: S,
    brain: MeshData,
    options: Options,
    title: String,
}

impl<S> Viewer<S>
where
    S: ArraySource + Send + 'static,
{
    /// Create a viewer over the given data source and brain mesh.
    #[must_use]
    pub fn new(source: S, brain: MeshData) -> Self {
        Self {
            source,
            brain,
            options: Options::default(),
            title: "Cerebra".into(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    pub fn run(self) -> Result<(), CerebraError> {
        let event_loop = EventLoop::new()
            .map_err(|e| CerebraError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            last_mouse_pos: (0.0, 0.0),
            last_frame_time: Instant::now(),
            source: Some(self.source),
            brain: self.brain,
            options: self.options,
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| CerebraError::Viewer(e.to_string()))
    }
}

/// Internal winit application handler.
struct ViewerApp<S> {
    window: Option<Arc<Window>>,
    engine: Option<BrainRenderEngine>,
    last_mouse_pos: (f32, f32),
    last_frame_time: Instant,
    source: Option<S>,
    brain: MeshData,
    options: Options,
    title: String,
}

impl<S> ApplicationHandler for ViewerApp<S>
where
    S: ArraySource + Send + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(source) = self.source.take() else {
            return;
        };

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            #[allow(clippy::cast_possible_truncation)]
            #[allow(clippy::cast_sign_loss)]
            let logical_w = (f64::from(mon_size.width) / scale * 0.75) as u32;
            #[allow(clippy::cast_possible_truncation)]
            #[allow(clippy::cast_sign_loss)]
            let logical_h = (f64::from(mon_size.height) / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let inner = window.inner_size();
        let engine = pollster::block_on(BrainRenderEngine::new(
            window.clone(),
            (inner.width.max(1), inner.height.max(1)),
            source,
            &self.brain,
            self.options.clone(),
        ));

        let engine = match engine {
            Ok(e) => e,
            Err(e) => {
                log::error!("Failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        };

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width.max(1), size.height.max(1));
                }
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt =
                    now.duration_since(self.last_frame_time).as_secs_f32();
                self.last_frame_time = now;

                if let Some(engine) = &mut self.engine {
                    engine.update(dt);
                    match engine.render() {
                        Ok(()) => {}
                        Err(
                            wgpu::SurfaceError::Outdated
                            | wgpu::SurfaceError::Lost,
                        ) => {
                            if let Some(w) = &self.window {
                                let inner = w.inner_size();
                                engine.resize(
                                    inner.width.max(1),
                                    inner.height.max(1),
                                );
                            }
                        }
                        Err(e) => {
                            log::error!("render error: {e:?}");
                        }
                    }
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                if button == MouseButton::Left {
                    if let Some(engine) = &mut self.engine {
                        engine.handle_mouse_button(
                            state == ElementState::Pressed,
                        );
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                let pos = (position.x as f32, position.y as f32);
                let delta_x = pos.0 - self.last_mouse_pos.0;
                let delta_y = pos.1 - self.last_mouse_pos.1;
                self.last_mouse_pos = pos;

                if let Some(engine) = &mut self.engine {
                    engine.handle_mouse_move(delta_x, delta_y);
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                if let Some(engine) = &mut self.engine {
                    engine.handle_mouse_wheel(scroll);
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                if let Some(engine) = &mut self.engine {
                    engine.handle_modifiers(modifiers.state().shift_key());
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                use winit::keyboard::PhysicalKey;
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };

                let key_str = format!("{code:?}");
                if let Some(engine) = &mut self.engine {
                    if let Some(action) =
                        engine.options().keybindings.lookup(&key_str)
                    {
                        engine.execute_action(action);
                    }
                }
            }

            _ => (),
        }
    }
}
