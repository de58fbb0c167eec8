//! The core rendering engine tying data, settings, clock, and GPU together.

use glam::Vec2;

use crate::camera::controller::CameraController;
use crate::data::{ArraySource, DataLoader, HiddenSet, LoadState};
use crate::error::CerebraError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::DepthTexture;
use crate::lighting::Lighting;
use crate::options::{KeyAction, Options};
use crate::playback::{PlaybackClock, PlaybackEvent};
use crate::renderer::brain_mesh::BrainMeshRenderer;
use crate::renderer::mesh::MeshData;
use crate::renderer::points::ProbePointRenderer;
use crate::resolve::{resolve, PointAttributes};
use crate::settings::{DisplaySettings, SettingsAction};
use crate::util::frame_timing::FrameTiming;

/// Background clear color.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.012,
    g: 0.012,
    b: 0.022,
    a: 1.0,
};

/// The rendering engine for the probe cloud over the brain surface.
///
/// # Frame loop
///
/// Each frame, call [`update`](Self::update) with the elapsed wall-clock
/// seconds, then [`render`](Self::render) to draw and present. Call
/// [`resize`](Self::resize) when the window size changes.
///
/// # Settings
///
/// UI callbacks queue [`SettingsAction`]s via
/// [`queue_action`](Self::queue_action); they are applied atomically at the
/// start of the next update so a frame never observes a half-applied
/// configuration.
///
/// # Teardown
///
/// Dropping the engine releases every GPU resource; an in-flight
/// background load is abandoned with it.
pub struct BrainRenderEngine {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    /// Orbital camera controller.
    pub camera_controller: CameraController,
    /// GPU lighting uniform and bind group.
    pub lighting: Lighting,
    depth: DepthTexture,
    brain_mesh: BrainMeshRenderer,
    points: Option<ProbePointRenderer>,
    attributes: Option<PointAttributes>,

    loader: Option<DataLoader>,
    data: LoadState,
    hidden: HiddenSet,

    settings: DisplaySettings,
    pending_actions: Vec<SettingsAction>,
    clock: PlaybackClock,
    needs_resolve: bool,

    options: Options,
    /// Per-frame timing and FPS tracking.
    pub frame_timing: FrameTiming,
}

impl BrainRenderEngine {
    /// Create the engine over a window surface, spawning a background
    /// load of the given source while GPU setup proceeds.
    ///
    /// # Errors
    ///
    /// Returns [`CerebraError`] if GPU initialization or spawning the
    /// loader thread fails.
    pub async fn new<S>(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
        source: S,
        brain: &MeshData,
        options: Options,
    ) -> Result<Self, CerebraError>
    where
        S: ArraySource + Send + 'static,
    {
        let context = RenderContext::new(window, initial_size).await?;
        let camera_controller =
            CameraController::new(&context, &options.camera);
        let lighting = Lighting::new(&context);
        let depth = DepthTexture::new(
            &context.device,
            initial_size.0,
            initial_size.1,
        );
        let brain_mesh = BrainMeshRenderer::new(
            &context,
            &camera_controller.layout,
            &lighting.layout,
            brain,
            options.display.brain_opacity,
        );

        let hidden = HiddenSet::builtin().map_err(|err| {
            CerebraError::DataLoad(crate::data::DataError::Decode {
                dataset: "hidden_probes",
                reason: err.to_string(),
            })
        })?;

        let loader = DataLoader::spawn(source).map_err(CerebraError::Io)?;
        // Replaced with the real extent once the data arrives.
        let clock = PlaybackClock::new(0, options.playback.total_playback_ms);

        Ok(Self {
            context,
            camera_controller,
            lighting,
            depth,
            brain_mesh,
            points: None,
            attributes: None,
            loader: Some(loader),
            data: LoadState::Loading,
            hidden,
            settings: DisplaySettings::default(),
            pending_actions: Vec::new(),
            clock,
            needs_resolve: false,
            options,
            frame_timing: FrameTiming::new(),
        })
    }

    /// Current runtime options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The settings snapshot the last resolver pass saw.
    pub fn settings(&self) -> DisplaySettings {
        self.settings
    }

    /// The playback clock.
    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    /// Whether the probe data has finished loading.
    pub fn is_ready(&self) -> bool {
        matches!(self.data, LoadState::Ready(_))
    }

    /// Queue a settings mutation for the next update.
    pub fn queue_action(&mut self, action: SettingsAction) {
        self.pending_actions.push(action);
    }

    /// Execute a bound key action.
    pub fn execute_action(&mut self, action: KeyAction) {
        if let Some(settings_action) = action.settings_action() {
            self.queue_action(settings_action);
            return;
        }
        match action {
            KeyAction::PlayPause => {
                if self.clock.playing() {
                    self.clock.pause();
                } else {
                    self.clock.play();
                }
            }
            KeyAction::StepForward => self.clock.step_forward(),
            KeyAction::StepBackward => self.clock.step_backward(),
            KeyAction::ResetPlayback => self.clock.reset(),
            KeyAction::OpacityUp => self.nudge_opacity(1.0),
            KeyAction::OpacityDown => self.nudge_opacity(-1.0),
            KeyAction::RecenterCamera => {
                if let LoadState::Ready(ref data) = self.data {
                    self.camera_controller
                        .fit_to_positions(data.positions());
                }
            }
            _ => {}
        }
    }

    fn nudge_opacity(&mut self, sign: f32) {
        let opacity = self.brain_mesh.opacity()
            + sign * self.options.display.opacity_step;
        self.brain_mesh.set_opacity(&self.context.queue, opacity);
    }

    /// Advance one frame: poll the loader, tick the clock, apply queued
    /// settings, and re-resolve attributes if anything changed.
    pub fn update(&mut self, dt: f32) {
        self.poll_loader();

        if let Some(PlaybackEvent::Ended) = self.clock.advance(dt) {
            log::info!("playback reached the end of the recording");
        }

        let before = self.settings;
        // Queued actions land as one batch so a frame never sees a
        // half-applied configuration.
        for action in self.pending_actions.drain(..) {
            if let SettingsAction::SetMoment(moment) = action {
                self.clock.set_moment(moment);
            } else {
                self.settings = self.settings.apply(action);
            }
        }
        // The clock owns the timeline position.
        self.settings = self
            .settings
            .apply(SettingsAction::SetMoment(self.clock.moment()));
        if self.settings != before {
            self.needs_resolve = true;
        }

        self.resolve_if_needed();
        self.camera_controller.update_gpu(&self.context.queue);
        self.lighting.update_gpu(&self.context.queue);
    }

    fn poll_loader(&mut self) {
        let Some(ref loader) = self.loader else {
            return;
        };
        let Some(result) = loader.poll() else {
            return;
        };
        self.loader = None;

        match result {
            Ok(data) => {
                log::info!(
                    "probe data ready: {} probes, {} moments",
                    data.probe_count(),
                    data.max_moment() + 1
                );
                self.clock = PlaybackClock::new(
                    data.max_moment(),
                    self.options.playback.total_playback_ms,
                );
                let attributes = PointAttributes::new(data.positions());
                self.points = Some(ProbePointRenderer::new(
                    &self.context,
                    &self.camera_controller.layout,
                    &attributes,
                ));
                self.camera_controller.fit_to_positions(data.positions());
                self.attributes = Some(attributes);
                self.data = LoadState::Ready(Box::new(data));
                self.needs_resolve = true;
            }
            Err(e) => {
                self.data = LoadState::Failed(e);
            }
        }
    }

    fn resolve_if_needed(&mut self) {
        if !self.needs_resolve {
            return;
        }
        let LoadState::Ready(ref data) = self.data else {
            return;
        };
        let Some(ref mut attributes) = self.attributes else {
            return;
        };
        self.needs_resolve = false;

        match resolve(
            data,
            &self.hidden,
            &self.settings,
            self.options.display.max_point_size,
            attributes,
        ) {
            Ok(()) => {
                let dirty = attributes.take_dirty();
                if let Some(ref points) = self.points {
                    points.upload(&self.context.queue, attributes, dirty);
                }
            }
            Err(e) => {
                // Prior attributes stay on screen.
                log::warn!("{e}");
            }
        }
    }

    /// Draw and present one frame.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] when the swapchain needs
    /// reconfiguration; the caller should resize and retry.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.context.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Main Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                    multiview_mask: None,
                });

            self.brain_mesh.draw(
                &mut pass,
                &self.camera_controller.bind_group,
                &self.lighting.bind_group,
            );
            if let Some(ref points) = self.points {
                points.draw(&mut pass, &self.camera_controller.bind_group);
            }
        }
        self.context.submit(encoder);
        frame.present();
        self.frame_timing.end_frame();

        Ok(())
    }

    /// Handle a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.depth = DepthTexture::new(&self.context.device, width, height);
        self.camera_controller.resize(width, height);
    }

    /// Forward a mouse button press/release to the camera.
    pub fn handle_mouse_button(&mut self, pressed: bool) {
        self.camera_controller.mouse_pressed = pressed;
    }

    /// Forward a shift modifier change to the camera.
    pub fn handle_modifiers(&mut self, shift: bool) {
        self.camera_controller.shift_pressed = shift;
    }

    /// Forward a mouse drag delta to the camera.
    pub fn handle_mouse_move(&mut self, delta_x: f32, delta_y: f32) {
        if !self.camera_controller.mouse_pressed {
            return;
        }
        let delta = Vec2::new(delta_x, delta_y);
        if self.camera_controller.shift_pressed {
            self.camera_controller.pan(delta);
        } else {
            self.camera_controller.rotate(delta);
        }
    }

    /// Forward a scroll delta to the camera zoom.
    pub fn handle_mouse_wheel(&mut self, delta: f32) {
        self.camera_controller.zoom(delta);
    }
}
