use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use roboeyes::gui::eye_control_panel;
use roboeyes::{DisplayColors, EyeAnimator, Framebuffer, FrameRenderer, Mood, SystemClock};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

const SCREEN_WIDTH: u32 = 128;
const SCREEN_HEIGHT: u32 = 64;
const MAX_FPS: u32 = 50;

struct App {
    state: Option<AppState>,
}

struct AppState {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    renderer: FrameRenderer,
    colors: DisplayColors,
    eyes: EyeAnimator<Framebuffer, StdRng>,
    clock: SystemClock,
    follow_mouse: bool,
    mouse_position: Option<winit::dpi::PhysicalPosition<f64>>,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl AppState {
    fn handle_key(&mut self, key: &Key) {
        match key {
            Key::Named(NamedKey::Space) => self.eyes.blink(),
            Key::Character(c) => match c.as_str() {
                "l" => self.eyes.trigger_laugh(),
                "c" => self.eyes.trigger_confused(),
                "m" => self.follow_mouse = !self.follow_mouse,
                "1" => self.eyes.set_mood(Mood::Default),
                "2" => self.eyes.set_mood(Mood::Tired),
                "3" => self.eyes.set_mood(Mood::Angry),
                "4" => self.eyes.set_mood(Mood::Happy),
                _ => {}
            },
            _ => {}
        }
    }

    /// Map the cursor onto the eye screen and look there.
    fn follow_cursor(&mut self) {
        let Some(pos) = self.mouse_position else {
            return;
        };
        let fx = pos.x / self.surface_config.width as f64;
        let fy = pos.y / self.surface_config.height as f64;
        let x = (fx * self.eyes.max_left_eye_x() as f64) as i32;
        let y = (fy * self.eyes.max_left_eye_y() as f64) as i32;
        self.eyes.look_at(x, y);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title("RoboEyes")
                        .with_inner_size(winit::dpi::LogicalSize::new(1024, 512)),
                )
                .unwrap(),
        );

        let state = pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });

            let surface = instance.create_surface(window.clone()).unwrap();

            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                })
                .await
                .unwrap();

            let (device, queue) = adapter
                .request_device(
                    &wgpu::DeviceDescriptor {
                        label: Some("roboeyes_device"),
                        ..Default::default()
                    },
                    None,
                )
                .await
                .unwrap();

            let size = window.inner_size();
            let caps = surface.get_capabilities(&adapter);
            let format = caps.formats[0];

            let surface_config = wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: size.width.max(1),
                height: size.height.max(1),
                present_mode: wgpu::PresentMode::AutoVsync,
                alpha_mode: caps.alpha_modes[0],
                view_formats: vec![],
                desired_maximum_frame_latency: 2,
            };
            surface.configure(&device, &surface_config);

            let renderer = FrameRenderer::new(&device, format, (SCREEN_WIDTH, SCREEN_HEIGHT));

            let mut eyes = EyeAnimator::new(
                Framebuffer::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                StdRng::from_os_rng(),
                SCREEN_WIDTH as i32,
                SCREEN_HEIGHT as i32,
                MAX_FPS,
            );
            eyes.set_auto_blink(true, Some(3), Some(2));
            eyes.set_idle_mode(true, Some(2), Some(2));

            // egui setup
            let egui_ctx = egui::Context::default();
            let egui_state = egui_winit::State::new(
                egui_ctx.clone(),
                egui_ctx.viewport_id(),
                &window,
                Some(window.scale_factor() as f32),
                None,
                None,
            );
            let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

            AppState {
                window,
                device,
                queue,
                surface,
                surface_config,
                renderer,
                colors: DisplayColors::default(),
                eyes,
                clock: SystemClock::default(),
                follow_mouse: false,
                mouse_position: None,
                egui_ctx,
                egui_state,
                egui_renderer,
            }
        });

        self.state = Some(state);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                state.surface_config.width = new_size.width.max(1);
                state.surface_config.height = new_size.height.max(1);
                state
                    .surface
                    .configure(&state.device, &state.surface_config);
                state.window.request_redraw();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                state.handle_key(&logical_key);
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.mouse_position = Some(position);
            }
            WindowEvent::RedrawRequested => {
                let output = match state.surface.get_current_texture() {
                    Ok(output) => output,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state
                            .surface
                            .configure(&state.device, &state.surface_config);
                        return;
                    }
                    Err(e) => {
                        log::error!("surface error: {e:?}");
                        return;
                    }
                };

                if state.follow_mouse {
                    state.follow_cursor();
                }
                state.eyes.update(&state.clock);

                // --- egui frame ---
                let raw_input = state.egui_state.take_egui_input(&state.window);
                let full_output = state.egui_ctx.run(raw_input, |ctx| {
                    eye_control_panel(ctx, &mut state.eyes, &mut state.colors);
                });

                state
                    .egui_state
                    .handle_platform_output(&state.window, full_output.platform_output);

                let paint_jobs = state
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                for (id, delta) in &full_output.textures_delta.set {
                    state
                        .egui_renderer
                        .update_texture(&state.device, &state.queue, *id, delta);
                }

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.surface_config.width, state.surface_config.height],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                let mut encoder =
                    state
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("roboeyes_encoder"),
                        });

                state.egui_renderer.update_buffers(
                    &state.device,
                    &state.queue,
                    &mut encoder,
                    &paint_jobs,
                    &screen_descriptor,
                );

                state.renderer.upload(
                    &state.queue,
                    state.eyes.canvas(),
                    state.eyes.palette(),
                    &state.colors,
                );

                // Display + egui overlay in one pass
                {
                    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("roboeyes_render_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });

                    state.renderer.draw(&mut pass);

                    state.egui_renderer.render(
                        &mut pass.forget_lifetime(),
                        &paint_jobs,
                        &screen_descriptor,
                    );
                }

                for id in &full_output.textures_delta.free {
                    state.egui_renderer.free_texture(id);
                }

                state.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                state.window.request_redraw();
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new().unwrap();
    let mut app = App { state: None };
    event_loop.run_app(&mut app).unwrap();
}
