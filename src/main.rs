//! Drift Field entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_field {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use drift_field::renderer::vertex::colors;
    use drift_field::renderer::{CircleBatch, RenderState};
    use drift_field::settings::Settings;
    use drift_field::sim::{DrawTarget, InputEvent, SimState, tick};

    /// App instance holding the field, its surfaces, and frame timing
    struct App {
        state: SimState,
        canvases: Vec<HtmlCanvasElement>,
        renders: Vec<RenderState>,
        batches: Vec<CircleBatch>,
        settings: Settings,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        /// Run one frame: record batches, step the sim, present.
        fn frame(&mut self, time: f64) {
            // Track frame times over a 60-frame window
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            for batch in &mut self.batches {
                batch.clear();
            }
            let mut targets: Vec<&mut dyn DrawTarget> = self
                .batches
                .iter_mut()
                .map(|batch| batch as &mut dyn DrawTarget)
                .collect();
            tick(&mut self.state, &mut targets);
            drop(targets);

            for (render, batch) in self.renders.iter_mut().zip(&self.batches) {
                match render.render(batch) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render.size;
                        render.resize(w, h);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }

            if self.settings.show_fps {
                self.update_hud();
            }
        }

        /// Apply a new window size: canvases, surfaces, gradient restyle,
        /// and the sim's resize event.
        fn resize(&mut self, width: u32, height: u32) {
            for canvas in &self.canvases {
                canvas.set_width(width);
                canvas.set_height(height);
            }
            for render in &mut self.renders {
                render.resize(width, height);
                render.set_gradient(
                    colors::GRADIENT_TOP,
                    colors::GRADIENT_MID,
                    colors::GRADIENT_BOTTOM,
                );
            }
            self.state.push_event(InputEvent::Resize {
                width: width as f32,
                height: height as f32,
            });
        }

        /// Update FPS readout in the DOM, when the page provides one
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("hud-fps") {
                el.set_text_content(Some(&self.fps.to_string()));
            }
        }
    }

    fn window_size(window: &web_sys::Window) -> (u32, u32) {
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0) as u32;
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0) as u32;
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Drift Field starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let settings = Settings::load();
        let (width, height) = window_size(&window);

        let primary: HtmlCanvasElement = document
            .get_element_by_id("canvas1")
            .expect("no canvas1")
            .dyn_into()
            .expect("not a canvas");
        let mut canvases = vec![primary];
        if settings.mirror {
            if let Some(el) = document.get_element_by_id("canvas2") {
                if let Ok(canvas) = el.dyn_into::<HtmlCanvasElement>() {
                    canvases.push(canvas);
                }
            }
        }
        for canvas in &canvases {
            canvas.set_width(width);
            canvas.set_height(height);
        }

        let seed = js_sys::Date::now() as u64;
        let state = SimState::new(
            seed,
            width as f32,
            height as f32,
            settings.particle_count(),
        );
        log::info!(
            "Field initialized with seed {} and {} particles on {} surface(s)",
            seed,
            state.particles.len(),
            canvases.len()
        );

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let mut surfaces = Vec::new();
        for canvas in &canvases {
            let surface = instance
                .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
                .expect("Failed to create surface");
            surfaces.push(surface);
        }

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: surfaces.first(),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut renders = Vec::new();
        for surface in surfaces {
            renders.push(RenderState::new(surface, &adapter, width, height).await);
        }
        let batches = renders.iter().map(|_| CircleBatch::new()).collect();

        let app = Rc::new(RefCell::new(App {
            state,
            canvases,
            renders,
            batches,
            settings,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }));

        setup_input_handlers(app.clone());

        // Start the frame loop
        request_animation_frame(app);

        log::info!("Drift Field running!");
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        // Mouse down - engage the pointer at its position
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().state.push_event(InputEvent::Press {
                    x: event.client_x() as f32,
                    y: event.client_y() as f32,
                });
            });
            let _ = window
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - refresh the position (taken only while engaged)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().state.push_event(InputEvent::Move {
                    x: event.client_x() as f32,
                    y: event.client_y() as f32,
                });
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up - disengage
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().state.push_event(InputEvent::Release);
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch mirrors the mouse handlers on the primary canvas
        let canvas = app.borrow().canvases[0].clone();

        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    app.borrow_mut().state.push_event(InputEvent::Press {
                        x: touch.client_x() as f32 - rect.left() as f32,
                        y: touch.client_y() as f32 - rect.top() as f32,
                    });
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    app.borrow_mut().state.push_event(InputEvent::Move {
                        x: touch.client_x() as f32 - rect.left() as f32,
                        y: touch.client_y() as f32 - rect.top() as f32,
                    });
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().state.push_event(InputEvent::Release);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window resize - resize surfaces, restyle, reset the field
        {
            let app = app.clone();
            let window_clone = window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let (width, height) = window_size(&window_clone);
                log::info!("Window resized to {}x{}", width, height);
                app.borrow_mut().resize(width, height);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_field::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Drift Field (native) starting...");

    headless_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless smoke run: drive the field for a few hundred frames and check
/// the particles ended up where the sim promises they are.
#[cfg(not(target_arch = "wasm32"))]
fn headless_run() {
    use drift_field::consts::PARTICLE_COUNT;
    use drift_field::sim::{SimState, tick};

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let (width, height) = (1280.0, 720.0);
    let mut state = SimState::new(seed, width, height, PARTICLE_COUNT);

    for _ in 0..600 {
        tick(&mut state, &mut []);
    }

    let contained = state
        .particles
        .iter()
        .filter(|p| {
            p.pos.x >= p.radius
                && p.pos.x <= width - p.radius
                && p.pos.y >= p.radius
                && p.pos.y <= height - p.radius
        })
        .count();
    log::info!(
        "{} / {} particles inside bounds after 600 frames",
        contained,
        state.particles.len()
    );
    println!(
        "✓ simulated {} particles for 600 frames (seed {})",
        state.particles.len(),
        seed
    );
}
