//! Road Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use road_rush::audio::AudioManager;
    use road_rush::game::{FrameOutput, Game};
    use road_rush::input::InputState;
    use road_rush::persistence::{LocalStorage, MemoryStorage, Storage};
    use road_rush::renderer::{Frame, RenderState};
    use road_rush::sim::car::{CAR_SKINS, CarSkin};
    use road_rush::sim::state::{RunPhase, Viewport};

    /// Touch control buttons, by element id
    const TOUCH_BUTTONS: [&str; 6] = [
        "btn-up",
        "btn-down",
        "btn-left",
        "btn-right",
        "btn-brake",
        "btn-boost",
    ];

    /// Everything the page owns
    struct App {
        game: Game,
        render_state: Option<RenderState>,
        audio: AudioManager,
        input: InputState,
        canvas: HtmlCanvasElement,
        last_phase: RunPhase,
        faulted: bool,
    }

    impl App {
        /// Match the canvas to its CSS size and report the viewport
        fn sync_viewport(&mut self) -> Viewport {
            let width = self.canvas.client_width().max(1) as u32;
            let height = self.canvas.client_height().max(1) as u32;
            if self.canvas.width() != width || self.canvas.height() != height {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
                if let Some(render_state) = &mut self.render_state {
                    render_state.resize(width, height);
                }
            }
            Viewport::new(width as f32, height as f32)
        }

        fn frame(&mut self, now: f64) {
            let viewport = self.sync_viewport();
            match self.game.frame(now, self.input.controls(), viewport) {
                FrameOutput::Throttled => return,
                FrameOutput::Frame(frame) => self.present(&frame),
                FrameOutput::Dropped => {}
                FrameOutput::Fault(frame) => {
                    self.present(&frame);
                    if !self.faulted {
                        self.faulted = true;
                        show_error_overlay(true);
                    }
                }
            }

            for event in self.game.drain_events() {
                self.audio.handle(&event);
            }

            self.update_hud();

            let phase = self.game.phase();
            if phase != self.last_phase {
                self.on_phase_change(phase);
                self.last_phase = phase;
            }
        }

        fn present(&mut self, frame: &Frame) {
            let Some(render_state) = &mut self.render_state else {
                return;
            };
            match render_state.render(frame) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = render_state.size;
                    render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = get_document() else { return };
            let hud = self.game.hud();

            set_text(&document, "hud-speed", &hud.speed.to_string());
            set_text(&document, "hud-score", &hud.score.to_string());
            set_text(&document, "hud-lives", &hud.lives.to_string());
            set_text(
                &document,
                "hud-level",
                &format!("{} ({})", hud.level, hud.level_name),
            );
            set_text(&document, "hud-nitro", &format!("{:.0}%", hud.nitro));

            if let Some(el) = document.get_element_by_id("hud-fps") {
                el.set_text_content(Some(&hud.fps.to_string()));
                set_hidden(&el, !self.game.settings.show_fps);
            }
        }

        fn on_phase_change(&mut self, phase: RunPhase) {
            let Some(document) = get_document() else { return };
            match phase {
                RunPhase::AwaitingSelection => {
                    show(&document, "game-over", false);
                    show(&document, "hud", false);
                    show_skin_modal(&document, self.game.settings.skin);
                }
                RunPhase::Running => {
                    show(&document, "skin-modal", false);
                    show(&document, "game-over", false);
                    show(&document, "hud", true);
                }
                RunPhase::GameOver => {
                    self.input.clear();
                    show(&document, "hud", false);
                    self.show_game_over(&document);
                }
            }
        }

        fn show_game_over(&self, document: &Document) {
            let state = &self.game.state;
            set_text(document, "final-score", &state.score.to_string());
            set_text(document, "final-level", &state.level.to_string());

            let message = match self.game.last_rank {
                Some(1) => "New high score!".to_string(),
                Some(rank) => format!("You placed #{}", rank),
                None if self.game.halted() => "Something went wrong. Press Restart.".to_string(),
                None => String::new(),
            };
            set_text(document, "final-rank", &message);

            if let Some(table) = document.get_element_by_id("highscore-list") {
                let rows: String = self
                    .game
                    .highscores
                    .entries
                    .iter()
                    .enumerate()
                    .map(|(i, e)| {
                        format!(
                            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{} {}</td></tr>",
                            i + 1,
                            e.score,
                            e.level,
                            e.date,
                            e.time
                        )
                    })
                    .collect();
                table.set_inner_html(&rows);
            }

            show(document, "game-over", true);
        }
    }

    fn get_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(el: &web_sys::Element, hidden: bool) {
        let classes = el.class_list();
        let _ = if hidden {
            classes.add_1("hidden")
        } else {
            classes.remove_1("hidden")
        };
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            set_hidden(&el, !visible);
        }
    }

    fn show_error_overlay(visible: bool) {
        if let Some(document) = get_document() {
            show(&document, "error-overlay", visible);
        }
    }

    /// Show the car picker with the remembered skin highlighted
    fn show_skin_modal(document: &Document, selected: usize) {
        for (i, skin) in CAR_SKINS.iter().enumerate() {
            if let Some(btn) = document.get_element_by_id(&format!("skin-{}", i)) {
                let [r, g, b] = skin.color;
                let _ = btn.set_attribute(
                    "style",
                    &format!("background-color: #{:02x}{:02x}{:02x}", r, g, b),
                );
                btn.set_text_content(Some(skin.name));
                let _ = if i == selected {
                    btn.class_list().add_1("selected")
                } else {
                    btn.class_list().remove_1("selected")
                };
            }
        }
        show(document, "skin-modal", true);
    }

    fn open_storage() -> Box<dyn Storage> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; high scores will not persist", e);
                Box::new(MemoryStorage::new())
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Road Rush starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Hide loading indicator
        show(&document, "loading", false);

        let Some(canvas) = document
            .get_element_by_id("game-canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #game-canvas element");
            return;
        };

        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let viewport = Viewport::new(width as f32, height as f32);

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, open_storage(), viewport);
        log::info!("Game initialized with seed: {}", seed);

        let render_state = init_gpu(&canvas, width, height).await;
        if render_state.is_none() {
            show_error_overlay(true);
        }

        let mut audio = AudioManager::new();
        audio.apply_settings(&game.settings);
        let selected = game.settings.skin;

        let app = Rc::new(RefCell::new(App {
            game,
            render_state,
            audio,
            input: InputState::default(),
            canvas,
            last_phase: RunPhase::AwaitingSelection,
            faulted: false,
        }));

        setup_keyboard(app.clone());
        setup_touch_buttons(&document, app.clone());
        setup_skin_modal(&document, app.clone());
        setup_restart_button(&document, app.clone());
        setup_mute_button(&document, app.clone());
        setup_lifecycle(app.clone());

        show_skin_modal(&document, selected);

        request_animation_frame(app);

        log::info!("Road Rush running!");
    }

    async fn init_gpu(canvas: &HtmlCanvasElement, width: u32, height: u32) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("Failed to set up renderer: {}", e);
                None
            }
        }
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        for (event_name, held) in [("keydown", true), ("keyup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut app = app.borrow_mut();
                if app.input.key(&event.key(), held) {
                    event.prevent_default();
                    if held {
                        app.audio.resume();
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Hold-to-drive buttons for touch screens (mouse works too)
    fn setup_touch_buttons(document: &Document, app: Rc<RefCell<App>>) {
        const PRESS: [(&str, bool); 6] = [
            ("touchstart", true),
            ("touchend", false),
            ("touchcancel", false),
            ("mousedown", true),
            ("mouseup", false),
            ("mouseleave", false),
        ];

        for id in TOUCH_BUTTONS {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            for (event_name, held) in PRESS {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    let mut app = app.borrow_mut();
                    app.input.button(id, held);
                    if held {
                        app.audio.resume();
                    }
                });
                let _ = btn
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_skin_modal(document: &Document, app: Rc<RefCell<App>>) {
        for i in 0..CAR_SKINS.len() {
            let Some(btn) = document.get_element_by_id(&format!("skin-{}", i)) else {
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut app = app.borrow_mut();
                app.audio.resume();
                app.input.clear();
                let viewport = app.sync_viewport();
                if app.game.start(CarSkin::by_index(i), viewport) {
                    log::info!("Run started with the {} car", CarSkin::by_index(i).name);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(document: &Document, app: Rc<RefCell<App>>) {
        let Some(btn) = document.get_element_by_id("restart-btn") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut app = app.borrow_mut();
            if app.game.restart() {
                app.faulted = false;
                show_error_overlay(false);
                log::info!("Back to car selection");
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_mute_button(document: &Document, app: Rc<RefCell<App>>) {
        let Some(btn) = document.get_element_by_id("mute-btn") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut app = app.borrow_mut();
            let mut settings = app.game.settings.clone();
            settings.muted = !settings.muted;
            app.audio.apply_settings(&settings);
            app.game.apply_settings(settings);
            if let Some(btn) = get_document().and_then(|d| d.get_element_by_id("mute-btn")) {
                let label = if app.game.settings.muted { "Unmute" } else { "Mute" };
                btn.set_text_content(Some(label));
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Release held keys on blur and silence everything on unload
    fn setup_lifecycle(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().input.clear();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut app = app.borrow_mut();
            app.game.unload();
            for event in app.game.drain_events() {
                app.audio.handle(&event);
            }
            app.audio.stop_all();
        });
        let _ = window
            .add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    log::info!("Road Rush (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    headless_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive a scripted run without a window and print what happened
#[cfg(not(target_arch = "wasm32"))]
fn headless_run() {
    use road_rush::consts::TARGET_FPS;
    use road_rush::game::{FrameOutput, Game};
    use road_rush::input::Controls;
    use road_rush::persistence::MemoryStorage;
    use road_rush::sim::car::CarSkin;
    use road_rush::sim::state::{RunPhase, Viewport};

    const MAX_FRAMES: u32 = 20_000;

    let viewport = Viewport::default();
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let mut game = Game::new(seed, Box::new(MemoryStorage::new()), viewport);
    game.start(CarSkin::by_index(0), viewport);

    let step_ms = (1000.0 / TARGET_FPS).ceil();
    let mut frames = 0;
    let mut vertices = 0usize;
    let mut cues = 0usize;

    while frames < MAX_FRAMES && game.phase() == RunPhase::Running {
        frames += 1;
        // Floor it, weave every couple of seconds, burn nitro in bursts
        let controls = Controls {
            forward: true,
            left: (frames / 120) % 3 == 1,
            right: (frames / 120) % 3 == 2,
            boost: frames % 300 < 60,
            ..Controls::default()
        };
        if let FrameOutput::Frame(frame) = game.frame(frames as f64 * step_ms, controls, viewport)
        {
            vertices = vertices.max(frame.vertices.len());
        }
        cues += game.drain_events().len();
    }

    let hud = game.hud();
    println!("Seed:           {}", seed);
    println!("Frames:         {}", frames);
    println!("Phase:          {:?}", game.phase());
    println!("Score:          {}", hud.score);
    println!("Level:          {} ({})", hud.level, hud.level_name);
    println!("Lives left:     {}", hud.lives);
    println!("Audio cues:     {}", cues);
    println!("Peak vertices:  {}", vertices);
    if let Some(rank) = game.last_rank {
        println!("High score rank #{}", rank);
    }
}
