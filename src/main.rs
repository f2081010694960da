//! Mochi Cafe entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, DragEvent, Element, MouseEvent};

    use mochi_cafe::audio::{AudioManager, SoundEffect};
    use mochi_cafe::persistence::LocalStore;
    use mochi_cafe::platform::{FrameToken, PerformanceClock};
    use mochi_cafe::sim::{Customer, GameEvent, SessionPhase};
    use mochi_cafe::{FrameStatus, Presenter, Session, Settings, Snapshot};

    const SCREENS: [&str; 3] = ["start-screen", "game-screen", "game-over-screen"];
    const SLOTS: usize = 2;

    /// Game instance holding all state
    struct Game {
        session: Session<PerformanceClock, LocalStore>,
        document: Document,
        audio: AudioManager,
        settings: Settings,
        /// Pending requestAnimationFrame handle
        loop_id: Option<i32>,
    }

    impl Game {
        fn new(document: Document, seed: u64) -> Self {
            let session = Session::new(PerformanceClock, LocalStore::new(), seed);
            let settings = Settings::load(session.store());
            let mut audio = AudioManager::new();
            audio.set_muted(!settings.sound_on);
            audio.set_master_volume(settings.master_volume);
            Self {
                session,
                document,
                audio,
                settings,
                loop_id: None,
            }
        }

        /// Flush session feedback and redraw into the DOM
        fn present(&mut self) {
            let mut view = DomView {
                document: &self.document,
                audio: &self.audio,
                settings: &self.settings,
            };
            self.session.present(&mut view);
        }

        /// Patience bars move every frame, not just on render requests
        fn update_patience_bars(&self) {
            for customer in &self.session.state().customers {
                let selector = format!("[data-customer-id=\"{}\"] .patience-bar", customer.id);
                if let Some(bar) = self.document.query_selector(&selector).ok().flatten() {
                    let _ = bar.set_attribute("style", &bar_style(customer));
                }
            }
        }

    }

    /// Drop a scheduled requestAnimationFrame callback, if any
    fn cancel_frame(loop_id: &mut Option<i32>) {
        if let Some(id) = loop_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    /// Presenter writing into the page
    struct DomView<'a> {
        document: &'a Document,
        audio: &'a AudioManager,
        settings: &'a Settings,
    }

    impl DomView<'_> {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn flash(&self, id: &str, class: &'static str, ms: i32) {
            if !self.settings.effective_motion() {
                return;
            }
            if let Some(el) = self.document.get_element_by_id(id) {
                flash_class(&el, class, ms);
            }
        }

        fn render_customers(&self, customers: &[Customer]) {
            let Some(lane) = self.document.get_element_by_id("customer-lane") else {
                return;
            };
            let html: String = (0..SLOTS)
                .map(|i| match customers.get(i) {
                    Some(customer) => format!(
                        r#"<article class="customer-slot"><div class="customer-card" data-customer-id="{id}">
  <div class="customer-top"><span class="avatar">{avatar}</span><span class="mood">{mood}</span></div>
  <p><strong>Order:</strong> {order}</p>
  <p class="steam">~ hot + fresh ~</p>
  <div class="patience-track"><div class="patience-bar" style="{style}"></div></div>
</div></article>"#,
                        id = customer.id,
                        avatar = customer.avatar,
                        mood = customer.personality.as_str(),
                        order = customer.order,
                        style = bar_style(customer),
                    ),
                    None => r#"<article class="customer-slot"><div class="customer-card">Waiting for next customer…</div></article>"#
                        .to_string(),
                })
                .collect();
            lane.set_inner_html(&html);
        }
    }

    impl Presenter for DomView<'_> {
        fn render(&mut self, snapshot: &Snapshot) {
            self.set_text("coins", &snapshot.coins.to_string());
            self.set_text("score", &snapshot.score.to_string());
            self.set_text("combo", &format!("x{}", snapshot.combo));
            let hearts = "❤️ ".repeat(snapshot.lives.max(0) as usize);
            let hearts = hearts.trim();
            self.set_text("lives", if hearts.is_empty() { "—" } else { hearts });
            self.render_customers(&snapshot.customers);

            if snapshot.phase == SessionPhase::Ended {
                self.set_text("final-score", &snapshot.score.to_string());
                self.set_text("best-score", &snapshot.best_score.to_string());
                self.set_text("served-count", &snapshot.served.to_string());
                self.set_text("missed-count", &snapshot.missed.to_string());
                switch_screen(self.document, "game-over-screen");
            }
        }

        fn feedback(&mut self, event: &GameEvent) {
            // Muting is handled by the audio manager
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }

            match event {
                GameEvent::Served { item, .. } => {
                    self.set_text("tray-preview", &format!("Serving: {}", item));
                    self.flash("combo-wrapper", "glow", 500);
                }
                GameEvent::WrongItem { item } => {
                    self.set_text("tray-preview", &format!("Serving: {}", item));
                    self.flash("tray-dropzone", "shake", 300);
                }
                GameEvent::CustomerLeft { .. } => self.flash("customer-lane", "shake", 260),
                GameEvent::GameOver {
                    score,
                    best,
                    served,
                    missed,
                } => {
                    log::info!(
                        "Final score {} (best {}), served {}, missed {}",
                        score,
                        best,
                        served,
                        missed
                    );
                }
                GameEvent::CustomerArrived { .. } => {}
            }
        }
    }

    fn bar_style(customer: &Customer) -> String {
        format!("width: {:.1}%", customer.patience.max(0.0))
    }

    /// Add a CSS class and remove it again after `ms`
    fn flash_class(el: &Element, class: &'static str, ms: i32) {
        let _ = el.class_list().add_1(class);
        let el = el.clone();
        let closure = Closure::once(move || {
            let _ = el.class_list().remove_1(class);
        });
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                ms,
            );
        }
        closure.forget();
    }

    /// Show one screen, hide the others
    fn switch_screen(document: &Document, name: &str) {
        for id in SCREENS {
            if let Some(screen) = document.get_element_by_id(id) {
                let _ = screen.class_list().remove_1("active");
            }
        }
        if let Some(screen) = document.get_element_by_id(name) {
            let _ = screen.class_list().add_1("active");
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Mochi Cafe starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - can't start");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(document.clone(), seed)));

        {
            let mut g = game.borrow_mut();
            let best = g.session.best_score().to_string();
            let mut view = DomView {
                document: &g.document,
                audio: &g.audio,
                settings: &g.settings,
            };
            view.set_text("best-score", &best);
            view.set_text("sound-toggle", g.settings.sound_label());
            let snapshot = g.session.snapshot();
            view.render(&snapshot);
            drop(view);
            g.session.take_render_request();
        }

        setup_start_buttons(&document, game.clone());
        setup_ingredients(&document, game.clone());
        setup_tray(&document, game.clone());
        setup_sound_toggle(&document, game);

        log::info!("Mochi Cafe ready!");
    }

    fn start_game(game: &Rc<RefCell<Game>>) {
        let token = {
            let mut guard = game.borrow_mut();
            let g = &mut *guard;
            g.audio.resume();
            // A start while running leaves the live loop alone
            let loop_id = &mut g.loop_id;
            let Some(token) = g.session.restart(|| cancel_frame(loop_id)) else {
                return;
            };
            if let Some(el) = g.document.get_element_by_id("tray-preview") {
                el.set_text_content(Some("Ready to serve ✨"));
            }
            switch_screen(&g.document, "game-screen");
            g.present();
            token
        };

        request_animation_frame(game.clone(), token);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, token: FrameToken) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, token, time);
        });
        let id = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
        handle.borrow_mut().loop_id = id;
    }

    fn game_loop(game: Rc<RefCell<Game>>, token: FrameToken, time: f64) {
        let status = {
            let mut g = game.borrow_mut();
            g.loop_id = None;
            let status = g.session.frame(token, time);
            g.present();
            g.update_patience_bars();
            status
        };

        if status == FrameStatus::Continue {
            request_animation_frame(game, token);
        }
    }

    fn serve_item(game: &Rc<RefCell<Game>>, item: &str) {
        let mut g = game.borrow_mut();
        if g.session.serve(item).is_some() {
            g.present();
        }
    }

    fn setup_start_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    start_game(&game);
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_ingredients(document: &Document, game: Rc<RefCell<Game>>) {
        let Ok(buttons) = document.query_selector_all(".ingredient") else {
            return;
        };

        for i in 0..buttons.length() {
            let Some(button) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(item) = button.get_attribute("data-item") else {
                continue;
            };

            // Drag source
            {
                let item = item.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: DragEvent| {
                    if let Some(data) = event.data_transfer() {
                        let _ = data.set_data("text/plain", &item);
                    }
                });
                let _ = button
                    .add_event_listener_with_callback("dragstart", closure.as_ref().unchecked_ref());
                closure.forget();
            }

            // Direct activation
            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    serve_item(&game, &item);
                });
                let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_tray(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(tray) = document.get_element_by_id("tray-dropzone") else {
            return;
        };

        {
            let tray_el = tray.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DragEvent| {
                event.prevent_default();
                let _ = tray_el.class_list().add_1("drag-over");
            });
            let _ = tray.add_event_listener_with_callback("dragover", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let tray_el = tray.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: DragEvent| {
                let _ = tray_el.class_list().remove_1("drag-over");
            });
            let _ = tray.add_event_listener_with_callback("dragleave", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let tray_el = tray.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DragEvent| {
                event.prevent_default();
                let _ = tray_el.class_list().remove_1("drag-over");
                let item = event
                    .data_transfer()
                    .and_then(|data| data.get_data("text/plain").ok())
                    .unwrap_or_default();
                serve_item(&game, &item);
            });
            let _ = tray.add_event_listener_with_callback("drop", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_sound_toggle(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(btn) = document.get_element_by_id("sound-toggle") else {
            return;
        };
        let btn_el = btn.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut guard = game.borrow_mut();
            let g = &mut *guard;
            let on = g.settings.toggle_sound();
            g.audio.set_muted(!on);
            g.settings.save(g.session.store_mut());
            btn_el.set_text_content(Some(g.settings.sound_label()));
            let _ = btn_el.set_attribute("aria-pressed", if on { "true" } else { "false" });
            log::info!("Sound {}", if on { "on" } else { "off" });
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mochi Cafe (native) starting...");
    log::info!("Native mode runs a headless autoplay session - run with `trunk serve` for the web version");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    autoplay(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one session with a simple bot on a simulated 60 Hz clock
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(seed: u64) {
    use mochi_cafe::persistence::MemoryStore;
    use mochi_cafe::platform::{Clock, ManualClock};
    use mochi_cafe::sim::ORDERS;
    use mochi_cafe::{FrameStatus, Session};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    const FRAME_MS: f64 = 1000.0 / 60.0;
    // Ten simulated minutes
    const MAX_FRAMES: u32 = 36_000;

    let clock = ManualClock::new(0.0);
    let mut session = Session::new(clock.clone(), MemoryStore::new(), seed);
    let mut bot = Pcg32::seed_from_u64(seed.wrapping_add(1));

    let Some(token) = session.start() else {
        return;
    };

    let mut frames = 0;
    while frames < MAX_FRAMES {
        clock.advance(FRAME_MS);
        frames += 1;
        if session.frame(token, clock.now_ms()) == FrameStatus::Stopped {
            break;
        }

        // Reacts about once a second, grabs the wrong item now and then
        let Some(wanted) = session.state().customers.first().map(|c| c.order.clone()) else {
            continue;
        };
        if bot.random_bool(0.015) {
            let item = if bot.random_bool(0.1) {
                ORDERS[bot.random_range(0..ORDERS.len())].to_string()
            } else {
                wanted
            };
            session.serve(&item);
        }
        session.drain_events();
    }

    let state = session.state();
    println!(
        "Autoplay seed {}: {:.1}s, score {}, coins {}, served {}, missed {}, best {}",
        seed,
        frames as f64 * FRAME_MS / 1000.0,
        state.score,
        state.coins,
        state.served,
        state.missed,
        session.best_score()
    );
}
