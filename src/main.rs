//! Palm Breaker entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement};

    use palm_breaker::consts::*;
    use palm_breaker::highscores::MAX_HIGH_SCORES;
    use palm_breaker::input::TrackingSender;
    use palm_breaker::render::{RenderFrame, palette};
    use palm_breaker::sim::{self, GameEvent, GameState, TickInput, tick};
    use palm_breaker::{
        FrameScheduler, HandInput, Leaderboard, ScoreClient, Settings, TrackingFrame, TrackingSlot,
        Variant,
    };

    const VIDEO_BORDER: &str = "2px solid #3a4c4e";
    const VIDEO_BORDER_LOST: &str = "6px solid rgb(225, 21, 21)";

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
        static TRACKER: RefCell<Option<TrackingSender>> = const { RefCell::new(None) };
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        scheduler: FrameScheduler,
        tracking: TrackingSlot,
        ctx: CanvasRenderingContext2d,
        document: Document,
        scores: Option<ScoreClient>,
        /// Level-up indicator stays up until this timestamp
        level_up_until: f64,
        level_up_visible: bool,
        tracking_lost: bool,
    }

    impl Game {
        fn new(
            ctx: CanvasRenderingContext2d,
            document: Document,
            settings: Settings,
            scores: Option<ScoreClient>,
        ) -> Self {
            let tracking = TrackingSlot::new();
            TRACKER.with(|t| *t.borrow_mut() = Some(tracking.sender()));

            Self {
                state: new_state(&settings),
                settings,
                scheduler: FrameScheduler::default(),
                tracking,
                ctx,
                document,
                scores,
                level_up_until: 0.0,
                level_up_visible: false,
                tracking_lost: false,
            }
        }

        /// Run one simulation step if the scheduler admits it
        fn step(&mut self, time: f64) -> Option<Vec<GameEvent>> {
            if !self.scheduler.should_step(time) {
                return None;
            }

            let input = TickInput {
                now_ms: time,
                tracking: self.tracking.take(),
            };
            let events = tick(&mut self.state, &input);
            for event in &events {
                if let GameEvent::LevelUp { level } = event {
                    log::info!("Level {} reached", level);
                    self.level_up_until = time + LEVEL_UP_DISPLAY_MS;
                }
            }
            Some(events)
        }

        /// Paint the canvas and refresh the DOM HUD
        fn draw(&mut self, time: f64) {
            let frame = RenderFrame::capture(&self.state, time);
            paint(&self.ctx, &frame);

            set_text(&self.document, "scoreElement", &frame.hud.score.to_string());
            set_text(&self.document, "hitsElement", &frame.hud.hits.to_string());
            set_text(&self.document, "levelElement", &frame.hud.level.to_string());
            if frame.hud.lives.is_some() {
                set_text(&self.document, "livesElement", &frame.hud.lives_text());
            }

            let level_up_visible = time < self.level_up_until;
            if level_up_visible != self.level_up_visible {
                self.level_up_visible = level_up_visible;
                let opacity = if level_up_visible { "1" } else { "0" };
                set_style(&self.document, "levelUpIndicator", "opacity", opacity);
            }

            if frame.tracking_lost != self.tracking_lost {
                self.tracking_lost = frame.tracking_lost;
                let border = if frame.tracking_lost {
                    VIDEO_BORDER_LOST
                } else {
                    VIDEO_BORDER
                };
                set_style(&self.document, "videoElement", "border", border);
            }
        }

        /// Replace the game with a fresh one (new variant or settings)
        fn reset(&mut self) {
            sim::reconfigure(&mut self.state, self.settings.variant.config());
            self.level_up_until = 0.0;
            set_style(&self.document, "gameOverModal", "display", "none");
            log::info!("Switched to the {} game", self.settings.variant.as_str());
        }
    }

    fn new_state(settings: &Settings) -> GameState {
        let seed = js_sys::Date::now() as u64;
        let mut state = GameState::new(settings.variant.config(), seed);
        state.input = HandInput::with_tuning(settings.input.clone());
        log::info!("New {} game with seed: {}", settings.variant.as_str(), seed);
        state
    }

    fn paint(ctx: &CanvasRenderingContext2d, frame: &RenderFrame) {
        let (w, h) = (frame.width as f64, frame.height as f64);
        ctx.clear_rect(0.0, 0.0, w, h);
        ctx.set_fill_style_str(palette::BACKGROUND);
        ctx.fill_rect(0.0, 0.0, w, h);

        ctx.set_fill_style_str(palette::BRICK);
        ctx.begin_path();
        for brick in &frame.bricks {
            ctx.rect(
                brick.x as f64,
                brick.y as f64,
                brick.width as f64,
                brick.height as f64,
            );
        }
        ctx.fill();

        let paddle = frame.paddle;
        ctx.set_fill_style_str(palette::PADDLE);
        ctx.fill_rect(
            paddle.x as f64,
            paddle.y as f64,
            paddle.width as f64,
            paddle.height as f64,
        );

        if let Some(ball) = frame.ball {
            ctx.set_fill_style_str(palette::BALL);
            ctx.begin_path();
            let _ = ctx.arc(ball.x as f64, ball.y as f64, ball.radius as f64, 0.0, TAU);
            ctx.fill();
        }

        if let Some(banner) = &frame.banner {
            ctx.save();
            ctx.set_global_alpha(banner.opacity as f64);
            ctx.set_fill_style_str(palette::TEXT);
            ctx.set_font("bold 24px \"IBM Plex Mono\"");
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            let _ = ctx.fill_text(&banner.text, w / 2.0, h / 2.0);
            ctx.restore();
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_style(document: &Document, id: &str, property: &str, value: &str) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property(property, value);
        }
    }

    fn set_class(document: &Document, selector: &str, class: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            let _ = el.set_attribute("class", class);
        }
    }

    fn with_game(f: impl FnOnce(&mut Game)) {
        GAME.with(|slot| match slot.borrow().as_ref() {
            Some(game) => f(&mut game.borrow_mut()),
            None => log::warn!("Game not initialised yet"),
        });
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn offer(frame: TrackingFrame) {
        TRACKER.with(|t| {
            if let Some(sender) = t.borrow_mut().as_mut() {
                sender.offer(now_ms(), frame);
            }
        });
    }

    /// Called by the tracking glue with the wrist's normalized x
    #[wasm_bindgen]
    pub fn push_hand_position(x: f32) {
        offer(TrackingFrame::Hand(x));
    }

    /// Called by the tracking glue when a frame had no hand
    #[wasm_bindgen]
    pub fn push_no_hand() {
        offer(TrackingFrame::NoHand);
    }

    /// Start button: dismiss the intro and wait for a hand
    #[wasm_bindgen]
    pub fn start_game() {
        with_game(|g| {
            sim::start_game(&mut g.state);
            set_style(&g.document, "startModal", "display", "none");
            let opacity = g.settings.effective_camera_opacity().to_string();
            set_style(&g.document, "videoElement", "opacity", &opacity);
        });
    }

    /// Restart button on the game-over modal
    #[wasm_bindgen]
    pub fn restart_game() {
        with_game(|g| {
            sim::restart(&mut g.state);
            g.level_up_until = 0.0;
            set_style(&g.document, "gameOverModal", "display", "none");
            set_style(&g.document, "winModal", "display", "none");
        });
    }

    /// Switch between the hand-tracked and classic games
    #[wasm_bindgen]
    pub fn set_variant(name: &str) {
        let Some(variant) = Variant::from_str(name) else {
            log::warn!("Unknown variant: {}", name);
            return;
        };
        with_game(|g| {
            g.settings.variant = variant;
            g.settings.save();
            g.reset();
        });
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Palm Breaker starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document available");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("Canvas #gameCanvas not found");
            return;
        };
        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            log::error!("2D canvas context unavailable");
            return;
        };

        let settings = Settings::load();
        let config = settings.variant.config();
        canvas.set_width(config.canvas_width as u32);
        canvas.set_height(config.canvas_height as u32);

        let scores = canvas
            .get_attribute("data-score-endpoint")
            .filter(|url| !url.is_empty())
            .map(ScoreClient::new);
        match &scores {
            Some(client) => log::info!("Leaderboard at {}", client.endpoint()),
            None => log::info!("No score endpoint configured, leaderboard disabled"),
        }

        let game = Rc::new(RefCell::new(Game::new(ctx, document, settings, scores)));
        GAME.with(|slot| *slot.borrow_mut() = Some(game.clone()));

        request_animation_frame(game);
        log::info!("Palm Breaker running!");
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let finished = {
            let mut g = game.borrow_mut();
            let events = g.step(time);
            if events.is_some() {
                g.draw(time);
            }
            events.into_iter().flatten().find_map(|event| match event {
                GameEvent::GameOver { score, level, hits } => Some((score, level, hits)),
                _ => None,
            })
        };

        if let Some((score, level, hits)) = finished {
            show_game_over(&game, score, level, hits);
            submit_high_score(game.clone(), score, level);
        }

        request_animation_frame(game);
    }

    fn show_game_over(game: &Rc<RefCell<Game>>, score: u32, level: u32, hits: u32) {
        let g = game.borrow();
        let document = &g.document;
        set_text(document, "finalLevel", &level.to_string());
        set_text(document, "finalScore", &score.to_string());
        set_text(document, "finalHits", &hits.to_string());
        set_class(document, ".high-scores", "high-scores hidden");
        if g.scores.is_some() {
            set_class(document, ".loading-text", "loading-text");
        }
        set_style(document, "gameOverModal", "display", "flex");
    }

    /// Fetch the table, ask for a name, submit and show the refreshed table
    fn submit_high_score(game: Rc<RefCell<Game>>, score: u32, level: u32) {
        let (client, default_name) = {
            let g = game.borrow();
            let Some(client) = g.scores.clone() else {
                return;
            };
            (client, g.settings.default_player_name().to_string())
        };

        wasm_bindgen_futures::spawn_local(async move {
            let board = Leaderboard::new(client.fetch_high_scores().await.unwrap_or_default());
            if let Some(rank) = board.rank_of(score) {
                log::info!("Score {} would rank #{}", score, rank);
            }

            let name = web_sys::window()
                .and_then(|w| {
                    w.prompt_with_message_and_default(
                        "Enter your name for the leaderboard:",
                        &default_name,
                    )
                    .ok()
                    .flatten()
                })
                .filter(|name| !name.trim().is_empty());

            let document = game.borrow().document.clone();
            let Some(name) = name else {
                set_class(&document, ".loading-text", "loading-text hidden");
                return;
            };

            {
                let mut g = game.borrow_mut();
                g.settings.player_name = name.clone();
                g.settings.save();
            }

            if client.submit_score(&name, score, level).await {
                if let Some(updated) = client.fetch_high_scores().await {
                    display_high_scores(&document, &Leaderboard::new(updated), score);
                }
            }
            set_class(&document, ".loading-text", "loading-text hidden");
        });
    }

    /// Fill the table in the game-over modal
    fn display_high_scores(document: &Document, board: &Leaderboard, score: u32) {
        let Some(list) = scores_list(document) else {
            log::warn!("Game-over modal has no room for the high score table");
            return;
        };

        list.set_text_content(None);
        for row in board.rows(score) {
            let class = if row.current {
                "score-entry current-score"
            } else {
                "score-entry"
            };
            let Ok(line) = create_with_class(document, "div", class) else {
                continue;
            };
            let cells = [
                ("rank", row.rank.to_string()),
                ("name", row.name),
                ("score", row.score.to_string()),
                ("level", format!("Level {}", row.level)),
            ];
            for (class, text) in cells {
                if let Ok(cell) = create_with_class(document, "span", class) {
                    cell.set_text_content(Some(&text));
                    let _ = line.append_child(&cell);
                }
            }
            let _ = list.append_child(&line);
        }
        set_class(document, ".high-scores", "high-scores");
    }

    /// The `.scores-list` element, built in front of the restart button if
    /// the page doesn't provide one
    fn scores_list(document: &Document) -> Option<Element> {
        if let Some(list) = document
            .query_selector(".high-scores .scores-list")
            .ok()
            .flatten()
        {
            return Some(list);
        }

        let content = document
            .query_selector("#gameOverModal .modal-content")
            .ok()
            .flatten()?;
        let container = create_with_class(document, "div", "high-scores hidden").ok()?;
        let title = document.create_element("h3").ok()?;
        title.set_text_content(Some(&format!("Top {} High Scores", MAX_HIGH_SCORES)));
        let list = create_with_class(document, "div", "scores-list").ok()?;
        container.append_child(&title).ok()?;
        container.append_child(&list).ok()?;

        let restart = content.query_selector(".restart-button").ok().flatten();
        content.insert_before(&container, restart.as_deref()).ok()?;
        Some(list)
    }

    fn create_with_class(document: &Document, tag: &str, class: &str) -> Result<Element, JsValue> {
        let el = document.create_element(tag)?;
        el.set_class_name(class);
        Ok(el)
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Palm Breaker (native) starting...");
    log::info!("Native mode plays a headless demo - serve the wasm build for the real game");

    demo::run(0x5EED);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless game driven by a scripted tracker that chases the ball
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use palm_breaker::consts::*;
    use palm_breaker::render::RenderFrame;
    use palm_breaker::sim::{self, GameEvent, GameState, TickInput, tick};
    use palm_breaker::{FrameScheduler, HandInput, Settings, TrackingFrame, TrackingSlot};

    /// Simulated display refresh rate
    const DISPLAY_HZ: f64 = 120.0;
    const MAX_SECONDS: f64 = 300.0;

    pub fn run(seed: u64) {
        let settings = Settings::load();
        let mut state = GameState::new(settings.variant.config(), seed);
        state.input = HandInput::with_tuning(settings.input.clone());
        sim::start_game(&mut state);

        let slot = TrackingSlot::new();
        let mut sender = slot.sender();
        let mut scheduler = FrameScheduler::default();
        let tuning = settings.input;

        let mut now = 0.0;
        while now < MAX_SECONDS * 1000.0 {
            now += 1000.0 / DISPLAY_HZ;

            // Invert the camera remap so the hand sits under the ball
            let target = state.ball.pos.x / state.config.canvas_width;
            let raw = (target - tuning.bias) / tuning.scale;
            sender.offer(now, TrackingFrame::Hand(raw));

            if !scheduler.should_step(now) {
                continue;
            }
            let input = TickInput {
                now_ms: now,
                tracking: slot.take(),
            };
            for event in tick(&mut state, &input) {
                match event {
                    GameEvent::BrickDestroyed { .. } | GameEvent::PaddleHit => {
                        log::debug!("{:?}", event)
                    }
                    _ => log::info!("t={:.1}s {:?}", now / 1000.0, event),
                }
            }
            if state.phase.is_game_over() {
                break;
            }
        }

        let frame = RenderFrame::capture(&state, now);
        log::info!(
            "Demo finished after {} ticks: level {}, score {}, hits {}, lives {}",
            state.time_ticks,
            frame.hud.level,
            frame.hud.score,
            frame.hud.hits,
            frame.hud.lives_text()
        );
        log::info!("Frame budget {:.2} ms at {} fps", FRAME_DELAY_MS, FPS);
    }
}
