//! Browser bindings
//!
//! A page creates one `WebGame`, forwards pointer, hand landmarks and key
//! presses every animation frame, and draws from `view_json`. Settings and
//! player records live in LocalStorage.

use glam::Vec2;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::consts::ARENA_WIDTH;
use crate::engine::{Engine, FrameView, Key};
use crate::persistence::LocalStorageStore;
use crate::platform::{HandObservation, InputAdapter};
use crate::quiz::{QuestionBank, QuestionProvider};
use crate::settings::Settings;
use crate::sim::geometry::Point;
use crate::sim::obstacle::Obstacle;
use crate::sim::state::{Arena, Screen};

/// Menu region as the page draws it
#[derive(Serialize)]
struct ButtonView<'a> {
    label: &'a str,
    pos: Vec2,
    size: Vec2,
}

#[derive(Serialize)]
struct QuestionView<'a> {
    text: &'a str,
    options: &'a [String],
}

#[derive(Serialize)]
struct LeaderView<'a> {
    user: &'a str,
    score: u64,
    level: u32,
}

/// Everything the page needs to draw one frame
#[derive(Serialize)]
struct PageView<'a> {
    screen: Screen,
    width: f32,
    height: f32,
    score: u64,
    level: u32,
    revive_chances: u8,
    game_over: bool,
    snake: &'a [Point],
    food: Point,
    obstacles: &'a [Obstacle],
    buttons: Vec<ButtonView<'a>>,
    question: Option<QuestionView<'a>>,
    current_user: Option<&'a str>,
    leaderboard: Vec<LeaderView<'a>>,
    new_user_text: &'a str,
    cursor: Option<Point>,
    pinch_active: bool,
    pinch_threshold: f32,
}

impl<'a> PageView<'a> {
    fn new(view: FrameView<'a>, pinch_active: bool, pinch_threshold: f32) -> Self {
        Self {
            screen: view.screen,
            width: view.arena.width,
            height: view.arena.height,
            score: view.session.score,
            level: view.session.level,
            revive_chances: view.session.revive_chances,
            game_over: view.session.game_over,
            snake: view.session.snake.points(),
            food: view.session.food,
            obstacles: view.session.obstacles.as_slice(),
            buttons: view
                .buttons
                .iter()
                .map(|b| ButtonView {
                    label: &b.label,
                    pos: b.rect.pos,
                    size: b.rect.size,
                })
                .collect(),
            question: view.question.map(|q| QuestionView {
                text: &q.text,
                options: &q.options,
            }),
            current_user: view.current_user,
            leaderboard: view
                .leaderboard
                .iter()
                .map(|u| LeaderView {
                    user: &u.username,
                    score: u.best_score,
                    level: u.best_level,
                })
                .collect(),
            new_user_text: view.new_user_text,
            cursor: view.cursor,
            pinch_active,
            pinch_threshold,
        }
    }
}

/// Game instance owned by the page
#[wasm_bindgen]
pub struct WebGame {
    engine: Engine,
    input: InputAdapter,
    keys: Vec<Key>,
}

#[wasm_bindgen]
impl WebGame {
    /// New game for a canvas of `width` x `height` pixels
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        let settings = Settings::load();
        let arena = Arena::new(width, height).with_scale(width / ARENA_WIDTH);
        let input = InputAdapter::new(&settings).mirrored(width);
        let engine = Engine::new(
            arena,
            settings,
            Box::new(LocalStorageStore::default()),
            QuestionProvider::local(QuestionBank::builtin()),
        );
        log::info!("Web game created ({}x{})", width, height);
        Self {
            engine,
            input,
            keys: Vec::new(),
        }
    }

    /// Queue a key press for the next frame
    pub fn key_down(&mut self, key: &str) {
        if let Some(key) = Key::from_key_name(key) {
            self.keys.push(key);
        }
    }

    /// Step one frame
    ///
    /// `landmarks` holds 21 `x, y` pairs for a tracked hand, or is empty.
    /// `now_ms` is the animation frame timestamp.
    pub fn frame(
        &mut self,
        mouse_x: f32,
        mouse_y: f32,
        has_mouse: bool,
        clicked: bool,
        landmarks: &[f32],
        now_ms: f64,
    ) {
        let points: Vec<Point> = landmarks
            .chunks_exact(2)
            .map(|xy| Vec2::new(xy[0], xy[1]))
            .collect();
        let hand = HandObservation::from_landmarks(&points);
        let mouse = has_mouse.then(|| Vec2::new(mouse_x, mouse_y));

        self.input.sync_settings(self.engine.settings());
        let input = self.input.frame(
            hand.as_ref(),
            mouse,
            clicked,
            std::mem::take(&mut self.keys),
            now_ms / 1000.0,
        );
        self.engine.frame(&input);
    }

    /// Persist the current settings (after pinch tuning)
    pub fn save_settings(&self) {
        self.engine.settings().save();
    }

    /// JSON snapshot of the current frame
    pub fn view_json(&self) -> String {
        let gate = self.input.gate();
        let view = PageView::new(
            self.engine.view(),
            gate.pinch_active(),
            self.engine.settings().pinch_threshold,
        );
        match serde_json::to_string(&view) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not encode frame view: {}", e);
                "{}".to_string()
            }
        }
    }
}
