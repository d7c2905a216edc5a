//! Pinch Snake entry point
//!
//! Native: a headless demo run that steers the snake toward the food
//! until the game ends or a frame cap is reached. Web: logging setup; the
//! page then creates a `WebGame` from the library and drives it.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Pinch Snake starting...");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::Path;

    use pinch_snake::engine::{Engine, Key};
    use pinch_snake::persistence::JsonFileStore;
    use pinch_snake::platform::InputAdapter;
    use pinch_snake::quiz::{QuestionBank, QuestionProvider};
    use pinch_snake::settings::Settings;
    use pinch_snake::sim::{Arena, Screen};

    const USERS_FILE: &str = "users.json";
    const QUESTIONS_FILE: &str = "questions.json";
    const DEFAULT_PLAYERS: [&str; 3] = ["Player1", "Player2", "Player3"];
    const FRAME_DT: f64 = 1.0 / 30.0;
    const MAX_FRAMES: u32 = 30 * 60 * 5;

    pub fn run() {
        let settings = Settings::load();
        let arena = Arena::default();
        let mut input = InputAdapter::new(&settings);
        let bank = QuestionBank::load_from(Path::new(QUESTIONS_FILE));
        let mut engine = Engine::new(
            arena,
            settings,
            Box::new(JsonFileStore::new(USERS_FILE)),
            QuestionProvider::local(bank),
        );

        if engine.users().is_empty() {
            for name in DEFAULT_PLAYERS {
                engine.add_user(name);
            }
        }
        let Some(player) = engine.users().records().first().map(|u| u.username.clone()) else {
            log::error!("No player available, giving up");
            return;
        };
        engine.select_user(&player);

        let mut now = 0.0;
        let mut frames = 0;
        let mut keys = vec![Key::Char(' ')];
        while frames < MAX_FRAMES && engine.screen() != Screen::GameOver {
            // Chase the food; on the revive prompt, pick the first option
            let (pointer, click) = match engine.screen() {
                Screen::RevivePrompt => {
                    let target = engine.view().buttons.first().map(|b| b.rect.center());
                    (target, true)
                }
                _ => (Some(engine.session().food), false),
            };

            input.sync_settings(engine.settings());
            let frame = input.frame(None, pointer, click, std::mem::take(&mut keys), now);
            engine.frame(&frame);
            for event in &engine.session().events {
                log::debug!("{:?}", event);
            }

            now += FRAME_DT;
            frames += 1;
        }

        let session = engine.session();
        log::info!(
            "{} finished after {} frames: score {}, level {}, {} revives left",
            player,
            frames,
            session.score,
            session.level,
            session.revive_chances
        );
        for (rank, record) in engine.view().leaderboard.iter().enumerate() {
            log::info!(
                "#{} {} score {} level {}",
                rank + 1,
                record.username,
                record.best_score,
                record.best_level
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pinch Snake (native) starting headless demo...");
    demo::run();
}
