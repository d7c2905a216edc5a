//! Screen state machine
//!
//! `Engine` owns everything a running game needs and is stepped once per
//! input frame by the driver. Only the Playing screen moves the snake; the
//! other screens are menus driven by activations on their hot regions and
//! a few keyboard shortcuts.
//!
//! Flow: Start -> UserSelection -> {NewUser | Playing}, Playing <-> RevivePrompt,
//! then GameOver -> {Playing (restart) | UserSelection}.

use crate::consts::{LEADERBOARD_ROWS, MAX_USERNAME_LEN};
use crate::persistence::{UserDirectory, UserStore};
use crate::platform::PointerSample;
use crate::quiz::{QuestionProvider, QuizQuestion};
use crate::settings::Settings;
use crate::sim::geometry::Point;
use crate::sim::revive::{ReviveEntry, ReviveGate, ReviveVerdict};
use crate::sim::state::{Arena, GameSession, Screen};
use crate::sim::tick::tick;
use crate::ui::{self, Button, ButtonId};
use crate::users::{UserBook, UserRecord};

/// Pinch threshold change per `t`/`y` press, in pixels
const PINCH_STEP: f32 = 5.0;

/// Keyboard input relevant to the menus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Escape,
}

impl Key {
    /// Map a key name as browsers report it (`KeyboardEvent.key`)
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "Backspace" => Some(Key::Backspace),
            "Enter" => Some(Key::Enter),
            "Escape" => Some(Key::Escape),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

/// Everything the engine consumes in one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub pointer: PointerSample,
    /// Debounced click or pinch
    pub activation: bool,
    pub keys: Vec<Key>,
    /// Frame time in seconds
    pub now: f64,
}

/// Read-only snapshot for the renderer
#[derive(Debug)]
pub struct FrameView<'a> {
    pub screen: Screen,
    pub arena: &'a Arena,
    pub session: &'a GameSession,
    pub buttons: &'a [Button],
    pub question: Option<&'a QuizQuestion>,
    pub current_user: Option<&'a str>,
    pub leaderboard: Vec<&'a UserRecord>,
    pub new_user_text: &'a str,
    /// Pointer position for drawing a cursor
    pub cursor: Option<Point>,
}

/// Game engine context
pub struct Engine {
    settings: Settings,
    arena: Arena,
    screen: Screen,
    session: GameSession,
    gate: ReviveGate,
    quiz: QuestionProvider,
    users: UserDirectory,
    current_user: Option<String>,
    new_user_text: String,
    /// Page of the user list being shown
    user_page: usize,
    buttons: Vec<Button>,
    cursor: Option<Point>,
}

impl Engine {
    pub fn new(
        arena: Arena,
        settings: Settings,
        store: Box<dyn UserStore>,
        mut quiz: QuestionProvider,
    ) -> Self {
        let session = GameSession::new(&arena, &settings);
        quiz.request();
        let mut engine = Self {
            settings,
            arena,
            screen: Screen::StartScreen,
            session,
            gate: ReviveGate::new(),
            quiz,
            users: UserDirectory::open(store),
            current_user: None,
            new_user_text: String::new(),
            user_page: 0,
            buttons: Vec::new(),
            cursor: None,
        };
        engine.relayout();
        engine
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn users(&self) -> &UserBook {
        self.users.book()
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    /// Register a player without going through the menus
    pub fn add_user(&mut self, username: &str) -> bool {
        let added = self.users.add_user(username);
        if added {
            self.relayout();
        }
        added
    }

    /// Make `username` the active player if known
    pub fn select_user(&mut self, username: &str) -> bool {
        if self.users.get_user(username).is_none() {
            return false;
        }
        self.current_user = Some(username.to_string());
        true
    }

    /// Step the engine by one frame
    pub fn frame(&mut self, input: &FrameInput) {
        self.session.events.clear();
        if input.pointer.primary.is_some() {
            self.cursor = input.pointer.primary;
        }

        let hit = if input.activation {
            input
                .pointer
                .primary
                .and_then(|p| ui::hit_test(&self.buttons, p))
                .map(|b| b.id)
        } else {
            None
        };

        // Letters are text on the NewUser screen
        if self.screen != Screen::NewUser {
            self.tune_pinch(&input.keys);
        }

        match self.screen {
            Screen::StartScreen => self.start_screen(hit, &input.keys),
            Screen::UserSelection => self.user_selection(hit),
            Screen::NewUser => self.new_user(hit, &input.keys),
            Screen::Playing => self.playing(input),
            Screen::RevivePrompt => self.revive_prompt(hit),
            Screen::GameOver => self.game_over(hit, &input.keys),
        }

        self.relayout();
    }

    /// Snapshot for drawing this frame
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            screen: self.screen,
            arena: &self.arena,
            session: &self.session,
            buttons: &self.buttons,
            question: self.gate.question(),
            current_user: self.current_user.as_deref(),
            leaderboard: self.users.top_n(LEADERBOARD_ROWS),
            new_user_text: &self.new_user_text,
            cursor: self.cursor,
        }
    }

    /// Full reset to level 1 and straight into play
    pub fn restart(&mut self) {
        self.session = GameSession::new(&self.arena, &self.settings);
        self.gate.clear();
        self.quiz.request();
        self.set_screen(Screen::Playing);
    }

    /// `t` widens the pinch threshold, `y` narrows it
    fn tune_pinch(&mut self, keys: &[Key]) {
        for key in keys {
            match key {
                Key::Char('t') => self.settings.adjust_pinch_threshold(PINCH_STEP),
                Key::Char('y') => self.settings.adjust_pinch_threshold(-PINCH_STEP),
                _ => {}
            }
        }
    }

    fn set_screen(&mut self, screen: Screen) {
        if screen != self.screen {
            log::debug!("Screen {:?} -> {:?}", self.screen, screen);
            self.screen = screen;
        }
    }

    fn relayout(&mut self) {
        self.buttons = ui::layout(
            self.screen,
            &self.arena,
            self.users.book(),
            self.user_page,
            self.gate.question(),
        );
    }

    /// Resume the current run, or start a fresh one if it has ended
    fn enter_playing(&mut self) {
        if self.session.game_over {
            self.restart();
        } else {
            self.set_screen(Screen::Playing);
        }
    }

    fn start_screen(&mut self, hit: Option<ButtonId>, keys: &[Key]) {
        let start = hit == Some(ButtonId::Start) || keys.contains(&Key::Char(' '));
        if start {
            if self.current_user.is_some() {
                self.enter_playing();
            } else {
                self.set_screen(Screen::UserSelection);
            }
        } else if hit == Some(ButtonId::SelectUser) {
            self.set_screen(Screen::UserSelection);
        }
    }

    fn user_selection(&mut self, hit: Option<ButtonId>) {
        match hit {
            Some(ButtonId::User(i)) => {
                let Some(name) = self
                    .users
                    .book()
                    .records()
                    .get(i)
                    .map(|u| u.username.clone())
                else {
                    return;
                };
                let changed = self.current_user.as_deref() != Some(name.as_str());
                log::info!("Player {} selected", name);
                self.current_user = Some(name);
                if changed {
                    self.restart();
                } else {
                    self.enter_playing();
                }
            }
            Some(ButtonId::NewUser) => {
                self.new_user_text.clear();
                self.set_screen(Screen::NewUser);
            }
            Some(ButtonId::NextPage) => {
                let pages = ui::user_pages(&self.arena, self.users.book().len());
                self.user_page = (self.user_page + 1) % pages;
            }
            Some(ButtonId::Back) => self.set_screen(Screen::StartScreen),
            _ => {}
        }
    }

    fn new_user(&mut self, hit: Option<ButtonId>, keys: &[Key]) {
        for key in keys {
            match *key {
                Key::Char(c) if c.is_alphanumeric() || c == '_' || c == '-' => {
                    if self.new_user_text.chars().count() < MAX_USERNAME_LEN {
                        self.new_user_text.push(c);
                    }
                }
                Key::Char(_) => {}
                Key::Backspace => {
                    self.new_user_text.pop();
                }
                Key::Enter => {
                    self.confirm_new_user();
                    return;
                }
                Key::Escape => {
                    self.set_screen(Screen::UserSelection);
                    return;
                }
            }
        }

        match hit {
            Some(ButtonId::Confirm) => self.confirm_new_user(),
            Some(ButtonId::Cancel) => self.set_screen(Screen::UserSelection),
            _ => {}
        }
    }

    fn confirm_new_user(&mut self) {
        let name = self.new_user_text.trim().to_string();
        if !self.users.add_user(&name) {
            log::warn!("Cannot create player {:?}", name);
            return;
        }
        log::info!("Player {} created", name);
        self.new_user_text.clear();
        self.current_user = Some(name);
        self.restart();
    }

    fn playing(&mut self, input: &FrameInput) {
        if input.keys.contains(&Key::Char('b')) {
            self.set_screen(Screen::StartScreen);
            return;
        }

        tick(
            &mut self.session,
            input.pointer.primary,
            input.now,
            &self.arena,
            &self.settings,
        );

        if self.session.revive_pending {
            self.enter_revive_gate();
        }
    }

    fn enter_revive_gate(&mut self) {
        let ready = self.quiz.poll();
        let quiz = &self.quiz;
        match self
            .gate
            .enter(self.session.revive_chances, ready, || quiz.fallback())
        {
            ReviveEntry::Prompt => {
                self.set_screen(Screen::RevivePrompt);
                // Prefetch for the next revive
                self.quiz.request();
            }
            ReviveEntry::GameOver => self.end_game(),
        }
    }

    fn revive_prompt(&mut self, hit: Option<ButtonId>) {
        let Some(ButtonId::Option(selected)) = hit else {
            return;
        };
        match self.gate.answer(selected) {
            ReviveVerdict::Revived => {
                self.session.revive(&self.arena, &self.settings);
                self.set_screen(Screen::Playing);
            }
            ReviveVerdict::GameOver => self.end_game(),
        }
    }

    fn game_over(&mut self, hit: Option<ButtonId>, keys: &[Key]) {
        if hit == Some(ButtonId::Restart) || keys.contains(&Key::Char('r')) {
            self.restart();
        } else if hit == Some(ButtonId::SelectUser) {
            self.set_screen(Screen::UserSelection);
        }
    }

    /// Finish the run and propose a record update for the active player
    fn end_game(&mut self) {
        self.session.finish();
        self.gate.clear();
        if let Some(name) = &self.current_user {
            let revives_used = self
                .settings
                .max_revives
                .saturating_sub(self.session.revive_chances);
            if self
                .users
                .upsert_user(name, self.session.score, self.session.level, revives_used)
            {
                log::info!("New personal best for {}", name);
            }
        }
        self.set_screen(Screen::GameOver);
    }
}
