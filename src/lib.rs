//! Pinch Snake - a free-moving snake steered by a pointer
//!
//! Core modules:
//! - `sim`: Gameplay (movement, collisions, obstacles, scoring, revive rules)
//! - `engine`: Screen state machine driving the simulation once per frame
//! - `ui`: Hot-region layout and hit-testing for the menu screens
//! - `platform`: Input boundary (hand landmarks, pointer, activation debounce)
//! - `quiz`: Revive questions with a background provider and local fallback
//! - `users`: Player records and leaderboard
//! - `persistence`: Storage backends for player records
//! - `settings`: Data-driven game tuning
//! - `web`: Browser handle wrapping the engine (wasm only)

pub mod engine;
pub mod persistence;
pub mod platform;
pub mod quiz;
pub mod settings;
pub mod sim;
pub mod ui;
pub mod users;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use engine::{Engine, FrameInput, FrameView, Key};
pub use settings::Settings;
pub use users::{UserBook, UserRecord};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default arena size (matches a 640x480 camera frame)
    pub const ARENA_WIDTH: f32 = 640.0;
    pub const ARENA_HEIGHT: f32 = 480.0;

    /// Rendered radius of a snake node and of the food
    pub const NODE_DRAW_RADIUS: f32 = 12.0;

    /// Margin kept between random obstacles/food and the arena edge
    pub const PLACEMENT_MARGIN: f32 = 50.0;

    /// Fixed walls added from level 5
    pub const BORDER_WALL_LEVEL: u32 = 5;
    pub const BORDER_WALL_THICKNESS: f32 = 10.0;

    /// Crossed bars added from level 8
    pub const CROSS_LEVEL: u32 = 8;
    pub const CROSS_BAR_WIDTH: f32 = 20.0;
    pub const CROSS_BAR_LENGTH: f32 = 100.0;

    /// Maximum characters in a new username
    pub const MAX_USERNAME_LEN: usize = 15;

    /// Leaderboard rows shown on the start screen
    pub const LEADERBOARD_ROWS: usize = 5;
}

/// Clamp a point into the rectangle `[margin, w - margin] x [margin, h - margin]`
#[inline]
pub fn clamp_to_bounds(p: Vec2, width: f32, height: f32, margin: f32) -> Vec2 {
    Vec2::new(
        p.x.max(margin).min(width - margin),
        p.y.max(margin).min(height - margin),
    )
}
