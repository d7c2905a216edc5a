//! Gameplay simulation
//!
//! All gameplay rules live here. This module is single-threaded and
//! frame-stepped:
//! - One `tick` per input frame, called only on the Playing screen
//! - Candidate moves are resolved before anything is committed
//! - Randomness comes from per-session and per-level seeded RNGs
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod food;
pub mod geometry;
pub mod obstacle;
pub mod revive;
pub mod scoring;
pub mod snake;
pub mod state;
pub mod tick;

pub use collision::{DeathCause, Outcome, resolve};
pub use food::place_food;
pub use geometry::{Point, closest_point_on_segment, distance, point_near_segment};
pub use obstacle::{Obstacle, ObstacleField, ObstacleKind, ObstacleOrigin};
pub use revive::{ReviveEntry, ReviveGate, ReviveVerdict};
pub use scoring::{FedResult, credit_food};
pub use snake::SnakeBody;
pub use state::{Arena, GameEvent, GameSession, Screen, level_rng, spawn_point};
pub use tick::tick;
