//! Move resolution
//!
//! Every check runs against the candidate head before anything is
//! committed, so an illegal position is never stored. The cheap checks
//! (obstacles, arena edge) go first; the body scan goes last among the
//! fatal checks.

use serde::{Deserialize, Serialize};

use super::geometry::{Point, distance};
use super::obstacle::ObstacleField;
use super::snake::SnakeBody;
use super::state::Arena;
use crate::settings::Settings;

/// What killed the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Obstacle,
    Boundary,
    SelfCollision,
}

/// Verdict for one candidate head position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Legal move, no food
    Continue,
    /// Illegal move; nothing may be committed
    Fatal(DeathCause),
    /// Legal move that reaches the food
    Fed,
}

impl Outcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Outcome::Fatal(_))
    }
}

/// Resolve a candidate head against obstacles, arena edge, body and food
///
/// First match wins: obstacle, boundary, self-collision, food.
pub fn resolve(
    body: &SnakeBody,
    candidate: Point,
    obstacles: &ObstacleField,
    arena: &Arena,
    food: Point,
    settings: &Settings,
) -> Outcome {
    if obstacles.contains_any(candidate) {
        return Outcome::Fatal(DeathCause::Obstacle);
    }

    if !arena.contains_inset(candidate, arena.px(settings.boundary_inset)) {
        return Outcome::Fatal(DeathCause::Boundary);
    }

    if body.self_collision(
        candidate,
        settings.self_collision_skip,
        arena.px(settings.node_radius),
        arena.px(settings.segment_threshold),
    ) {
        return Outcome::Fatal(DeathCause::SelfCollision);
    }

    if distance(candidate, food) < arena.px(settings.eat_radius) {
        return Outcome::Fed;
    }

    Outcome::Continue
}
