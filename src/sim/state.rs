//! Game state and core simulation types
//!
//! `GameSession` is created on new game / restart, mutated once per frame
//! by the tick, and read by the renderer. Nothing here is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::DeathCause;
use super::food::place_food;
use super::geometry::Point;
use super::obstacle::ObstacleField;
use super::snake::SnakeBody;
use crate::consts::*;
use crate::settings::Settings;

/// Playing field in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// Multiplier applied to pixel distances tuned for 640x480
    pub scale: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, ARENA_HEIGHT)
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scale: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    #[inline]
    pub fn center(&self) -> Point {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Scale a distance tuned for the reference arena
    #[inline]
    pub fn px(&self, v: f32) -> f32 {
        v * self.scale
    }

    /// Whether `p` is at least `inset` inside every edge
    pub fn contains_inset(&self, p: Point, inset: f32) -> bool {
        p.x >= inset && p.x <= self.width - inset && p.y >= inset && p.y <= self.height - inset
    }

    /// Fixed food position used when random placement fails
    pub fn fallback_food(&self) -> Point {
        Vec2::new(self.width / 2.0, self.px(PLACEMENT_MARGIN))
    }
}

/// Which screen the engine is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    StartScreen,
    UserSelection,
    NewUser,
    /// The only screen where the snake moves
    Playing,
    RevivePrompt,
    GameOver,
}

/// Something noteworthy that happened during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    FoodEaten { points: u64, score: u64 },
    LevelUp { level: u32 },
    Died(DeathCause),
    Revived { chances_left: u8 },
    GameOver { score: u64, level: u32 },
}

/// Derive the obstacle RNG for a level from the session seed
pub fn level_rng(seed: u64, level: u32) -> Pcg32 {
    Pcg32::seed_from_u64((level as u64).wrapping_mul(2654435761).wrapping_add(seed))
}

/// One run of the game
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Session seed (fresh per session, not meant for replay)
    pub seed: u64,
    pub score: u64,
    pub level: u32,
    pub revive_chances: u8,
    pub food: Point,
    pub obstacles: ObstacleField,
    pub snake: SnakeBody,
    /// Terminal flag; no further moves once set
    pub game_over: bool,
    /// A fatal move is waiting on the revive gate
    pub revive_pending: bool,
    /// Last pointer seen, reused when a frame has none
    pub last_pointer: Option<Point>,
    /// Frame time of the last attempted move
    pub last_move_time: Option<f64>,
    /// Events produced by the most recent frame
    pub events: Vec<GameEvent>,
    rng: Pcg32,
}

impl GameSession {
    /// Fresh session with a random seed
    pub fn new(arena: &Arena, settings: &Settings) -> Self {
        Self::with_seed(arena, settings, rand::random())
    }

    /// Fresh session: level 1, full revive chances, centred snake
    pub fn with_seed(arena: &Arena, settings: &Settings, seed: u64) -> Self {
        let snake = SnakeBody::new(
            arena.center(),
            arena.px(settings.segment_spacing),
            settings.initial_length,
        );
        let mut session = Self {
            seed,
            score: 0,
            level: 1,
            revive_chances: settings.max_revives,
            food: arena.fallback_food(),
            obstacles: ObstacleField::empty(),
            snake,
            game_over: false,
            revive_pending: false,
            last_pointer: None,
            last_move_time: None,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        session.regenerate_food(arena, settings);
        session.regenerate_obstacles(arena, settings);
        log::info!("New session (seed {})", seed);
        session
    }

    /// Replace the food with a new clear position
    pub fn regenerate_food(&mut self, arena: &Arena, settings: &Settings) {
        self.food = place_food(arena, &self.snake, &self.obstacles, settings, &mut self.rng);
    }

    /// Replace the whole obstacle set for the current level
    pub fn regenerate_obstacles(&mut self, arena: &Arena, settings: &Settings) {
        let mut rng = level_rng(self.seed, self.level);
        self.obstacles =
            ObstacleField::generate(self.level, arena, &self.snake, self.food, settings, &mut rng);
    }

    /// Put a fresh snake back at the spawn point, keeping score and level
    ///
    /// Consumes one revive chance and clears the fatal state. Food is
    /// re-placed so it is clear of the new body.
    pub fn revive(&mut self, arena: &Arena, settings: &Settings) {
        let spawn = spawn_point(arena, &self.obstacles, settings);
        self.snake = SnakeBody::new(
            spawn,
            arena.px(settings.segment_spacing),
            settings.initial_length,
        );
        self.revive_chances = self.revive_chances.saturating_sub(1);
        self.game_over = false;
        self.revive_pending = false;
        self.last_pointer = None;
        self.last_move_time = None;
        self.regenerate_food(arena, settings);
        self.events.push(GameEvent::Revived {
            chances_left: self.revive_chances,
        });
        log::info!(
            "Revived at level {} with score {}, {} chances left",
            self.level,
            self.score,
            self.revive_chances
        );
    }

    /// Mark the run as finished
    pub fn finish(&mut self) {
        self.game_over = true;
        self.revive_pending = false;
        self.events.push(GameEvent::GameOver {
            score: self.score,
            level: self.level,
        });
        log::info!("Game over: score {} at level {}", self.score, self.level);
    }
}

/// Where a fresh snake is placed
///
/// The arena centre, unless an obstacle covers any node of the initial
/// body there; then the first clear quadrant centre.
pub fn spawn_point(arena: &Arena, obstacles: &ObstacleField, settings: &Settings) -> Point {
    let spacing = arena.px(settings.segment_spacing);
    let clear = |head: Point| {
        SnakeBody::new(head, spacing, settings.initial_length)
            .points()
            .iter()
            .all(|&p| !obstacles.contains_any(p))
    };

    let center = arena.center();
    if clear(center) {
        return center;
    }

    let (qx, qy) = (arena.width / 4.0, arena.height / 4.0);
    [
        Vec2::new(center.x + qx, center.y - qy),
        Vec2::new(center.x + qx, center.y + qy),
        Vec2::new(center.x - qx, center.y - qy),
        Vec2::new(center.x - qx, center.y + qy),
    ]
    .into_iter()
    .find(|&p| clear(p))
    .unwrap_or(center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::distance;
    use crate::sim::obstacle::{Obstacle, ObstacleOrigin};

    #[test]
    fn test_new_session_defaults() {
        let arena = Arena::default();
        let settings = Settings::default();
        let session = GameSession::with_seed(&arena, &settings, 42);
        assert_eq!(session.score, 0);
        assert_eq!(session.level, 1);
        assert_eq!(session.revive_chances, 3);
        assert_eq!(session.snake.len(), 3);
        assert_eq!(session.snake.head(), arena.center());
        assert!(!session.game_over);
        assert!(!session.obstacles.contains_any(session.food));
        for &p in session.snake.points() {
            assert!(!session.obstacles.contains_any(p));
        }
    }

    #[test]
    fn test_level_rng_differs_per_level() {
        use rand::Rng;
        let a: u64 = level_rng(1, 1).random();
        let b: u64 = level_rng(1, 2).random();
        let c: u64 = level_rng(1, 1).random();
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_revive_keeps_score_and_level() {
        let arena = Arena::default();
        let settings = Settings::default();
        let mut session = GameSession::with_seed(&arena, &settings, 9);
        session.score = 120;
        session.level = 3;
        session.snake = SnakeBody::new(Vec2::new(100.0, 100.0), 20.0, 9);
        session.revive_pending = true;

        session.revive(&arena, &settings);
        assert_eq!(session.score, 120);
        assert_eq!(session.level, 3);
        assert_eq!(session.revive_chances, 2);
        assert_eq!(session.snake.len(), 3);
        assert_eq!(session.snake.target_length(), 3);
        assert!(!session.revive_pending);
        for &p in session.snake.points() {
            assert!(distance(p, session.food) > settings.food_clearance);
        }
        assert_eq!(
            session.events.last(),
            Some(&GameEvent::Revived { chances_left: 2 })
        );
    }

    #[test]
    fn test_spawn_avoids_cross() {
        let arena = Arena::default();
        let settings = Settings::default();
        let c = arena.center();
        let cross = ObstacleField::from_obstacles(vec![
            Obstacle::bar(ObstacleOrigin::Cross, c.x - 10.0, c.y - 50.0, 20.0, 100.0),
            Obstacle::bar(ObstacleOrigin::Cross, c.x - 50.0, c.y - 10.0, 100.0, 20.0),
        ]);
        let spawn = spawn_point(&arena, &cross, &settings);
        assert_ne!(spawn, c);
        assert!(!cross.contains_any(spawn));
        assert_eq!(spawn_point(&arena, &ObstacleField::empty(), &settings), c);
    }

    #[test]
    fn test_arena_inset() {
        let arena = Arena::default();
        assert!(arena.contains_inset(Vec2::new(5.0, 5.0), 5.0));
        assert!(!arena.contains_inset(Vec2::new(4.9, 100.0), 5.0));
        assert!(!arena.contains_inset(Vec2::new(100.0, 475.1), 5.0));
    }
}
