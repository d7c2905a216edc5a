//! One Playing frame
//!
//! Advances the snake toward the pointer, resolves the candidate head and
//! either commits the move (with growth and scoring on food) or flags the
//! session for the revive gate. A frame commits a whole move or nothing.

use super::collision::{Outcome, resolve};
use super::geometry::Point;
use super::scoring::credit_food;
use super::state::{Arena, GameEvent, GameSession};
use crate::clamp_to_bounds;
use crate::settings::Settings;

/// Advance the session by one frame at time `now` (seconds)
///
/// `pointer` is the tracked target this frame, if any. Returns the
/// outcome of the move, or `None` when no move was attempted.
pub fn tick(
    session: &mut GameSession,
    pointer: Option<Point>,
    now: f64,
    arena: &Arena,
    settings: &Settings,
) -> Option<Outcome> {
    if session.game_over || session.revive_pending {
        return None;
    }

    // Missing input: reuse the last pointer, or hold still if none yet
    let pointer = match pointer {
        Some(p) => {
            session.last_pointer = Some(p);
            p
        }
        None => session.last_pointer?,
    };

    if let Some(last) = session.last_move_time {
        if now - last < settings.move_interval {
            return None;
        }
    }
    session.last_move_time = Some(now);

    let target = clamp_to_bounds(
        pointer,
        arena.width,
        arena.height,
        arena.px(settings.target_margin),
    );
    let candidate = session.snake.advance(
        target,
        arena.px(settings.max_speed),
        arena.px(settings.dead_zone),
    )?;

    let outcome = resolve(
        &session.snake,
        candidate,
        &session.obstacles,
        arena,
        session.food,
        settings,
    );

    match outcome {
        Outcome::Fatal(cause) => {
            session.revive_pending = true;
            session.events.push(GameEvent::Died(cause));
            log::info!("Snake died ({:?}) at {:?}", cause, candidate);
        }
        Outcome::Fed => {
            session.snake.commit(candidate, true);

            let fed = credit_food(session.score, session.level, settings);
            session.score = fed.score;
            session.events.push(GameEvent::FoodEaten {
                points: fed.points,
                score: fed.score,
            });

            if fed.leveled_up {
                session.level = fed.level;
                session.regenerate_obstacles(arena, settings);
                session.events.push(GameEvent::LevelUp { level: fed.level });
                log::info!(
                    "Level {} reached, {} obstacles",
                    fed.level,
                    session.obstacles.len()
                );
            }

            session.regenerate_food(arena, settings);
        }
        Outcome::Continue => {
            session.snake.commit(candidate, false);
        }
    }

    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::DeathCause;
    use crate::sim::geometry::distance;
    use crate::sim::obstacle::{Obstacle, ObstacleField, ObstacleOrigin};
    use glam::Vec2;

    fn open_session() -> (GameSession, Arena, Settings) {
        let arena = Arena::default();
        let settings = Settings::default();
        let mut session = GameSession::with_seed(&arena, &settings, 1234);
        session.obstacles = ObstacleField::empty();
        session.food = Vec2::new(500.0, 100.0);
        (session, arena, settings)
    }

    #[test]
    fn test_no_pointer_ever_holds_still() {
        let (mut session, arena, settings) = open_session();
        let before = session.snake.clone();
        assert_eq!(tick(&mut session, None, 0.0, &arena, &settings), None);
        assert_eq!(session.snake, before);
    }

    #[test]
    fn test_missing_pointer_reuses_last() {
        let (mut session, arena, settings) = open_session();
        let target = Vec2::new(400.0, 240.0);
        tick(&mut session, Some(target), 0.0, &arena, &settings);
        let head = session.snake.head();
        tick(&mut session, None, 1.0, &arena, &settings);
        assert!(session.snake.head().x > head.x);
    }

    #[test]
    fn test_move_interval_limits_rate() {
        let (mut session, arena, settings) = open_session();
        let target = Vec2::new(400.0, 240.0);
        assert!(tick(&mut session, Some(target), 0.0, &arena, &settings).is_some());
        assert!(tick(&mut session, Some(target), 0.02, &arena, &settings).is_none());
        assert!(tick(&mut session, Some(target), 0.06, &arena, &settings).is_some());
    }

    #[test]
    fn test_pointer_is_clamped_inside_margin() {
        let (mut session, arena, settings) = open_session();
        session.snake = crate::sim::snake::SnakeBody::new(Vec2::new(30.0, 240.0), 20.0, 1);
        for i in 0..10 {
            tick(&mut session, Some(Vec2::new(-50.0, 240.0)), i as f64, &arena, &settings);
        }
        assert!(!session.revive_pending);
        assert!((session.snake.head().x - 20.0).abs() < 3.0);
    }

    #[test]
    fn test_fatal_commits_nothing() {
        let (mut session, arena, settings) = open_session();
        session.obstacles = ObstacleField::from_obstacles(vec![Obstacle::bar(
            ObstacleOrigin::Scatter,
            325.0,
            200.0,
            40.0,
            80.0,
        )]);
        let before = session.snake.clone();
        let out = tick(&mut session, Some(Vec2::new(400.0, 240.0)), 0.0, &arena, &settings);
        assert_eq!(out, Some(Outcome::Fatal(DeathCause::Obstacle)));
        assert!(session.revive_pending);
        assert_eq!(session.snake, before);

        // Further frames do nothing until the gate resolves
        assert_eq!(tick(&mut session, Some(Vec2::new(400.0, 240.0)), 1.0, &arena, &settings), None);
    }

    #[test]
    fn test_eating_scores_and_replaces_food() {
        let (mut session, arena, settings) = open_session();
        session.food = Vec2::new(330.0, 240.0);
        let out = tick(&mut session, Some(Vec2::new(400.0, 240.0)), 0.0, &arena, &settings);
        assert_eq!(out, Some(Outcome::Fed));
        assert_eq!(session.score, 15);
        assert_eq!(session.snake.target_length(), 4);
        assert_ne!(session.food, Vec2::new(330.0, 240.0));
        assert!(distance(session.food, session.snake.head()) > settings.food_clearance);
    }

    #[test]
    fn test_level_up_regenerates_obstacles() {
        let (mut session, arena, settings) = open_session();
        session.score = 60;
        session.food = Vec2::new(330.0, 240.0);
        tick(&mut session, Some(Vec2::new(400.0, 240.0)), 0.0, &arena, &settings);
        assert_eq!(session.score, 75);
        assert_eq!(session.level, 2);
        assert!(session.events.contains(&GameEvent::LevelUp { level: 2 }));
        // Freshly generated for level 2 (was emptied above)
        assert!(!session.obstacles.is_empty());
    }
}
