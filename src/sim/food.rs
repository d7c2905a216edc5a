//! Food placement

use glam::Vec2;
use rand::Rng;

use super::geometry::{Point, distance};
use super::obstacle::ObstacleField;
use super::snake::SnakeBody;
use super::state::Arena;
use crate::consts::PLACEMENT_MARGIN;
use crate::settings::Settings;

/// Pick a food position clear of the snake and every obstacle
///
/// Falls back to `Arena::fallback_food` when the attempt budget runs out.
pub fn place_food<R: Rng>(
    arena: &Arena,
    snake: &SnakeBody,
    obstacles: &ObstacleField,
    settings: &Settings,
    rng: &mut R,
) -> Point {
    let margin = arena.px(PLACEMENT_MARGIN);
    let clearance = arena.px(settings.food_clearance);
    let (max_x, max_y) = (arena.width - margin, arena.height - margin);

    if max_x >= margin && max_y >= margin {
        for _ in 0..settings.food_attempts {
            let pos = Vec2::new(
                rng.random_range(margin..=max_x),
                rng.random_range(margin..=max_y),
            );
            if snake.points().iter().all(|&p| distance(pos, p) > clearance)
                && !obstacles.contains_any(pos)
            {
                return pos;
            }
        }
    }

    log::warn!("No clear food position found, using fallback");
    arena.fallback_food()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::{Obstacle, ObstacleOrigin};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_food_clear_of_snake_and_obstacles() {
        let arena = Arena::default();
        let settings = Settings::default();
        let snake = SnakeBody::new(arena.center(), 20.0, 3);
        let obstacles = ObstacleField::from_obstacles(vec![Obstacle::bar(
            ObstacleOrigin::Scatter,
            50.0,
            50.0,
            200.0,
            200.0,
        )]);
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let food = place_food(&arena, &snake, &obstacles, &settings, &mut rng);
            assert!(!obstacles.contains_any(food));
            for &p in snake.points() {
                assert!(distance(food, p) > settings.food_clearance);
            }
            assert!(food.x >= 50.0 && food.x <= 590.0);
            assert!(food.y >= 50.0 && food.y <= 430.0);
        }
    }

    #[test]
    fn test_food_falls_back_when_blocked() {
        let arena = Arena::default();
        let settings = Settings::default();
        let snake = SnakeBody::new(arena.center(), 20.0, 3);
        // One obstacle covering the whole arena
        let obstacles = ObstacleField::from_obstacles(vec![Obstacle::bar(
            ObstacleOrigin::Scatter,
            0.0,
            0.0,
            arena.width,
            arena.height,
        )]);
        let mut rng = Pcg32::seed_from_u64(3);
        let food = place_food(&arena, &snake, &obstacles, &settings, &mut rng);
        assert_eq!(food, arena.fallback_food());
    }
}
