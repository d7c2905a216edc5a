//! Procedural obstacle layouts
//!
//! Each level gets a fresh set: a randomized scatter of rectangles and
//! circles placed with bounded retries, plus fixed walls and crossed bars
//! at the higher levels. Clearance is checked with inflated bounding
//! circles rather than exact shape intersection.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Point, distance, point_in_circle, point_in_rect};
use super::snake::SnakeBody;
use super::state::Arena;
use crate::consts::*;
use crate::settings::Settings;

/// Shape of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rectangle,
    /// Disk inscribed in the bounding box
    Circle,
}

/// Where an obstacle came from (drives its color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleOrigin {
    /// Randomly placed for the level
    Scatter,
    /// Border strip (level 5+)
    Wall,
    /// Central cross bar (level 8+)
    Cross,
}

/// A static obstacle, immutable once placed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub origin: ObstacleOrigin,
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    /// Bounding box width and height
    pub size: Vec2,
    /// RGB render color
    pub color: [u8; 3],
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, origin: ObstacleOrigin, pos: Vec2, size: Vec2) -> Self {
        Self {
            kind,
            origin,
            pos,
            size,
            color: Self::color_for(kind, origin),
        }
    }

    /// Fixed rectangular bar (walls and cross)
    pub fn bar(origin: ObstacleOrigin, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(ObstacleKind::Rectangle, origin, Vec2::new(x, y), Vec2::new(w, h))
    }

    fn color_for(kind: ObstacleKind, origin: ObstacleOrigin) -> [u8; 3] {
        match (origin, kind) {
            (ObstacleOrigin::Wall | ObstacleOrigin::Cross, _) => [70, 70, 200],
            (ObstacleOrigin::Scatter, ObstacleKind::Rectangle) => [100, 100, 255],
            (ObstacleOrigin::Scatter, ObstacleKind::Circle) => [150, 100, 255],
        }
    }

    /// Centre of the bounding box
    #[inline]
    pub fn center(&self) -> Point {
        self.pos + self.size / 2.0
    }

    /// Radius of the disk for circle obstacles
    #[inline]
    pub fn disk_radius(&self) -> f32 {
        self.size.x.min(self.size.y) / 2.0
    }

    /// Radius of a circle around `center()` enclosing the whole shape
    pub fn bounding_radius(&self) -> f32 {
        match self.kind {
            ObstacleKind::Rectangle => self.size.length() / 2.0,
            ObstacleKind::Circle => self.disk_radius(),
        }
    }

    /// Point-in-shape test (edges count as inside)
    pub fn contains_point(&self, p: Point) -> bool {
        match self.kind {
            ObstacleKind::Rectangle => point_in_rect(p, self.pos, self.size),
            ObstacleKind::Circle => point_in_circle(p, self.center(), self.disk_radius()),
        }
    }

    /// Inflated-circle overlap test against a point with its own radius
    #[inline]
    fn clears(&self, p: Point, clearance: f32) -> bool {
        distance(self.center(), p) > self.bounding_radius() + clearance
    }
}

/// The obstacle set of one level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_obstacles(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    /// Build the layout for `level`
    ///
    /// Random obstacles that cannot find a clear spot within the attempt
    /// budget are dropped, so a level may hold fewer than requested.
    pub fn generate<R: Rng>(
        level: u32,
        arena: &Arena,
        snake: &SnakeBody,
        food: Point,
        settings: &Settings,
        rng: &mut R,
    ) -> Self {
        let mut obstacles: Vec<Obstacle> = Vec::new();

        let requested = 2 + level * rng.random_range(5..=15);
        let center = arena.center();
        let safe_radius = arena.px(settings.safe_zone_radius);
        let margin = arena.px(PLACEMENT_MARGIN);

        for _ in 0..requested {
            // Size and shape are fixed per obstacle; only the position is retried
            let min_size = (20 + level * rng.random_range(5..=10)) as f32;
            let max_size = (40 + level * rng.random_range(15..=20)) as f32;
            let size = Vec2::new(
                rng.random_range(min_size..=max_size),
                rng.random_range(min_size..=max_size),
            ) * arena.scale;

            let kind = if rng.random::<f64>() < level as f64 * 0.08 {
                ObstacleKind::Circle
            } else {
                ObstacleKind::Rectangle
            };

            let max_x = arena.width - size.x - margin;
            let max_y = arena.height - size.y - margin;
            if max_x < margin || max_y < margin {
                continue;
            }

            for _ in 0..settings.obstacle_attempts {
                let pos = Vec2::new(
                    rng.random_range(margin..=max_x),
                    rng.random_range(margin..=max_y),
                );
                let candidate = Obstacle::new(kind, ObstacleOrigin::Scatter, pos, size);

                let clear = candidate.clears(center, safe_radius)
                    && snake
                        .points()
                        .iter()
                        .all(|&p| candidate.clears(p, arena.px(settings.node_radius)))
                    && candidate.clears(food, arena.px(NODE_DRAW_RADIUS))
                    && obstacles
                        .iter()
                        .all(|o| candidate.clears(o.center(), o.bounding_radius()));

                if clear {
                    obstacles.push(candidate);
                    break;
                }
            }
        }

        log::debug!(
            "Level {}: placed {}/{} random obstacles",
            level,
            obstacles.len(),
            requested
        );

        if level >= BORDER_WALL_LEVEL {
            let t = arena.px(BORDER_WALL_THICKNESS);
            let (w, h) = (arena.width, arena.height);
            obstacles.push(Obstacle::bar(ObstacleOrigin::Wall, 0.0, 0.0, w, t));
            obstacles.push(Obstacle::bar(ObstacleOrigin::Wall, 0.0, 0.0, t, h));
            obstacles.push(Obstacle::bar(ObstacleOrigin::Wall, 0.0, h - t, w, t));
            obstacles.push(Obstacle::bar(ObstacleOrigin::Wall, w - t, 0.0, t, h));
        }

        if level >= CROSS_LEVEL {
            let bw = arena.px(CROSS_BAR_WIDTH);
            let bl = arena.px(CROSS_BAR_LENGTH);
            obstacles.push(Obstacle::bar(
                ObstacleOrigin::Cross,
                center.x - bw / 2.0,
                center.y - bl / 2.0,
                bw,
                bl,
            ));
            obstacles.push(Obstacle::bar(
                ObstacleOrigin::Cross,
                center.x - bl / 2.0,
                center.y - bw / 2.0,
                bl,
                bw,
            ));
        }

        Self { obstacles }
    }

    /// True if `p` lies inside any obstacle
    pub fn contains_any(&self, p: Point) -> bool {
        self.obstacles.iter().any(|o| o.contains_point(p))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
