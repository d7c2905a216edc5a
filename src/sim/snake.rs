//! The snake body: an ordered trail of head positions
//!
//! The head is index 0. The body never grid-steps; each committed move
//! pushes the new head position and drops the tail once the trail is
//! longer than `target_length`.

use glam::Vec2;

use super::geometry::{Point, distance, point_near_segment};

#[derive(Debug, Clone, PartialEq)]
pub struct SnakeBody {
    points: Vec<Point>,
    target_length: usize,
}

impl SnakeBody {
    /// Straight snake with its head at `head`, trailing to the left
    pub fn new(head: Point, spacing: f32, length: usize) -> Self {
        let length = length.max(1);
        let points = (0..length)
            .map(|i| head - Vec2::new(i as f32 * spacing, 0.0))
            .collect();
        Self {
            points,
            target_length: length,
        }
    }

    /// Build a body from explicit points (head first)
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let points: Vec<Point> = points.into_iter().collect();
        let target_length = points.len().max(1);
        Self {
            points,
            target_length,
        }
    }

    #[inline]
    pub fn head(&self) -> Point {
        self.points.first().copied().unwrap_or(Vec2::ZERO)
    }

    /// Body positions, head first
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    /// Candidate head position for this frame, or `None` inside the dead zone
    ///
    /// The step points from the head toward `target` and is at most
    /// `max_speed` long. Nothing is committed.
    pub fn advance(&self, target: Point, max_speed: f32, dead_zone: f32) -> Option<Point> {
        let head = self.head();
        let delta = target - head;
        let dist = delta.length();
        if dist < dead_zone {
            return None;
        }
        let step = dist.min(max_speed);
        Some(head + delta / dist * step)
    }

    /// Push `new_head` and trim the tail
    ///
    /// With `grow` the target length is raised by one first, so the trail
    /// keeps one more node than before.
    pub fn commit(&mut self, new_head: Point, grow: bool) {
        if grow {
            self.target_length += 1;
        }
        self.points.insert(0, new_head);
        self.points.truncate(self.target_length);
    }

    /// Whether `candidate` would hit the body
    ///
    /// The `skip` nodes nearest the head (and the segments between them)
    /// are ignored; the rest are tested as nodes of radius `node_radius`
    /// and as connecting segments of half-width `segment_threshold`.
    pub fn self_collision(
        &self,
        candidate: Point,
        skip: usize,
        node_radius: f32,
        segment_threshold: f32,
    ) -> bool {
        let points = self.points();

        if points
            .iter()
            .skip(skip)
            .any(|&p| distance(candidate, p) < node_radius)
        {
            return true;
        }

        points
            .windows(2)
            .skip(skip)
            .any(|seg| point_near_segment(candidate, seg[0], seg[1], segment_threshold))
    }
}
