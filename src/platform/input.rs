//! Input boundary
//!
//! Hand tracking delivers 21 landmarks per frame; only the index and
//! thumb fingertips matter here. The index tip steers, and bringing the
//! thumb tip close to it is a "pinch" that acts as a click.

use glam::Vec2;

use crate::engine::{FrameInput, Key};
use crate::settings::Settings;
use crate::sim::geometry::{Point, distance};

/// Landmarks per tracked hand
pub const HAND_LANDMARKS: usize = 21;

const THUMB_TIP: usize = 4;
const INDEX_TIP: usize = 8;

/// One tracked hand in arena coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    landmarks: [Point; HAND_LANDMARKS],
}

impl HandObservation {
    pub fn new(landmarks: [Point; HAND_LANDMARKS]) -> Self {
        Self { landmarks }
    }

    /// Build from a tracker's landmark list; `None` unless it has exactly 21 points
    pub fn from_landmarks(points: &[Point]) -> Option<Self> {
        let landmarks: [Point; HAND_LANDMARKS] = points.try_into().ok()?;
        Some(Self { landmarks })
    }

    pub fn index_tip(&self) -> Point {
        self.landmarks[INDEX_TIP]
    }

    pub fn thumb_tip(&self) -> Point {
        self.landmarks[THUMB_TIP]
    }

    pub fn landmarks(&self) -> &[Point; HAND_LANDMARKS] {
        &self.landmarks
    }

    /// Flip horizontally so a webcam feed behaves like a mirror
    pub fn mirrored(&self, width: f32) -> Self {
        Self {
            landmarks: self.landmarks.map(|p| Vec2::new(width - p.x, p.y)),
        }
    }
}

/// Pointer positions for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    /// Movement target and hit-test point
    pub primary: Option<Point>,
    /// Second control point, only used for pinch distance
    pub secondary: Option<Point>,
}

impl PointerSample {
    pub fn at(p: Point) -> Self {
        Self {
            primary: Some(p),
            secondary: None,
        }
    }

    /// Prefer the tracked hand, else the mouse
    pub fn from_sources(hand: Option<&HandObservation>, mouse: Option<Point>) -> Self {
        match hand {
            Some(hand) => Self {
                primary: Some(hand.index_tip()),
                secondary: Some(hand.thumb_tip()),
            },
            None => Self {
                primary: mouse,
                secondary: None,
            },
        }
    }

    /// Distance between the two control points, if both are tracked
    pub fn pinch_distance(&self) -> Option<f32> {
        Some(distance(self.primary?, self.secondary?))
    }
}

/// Debounces pinch and click into single activations
///
/// Fires on the frame a pinch starts or a click arrives, and never twice
/// within `cooldown` seconds. Holding a pinch does not re-fire.
#[derive(Debug, Clone)]
pub struct ActivationGate {
    pinch_threshold: f32,
    cooldown: f64,
    last_fired: Option<f64>,
    pinch_active: bool,
}

impl ActivationGate {
    pub fn new(pinch_threshold: f32, cooldown: f64) -> Self {
        Self {
            pinch_threshold,
            cooldown,
            last_fired: None,
            pinch_active: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.pinch_threshold, settings.activation_cooldown)
    }

    /// Whether the fingers are currently pinched
    pub fn pinch_active(&self) -> bool {
        self.pinch_active
    }

    pub fn set_pinch_threshold(&mut self, threshold: f32) {
        self.pinch_threshold = threshold;
    }

    /// Feed one frame; returns whether an activation fires now
    pub fn update(&mut self, sample: &PointerSample, clicked: bool, now: f64) -> bool {
        let pinched = sample
            .pinch_distance()
            .is_some_and(|d| d < self.pinch_threshold);
        let pinch_started = pinched && !self.pinch_active;
        self.pinch_active = pinched;

        if !(pinch_started || clicked) {
            return false;
        }
        if self.last_fired.is_some_and(|t| now - t < self.cooldown) {
            return false;
        }
        self.last_fired = Some(now);
        true
    }
}

/// Collects raw device state into `FrameInput`s
#[derive(Debug, Clone)]
pub struct InputAdapter {
    gate: ActivationGate,
    /// Mirror hand landmarks across this width
    mirror_width: Option<f32>,
}

impl InputAdapter {
    pub fn new(settings: &Settings) -> Self {
        Self {
            gate: ActivationGate::from_settings(settings),
            mirror_width: None,
        }
    }

    pub fn mirrored(mut self, width: f32) -> Self {
        self.mirror_width = Some(width);
        self
    }

    pub fn gate(&self) -> &ActivationGate {
        &self.gate
    }

    /// Pick up a changed pinch threshold
    pub fn sync_settings(&mut self, settings: &Settings) {
        self.gate.set_pinch_threshold(settings.pinch_threshold);
    }

    /// Build this frame's input
    ///
    /// `now` is the frame time in seconds.
    pub fn frame(
        &mut self,
        hand: Option<&HandObservation>,
        mouse: Option<Point>,
        clicked: bool,
        keys: Vec<Key>,
        now: f64,
    ) -> FrameInput {
        let hand = match (hand, self.mirror_width) {
            (Some(h), Some(w)) => Some(h.mirrored(w)),
            (h, _) => h.cloned(),
        };
        let pointer = PointerSample::from_sources(hand.as_ref(), mouse);
        let activation = self.gate.update(&pointer, clicked, now);
        FrameInput {
            pointer,
            activation,
            keys,
            now,
        }
    }
}
