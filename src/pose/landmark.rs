//! Landmark and skeleton types as produced by the pose model

use serde::{Deserialize, Serialize};

use super::geometry::Point;

// MediaPipe Pose indices (33 landmarks per skeleton)
pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;

/// Landmarks that make up the collision hitbox (head, shoulders, hips)
pub const HITBOX_LANDMARKS: [usize; 5] = [NOSE, LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_HIP, RIGHT_HIP];

/// A single tracked point in normalized image coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// 0-1 across the frame width
    pub x: f32,
    /// 0-1 down the frame height
    pub y: f32,
    /// Relative depth
    #[serde(default)]
    pub z: f32,
    /// Model confidence, passed through unchecked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: None,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// One detected person in one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Skeleton {
    landmarks: Vec<Landmark>,
}

impl Skeleton {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Landmark at a schema index. Indices the model did not supply read as
    /// the origin; low-confidence or out-of-range values are used as-is.
    pub fn get(&self, index: usize) -> Landmark {
        self.landmarks.get(index).copied().unwrap_or_default()
    }

    pub fn set(&mut self, index: usize, landmark: Landmark) {
        if self.landmarks.len() <= index {
            self.landmarks.resize(index + 1, Landmark::default());
        }
        self.landmarks[index] = landmark;
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn nose(&self) -> Point {
        self.get(NOSE).point()
    }

    pub fn left_shoulder(&self) -> Point {
        self.get(LEFT_SHOULDER).point()
    }

    pub fn right_shoulder(&self) -> Point {
        self.get(RIGHT_SHOULDER).point()
    }

    pub fn left_elbow(&self) -> Point {
        self.get(LEFT_ELBOW).point()
    }

    pub fn right_elbow(&self) -> Point {
        self.get(RIGHT_ELBOW).point()
    }

    pub fn left_wrist(&self) -> Point {
        self.get(LEFT_WRIST).point()
    }

    pub fn right_wrist(&self) -> Point {
        self.get(RIGHT_WRIST).point()
    }

    /// Midpoint between both wrists
    pub fn hand_center(&self) -> Point {
        self.left_wrist().midpoint(self.right_wrist())
    }
}
