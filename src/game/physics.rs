//! Hitboxes and projectile collision tests

use crate::pose::geometry::Bounds;
use crate::pose::landmark::HITBOX_LANDMARKS;
use crate::pose::{Point, Skeleton};

use super::combat::Projectile;
use super::rules::HITBOX_PADDING;

/// Physics helpers for the combat resolver
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Padded bounding box of head, shoulders and hips, in normalized space
    pub fn hitbox(skeleton: &Skeleton) -> Option<Bounds> {
        Bounds::enclosing(HITBOX_LANDMARKS.iter().map(|&idx| skeleton.get(idx).point()))
            .map(|b| b.expanded(HITBOX_PADDING))
    }

    /// Check if a projectile (pixel space) lies inside a skeleton's hitbox
    pub fn check_hit(projectile: &Projectile, skeleton: &Skeleton, width: f32, height: f32) -> bool {
        if width <= 0.0 || height <= 0.0 {
            return false;
        }
        let normalized = Point::new(projectile.x / width, projectile.y / height);
        Self::hitbox(skeleton)
            .map(|b| b.contains(normalized))
            .unwrap_or(false)
    }
}
