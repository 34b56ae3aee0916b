//! Pose landmarks, geometry helpers and player-slot assignment

pub mod assignment;
pub mod geometry;
pub mod landmark;

pub use assignment::{assign_players, AssignedSkeletons};
pub use geometry::Point;
pub use landmark::{Landmark, Skeleton};
