//! Pose-driven two-player combat engine

pub mod config;
pub mod feed;
pub mod game;
pub mod pose;
pub mod util;
