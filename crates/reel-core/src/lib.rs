//! Core reel library (stories, playback, config).

pub mod config;
pub mod interrupt;
pub mod logging;
pub mod player;
pub mod story;
