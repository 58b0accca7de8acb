//! Error taxonomy for the game core and its persistence boundary.

use std::io;

use thiserror::Error;

/// Failures reported by a player store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown player: {0}")]
    UnknownPlayer(String),
}

/// Failures surfaced by [`crate::game::Game::handle`].
///
/// None of these are fatal; the state machine keeps the state it had before
/// the failing event.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("Invalid level: {0}")]
    InvalidLevel(u32),

    #[error("No free cell left for food placement")]
    NoFreeCell,
}

pub type Result<T> = std::result::Result<T, GameError>;
