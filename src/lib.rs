//! A level-based snake game: three wall layouts, timed bonus food, and
//! per-player progress kept in a save file.

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod store;

pub use error::{GameError, Result, StoreError};
