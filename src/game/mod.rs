//! Simulation core: geometry, levels, food, the snake and the state machine.

mod food;
mod geometry;
pub mod level;
mod snake;
mod state;

pub use food::{Food, Placer, SpecialFood};
pub use geometry::Rect;
pub use level::Level;
pub use snake::{Heading, Snake, initial_step};
pub use state::{Cue, Event, Game, GameState, Phase, Round, Step, View};
