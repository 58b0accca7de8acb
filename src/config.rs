//! Game constants and runtime settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::game::Rect;

// Board
pub const SCREEN_WIDTH: i32 = 1080;
pub const SCREEN_HEIGHT: i32 = 720;

// Timing
pub const TICK_RATE: u32 = 15;
pub const MAX_TICK_RATE: u32 = 240;

// Snake
pub const SEGMENT_SIZE: i32 = 20;
pub const LEVEL_SPEED_BONUS: i32 = 2;
pub const STEP_GROW: i32 = 2;
pub const SPEED_INCREASE_INTERVAL: u32 = 3;
pub const WALL_THICKNESS: i32 = 15;
// Larger steps would let the head skip over a wall between two ticks
pub const MAX_STEP: i32 = SEGMENT_SIZE + WALL_THICKNESS - 1;

// Food
pub const FOOD_SIZE: i32 = 30;
pub const SPECIAL_FOOD_SIZE: i32 = 40;
pub const SPECIAL_SPAWN_SECONDS: u32 = 5;
pub const SPECIAL_LIFE_SECONDS: u32 = 5;
pub const PLACEMENT_ATTEMPTS: usize = 1_000;

// Progression
pub const MAX_LEVEL: u32 = 3;
pub const POINTS_PER_LEVEL: u32 = 5;

// Pointer regions
pub const START_BUTTON: Rect = Rect::new(100, 400, 340, 60);
pub const PLAY_AGAIN_BUTTON: Rect = Rect::new(370, 540, 340, 60);
pub const SAVE_GAME_BUTTON: Rect = Rect::new(100, 400, 340, 60);
pub const LOGIN_BUTTON: Rect = Rect::new(400, 500, 200, 50);
pub const NAME_FIELD: Rect = Rect::new(400, 400, 280, 50);

pub const SETTINGS_FILE: &str = "snake_settings.json";

/// The playfield rectangle.
pub const fn board() -> Rect {
    Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT)
}

/// Runtime settings read from [`SETTINGS_FILE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub save_path: String,
    pub volume: f32,
    pub tick_rate: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            save_path: "snake_save.json".to_string(),
            volume: 1.0,
            tick_rate: TICK_RATE,
        }
    }
}

impl Settings {
    /// Reads settings from `path`, falling back to defaults when the file is
    /// missing or malformed.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str::<Settings>(&text).map_err(|e| e.to_string()));
        match parsed {
            Ok(settings) => settings.sanitized(),
            Err(error) => {
                warn!(path = %path.display(), %error, "Ignoring unreadable settings file");
                Self::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        self.volume = self.volume.clamp(0.0, 1.0);
        if self.tick_rate == 0 {
            self.tick_rate = TICK_RATE;
        }
        self.tick_rate = self.tick_rate.min(MAX_TICK_RATE);
        self
    }
}
