//! Fixed wall layouts, one per level.

use crate::config::{MAX_LEVEL, WALL_THICKNESS as T, board};
use crate::error::{GameError, Result};

use super::Rect;

const LEVEL_ONE: [Rect; 7] = [
    Rect::new(100, 0, T, 800),
    Rect::new(700, 200, T, 700),
    Rect::new(700, 500, 300, T),
    Rect::new(800, 700, 280, T),
    Rect::new(800, 200, 280, T),
    Rect::new(0, 900, 715, T),
    Rect::new(300, 200, 415, T),
];

const LEVEL_TWO: [Rect; 6] = [
    Rect::new(100, 0, T, 1000),
    Rect::new(1000, 100, T, 980),
    Rect::new(700, 200, T, 785),
    Rect::new(300, 100, T, 700),
    Rect::new(200, 100, 815, T),
    Rect::new(100, 985, 800, T),
];

// Two corridors split by a long bar, each crossed by a row of columns.
const LEVEL_THREE: [Rect; 10] = [
    Rect::new(0, 600, 900, T),
    Rect::new(100, 400, 980, T),
    Rect::new(114, 60, T, 340),
    Rect::new(114, 600, T, 400),
    Rect::new(314, 60, T, 340),
    Rect::new(314, 600, T, 400),
    Rect::new(714, 60, T, 340),
    Rect::new(714, 600, T, 400),
    Rect::new(914, 60, T, 340),
    Rect::new(914, 600, T, 400),
];

/// Every level's walls, in level order.
pub const LAYOUTS: [&[Rect]; MAX_LEVEL as usize] = [&LEVEL_ONE, &LEVEL_TWO, &LEVEL_THREE];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    number: u32,
    walls: &'static [Rect],
    board: Rect,
}

impl Level {
    pub fn new(number: u32) -> Result<Self> {
        let walls = number
            .checked_sub(1)
            .and_then(|index| LAYOUTS.get(index as usize).copied())
            .ok_or(GameError::InvalidLevel(number))?;
        Ok(Self {
            number,
            walls,
            board: board(),
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn walls(&self) -> &'static [Rect] {
        self.walls
    }

    pub fn board(&self) -> Rect {
        self.board
    }

    pub fn is_final(&self) -> bool {
        self.number == MAX_LEVEL
    }

    /// True when `rect` hits a wall or touches/exceeds a board edge.
    pub fn check_collision(&self, rect: &Rect) -> bool {
        self.hits_wall(rect)
            || rect.left() <= self.board.left()
            || rect.right() >= self.board.right()
            || rect.top() <= self.board.top()
            || rect.bottom() >= self.board.bottom()
    }

    /// Like [`Level::check_collision`], but the edge test only looks at the
    /// rectangle's origin.
    pub fn check_collision_for_food(&self, rect: &Rect) -> bool {
        rect.x <= self.board.left()
            || rect.x >= self.board.right()
            || rect.y <= self.board.top()
            || rect.y >= self.board.bottom()
            || self.hits_wall(rect)
    }

    fn hits_wall(&self, rect: &Rect) -> bool {
        self.walls.iter().any(|wall| wall.overlaps(rect))
    }
}
