//! Food placement and the two kinds of food on the board.

use rand::Rng;
use tracing::{debug, warn};

use crate::config::{PLACEMENT_ATTEMPTS, board};
use crate::error::{GameError, Result};

use super::Rect;

/// Picks grid-aligned squares that stay clear of the snake, the walls of
/// every layout, and the board edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placer {
    size: i32,
    board: Rect,
}

impl Placer {
    pub fn new(size: i32) -> Self {
        Self {
            size,
            board: board(),
        }
    }

    /// Samples random cells until a free one turns up. After
    /// [`PLACEMENT_ATTEMPTS`] misses it walks the grid in row order instead.
    pub fn place<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        body: &[Rect],
        layouts: &[&[Rect]],
    ) -> Result<Rect> {
        let (columns, rows) = self.grid();
        for _ in 0..PLACEMENT_ATTEMPTS {
            let cell = self.cell(rng.random_range(0..=columns), rng.random_range(0..=rows));
            if self.is_free(&cell, body, layouts) {
                return Ok(cell);
            }
        }

        warn!(size = self.size, "Random placement exhausted, scanning for a free cell");
        (0..=rows)
            .flat_map(|row| (0..=columns).map(move |column| (column, row)))
            .map(|(column, row)| self.cell(column, row))
            .find(|cell| self.is_free(cell, body, layouts))
            .ok_or(GameError::NoFreeCell)
    }

    pub fn is_free(&self, cell: &Rect, body: &[Rect], layouts: &[&[Rect]]) -> bool {
        !self.touches_edge(cell)
            && !body.iter().any(|segment| segment.overlaps(cell))
            && !layouts
                .iter()
                .flat_map(|walls| walls.iter())
                .any(|wall| wall.overlaps(cell))
    }

    fn touches_edge(&self, cell: &Rect) -> bool {
        cell.x <= self.board.left()
            || cell.x >= self.board.right() - self.size
            || cell.y <= self.board.top()
            || cell.y >= self.board.bottom() - self.size
    }

    fn grid(&self) -> (i32, i32) {
        (
            (self.board.width - self.size) / self.size,
            (self.board.height - self.size) / self.size,
        )
    }

    fn cell(&self, column: i32, row: i32) -> Rect {
        Rect::square(column * self.size, row * self.size, self.size)
    }
}

/// Regular food: always on the board, moved whenever it is eaten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Food {
    placer: Placer,
    rect: Rect,
}

impl Food {
    pub fn new<R: Rng + ?Sized>(
        size: i32,
        rng: &mut R,
        body: &[Rect],
        layouts: &[&[Rect]],
    ) -> Result<Self> {
        let placer = Placer::new(size);
        let rect = placer.place(rng, body, layouts)?;
        Ok(Self { placer, rect })
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Moves the food to a new free cell. On failure the food stays put.
    pub fn respawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        body: &[Rect],
        layouts: &[&[Rect]],
    ) -> Result<()> {
        self.rect = self.placer.place(rng, body, layouts)?;
        debug!(x = self.rect.x, y = self.rect.y, "Food placed");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }
}

/// Food that appears for a while, then vanishes, on a tick-counted cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialFood {
    food: Food,
    active: bool,
    timer: u32,
    spawn_interval: u32,
    life_time: u32,
}

impl SpecialFood {
    /// Starts dormant with the timer at zero.
    pub fn new<R: Rng + ?Sized>(
        size: i32,
        spawn_interval: u32,
        life_time: u32,
        rng: &mut R,
        body: &[Rect],
        layouts: &[&[Rect]],
    ) -> Result<Self> {
        Ok(Self {
            food: Food::new(size, rng, body, layouts)?,
            active: false,
            timer: 0,
            spawn_interval,
            life_time,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// The square to draw and test against, only while active.
    pub fn rect(&self) -> Option<Rect> {
        self.active.then(|| self.food.rect())
    }

    /// Ticks left before an active special food disappears.
    pub fn remaining_ticks(&self) -> Option<u32> {
        self.active
            .then(|| self.life_time.saturating_sub(self.timer))
    }

    /// Advances the timer by one tick. Returns `true` on the tick it appears.
    ///
    /// A failed placement keeps it dormant so the next tick tries again.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        body: &[Rect],
        layouts: &[&[Rect]],
    ) -> Result<bool> {
        self.timer += 1;
        if !self.active {
            if self.timer >= self.spawn_interval {
                self.food.respawn(rng, body, layouts)?;
                self.active = true;
                self.timer = 0;
                return Ok(true);
            }
        } else if self.timer >= self.life_time {
            self.active = false;
            self.timer = 0;
        }
        Ok(false)
    }

    pub fn consume(&mut self) {
        self.active = false;
        self.timer = 0;
    }

    #[cfg(test)]
    pub(crate) fn force_active(&mut self, rect: Rect) {
        self.food.set_rect(rect);
        self.active = true;
        self.timer = 0;
    }
}
