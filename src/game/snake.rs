//! The snake: body segments, steering, movement and growth.

use crate::config::{
    LEVEL_SPEED_BONUS, MAX_STEP, SCREEN_HEIGHT, SCREEN_WIDTH, SEGMENT_SIZE,
    SPEED_INCREASE_INTERVAL, STEP_GROW,
};

use super::{Level, Rect};

/// One of the four axis-aligned headings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub fn opposite(self) -> Self {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    /// Unit vector in board coordinates (y grows downwards).
    pub fn unit(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    /// The heading of an axis-aligned, non-zero vector.
    pub fn from_vector(dx: i32, dy: i32) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Some(Heading::Up),
            (0, 1) => Some(Heading::Down),
            (-1, 0) => Some(Heading::Left),
            (1, 0) => Some(Heading::Right),
            _ => None,
        }
    }
}

/// Starting speed for a level, in board units per tick.
pub fn initial_step(level: u32) -> i32 {
    let bonus = level.saturating_sub(1) as i32 * LEVEL_SPEED_BONUS;
    (SEGMENT_SIZE + bonus).min(MAX_STEP)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Rect>,
    heading: Heading,
    next_heading: Heading,
    step: i32,
    score: u32,
}

impl Snake {
    /// A two-segment snake in the middle of the board, heading right.
    pub fn new(level: u32, score: u32) -> Self {
        let x = (SCREEN_WIDTH - SEGMENT_SIZE) / 2;
        let y = (SCREEN_HEIGHT - SEGMENT_SIZE) / 2;
        let head = Rect::square(x, y, SEGMENT_SIZE);
        Self {
            body: vec![head, head.translated(-SEGMENT_SIZE, 0)],
            heading: Heading::Right,
            next_heading: Heading::Right,
            step: initial_step(level),
            score,
        }
    }

    pub fn head(&self) -> Rect {
        self.body[0]
    }

    pub fn body(&self) -> &[Rect] {
        &self.body
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn heading(&self) -> Heading {
        self.next_heading
    }

    /// The movement vector the next [`Snake::advance`] will apply.
    pub fn direction(&self) -> (i32, i32) {
        let (ux, uy) = self.next_heading.unit();
        (ux * self.step, uy * self.step)
    }

    /// Buffers a new direction for the next move. Diagonal or zero vectors,
    /// and reversals of either the buffered or the last travelled heading,
    /// are ignored.
    pub fn set_direction(&mut self, dx: i32, dy: i32) -> bool {
        match Heading::from_vector(dx, dy) {
            Some(heading) => self.steer(heading),
            None => false,
        }
    }

    pub fn steer(&mut self, heading: Heading) -> bool {
        if heading == self.next_heading.opposite() || heading == self.heading.opposite() {
            return false;
        }
        self.next_heading = heading;
        true
    }

    /// Moves one step. Returns `false`, leaving the body untouched, when the
    /// new head would hit a wall, a board edge or the rest of the body.
    pub fn advance(&mut self, level: &Level) -> bool {
        let (dx, dy) = self.direction();
        let new_head = self.head().translated(dx, dy);

        if level.check_collision(&new_head)
            || self.body[1..].iter().any(|segment| segment.overlaps(&new_head))
        {
            return false;
        }

        self.heading = self.next_heading;
        self.body.insert(0, new_head);
        self.body.pop();
        true
    }

    /// Adds a copy of the tail segment and one point.
    pub fn grow(&mut self) {
        if let Some(&tail) = self.body.last() {
            self.body.push(tail);
        }
        self.add_score(1);
    }

    /// Speeds up once for every multiple of the speed interval crossed.
    pub fn add_score(&mut self, points: u32) {
        for _ in 0..points {
            self.score += 1;
            if self.score % SPEED_INCREASE_INTERVAL == 0 {
                self.step = (self.step + STEP_GROW).min(MAX_STEP);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curled_snake() -> Snake {
        // Heading down into its own tail
        let body = [(200, 200), (200, 180), (220, 180), (220, 200), (220, 220), (200, 220)]
            .into_iter()
            .map(|(x, y)| Rect::square(x, y, SEGMENT_SIZE))
            .collect();
        Snake {
            body,
            heading: Heading::Down,
            next_heading: Heading::Down,
            step: SEGMENT_SIZE,
            score: 0,
        }
    }

    #[test]
    fn new_snake_has_two_segments_heading_right() {
        let snake = Snake::new(1, 4);
        assert_eq!(snake.body().len(), 2);
        assert_eq!(snake.score(), 4);
        assert_eq!(snake.direction(), (SEGMENT_SIZE, 0));
        assert_eq!(snake.body()[1], snake.head().translated(-SEGMENT_SIZE, 0));
    }

    #[test]
    fn every_level_has_room_to_start() {
        for number in 1..=3 {
            let level = Level::new(number).unwrap();
            let snake = Snake::new(number, 0);
            assert!(snake.body().iter().all(|segment| !level.check_collision(segment)));
        }
    }

    #[test]
    fn higher_levels_start_faster() {
        assert_eq!(initial_step(1), SEGMENT_SIZE);
        assert!(initial_step(2) > initial_step(1));
        assert!(initial_step(3) > initial_step(2));
    }

    #[test]
    fn reversal_is_ignored() {
        let mut snake = Snake::new(1, 0);
        let step = snake.step();

        assert!(!snake.set_direction(-step, 0));
        assert_eq!(snake.direction(), (step, 0));

        assert!(snake.set_direction(0, step));
        assert_eq!(snake.direction(), (0, step));
    }

    #[test]
    fn buffered_turns_cannot_fold_back_before_moving() {
        let mut snake = Snake::new(1, 0);
        assert!(snake.steer(Heading::Up));
        assert!(!snake.steer(Heading::Left));
        assert!(!snake.steer(Heading::Down));
        assert_eq!(snake.heading(), Heading::Up);
    }

    #[test]
    fn diagonal_and_zero_vectors_are_ignored() {
        let mut snake = Snake::new(1, 0);
        assert!(!snake.set_direction(3, 3));
        assert!(!snake.set_direction(0, 0));
        assert_eq!(snake.heading(), Heading::Right);
    }

    #[test]
    fn advancing_shifts_the_body() {
        let level = Level::new(1).unwrap();
        let mut snake = Snake::new(1, 0);
        let head = snake.head();

        assert!(snake.advance(&level));
        assert_eq!(snake.head(), head.translated(snake.step(), 0));
        assert_eq!(snake.body()[1], head);
        assert_eq!(snake.body().len(), 2);
    }

    #[test]
    fn hitting_a_wall_fails_and_keeps_the_body() {
        let level = Level::new(1).unwrap();
        let mut snake = Snake::new(1, 0);
        for _ in 0..7 {
            assert!(snake.advance(&level));
        }
        let before = snake.clone();
        assert!(!snake.advance(&level));
        assert_eq!(snake, before);
    }

    #[test]
    fn running_into_itself_fails() {
        let level = Level::new(1).unwrap();
        let mut snake = curled_snake();
        let before = snake.clone();
        assert!(!snake.advance(&level));
        assert_eq!(snake, before);
    }

    #[test]
    fn growing_adds_a_tail_copy_and_a_point() {
        let mut snake = Snake::new(1, 0);
        let tail = *snake.body().last().unwrap();
        snake.grow();
        assert_eq!(snake.body().len(), 3);
        assert_eq!(snake.score(), 1);
        assert_eq!(*snake.body().last().unwrap(), tail);
    }

    #[test]
    fn speed_rises_every_interval_and_caps() {
        let mut snake = Snake::new(1, 0);
        let base = snake.step();
        snake.add_score(SPEED_INCREASE_INTERVAL - 1);
        assert_eq!(snake.step(), base);
        snake.add_score(1);
        assert_eq!(snake.step(), base + STEP_GROW);

        // A two-point jump over a multiple still counts
        snake.add_score(SPEED_INCREASE_INTERVAL - 1);
        snake.add_score(2);
        assert_eq!(snake.step(), base + 2 * STEP_GROW);

        snake.add_score(300);
        assert_eq!(snake.step(), MAX_STEP);
    }
}
