//! The game's state machine and the per-tick simulation of a round.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::{
    FOOD_SIZE, MAX_TICK_RATE, POINTS_PER_LEVEL, SPECIAL_FOOD_SIZE, SPECIAL_LIFE_SECONDS,
    SPECIAL_SPAWN_SECONDS,
};
use crate::error::{GameError, Result};
use crate::store::{Player, PlayerStore};

use super::level::LAYOUTS;
use super::{Food, Heading, Level, Rect, Snake, SpecialFood};

/// Which screen the game is on, without the data attached to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Login,
    Menu,
    Playing,
    Paused,
    Win,
    Lose,
}

/// Everything the machine reacts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    SubmitName(String),
    Start,
    Pause,
    Resume,
    Save,
    Continue,
    Retry,
    Turn(Heading),
    Tick,
}

/// Things worth a sound or a flash in the frontend.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cue {
    Ate,
    AteSpecial,
    SpecialSpawned,
    Crashed,
    LevelComplete,
    Saved,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TickOutcome {
    Running,
    Crashed,
    Won,
}

/// One attempt at a level. Rebuilt from scratch on every (re)start.
#[derive(Debug, Clone)]
pub struct Round {
    player: Player,
    level: Level,
    snake: Snake,
    food: Food,
    special: SpecialFood,
}

impl Round {
    pub fn new<R: Rng + ?Sized>(player: Player, rng: &mut R, tick_rate: u32) -> Result<Self> {
        let level = Level::new(player.level)?;
        let snake = Snake::new(player.level, player.score);
        let food = Food::new(FOOD_SIZE, rng, snake.body(), &LAYOUTS)?;
        let special = SpecialFood::new(
            SPECIAL_FOOD_SIZE,
            SPECIAL_SPAWN_SECONDS * tick_rate,
            SPECIAL_LIFE_SECONDS * tick_rate,
            rng,
            snake.body(),
            &LAYOUTS,
        )?;
        debug!(player = %player.name, level = player.level, score = player.score, "Round set up");
        Ok(Self {
            player,
            level,
            snake,
            food,
            special,
        })
    }

    /// Score needed to clear the current level.
    pub fn target(&self) -> u32 {
        self.player.level * POINTS_PER_LEVEL
    }

    fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, cues: &mut Vec<Cue>) -> TickOutcome {
        if !self.snake.advance(&self.level) {
            return TickOutcome::Crashed;
        }
        let head = self.snake.head();

        if head.overlaps(&self.food.rect()) {
            self.snake.grow();
            cues.push(Cue::Ate);
            if let Err(error) = self.food.respawn(rng, self.snake.body(), &LAYOUTS) {
                warn!(%error, "Could not move eaten food");
            }
        }

        match self.special.update(rng, self.snake.body(), &LAYOUTS) {
            Ok(true) => cues.push(Cue::SpecialSpawned),
            Ok(false) => {}
            Err(error) => warn!(%error, "Special food stays hidden"),
        }

        if self.special.rect().is_some_and(|rect| rect.overlaps(&head)) {
            self.snake.grow();
            self.snake.add_score(1);
            self.special.consume();
            cues.push(Cue::AteSpecial);
        }

        if self.snake.score() >= self.target() {
            TickOutcome::Won
        } else {
            TickOutcome::Running
        }
    }

    /// The player with the round's progress folded in.
    fn progress(&self) -> Player {
        Player::with_progress(
            self.player.name.clone(),
            self.level.number(),
            self.snake.score(),
        )
    }
}

/// The machine's state, carrying exactly the data each screen needs.
#[derive(Debug, Clone, Default)]
pub enum GameState {
    #[default]
    Login,
    Menu(Player),
    Playing(Round),
    Paused(Round),
    Win(Round),
    Lose(Round),
}

impl GameState {
    pub fn phase(&self) -> Phase {
        match self {
            GameState::Login => Phase::Login,
            GameState::Menu(_) => Phase::Menu,
            GameState::Playing(_) => Phase::Playing,
            GameState::Paused(_) => Phase::Paused,
            GameState::Win(_) => Phase::Win,
            GameState::Lose(_) => Phase::Lose,
        }
    }

    pub fn round(&self) -> Option<&Round> {
        match self {
            GameState::Playing(round)
            | GameState::Paused(round)
            | GameState::Win(round)
            | GameState::Lose(round) => Some(round),
            GameState::Login | GameState::Menu(_) => None,
        }
    }

    pub fn player(&self) -> Option<&Player> {
        match self {
            GameState::Login => None,
            GameState::Menu(player) => Some(player),
            _ => self.round().map(|round| &round.player),
        }
    }
}

/// What handling one event produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub phase: Phase,
    pub cues: Vec<Cue>,
}

/// Read-only picture of the game for a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View<'a> {
    pub phase: Phase,
    pub player: Option<&'a Player>,
    pub walls: &'a [Rect],
    pub body: &'a [Rect],
    pub food: Option<Rect>,
    pub special: Option<Rect>,
    pub special_seconds_left: Option<u32>,
    pub score: Option<u32>,
}

pub struct Game<S, R> {
    state: GameState,
    store: S,
    rng: R,
    tick_rate: u32,
}

impl<S: PlayerStore, R: Rng> Game<S, R> {
    pub fn new(store: S, rng: R, tick_rate: u32) -> Self {
        Self {
            state: GameState::Login,
            store,
            rng,
            tick_rate: tick_rate.clamp(1, MAX_TICK_RATE),
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> View<'_> {
        let round = self.state.round();
        View {
            phase: self.state.phase(),
            player: self.state.player(),
            walls: round.map(|round| round.level.walls()).unwrap_or_default(),
            body: round.map(|round| round.snake.body()).unwrap_or_default(),
            food: round.map(|round| round.food.rect()),
            special: round.and_then(|round| round.special.rect()),
            special_seconds_left: round
                .and_then(|round| round.special.remaining_ticks())
                .map(|ticks| ticks / self.tick_rate),
            score: round.map(|round| round.snake.score()),
        }
    }

    /// Feeds one event through the machine. On `Err` the state is left as
    /// it was before the event.
    pub fn handle(&mut self, event: Event) -> Result<Step> {
        let state = std::mem::take(&mut self.state);
        let from = state.phase();
        let mut cues = Vec::new();

        let (next, result) = self.transition(state, event, &mut cues);
        self.state = next;

        let phase = self.state.phase();
        if phase != from {
            info!(?from, to = ?phase, "Game state changed");
        }
        result.map(|()| Step { phase, cues })
    }

    fn transition(
        &mut self,
        state: GameState,
        event: Event,
        cues: &mut Vec<Cue>,
    ) -> (GameState, Result<()>) {
        match (state, event) {
            (GameState::Login, Event::SubmitName(name)) => self.login(name.trim()),

            (GameState::Menu(player), Event::Start) => {
                match Round::new(player.clone(), &mut self.rng, self.tick_rate) {
                    Ok(round) => (GameState::Playing(round), Ok(())),
                    Err(error) => (GameState::Menu(player), Err(error)),
                }
            }

            (GameState::Playing(mut round), Event::Tick) => {
                match round.tick(&mut self.rng, cues) {
                    TickOutcome::Running => (GameState::Playing(round), Ok(())),
                    TickOutcome::Crashed => {
                        cues.push(Cue::Crashed);
                        (GameState::Lose(round), Ok(()))
                    }
                    TickOutcome::Won => {
                        cues.push(Cue::LevelComplete);
                        (GameState::Win(round), Ok(()))
                    }
                }
            }
            (GameState::Playing(mut round), Event::Turn(heading)) => {
                round.snake.steer(heading);
                (GameState::Playing(round), Ok(()))
            }
            (GameState::Playing(round), Event::Pause) => (GameState::Paused(round), Ok(())),

            (GameState::Paused(round), Event::Resume) => (GameState::Playing(round), Ok(())),
            (GameState::Paused(mut round), Event::Save) => {
                let progress = round.progress();
                match self.store.save_player(&progress) {
                    Ok(()) => {
                        info!(
                            player = %progress.name,
                            level = progress.level,
                            score = progress.score,
                            "Game saved"
                        );
                        round.player = progress;
                        cues.push(Cue::Saved);
                        (GameState::Playing(round), Ok(()))
                    }
                    Err(error) => {
                        warn!(%error, "Saving failed");
                        (GameState::Paused(round), Err(error.into()))
                    }
                }
            }

            (GameState::Win(round), Event::Continue) => self.advance(round, cues),

            (GameState::Lose(round), Event::Retry) => {
                // Progress since the last save point is dropped, the score is not reset
                match Round::new(round.player.clone(), &mut self.rng, self.tick_rate) {
                    Ok(fresh) => (GameState::Playing(fresh), Ok(())),
                    Err(error) => (GameState::Lose(round), Err(error)),
                }
            }

            (state, event) => {
                debug!(phase = ?state.phase(), ?event, "Event ignored");
                (state, Ok(()))
            }
        }
    }

    fn login(&mut self, name: &str) -> (GameState, Result<()>) {
        if name.is_empty() {
            return (GameState::Login, Ok(()));
        }

        match self.store.fetch_player(name) {
            Ok(Some(player)) => {
                info!(
                    player = %player.name,
                    level = player.level,
                    score = player.score,
                    "Welcome back"
                );
                return (GameState::Menu(player), Ok(()));
            }
            Ok(None) => {}
            Err(error) => warn!(%error, name, "Player lookup failed, creating instead"),
        }

        match self.store.create_player(name) {
            Ok(player) => {
                info!(player = %player.name, "New player");
                (GameState::Menu(player), Ok(()))
            }
            Err(error) => {
                warn!(%error, name, "Login failed");
                (GameState::Login, Err(GameError::Persistence(error)))
            }
        }
    }

    fn advance(&mut self, round: Round, cues: &mut Vec<Cue>) -> (GameState, Result<()>) {
        if round.level.is_final() {
            // Every level cleared: start over from scratch
            let player = Player::new(round.player.name.clone());
            return match Round::new(player, &mut self.rng, self.tick_rate) {
                Ok(fresh) => (GameState::Playing(fresh), Ok(())),
                Err(error) => (GameState::Win(round), Err(error)),
            };
        }

        let mut next = round.progress();
        next.level += 1;
        let fresh = match Round::new(next.clone(), &mut self.rng, self.tick_rate) {
            Ok(fresh) => fresh,
            Err(error) => return (GameState::Win(round), Err(error)),
        };
        match self.store.save_player(&next) {
            Ok(()) => {
                cues.push(Cue::Saved);
                (GameState::Playing(fresh), Ok(()))
            }
            Err(error) => {
                warn!(%error, "Could not save level progress");
                (GameState::Win(round), Err(error.into()))
            }
        }
    }
}
