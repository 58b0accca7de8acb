//! Maps raw input to game events, depending on the screen.

use crate::config::{LOGIN_BUTTON, PLAY_AGAIN_BUTTON, SAVE_GAME_BUTTON, START_BUTTON};
use crate::game::{Event, Heading, Phase};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
    Enter,
    Backspace,
    Char(char),
}

/// Input as delivered by the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    Click { x: i32, y: i32 },
    Key(Key),
    TextCommit(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Game(Event),
}

/// Holds the login form and turns input into actions.
#[derive(Debug, Default)]
pub struct Controls {
    name: String,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// The name typed so far on the login screen.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `None` for input that means nothing on the current screen.
    pub fn interpret(&mut self, phase: Phase, input: InputEvent) -> Option<Action> {
        let event = match (phase, input) {
            (_, InputEvent::Quit) => return Some(Action::Quit),

            (Phase::Login, InputEvent::TextCommit(text)) => {
                self.name = text;
                Event::SubmitName(self.name.clone())
            }
            (Phase::Login, InputEvent::Key(key)) => return self.edit_name(key),
            (Phase::Login, InputEvent::Click { x, y }) if LOGIN_BUTTON.contains_point(x, y) => {
                Event::SubmitName(self.name.clone())
            }

            (Phase::Menu, InputEvent::Key(Key::Enter)) => Event::Start,
            (Phase::Menu, InputEvent::Click { x, y }) if START_BUTTON.contains_point(x, y) => {
                Event::Start
            }

            (Phase::Playing, InputEvent::Key(key)) => match key {
                Key::Escape | Key::Char('p' | 'P') => Event::Pause,
                key => Event::Turn(heading_for(key)?),
            },

            (Phase::Paused, InputEvent::Key(Key::Escape | Key::Char('p' | 'P'))) => Event::Resume,
            (Phase::Paused, InputEvent::Key(Key::Char('s' | 'S'))) => Event::Save,
            (Phase::Paused, InputEvent::Click { x, y })
                if SAVE_GAME_BUTTON.contains_point(x, y) =>
            {
                Event::Save
            }

            (Phase::Win, InputEvent::Key(Key::Enter)) => Event::Continue,
            (Phase::Win, InputEvent::Click { x, y }) if PLAY_AGAIN_BUTTON.contains_point(x, y) => {
                Event::Continue
            }

            (Phase::Lose, InputEvent::Key(Key::Enter)) => Event::Retry,
            (Phase::Lose, InputEvent::Click { x, y }) if PLAY_AGAIN_BUTTON.contains_point(x, y) => {
                Event::Retry
            }

            _ => return None,
        };
        Some(Action::Game(event))
    }

    fn edit_name(&mut self, key: Key) -> Option<Action> {
        match key {
            Key::Enter => return Some(Action::Game(Event::SubmitName(self.name.clone()))),
            Key::Backspace => {
                self.name.pop();
            }
            Key::Char(c) if !c.is_control() => self.name.push(c),
            _ => {}
        }
        None
    }
}

fn heading_for(key: Key) -> Option<Heading> {
    match key {
        Key::Up | Key::Char('w' | 'W') => Some(Heading::Up),
        Key::Down | Key::Char('s' | 'S') => Some(Heading::Down),
        Key::Left | Key::Char('a' | 'A') => Some(Heading::Left),
        Key::Right | Key::Char('d' | 'D') => Some(Heading::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key) -> InputEvent {
        InputEvent::Key(key)
    }

    #[test]
    fn typing_and_submitting_a_name() {
        let mut controls = Controls::new();
        for c in "bobx".chars() {
            assert_eq!(controls.interpret(Phase::Login, key(Key::Char(c))), None);
        }
        controls.interpret(Phase::Login, key(Key::Backspace));
        assert_eq!(controls.name(), "bob");

        assert_eq!(
            controls.interpret(Phase::Login, key(Key::Enter)),
            Some(Action::Game(Event::SubmitName("bob".into())))
        );
        assert_eq!(
            controls.interpret(Phase::Login, InputEvent::Click { x: 410, y: 510 }),
            Some(Action::Game(Event::SubmitName("bob".into())))
        );
    }

    #[test]
    fn text_commit_submits_directly() {
        let mut controls = Controls::new();
        assert_eq!(
            controls.interpret(Phase::Login, InputEvent::TextCommit("zed".into())),
            Some(Action::Game(Event::SubmitName("zed".into())))
        );
        assert_eq!(controls.name(), "zed");
    }

    #[test]
    fn letters_steer_only_while_playing() {
        let mut controls = Controls::new();
        assert_eq!(
            controls.interpret(Phase::Playing, key(Key::Char('w'))),
            Some(Action::Game(Event::Turn(Heading::Up)))
        );
        assert_eq!(
            controls.interpret(Phase::Playing, key(Key::Left)),
            Some(Action::Game(Event::Turn(Heading::Left)))
        );
        assert_eq!(controls.interpret(Phase::Playing, key(Key::Char('x'))), None);
        assert_eq!(controls.interpret(Phase::Menu, key(Key::Char('w'))), None);
    }

    #[test]
    fn pause_save_and_resume_keys() {
        let mut controls = Controls::new();
        assert_eq!(
            controls.interpret(Phase::Playing, key(Key::Escape)),
            Some(Action::Game(Event::Pause))
        );
        assert_eq!(
            controls.interpret(Phase::Playing, key(Key::Char('p'))),
            Some(Action::Game(Event::Pause))
        );
        assert_eq!(
            controls.interpret(Phase::Paused, key(Key::Char('s'))),
            Some(Action::Game(Event::Save))
        );
        assert_eq!(
            controls.interpret(Phase::Paused, key(Key::Escape)),
            Some(Action::Game(Event::Resume))
        );
    }

    #[test]
    fn clicks_only_count_inside_the_active_button() {
        let mut controls = Controls::new();
        assert_eq!(
            controls.interpret(Phase::Menu, InputEvent::Click { x: 120, y: 420 }),
            Some(Action::Game(Event::Start))
        );
        assert_eq!(
            controls.interpret(Phase::Menu, InputEvent::Click { x: 10, y: 10 }),
            None
        );
        assert_eq!(
            controls.interpret(Phase::Lose, InputEvent::Click { x: 400, y: 560 }),
            Some(Action::Game(Event::Retry))
        );
        assert_eq!(
            controls.interpret(Phase::Win, InputEvent::Click { x: 400, y: 560 }),
            Some(Action::Game(Event::Continue))
        );
        assert_eq!(
            controls.interpret(Phase::Paused, InputEvent::Click { x: 120, y: 420 }),
            Some(Action::Game(Event::Save))
        );
        assert_eq!(
            controls.interpret(Phase::Playing, InputEvent::Click { x: 120, y: 420 }),
            None
        );
    }

    #[test]
    fn quit_works_everywhere() {
        let mut controls = Controls::new();
        for phase in [
            Phase::Login,
            Phase::Menu,
            Phase::Playing,
            Phase::Paused,
            Phase::Win,
            Phase::Lose,
        ] {
            assert_eq!(controls.interpret(phase, InputEvent::Quit), Some(Action::Quit));
        }
    }
}
