use macroquad::audio::{self, PlaySoundParams, Sound, load_sound_from_bytes};
use macroquad::prelude::*;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snake_levels::config::{
    LOGIN_BUTTON, MAX_LEVEL, NAME_FIELD, PLAY_AGAIN_BUTTON, SAVE_GAME_BUTTON, SCREEN_HEIGHT,
    SCREEN_WIDTH, SETTINGS_FILE, START_BUTTON, Settings,
};
use snake_levels::game::{self, Cue, Game, Phase, View};
use snake_levels::input::{Action, Controls, InputEvent, Key};
use snake_levels::store::{JsonStore, MemoryStore, PlayerStore};

// Palette
const GROUND: Color = Color::new(0.06, 0.5, 0.12, 1.0);
const WALL: Color = Color::new(0.07, 0.24, 0.02, 1.0);
const SNAKE: Color = Color::new(0.0, 0.0, 1.0, 1.0);
const FOOD: Color = Color::new(0.83, 0.05, 0.32, 1.0);
const SPECIAL_FOOD: Color = Color::new(1.0, 0.0, 0.0, 1.0);
const BUTTON: Color = Color::new(0.0, 1.0, 0.0, 1.0);
const MENU_BACKGROUND: Color = Color::new(1.0, 0.0, 0.0, 1.0);
const TEXT_FIELD: Color = Color::new(0.78, 0.78, 0.78, 1.0);

// Simple WAV (PCM16 mono) generator for tones
fn generate_wav_sine(frequency_hz: f32, duration_seconds: f32, volume: f32) -> Vec<u8> {
    let sample_rate: u32 = 44100;
    let num_samples: u32 = (duration_seconds * sample_rate as f32) as u32;
    let mut data: Vec<u8> = Vec::with_capacity((num_samples as usize) * 2 + 44);

    let block_align: u16 = 2; // mono 16-bit
    let byte_rate: u32 = sample_rate * block_align as u32;
    let data_size: u32 = num_samples * 2;
    let chunk_size: u32 = 36 + data_size;

    // RIFF header
    data.extend_from_slice(b"RIFF");
    data.extend_from_slice(&chunk_size.to_le_bytes());
    data.extend_from_slice(b"WAVE");
    // fmt chunk
    data.extend_from_slice(b"fmt ");
    data.extend_from_slice(&16u32.to_le_bytes()); // PCM chunk size
    data.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    data.extend_from_slice(&1u16.to_le_bytes()); // channels
    data.extend_from_slice(&sample_rate.to_le_bytes());
    data.extend_from_slice(&byte_rate.to_le_bytes());
    data.extend_from_slice(&block_align.to_le_bytes());
    data.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    // data chunk
    data.extend_from_slice(b"data");
    data.extend_from_slice(&data_size.to_le_bytes());

    let two_pi = std::f32::consts::TAU;
    let amplitude: f32 = (volume.clamp(0.0, 1.0)) * 0.7;
    for n in 0..num_samples {
        let t = n as f32 / sample_rate as f32;
        let sample = (amplitude * (two_pi * frequency_hz * t).sin() * i16::MAX as f32) as i16;
        data.extend_from_slice(&sample.to_le_bytes());
    }
    data
}

struct Sounds {
    eat: Option<Sound>,
    bonus: Option<Sound>,
    crash: Option<Sound>,
    volume: f32,
}

impl Sounds {
    async fn load(volume: f32) -> Self {
        Self {
            eat: load_tone(880.0, 0.08, 0.6).await,
            bonus: load_tone(1320.0, 0.12, 0.6).await,
            crash: load_tone(110.0, 0.25, 0.7).await,
            volume,
        }
    }

    fn play(&self, cue: Cue) {
        let (sound, loudness) = match cue {
            Cue::Ate => (&self.eat, 0.35),
            Cue::AteSpecial | Cue::LevelComplete => (&self.bonus, 0.4),
            Cue::Crashed => (&self.crash, 0.6),
            Cue::SpecialSpawned | Cue::Saved => return,
        };
        if let Some(sound) = sound {
            audio::play_sound(
                sound,
                PlaySoundParams {
                    looped: false,
                    volume: loudness * self.volume,
                },
            );
        }
    }
}

async fn load_tone(frequency_hz: f32, duration_seconds: f32, volume: f32) -> Option<Sound> {
    let bytes = generate_wav_sine(frequency_hz, duration_seconds, volume);
    match load_sound_from_bytes(&bytes).await {
        Ok(sound) => Some(sound),
        Err(error) => {
            warn!(?error, "Sound disabled");
            None
        }
    }
}

fn open_store(path: &str) -> Box<dyn PlayerStore> {
    match JsonStore::open(path) {
        Ok(store) => Box::new(store),
        Err(error) => {
            error!(%error, path, "Save file unusable, progress will not be kept");
            Box::new(MemoryStore::new())
        }
    }
}

// Board units to window pixels
fn scale() -> (f32, f32) {
    (
        screen_width() / SCREEN_WIDTH as f32,
        screen_height() / SCREEN_HEIGHT as f32,
    )
}

fn fill(rect: game::Rect, color: Color) {
    let (sx, sy) = scale();
    draw_rectangle(
        rect.x as f32 * sx,
        rect.y as f32 * sy,
        rect.width as f32 * sx,
        rect.height as f32 * sy,
        color,
    );
}

fn outline(rect: game::Rect, color: Color) {
    let (sx, sy) = scale();
    draw_rectangle_lines(
        rect.x as f32 * sx,
        rect.y as f32 * sy,
        rect.width as f32 * sx,
        rect.height as f32 * sy,
        2.0,
        color,
    );
}

fn text(content: &str, x: i32, y: i32, size: f32) {
    let (sx, sy) = scale();
    draw_text(content, x as f32 * sx, y as f32 * sy, size * sy, BLACK);
}

fn button(rect: game::Rect, label: &str) {
    fill(rect, BUTTON);
    text(label, rect.x + 20, rect.y + 45, 48.0);
}

fn draw_board(view: &View) {
    fill(game::Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT), GROUND);
    for wall in view.walls {
        fill(*wall, WALL);
    }
    for segment in view.body {
        fill(*segment, SNAKE);
    }
    if let Some(food) = view.food {
        fill(food, FOOD);
    }
    if let Some(special) = view.special {
        fill(special, SPECIAL_FOOD);
    }

    text(&format!("Score: {}", view.score.unwrap_or_default()), 20, 50, 40.0);
    if let Some(player) = view.player {
        text(&format!("Level: {}", player.level), 900, 50, 40.0);
    }
    if let Some(seconds) = view.special_seconds_left {
        text(&format!("Timer: {}", seconds), 450, 50, 40.0);
    }
}

fn draw_view(view: &View, name: &str, status: Option<&str>) {
    clear_background(WHITE);
    match view.phase {
        Phase::Login => {
            text("Enter Username", 340, 330, 80.0);
            outline(NAME_FIELD, TEXT_FIELD);
            text(name, NAME_FIELD.x + 5, NAME_FIELD.y + 38, 40.0);
            button(LOGIN_BUTTON, "Login");
        }
        Phase::Menu => {
            fill(game::Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT), MENU_BACKGROUND);
            if let Some(player) = view.player {
                let info = format!(
                    "Welcome {}! Level: {}, Score: {}",
                    player.name, player.level, player.score
                );
                text(&info, 100, 130, 40.0);
            }
            button(START_BUTTON, "Start Game");
        }
        Phase::Playing => draw_board(view),
        Phase::Paused => {
            draw_board(view);
            text("PAUSED / press S to save", 80, 330, 80.0);
            button(SAVE_GAME_BUTTON, "Save & Play");
        }
        Phase::Win => {
            text("Level Complete!", 340, 330, 80.0);
            let last_level = view.player.is_some_and(|player| player.level == MAX_LEVEL);
            button(PLAY_AGAIN_BUTTON, if last_level { "Play again" } else { "Next Level" });
        }
        Phase::Lose => {
            text("Game Over!", 340, 330, 80.0);
            button(PLAY_AGAIN_BUTTON, "Play again");
        }
    }

    if let Some(status) = status {
        text(status, 20, SCREEN_HEIGHT - 20, 32.0);
    }
}

fn poll_input() -> Vec<InputEvent> {
    let mut events = Vec::new();
    if is_quit_requested() {
        events.push(InputEvent::Quit);
    }

    let keys = [
        (KeyCode::Up, Key::Up),
        (KeyCode::Down, Key::Down),
        (KeyCode::Left, Key::Left),
        (KeyCode::Right, Key::Right),
        (KeyCode::Escape, Key::Escape),
        (KeyCode::Enter, Key::Enter),
        (KeyCode::Backspace, Key::Backspace),
    ];
    for (code, key) in keys {
        if is_key_pressed(code) {
            events.push(InputEvent::Key(key));
        }
    }
    while let Some(c) = get_char_pressed() {
        events.push(InputEvent::Key(Key::Char(c)));
    }

    if is_mouse_button_pressed(MouseButton::Left) {
        let (mx, my) = mouse_position();
        let (sx, sy) = scale();
        events.push(InputEvent::Click {
            x: (mx / sx) as i32,
            y: (my / sy) as i32,
        });
    }
    events
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Snake Game".to_owned(),
        window_width: SCREEN_WIDTH,
        window_height: SCREEN_HEIGHT,
        window_resizable: false,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snake_levels=info".into()),
        )
        .init();

    let settings = Settings::load(Path::new(SETTINGS_FILE));
    let sounds = Sounds::load(settings.volume).await;
    let mut game = Game::new(
        open_store(&settings.save_path),
        ::rand::rng(),
        settings.tick_rate,
    );
    let mut controls = Controls::new();
    let mut status: Option<String> = None;

    let tick_interval = 1.0 / settings.tick_rate as f64;
    let mut last_tick = get_time();
    prevent_quit();
    info!(tick_rate = settings.tick_rate, "Snake started");

    'frames: loop {
        let mut events: Vec<game::Event> = Vec::new();
        for input in poll_input() {
            match controls.interpret(game.phase(), input) {
                Some(Action::Quit) => break 'frames,
                Some(Action::Game(event)) => events.push(event),
                None => {}
            }
        }

        let now = get_time();
        if now - last_tick >= tick_interval {
            last_tick = now;
            events.push(game::Event::Tick);
        }

        for event in events {
            let before = game.phase();
            match game.handle(event) {
                Ok(step) => {
                    if step.phase != before {
                        status = None;
                    }
                    for cue in step.cues {
                        sounds.play(cue);
                        if cue == Cue::Saved {
                            status = Some("Game saved".to_string());
                        }
                    }
                }
                Err(error) => {
                    warn!(%error, "Action failed");
                    status = Some(format!("{error}. Try again."));
                }
            }
        }

        draw_view(&game.view(), controls.name(), status.as_deref());
        next_frame().await;
    }

    info!("Snake closed");
}
