//! Player records and the stores that keep them between sessions.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub level: u32,
    pub score: u32,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 1,
            score: 0,
        }
    }

    pub fn with_progress(name: impl Into<String>, level: u32, score: u32) -> Self {
        Self {
            name: name.into(),
            level,
            score,
        }
    }
}

/// Durable name to (level, score) mapping. Each call either completes or
/// fails without partial effects.
pub trait PlayerStore {
    fn fetch_player(&self, name: &str) -> Result<Option<Player>, StoreError>;
    fn create_player(&mut self, name: &str) -> Result<Player, StoreError>;
    fn save_player(&mut self, player: &Player) -> Result<(), StoreError>;
}

impl<T: PlayerStore + ?Sized> PlayerStore for Box<T> {
    fn fetch_player(&self, name: &str) -> Result<Option<Player>, StoreError> {
        (**self).fetch_player(name)
    }

    fn create_player(&mut self, name: &str) -> Result<Player, StoreError> {
        (**self).create_player(name)
    }

    fn save_player(&mut self, player: &Player) -> Result<(), StoreError> {
        (**self).save_player(player)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct SaveRecord {
    level: u32,
    score: u32,
}

/// Save history per player. Lookups return the most recent record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Ledger {
    players: BTreeMap<String, Vec<SaveRecord>>,
}

impl Ledger {
    fn latest(&self, name: &str) -> Option<Player> {
        self.players
            .get(name)?
            .last()
            .map(|record| Player::with_progress(name, record.level, record.score))
    }

    fn create(&mut self, name: &str) -> Player {
        let player = Player::new(name);
        self.players.entry(name.to_string()).or_default().push(SaveRecord {
            level: player.level,
            score: player.score,
        });
        player
    }

    fn save(&mut self, player: &Player) -> Result<(), StoreError> {
        let history = self
            .players
            .get_mut(&player.name)
            .ok_or_else(|| StoreError::UnknownPlayer(player.name.clone()))?;
        history.push(SaveRecord {
            level: player.level,
            score: player.score,
        });
        Ok(())
    }
}

/// Keeps everything in memory; handy as a fake in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: Ledger,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlayerStore for MemoryStore {
    fn fetch_player(&self, name: &str) -> Result<Option<Player>, StoreError> {
        Ok(self.ledger.latest(name))
    }

    fn create_player(&mut self, name: &str) -> Result<Player, StoreError> {
        Ok(self.ledger.create(name))
    }

    fn save_player(&mut self, player: &Player) -> Result<(), StoreError> {
        self.ledger.save(player)
    }
}

/// A JSON file rewritten in full on every change.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    ledger: Ledger,
}

impl JsonStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let ledger = if path.exists() {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str(&text)?
        } else {
            Ledger::default()
        };
        info!(path = %path.display(), players = ledger.players.len(), "Opened save file");
        Ok(Self { path, ledger })
    }

    // The in-memory ledger only changes once the file write went through
    fn commit(&mut self, ledger: Ledger) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&ledger)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, text)?;
        fs::rename(&staging, &self.path)?;
        self.ledger = ledger;
        debug!(path = %self.path.display(), "Save file written");
        Ok(())
    }
}

impl PlayerStore for JsonStore {
    fn fetch_player(&self, name: &str) -> Result<Option<Player>, StoreError> {
        Ok(self.ledger.latest(name))
    }

    fn create_player(&mut self, name: &str) -> Result<Player, StoreError> {
        let mut ledger = self.ledger.clone();
        let player = ledger.create(name);
        self.commit(ledger)?;
        Ok(player)
    }

    fn save_player(&mut self, player: &Player) -> Result<(), StoreError> {
        let mut ledger = self.ledger.clone();
        ledger.save(player)?;
        self.commit(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_progress_comes_back() {
        let mut store = MemoryStore::new();
        assert_eq!(store.fetch_player("ada").unwrap(), None);

        let mut player = store.create_player("ada").unwrap();
        assert_eq!(player, Player::new("ada"));

        player.level = 2;
        player.score = 6;
        store.save_player(&player).unwrap();
        assert_eq!(store.fetch_player("ada").unwrap(), Some(player));
    }

    #[test]
    fn a_lower_save_replaces_a_higher_one() {
        let mut store = MemoryStore::new();
        store.create_player("bo").unwrap();
        store.save_player(&Player::with_progress("bo", 3, 10)).unwrap();
        store.save_player(&Player::with_progress("bo", 1, 2)).unwrap();
        assert_eq!(
            store.fetch_player("bo").unwrap(),
            Some(Player::with_progress("bo", 1, 2))
        );
        assert_eq!(store.ledger.players["bo"].len(), 3);
    }

    #[test]
    fn json_store_returns_the_last_save_after_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");

        let mut store = JsonStore::open(&path).unwrap();
        store.create_player("gil").unwrap();
        store.save_player(&Player::with_progress("gil", 3, 15)).unwrap();
        store.save_player(&Player::new("gil")).unwrap();

        let reopened = JsonStore::open(&path).unwrap();
        assert_eq!(reopened.fetch_player("gil").unwrap(), Some(Player::new("gil")));
    }

    #[test]
    fn saving_an_unknown_player_fails() {
        let mut store = MemoryStore::new();
        let result = store.save_player(&Player::new("ghost"));
        assert!(matches!(result, Err(StoreError::UnknownPlayer(name)) if name == "ghost"));
    }

    #[test]
    fn creating_twice_keeps_one_name() {
        let mut store = MemoryStore::new();
        store.create_player("cy").unwrap();
        store.create_player("cy").unwrap();
        assert_eq!(store.ledger.players.len(), 1);
    }

    #[test]
    fn json_store_survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");

        let mut store = JsonStore::open(&path).unwrap();
        let mut player = store.create_player("dee").unwrap();
        player.score = 4;
        store.save_player(&player).unwrap();

        let reopened = JsonStore::open(&path).unwrap();
        assert_eq!(reopened.fetch_player("dee").unwrap(), Some(player));
    }

    #[test]
    fn failed_write_leaves_the_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open(dir.path().join("missing").join("save.json")).unwrap();

        assert!(matches!(store.create_player("eve"), Err(StoreError::Io(_))));
        assert_eq!(store.fetch_player("eve").unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(JsonStore::open(&path), Err(StoreError::Json(_))));
    }
}
