// SPDX-License-Identifier: MPL-2.0

//! Self-healing room timing configuration.
//!
//! The owning server persists how many rooms the show runs and how long
//! each room's cue lasts. Reads never fail: a missing or corrupt file and
//! out-of-range values all fall back to defaults, and saves are
//! best-effort. The client core never looks at this module.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

pub const DEFAULT_ROOM_COUNT: usize = 15;
pub const DEFAULT_ROOM_SECONDS: u32 = 20;
pub const MIN_ROOM_COUNT: usize = 1;
pub const MAX_ROOM_COUNT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    #[serde(default = "default_room_count")]
    pub room_count: usize,
    #[serde(default)]
    pub room_seconds: Vec<u32>,
}

fn default_room_count() -> usize {
    DEFAULT_ROOM_COUNT
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            room_count: DEFAULT_ROOM_COUNT,
            room_seconds: vec![DEFAULT_ROOM_SECONDS; DEFAULT_ROOM_COUNT],
        }
    }
}

impl RoomConfig {
    /// Loads the configuration from `path`. Never fails: a missing file
    /// writes the defaults back (best-effort) and returns them, a corrupt
    /// file returns the defaults, and out-of-range values are normalized.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            let config = Self::default();
            config.save(path);
            return config;
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(error = %err, path = %path.display(), "room config unreadable, using defaults");
                return Self::default();
            }
        };

        match toml::from_str::<RoomConfig>(&contents) {
            Ok(config) => config.normalized(),
            Err(err) => {
                warn!(error = %err, path = %path.display(), "room config corrupt, using defaults");
                Self::default()
            }
        }
    }

    /// Persists the current values to `path`, silently ignoring I/O
    /// failure (logged at warn level).
    pub fn save<P: AsRef<Path>>(&self, path: P) {
        let path = path.as_ref();
        let contents = match toml::to_string_pretty(self) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(error = %err, "room config serialization failed");
                return;
            }
        };
        if let Err(err) = fs::write(path, contents) {
            warn!(error = %err, path = %path.display(), "room config save failed");
        }
    }

    // Clamp the room count into [1, 20], size the duration list to it, and
    // replace zero durations with the default.
    fn normalized(mut self) -> Self {
        self.room_count = self.room_count.clamp(MIN_ROOM_COUNT, MAX_ROOM_COUNT);
        self.room_seconds
            .resize(self.room_count, DEFAULT_ROOM_SECONDS);
        for seconds in &mut self.room_seconds {
            if *seconds == 0 {
                *seconds = DEFAULT_ROOM_SECONDS;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RoomConfig::default();
        assert_eq!(config.room_count, 15);
        assert_eq!(config.room_seconds, vec![20; 15]);
    }

    #[test]
    fn test_load_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roomtimes.toml");
        let config = RoomConfig::load(&path);
        assert_eq!(config, RoomConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roomtimes.toml");
        fs::write(&path, "this is { not toml").unwrap();
        assert_eq!(RoomConfig::load(&path), RoomConfig::default());
    }

    #[test]
    fn test_load_clamps_room_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roomtimes.toml");

        fs::write(&path, "room_count = 50\nroom_seconds = []\n").unwrap();
        let config = RoomConfig::load(&path);
        assert_eq!(config.room_count, MAX_ROOM_COUNT);
        assert_eq!(config.room_seconds.len(), MAX_ROOM_COUNT);

        fs::write(&path, "room_count = 0\nroom_seconds = [5]\n").unwrap();
        let config = RoomConfig::load(&path);
        assert_eq!(config.room_count, MIN_ROOM_COUNT);
        assert_eq!(config.room_seconds, vec![5]);
    }

    #[test]
    fn test_load_resizes_and_heals_durations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roomtimes.toml");
        fs::write(&path, "room_count = 4\nroom_seconds = [10, 0]\n").unwrap();
        let config = RoomConfig::load(&path);
        assert_eq!(config.room_seconds, vec![10, 20, 20, 20]);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roomtimes.toml");
        let config = RoomConfig {
            room_count: 3,
            room_seconds: vec![5, 10, 15],
        };
        config.save(&path);
        assert_eq!(RoomConfig::load(&path), config);
    }

    #[test]
    fn test_save_ignores_io_failure() {
        let config = RoomConfig::default();
        // nonexistent parent directory: save must not panic or error
        config.save("/nonexistent-dir-roomlink/roomtimes.toml");
    }
}
