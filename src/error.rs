//! Configuration errors.
//!
//! Only configuration loading can fail.  Everything that happens inside a
//! tick degrades to a no-op or a default instead of returning an error.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    EmptyEnemyTable,
    DuplicateEnemyType {
        name: String,
    },
    InvalidWeight {
        name: String,
        weight: f32,
    },
    InvalidHealth {
        name: String,
        hp: f32,
    },
    InvalidDropRate {
        name: String,
        rate: f32,
    },
    EmptyPowerUpTable,
    InvalidSpawnInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::EmptyEnemyTable => write!(f, "level declares no enemy types"),
            Self::DuplicateEnemyType { name } => {
                write!(f, "enemy type declared twice: {name}")
            }
            Self::InvalidWeight { name, weight } => {
                write!(f, "spawn weight for {name} must be positive, got {weight}")
            }
            Self::InvalidHealth { name, hp } => {
                write!(f, "hp for {name} must be positive, got {hp}")
            }
            Self::InvalidDropRate { name, rate } => {
                write!(f, "drop rate for {name} must be within [0, 1], got {rate}")
            }
            Self::EmptyPowerUpTable => write!(f, "power-up table is empty"),
            Self::InvalidSpawnInterval => write!(f, "spawn_interval_ms must be non-zero"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
