//! Game configuration: level table, weapon table, power-ups, drop rates and
//! rule constants.
//!
//! Every section has a built-in default, so a JSON file only needs to name
//! what it overrides.  Behavior, power-up and weapon identifiers are closed
//! enums; an unknown tag fails deserialization and never reaches a tick.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::behavior::Behavior;
use crate::buffs::BonusEffect;
use crate::entities::{Bounds, ObstacleKind, PowerUpKind};
use crate::error::ConfigError;
use crate::level::LevelGoal;
use crate::weapons::{AreaBlast, WeaponSpec};

// ── Enemy types ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyTypeConfig {
    pub name: String,
    pub hp: f32,
    pub speed: f32,
    #[serde(default = "EnemyTypeConfig::default_damage")]
    pub damage: f32,
    #[serde(default = "EnemyTypeConfig::default_score")]
    pub score: u32,
    pub behavior: Behavior,
    /// Relative spawn weight within the level.
    pub weight: f32,
    #[serde(default)]
    pub shoot_interval_ms: Option<u64>,
    #[serde(default)]
    pub enraged_behavior: Option<Behavior>,
}

impl EnemyTypeConfig {
    const fn default_damage() -> f32 {
        10.0
    }

    const fn default_score() -> u32 {
        100
    }

    fn new(name: &str, hp: f32, speed: f32, score: u32, behavior: Behavior, weight: f32) -> Self {
        Self {
            name: name.to_string(),
            hp,
            speed,
            damage: Self::default_damage(),
            score,
            behavior,
            weight,
            shoot_interval_ms: None,
            enraged_behavior: None,
        }
    }
}

// ── Level ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    #[serde(default = "LevelConfig::default_name")]
    pub name: String,
    pub enemy_types: Vec<EnemyTypeConfig>,
    #[serde(default = "LevelConfig::default_spawn_interval")]
    pub spawn_interval_ms: u64,
    #[serde(default)]
    pub goal: LevelGoal,
    #[serde(default)]
    pub bounds: Bounds,
    /// World units per second the camera advances.
    #[serde(default = "LevelConfig::default_scroll_speed")]
    pub scroll_speed: f32,
    #[serde(default = "LevelConfig::default_score_multiplier")]
    pub score_multiplier: f32,
}

impl LevelConfig {
    fn default_name() -> String {
        "Outskirts".to_string()
    }

    const fn default_spawn_interval() -> u64 {
        1_200
    }

    const fn default_scroll_speed() -> f32 {
        120.0
    }

    const fn default_score_multiplier() -> f32 {
        1.0
    }

    pub fn enemy_type(&self, name: &str) -> Option<&EnemyTypeConfig> {
        self.enemy_types.iter().find(|t| t.name == name)
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        let gunner = EnemyTypeConfig {
            shoot_interval_ms: Some(1_800),
            ..EnemyTypeConfig::new("gunner", 30.0, 90.0, 150, Behavior::Sniper, 0.12)
        };
        let hound = EnemyTypeConfig {
            enraged_behavior: Some(Behavior::FastChase),
            ..EnemyTypeConfig::new("hound", 40.0, 160.0, 150, Behavior::Chase, 0.08)
        };
        let captain = EnemyTypeConfig {
            shoot_interval_ms: Some(1_400),
            ..EnemyTypeConfig::new("captain", 120.0, 120.0, 400, Behavior::Smart, 0.02)
        };
        let warlord = EnemyTypeConfig {
            damage: 25.0,
            shoot_interval_ms: Some(900),
            ..EnemyTypeConfig::new("warlord", 600.0, 100.0, 2_000, Behavior::Boss, 0.005)
        };
        Self {
            name: Self::default_name(),
            enemy_types: vec![
                EnemyTypeConfig::new("thug", 20.0, 140.0, 100, Behavior::Straight, 0.30),
                gunner,
                EnemyTypeConfig::new("wasp", 10.0, 180.0, 80, Behavior::Buzz, 0.10),
                EnemyTypeConfig::new("weaver", 20.0, 150.0, 110, Behavior::Zigzag, 0.10),
                EnemyTypeConfig::new("glider", 20.0, 150.0, 110, Behavior::Curve, 0.08),
                hound,
                EnemyTypeConfig::new("stalker", 35.0, 200.0, 250, Behavior::LightningHunt, 0.05),
                EnemyTypeConfig::new("hawk", 25.0, 170.0, 160, Behavior::Aerial, 0.04),
                EnemyTypeConfig::new("duelist", 45.0, 130.0, 180, Behavior::Honor, 0.03),
                EnemyTypeConfig::new("tactician", 40.0, 140.0, 200, Behavior::Tactical, 0.03),
                EnemyTypeConfig::new("drone", 12.0, 130.0, 60, Behavior::Swarm, 0.08),
                EnemyTypeConfig::new("lurker", 30.0, 150.0, 220, Behavior::Ambush, 0.04),
                EnemyTypeConfig::new("mimic", 30.0, 160.0, 220, Behavior::Deceive, 0.04),
                EnemyTypeConfig::new("spore", 50.0, 150.0, 200, Behavior::Root, 0.03),
                EnemyTypeConfig::new("wraith", 30.0, 140.0, 260, Behavior::Phase, 0.03),
                captain,
                warlord,
            ],
            spawn_interval_ms: Self::default_spawn_interval(),
            goal: LevelGoal::default(),
            bounds: Bounds::default(),
            scroll_speed: Self::default_scroll_speed(),
            score_multiplier: Self::default_score_multiplier(),
        }
    }
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerUpSpec {
    pub kind: PowerUpKind,
    pub weight: f32,
    /// Rare types get their weight boosted when the source drops generously.
    #[serde(default)]
    pub rare: bool,
    /// Zero for instant effects.
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub effect: BonusEffect,
    #[serde(default)]
    pub heal_amount: f32,
}

impl PowerUpSpec {
    fn timed(kind: PowerUpKind, weight: f32, duration_ms: u64, effect: BonusEffect) -> Self {
        Self { kind, weight, rare: false, duration_ms, effect, heal_amount: 0.0 }
    }

    pub fn defaults() -> Vec<PowerUpSpec> {
        vec![
            PowerUpSpec {
                kind: PowerUpKind::Heal,
                weight: 0.30,
                rare: false,
                duration_ms: 0,
                effect: BonusEffect::NEUTRAL,
                heal_amount: 30.0,
            },
            Self::timed(PowerUpKind::DamageBoost, 0.25, 8_000, BonusEffect::damage(1.5)),
            Self::timed(PowerUpKind::RapidFire, 0.25, 8_000, BonusEffect::fire_rate(2.0)),
            PowerUpSpec {
                rare: true,
                ..Self::timed(PowerUpKind::Overdrive, 0.08, 6_000, BonusEffect::damage(2.5))
            },
            Self::timed(PowerUpKind::FreeAmmo, 0.15, 10_000, BonusEffect::free_ammo()),
            PowerUpSpec {
                rare: true,
                ..Self::timed(PowerUpKind::Shield, 0.06, 5_000, BonusEffect::invulnerable())
            },
        ]
    }
}

// ── Drops ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DropConfig {
    /// Drop probability keyed by enemy type name or obstacle label.
    #[serde(default)]
    pub rates: HashMap<String, f32>,
    #[serde(default = "DropConfig::default_rate")]
    pub default_rate: f32,
    /// Sources dropping more often than this get the rarity boost.
    #[serde(default = "DropConfig::default_rarity_threshold")]
    pub rarity_threshold: f32,
    #[serde(default = "DropConfig::default_rarity_boost")]
    pub rarity_boost: f32,
}

impl DropConfig {
    const fn default_rate() -> f32 {
        0.15
    }

    const fn default_rarity_threshold() -> f32 {
        0.4
    }

    const fn default_rarity_boost() -> f32 {
        3.0
    }

    /// Drop probability for an enemy type or obstacle label.
    pub fn rate_for(&self, source: &str) -> f32 {
        self.rates.get(source).copied().unwrap_or(self.default_rate)
    }
}

impl Default for DropConfig {
    fn default() -> Self {
        let rates = [
            ("thug", 0.15),
            ("gunner", 0.25),
            ("stalker", 0.35),
            ("captain", 0.5),
            ("warlord", 0.6),
            ("crate", 0.45),
            ("barrel", 0.2),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Self {
            rates,
            default_rate: Self::default_rate(),
            rarity_threshold: Self::default_rarity_threshold(),
            rarity_boost: Self::default_rarity_boost(),
        }
    }
}

// ── Rules ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Flat bonus added to every direct kill.
    pub kill_bonus: u32,
    pub escape_damage: f32,
    pub player_max_health: f32,
    pub contact_cooldown_ms: u64,
    pub drop_lifetime_ms: u64,
    /// How long before expiry a drop starts blinking.
    pub drop_warning_ms: u64,
    pub hit_flash_ms: u64,
    pub enemy_shot_speed: f32,
    pub enemy_shot_damage: f32,
    pub enemy_shot_lifetime_ms: u64,
    pub obstacle_health: f32,
    pub barrel_blast: AreaBlast,
    /// Projectiles survive this far outside the playfield.
    pub boundary_margin: f32,
    pub start_credits: u64,
    pub max_enemies: usize,
    pub max_projectiles: usize,
    pub max_drops: usize,
    pub max_obstacles: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            kill_bonus: 10,
            escape_damage: 10.0,
            player_max_health: 100.0,
            contact_cooldown_ms: 800,
            drop_lifetime_ms: 8_000,
            drop_warning_ms: 2_000,
            hit_flash_ms: 120,
            enemy_shot_speed: 320.0,
            enemy_shot_damage: 8.0,
            enemy_shot_lifetime_ms: 4_000,
            obstacle_health: 30.0,
            barrel_blast: AreaBlast {
                radius: 150.0,
                min_factor: 0.5,
                base_score: 50,
                on_boundary_exit: false,
            },
            boundary_margin: 40.0,
            start_credits: 0,
            max_enemies: 128,
            max_projectiles: 512,
            max_drops: 32,
            max_obstacles: 32,
        }
    }
}

// ── Root ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub level: LevelConfig,
    #[serde(default = "WeaponSpec::defaults")]
    pub weapons: Vec<WeaponSpec>,
    #[serde(default = "PowerUpSpec::defaults")]
    pub power_ups: Vec<PowerUpSpec>,
    #[serde(default)]
    pub drops: DropConfig,
    #[serde(default)]
    pub rules: RulesConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            level: LevelConfig::default(),
            weapons: WeaponSpec::defaults(),
            power_ups: PowerUpSpec::defaults(),
            drops: DropConfig::default(),
            rules: RulesConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config = Self::from_json_str(&text)?;
        info!(path = %path.display(), level = %config.level.name, "config loaded");
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = &self.level;
        if level.enemy_types.is_empty() {
            return Err(ConfigError::EmptyEnemyTable);
        }
        if level.spawn_interval_ms == 0 {
            return Err(ConfigError::InvalidSpawnInterval);
        }
        let mut seen = HashSet::new();
        for ty in &level.enemy_types {
            if !seen.insert(ty.name.as_str()) {
                return Err(ConfigError::DuplicateEnemyType { name: ty.name.clone() });
            }
            if !(ty.weight.is_finite() && ty.weight > 0.0) {
                return Err(ConfigError::InvalidWeight { name: ty.name.clone(), weight: ty.weight });
            }
            if !(ty.hp.is_finite() && ty.hp > 0.0) {
                return Err(ConfigError::InvalidHealth { name: ty.name.clone(), hp: ty.hp });
            }
        }

        if self.power_ups.is_empty() {
            return Err(ConfigError::EmptyPowerUpTable);
        }
        for spec in &self.power_ups {
            if !(spec.weight.is_finite() && spec.weight > 0.0) {
                return Err(ConfigError::InvalidWeight {
                    name: spec.kind.name().to_string(),
                    weight: spec.weight,
                });
            }
        }

        let drops = &self.drops;
        let in_unit = |rate: f32| (0.0..=1.0).contains(&rate);
        if !in_unit(drops.default_rate) {
            return Err(ConfigError::InvalidDropRate {
                name: "default_rate".to_string(),
                rate: drops.default_rate,
            });
        }
        for (source, &rate) in &drops.rates {
            if !in_unit(rate) {
                return Err(ConfigError::InvalidDropRate { name: source.clone(), rate });
            }
            let known = seen.contains(source.as_str())
                || [ObstacleKind::Crate, ObstacleKind::Barrel]
                    .iter()
                    .any(|k| k.label() == source);
            if !known {
                warn!(source = %source, "drop rate for unknown source is never used");
            }
        }
        Ok(())
    }
}
