use std::error::Error;
use std::io::Write;

use arcade_combat::behavior::Behavior;
use arcade_combat::entities::PowerUpKind;
use arcade_combat::weapons::{Special, WeaponKind};
use arcade_combat::{ConfigError, GameConfig};

// ── Defaults ──────────────────────────────────────────────────────────────────

#[test]
fn defaults_validate() {
    let config = GameConfig::default();
    config.validate().unwrap();
    assert_eq!(config.weapons.len(), WeaponKind::ALL.len());
    assert_eq!(config.power_ups.len(), PowerUpKind::ALL.len());
    assert_eq!(config.drops.rate_for("thug"), 0.15);
    assert_eq!(config.drops.rate_for("nobody"), config.drops.default_rate);
}

#[test]
fn default_level_uses_every_behavior_family() {
    let config = GameConfig::default();
    for b in [
        Behavior::Straight,
        Behavior::Zigzag,
        Behavior::Chase,
        Behavior::Sniper,
        Behavior::Smart,
        Behavior::Swarm,
        Behavior::Phase,
    ] {
        assert!(
            config.level.enemy_types.iter().any(|t| t.behavior == b),
            "no enemy type uses {b:?}"
        );
    }
}

#[test]
fn empty_object_is_all_defaults() {
    let config = GameConfig::from_json_str("{}").unwrap();
    assert_eq!(config, GameConfig::default());
}

// ── Partial files ─────────────────────────────────────────────────────────────

#[test]
fn partial_level_keeps_other_defaults() {
    let json = r#"{
        "level": {
            "name": "Docks",
            "enemy_types": [
                { "name": "thug", "hp": 10, "speed": 100, "behavior": "zigzag", "weight": 1.0 }
            ]
        },
        "rules": { "kill_bonus": 25 }
    }"#;
    let config = GameConfig::from_json_str(json).unwrap();
    assert_eq!(config.level.name, "Docks");
    assert_eq!(config.level.spawn_interval_ms, 1_200);
    let thug = config.level.enemy_type("thug").unwrap();
    assert_eq!(thug.behavior, Behavior::Zigzag);
    assert_eq!(thug.damage, 10.0);
    assert_eq!(thug.score, 100);
    assert_eq!(thug.shoot_interval_ms, None);
    assert_eq!(config.rules.kill_bonus, 25);
    assert_eq!(config.rules.escape_damage, 10.0);
    assert_eq!(config.weapons.len(), 6);
}

#[test]
fn weapon_specials_parse() {
    let json = r#"{
        "weapons": [
            { "kind": "blaster", "damage": 5, "fire_interval_ms": 100, "projectile_speed": 500 },
            { "kind": "seeker", "damage": 20, "fire_interval_ms": 500, "projectile_speed": 400,
              "special": { "type": "homing", "max_turn": 0.2 } },
            { "kind": "nuke", "damage": 0, "fire_interval_ms": 3000, "projectile_speed": 300,
              "start_ammo": 1,
              "special": { "type": "area", "radius": 300, "min_factor": 0.25, "base_score": 120 } }
        ]
    }"#;
    let config = GameConfig::from_json_str(json).unwrap();
    assert_eq!(config.weapons[0].special, Special::None);
    assert_eq!(config.weapons[0].burst_count, 1);
    assert_eq!(config.weapons[1].special, Special::Homing { max_turn: 0.2 });
    let Special::Area(blast) = config.weapons[2].special else {
        panic!("expected an area weapon");
    };
    assert_eq!(blast.radius, 300.0);
    assert!(!blast.on_boundary_exit);
    assert_eq!(config.weapons[2].start_ammo, Some(1));
}

#[test]
fn power_up_effects_default_to_neutral() {
    let json = r#"{
        "power_ups": [
            { "kind": "damage_boost", "weight": 1.0, "duration_ms": 5000,
              "effect": { "damage_multiplier": 2.0 } }
        ]
    }"#;
    let config = GameConfig::from_json_str(json).unwrap();
    let effect = config.power_ups[0].effect;
    assert_eq!(effect.damage_multiplier, 2.0);
    assert_eq!(effect.fire_rate_multiplier, 1.0);
    assert!(!effect.free_ammo);
    assert!(!effect.invulnerable);
}

// ── Rejections ────────────────────────────────────────────────────────────────

#[test]
fn unknown_behavior_is_rejected() {
    let json = r#"{ "level": { "enemy_types": [
        { "name": "x", "hp": 10, "speed": 100, "behavior": "teleport", "weight": 1.0 }
    ] } }"#;
    let err = GameConfig::from_json_str(json).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "got {err}");
}

#[test]
fn unknown_power_up_is_rejected() {
    let json = r#"{ "power_ups": [ { "kind": "jetpack", "weight": 1.0 } ] }"#;
    assert!(matches!(GameConfig::from_json_str(json), Err(ConfigError::Parse(_))));
}

#[test]
fn empty_enemy_table_is_rejected() {
    let json = r#"{ "level": { "enemy_types": [] } }"#;
    assert!(matches!(GameConfig::from_json_str(json), Err(ConfigError::EmptyEnemyTable)));
}

#[test]
fn duplicate_enemy_type_is_rejected() {
    let mut config = GameConfig::default();
    let copy = config.level.enemy_types[0].clone();
    config.level.enemy_types.push(copy);
    match config.validate() {
        Err(ConfigError::DuplicateEnemyType { name }) => assert_eq!(name, "thug"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn non_positive_weight_is_rejected() {
    let mut config = GameConfig::default();
    config.level.enemy_types[1].weight = 0.0;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidWeight { .. })));

    let mut config = GameConfig::default();
    config.power_ups[0].weight = f32::NAN;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidWeight { .. })));
}

#[test]
fn bad_drop_rate_is_rejected() {
    let mut config = GameConfig::default();
    config.drops.rates.insert("thug".to_string(), 1.5);
    assert!(matches!(config.validate(), Err(ConfigError::InvalidDropRate { .. })));
}

#[test]
fn zero_spawn_interval_is_rejected() {
    let mut config = GameConfig::default();
    config.level.spawn_interval_ms = 0;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidSpawnInterval)));
}

#[test]
fn unknown_drop_source_only_warns() {
    let mut config = GameConfig::default();
    config.drops.rates.insert("dragon".to_string(), 0.5);
    config.validate().unwrap();
}

// ── Files ─────────────────────────────────────────────────────────────────────

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "level": {{ "name": "From Disk", "spawn_interval_ms": 900,
        "enemy_types": [ {{ "name": "wasp", "hp": 5, "speed": 200, "behavior": "buzz", "weight": 2 }} ] }} }}"#)
        .unwrap();
    let config = GameConfig::load(file.path()).unwrap();
    assert_eq!(config.level.name, "From Disk");
    assert_eq!(config.level.spawn_interval_ms, 900);
    assert_eq!(config.level.enemy_types[0].behavior, Behavior::Buzz);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = GameConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
    assert!(err.source().is_some());
}

#[test]
fn malformed_json_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();
    let err = GameConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().starts_with("invalid config"));
}
