//! World entity types.  Plain data plus the few helpers every module needs;
//! the rules that mutate them live in `ai`, `combat` and `world`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::behavior::{Behavior, BehaviorState};
use crate::config::EnemyTypeConfig;
use crate::pool::Handle;
use crate::weapons::{Special, WeaponKind};

// ── Playfield ─────────────────────────────────────────────────────────────────

/// The visible slice of the side-scrolling world.  Enemies enter at the
/// leading edge (`x = width`) and escape past the trailing one (`x < 0`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True while `pos` lies inside the playfield grown by `margin`.
    pub fn contains(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }

    pub fn clamp_y(&self, y: f32) -> f32 {
        y.clamp(0.0, self.height)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self { width: 1280.0, height: 720.0 }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// False while the player is absent (respawning, cut-scene, not yet
    /// placed).  Pursuit behaviors coast while this is false.
    pub active: bool,
    pub health: f32,
    pub max_health: f32,
    pub defeated: bool,
}

impl Player {
    pub fn new(pos: Vec2, max_health: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            active: true,
            health: max_health,
            max_health,
            defeated: false,
        }
    }

    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: Handle,
    /// Type tag, the enemy type's name in the level config.
    pub kind: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    /// Damage dealt to the player on contact.
    pub damage: f32,
    pub score: u32,
    pub behavior: Behavior,
    pub ai: BehaviorState,
    /// Behavior switched to once health falls to half.
    pub enraged_behavior: Option<Behavior>,
    pub enraged: bool,
    pub shoot_interval_ms: Option<u64>,
    pub next_shot_at: u64,
    pub contact_ready_at: u64,
    /// Brief hit-flash window, purely cosmetic.
    pub hit_flash: bool,
    pub spawned_at: u64,
    pub dead: bool,
}

impl Enemy {
    pub fn from_type(
        id: Handle,
        ty: &EnemyTypeConfig,
        pos: Vec2,
        now: u64,
        rng: &mut impl Rng,
    ) -> Self {
        let behavior = ty.behavior;
        let first_shot = ty
            .shoot_interval_ms
            .map(|iv| now.saturating_add(rng.gen_range(iv / 2..=iv)))
            .unwrap_or(u64::MAX);
        Self {
            id,
            kind: ty.name.clone(),
            pos,
            vel: Vec2::new(-ty.speed, 0.0),
            health: ty.hp,
            max_health: ty.hp,
            speed: ty.speed,
            damage: ty.damage,
            score: ty.score,
            behavior,
            ai: BehaviorState::init(behavior, now, rng),
            enraged_behavior: ty.enraged_behavior,
            enraged: false,
            shoot_interval_ms: ty.shoot_interval_ms,
            next_shot_at: first_shot,
            contact_ready_at: now,
            hit_flash: false,
            spawned_at: now,
            dead: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.dead
    }

    /// Phased enemies cannot be hit by direct fire.
    pub fn is_intangible(&self) -> bool {
        self.ai.is_intangible()
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub id: Handle,
    pub owner: ProjectileOwner,
    /// `None` for enemy shots.
    pub weapon: Option<WeaponKind>,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub special: Special,
    /// Last enemy the seeker steered toward.  A lookup, not ownership.
    pub target: Option<Handle>,
    pub spawned_at: u64,
    pub expires_at: u64,
    pub spent: bool,
}

impl Projectile {
    pub fn pierces(&self) -> bool {
        matches!(self.special, Special::Beam)
    }
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// Instant heal, never enters the buff stack.
    Heal,
    DamageBoost,
    RapidFire,
    Overdrive,
    FreeAmmo,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Heal,
        PowerUpKind::DamageBoost,
        PowerUpKind::RapidFire,
        PowerUpKind::Overdrive,
        PowerUpKind::FreeAmmo,
        PowerUpKind::Shield,
    ];

    pub fn symbol(&self) -> char {
        match self {
            PowerUpKind::Heal => '♥',
            PowerUpKind::DamageBoost => '▲',
            PowerUpKind::RapidFire => '!',
            PowerUpKind::Overdrive => '»',
            PowerUpKind::FreeAmmo => '∞',
            PowerUpKind::Shield => '◈',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PowerUpKind::Heal => "Repair",
            PowerUpKind::DamageBoost => "Damage Up",
            PowerUpKind::RapidFire => "Rapid Fire",
            PowerUpKind::Overdrive => "Overdrive",
            PowerUpKind::FreeAmmo => "Free Ammo",
            PowerUpKind::Shield => "Shield",
        }
    }
}

/// A power-up floating in the world, waiting to be picked up.
#[derive(Clone, Debug)]
pub struct PowerUpDrop {
    pub id: Handle,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub spawned_at: u64,
    /// Set once the drop is about to vanish, so renderers can blink it.
    pub blinking: bool,
    pub collected: bool,
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Crate,
    /// Detonates an area blast when broken.
    Barrel,
}

impl ObstacleKind {
    pub fn label(&self) -> &'static str {
        match self {
            ObstacleKind::Crate => "crate",
            ObstacleKind::Barrel => "barrel",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Obstacle {
    pub id: Handle,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub health: f32,
    pub destroyed: bool,
}
