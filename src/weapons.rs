//! Weapon table and the player's arsenal.
//!
//! `WeaponSpec` is static configuration.  The only mutable weapon state is
//! ammunition and the per-weapon fire clock, both held by `Arsenal`.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffs::AggregateState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Blaster,
    Spread,
    Laser,
    Seeker,
    Grenade,
    Nuke,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 6] = [
        WeaponKind::Blaster,
        WeaponKind::Spread,
        WeaponKind::Laser,
        WeaponKind::Seeker,
        WeaponKind::Grenade,
        WeaponKind::Nuke,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WeaponKind::Blaster => "Blaster",
            WeaponKind::Spread => "Spread",
            WeaponKind::Laser => "Laser",
            WeaponKind::Seeker => "Seeker",
            WeaponKind::Grenade => "Grenade",
            WeaponKind::Nuke => "Nuke",
        }
    }
}

/// Area-of-effect parameters.  Everything inside `radius` dies; score
/// falls off with distance but never below `min_factor`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaBlast {
    pub radius: f32,
    pub min_factor: f32,
    pub base_score: u32,
    /// Also detonate when the projectile leaves the playfield.
    #[serde(default)]
    pub on_boundary_exit: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Special {
    #[default]
    None,
    /// Bounded-turn pursuit of the nearest enemy, `max_turn` radians per tick.
    Homing { max_turn: f32 },
    /// Continuous beam segment: pierces instead of being consumed on impact.
    Beam,
    Area(AreaBlast),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub kind: WeaponKind,
    pub damage: f32,
    pub fire_interval_ms: u64,
    pub projectile_speed: f32,
    #[serde(default = "WeaponSpec::default_lifetime")]
    pub lifetime_ms: u64,
    #[serde(default = "WeaponSpec::default_burst_count")]
    pub burst_count: u32,
    #[serde(default)]
    pub burst_delay_ms: u64,
    /// Projectiles per volley, fanned across `spread_angle` radians.
    #[serde(default = "WeaponSpec::default_spread_count")]
    pub spread_count: u32,
    #[serde(default)]
    pub spread_angle: f32,
    #[serde(default)]
    pub ammo_cost: u32,
    /// `None` means unlimited.
    #[serde(default)]
    pub start_ammo: Option<u32>,
    #[serde(default)]
    pub pack_size: u32,
    #[serde(default)]
    pub pack_price: u64,
    #[serde(default)]
    pub special: Special,
}

impl WeaponSpec {
    const fn default_lifetime() -> u64 {
        2_000
    }

    const fn default_burst_count() -> u32 {
        1
    }

    const fn default_spread_count() -> u32 {
        1
    }

    /// The built-in arsenal.
    pub fn defaults() -> Vec<WeaponSpec> {
        let base = |kind, damage, fire_interval_ms, projectile_speed| WeaponSpec {
            kind,
            damage,
            fire_interval_ms,
            projectile_speed,
            lifetime_ms: Self::default_lifetime(),
            burst_count: 1,
            burst_delay_ms: 0,
            spread_count: 1,
            spread_angle: 0.0,
            ammo_cost: 1,
            start_ammo: None,
            pack_size: 0,
            pack_price: 0,
            special: Special::None,
        };
        vec![
            WeaponSpec { ammo_cost: 0, ..base(WeaponKind::Blaster, 10.0, 250, 700.0) },
            WeaponSpec {
                spread_count: 5,
                spread_angle: 0.6,
                start_ammo: Some(60),
                pack_size: 30,
                pack_price: 150,
                ..base(WeaponKind::Spread, 8.0, 400, 650.0)
            },
            WeaponSpec {
                lifetime_ms: 300,
                start_ammo: Some(200),
                pack_size: 100,
                pack_price: 200,
                special: Special::Beam,
                ..base(WeaponKind::Laser, 4.0, 60, 2_400.0)
            },
            WeaponSpec {
                lifetime_ms: 3_500,
                burst_count: 3,
                burst_delay_ms: 120,
                start_ammo: Some(24),
                pack_size: 12,
                pack_price: 250,
                special: Special::Homing { max_turn: 0.15 },
                ..base(WeaponKind::Seeker, 25.0, 600, 420.0)
            },
            WeaponSpec {
                lifetime_ms: 2_500,
                start_ammo: Some(10),
                pack_size: 5,
                pack_price: 300,
                special: Special::Area(AreaBlast {
                    radius: 180.0,
                    min_factor: 0.5,
                    base_score: 100,
                    on_boundary_exit: true,
                }),
                ..base(WeaponKind::Grenade, 30.0, 900, 380.0)
            },
            WeaponSpec {
                lifetime_ms: 4_000,
                start_ammo: Some(2),
                pack_size: 1,
                pack_price: 1_000,
                special: Special::Area(AreaBlast {
                    radius: 400.0,
                    min_factor: 0.3,
                    base_score: 150,
                    on_boundary_exit: true,
                }),
                ..base(WeaponKind::Nuke, 100.0, 3_000, 300.0)
            },
        ]
    }

    /// Fire interval after the fire-rate multiplier.
    pub fn effective_interval(&self, fire_rate_multiplier: f32) -> u64 {
        if fire_rate_multiplier <= 0.0 {
            return self.fire_interval_ms;
        }
        (self.fire_interval_ms as f32 / fire_rate_multiplier).round() as u64
    }
}

/// A projectile the world should spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotRequest {
    pub weapon: WeaponKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub special: Special,
    pub lifetime_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FireOutcome {
    Fired {
        shots: Vec<ShotRequest>,
        /// Further volleys to schedule, `burst_delay_ms` apart.
        follow_ups: u32,
        burst_delay_ms: u64,
    },
    CoolingDown { ready_at: u64 },
    /// Not enough ammunition.  `message` is meant for the player.
    OutOfAmmo { weapon: WeaponKind, message: String },
    /// The weapon is not in the configured table.
    Unavailable,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PurchaseOutcome {
    Bought { added: u32, ammo: u32, price: u64 },
    InsufficientCredits { price: u64, credits: u64 },
    /// Unlimited or unknown weapons cannot be restocked.
    NotForSale,
}

#[derive(Clone, Debug)]
struct Slot {
    kind: WeaponKind,
    ammo: Option<u32>,
    last_fired_at: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct Arsenal {
    table: Vec<WeaponSpec>,
    slots: Vec<Slot>,
    selected: WeaponKind,
}

impl Arsenal {
    pub fn new(table: Vec<WeaponSpec>) -> Self {
        let slots = table
            .iter()
            .map(|w| Slot { kind: w.kind, ammo: w.start_ammo, last_fired_at: None })
            .collect();
        let selected = table.first().map(|w| w.kind).unwrap_or(WeaponKind::Blaster);
        Self { table, slots, selected }
    }

    pub fn spec(&self, kind: WeaponKind) -> Option<&WeaponSpec> {
        self.table.iter().find(|w| w.kind == kind)
    }

    pub fn selected(&self) -> WeaponKind {
        self.selected
    }

    pub fn select(&mut self, kind: WeaponKind) -> bool {
        if self.spec(kind).is_none() {
            return false;
        }
        self.selected = kind;
        true
    }

    /// Remaining ammunition, `None` when unlimited or not carried.
    pub fn ammo(&self, kind: WeaponKind) -> Option<u32> {
        self.slot(kind).and_then(|s| s.ammo)
    }

    pub fn kinds(&self) -> impl Iterator<Item = WeaponKind> + '_ {
        self.table.iter().map(|w| w.kind)
    }

    fn slot(&self, kind: WeaponKind) -> Option<&Slot> {
        self.slots.iter().find(|s| s.kind == kind)
    }

    fn slot_mut(&mut self, kind: WeaponKind) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.kind == kind)
    }

    /// Pull the trigger on the selected weapon.
    pub fn fire(&mut self, now: u64, origin: Vec2, aim: Vec2, agg: &AggregateState) -> FireOutcome {
        let kind = self.selected;
        let Some(spec) = self.spec(kind).cloned() else {
            return FireOutcome::Unavailable;
        };
        let Some(slot) = self.slot_mut(kind) else {
            return FireOutcome::Unavailable;
        };

        if let Some(last) = slot.last_fired_at {
            let ready_at = last.saturating_add(spec.effective_interval(agg.fire_rate_multiplier));
            if now < ready_at {
                return FireOutcome::CoolingDown { ready_at };
            }
        }

        if !agg.free_ammo {
            if let Some(ammo) = slot.ammo {
                if ammo < spec.ammo_cost {
                    return FireOutcome::OutOfAmmo {
                        weapon: kind,
                        message: format!("{} is out of ammo", kind.label()),
                    };
                }
                slot.ammo = Some(ammo - spec.ammo_cost);
            }
        }
        slot.last_fired_at = Some(now);

        debug!(weapon = ?kind, now, "weapon fired");
        FireOutcome::Fired {
            shots: volley(&spec, origin, aim, agg),
            follow_ups: spec.burst_count.saturating_sub(1),
            burst_delay_ms: spec.burst_delay_ms,
        }
    }

    /// One follow-up volley of a burst.  Pays its own ammunition and is
    /// dropped silently once the weapon runs dry.
    pub fn burst_volley(
        &mut self,
        kind: WeaponKind,
        origin: Vec2,
        aim: Vec2,
        agg: &AggregateState,
    ) -> Option<Vec<ShotRequest>> {
        let spec = self.spec(kind)?.clone();
        let slot = self.slot_mut(kind)?;
        if !agg.free_ammo {
            if let Some(ammo) = slot.ammo {
                if ammo < spec.ammo_cost {
                    return None;
                }
                slot.ammo = Some(ammo - spec.ammo_cost);
            }
        }
        Some(volley(&spec, origin, aim, agg))
    }

    /// Buy one ammunition pack for `kind`, paid from `credits`.
    pub fn purchase(&mut self, kind: WeaponKind, credits: &mut u64) -> PurchaseOutcome {
        let Some(spec) = self.spec(kind) else {
            return PurchaseOutcome::NotForSale;
        };
        let (size, price) = (spec.pack_size, spec.pack_price);
        if size == 0 {
            return PurchaseOutcome::NotForSale;
        }
        let Some(slot) = self.slot_mut(kind) else {
            return PurchaseOutcome::NotForSale;
        };
        let Some(ammo) = slot.ammo else {
            return PurchaseOutcome::NotForSale;
        };
        if *credits < price {
            return PurchaseOutcome::InsufficientCredits { price, credits: *credits };
        }
        *credits -= price;
        let ammo = ammo.saturating_add(size);
        slot.ammo = Some(ammo);
        PurchaseOutcome::Bought { added: size, ammo, price }
    }
}

/// Projectiles for one volley of `spec`, fanned evenly around `aim`.
pub fn volley(
    spec: &WeaponSpec,
    origin: Vec2,
    aim: Vec2,
    agg: &AggregateState,
) -> Vec<ShotRequest> {
    let dir = aim.try_normalize().unwrap_or(Vec2::X);
    let heading = dir.y.atan2(dir.x);
    let count = spec.spread_count.max(1);
    let (first, step) = if count > 1 {
        (heading - spec.spread_angle * 0.5, spec.spread_angle / (count - 1) as f32)
    } else {
        (heading, 0.0)
    };

    (0..count)
        .map(|i| {
            let angle = first + step * i as f32;
            ShotRequest {
                weapon: spec.kind,
                pos: origin,
                vel: Vec2::from_angle(angle) * spec.projectile_speed,
                damage: spec.damage * agg.damage_multiplier,
                special: spec.special,
                lifetime_ms: spec.lifetime_ms,
            }
        })
        .collect()
}
