//! AI strategy engine: one pass over every active enemy per tick.
//!
//! For each enemy the pass applies the enrage switch, runs its behavior,
//! integrates position and decides whether it shoots.  Sibling positions are
//! snapshotted before the pass so group behaviors see a consistent world.

use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::behavior::{self, BehaviorState, Neighbor, PlayerView, WorldContext};
use crate::entities::{Bounds, Enemy};
use crate::pool::{Handle, Pool};

/// Enemies switch to their enraged behavior at this health fraction.
pub const ENRAGE_THRESHOLD: f32 = 0.5;

/// An enemy wants to shoot; the world turns this into a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotIntent {
    pub shooter: Handle,
    pub origin: Vec2,
    /// Unit vector toward the player.
    pub direction: Vec2,
}

/// Tick inputs the AI pass needs besides the enemies themselves.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    pub now: u64,
    pub dt: f32,
    pub bounds: Bounds,
    pub player: Option<PlayerView>,
}

pub fn neighbors(enemies: &Pool<Enemy>) -> Vec<Neighbor> {
    enemies
        .iter()
        .filter(|(_, e)| e.is_active())
        .map(|(id, e)| Neighbor { id, pos: e.pos })
        .collect()
}

pub fn step(enemies: &mut Pool<Enemy>, frame: Frame, rng: &mut impl Rng) -> Vec<ShotIntent> {
    let snapshot = neighbors(enemies);
    let ctx = WorldContext {
        now: frame.now,
        dt: frame.dt,
        bounds: frame.bounds,
        player: frame.player,
        neighbors: &snapshot,
    };
    let mut shots = Vec::new();
    for (_, enemy) in enemies.iter_mut() {
        if !enemy.is_active() {
            continue;
        }
        think(enemy, &ctx, rng);
        if let Some(shot) = maybe_shoot(enemy, &ctx) {
            shots.push(shot);
        }
    }
    shots
}

/// Behavior update plus kinematic integration for one enemy.
pub fn think(enemy: &mut Enemy, ctx: &WorldContext, rng: &mut impl Rng) {
    enrage(enemy, ctx.now, rng);
    behavior::update(enemy, ctx, rng);
    enemy.pos += enemy.vel * ctx.dt;
    enemy.pos.y = ctx.bounds.clamp_y(enemy.pos.y);
}

fn enrage(enemy: &mut Enemy, now: u64, rng: &mut impl Rng) {
    if enemy.enraged || enemy.health > enemy.max_health * ENRAGE_THRESHOLD {
        return;
    }
    let Some(next) = enemy.enraged_behavior else {
        return;
    };
    enemy.enraged = true;
    enemy.behavior = next;
    enemy.ai = BehaviorState::init(next, now, rng);
    debug!(enemy = %enemy.id, behavior = next.tag(), "enraged");
}

fn maybe_shoot(enemy: &mut Enemy, ctx: &WorldContext) -> Option<ShotIntent> {
    let interval = enemy.shoot_interval_ms?;
    if ctx.now < enemy.next_shot_at || enemy.ai.holds_fire() {
        return None;
    }
    let player = ctx.player?;
    let direction = (player.pos - enemy.pos).try_normalize()?;
    enemy.next_shot_at = ctx.now.saturating_add(interval);
    Some(ShotIntent { shooter: enemy.id, origin: enemy.pos, direction })
}
