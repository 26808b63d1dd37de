//! Combat resolution: direct hits, death, area blasts, homing guidance and
//! escapes.
//!
//! Death runs at most once per enemy.  Every path checks `Enemy::dead`
//! before touching health, score or events, so a second kill attempt on the
//! same enemy (say a direct hit and an area blast in one tick) is a no-op.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use tracing::{debug, trace};

use crate::entities::{Enemy, Player, Projectile};
use crate::events::{EventBus, FeedbackEffect, GameEvent};
use crate::pool::{Handle, Pool};
use crate::weapons::AreaBlast;

/// Running totals for the HUD.  Credits are earned one per score point and
/// spent on ammunition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CombatLedger {
    pub kills: u32,
    pub score: u64,
    pub escapes: u32,
    pub credits: u64,
}

/// Scoring parameters for direct kills.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreRules {
    pub multiplier: f32,
    pub kill_bonus: u32,
}

/// A completed kill.
#[derive(Clone, Debug, PartialEq)]
pub struct Kill {
    pub enemy: Handle,
    pub kind: String,
    pub position: Vec2,
    pub score: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HitOutcome {
    /// Dead or intangible target.
    Ignored,
    Damaged { remaining: f32 },
    Killed(Kill),
}

pub fn direct_score(base: u32, rules: ScoreRules) -> u32 {
    (base as f32 * rules.multiplier).floor() as u32 + rules.kill_bonus
}

/// Score for an area kill at `distance` from the center, or `None` when the
/// enemy is outside the blast.
pub fn aoe_score(base: u32, distance: f32, radius: f32, min_factor: f32) -> Option<u32> {
    if distance.is_nan() || distance >= radius {
        return None;
    }
    let factor = (1.0 - distance / radius).max(min_factor);
    Some((base as f32 * factor).floor() as u32)
}

/// Mark `enemy` dead and award `score`.  Returns `None` if it was already
/// dead, in which case nothing is counted or emitted.
pub fn kill_enemy(
    enemy: &mut Enemy,
    score: u32,
    ledger: &mut CombatLedger,
    events: &mut EventBus,
) -> Option<Kill> {
    if enemy.dead {
        return None;
    }
    enemy.dead = true;
    enemy.hit_flash = false;
    ledger.kills += 1;
    ledger.score += u64::from(score);
    ledger.credits += u64::from(score);
    events.push(GameEvent::EnemyDied {
        enemy: enemy.id,
        kind: enemy.kind.clone(),
        score,
        position: enemy.pos,
    });
    debug!(enemy = %enemy.id, kind = %enemy.kind, score, "enemy died");
    Some(Kill { enemy: enemy.id, kind: enemy.kind.clone(), position: enemy.pos, score })
}

pub fn apply_direct_hit(
    enemy: &mut Enemy,
    damage: f32,
    rules: ScoreRules,
    ledger: &mut CombatLedger,
    events: &mut EventBus,
) -> HitOutcome {
    if enemy.dead || enemy.is_intangible() {
        return HitOutcome::Ignored;
    }
    enemy.health -= damage;
    if enemy.health <= 0.0 {
        let score = direct_score(enemy.score, rules);
        return match kill_enemy(enemy, score, ledger, events) {
            Some(kill) => HitOutcome::Killed(kill),
            None => HitOutcome::Ignored,
        };
    }
    enemy.hit_flash = true;
    events.feedback(FeedbackEffect::Hit, enemy.pos);
    HitOutcome::Damaged { remaining: enemy.health }
}

/// Kill every active enemy strictly inside the blast.  The pass walks a
/// snapshot of handles taken up front.
pub fn resolve_area_blast(
    center: Vec2,
    blast: &AreaBlast,
    enemies: &mut Pool<Enemy>,
    ledger: &mut CombatLedger,
    events: &mut EventBus,
) -> Vec<Kill> {
    events.feedback(FeedbackEffect::Explosion, center);
    let mut kills = Vec::new();
    for handle in enemies.handles() {
        let Some(enemy) = enemies.get_mut(handle) else {
            continue;
        };
        if enemy.dead {
            continue;
        }
        let distance = enemy.pos.distance(center);
        let Some(score) = aoe_score(blast.base_score, distance, blast.radius, blast.min_factor)
        else {
            continue;
        };
        if let Some(kill) = kill_enemy(enemy, score, ledger, events) {
            kills.push(kill);
        }
    }
    debug!(x = center.x, y = center.y, radius = blast.radius, kills = kills.len(), "area blast");
    kills
}

/// Wrap an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

/// Rotate `vel` toward `bearing` by at most `max_turn` radians, keeping its
/// magnitude.
pub fn turn_toward(vel: Vec2, bearing: f32, max_turn: f32) -> Vec2 {
    let speed = vel.length();
    if speed == 0.0 {
        return vel;
    }
    let heading = vel.y.atan2(vel.x);
    let turn = wrap_angle(bearing - heading).clamp(-max_turn, max_turn);
    Vec2::from_angle(heading + turn) * speed
}

pub fn nearest_enemy(pos: Vec2, enemies: &Pool<Enemy>) -> Option<(Handle, Vec2)> {
    enemies
        .iter()
        .filter(|(_, e)| e.is_active())
        .map(|(h, e)| (h, e.pos, e.pos.distance_squared(pos)))
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(h, p, _)| (h, p))
}

/// One guidance step for a homing projectile.  Without a live enemy the
/// projectile keeps its heading and forgets its target.
pub fn steer_homing(
    projectile: &mut Projectile,
    enemies: &Pool<Enemy>,
    max_turn: f32,
) -> Option<Handle> {
    let Some((target, target_pos)) = nearest_enemy(projectile.pos, enemies) else {
        projectile.target = None;
        return None;
    };
    let to_target = target_pos - projectile.pos;
    let bearing = to_target.y.atan2(to_target.x);
    projectile.vel = turn_toward(projectile.vel, bearing, max_turn);
    if projectile.target != Some(target) {
        trace!(projectile = %projectile.id, target = %target, "homing retarget");
    }
    projectile.target = Some(target);
    Some(target)
}

/// Hurt the player.  Returns the damage actually taken.
pub fn damage_player(
    player: &mut Player,
    amount: f32,
    invulnerable: bool,
    events: &mut EventBus,
) -> f32 {
    if invulnerable || player.defeated || !player.active || amount <= 0.0 {
        return 0.0;
    }
    let taken = amount.min(player.health);
    player.health -= taken;
    events.push(GameEvent::PlayerDamaged { amount: taken, health: player.health });
    if player.health <= 0.0 {
        player.defeated = true;
        events.push(GameEvent::PlayerDefeated);
        debug!("player defeated");
    }
    taken
}

/// An enemy slipped past the trailing edge: remove it, hurt the player and
/// report it.  No score, no drop.
pub fn resolve_escape(
    enemy: &mut Enemy,
    player: Option<&mut Player>,
    escape_damage: f32,
    invulnerable: bool,
    ledger: &mut CombatLedger,
    events: &mut EventBus,
) -> bool {
    if enemy.dead {
        return false;
    }
    enemy.dead = true;
    ledger.escapes += 1;
    events.push(GameEvent::EnemyEscaped {
        enemy: enemy.id,
        damage: escape_damage,
        position: enemy.pos,
    });
    if let Some(player) = player {
        damage_player(player, escape_damage, invulnerable, events);
    }
    debug!(enemy = %enemy.id, kind = %enemy.kind, "enemy escaped");
    true
}
