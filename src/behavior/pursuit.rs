//! Pursuit behaviors: aim the velocity at the player (or at where the player
//! is about to be) at a per-behavior fraction of the enemy's speed.

use glam::Vec2;
use rand::Rng;

use super::{steer, BehaviorState, HuntStrategy, WorldContext};
use crate::entities::Enemy;

const CHASE_FRACTION: f32 = 0.7;
const FAST_CHASE_FRACTION: f32 = 0.55;
const RUSH_PERIOD_MS: u64 = 2_000;
const RUSH_LENGTH_MS: u64 = 400;
const AERIAL_FRACTION: f32 = 0.8;
/// Aerial enemies dive toward a point this far above the player.
const AERIAL_HOVER: f32 = 160.0;
const HONOR_FRACTION: f32 = 0.6;
const FLANK_OFFSET: f32 = 180.0;
const FLANK_FRACTION: f32 = 0.9;

pub(super) fn chase(enemy: &mut Enemy, ctx: &WorldContext) {
    let Some(player) = ctx.player else {
        return;
    };
    enemy.vel = steer(enemy.pos, player.pos, enemy.speed * CHASE_FRACTION);
}

/// Chase at reduced speed with a full-speed rush every `RUSH_PERIOD_MS`.
pub(super) fn fast_chase(enemy: &mut Enemy, ctx: &WorldContext) {
    let BehaviorState::FastChase { next_rush_at, rush_until } = &mut enemy.ai else {
        return;
    };
    if ctx.now >= *next_rush_at {
        *rush_until = ctx.now + RUSH_LENGTH_MS;
        *next_rush_at = ctx.now + RUSH_PERIOD_MS;
    }
    let rushing = ctx.now < *rush_until;
    let Some(player) = ctx.player else {
        return;
    };
    let fraction = if rushing { 1.0 } else { FAST_CHASE_FRACTION };
    enemy.vel = steer(enemy.pos, player.pos, enemy.speed * fraction);
}

pub(super) fn aerial(enemy: &mut Enemy, ctx: &WorldContext) {
    let Some(player) = ctx.player else {
        return;
    };
    let target = Vec2::new(player.pos.x, ctx.bounds.clamp_y(player.pos.y - AERIAL_HOVER));
    enemy.vel = steer(enemy.pos, target, enemy.speed * AERIAL_FRACTION);
}

/// Head-on approach at a measured pace.
pub(super) fn honor(enemy: &mut Enemy, ctx: &WorldContext) {
    let Some(player) = ctx.player else {
        return;
    };
    enemy.vel = steer(enemy.pos, player.pos, enemy.speed * HONOR_FRACTION);
}

/// Predictive pursuit alternating with flanking.  The predictive leg leads
/// the player by its current velocity times `distance / speed`.
pub(super) fn lightning_hunt(enemy: &mut Enemy, ctx: &WorldContext, rng: &mut impl Rng) {
    let BehaviorState::LightningHunt { strategy, next_switch_at, flank_sign } = &mut enemy.ai
    else {
        return;
    };
    if ctx.now >= *next_switch_at {
        *strategy = match strategy {
            HuntStrategy::Predictive => {
                *flank_sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                HuntStrategy::Flank
            }
            HuntStrategy::Flank => HuntStrategy::Predictive,
        };
        *next_switch_at = ctx.now + rng.gen_range(1_500..=3_000);
    }
    let Some(player) = ctx.player else {
        return;
    };
    let to_player = player.pos - enemy.pos;
    match strategy {
        HuntStrategy::Predictive => {
            let time_to_intercept = if enemy.speed > 0.0 {
                to_player.length() / enemy.speed
            } else {
                0.0
            };
            let predicted = player.pos + player.vel * time_to_intercept;
            enemy.vel = steer(enemy.pos, predicted, enemy.speed);
        }
        HuntStrategy::Flank => {
            let side = to_player.perp().normalize_or_zero() * FLANK_OFFSET * *flank_sign;
            enemy.vel = steer(enemy.pos, player.pos + side, enemy.speed * FLANK_FRACTION);
        }
    }
}
