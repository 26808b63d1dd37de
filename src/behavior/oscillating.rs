//! Straight-line and oscillating movers.  None of these look at the player.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{BehaviorState, WorldContext};
use crate::entities::Enemy;

const CURVE_PERIOD_MS: f32 = 2_000.0;
const CURVE_AMPLITUDE: f32 = 0.8;
const ZIGZAG_FRACTION: f32 = 0.7;
const BUZZ_ADVANCE: f32 = 0.5;
const BUZZ_JITTER_X: f32 = 0.3;
const BUZZ_JITTER_Y: f32 = 0.6;

pub(super) fn straight(enemy: &mut Enemy) {
    enemy.vel = Vec2::new(-enemy.speed, 0.0);
}

/// Sine wave whose vertical speed is a pure function of time since spawn.
pub(super) fn curve(enemy: &mut Enemy, ctx: &WorldContext) {
    let BehaviorState::Curve { phase } = enemy.ai else {
        return;
    };
    let elapsed = ctx.now.saturating_sub(enemy.spawned_at) as f32;
    let wave = (TAU * elapsed / CURVE_PERIOD_MS + phase).sin();
    enemy.vel = Vec2::new(-enemy.speed * 0.8, wave * enemy.speed * CURVE_AMPLITUDE);
}

/// Diagonal legs, flipping the vertical sign on a randomized period or when
/// a leg would leave the playfield.
pub(super) fn zigzag(enemy: &mut Enemy, ctx: &WorldContext, rng: &mut impl Rng) {
    let BehaviorState::Zigzag { sign, next_flip_at } = &mut enemy.ai else {
        return;
    };
    if ctx.now >= *next_flip_at {
        *sign = -*sign;
        *next_flip_at = ctx.now + rng.gen_range(400..=900);
    }
    if enemy.pos.y <= 0.0 {
        *sign = 1.0;
    } else if enemy.pos.y >= ctx.bounds.height {
        *sign = -1.0;
    }
    let leg = enemy.speed * ZIGZAG_FRACTION;
    enemy.vel = Vec2::new(-leg, *sign * leg);
}

/// Insect-like jitter: both axes re-roll their sign every few hundred ms.
pub(super) fn buzz(enemy: &mut Enemy, ctx: &WorldContext, rng: &mut impl Rng) {
    let BehaviorState::Buzz { sign_x, sign_y, next_flip_at } = &mut enemy.ai else {
        return;
    };
    if ctx.now >= *next_flip_at {
        *sign_x = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        *sign_y = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        *next_flip_at = ctx.now + rng.gen_range(120..=300);
    }
    let s = enemy.speed;
    enemy.vel = Vec2::new(
        -s * BUZZ_ADVANCE + *sign_x * s * BUZZ_JITTER_X,
        *sign_y * s * BUZZ_JITTER_Y,
    );
}
