//! Multi-phase strategies for `smart` and `boss`.
//!
//! Phase table:
//!   0 direct chase
//!   1 flank offset
//!   2 distance keeping
//!   3 vertical sine sweep
//!
//! `smart` jumps to a random different phase on each switch, `boss` walks
//! them in order.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use tracing::trace;

use super::tactical::{keep_distance, Band};
use super::{steer, Behavior, BehaviorState, WorldContext};
use crate::entities::Enemy;

const PHASE_COUNT: u8 = 4;
const CHASE_FRACTION: f32 = 0.8;
const FLANK_OFFSET: f32 = 200.0;
const KEEP_BAND: Band = Band { inner: 250.0, outer: 400.0, approach: 0.7, retreat: 0.6 };
const SWEEP_PERIOD_MS: f32 = 1_500.0;
const SMART_SWEEP_ADVANCE: f32 = 0.3;

pub(super) fn update(enemy: &mut Enemy, ctx: &WorldContext, rng: &mut impl Rng) {
    let is_boss = enemy.behavior == Behavior::Boss;
    let BehaviorState::Phased { phase, entered_at, next_switch_at, flank_sign } = &mut enemy.ai
    else {
        return;
    };
    if ctx.now >= *next_switch_at {
        *phase = if is_boss {
            (*phase + 1) % PHASE_COUNT
        } else {
            (*phase + rng.gen_range(1..PHASE_COUNT)) % PHASE_COUNT
        };
        *entered_at = ctx.now;
        *next_switch_at = ctx.now + rng.gen_range(2_000..=5_000);
        *flank_sign = -*flank_sign;
        trace!(enemy = %enemy.id, phase = *phase, "phase switch");
    }
    let (phase, entered_at, flank_sign) = (*phase, *entered_at, *flank_sign);

    // The sweep is the only phase that does not need the player.
    if phase == 3 {
        let t = ctx.now.saturating_sub(entered_at) as f32;
        let vy = (TAU * t / SWEEP_PERIOD_MS).cos() * enemy.speed;
        let vx = if is_boss { 0.0 } else { -enemy.speed * SMART_SWEEP_ADVANCE };
        enemy.vel = Vec2::new(vx, vy);
        return;
    }
    let Some(player) = ctx.player else {
        return;
    };
    match phase {
        0 => enemy.vel = steer(enemy.pos, player.pos, enemy.speed * CHASE_FRACTION),
        1 => {
            let side = (player.pos - enemy.pos).perp().normalize_or_zero();
            let target = player.pos + side * FLANK_OFFSET * flank_sign;
            enemy.vel = steer(enemy.pos, target, enemy.speed * CHASE_FRACTION);
        }
        _ => keep_distance(enemy, player.pos, KEEP_BAND),
    }
}
