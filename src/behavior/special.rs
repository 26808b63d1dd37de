//! Explicit state machines.  Transitions are guarded by distance to the
//! player and time spent in the current state.

use glam::Vec2;
use tracing::trace;

use super::{steer, AmbushState, BehaviorState, DeceiveState, PhaseState, RootState, WorldContext};
use crate::entities::Enemy;

const AMBUSH_TRIGGER_RANGE: f32 = 320.0;
const AMBUSH_MAX_HIDE_MS: u64 = 6_000;
const AMBUSH_CHARGE_MS: u64 = 600;
const AMBUSH_ATTACK_MS: u64 = 1_500;
const AMBUSH_ATTACK_SPEED: f32 = 1.8;
const AMBUSH_HIDE_DRIFT: f32 = 0.2;

const DECEIVE_DRIFT: f32 = 0.3;
const DECEIVE_TRIGGER_RANGE: f32 = 260.0;
const DECEIVE_MAX_DISGUISE_MS: u64 = 5_000;

const ROOT_TRIGGER_RANGE: f32 = 220.0;
const ROOT_LUNGE_SPEED: f32 = 2.0;
const ROOT_LUNGE_MS: u64 = 450;
const ROOT_RECOVER_MS: u64 = 1_000;
/// Rooted enemies still scroll with the world.
const ROOT_SCROLL: f32 = 0.25;

const PHASE_VISIBLE_MS: u64 = 2_500;
const PHASE_OUT_MS: u64 = 900;
const PHASE_CHASE: f32 = 0.5;
const PHASE_MAX_JUMP: f32 = 200.0;

fn distance_to_player(pos: Vec2, ctx: &WorldContext) -> Option<f32> {
    ctx.player.map(|p| p.pos.distance(pos))
}

pub(super) fn ambush(enemy: &mut Enemy, ctx: &WorldContext) {
    let (pos, speed) = (enemy.pos, enemy.speed);
    let near = distance_to_player(pos, ctx);
    let BehaviorState::Ambush { state, entered_at, charge_dir } = &mut enemy.ai else {
        return;
    };
    let in_state = ctx.now.saturating_sub(*entered_at);
    match *state {
        AmbushState::Hiding => {
            enemy.vel = Vec2::new(-speed * AMBUSH_HIDE_DRIFT, 0.0);
            let spotted = near.is_some_and(|d| d <= AMBUSH_TRIGGER_RANGE);
            if spotted || in_state >= AMBUSH_MAX_HIDE_MS {
                *state = AmbushState::Charging;
                *entered_at = ctx.now;
                trace!(enemy = %enemy.id, "ambush charging");
            }
        }
        AmbushState::Charging => {
            enemy.vel = Vec2::ZERO;
            if in_state >= AMBUSH_CHARGE_MS {
                // Lock the heading now; the attack does not track.
                *charge_dir = match ctx.player {
                    Some(p) => steer(pos, p.pos, 1.0),
                    None => Vec2::NEG_X,
                };
                if *charge_dir == Vec2::ZERO {
                    *charge_dir = Vec2::NEG_X;
                }
                *state = AmbushState::Attacking;
                *entered_at = ctx.now;
            }
        }
        AmbushState::Attacking => {
            enemy.vel = *charge_dir * speed * AMBUSH_ATTACK_SPEED;
            if in_state >= AMBUSH_ATTACK_MS {
                *state = AmbushState::Hiding;
                *entered_at = ctx.now;
            }
        }
    }
}

pub(super) fn deceive(enemy: &mut Enemy, ctx: &WorldContext) {
    let (pos, speed) = (enemy.pos, enemy.speed);
    let near = distance_to_player(pos, ctx);
    let BehaviorState::Deceive { state, entered_at } = &mut enemy.ai else {
        return;
    };
    if *state == DeceiveState::Disguised {
        let in_state = ctx.now.saturating_sub(*entered_at);
        if near.is_some_and(|d| d <= DECEIVE_TRIGGER_RANGE) || in_state >= DECEIVE_MAX_DISGUISE_MS
        {
            *state = DeceiveState::Exposed;
            *entered_at = ctx.now;
            trace!(enemy = %enemy.id, "disguise dropped");
        } else {
            enemy.vel = Vec2::new(-speed * DECEIVE_DRIFT, 0.0);
            return;
        }
    }
    if let Some(player) = ctx.player {
        enemy.vel = steer(pos, player.pos, speed);
    }
}

pub(super) fn root(enemy: &mut Enemy, ctx: &WorldContext) {
    let (pos, speed) = (enemy.pos, enemy.speed);
    let BehaviorState::Root { state, entered_at, lunge_dir } = &mut enemy.ai else {
        return;
    };
    let in_state = ctx.now.saturating_sub(*entered_at);
    match *state {
        RootState::Rooted => {
            enemy.vel = Vec2::new(-speed * ROOT_SCROLL, 0.0);
            if let Some(player) = ctx.player {
                if player.pos.distance(pos) <= ROOT_TRIGGER_RANGE {
                    *lunge_dir = steer(pos, player.pos, 1.0);
                    *state = RootState::Lunging;
                    *entered_at = ctx.now;
                }
            }
        }
        RootState::Lunging => {
            enemy.vel = *lunge_dir * speed * ROOT_LUNGE_SPEED;
            if in_state >= ROOT_LUNGE_MS {
                *state = RootState::Recovering;
                *entered_at = ctx.now;
            }
        }
        RootState::Recovering => {
            enemy.vel = Vec2::new(-speed * ROOT_SCROLL, 0.0);
            if in_state >= ROOT_RECOVER_MS {
                *state = RootState::Rooted;
                *entered_at = ctx.now;
            }
        }
    }
}

/// Visible (slow chase) and phased (stationary, intangible) alternate on
/// fixed timers.  Leaving the phased state re-materialises the enemy up to
/// half the distance to the player, capped at `PHASE_MAX_JUMP`.
pub(super) fn phase(enemy: &mut Enemy, ctx: &WorldContext) {
    let speed = enemy.speed;
    let BehaviorState::Phase { state, entered_at } = &mut enemy.ai else {
        return;
    };
    let in_state = ctx.now.saturating_sub(*entered_at);
    match *state {
        PhaseState::Visible => {
            if in_state >= PHASE_VISIBLE_MS {
                *state = PhaseState::Phased;
                *entered_at = ctx.now;
                enemy.vel = Vec2::ZERO;
                return;
            }
            if let Some(player) = ctx.player {
                enemy.vel = steer(enemy.pos, player.pos, speed * PHASE_CHASE);
            }
        }
        PhaseState::Phased => {
            enemy.vel = Vec2::ZERO;
            if in_state >= PHASE_OUT_MS {
                *state = PhaseState::Visible;
                *entered_at = ctx.now;
                if let Some(player) = ctx.player {
                    let delta = player.pos - enemy.pos;
                    let jump = (delta.length() * 0.5).min(PHASE_MAX_JUMP);
                    enemy.pos += delta.normalize_or_zero() * jump;
                    trace!(enemy = %enemy.id, jump, "rematerialised");
                }
            }
        }
    }
}
