//! Distance-band keepers.  Approach when farther than the outer bound,
//! back off when closer than the inner bound, hold still in between.

use glam::Vec2;

use super::{steer, WorldContext};
use crate::entities::Enemy;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Band {
    pub inner: f32,
    pub outer: f32,
    pub approach: f32,
    pub retreat: f32,
}

pub(super) const TACTICAL_BAND: Band =
    Band { inner: 200.0, outer: 350.0, approach: 0.7, retreat: 0.6 };
pub(super) const SNIPER_BAND: Band =
    Band { inner: 380.0, outer: 560.0, approach: 0.5, retreat: 0.5 };

pub(super) fn tactical(enemy: &mut Enemy, ctx: &WorldContext) {
    if let Some(player) = ctx.player {
        keep_distance(enemy, player.pos, TACTICAL_BAND);
    }
}

pub(super) fn sniper(enemy: &mut Enemy, ctx: &WorldContext) {
    if let Some(player) = ctx.player {
        keep_distance(enemy, player.pos, SNIPER_BAND);
    }
}

pub(super) fn keep_distance(enemy: &mut Enemy, target: Vec2, band: Band) {
    let distance = enemy.pos.distance(target);
    enemy.vel = if distance > band.outer {
        steer(enemy.pos, target, enemy.speed * band.approach)
    } else if distance < band.inner {
        steer(target, enemy.pos, enemy.speed * band.retreat)
    } else {
        Vec2::ZERO
    };
}
