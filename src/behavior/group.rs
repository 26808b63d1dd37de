//! Swarm: drift toward the local centroid of nearby siblings while advancing.

use glam::Vec2;

use super::{steer, BehaviorState, WorldContext};
use crate::entities::Enemy;
use crate::pool::Handle;

const RECOMPUTE_MS: u64 = 1_000;
const NEIGHBOR_RADIUS: f32 = 250.0;
const ADVANCE_FRACTION: f32 = 0.5;
const COHESION_FRACTION: f32 = 0.5;

pub(super) fn swarm(enemy: &mut Enemy, ctx: &WorldContext) {
    let (id, pos, speed) = (enemy.id, enemy.pos, enemy.speed);
    let BehaviorState::Swarm { centroid, next_recompute_at } = &mut enemy.ai else {
        return;
    };
    if ctx.now >= *next_recompute_at {
        *centroid = local_centroid(id, pos, ctx);
        *next_recompute_at = ctx.now + RECOMPUTE_MS;
    }
    enemy.vel = match *centroid {
        Some(center) => {
            Vec2::new(-speed * ADVANCE_FRACTION, 0.0)
                + steer(pos, center, speed * COHESION_FRACTION)
        }
        None => Vec2::new(-speed, 0.0),
    };
}

fn local_centroid(id: Handle, pos: Vec2, ctx: &WorldContext) -> Option<Vec2> {
    let mut sum = Vec2::ZERO;
    let mut count = 0u32;
    for n in ctx.neighbors {
        if n.id != id && n.pos.distance(pos) <= NEIGHBOR_RADIUS {
            sum += n.pos;
            count += 1;
        }
    }
    (count > 0).then(|| sum / count as f32)
}
