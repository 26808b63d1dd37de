/// Naive overlap detection for the terminal demo.
///
/// The core never detects collisions itself; it only reacts to the pairs a
/// collaborator reports.  This module is that collaborator: every entity is
/// a circle and every relevant pair is tested each frame.

use arcade_combat::entities::ProjectileOwner;
use arcade_combat::{Collision, World};
use glam::Vec2;

const R_PLAYER: f32 = 18.0;
const R_ENEMY: f32 = 22.0;
const R_PROJECTILE: f32 = 6.0;
const R_DROP: f32 = 18.0;
const R_OBSTACLE: f32 = 24.0;

fn overlaps(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) <= (ra + rb) * (ra + rb)
}

pub fn detect(world: &World) -> Vec<Collision> {
    let mut hits = Vec::new();
    let player = world.player().filter(|p| p.active && !p.defeated);

    for (projectile, shot) in world.projectiles().iter() {
        if shot.spent {
            continue;
        }
        match shot.owner {
            ProjectileOwner::Player => {
                for (enemy, e) in world.enemies().iter() {
                    if !e.dead && overlaps(shot.pos, R_PROJECTILE, e.pos, R_ENEMY) {
                        hits.push(Collision::ProjectileEnemy { projectile, enemy });
                    }
                }
                for (obstacle, o) in world.obstacles().iter() {
                    if !o.destroyed && overlaps(shot.pos, R_PROJECTILE, o.pos, R_OBSTACLE) {
                        hits.push(Collision::ProjectileObstacle { projectile, obstacle });
                    }
                }
            }
            ProjectileOwner::Enemy => {
                if player.is_some_and(|p| overlaps(shot.pos, R_PROJECTILE, p.pos, R_PLAYER)) {
                    hits.push(Collision::PlayerProjectile { projectile });
                }
            }
        }
    }

    let Some(player) = player else {
        return hits;
    };
    for (enemy, e) in world.enemies().iter() {
        if !e.dead && overlaps(player.pos, R_PLAYER, e.pos, R_ENEMY) {
            hits.push(Collision::PlayerEnemy { enemy });
        }
    }
    for (drop, d) in world.drops().iter() {
        if !d.collected && overlaps(player.pos, R_PLAYER, d.pos, R_DROP) {
            hits.push(Collision::PlayerDrop { drop });
        }
    }
    hits
}
