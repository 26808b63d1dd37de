//! Behavior registry.
//!
//! A closed table from `Behavior` to its update function.  Every update reads
//! the enemy and a read-only `WorldContext` and writes the enemy's velocity
//! (occasionally its position) plus its own `BehaviorState`.  Velocity is set
//! directly each tick; there is no acceleration model.
//!
//! Families:
//! - oscillating: straight, curve, zigzag, buzz
//! - pursuit: chase, fast_chase, aerial, honor, lightning_hunt
//! - tactical: tactical, sniper
//! - phased: smart, boss
//! - group: swarm
//! - special-state: ambush, deceive, root, phase
//!
//! Behaviors that need the player coast on their last velocity while the
//! player is absent.

mod group;
mod oscillating;
mod phased;
mod pursuit;
mod special;
mod state;
mod tactical;

pub use state::{
    AmbushState, BehaviorState, DeceiveState, HuntStrategy, PhaseState, RootState,
};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::entities::{Bounds, Enemy};
use crate::pool::Handle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    Straight,
    Curve,
    Zigzag,
    Buzz,
    Chase,
    FastChase,
    Aerial,
    Honor,
    LightningHunt,
    Tactical,
    Sniper,
    Smart,
    Boss,
    Swarm,
    Ambush,
    Deceive,
    Root,
    Phase,
}

impl Behavior {
    pub const ALL: [Behavior; 18] = [
        Behavior::Straight,
        Behavior::Curve,
        Behavior::Zigzag,
        Behavior::Buzz,
        Behavior::Chase,
        Behavior::FastChase,
        Behavior::Aerial,
        Behavior::Honor,
        Behavior::LightningHunt,
        Behavior::Tactical,
        Behavior::Sniper,
        Behavior::Smart,
        Behavior::Boss,
        Behavior::Swarm,
        Behavior::Ambush,
        Behavior::Deceive,
        Behavior::Root,
        Behavior::Phase,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Behavior::Straight => "straight",
            Behavior::Curve => "curve",
            Behavior::Zigzag => "zigzag",
            Behavior::Buzz => "buzz",
            Behavior::Chase => "chase",
            Behavior::FastChase => "fast_chase",
            Behavior::Aerial => "aerial",
            Behavior::Honor => "honor",
            Behavior::LightningHunt => "lightning_hunt",
            Behavior::Tactical => "tactical",
            Behavior::Sniper => "sniper",
            Behavior::Smart => "smart",
            Behavior::Boss => "boss",
            Behavior::Swarm => "swarm",
            Behavior::Ambush => "ambush",
            Behavior::Deceive => "deceive",
            Behavior::Root => "root",
            Behavior::Phase => "phase",
        }
    }

    pub fn parse(tag: &str) -> Option<Behavior> {
        Behavior::ALL.into_iter().find(|b| b.tag() == tag)
    }

    /// Lenient lookup for identifiers arriving at run time.  Unknown tags
    /// fall back to `Straight`.
    pub fn from_tag(tag: &str) -> Behavior {
        Behavior::parse(tag).unwrap_or_else(|| {
            warn!(tag, "unknown behavior, falling back to straight");
            Behavior::Straight
        })
    }
}

/// What a behavior may see of the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerView {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Snapshot of a sibling enemy, taken before the AI pass starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub id: Handle,
    pub pos: Vec2,
}

/// Read-only world state handed to every behavior.
#[derive(Clone, Copy, Debug)]
pub struct WorldContext<'a> {
    pub now: u64,
    /// Tick length in seconds.
    pub dt: f32,
    pub bounds: Bounds,
    /// `None` while the player is absent or inactive.
    pub player: Option<PlayerView>,
    pub neighbors: &'a [Neighbor],
}

/// Run one tick of `enemy`'s behavior.
pub fn update(enemy: &mut Enemy, ctx: &WorldContext, rng: &mut impl Rng) {
    if !enemy.ai.belongs_to(enemy.behavior) {
        enemy.ai = BehaviorState::init(enemy.behavior, ctx.now, rng);
    }
    match enemy.behavior {
        Behavior::Straight => oscillating::straight(enemy),
        Behavior::Curve => oscillating::curve(enemy, ctx),
        Behavior::Zigzag => oscillating::zigzag(enemy, ctx, rng),
        Behavior::Buzz => oscillating::buzz(enemy, ctx, rng),
        Behavior::Chase => pursuit::chase(enemy, ctx),
        Behavior::FastChase => pursuit::fast_chase(enemy, ctx),
        Behavior::Aerial => pursuit::aerial(enemy, ctx),
        Behavior::Honor => pursuit::honor(enemy, ctx),
        Behavior::LightningHunt => pursuit::lightning_hunt(enemy, ctx, rng),
        Behavior::Tactical => tactical::tactical(enemy, ctx),
        Behavior::Sniper => tactical::sniper(enemy, ctx),
        Behavior::Smart | Behavior::Boss => phased::update(enemy, ctx, rng),
        Behavior::Swarm => group::swarm(enemy, ctx),
        Behavior::Ambush => special::ambush(enemy, ctx),
        Behavior::Deceive => special::deceive(enemy, ctx),
        Behavior::Root => special::root(enemy, ctx),
        Behavior::Phase => special::phase(enemy, ctx),
    }
}

/// Velocity of magnitude `speed` along the angle from `from` to `to`.
/// Zero when the two points coincide.
pub(crate) fn steer(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let delta = to - from;
    if delta.length_squared() < 1e-6 {
        return Vec2::ZERO;
    }
    Vec2::from_angle(delta.y.atan2(delta.x)) * speed
}
