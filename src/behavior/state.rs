use glam::Vec2;
use rand::Rng;

use super::Behavior;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HuntStrategy {
    /// Aim at where the player will be after `distance / speed` seconds.
    Predictive,
    /// Aim at a point beside the player.
    Flank,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmbushState {
    Hiding,
    Charging,
    Attacking,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeceiveState {
    Disguised,
    Exposed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RootState {
    Rooted,
    Lunging,
    Recovering,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseState {
    Visible,
    /// Out of phase: cannot be hit by direct fire.
    Phased,
}

/// Per-enemy scratch data, one variant per behavior family.  Built once at
/// spawn by `init` and owned by the enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BehaviorState {
    None,
    Curve {
        phase: f32,
    },
    Zigzag {
        sign: f32,
        next_flip_at: u64,
    },
    Buzz {
        sign_x: f32,
        sign_y: f32,
        next_flip_at: u64,
    },
    FastChase {
        next_rush_at: u64,
        rush_until: u64,
    },
    LightningHunt {
        strategy: HuntStrategy,
        next_switch_at: u64,
        flank_sign: f32,
    },
    Phased {
        phase: u8,
        entered_at: u64,
        next_switch_at: u64,
        flank_sign: f32,
    },
    Swarm {
        centroid: Option<Vec2>,
        next_recompute_at: u64,
    },
    Ambush {
        state: AmbushState,
        entered_at: u64,
        charge_dir: Vec2,
    },
    Deceive {
        state: DeceiveState,
        entered_at: u64,
    },
    Root {
        state: RootState,
        entered_at: u64,
        lunge_dir: Vec2,
    },
    Phase {
        state: PhaseState,
        entered_at: u64,
    },
}

fn random_sign(rng: &mut impl Rng) -> f32 {
    if rng.gen_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}

impl BehaviorState {
    pub fn init(behavior: Behavior, now: u64, rng: &mut impl Rng) -> Self {
        match behavior {
            Behavior::Straight
            | Behavior::Chase
            | Behavior::Aerial
            | Behavior::Honor
            | Behavior::Tactical
            | Behavior::Sniper => BehaviorState::None,
            Behavior::Curve => BehaviorState::Curve {
                phase: rng.gen_range(0.0..std::f32::consts::TAU),
            },
            Behavior::Zigzag => BehaviorState::Zigzag {
                sign: random_sign(rng),
                next_flip_at: now + rng.gen_range(400..=900),
            },
            Behavior::Buzz => BehaviorState::Buzz {
                sign_x: random_sign(rng),
                sign_y: random_sign(rng),
                next_flip_at: now + rng.gen_range(120..=300),
            },
            Behavior::FastChase => BehaviorState::FastChase {
                next_rush_at: now + 2_000,
                rush_until: now,
            },
            Behavior::LightningHunt => BehaviorState::LightningHunt {
                strategy: HuntStrategy::Predictive,
                next_switch_at: now + rng.gen_range(1_500..=3_000),
                flank_sign: random_sign(rng),
            },
            Behavior::Smart | Behavior::Boss => BehaviorState::Phased {
                phase: 0,
                entered_at: now,
                next_switch_at: now + rng.gen_range(2_000..=5_000),
                flank_sign: random_sign(rng),
            },
            Behavior::Swarm => BehaviorState::Swarm { centroid: None, next_recompute_at: now },
            Behavior::Ambush => BehaviorState::Ambush {
                state: AmbushState::Hiding,
                entered_at: now,
                charge_dir: Vec2::NEG_X,
            },
            Behavior::Deceive => BehaviorState::Deceive {
                state: DeceiveState::Disguised,
                entered_at: now,
            },
            Behavior::Root => BehaviorState::Root {
                state: RootState::Rooted,
                entered_at: now,
                lunge_dir: Vec2::NEG_X,
            },
            Behavior::Phase => BehaviorState::Phase { state: PhaseState::Visible, entered_at: now },
        }
    }

    /// Whether this state is the one `behavior` expects.
    pub fn belongs_to(&self, behavior: Behavior) -> bool {
        matches!(
            (self, behavior),
            (
                BehaviorState::None,
                Behavior::Straight
                    | Behavior::Chase
                    | Behavior::Aerial
                    | Behavior::Honor
                    | Behavior::Tactical
                    | Behavior::Sniper
            ) | (BehaviorState::Curve { .. }, Behavior::Curve)
                | (BehaviorState::Zigzag { .. }, Behavior::Zigzag)
                | (BehaviorState::Buzz { .. }, Behavior::Buzz)
                | (BehaviorState::FastChase { .. }, Behavior::FastChase)
                | (BehaviorState::LightningHunt { .. }, Behavior::LightningHunt)
                | (BehaviorState::Phased { .. }, Behavior::Smart | Behavior::Boss)
                | (BehaviorState::Swarm { .. }, Behavior::Swarm)
                | (BehaviorState::Ambush { .. }, Behavior::Ambush)
                | (BehaviorState::Deceive { .. }, Behavior::Deceive)
                | (BehaviorState::Root { .. }, Behavior::Root)
                | (BehaviorState::Phase { .. }, Behavior::Phase)
        )
    }

    pub fn is_intangible(&self) -> bool {
        matches!(self, BehaviorState::Phase { state: PhaseState::Phased, .. })
    }

    /// Hidden or disguised enemies do not shoot.
    pub fn holds_fire(&self) -> bool {
        matches!(
            self,
            BehaviorState::Ambush { state: AmbushState::Hiding, .. }
                | BehaviorState::Deceive { state: DeceiveState::Disguised, .. }
                | BehaviorState::Phase { state: PhaseState::Phased, .. }
        )
    }
}
