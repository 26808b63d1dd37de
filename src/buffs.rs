//! Temporary effect stack.
//!
//! Every collected timed power-up becomes its own `ActiveBonus` with an
//! absolute expiry.  Bonuses never touch each other's timers, and the
//! aggregate the player fights with is rebuilt from scratch after every
//! change instead of being patched incrementally.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::PowerUpKind;
use crate::timers::{Scheduler, TimerAction, TimerOwner};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BonusId(u64);

impl BonusId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// What one bonus contributes.  Multipliers compose by product, flags by OR.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BonusEffect {
    #[serde(default = "one")]
    pub damage_multiplier: f32,
    #[serde(default = "one")]
    pub fire_rate_multiplier: f32,
    #[serde(default)]
    pub free_ammo: bool,
    #[serde(default)]
    pub invulnerable: bool,
}

fn one() -> f32 {
    1.0
}

impl BonusEffect {
    pub const NEUTRAL: BonusEffect = BonusEffect {
        damage_multiplier: 1.0,
        fire_rate_multiplier: 1.0,
        free_ammo: false,
        invulnerable: false,
    };

    pub fn damage(multiplier: f32) -> Self {
        Self { damage_multiplier: multiplier, ..Self::NEUTRAL }
    }

    pub fn fire_rate(multiplier: f32) -> Self {
        Self { fire_rate_multiplier: multiplier, ..Self::NEUTRAL }
    }

    pub fn free_ammo() -> Self {
        Self { free_ammo: true, ..Self::NEUTRAL }
    }

    pub fn invulnerable() -> Self {
        Self { invulnerable: true, ..Self::NEUTRAL }
    }
}

impl Default for BonusEffect {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveBonus {
    pub id: BonusId,
    pub kind: PowerUpKind,
    pub effect: BonusEffect,
    pub started_at: u64,
    pub expires_at: u64,
}

impl ActiveBonus {
    pub fn duration(&self) -> u64 {
        self.expires_at - self.started_at
    }

    pub fn remaining(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }
}

/// The combined combat parameters actually applied to the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AggregateState {
    pub damage_multiplier: f32,
    pub fire_rate_multiplier: f32,
    pub free_ammo: bool,
    pub invulnerable: bool,
}

impl AggregateState {
    pub const IDENTITY: AggregateState = AggregateState {
        damage_multiplier: 1.0,
        fire_rate_multiplier: 1.0,
        free_ammo: false,
        invulnerable: false,
    };
}

impl Default for AggregateState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// HUD-facing view of one live bonus.
#[derive(Clone, Debug, PartialEq)]
pub struct BonusView {
    pub id: BonusId,
    pub symbol: char,
    pub name: &'static str,
    pub remaining_ms: u64,
    pub duration_ms: u64,
}

#[derive(Clone, Debug, Default)]
pub struct BuffStack {
    bonuses: Vec<ActiveBonus>,
    next_id: u64,
    aggregate: AggregateState,
}

impl BuffStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new bonus lasting `duration_ms` from `now` and schedule its
    /// expiry.  Other live bonuses are left exactly as they were.
    pub fn apply(
        &mut self,
        kind: PowerUpKind,
        effect: BonusEffect,
        duration_ms: u64,
        now: u64,
        scheduler: &mut Scheduler,
    ) -> BonusId {
        let id = BonusId(self.next_id);
        self.next_id += 1;
        let expires_at = now.saturating_add(duration_ms);
        self.bonuses.push(ActiveBonus { id, kind, effect, started_at: now, expires_at });
        scheduler.schedule(TimerOwner::Bonus(id), expires_at, TimerAction::ExpireBonus(id));
        debug!(bonus = id.0, ?kind, expires_at, "bonus applied");
        self.recompute();
        id
    }

    /// Remove one bonus.  Unknown or already-expired ids are a no-op.
    pub fn expire(&mut self, id: BonusId) -> Option<ActiveBonus> {
        let pos = self.bonuses.iter().position(|b| b.id == id)?;
        let bonus = self.bonuses.remove(pos);
        debug!(bonus = id.0, kind = ?bonus.kind, "bonus expired");
        self.recompute();
        Some(bonus)
    }

    /// Expire every bonus whose timestamp has passed, independent of the
    /// scheduled timers, and cancel whatever timers they still hold.
    pub fn sweep(&mut self, now: u64, scheduler: &mut Scheduler) -> Vec<ActiveBonus> {
        let due: Vec<BonusId> = self
            .bonuses
            .iter()
            .filter(|b| b.expires_at <= now)
            .map(|b| b.id)
            .collect();
        let mut expired = Vec::with_capacity(due.len());
        for id in due {
            scheduler.cancel_owner(TimerOwner::Bonus(id));
            if let Some(bonus) = self.expire(id) {
                expired.push(bonus);
            }
        }
        expired
    }

    /// Rebuild the aggregate from the full live set.
    pub fn recompute(&mut self) -> AggregateState {
        if self.bonuses.is_empty() {
            self.aggregate = AggregateState::IDENTITY;
            return self.aggregate;
        }
        let mut agg = AggregateState::IDENTITY;
        for bonus in &self.bonuses {
            agg.damage_multiplier *= bonus.effect.damage_multiplier;
            agg.fire_rate_multiplier *= bonus.effect.fire_rate_multiplier;
            agg.free_ammo |= bonus.effect.free_ammo;
            agg.invulnerable |= bonus.effect.invulnerable;
        }
        self.aggregate = agg;
        agg
    }

    pub fn aggregate(&self) -> AggregateState {
        self.aggregate
    }

    pub fn get(&self, id: BonusId) -> Option<&ActiveBonus> {
        self.bonuses.iter().find(|b| b.id == id)
    }

    pub fn active(&self) -> &[ActiveBonus] {
        &self.bonuses
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    pub fn views(&self, now: u64) -> Vec<BonusView> {
        self.bonuses
            .iter()
            .map(|b| BonusView {
                id: b.id,
                symbol: b.kind.symbol(),
                name: b.kind.name(),
                remaining_ms: b.remaining(now),
                duration_ms: b.duration(),
            })
            .collect()
    }
}
