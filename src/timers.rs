//! Cancellable timers keyed by owner.
//!
//! Every delayed action in the core (bonus expiry, drop blink/expiry,
//! projectile lifetime, hit flash, burst volleys) is a `Timer` owned by the
//! entity it acts on.  Releasing a pooled entity cancels everything its
//! owner key holds, and the generation inside the owner's `Handle` rejects
//! anything that still slips through.

use glam::Vec2;

use crate::buffs::BonusId;
use crate::pool::Handle;
use crate::weapons::WeaponKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerOwner {
    Player,
    Enemy(Handle),
    Projectile(Handle),
    Drop(Handle),
    Bonus(BonusId),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimerAction {
    ExpireBonus(BonusId),
    ExpireProjectile(Handle),
    DropWarning(Handle),
    ExpireDrop(Handle),
    EndHitFlash(Handle),
    /// One follow-up volley of a burst weapon, aimed along `aim`.
    BurstVolley { weapon: WeaponKind, aim: Vec2 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timer {
    pub id: TimerId,
    pub owner: TimerOwner,
    pub due_at: u64,
    pub action: TimerAction,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    timers: Vec<Timer>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, owner: TimerOwner, due_at: u64, action: TimerAction) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer { id, owner, due_at, action });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Drop every pending timer held by `owner`.  Returns how many went.
    pub fn cancel_owner(&mut self, owner: TimerOwner) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.owner != owner);
        before - self.timers.len()
    }

    /// Remove and return all timers due at or before `now`, earliest first.
    /// Timers due at the same instant keep scheduling order.
    pub fn drain_due(&mut self, now: u64) -> Vec<Timer> {
        let mut due = Vec::new();
        self.timers.retain(|t| {
            if t.due_at <= now {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|t| (t.due_at, t.id));
        due
    }

    pub fn pending_for(&self, owner: TimerOwner) -> usize {
        self.timers.iter().filter(|t| t.owner == owner).count()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
