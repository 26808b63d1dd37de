use arcade_combat::buffs::{BonusEffect, BuffStack};
use arcade_combat::entities::PowerUpKind;
use arcade_combat::pool::Pool;
use arcade_combat::timers::{Scheduler, TimerAction, TimerOwner};

// ── Pool ──────────────────────────────────────────────────────────────────────

#[test]
fn spawn_and_get() {
    let mut pool: Pool<&str> = Pool::with_capacity(4);
    let a = pool.spawn(|_| "a").unwrap();
    let b = pool.spawn(|_| "b").unwrap();
    assert_eq!(pool.get(a), Some(&"a"));
    assert_eq!(pool.get(b), Some(&"b"));
    assert_eq!(pool.len(), 2);
    assert_ne!(a, b);
}

#[test]
fn spawn_passes_own_handle() {
    let mut pool: Pool<Option<arcade_combat::Handle>> = Pool::with_capacity(2);
    let h = pool.spawn(Some).unwrap();
    assert_eq!(pool.get(h), Some(&Some(h)));
}

#[test]
fn full_pool_refuses_spawn() {
    let mut pool: Pool<u32> = Pool::with_capacity(2);
    assert!(pool.spawn(|_| 1).is_some());
    assert!(pool.spawn(|_| 2).is_some());
    assert!(pool.spawn(|_| 3).is_none());
    assert_eq!(pool.len(), 2);
}

#[test]
fn recycle_invalidates_handle() {
    let mut pool: Pool<u32> = Pool::with_capacity(4);
    let h = pool.spawn(|_| 7).unwrap();
    assert_eq!(pool.recycle(h), Some(7));
    assert!(pool.get(h).is_none());
    assert!(!pool.contains(h));
    assert!(pool.is_empty());
}

#[test]
fn recycle_twice_is_noop() {
    let mut pool: Pool<u32> = Pool::with_capacity(4);
    let h = pool.spawn(|_| 7).unwrap();
    pool.recycle(h);
    assert_eq!(pool.recycle(h), None);
    assert_eq!(pool.len(), 0);
}

#[test]
fn reused_slot_gets_new_generation() {
    let mut pool: Pool<u32> = Pool::with_capacity(1);
    let old = pool.spawn(|_| 1).unwrap();
    pool.recycle(old);
    let new = pool.spawn(|_| 2).unwrap();
    assert_eq!(old.index(), new.index());
    assert_ne!(old.generation(), new.generation());
    assert!(pool.get(old).is_none());
    assert_eq!(pool.get(new), Some(&2));
    // A stale handle must not release the new occupant.
    assert_eq!(pool.recycle(old), None);
    assert_eq!(pool.len(), 1);
}

#[test]
fn handles_snapshot_survives_recycling() {
    let mut pool: Pool<u32> = Pool::with_capacity(8);
    for i in 0..5 {
        pool.spawn(|_| i);
    }
    let snapshot = pool.handles();
    for h in &snapshot {
        pool.recycle(*h);
    }
    assert_eq!(snapshot.len(), 5);
    assert!(pool.is_empty());
    assert_eq!(pool.iter().count(), 0);
}

#[test]
fn iter_mut_updates_in_place() {
    let mut pool: Pool<u32> = Pool::with_capacity(4);
    let a = pool.spawn(|_| 1).unwrap();
    let b = pool.spawn(|_| 2).unwrap();
    for (_, v) in pool.iter_mut() {
        *v *= 10;
    }
    assert_eq!(pool.get(a), Some(&10));
    assert_eq!(pool.get(b), Some(&20));
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[test]
fn drain_due_orders_by_time_then_insertion() {
    let mut pool: Pool<()> = Pool::with_capacity(4);
    let p = pool.spawn(|_| ()).unwrap();
    let mut s = Scheduler::new();
    s.schedule(TimerOwner::Projectile(p), 300, TimerAction::ExpireProjectile(p));
    s.schedule(TimerOwner::Drop(p), 100, TimerAction::DropWarning(p));
    s.schedule(TimerOwner::Drop(p), 100, TimerAction::ExpireDrop(p));
    s.schedule(TimerOwner::Enemy(p), 500, TimerAction::EndHitFlash(p));

    let due = s.drain_due(300);
    let actions: Vec<TimerAction> = due.iter().map(|t| t.action).collect();
    assert_eq!(
        actions,
        vec![
            TimerAction::DropWarning(p),
            TimerAction::ExpireDrop(p),
            TimerAction::ExpireProjectile(p),
        ]
    );
    assert_eq!(s.len(), 1);
    assert!(s.drain_due(499).is_empty());
    assert_eq!(s.drain_due(500).len(), 1);
}

#[test]
fn cancel_single_timer() {
    let mut pool: Pool<()> = Pool::with_capacity(1);
    let p = pool.spawn(|_| ()).unwrap();
    let mut s = Scheduler::new();
    let id = s.schedule(TimerOwner::Enemy(p), 10, TimerAction::EndHitFlash(p));
    assert!(s.cancel(id));
    assert!(!s.cancel(id));
    assert!(s.is_empty());
}

#[test]
fn cancel_owner_only_touches_that_owner() {
    let mut pool: Pool<()> = Pool::with_capacity(2);
    let a = pool.spawn(|_| ()).unwrap();
    let b = pool.spawn(|_| ()).unwrap();
    let mut s = Scheduler::new();
    s.schedule(TimerOwner::Drop(a), 10, TimerAction::DropWarning(a));
    s.schedule(TimerOwner::Drop(a), 20, TimerAction::ExpireDrop(a));
    s.schedule(TimerOwner::Drop(b), 10, TimerAction::DropWarning(b));

    assert_eq!(s.cancel_owner(TimerOwner::Drop(a)), 2);
    assert_eq!(s.pending_for(TimerOwner::Drop(a)), 0);
    assert_eq!(s.pending_for(TimerOwner::Drop(b)), 1);
}

#[test]
fn owners_with_recycled_handles_are_distinct() {
    let mut pool: Pool<()> = Pool::with_capacity(1);
    let old = pool.spawn(|_| ()).unwrap();
    pool.recycle(old);
    let new = pool.spawn(|_| ()).unwrap();

    let mut s = Scheduler::new();
    s.schedule(TimerOwner::Drop(old), 10, TimerAction::ExpireDrop(old));
    s.schedule(TimerOwner::Drop(new), 10, TimerAction::ExpireDrop(new));
    assert_eq!(s.cancel_owner(TimerOwner::Drop(old)), 1);
    assert_eq!(s.pending_for(TimerOwner::Drop(new)), 1);
}

#[test]
fn bonus_timers_are_owned_by_their_bonus() {
    let mut s = Scheduler::new();
    let mut stack = BuffStack::new();
    let a = stack.apply(PowerUpKind::DamageBoost, BonusEffect::damage(1.5), 1_000, 0, &mut s);
    let b = stack.apply(PowerUpKind::RapidFire, BonusEffect::fire_rate(2.0), 2_000, 0, &mut s);
    assert_eq!(s.pending_for(TimerOwner::Bonus(a)), 1);
    assert_eq!(s.pending_for(TimerOwner::Bonus(b)), 1);
    let due = s.drain_due(1_000);
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].action, TimerAction::ExpireBonus(a));
}
