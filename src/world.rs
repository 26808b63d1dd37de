//! The tick orchestrator and the API collaborators talk to.
//!
//! Order inside `tick`:
//! 1. advance the clock and level distance
//! 2. fire due timers
//! 3. spawner
//! 4. AI pass and enemy shots
//! 5. projectiles (homing, integration, boundary exit) and drifting props
//! 6. escapes
//! 7. collision reports made against the post-motion state
//! 8. reap dead entities (cancel their timers, recycle their slots)
//! 9. bonus sweep
//! 10. level completion
//!
//! `advance` runs steps 1 to 6 and `settle` runs 7 to 10.  The collaborator
//! detects overlaps in between, on the positions this tick produced, either
//! by calling `report_collision` itself or through the detector passed to
//! `tick`.

use glam::Vec2;
use rand::Rng;
use tracing::{debug, trace, warn};

use crate::ai::{self, Frame, ShotIntent};
use crate::behavior::PlayerView;
use crate::buffs::{AggregateState, BonusView, BuffStack};
use crate::combat::{self, CombatLedger, HitOutcome, Kill, ScoreRules};
use crate::config::{EnemyTypeConfig, GameConfig};
use crate::entities::{
    Bounds, Enemy, Obstacle, ObstacleKind, Player, PowerUpDrop, PowerUpKind, Projectile,
    ProjectileOwner,
};
use crate::events::{EventBus, FeedbackEffect, GameEvent};
use crate::level::LevelProgress;
use crate::pool::{Handle, Pool};
use crate::spawn::{self, Spawner};
use crate::timers::{Scheduler, Timer, TimerAction, TimerOwner};
use crate::weapons::{
    AreaBlast, Arsenal, FireOutcome, PurchaseOutcome, ShotRequest, Special, WeaponKind,
};

/// Overlaps reported by the collision collaborator.  The core decides what
/// each one means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    ProjectileEnemy { projectile: Handle, enemy: Handle },
    PlayerEnemy { enemy: Handle },
    PlayerProjectile { projectile: Handle },
    ProjectileObstacle { projectile: Handle, obstacle: Handle },
    PlayerDrop { drop: Handle },
}

#[derive(Clone, Debug, PartialEq)]
pub struct HudSnapshot {
    pub level: String,
    pub kills: u32,
    pub score: u64,
    pub credits: u64,
    pub escapes: u32,
    pub health: f32,
    pub max_health: f32,
    pub weapon: WeaponKind,
    pub ammo: Option<u32>,
    pub bonuses: Vec<BonusView>,
    pub distance: f32,
    pub elapsed_ms: u64,
    pub complete: bool,
}

pub struct World {
    config: GameConfig,
    now: u64,
    player: Option<Player>,
    enemies: Pool<Enemy>,
    projectiles: Pool<Projectile>,
    drops: Pool<PowerUpDrop>,
    obstacles: Pool<Obstacle>,
    scheduler: Scheduler,
    buffs: BuffStack,
    arsenal: Arsenal,
    ledger: CombatLedger,
    spawner: Spawner,
    progress: LevelProgress,
    events: EventBus,
    pending: Vec<Collision>,
}

impl World {
    pub fn new(config: GameConfig) -> Self {
        let rules = &config.rules;
        let ledger = CombatLedger { credits: rules.start_credits, ..CombatLedger::default() };
        Self {
            now: 0,
            player: None,
            enemies: Pool::with_capacity(rules.max_enemies),
            projectiles: Pool::with_capacity(rules.max_projectiles),
            drops: Pool::with_capacity(rules.max_drops),
            obstacles: Pool::with_capacity(rules.max_obstacles),
            scheduler: Scheduler::new(),
            buffs: BuffStack::new(),
            arsenal: Arsenal::new(config.weapons.clone()),
            ledger,
            spawner: Spawner::new(config.level.spawn_interval_ms, 0),
            progress: LevelProgress::new(config.level.goal),
            events: EventBus::default(),
            pending: Vec::new(),
            config,
        }
    }

    // ── Collaborator API ─────────────────────────────────────────────────────

    /// Report where the player is.  The first call places the player at full
    /// health; later calls only move it.
    pub fn set_player(&mut self, pos: Vec2, vel: Vec2, active: bool) {
        let max_health = self.config.rules.player_max_health;
        let player = self.player.get_or_insert_with(|| Player::new(pos, max_health));
        player.pos = pos;
        player.vel = vel;
        player.active = active;
    }

    /// Queue an overlap for [`World::settle`].  Only valid between
    /// [`World::advance`] and `settle`; anything still queued when the next
    /// `advance` starts is stale and dropped.
    pub fn report_collision(&mut self, collision: Collision) {
        self.pending.push(collision);
    }

    pub fn select_weapon(&mut self, kind: WeaponKind) -> bool {
        self.arsenal.select(kind)
    }

    pub fn purchase_ammo(&mut self, kind: WeaponKind) -> PurchaseOutcome {
        let outcome = self.arsenal.purchase(kind, &mut self.ledger.credits);
        debug!(weapon = ?kind, ?outcome, "ammo purchase");
        outcome
    }

    /// Fire the selected weapon from the player's position along `aim`.
    pub fn fire(&mut self, aim: Vec2) -> FireOutcome {
        let Some(origin) = self.player.as_ref().filter(|p| p.active && !p.defeated).map(|p| p.pos)
        else {
            return FireOutcome::Unavailable;
        };
        let agg = self.buffs.aggregate();
        let outcome = self.arsenal.fire(self.now, origin, aim, &agg);
        match &outcome {
            FireOutcome::Fired { shots, follow_ups, burst_delay_ms } => {
                for shot in shots {
                    self.spawn_shot(shot);
                }
                let weapon = self.arsenal.selected();
                for i in 1..=u64::from(*follow_ups) {
                    self.scheduler.schedule(
                        TimerOwner::Player,
                        self.now.saturating_add(i.saturating_mul(*burst_delay_ms)),
                        TimerAction::BurstVolley { weapon, aim },
                    );
                }
            }
            FireOutcome::OutOfAmmo { weapon, message } => {
                let message = message.clone();
                self.events.push(GameEvent::AmmoDepleted { weapon: *weapon, message });
            }
            FireOutcome::CoolingDown { .. } | FireOutcome::Unavailable => {}
        }
        outcome
    }

    /// Scripted spawn by type name.  Unknown names are skipped with a warning.
    pub fn spawn_enemy(&mut self, kind: &str, pos: Vec2, rng: &mut impl Rng) -> Option<Handle> {
        let Some(ty) = self.config.level.enemy_type(kind).cloned() else {
            warn!(kind, "unknown enemy type, spawn skipped");
            return None;
        };
        self.spawn_enemy_type(&ty, pos, rng)
    }

    pub fn spawn_drop(&mut self, kind: PowerUpKind, pos: Vec2) -> Option<Handle> {
        let now = self.now;
        let drift = Vec2::new(-self.config.level.scroll_speed, 0.0);
        let handle = self.drops.spawn(|id| PowerUpDrop {
            id,
            kind,
            pos,
            vel: drift,
            spawned_at: now,
            blinking: false,
            collected: false,
        })?;
        let rules = &self.config.rules;
        let expires_at = now.saturating_add(rules.drop_lifetime_ms);
        let owner = TimerOwner::Drop(handle);
        self.scheduler.schedule(
            owner,
            expires_at.saturating_sub(rules.drop_warning_ms),
            TimerAction::DropWarning(handle),
        );
        self.scheduler.schedule(owner, expires_at, TimerAction::ExpireDrop(handle));
        self.events.push(GameEvent::PowerUpDropped { drop: handle, kind, position: pos });
        debug!(drop = %handle, kind = kind.name(), "power-up dropped");
        Some(handle)
    }

    pub fn spawn_obstacle(&mut self, kind: ObstacleKind, pos: Vec2) -> Option<Handle> {
        let health = self.config.rules.obstacle_health;
        self.obstacles.spawn(|id| Obstacle { id, kind, pos, health, destroyed: false })
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn hud(&self) -> HudSnapshot {
        let (health, max_health) = self
            .player
            .as_ref()
            .map(|p| (p.health, p.max_health))
            .unwrap_or((0.0, self.config.rules.player_max_health));
        let weapon = self.arsenal.selected();
        HudSnapshot {
            level: self.config.level.name.clone(),
            kills: self.ledger.kills,
            score: self.ledger.score,
            credits: self.ledger.credits,
            escapes: self.ledger.escapes,
            health,
            max_health,
            weapon,
            ammo: self.arsenal.ammo(weapon),
            bonuses: self.buffs.views(self.now),
            distance: self.progress.distance(),
            elapsed_ms: self.progress.elapsed_ms(),
            complete: self.progress.is_complete(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn bounds(&self) -> Bounds {
        self.config.level.bounds
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn enemies(&self) -> &Pool<Enemy> {
        &self.enemies
    }

    pub fn projectiles(&self) -> &Pool<Projectile> {
        &self.projectiles
    }

    pub fn drops(&self) -> &Pool<PowerUpDrop> {
        &self.drops
    }

    pub fn obstacles(&self) -> &Pool<Obstacle> {
        &self.obstacles
    }

    pub fn ledger(&self) -> &CombatLedger {
        &self.ledger
    }

    pub fn buffs(&self) -> &BuffStack {
        &self.buffs
    }

    pub fn aggregate(&self) -> AggregateState {
        self.buffs.aggregate()
    }

    pub fn arsenal(&self) -> &Arsenal {
        &self.arsenal
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn progress(&self) -> &LevelProgress {
        &self.progress
    }

    // ── Tick ─────────────────────────────────────────────────────────────────

    /// One full tick.  `detect` sees the world after this tick's motion and
    /// returns the overlaps it found; they are resolved in the same tick.
    pub fn tick<D>(&mut self, dt_ms: u64, rng: &mut impl Rng, detect: D)
    where
        D: FnOnce(&World) -> Vec<Collision>,
    {
        self.advance(dt_ms, rng);
        let found = detect(&*self);
        self.pending.extend(found);
        self.settle(rng);
    }

    /// Motion half of a tick: steps 1 to 6.  Collisions reported after this
    /// call and before [`World::settle`] are judged on these positions.
    pub fn advance(&mut self, dt_ms: u64, rng: &mut impl Rng) {
        if !self.pending.is_empty() {
            warn!(count = self.pending.len(), "collision reports from before motion dropped");
            self.pending.clear();
        }
        self.now = self.now.saturating_add(dt_ms);
        let dt = dt_ms as f32 / 1_000.0;
        self.progress.advance(dt_ms, self.config.level.scroll_speed);

        for timer in self.scheduler.drain_due(self.now) {
            self.run_timer(timer);
        }

        if !self.progress.is_complete() {
            let picked = self
                .spawner
                .poll(self.now, &self.config.level, rng)
                .map(|(ty, pos)| (ty.clone(), pos));
            if let Some((ty, pos)) = picked {
                self.spawn_enemy_type(&ty, pos, rng);
            }
        }

        let frame = Frame { now: self.now, dt, bounds: self.bounds(), player: self.player_view() };
        for intent in ai::step(&mut self.enemies, frame, rng) {
            self.spawn_enemy_shot(intent);
        }

        self.advance_projectiles(dt, rng);
        self.drift_props(dt);
        self.detect_escapes();
    }

    /// Resolution half of a tick: steps 7 to 10.
    pub fn settle(&mut self, rng: &mut impl Rng) {
        for collision in std::mem::take(&mut self.pending) {
            self.resolve(collision, rng);
        }

        self.reap();

        for bonus in self.buffs.sweep(self.now, &mut self.scheduler) {
            self.events.push(GameEvent::BonusExpired { bonus: bonus.id, kind: bonus.kind });
        }

        if let Some(reason) = self.progress.check(self.ledger.kills) {
            self.events.push(GameEvent::LevelComplete { reason });
        }
        trace!(
            now = self.now,
            enemies = self.enemies.len(),
            projectiles = self.projectiles.len(),
            "tick"
        );
    }

    fn player_view(&self) -> Option<PlayerView> {
        self.player
            .as_ref()
            .filter(|p| p.active && !p.defeated)
            .map(|p| PlayerView { pos: p.pos, vel: p.vel })
    }

    fn score_rules(&self) -> ScoreRules {
        ScoreRules {
            multiplier: self.config.level.score_multiplier,
            kill_bonus: self.config.rules.kill_bonus,
        }
    }

    // ── Timers ───────────────────────────────────────────────────────────────

    /// Handles inside timer actions are resolved through the pools, so a
    /// timer whose owner slot was recycled resolves to nothing.
    fn run_timer(&mut self, timer: Timer) {
        match timer.action {
            TimerAction::ExpireBonus(id) => {
                if let Some(bonus) = self.buffs.expire(id) {
                    self.events.push(GameEvent::BonusExpired { bonus: id, kind: bonus.kind });
                }
            }
            TimerAction::ExpireProjectile(handle) => {
                if let Some(projectile) = self.projectiles.get_mut(handle) {
                    projectile.spent = true;
                }
            }
            TimerAction::DropWarning(handle) => {
                if let Some(drop) = self.drops.get_mut(handle) {
                    drop.blinking = true;
                    self.events.feedback(FeedbackEffect::Blink, drop.pos);
                }
            }
            TimerAction::ExpireDrop(handle) => {
                if self.drops.contains(handle) {
                    debug!(drop = %handle, "drop expired");
                    release(&mut self.drops, &mut self.scheduler, TimerOwner::Drop(handle), handle);
                }
            }
            TimerAction::EndHitFlash(handle) => {
                if let Some(enemy) = self.enemies.get_mut(handle) {
                    enemy.hit_flash = false;
                }
            }
            TimerAction::BurstVolley { weapon, aim } => {
                let Some(origin) = self.player_view().map(|p| p.pos) else {
                    return;
                };
                let agg = self.buffs.aggregate();
                if let Some(shots) = self.arsenal.burst_volley(weapon, origin, aim, &agg) {
                    for shot in &shots {
                        self.spawn_shot(shot);
                    }
                }
            }
        }
    }

    // ── Spawning ─────────────────────────────────────────────────────────────

    fn spawn_enemy_type(
        &mut self,
        ty: &EnemyTypeConfig,
        pos: Vec2,
        rng: &mut impl Rng,
    ) -> Option<Handle> {
        let now = self.now;
        let handle = self.enemies.spawn(|id| Enemy::from_type(id, ty, pos, now, rng));
        match handle {
            Some(h) => {
                debug!(enemy = %h, kind = %ty.name, behavior = ty.behavior.tag(), "enemy spawned")
            }
            None => trace!(kind = %ty.name, "enemy pool full, spawn skipped"),
        }
        handle
    }

    fn spawn_projectile(
        &mut self,
        projectile: impl FnOnce(Handle) -> Projectile,
        lifetime_ms: u64,
    ) -> Option<Handle> {
        let handle = self.projectiles.spawn(projectile)?;
        self.scheduler.schedule(
            TimerOwner::Projectile(handle),
            self.now.saturating_add(lifetime_ms),
            TimerAction::ExpireProjectile(handle),
        );
        Some(handle)
    }

    fn spawn_shot(&mut self, shot: &ShotRequest) -> Option<Handle> {
        let now = self.now;
        let shot = *shot;
        self.spawn_projectile(
            |id| Projectile {
                id,
                owner: ProjectileOwner::Player,
                weapon: Some(shot.weapon),
                pos: shot.pos,
                vel: shot.vel,
                damage: shot.damage,
                special: shot.special,
                target: None,
                spawned_at: now,
                expires_at: now.saturating_add(shot.lifetime_ms),
                spent: false,
            },
            shot.lifetime_ms,
        )
    }

    fn spawn_enemy_shot(&mut self, intent: ShotIntent) -> Option<Handle> {
        let now = self.now;
        let rules = &self.config.rules;
        let (speed, damage, lifetime) =
            (rules.enemy_shot_speed, rules.enemy_shot_damage, rules.enemy_shot_lifetime_ms);
        self.spawn_projectile(
            |id| Projectile {
                id,
                owner: ProjectileOwner::Enemy,
                weapon: None,
                pos: intent.origin,
                vel: intent.direction * speed,
                damage,
                special: Special::None,
                target: None,
                spawned_at: now,
                expires_at: now.saturating_add(lifetime),
                spent: false,
            },
            lifetime,
        )
    }

    // ── Motion ───────────────────────────────────────────────────────────────

    fn advance_projectiles(&mut self, dt: f32, rng: &mut impl Rng) {
        let bounds = self.bounds();
        let margin = self.config.rules.boundary_margin;
        let mut exits: Vec<(Vec2, AreaBlast)> = Vec::new();
        for handle in self.projectiles.handles() {
            let Some(projectile) = self.projectiles.get_mut(handle) else {
                continue;
            };
            if projectile.spent {
                continue;
            }
            if let (Special::Homing { max_turn }, ProjectileOwner::Player) =
                (projectile.special, projectile.owner)
            {
                combat::steer_homing(projectile, &self.enemies, max_turn);
            }
            projectile.pos += projectile.vel * dt;
            if bounds.contains(projectile.pos, margin) {
                continue;
            }
            projectile.spent = true;
            if let Special::Area(blast) = projectile.special {
                if blast.on_boundary_exit {
                    exits.push((projectile.pos, blast));
                }
            }
        }
        for (center, blast) in exits {
            self.detonate(center, &blast, rng);
        }
    }

    /// Drops and obstacles scroll with the world and vanish off the trailing
    /// edge.
    fn drift_props(&mut self, dt: f32) {
        let margin = self.config.rules.boundary_margin;
        let scroll = Vec2::new(-self.config.level.scroll_speed, 0.0);

        let mut gone = Vec::new();
        for (handle, drop) in self.drops.iter_mut() {
            drop.pos += drop.vel * dt;
            if drop.pos.x < -margin {
                gone.push(handle);
            }
        }
        for handle in gone {
            release(&mut self.drops, &mut self.scheduler, TimerOwner::Drop(handle), handle);
        }

        for (_, obstacle) in self.obstacles.iter_mut() {
            obstacle.pos += scroll * dt;
            if obstacle.pos.x < -margin {
                obstacle.destroyed = true;
            }
        }
    }

    fn detect_escapes(&mut self) {
        let invulnerable = self.buffs.aggregate().invulnerable;
        let damage = self.config.rules.escape_damage;
        for handle in self.enemies.handles() {
            let Some(enemy) = self.enemies.get_mut(handle) else {
                continue;
            };
            if enemy.dead || enemy.pos.x >= 0.0 {
                continue;
            }
            combat::resolve_escape(
                enemy,
                self.player.as_mut(),
                damage,
                invulnerable,
                &mut self.ledger,
                &mut self.events,
            );
        }
    }

    // ── Collisions ───────────────────────────────────────────────────────────

    fn resolve(&mut self, collision: Collision, rng: &mut impl Rng) {
        match collision {
            Collision::ProjectileEnemy { projectile, enemy } => {
                self.projectile_hits_enemy(projectile, enemy, rng)
            }
            Collision::PlayerEnemy { enemy } => self.enemy_touches_player(enemy),
            Collision::PlayerProjectile { projectile } => self.projectile_hits_player(projectile),
            Collision::ProjectileObstacle { projectile, obstacle } => {
                self.projectile_hits_obstacle(projectile, obstacle, rng)
            }
            Collision::PlayerDrop { drop } => self.collect_drop(drop),
        }
    }

    fn projectile_hits_enemy(&mut self, projectile: Handle, enemy: Handle, rng: &mut impl Rng) {
        let Some(shot) = self.projectiles.get(projectile) else {
            return;
        };
        if shot.spent || shot.owner != ProjectileOwner::Player {
            return;
        }
        let (damage, special, pierces, impact) =
            (shot.damage, shot.special, shot.pierces(), shot.pos);
        let Some(target) = self.enemies.get(enemy) else {
            return;
        };
        if target.dead || target.is_intangible() {
            return;
        }
        let target_pos = target.pos;

        if let Special::Area(blast) = special {
            self.consume(projectile);
            let center = if target_pos.is_finite() { target_pos } else { impact };
            self.detonate(center, &blast, rng);
            return;
        }

        let rules = self.score_rules();
        let Some(target) = self.enemies.get_mut(enemy) else {
            return;
        };
        let outcome =
            combat::apply_direct_hit(target, damage, rules, &mut self.ledger, &mut self.events);
        match outcome {
            HitOutcome::Ignored => return,
            HitOutcome::Damaged { .. } => {
                self.scheduler.schedule(
                    TimerOwner::Enemy(enemy),
                    self.now.saturating_add(self.config.rules.hit_flash_ms),
                    TimerAction::EndHitFlash(enemy),
                );
            }
            HitOutcome::Killed(kill) => self.roll_drop_for(&kill, rng),
        }
        if !pierces {
            self.consume(projectile);
        }
    }

    fn enemy_touches_player(&mut self, enemy: Handle) {
        let invulnerable = self.buffs.aggregate().invulnerable;
        let cooldown = self.config.rules.contact_cooldown_ms;
        let now = self.now;
        let (Some(player), Some(enemy)) = (self.player.as_mut(), self.enemies.get_mut(enemy)) else {
            return;
        };
        if enemy.dead || enemy.is_intangible() || now < enemy.contact_ready_at {
            return;
        }
        enemy.contact_ready_at = now.saturating_add(cooldown);
        combat::damage_player(player, enemy.damage, invulnerable, &mut self.events);
    }

    fn projectile_hits_player(&mut self, projectile: Handle) {
        let invulnerable = self.buffs.aggregate().invulnerable;
        let Some(shot) = self.projectiles.get_mut(projectile) else {
            return;
        };
        if shot.spent || shot.owner != ProjectileOwner::Enemy {
            return;
        }
        shot.spent = true;
        let damage = shot.damage;
        if let Some(player) = self.player.as_mut() {
            combat::damage_player(player, damage, invulnerable, &mut self.events);
        }
    }

    fn projectile_hits_obstacle(
        &mut self,
        projectile: Handle,
        obstacle: Handle,
        rng: &mut impl Rng,
    ) {
        let Some(shot) = self.projectiles.get(projectile) else {
            return;
        };
        if shot.spent || shot.owner != ProjectileOwner::Player {
            return;
        }
        let (damage, special, pierces) = (shot.damage, shot.special, shot.pierces());
        let Some(target) = self.obstacles.get_mut(obstacle) else {
            return;
        };
        if target.destroyed {
            return;
        }
        let pos = target.pos;
        target.health -= damage;
        let broken = target.health <= 0.0;
        if !pierces {
            self.consume(projectile);
        }
        if let Special::Area(blast) = special {
            self.detonate(pos, &blast, rng);
        }
        if broken {
            self.break_obstacle(obstacle, rng);
        }
    }

    /// Idempotent: a destroyed obstacle never breaks twice.
    fn break_obstacle(&mut self, handle: Handle, rng: &mut impl Rng) {
        let Some(obstacle) = self.obstacles.get_mut(handle) else {
            return;
        };
        if obstacle.destroyed {
            return;
        }
        obstacle.destroyed = true;
        let (kind, pos) = (obstacle.kind, obstacle.pos);
        self.events.push(GameEvent::ObstacleBroken { obstacle: handle, kind, position: pos });
        debug!(obstacle = %handle, kind = kind.label(), "obstacle broken");

        let rate = self.config.drops.rate_for(kind.label());
        self.roll_drop_at(rate, pos, rng);
        if kind == ObstacleKind::Barrel {
            let blast = self.config.rules.barrel_blast;
            self.detonate(pos, &blast, rng);
        }
    }

    fn collect_drop(&mut self, handle: Handle) {
        let Some(drop) = self.drops.get_mut(handle) else {
            return;
        };
        if drop.collected {
            return;
        }
        let Some(player) = self.player.as_mut().filter(|p| p.active && !p.defeated) else {
            return;
        };
        drop.collected = true;
        let (kind, pos) = (drop.kind, drop.pos);
        self.scheduler.cancel_owner(TimerOwner::Drop(handle));

        let Some(spec) = self.config.power_ups.iter().find(|s| s.kind == kind) else {
            warn!(kind = kind.name(), "collected power-up has no configured effect");
            return;
        };
        let bonus = if kind == PowerUpKind::Heal {
            player.heal(spec.heal_amount);
            self.events.feedback(FeedbackEffect::Heal, pos);
            None
        } else {
            let (effect, duration_ms) = (spec.effect, spec.duration_ms);
            let id = self.buffs.apply(kind, effect, duration_ms, self.now, &mut self.scheduler);
            self.events.feedback(FeedbackEffect::Pickup, pos);
            Some(id)
        };
        self.events.push(GameEvent::PowerUpCollected { kind, bonus });
        debug!(drop = %handle, kind = kind.name(), "power-up collected");
    }

    // ── Shared helpers ───────────────────────────────────────────────────────

    fn consume(&mut self, projectile: Handle) {
        if let Some(p) = self.projectiles.get_mut(projectile) {
            p.spent = true;
        }
    }

    fn detonate(&mut self, center: Vec2, blast: &AreaBlast, rng: &mut impl Rng) {
        let kills = combat::resolve_area_blast(
            center,
            blast,
            &mut self.enemies,
            &mut self.ledger,
            &mut self.events,
        );
        for kill in &kills {
            self.roll_drop_for(kill, rng);
        }
    }

    fn roll_drop_for(&mut self, kill: &Kill, rng: &mut impl Rng) {
        let rate = self.config.drops.rate_for(&kill.kind);
        self.roll_drop_at(rate, kill.position, rng);
    }

    fn roll_drop_at(&mut self, rate: f32, pos: Vec2, rng: &mut impl Rng) {
        let picked = spawn::roll_drop(rate, &self.config.drops, &self.config.power_ups, rng);
        if let Some(kind) = picked.map(|s| s.kind) {
            self.spawn_drop(kind, pos);
        }
    }

    /// Release everything flagged dead, spent, collected or destroyed.
    fn reap(&mut self) {
        for h in flagged(&self.enemies, |e| e.dead) {
            release(&mut self.enemies, &mut self.scheduler, TimerOwner::Enemy(h), h);
        }
        for h in flagged(&self.projectiles, |p| p.spent) {
            release(&mut self.projectiles, &mut self.scheduler, TimerOwner::Projectile(h), h);
        }
        for h in flagged(&self.drops, |d| d.collected) {
            release(&mut self.drops, &mut self.scheduler, TimerOwner::Drop(h), h);
        }
        for h in flagged(&self.obstacles, |o| o.destroyed) {
            self.obstacles.recycle(h);
        }
    }
}

fn flagged<T>(pool: &Pool<T>, pred: impl Fn(&T) -> bool) -> Vec<Handle> {
    pool.iter().filter(|(_, item)| pred(item)).map(|(h, _)| h).collect()
}

/// Cancel every timer the occupant still holds, then free its slot.
fn release<T>(
    pool: &mut Pool<T>,
    scheduler: &mut Scheduler,
    owner: TimerOwner,
    handle: Handle,
) -> Option<T> {
    let cancelled = scheduler.cancel_owner(owner);
    if cancelled > 0 {
        trace!(handle = %handle, cancelled, "timers cancelled on release");
    }
    pool.recycle(handle)
}
