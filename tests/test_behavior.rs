use arcade_combat::ai::{self, Frame};
use arcade_combat::behavior::{
    self, AmbushState, Behavior, BehaviorState, DeceiveState, Neighbor, PhaseState, PlayerView,
    RootState, WorldContext,
};
use arcade_combat::config::EnemyTypeConfig;
use arcade_combat::entities::{Bounds, Enemy};
use arcade_combat::pool::{Handle, Pool};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

const SPEED: f32 = 100.0;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn enemy_type(behavior: Behavior) -> EnemyTypeConfig {
    EnemyTypeConfig {
        name: behavior.tag().to_string(),
        hp: 40.0,
        speed: SPEED,
        damage: 10.0,
        score: 100,
        behavior,
        weight: 1.0,
        shoot_interval_ms: None,
        enraged_behavior: None,
    }
}

fn spawn_with(pool: &mut Pool<Enemy>, ty: &EnemyTypeConfig, pos: Vec2, rng: &mut StdRng) -> Handle {
    pool.spawn(|id| Enemy::from_type(id, ty, pos, 0, rng)).unwrap()
}

fn spawn(pool: &mut Pool<Enemy>, behavior: Behavior, pos: Vec2, rng: &mut StdRng) -> Handle {
    spawn_with(pool, &enemy_type(behavior), pos, rng)
}

fn ctx(now: u64, player: Option<Vec2>) -> WorldContext<'static> {
    WorldContext {
        now,
        dt: 0.016,
        bounds: Bounds::default(),
        player: player.map(|pos| PlayerView { pos, vel: Vec2::ZERO }),
        neighbors: &[],
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[test]
fn every_tag_round_trips() {
    for b in Behavior::ALL {
        assert_eq!(Behavior::parse(b.tag()), Some(b));
    }
    assert_eq!(Behavior::parse("teleport"), None);
}

#[test]
fn unknown_tag_falls_back_to_straight() {
    assert_eq!(Behavior::from_tag("teleport"), Behavior::Straight);
    assert_eq!(Behavior::from_tag("sniper"), Behavior::Sniper);
}

#[test]
fn init_state_matches_behavior() {
    let mut rng = seeded_rng();
    for b in Behavior::ALL {
        let state = BehaviorState::init(b, 0, &mut rng);
        assert!(state.belongs_to(b), "{b:?} got {state:?}");
    }
}

#[test]
fn foreign_state_is_reinitialised() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let h = spawn(&mut pool, Behavior::Straight, Vec2::new(500.0, 300.0), &mut rng);
    let enemy = pool.get_mut(h).unwrap();
    enemy.behavior = Behavior::Root;
    behavior::update(enemy, &ctx(100, None), &mut rng);
    assert!(matches!(enemy.ai, BehaviorState::Root { state: RootState::Rooted, .. }));
}

// ── Oscillating ───────────────────────────────────────────────────────────────

#[test]
fn straight_moves_left_at_full_speed() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let h = spawn(&mut pool, Behavior::Straight, Vec2::new(500.0, 300.0), &mut rng);
    let enemy = pool.get_mut(h).unwrap();
    behavior::update(enemy, &ctx(16, Some(Vec2::new(100.0, 100.0))), &mut rng);
    assert_eq!(enemy.vel, Vec2::new(-SPEED, 0.0));
}

#[test]
fn curve_is_a_pure_function_of_time() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let h = spawn(&mut pool, Behavior::Curve, Vec2::new(500.0, 300.0), &mut rng);
    let enemy = pool.get_mut(h).unwrap();
    behavior::update(enemy, &ctx(700, None), &mut rng);
    let first = enemy.vel;
    behavior::update(enemy, &ctx(700, None), &mut rng);
    assert_eq!(enemy.vel, first);
    assert!(approx(first.x, -0.8 * SPEED));
    assert!(first.y.abs() <= 0.8 * SPEED + 1e-3);
}

#[test]
fn zigzag_flips_vertical_direction() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let h = spawn(&mut pool, Behavior::Zigzag, Vec2::new(500.0, 360.0), &mut rng);
    let enemy = pool.get_mut(h).unwrap();
    behavior::update(enemy, &ctx(10, None), &mut rng);
    let before = enemy.vel.y.signum();
    assert!(approx(enemy.vel.x, -0.7 * SPEED));
    // The first flip is due within 900 ms of spawning.
    behavior::update(enemy, &ctx(900, None), &mut rng);
    assert_eq!(enemy.vel.y.signum(), -before);
}

// ── Pursuit ───────────────────────────────────────────────────────────────────

#[test]
fn chase_heads_for_the_player() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let h = spawn(&mut pool, Behavior::Chase, Vec2::new(500.0, 300.0), &mut rng);
    let enemy = pool.get_mut(h).unwrap();
    behavior::update(enemy, &ctx(16, Some(Vec2::new(100.0, 300.0))), &mut rng);
    assert!(approx(enemy.vel.x, -0.7 * SPEED));
    assert!(approx(enemy.vel.y, 0.0));
}

#[test]
fn pursuit_coasts_without_a_player() {
    let mut rng = seeded_rng();
    let coasting =
        [Behavior::Chase, Behavior::Honor, Behavior::Aerial, Behavior::Tactical, Behavior::Sniper];
    for b in coasting {
        let mut pool = Pool::with_capacity(1);
        let h = spawn(&mut pool, b, Vec2::new(500.0, 300.0), &mut rng);
        let enemy = pool.get_mut(h).unwrap();
        enemy.vel = Vec2::new(-12.0, 34.0);
        behavior::update(enemy, &ctx(16, None), &mut rng);
        assert_eq!(enemy.vel, Vec2::new(-12.0, 34.0), "{b:?} did not coast");
    }
}

#[test]
fn lightning_hunt_leads_a_moving_player() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let h = spawn(&mut pool, Behavior::LightningHunt, Vec2::new(600.0, 300.0), &mut rng);
    let enemy = pool.get_mut(h).unwrap();
    let context = WorldContext {
        player: Some(PlayerView { pos: Vec2::new(300.0, 300.0), vel: Vec2::new(0.0, 200.0) }),
        ..ctx(16, None)
    };
    behavior::update(enemy, &context, &mut rng);
    assert!(enemy.vel.x < 0.0);
    assert!(enemy.vel.y > 0.0, "should aim ahead of the player, got {:?}", enemy.vel);
}

// ── Tactical ──────────────────────────────────────────────────────────────────

#[test]
fn tactical_holds_inside_band() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let h = spawn(&mut pool, Behavior::Tactical, Vec2::new(375.0, 300.0), &mut rng);
    let enemy = pool.get_mut(h).unwrap();
    behavior::update(enemy, &ctx(16, Some(Vec2::new(100.0, 300.0))), &mut rng);
    assert_eq!(enemy.vel, Vec2::ZERO);
}

#[test]
fn tactical_approaches_and_retreats() {
    let mut rng = seeded_rng();
    let player = Some(Vec2::new(100.0, 300.0));
    let mut pool = Pool::with_capacity(2);
    let far = spawn(&mut pool, Behavior::Tactical, Vec2::new(600.0, 300.0), &mut rng);
    let near = spawn(&mut pool, Behavior::Tactical, Vec2::new(200.0, 300.0), &mut rng);

    let enemy = pool.get_mut(far).unwrap();
    behavior::update(enemy, &ctx(16, player), &mut rng);
    assert!(approx(enemy.vel.x, -0.7 * SPEED));

    let enemy = pool.get_mut(near).unwrap();
    behavior::update(enemy, &ctx(16, player), &mut rng);
    assert!(approx(enemy.vel.x, 0.6 * SPEED));
}

#[test]
fn sniper_keeps_a_longer_band() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(2);
    let inside = spawn(&mut pool, Behavior::Sniper, Vec2::new(570.0, 300.0), &mut rng);
    let too_close = spawn(&mut pool, Behavior::Sniper, Vec2::new(400.0, 300.0), &mut rng);
    let player = Some(Vec2::new(100.0, 300.0));

    let enemy = pool.get_mut(inside).unwrap();
    behavior::update(enemy, &ctx(16, player), &mut rng);
    assert_eq!(enemy.vel, Vec2::ZERO);

    let enemy = pool.get_mut(too_close).unwrap();
    behavior::update(enemy, &ctx(16, player), &mut rng);
    assert!(enemy.vel.x > 0.0);
}

// ── Phased strategies ─────────────────────────────────────────────────────────

fn phase_of(enemy: &Enemy) -> u8 {
    match enemy.ai {
        BehaviorState::Phased { phase, .. } => phase,
        other => panic!("unexpected state {other:?}"),
    }
}

#[test]
fn boss_walks_phases_in_order() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let h = spawn(&mut pool, Behavior::Boss, Vec2::new(900.0, 300.0), &mut rng);
    let enemy = pool.get_mut(h).unwrap();
    assert_eq!(phase_of(enemy), 0);

    let mut seen = Vec::new();
    // Switches are at most 5 s apart.
    for now in [5_000, 10_000, 15_000, 20_000] {
        behavior::update(enemy, &ctx(now, Some(Vec2::new(100.0, 300.0))), &mut rng);
        seen.push(phase_of(enemy));
    }
    assert_eq!(seen, vec![1, 2, 3, 0]);
}

#[test]
fn smart_never_repeats_its_phase() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let h = spawn(&mut pool, Behavior::Smart, Vec2::new(900.0, 300.0), &mut rng);
    let enemy = pool.get_mut(h).unwrap();
    let mut previous = phase_of(enemy);
    for i in 1..=20u64 {
        behavior::update(enemy, &ctx(i * 5_000, Some(Vec2::new(100.0, 300.0))), &mut rng);
        let phase = phase_of(enemy);
        assert_ne!(phase, previous);
        assert!(phase < 4);
        previous = phase;
    }
}

// ── Group ─────────────────────────────────────────────────────────────────────

#[test]
fn swarm_drifts_toward_nearby_siblings() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(4);
    let me = spawn(&mut pool, Behavior::Swarm, Vec2::new(500.0, 300.0), &mut rng);
    spawn(&mut pool, Behavior::Swarm, Vec2::new(500.0, 400.0), &mut rng);
    spawn(&mut pool, Behavior::Swarm, Vec2::new(500.0, 1_000.0), &mut rng);
    let neighbors: Vec<Neighbor> = ai::neighbors(&pool);
    assert_eq!(neighbors.len(), 3);

    let context = WorldContext { neighbors: &neighbors, ..ctx(0, None) };
    let enemy = pool.get_mut(me).unwrap();
    behavior::update(enemy, &context, &mut rng);
    assert!(approx(enemy.vel.x, -0.5 * SPEED));
    assert!(approx(enemy.vel.y, 0.5 * SPEED));
}

#[test]
fn lone_swarmer_advances_straight() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let me = spawn(&mut pool, Behavior::Swarm, Vec2::new(500.0, 300.0), &mut rng);
    let neighbors = ai::neighbors(&pool);
    let context = WorldContext { neighbors: &neighbors, ..ctx(0, None) };
    let enemy = pool.get_mut(me).unwrap();
    behavior::update(enemy, &context, &mut rng);
    assert_eq!(enemy.vel, Vec2::new(-SPEED, 0.0));
}

// ── Special-state machines ────────────────────────────────────────────────────

fn ambush_state(enemy: &Enemy) -> AmbushState {
    match enemy.ai {
        BehaviorState::Ambush { state, .. } => state,
        other => panic!("unexpected state {other:?}"),
    }
}

#[test]
fn ambush_hides_charges_attacks_and_hides_again() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let h = spawn(&mut pool, Behavior::Ambush, Vec2::new(500.0, 300.0), &mut rng);
    let enemy = pool.get_mut(h).unwrap();
    let far = Some(Vec2::new(-2_000.0, 300.0));
    let near = Some(Vec2::new(400.0, 300.0));

    behavior::update(enemy, &ctx(16, far), &mut rng);
    assert_eq!(ambush_state(enemy), AmbushState::Hiding);
    assert!(enemy.ai.holds_fire());
    assert!(approx(enemy.vel.x, -0.2 * SPEED));

    behavior::update(enemy, &ctx(32, near), &mut rng);
    assert_eq!(ambush_state(enemy), AmbushState::Charging);

    behavior::update(enemy, &ctx(300, near), &mut rng);
    assert_eq!(enemy.vel, Vec2::ZERO);
    assert_eq!(ambush_state(enemy), AmbushState::Charging);

    behavior::update(enemy, &ctx(632, near), &mut rng);
    assert_eq!(ambush_state(enemy), AmbushState::Attacking);
    assert!(!enemy.ai.holds_fire());

    behavior::update(enemy, &ctx(648, near), &mut rng);
    assert!(approx(enemy.vel.x, -1.8 * SPEED));
    assert!(approx(enemy.vel.y, 0.0));

    behavior::update(enemy, &ctx(632 + 1_500, near), &mut rng);
    assert_eq!(ambush_state(enemy), AmbushState::Hiding);
}

#[test]
fn ambush_gives_up_hiding_after_a_while() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let h = spawn(&mut pool, Behavior::Ambush, Vec2::new(500.0, 300.0), &mut rng);
    let enemy = pool.get_mut(h).unwrap();
    behavior::update(enemy, &ctx(6_000, None), &mut rng);
    assert_eq!(ambush_state(enemy), AmbushState::Charging);
}

#[test]
fn deceive_drops_disguise_when_close() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let h = spawn(&mut pool, Behavior::Deceive, Vec2::new(500.0, 300.0), &mut rng);
    let enemy = pool.get_mut(h).unwrap();

    behavior::update(enemy, &ctx(100, Some(Vec2::new(-1_000.0, 300.0))), &mut rng);
    assert!(matches!(enemy.ai, BehaviorState::Deceive { state: DeceiveState::Disguised, .. }));
    assert!(enemy.ai.holds_fire());
    assert!(approx(enemy.vel.x, -0.3 * SPEED));

    behavior::update(enemy, &ctx(200, Some(Vec2::new(300.0, 300.0))), &mut rng);
    assert!(matches!(enemy.ai, BehaviorState::Deceive { state: DeceiveState::Exposed, .. }));
    assert!(!enemy.ai.holds_fire());
    assert!(approx(enemy.vel.x, -SPEED));
}

#[test]
fn root_lunges_recovers_and_roots() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let h = spawn(&mut pool, Behavior::Root, Vec2::new(500.0, 300.0), &mut rng);
    let enemy = pool.get_mut(h).unwrap();
    let near = Some(Vec2::new(400.0, 300.0));
    let root_state = |e: &Enemy| match e.ai {
        BehaviorState::Root { state, .. } => state,
        other => panic!("unexpected state {other:?}"),
    };

    behavior::update(enemy, &ctx(10, near), &mut rng);
    assert_eq!(root_state(enemy), RootState::Lunging);

    behavior::update(enemy, &ctx(20, near), &mut rng);
    assert!(approx(enemy.vel.x, -2.0 * SPEED));

    behavior::update(enemy, &ctx(460, near), &mut rng);
    assert_eq!(root_state(enemy), RootState::Recovering);

    behavior::update(enemy, &ctx(1_460, None), &mut rng);
    assert_eq!(root_state(enemy), RootState::Rooted);
}

#[test]
fn phase_goes_intangible_then_jumps_closer() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let h = spawn(&mut pool, Behavior::Phase, Vec2::new(500.0, 300.0), &mut rng);
    let enemy = pool.get_mut(h).unwrap();
    let player = Some(Vec2::new(100.0, 300.0));

    behavior::update(enemy, &ctx(1_000, player), &mut rng);
    assert!(!enemy.is_intangible());
    assert!(approx(enemy.vel.x, -0.5 * SPEED));

    behavior::update(enemy, &ctx(2_500, player), &mut rng);
    assert!(matches!(enemy.ai, BehaviorState::Phase { state: PhaseState::Phased, .. }));
    assert!(enemy.is_intangible());
    assert!(enemy.ai.holds_fire());
    assert_eq!(enemy.vel, Vec2::ZERO);

    behavior::update(enemy, &ctx(3_400, player), &mut rng);
    assert!(!enemy.is_intangible());
    // Half of the 400 px gap, capped at 200.
    assert!(approx(enemy.pos.x, 300.0));
}

// ── AI pass ───────────────────────────────────────────────────────────────────

fn frame(now: u64, player: Option<Vec2>) -> Frame {
    Frame {
        now,
        dt: 0.016,
        bounds: Bounds::default(),
        player: player.map(|pos| PlayerView { pos, vel: Vec2::ZERO }),
    }
}

#[test]
fn enemies_move_by_velocity() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let h = spawn(&mut pool, Behavior::Straight, Vec2::new(500.0, 300.0), &mut rng);
    ai::step(&mut pool, Frame { dt: 0.5, ..frame(16, None) }, &mut rng);
    assert!(approx(pool.get(h).unwrap().pos.x, 450.0));
}

#[test]
fn enrage_switches_behavior_once() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let ty = EnemyTypeConfig {
        enraged_behavior: Some(Behavior::FastChase),
        ..enemy_type(Behavior::Chase)
    };
    let h = spawn_with(&mut pool, &ty, Vec2::new(800.0, 300.0), &mut rng);

    ai::step(&mut pool, frame(16, Some(Vec2::new(100.0, 300.0))), &mut rng);
    assert_eq!(pool.get(h).unwrap().behavior, Behavior::Chase);

    pool.get_mut(h).unwrap().health = 20.0;
    ai::step(&mut pool, frame(32, Some(Vec2::new(100.0, 300.0))), &mut rng);
    let enemy = pool.get(h).unwrap();
    assert!(enemy.enraged);
    assert_eq!(enemy.behavior, Behavior::FastChase);
    assert!(matches!(enemy.ai, BehaviorState::FastChase { .. }));
}

#[test]
fn shooters_fire_on_their_interval() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(1);
    let ty = EnemyTypeConfig { shoot_interval_ms: Some(1_000), ..enemy_type(Behavior::Tactical) };
    let h = spawn_with(&mut pool, &ty, Vec2::new(375.0, 300.0), &mut rng);
    let first = pool.get(h).unwrap().next_shot_at;
    assert!((500..=1_000).contains(&first));
    let player = Some(Vec2::new(100.0, 300.0));

    assert!(ai::step(&mut pool, frame(first - 1, player), &mut rng).is_empty());

    let shots = ai::step(&mut pool, frame(first, player), &mut rng);
    assert_eq!(shots.len(), 1);
    assert_eq!(shots[0].shooter, h);
    assert!(approx(shots[0].direction.x, -1.0));

    assert!(ai::step(&mut pool, frame(first, player), &mut rng).is_empty());
    assert_eq!(pool.get(h).unwrap().next_shot_at, first + 1_000);
}

#[test]
fn no_shots_without_a_player_or_while_hidden() {
    let mut rng = seeded_rng();
    let mut pool = Pool::with_capacity(2);
    let gunner = EnemyTypeConfig { shoot_interval_ms: Some(500), ..enemy_type(Behavior::Straight) };
    let lurker = EnemyTypeConfig { shoot_interval_ms: Some(500), ..enemy_type(Behavior::Ambush) };
    spawn_with(&mut pool, &gunner, Vec2::new(900.0, 300.0), &mut rng);
    spawn_with(&mut pool, &lurker, Vec2::new(900.0, 500.0), &mut rng);

    assert!(ai::step(&mut pool, frame(1_000, None), &mut rng).is_empty());

    let far_player = Some(Vec2::new(-3_000.0, 300.0));
    let shots = ai::step(&mut pool, frame(1_016, far_player), &mut rng);
    assert_eq!(shots.len(), 1, "only the visible gunner should shoot");
}
