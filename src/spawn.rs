//! Weighted random selection, the two-stage drop gate and the timed spawner.

use glam::Vec2;
use rand::Rng;
use tracing::trace;

use crate::config::{DropConfig, EnemyTypeConfig, LevelConfig, PowerUpSpec};

/// Anything that can take part in a weighted draw.
pub trait Weighted {
    fn weight(&self) -> f32;
}

impl Weighted for EnemyTypeConfig {
    fn weight(&self) -> f32 {
        self.weight
    }
}

impl Weighted for PowerUpSpec {
    fn weight(&self) -> f32 {
        self.weight
    }
}

/// A loose `{item, weight}` pair for ad-hoc draws.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate<T> {
    pub item: T,
    pub weight: f32,
}

impl<T> Weighted for Candidate<T> {
    fn weight(&self) -> f32 {
        self.weight
    }
}

/// Draw one candidate with probability proportional to its weight.
///
/// Rolls in `[0, total)` and walks the list subtracting weights until the
/// remainder reaches zero.  Non-positive weights never win.  If rounding
/// leaves a positive remainder after the walk, the first candidate is used.
pub fn select_weighted<'a, T: Weighted>(candidates: &'a [T], rng: &mut impl Rng) -> Option<&'a T> {
    let first = candidates.first()?;
    let total: f64 = candidates
        .iter()
        .map(|c| c.weight() as f64)
        .filter(|w| *w > 0.0)
        .sum();
    if total <= 0.0 {
        return Some(first);
    }
    let mut remainder = rng.gen::<f64>() * total;
    for candidate in candidates {
        let weight = candidate.weight() as f64;
        if weight <= 0.0 {
            continue;
        }
        remainder -= weight;
        if remainder <= 0.0 {
            return Some(candidate);
        }
    }
    Some(first)
}

/// Two-stage drop roll.  `rate` gates whether anything drops; on success a
/// weighted draw picks the power-up type.  Sources whose own rate is above
/// the rarity threshold multiply rare types' weights by the rarity boost.
pub fn roll_drop<'a>(
    rate: f32,
    drops: &DropConfig,
    power_ups: &'a [PowerUpSpec],
    rng: &mut impl Rng,
) -> Option<&'a PowerUpSpec> {
    if rng.gen::<f32>() >= rate {
        return None;
    }
    if rate <= drops.rarity_threshold {
        return select_weighted(power_ups, rng);
    }
    let boosted: Vec<Candidate<&PowerUpSpec>> = power_ups
        .iter()
        .map(|spec| Candidate {
            item: spec,
            weight: if spec.rare { spec.weight * drops.rarity_boost } else { spec.weight },
        })
        .collect();
    select_weighted(&boosted, rng).map(|c| c.item)
}

/// Spawns one enemy from the level's weighted table every interval.
#[derive(Clone, Debug)]
pub struct Spawner {
    interval_ms: u64,
    next_spawn_at: u64,
}

impl Spawner {
    pub fn new(interval_ms: u64, now: u64) -> Self {
        Self { interval_ms, next_spawn_at: now.saturating_add(interval_ms) }
    }

    pub fn next_spawn_at(&self) -> u64 {
        self.next_spawn_at
    }

    /// When due, pick an enemy type and an entry point on the leading edge.
    pub fn poll<'a>(
        &mut self,
        now: u64,
        level: &'a LevelConfig,
        rng: &mut impl Rng,
    ) -> Option<(&'a EnemyTypeConfig, Vec2)> {
        if now < self.next_spawn_at {
            return None;
        }
        self.next_spawn_at = now.saturating_add(self.interval_ms);
        let ty = select_weighted(&level.enemy_types, rng)?;
        let height = level.bounds.height;
        let margin = (height * 0.1).min(48.0);
        let y = if height > 2.0 * margin {
            rng.gen_range(margin..height - margin)
        } else {
            height * 0.5
        };
        trace!(kind = %ty.name, y, "spawn roll");
        Some((ty, Vec2::new(level.bounds.width, y)))
    }
}
