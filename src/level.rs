//! Level progress and the single completion rule set.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Any goal that is set can end the level; whichever is met first wins.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelGoal {
    /// Distance the camera has to travel, in world units.
    #[serde(default)]
    pub length: Option<f32>,
    #[serde(default)]
    pub survive_ms: Option<u64>,
    #[serde(default)]
    pub kill_target: Option<u32>,
}

impl Default for LevelGoal {
    fn default() -> Self {
        Self { length: Some(36_000.0), survive_ms: None, kill_target: Some(60) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionReason {
    DistanceReached,
    Survived,
    KillTargetReached,
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CompletionReason::DistanceReached => "distance reached",
            CompletionReason::Survived => "survived",
            CompletionReason::KillTargetReached => "kill target reached",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Debug)]
pub struct LevelProgress {
    goal: LevelGoal,
    distance: f32,
    elapsed_ms: u64,
    completed: Option<CompletionReason>,
}

impl LevelProgress {
    pub fn new(goal: LevelGoal) -> Self {
        Self { goal, distance: 0.0, elapsed_ms: 0, completed: None }
    }

    pub fn advance(&mut self, dt_ms: u64, scroll_speed: f32) {
        if self.completed.is_some() {
            return;
        }
        self.elapsed_ms += dt_ms;
        self.distance += scroll_speed * dt_ms as f32 / 1_000.0;
    }

    /// Evaluate every goal.  Returns the reason exactly once, on the first
    /// call where a goal is met; later calls return `None`.
    pub fn check(&mut self, kills: u32) -> Option<CompletionReason> {
        if self.completed.is_some() {
            return None;
        }
        let goal = self.goal;
        let reason = if goal.length.is_some_and(|len| self.distance >= len) {
            CompletionReason::DistanceReached
        } else if goal.survive_ms.is_some_and(|ms| self.elapsed_ms >= ms) {
            CompletionReason::Survived
        } else if goal.kill_target.is_some_and(|target| kills >= target) {
            CompletionReason::KillTargetReached
        } else {
            return None;
        };
        info!(
            %reason,
            distance = self.distance,
            elapsed_ms = self.elapsed_ms,
            kills,
            "level complete"
        );
        self.completed = Some(reason);
        Some(reason)
    }

    pub fn is_complete(&self) -> bool {
        self.completed.is_some()
    }

    pub fn completion(&self) -> Option<CompletionReason> {
        self.completed
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn goal(&self) -> &LevelGoal {
        &self.goal
    }
}
