//! Outward event stream.  The world pushes, collaborators drain once per
//! frame.

use std::fmt;

use glam::Vec2;

use crate::buffs::BonusId;
use crate::entities::{ObstacleKind, PowerUpKind};
use crate::level::CompletionReason;
use crate::pool::Handle;
use crate::weapons::WeaponKind;

/// Symbolic audio/visual feedback requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeedbackEffect {
    Hit,
    Explosion,
    Heal,
    Pickup,
    Blink,
}

impl FeedbackEffect {
    pub fn name(&self) -> &'static str {
        match self {
            FeedbackEffect::Hit => "hit",
            FeedbackEffect::Explosion => "explosion",
            FeedbackEffect::Heal => "heal",
            FeedbackEffect::Pickup => "pickup",
            FeedbackEffect::Blink => "blink",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    EnemyDied { enemy: Handle, kind: String, score: u32, position: Vec2 },
    EnemyEscaped { enemy: Handle, damage: f32, position: Vec2 },
    Feedback { effect: FeedbackEffect, position: Vec2 },
    PlayerDamaged { amount: f32, health: f32 },
    PlayerDefeated,
    PowerUpDropped { drop: Handle, kind: PowerUpKind, position: Vec2 },
    PowerUpCollected { kind: PowerUpKind, bonus: Option<BonusId> },
    BonusExpired { bonus: BonusId, kind: PowerUpKind },
    AmmoDepleted { weapon: WeaponKind, message: String },
    ObstacleBroken { obstacle: Handle, kind: ObstacleKind, position: Vec2 },
    LevelComplete { reason: CompletionReason },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::EnemyDied { enemy, kind, score, position } => {
                write!(
                    f,
                    "EnemyDied enemy={enemy} kind={kind} score={score} at=({:.0},{:.0})",
                    position.x, position.y
                )
            }
            GameEvent::EnemyEscaped { enemy, damage, .. } => {
                write!(f, "EnemyEscaped enemy={enemy} damage={damage:.1}")
            }
            GameEvent::Feedback { effect, position } => {
                write!(f, "Feedback {} at=({:.0},{:.0})", effect.name(), position.x, position.y)
            }
            GameEvent::PlayerDamaged { amount, health } => {
                write!(f, "PlayerDamaged amount={amount:.1} health={health:.1}")
            }
            GameEvent::PlayerDefeated => write!(f, "PlayerDefeated"),
            GameEvent::PowerUpDropped { drop, kind, .. } => {
                write!(f, "PowerUpDropped drop={drop} kind={}", kind.name())
            }
            GameEvent::PowerUpCollected { kind, .. } => {
                write!(f, "PowerUpCollected kind={}", kind.name())
            }
            GameEvent::BonusExpired { bonus, kind } => {
                write!(f, "BonusExpired bonus={} kind={}", bonus.raw(), kind.name())
            }
            GameEvent::AmmoDepleted { message, .. } => write!(f, "AmmoDepleted {message}"),
            GameEvent::ObstacleBroken { obstacle, kind, .. } => {
                write!(f, "ObstacleBroken obstacle={obstacle} kind={}", kind.label())
            }
            GameEvent::LevelComplete { reason } => write!(f, "LevelComplete {reason}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<GameEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn feedback(&mut self, effect: FeedbackEffect, position: Vec2) {
        self.events.push(GameEvent::Feedback { effect, position });
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
