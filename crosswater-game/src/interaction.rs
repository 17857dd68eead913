//! Things the player can focus and press the interact key on.
use serde::{Deserialize, Serialize};

use crate::constants::{LABEL_MOVE_KILLER, LABEL_MOVE_VILLAGER, LABEL_PULL_LEVER, LABEL_TUTORIAL};
use crate::crossing::{LaunchOutcome, MoveOutcome};
use crate::roster::{CharacterId, CharacterKind};
use crate::session::CrossingSession;

/// Tint of the interaction prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affordance {
    Blue,
    Red,
    Gray,
    Yellow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interaction {
    Move(MoveOutcome),
    Launch(LaunchOutcome),
    Tutorial(TutorialOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tutorial", rename_all = "snake_case")]
pub enum TutorialOutcome {
    Started { until: f64 },
    AlreadySpeaking,
}

pub trait Interactable {
    fn label(&self) -> &'static str;

    fn affordance(&self) -> Affordance;

    fn interact(&self, session: &mut CrossingSession) -> Interaction;
}

/// A villager or killer the player can teleport between bank and boat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterTarget {
    pub id: CharacterId,
    pub kind: CharacterKind,
}

impl Interactable for CharacterTarget {
    fn label(&self) -> &'static str {
        match self.kind {
            CharacterKind::Villager => LABEL_MOVE_VILLAGER,
            CharacterKind::Killer => LABEL_MOVE_KILLER,
        }
    }

    fn affordance(&self) -> Affordance {
        match self.kind {
            CharacterKind::Villager => Affordance::Blue,
            CharacterKind::Killer => Affordance::Red,
        }
    }

    fn interact(&self, session: &mut CrossingSession) -> Interaction {
        Interaction::Move(session.request_move(self.id))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lever;

impl Interactable for Lever {
    fn label(&self) -> &'static str {
        LABEL_PULL_LEVER
    }

    fn affordance(&self) -> Affordance {
        Affordance::Gray
    }

    fn interact(&self, session: &mut CrossingSession) -> Interaction {
        Interaction::Launch(session.try_launch())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TutorialGuide;

impl Interactable for TutorialGuide {
    fn label(&self) -> &'static str {
        LABEL_TUTORIAL
    }

    fn affordance(&self) -> Affordance {
        Affordance::Yellow
    }

    fn interact(&self, session: &mut CrossingSession) -> Interaction {
        Interaction::Tutorial(session.start_tutorial())
    }
}

/// Tutorial narration timing; one clip at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Narration {
    speaking_until: Option<f64>,
}

impl Narration {
    #[must_use]
    pub const fn is_speaking(&self) -> bool {
        self.speaking_until.is_some()
    }

    pub fn start(&mut self, now: f64, clip_secs: f64) -> TutorialOutcome {
        if self.is_speaking() {
            return TutorialOutcome::AlreadySpeaking;
        }
        let until = now + clip_secs;
        self.speaking_until = Some(until);
        TutorialOutcome::Started { until }
    }

    /// Ends the clip once its length has played; returns true on that tick.
    pub fn update(&mut self, now: f64) -> bool {
        match self.speaking_until {
            Some(until) if now >= until => {
                self.speaking_until = None;
                true
            }
            _ => false,
        }
    }
}
