//! Characters taking part in a crossing session.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::numbers::saturating_u32;

/// Stable identity of a character for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub u16);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterKind {
    Villager,
    Killer,
}

impl CharacterKind {
    /// Single-letter tag used by move scripts and compact logs.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Villager => 'V',
            Self::Killer => 'K',
        }
    }

    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'V' | 'v' => Some(Self::Villager),
            'K' | 'k' => Some(Self::Killer),
            _ => None,
        }
    }
}

impl fmt::Display for CharacterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Villager => write!(f, "villager"),
            Self::Killer => write!(f, "killer"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub kind: CharacterKind,
    /// Mirrors whether a boat seat references this character.
    #[serde(default)]
    pub in_boat: bool,
}

impl Character {
    #[must_use]
    pub const fn new(id: CharacterId, kind: CharacterKind) -> Self {
        Self {
            id,
            kind,
            in_boat: false,
        }
    }
}

/// Every character of a session, indexed by [`CharacterId`].
///
/// Characters are never destroyed mid-session; only their zone changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    characters: Vec<Character>,
}

impl Roster {
    /// Villagers first, then killers, with ids assigned in that order.
    #[must_use]
    pub fn with_counts(villagers: u8, killers: u8) -> Self {
        let kinds = std::iter::repeat_n(CharacterKind::Villager, usize::from(villagers))
            .chain(std::iter::repeat_n(CharacterKind::Killer, usize::from(killers)));
        let characters = kinds
            .enumerate()
            .map(|(idx, kind)| {
                let id = CharacterId(u16::try_from(idx).unwrap_or(u16::MAX));
                Character::new(id, kind)
            })
            .collect();
        Self { characters }
    }

    #[must_use]
    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(usize::from(id.0))
    }

    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.get_mut(usize::from(id.0))
    }

    #[must_use]
    pub fn kind_of(&self, id: CharacterId) -> Option<CharacterKind> {
        self.get(id).map(|c| c.kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    #[must_use]
    pub fn count_kind(&self, kind: CharacterKind) -> u32 {
        saturating_u32(self.characters.iter().filter(|c| c.kind == kind).count())
    }

    #[must_use]
    pub fn ids_of_kind(&self, kind: CharacterKind) -> Vec<CharacterId> {
        self.characters
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.id)
            .collect()
    }
}
