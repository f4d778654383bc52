//! Participants, units and teams

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::combat::Tier;

/// Platform user id of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A challenge target as resolved by the collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    /// Bots cannot be challenged
    pub is_bot: bool,
}

impl Participant {
    pub fn human(id: ParticipantId) -> Self {
        Self { id, is_bot: false }
    }

    pub fn bot(id: ParticipantId) -> Self {
        Self { id, is_bot: true }
    }
}

/// Instance id of a unit. Two units are the same unit iff their ids match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u64);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A creature fielded in a match. Owned outside the arena and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub base_health: i32,
    pub base_attack: i32,
    pub tier: Tier,
}

impl Unit {
    pub fn new(id: UnitId, name: impl Into<String>, base_health: i32, base_attack: i32, tier: Tier) -> Self {
        Self {
            id,
            name: name.into(),
            base_health,
            base_attack,
            tier,
        }
    }

    /// Build a unit whose tier is read from its display tag
    pub fn from_tag(id: UnitId, name: impl Into<String>, base_health: i32, base_attack: i32, tag: &str) -> Self {
        Self::new(id, name, base_health, base_attack, Tier::from_tag(tag))
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tier.marker() {
            Some(marker) => write!(f, "{} {}", marker, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Ordered roster of units for one participant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Team {
    units: Vec<Arc<Unit>>,
}

impl Team {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn is_full(&self, size: usize) -> bool {
        self.units.len() >= size
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.units.iter().any(|u| u.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Unit>> {
        self.units.iter()
    }

    /// Append a unit; callers check capacity and duplicates first
    pub(crate) fn push(&mut self, unit: Arc<Unit>) {
        self.units.push(unit);
    }
}
