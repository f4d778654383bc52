//! Player and unit roster for the console
//!
//! Stands in for the bot's user and inventory lookups. Loaded from TOML:
//!
//! ```toml
//! [[players]]
//! id = 1
//! name = "alice"
//!
//! [[units]]
//! id = 10
//! owner = 1
//! name = "France"
//! health = 1200
//! attack = 900
//! tag = "France ✨"
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use figment::providers::{Format, Toml};
use figment::Figment;
use serde::Deserialize;
use thiserror::Error;

use crate::pvp::{Participant, ParticipantId, Unit, UnitId};

/// Roster errors
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster error: {0}")]
    Figment(#[from] figment::Error),

    #[error("duplicate player: {0}")]
    DuplicatePlayer(String),

    #[error("duplicate unit id: {0}")]
    DuplicateUnit(u64),

    #[error("unit {unit} owned by unknown player {owner}")]
    UnknownOwner { unit: u64, owner: u64 },
}

/// A player entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerEntry {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub bot: bool,
}

/// A unit entry. `tag` is the display string the tier is read from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitEntry {
    pub id: u64,
    pub owner: u64,
    pub name: String,
    pub health: i32,
    pub attack: i32,
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Default, Deserialize)]
struct RosterFile {
    #[serde(default)]
    players: Vec<PlayerEntry>,
    #[serde(default)]
    units: Vec<UnitEntry>,
}

/// Indexed roster
#[derive(Debug, Default)]
pub struct Roster {
    players: Vec<PlayerEntry>,
    by_name: HashMap<String, usize>,
    units: HashMap<UnitId, (ParticipantId, Arc<Unit>)>,
}

impl Roster {
    /// Load a roster from a TOML file
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        Self::from_figment(Figment::from(Toml::file(path)))
    }

    /// Parse a roster from TOML text
    pub fn from_toml(text: &str) -> Result<Self, RosterError> {
        Self::from_figment(Figment::from(Toml::string(text)))
    }

    fn from_figment(figment: Figment) -> Result<Self, RosterError> {
        let file: RosterFile = figment.extract()?;
        Self::build(file.players, file.units)
    }

    /// Index players and units. Unit tiers are resolved here, once.
    pub fn build(players: Vec<PlayerEntry>, units: Vec<UnitEntry>) -> Result<Self, RosterError> {
        let mut roster = Roster::default();

        for player in players {
            let key = player.name.to_lowercase();
            let taken = roster.by_name.contains_key(&key)
                || roster.players.iter().any(|p| p.id == player.id);
            if taken {
                return Err(RosterError::DuplicatePlayer(player.name));
            }
            roster.by_name.insert(key, roster.players.len());
            roster.players.push(player);
        }

        for entry in units {
            if !roster.players.iter().any(|p| p.id == entry.owner) {
                return Err(RosterError::UnknownOwner {
                    unit: entry.id,
                    owner: entry.owner,
                });
            }
            let id = UnitId(entry.id);
            if roster.units.contains_key(&id) {
                return Err(RosterError::DuplicateUnit(entry.id));
            }
            let tag = if entry.tag.is_empty() { &entry.name } else { &entry.tag };
            let unit = Unit::from_tag(id, entry.name.clone(), entry.health, entry.attack, tag);
            roster
                .units
                .insert(id, (ParticipantId(entry.owner), Arc::new(unit)));
        }

        Ok(roster)
    }

    /// Resolve a player by name (case-insensitive) or numeric id
    pub fn player(&self, key: &str) -> Option<Participant> {
        let key = key.trim_start_matches('@');
        let entry = match self.by_name.get(&key.to_lowercase()) {
            Some(&idx) => self.players.get(idx),
            None => key
                .parse::<u64>()
                .ok()
                .and_then(|id| self.players.iter().find(|p| p.id == id)),
        }?;
        Some(Participant {
            id: ParticipantId(entry.id),
            is_bot: entry.bot,
        })
    }

    /// Display name of a participant, falling back to the raw id
    pub fn name_of(&self, id: ParticipantId) -> String {
        self.players
            .iter()
            .find(|p| p.id == id.0)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// A unit and its owner
    pub fn unit(&self, id: UnitId) -> Option<(ParticipantId, Arc<Unit>)> {
        self.units.get(&id).cloned()
    }

    /// Units owned by a participant, ordered by id
    pub fn units_of(&self, owner: ParticipantId) -> Vec<Arc<Unit>> {
        let mut units: Vec<Arc<Unit>> = self
            .units
            .values()
            .filter(|(o, _)| *o == owner)
            .map(|(_, u)| u.clone())
            .collect();
        units.sort_by_key(|u| u.id);
        units
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Tier;

    const ROSTER: &str = r#"
[[players]]
id = 1
name = "Alice"

[[players]]
id = 2
name = "bob"

[[players]]
id = 99
name = "ballsdex"
bot = true

[[units]]
id = 10
owner = 1
name = "France"
health = 1200
attack = 900
tag = "France ✨"

[[units]]
id = 11
owner = 1
name = "Poland"
health = 800
attack = 700
"#;

    #[test]
    fn test_parse_roster() {
        let roster = Roster::from_toml(ROSTER).unwrap();

        let alice = roster.player("alice").unwrap();
        assert_eq!(alice.id, ParticipantId(1));
        assert!(!alice.is_bot);
        assert_eq!(roster.player("@Bob").unwrap().id, ParticipantId(2));
        assert_eq!(roster.player("2").unwrap().id, ParticipantId(2));
        assert!(roster.player("ballsdex").unwrap().is_bot);
        assert!(roster.player("carol").is_none());

        assert_eq!(roster.name_of(ParticipantId(1)), "Alice");
        assert_eq!(roster.name_of(ParticipantId(7)), "7");
    }

    #[test]
    fn test_tiers_resolved_on_load() {
        let roster = Roster::from_toml(ROSTER).unwrap();
        let (owner, france) = roster.unit(UnitId(10)).unwrap();
        assert_eq!(owner, ParticipantId(1));
        assert_eq!(france.tier, Tier::Sparkle);
        assert_eq!(roster.unit(UnitId(11)).unwrap().1.tier, Tier::Plain);

        // lookups hand out the same shared unit
        let (_, again) = roster.unit(UnitId(10)).unwrap();
        assert!(Arc::ptr_eq(&france, &again));

        let owned = roster.units_of(ParticipantId(1));
        assert_eq!(owned.len(), 2);
        assert_eq!(owned[0].id, UnitId(10));
        assert!(roster.units_of(ParticipantId(2)).is_empty());
    }

    #[test]
    fn test_roster_validation() {
        let players = vec![PlayerEntry {
            id: 1,
            name: "alice".into(),
            bot: false,
        }];
        let orphan = UnitEntry {
            id: 5,
            owner: 2,
            name: "Peru".into(),
            health: 1,
            attack: 1,
            tag: String::new(),
        };
        assert!(matches!(
            Roster::build(players.clone(), vec![orphan]),
            Err(RosterError::UnknownOwner { unit: 5, owner: 2 })
        ));

        let mut dup = players.clone();
        dup.push(PlayerEntry {
            id: 2,
            name: "ALICE".into(),
            bot: false,
        });
        assert!(matches!(
            Roster::build(dup, vec![]),
            Err(RosterError::DuplicatePlayer(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.toml");
        std::fs::write(&path, ROSTER).unwrap();

        let roster = Roster::load(&path).unwrap();
        assert!(roster.player("bob").is_some());
    }
}
