//! Match entity
//!
//! A match moves `Pending -> Active -> Finished`, or straight to
//! `Finished` on forfeit. Health is only meaningful once active.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::unit::{ParticipantId, Team};

/// Unique id of a match, for logs and collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub Uuid);

impl MatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchState {
    /// Challenge issued, teams being assembled
    Pending,
    /// Accepted, attacks being exchanged
    Active,
    /// Won or forfeited
    Finished,
}

impl std::fmt::Display for MatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchState::Pending => "Pending",
            MatchState::Active => "Active",
            MatchState::Finished => "Finished",
        };
        write!(f, "{}", s)
    }
}

/// One engagement between two participants
#[derive(Debug, Clone, Serialize)]
pub struct Match {
    pub id: MatchId,
    pub challenger: ParticipantId,
    pub opponent: ParticipantId,
    state: MatchState,
    /// Whose turn it is; set only while active
    turn: Option<ParticipantId>,
    challenger_team: Team,
    opponent_team: Team,
    challenger_health: i32,
    opponent_health: i32,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Match {
    /// Create a pending match
    pub fn new(challenger: ParticipantId, opponent: ParticipantId, now: DateTime<Utc>) -> Self {
        Self {
            id: MatchId::new(),
            challenger,
            opponent,
            state: MatchState::Pending,
            turn: None,
            challenger_team: Team::new(),
            opponent_team: Team::new(),
            challenger_health: 0,
            opponent_health: 0,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    /// Whose turn it is; None unless active
    pub fn turn(&self) -> Option<ParticipantId> {
        self.turn
    }

    pub fn involves(&self, participant: ParticipantId) -> bool {
        participant == self.challenger || participant == self.opponent
    }

    /// The other side of the match
    pub fn other(&self, participant: ParticipantId) -> Option<ParticipantId> {
        if participant == self.challenger {
            Some(self.opponent)
        } else if participant == self.opponent {
            Some(self.challenger)
        } else {
            None
        }
    }

    pub fn team(&self, participant: ParticipantId) -> Option<&Team> {
        if participant == self.challenger {
            Some(&self.challenger_team)
        } else if participant == self.opponent {
            Some(&self.opponent_team)
        } else {
            None
        }
    }

    pub(crate) fn team_mut(&mut self, participant: ParticipantId) -> Option<&mut Team> {
        if participant == self.challenger {
            Some(&mut self.challenger_team)
        } else if participant == self.opponent {
            Some(&mut self.opponent_team)
        } else {
            None
        }
    }

    /// Raw health of a participant (may be negative after the final blow).
    /// None while pending.
    pub fn health_of(&self, participant: ParticipantId) -> Option<i32> {
        if self.state == MatchState::Pending {
            return None;
        }
        if participant == self.challenger {
            Some(self.challenger_health)
        } else if participant == self.opponent {
            Some(self.opponent_health)
        } else {
            None
        }
    }

    /// Both teams hold at least `size` units
    pub fn teams_complete(&self, size: usize) -> bool {
        self.challenger_team.is_full(size) && self.opponent_team.is_full(size)
    }

    /// Pending -> Active. The challenger moves first.
    pub(crate) fn activate(&mut self, challenger_health: i32, opponent_health: i32) {
        self.state = MatchState::Active;
        self.turn = Some(self.challenger);
        self.challenger_health = challenger_health;
        self.opponent_health = opponent_health;
    }

    /// Subtract damage from a participant, returning the raw remainder
    pub(crate) fn apply_damage(&mut self, defender: ParticipantId, damage: i32) -> i32 {
        let health = if defender == self.challenger {
            &mut self.challenger_health
        } else {
            &mut self.opponent_health
        };
        *health = health.saturating_sub(damage);
        *health
    }

    /// Hand the turn to the other side
    pub(crate) fn pass_turn(&mut self, to: ParticipantId) {
        self.turn = Some(to);
    }

    pub(crate) fn finish(&mut self) {
        self.state = MatchState::Finished;
        self.turn = None;
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: ParticipantId = ParticipantId(1);
    const BOB: ParticipantId = ParticipantId(2);
    const CAROL: ParticipantId = ParticipantId(3);

    #[test]
    fn test_new_match_is_pending() {
        let m = Match::new(ALICE, BOB, Utc::now());
        assert_eq!(m.state(), MatchState::Pending);
        assert_eq!(m.turn(), None);
        assert_eq!(m.health_of(ALICE), None);
        assert!(m.team(ALICE).unwrap().is_empty());
    }

    #[test]
    fn test_sides() {
        let m = Match::new(ALICE, BOB, Utc::now());
        assert!(m.involves(ALICE));
        assert!(m.involves(BOB));
        assert!(!m.involves(CAROL));
        assert_eq!(m.other(ALICE), Some(BOB));
        assert_eq!(m.other(BOB), Some(ALICE));
        assert_eq!(m.other(CAROL), None);
        assert!(m.team(CAROL).is_none());
    }

    #[test]
    fn test_activate_and_damage() {
        let mut m = Match::new(ALICE, BOB, Utc::now());
        m.activate(300, 500);

        assert_eq!(m.state(), MatchState::Active);
        assert_eq!(m.turn(), Some(ALICE));
        assert_eq!(m.health_of(ALICE), Some(300));
        assert_eq!(m.health_of(BOB), Some(500));

        assert_eq!(m.apply_damage(BOB, 200), 300);
        assert_eq!(m.apply_damage(BOB, 450), -150);
        assert_eq!(m.health_of(ALICE), Some(300));

        m.finish();
        assert_eq!(m.state(), MatchState::Finished);
        assert_eq!(m.turn(), None);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(MatchState::Pending.to_string(), "Pending");
        assert_eq!(MatchState::Active.to_string(), "Active");
    }
}
