//! Match engine
//!
//! Command handlers for the match lifecycle:
//! - challenge: create a pending match
//! - add_unit: assemble a team
//! - accept: start the match once both teams are full
//! - attack: resolve one turn
//! - status / forfeit
//!
//! Every handler validates before it writes, so a failed command leaves
//! the match untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::combat::{calculate_team_attack, team_health, DamageRoll, ThreadRoll};
use crate::config::{ConfigError, Rules};

use super::error::PvpError;
use super::registry::{MatchHandle, MatchRegistry};
use super::state::{Match, MatchId, MatchState};
use super::unit::{Participant, ParticipantId, Team, Unit};

/// Result of a resolved attack
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackOutcome {
    pub match_id: MatchId,
    pub attacker: ParticipantId,
    pub defender: ParticipantId,
    pub damage: i32,
    /// Defender health after the hit, never below zero
    pub remaining_health: i32,
    /// Attacker health, never below zero
    pub attacker_health: i32,
    /// Set when this attack ended the match
    pub winner: Option<ParticipantId>,
}

/// One participant's health in a status report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub participant: ParticipantId,
    pub health: i32,
}

/// Read-only view of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub match_id: MatchId,
    pub state: MatchState,
    pub challenger: ParticipantId,
    pub opponent: ParticipantId,
    /// Challenger first; only while active
    pub health: Option<[Standing; 2]>,
    /// Only while active
    pub turn: Option<ParticipantId>,
}

/// Result of a forfeit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForfeitOutcome {
    pub match_id: MatchId,
    pub forfeiter: ParticipantId,
    pub winner: ParticipantId,
    /// State the match was in when it was forfeited
    pub previous_state: MatchState,
}

/// The arena: registry, rules and damage roll source
pub struct PvpEngine {
    registry: MatchRegistry,
    rules: Rules,
    roller: Box<dyn DamageRoll>,
}

impl std::fmt::Debug for PvpEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PvpEngine")
            .field("registry", &self.registry)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl Default for PvpEngine {
    fn default() -> Self {
        Self::build(Rules::default(), Box::new(ThreadRoll))
    }
}

impl PvpEngine {
    /// Create an engine rolling damage from the thread RNG
    pub fn new(rules: Rules) -> Result<Self, ConfigError> {
        Self::with_roller(rules, ThreadRoll)
    }

    /// Create an engine with an injected damage roll source
    pub fn with_roller(rules: Rules, roller: impl DamageRoll + 'static) -> Result<Self, ConfigError> {
        rules.validate()?;
        Ok(Self::build(rules, Box::new(roller)))
    }

    fn build(rules: Rules, roller: Box<dyn DamageRoll>) -> Self {
        Self {
            registry: MatchRegistry::new(rules.exclusive_matches),
            rules,
            roller,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn registry(&self) -> &MatchRegistry {
        &self.registry
    }

    /// Run `f` on the live match of `participant` under its lock.
    ///
    /// A match seen as finished after locking was removed by the command
    /// that finished it, so the lookup is retried. A finished match that is
    /// still registered counts as missing.
    fn with_match<T>(
        &self,
        participant: ParticipantId,
        missing: PvpError,
        f: impl FnOnce(&mut Match) -> Result<T, PvpError>,
    ) -> Result<T, PvpError> {
        let mut stale: Option<MatchHandle> = None;
        loop {
            let handle = self
                .registry
                .find_by_participant(participant)
                .ok_or(missing)?;
            if stale.as_ref().is_some_and(|s| Arc::ptr_eq(s, &handle)) {
                return Err(missing);
            }
            let mut m = handle.lock();
            if m.state() == MatchState::Finished {
                drop(m);
                stale = Some(handle);
                continue;
            }
            return f(&mut m);
        }
    }

    /// Challenge `opponent` to a new match
    pub fn challenge(&self, challenger: ParticipantId, opponent: Participant) -> Result<Match, PvpError> {
        let handle = self.registry.create(challenger, opponent, Utc::now())?;
        let m = handle.lock().clone();
        Ok(m)
    }

    /// Add a unit to the participant's team
    pub fn add_unit(&self, participant: ParticipantId, unit: Arc<Unit>) -> Result<Team, PvpError> {
        let team_size = self.rules.team_size;
        self.with_match(participant, PvpError::NotInMatch, |m| {
            let match_id = m.id;
            let team = m.team_mut(participant).ok_or(PvpError::NotInMatch)?;
            if team.is_full(team_size) {
                return Err(PvpError::TeamFull);
            }
            if team.contains(unit.id) {
                return Err(PvpError::DuplicateUnit);
            }

            debug!(%match_id, %participant, unit = %unit.id, "unit added");
            team.push(unit);
            let team = team.clone();
            m.touch(Utc::now());
            Ok(team)
        })
    }

    /// Accept a pending challenge. Only the challenged side may accept.
    pub fn accept(&self, opponent: ParticipantId) -> Result<Match, PvpError> {
        self.with_match(opponent, PvpError::NotChallenged, |m| {
            if m.state() != MatchState::Pending || m.opponent != opponent {
                return Err(PvpError::NotChallenged);
            }
            if !m.teams_complete(self.rules.team_size) {
                return Err(PvpError::TeamsIncomplete);
            }

            let cap = self.rules.stat_cap;
            let challenger_health = m.team(m.challenger).map_or(0, |t| team_health(t, cap));
            let opponent_health = m.team(m.opponent).map_or(0, |t| team_health(t, cap));
            m.activate(challenger_health, opponent_health);
            m.touch(Utc::now());

            debug!(
                match_id = %m.id,
                challenger_health,
                opponent_health,
                "match accepted"
            );
            Ok(m.clone())
        })
    }

    /// Attack with the whole team. Only the participant holding the turn may attack.
    pub fn attack(&self, attacker: ParticipantId) -> Result<AttackOutcome, PvpError> {
        self.with_match(attacker, PvpError::NoActiveMatch, |m| {
            if m.state() != MatchState::Active {
                return Err(PvpError::NoActiveMatch);
            }
            if m.turn() != Some(attacker) {
                return Err(PvpError::NotYourTurn);
            }
            let defender = m.other(attacker).ok_or(PvpError::NoActiveMatch)?;

            let damage = match m.team(attacker) {
                Some(team) => calculate_team_attack(team, &self.rules, self.roller.as_ref()),
                None => return Err(PvpError::NoActiveMatch),
            };
            let remaining = m.apply_damage(defender, damage);
            let attacker_health = m.health_of(attacker).unwrap_or(0);

            let winner = if remaining <= 0 {
                m.finish();
                self.registry.remove(m);
                debug!(match_id = %m.id, winner = %attacker, "match won");
                Some(attacker)
            } else {
                m.pass_turn(defender);
                m.touch(Utc::now());
                None
            };

            debug!(match_id = %m.id, %attacker, %defender, damage, remaining, "attack resolved");
            Ok(AttackOutcome {
                match_id: m.id,
                attacker,
                defender,
                damage,
                remaining_health: remaining.max(0),
                attacker_health: attacker_health.max(0),
                winner,
            })
        })
    }

    /// Current state of the participant's match
    pub fn status(&self, participant: ParticipantId) -> Result<StatusView, PvpError> {
        self.with_match(participant, PvpError::NoMatch, |m| {
            let active = m.state() == MatchState::Active;
            let standing = |p: ParticipantId| Standing {
                participant: p,
                health: m.health_of(p).unwrap_or(0).max(0),
            };
            Ok(StatusView {
                match_id: m.id,
                state: m.state(),
                challenger: m.challenger,
                opponent: m.opponent,
                health: active.then(|| [standing(m.challenger), standing(m.opponent)]),
                turn: if active { m.turn() } else { None },
            })
        })
    }

    /// Give up. The other side wins whatever state the match is in.
    pub fn forfeit(&self, participant: ParticipantId) -> Result<ForfeitOutcome, PvpError> {
        self.with_match(participant, PvpError::NoMatch, |m| {
            let winner = m.other(participant).ok_or(PvpError::NoMatch)?;
            let previous_state = m.state();
            m.finish();
            self.registry.remove(m);

            debug!(match_id = %m.id, forfeiter = %participant, %winner, "match forfeited");
            Ok(ForfeitOutcome {
                match_id: m.id,
                forfeiter: participant,
                winner,
                previous_state,
            })
        })
    }

    /// Drop pending matches idle past the configured TTL
    pub fn expire_idle(&self) -> Vec<Match> {
        self.expire_idle_at(Utc::now())
    }

    /// Drop pending matches idle past the configured TTL, as of `now`
    pub fn expire_idle_at(&self, now: DateTime<Utc>) -> Vec<Match> {
        let Some(ttl) = self.rules.pending_ttl() else {
            return Vec::new();
        };
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => self.registry.expire_idle(now, ttl),
            Err(_) => Vec::new(),
        }
    }
}
