//! Match registry
//!
//! Keyed store of live matches, one per unordered pair of participants.
//! The map lock is never held while waiting on a match lock, so a command
//! may hold its match lock and still remove the match from the registry.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::error::PvpError;
use super::state::{Match, MatchId, MatchState};
use super::unit::{Participant, ParticipantId};

/// Shared handle to a live match. Commands serialize on its lock.
pub type MatchHandle = Arc<Mutex<Match>>;

/// Unordered pair of participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey(ParticipantId, ParticipantId);

impl PairKey {
    pub fn new(a: ParticipantId, b: ParticipantId) -> Self {
        if a <= b {
            PairKey(a, b)
        } else {
            PairKey(b, a)
        }
    }

    pub fn contains(&self, participant: ParticipantId) -> bool {
        self.0 == participant || self.1 == participant
    }
}

#[derive(Debug)]
struct Entry {
    id: MatchId,
    /// Insertion order, oldest first
    seq: u64,
    handle: MatchHandle,
}

#[derive(Debug, Default)]
struct Inner {
    matches: HashMap<PairKey, Entry>,
    next_seq: u64,
}

/// Registry of live matches
#[derive(Debug)]
pub struct MatchRegistry {
    inner: RwLock<Inner>,
    /// Reject a challenge if either side already has a match
    exclusive: bool,
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MatchRegistry {
    /// Create an empty registry
    pub fn new(exclusive: bool) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            exclusive,
        }
    }

    /// The match containing `participant`, if any.
    ///
    /// When overlapping matches are allowed the oldest one wins, so a
    /// participant always resolves to exactly one match.
    pub fn find_by_participant(&self, participant: ParticipantId) -> Option<MatchHandle> {
        let inner = self.inner.read();
        inner
            .matches
            .iter()
            .filter(|(key, _)| key.contains(participant))
            .min_by_key(|(_, entry)| entry.seq)
            .map(|(_, entry)| entry.handle.clone())
    }

    /// Register a new pending match
    pub fn create(
        &self,
        challenger: ParticipantId,
        opponent: Participant,
        now: DateTime<Utc>,
    ) -> Result<MatchHandle, PvpError> {
        if opponent.is_bot || opponent.id == challenger {
            return Err(PvpError::InvalidTarget);
        }

        let key = PairKey::new(challenger, opponent.id);
        let mut inner = self.inner.write();

        if inner.matches.contains_key(&key) {
            return Err(PvpError::AlreadyMatched);
        }
        if self.exclusive
            && inner
                .matches
                .keys()
                .any(|k| k.contains(challenger) || k.contains(opponent.id))
        {
            return Err(PvpError::AlreadyMatched);
        }

        let m = Match::new(challenger, opponent.id, now);
        let id = m.id;
        let handle = Arc::new(Mutex::new(m));
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.matches.insert(
            key,
            Entry {
                id,
                seq,
                handle: handle.clone(),
            },
        );

        debug!(match_id = %id, %challenger, opponent = %opponent.id, "match created");
        Ok(handle)
    }

    /// Drop a match from the registry. Returns false if it was already gone.
    pub fn remove(&self, m: &Match) -> bool {
        let key = PairKey::new(m.challenger, m.opponent);
        let mut inner = self.inner.write();
        if !inner.matches.get(&key).is_some_and(|e| e.id == m.id) {
            return false;
        }
        inner.matches.remove(&key);
        debug!(match_id = %m.id, "match removed");
        true
    }

    /// Number of live matches
    pub fn len(&self) -> usize {
        self.inner.read().matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finish and drop pending matches idle for longer than `ttl`
    pub fn expire_idle(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> Vec<Match> {
        // Clone handles first so no match lock is taken under the map lock
        let handles: Vec<MatchHandle> = self
            .inner
            .read()
            .matches
            .values()
            .map(|e| e.handle.clone())
            .collect();

        let mut expired = Vec::new();
        for handle in handles {
            let mut m = handle.lock();
            if m.state() == MatchState::Pending && now - m.last_activity > ttl {
                m.finish();
                self.remove(&m);
                debug!(match_id = %m.id, "pending match expired");
                expired.push(m.clone());
            }
        }
        expired
    }
}
