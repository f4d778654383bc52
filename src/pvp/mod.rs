//! Two-player matches
//!
//! - Participants, units and teams
//! - The match entity and its lifecycle
//! - The registry of live matches
//! - The engine that runs commands against them

mod engine;
mod error;
mod registry;
mod state;
mod unit;

pub use engine::{AttackOutcome, ForfeitOutcome, PvpEngine, Standing, StatusView};
pub use error::PvpError;
pub use registry::{MatchHandle, MatchRegistry, PairKey};
pub use state::{Match, MatchId, MatchState};
pub use unit::{Participant, ParticipantId, Team, Unit, UnitId};
