//! Command errors
//!
//! Every failure is an expected, caller-facing condition. Nothing is
//! mutated when a command fails.

use thiserror::Error;

/// Errors returned by arena commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PvpError {
    #[error("invalid challenge target")]
    InvalidTarget,

    #[error("participant already in a match")]
    AlreadyMatched,

    #[error("not in a match")]
    NotInMatch,

    #[error("team is full")]
    TeamFull,

    #[error("unit already on team")]
    DuplicateUnit,

    #[error("not being challenged")]
    NotChallenged,

    #[error("both teams must be complete")]
    TeamsIncomplete,

    #[error("no active match")]
    NoActiveMatch,

    #[error("not your turn")]
    NotYourTurn,

    #[error("no match")]
    NoMatch,
}

impl PvpError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            PvpError::InvalidTarget => "invalid_target",
            PvpError::AlreadyMatched => "already_matched",
            PvpError::NotInMatch => "not_in_match",
            PvpError::TeamFull => "team_full",
            PvpError::DuplicateUnit => "duplicate_unit",
            PvpError::NotChallenged => "not_challenged",
            PvpError::TeamsIncomplete => "teams_incomplete",
            PvpError::NoActiveMatch => "no_active_match",
            PvpError::NotYourTurn => "not_your_turn",
            PvpError::NoMatch => "no_match",
        }
    }
}
