//! pvp-arena - turn-based two-player battles for chat bots
//!
//! Players challenge each other, field teams of three units and trade
//! whole-team attacks until one side's health pool is gone. The crate owns
//! the rules and the match lifecycle; rendering and user lookup belong to
//! the host bot (see `console` for a reference host).

pub mod combat;
pub mod config;
pub mod console;
pub mod pvp;

pub use config::{ArenaConfig, Rules};
pub use pvp::{PvpEngine, PvpError};
