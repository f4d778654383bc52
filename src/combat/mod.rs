//! Combat rules
//!
//! - Unit tiers resolved from display tags
//! - Tier bonuses and the shared stat cap
//! - Team damage with an injectable random term

mod roll;
mod stats;
mod tier;

pub use roll::{DamageRoll, FixedRoll, SeededRoll, ThreadRoll};
pub use stats::{
    adjust, adjusted_attack, adjusted_health, calculate_team_attack, team_attack, team_health,
    MAX_STAT,
};
pub use tier::Tier;
