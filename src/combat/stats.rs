//! Stat adjustment and team damage
//!
//! Base stats get the unit's tier bonus and are then capped. Health and
//! attack are capped independently against the same ceiling.

use crate::config::Rules;
use crate::pvp::{Team, Unit};

use super::roll::DamageRoll;

/// Stat ceiling applied to adjusted health and attack
pub const MAX_STAT: i32 = 30000;

/// Apply a tier bonus to a base stat and cap it
pub fn adjust(base: i32, bonus: i32, cap: i32) -> i32 {
    base.saturating_add(bonus).min(cap)
}

/// Adjusted health of a unit
pub fn adjusted_health(unit: &Unit, cap: i32) -> i32 {
    adjust(unit.base_health, unit.tier.bonus(), cap)
}

/// Adjusted attack of a unit
pub fn adjusted_attack(unit: &Unit, cap: i32) -> i32 {
    adjust(unit.base_attack, unit.tier.bonus(), cap)
}

/// Starting health pool of a team
pub fn team_health(team: &Team, cap: i32) -> i32 {
    team.iter()
        .map(|u| adjusted_health(u, cap))
        .fold(0, i32::saturating_add)
}

/// Summed adjusted attack of a team, without the random term
pub fn team_attack(team: &Team, cap: i32) -> i32 {
    team.iter()
        .map(|u| adjusted_attack(u, cap))
        .fold(0, i32::saturating_add)
}

/// Damage dealt by one attack from `team`
///
/// The random term is rolled fresh on every call.
pub fn calculate_team_attack(team: &Team, rules: &Rules, roller: &dyn DamageRoll) -> i32 {
    team_attack(team, rules.stat_cap).saturating_add(roller.roll(rules.roll_min, rules.roll_max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{FixedRoll, ThreadRoll, Tier};
    use crate::pvp::UnitId;
    use std::sync::Arc;

    fn unit(id: u64, health: i32, attack: i32, tier: Tier) -> Arc<Unit> {
        Arc::new(Unit::new(UnitId(id), format!("unit{}", id), health, attack, tier))
    }

    fn team(units: Vec<Arc<Unit>>) -> Team {
        let mut team = Team::new();
        for u in units {
            team.push(u);
        }
        team
    }

    #[test]
    fn test_adjusted_stats_with_bonus() {
        let u = unit(1, 1000, 400, Tier::Crown);
        assert_eq!(adjusted_health(&u, MAX_STAT), 7500);
        assert_eq!(adjusted_attack(&u, MAX_STAT), 6900);

        let plain = unit(2, 1000, 400, Tier::Plain);
        assert_eq!(adjusted_health(&plain, MAX_STAT), 1000);
        assert_eq!(adjusted_attack(&plain, MAX_STAT), 400);
    }

    #[test]
    fn test_cap_applies_independently() {
        let u = unit(1, 29000, 100, Tier::Gem);
        assert_eq!(adjusted_health(&u, MAX_STAT), 30000);
        assert_eq!(adjusted_attack(&u, MAX_STAT), 6100);
    }

    #[test]
    fn test_cap_holds_for_huge_inputs() {
        let u = unit(1, i32::MAX, i32::MAX - 10, Tier::Crown);
        assert_eq!(adjusted_health(&u, MAX_STAT), MAX_STAT);
        assert_eq!(adjusted_attack(&u, MAX_STAT), MAX_STAT);
    }

    #[test]
    fn test_team_attack_range() {
        let rules = Rules::default();
        let t = team(vec![
            unit(1, 100, 300, Tier::Plain),
            unit(2, 100, 200, Tier::Sparkle),
            unit(3, 100, 100, Tier::Plain),
        ]);
        let sum = team_attack(&t, rules.stat_cap);
        assert_eq!(sum, 3100);

        for _ in 0..200 {
            let damage = calculate_team_attack(&t, &rules, &ThreadRoll);
            assert!(damage >= sum + 500 && damage <= sum + 1500, "damage {}", damage);
        }
    }

    #[test]
    fn test_team_attack_with_fixed_roll() {
        let rules = Rules::default();
        let t = team(vec![unit(1, 100, 10, Tier::Plain)]);
        assert_eq!(calculate_team_attack(&t, &rules, &FixedRoll(700)), 710);
    }

    #[test]
    fn test_team_health() {
        let t = team(vec![
            unit(1, 100, 1, Tier::Plain),
            unit(2, 100, 1, Tier::Plain),
            unit(3, 100, 1, Tier::Plain),
        ]);
        assert_eq!(team_health(&t, MAX_STAT), 300);
        assert_eq!(team_health(&Team::new(), MAX_STAT), 0);
    }
}
