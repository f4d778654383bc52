//! Unit tiers
//!
//! A unit's tier is resolved once from its descriptive tag when it enters
//! the arena. Tiers grant a flat bonus to both health and attack.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Tier classifier for a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// ✨
    Sparkle,
    /// 👑
    Crown,
    /// 🌟
    Star,
    /// 🏆
    Trophy,
    /// 💎
    Gem,
    /// 🏳️‍⚧️
    PrideFlag,
    /// No marker
    #[default]
    Plain,
}

/// Tag markers in priority order. The first marker found decides the tier.
const MARKERS: &[(&str, Tier)] = &[
    ("\u{2728}", Tier::Sparkle),
    ("\u{1F451}", Tier::Crown),
    ("\u{1F31F}", Tier::Star),
    ("\u{1F3C6}", Tier::Trophy),
    ("\u{1F48E}", Tier::Gem),
    ("\u{1F3F3}\u{FE0F}\u{200D}\u{26A7}\u{FE0F}", Tier::PrideFlag),
];

impl Tier {
    /// Resolve a tier from a display tag
    pub fn from_tag(tag: &str) -> Tier {
        MARKERS
            .iter()
            .find(|(marker, _)| tag.contains(marker))
            .map(|(_, tier)| *tier)
            .unwrap_or(Tier::Plain)
    }

    /// Flat bonus applied to both health and attack
    pub fn bonus(&self) -> i32 {
        match self {
            Tier::Sparkle => 2500,
            Tier::Crown => 6500,
            Tier::Star => 5000,
            Tier::Trophy => 3000,
            Tier::Gem => 6000,
            Tier::PrideFlag => 1500,
            Tier::Plain => 0,
        }
    }

    /// The marker symbol for this tier, if any
    pub fn marker(&self) -> Option<&'static str> {
        MARKERS
            .iter()
            .find(|(_, tier)| tier == self)
            .map(|(marker, _)| *marker)
    }
}

impl FromStr for Tier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sparkle" | "shiny" => Ok(Tier::Sparkle),
            "crown" => Ok(Tier::Crown),
            "star" => Ok(Tier::Star),
            "trophy" => Ok(Tier::Trophy),
            "gem" => Ok(Tier::Gem),
            "prideflag" | "pride_flag" | "pride" => Ok(Tier::PrideFlag),
            "plain" | "none" => Ok(Tier::Plain),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tier::Sparkle => "sparkle",
            Tier::Crown => "crown",
            Tier::Star => "star",
            Tier::Trophy => "trophy",
            Tier::Gem => "gem",
            Tier::PrideFlag => "prideflag",
            Tier::Plain => "plain",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag_single_marker() {
        assert_eq!(Tier::from_tag("France \u{2728}"), Tier::Sparkle);
        assert_eq!(Tier::from_tag("\u{1F451} Prussia"), Tier::Crown);
        assert_eq!(Tier::from_tag("Japan \u{1F31F}"), Tier::Star);
        assert_eq!(Tier::from_tag("Brazil \u{1F3C6}"), Tier::Trophy);
        assert_eq!(Tier::from_tag("Qatar \u{1F48E}"), Tier::Gem);
        assert_eq!(
            Tier::from_tag("Malta \u{1F3F3}\u{FE0F}\u{200D}\u{26A7}\u{FE0F}"),
            Tier::PrideFlag
        );
        assert_eq!(Tier::from_tag("Poland"), Tier::Plain);
    }

    #[test]
    fn test_from_tag_priority() {
        // Sparkle outranks gem even though gem has the larger bonus
        assert_eq!(Tier::from_tag("\u{1F48E} Qatar \u{2728}"), Tier::Sparkle);
        // Crown outranks star
        assert_eq!(Tier::from_tag("\u{1F31F}\u{1F451}"), Tier::Crown);
        // Trophy outranks pride flag
        assert_eq!(
            Tier::from_tag("\u{1F3F3}\u{FE0F}\u{200D}\u{26A7}\u{FE0F} \u{1F3C6}"),
            Tier::Trophy
        );
    }

    #[test]
    fn test_plain_white_flag_is_not_pride() {
        assert_eq!(Tier::from_tag("\u{1F3F3}\u{FE0F}"), Tier::Plain);
    }

    #[test]
    fn test_bonus_table() {
        assert_eq!(Tier::Sparkle.bonus(), 2500);
        assert_eq!(Tier::Crown.bonus(), 6500);
        assert_eq!(Tier::Star.bonus(), 5000);
        assert_eq!(Tier::Trophy.bonus(), 3000);
        assert_eq!(Tier::Gem.bonus(), 6000);
        assert_eq!(Tier::PrideFlag.bonus(), 1500);
        assert_eq!(Tier::Plain.bonus(), 0);
    }

    #[test]
    fn test_marker_resolves_back() {
        for tier in [Tier::Sparkle, Tier::Crown, Tier::Gem, Tier::PrideFlag] {
            let marker = tier.marker().unwrap();
            assert_eq!(Tier::from_tag(marker), tier);
        }
        assert_eq!(Tier::Plain.marker(), None);
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!("crown".parse::<Tier>(), Ok(Tier::Crown));
        assert_eq!("GEM".parse::<Tier>(), Ok(Tier::Gem));
        assert_eq!("pride".parse::<Tier>(), Ok(Tier::PrideFlag));
        assert!("diamond".parse::<Tier>().is_err());
        assert_eq!(Tier::PrideFlag.to_string(), "prideflag");
    }
}
