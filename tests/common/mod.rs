//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use pvp_arena::combat::Tier;
use pvp_arena::pvp::{Participant, ParticipantId, Unit, UnitId};
use pvp_arena::PvpEngine;

pub const ALICE: ParticipantId = ParticipantId(1);
pub const BOB: ParticipantId = ParticipantId(2);
pub const CAROL: ParticipantId = ParticipantId(3);

/// A unit with no tier bonus
pub fn plain_unit(id: u64, health: i32, attack: i32) -> Arc<Unit> {
    Arc::new(Unit::new(UnitId(id), format!("unit{}", id), health, attack, Tier::Plain))
}

/// ALICE challenges BOB and both field three identical plain units
pub fn ready_match(engine: &PvpEngine, health: i32, attack: i32) {
    engine
        .challenge(ALICE, Participant::human(BOB))
        .expect("challenge failed");
    for i in 0..3 {
        engine
            .add_unit(ALICE, plain_unit(10 + i, health, attack))
            .expect("alice add failed");
        engine
            .add_unit(BOB, plain_unit(20 + i, health, attack))
            .expect("bob add failed");
    }
}
