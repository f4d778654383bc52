//! Text console for the arena
//!
//! A line-based stand-in for the chat bot: parses `<player> <command>`
//! lines, resolves players and units through the roster, runs the engine
//! and renders the results either as chat text or as JSON lines.

mod roster;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::pvp::{
    AttackOutcome, ForfeitOutcome, MatchId, MatchState, ParticipantId, PvpEngine, PvpError,
    StatusView, UnitId,
};

pub use roster::{PlayerEntry, Roster, RosterError, UnitEntry};

const HELP: &str = "Commands: <player> challenge <player>, <player> add <unit id>, \
<player> accept, <player> attack, <player> status, <player> forfeit, <player> units, help, quit";

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Challenge(String),
    Add(String),
    Accept,
    Attack,
    Status,
    Forfeit,
    Units,
}

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Empty,
    Help,
    Quit,
    Player { actor: String, command: Command },
}

/// Errors raised before the engine is reached
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing {0}.")]
    MissingArgument(&'static str),

    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("You don't own that unit.")]
    NotOwner,
}

/// Parse one input line
pub fn parse_line(line: &str) -> Result<Line, ConsoleError> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let Some(first) = parts.first() else {
        return Ok(Line::Empty);
    };
    match first.to_lowercase().as_str() {
        "help" | "?" => return Ok(Line::Help),
        "quit" | "exit" => return Ok(Line::Quit),
        _ => {}
    }

    let actor = first.to_string();
    let verb = parts
        .get(1)
        .ok_or(ConsoleError::MissingArgument("command"))?
        .to_lowercase();
    let arg = parts.get(2).map(|s| s.to_string());

    let command = match verb.as_str() {
        "challenge" => Command::Challenge(arg.ok_or(ConsoleError::MissingArgument("opponent"))?),
        "add" => Command::Add(arg.ok_or(ConsoleError::MissingArgument("unit id"))?),
        "accept" => Command::Accept,
        "attack" => Command::Attack,
        "status" => Command::Status,
        "forfeit" => Command::Forfeit,
        "units" => Command::Units,
        _ => return Err(ConsoleError::UnknownCommand(verb)),
    };
    Ok(Line::Player { actor, command })
}

/// Something the console reports back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Challenged {
        match_id: MatchId,
        challenger: ParticipantId,
        opponent: ParticipantId,
    },
    UnitAdded {
        participant: ParticipantId,
        unit: UnitId,
        label: String,
        team_size: usize,
        capacity: usize,
    },
    Accepted {
        match_id: MatchId,
        challenger_health: i32,
        opponent_health: i32,
    },
    Attack(AttackOutcome),
    Status(StatusView),
    Forfeit(ForfeitOutcome),
    Expired {
        match_id: MatchId,
        challenger: ParticipantId,
        opponent: ParticipantId,
    },
    Units {
        participant: ParticipantId,
        units: Vec<String>,
    },
    Help {
        text: String,
    },
    Error {
        code: String,
        message: String,
    },
}

/// Console state: the engine, the roster and the output mode
#[derive(Debug)]
pub struct Console {
    engine: Arc<PvpEngine>,
    roster: Roster,
    json: bool,
}

impl Console {
    pub fn new(engine: Arc<PvpEngine>, roster: Roster, json: bool) -> Self {
        Self { engine, roster, json }
    }

    pub fn engine(&self) -> &PvpEngine {
        &self.engine
    }

    /// Run one line. Returns None on quit.
    pub fn execute(&self, line: &str) -> Option<Vec<Event>> {
        let mut events: Vec<Event> = self
            .engine
            .expire_idle()
            .into_iter()
            .map(|m| Event::Expired {
                match_id: m.id,
                challenger: m.challenger,
                opponent: m.opponent,
            })
            .collect();

        match parse_line(line) {
            Ok(Line::Empty) => {}
            Ok(Line::Quit) => return None,
            Ok(Line::Help) => events.push(Event::Help {
                text: HELP.to_string(),
            }),
            Ok(Line::Player { actor, command }) => {
                events.push(self.dispatch(&actor, &command).unwrap_or_else(|e| e));
            }
            Err(e) => events.push(console_error(&e)),
        }
        Some(events)
    }

    fn dispatch(&self, actor: &str, command: &Command) -> Result<Event, Event> {
        let actor = self
            .roster
            .player(actor)
            .ok_or_else(|| console_error(&ConsoleError::UnknownPlayer(actor.to_string())))?
            .id;
        debug!(%actor, ?command, "dispatch");

        let pvp_error = |e: PvpError| self.pvp_error(command, e);

        match command {
            Command::Challenge(target) => {
                let opponent = self.roster.player(target).ok_or_else(|| {
                    console_error(&ConsoleError::UnknownPlayer(target.to_string()))
                })?;
                let m = self.engine.challenge(actor, opponent).map_err(pvp_error)?;
                Ok(Event::Challenged {
                    match_id: m.id,
                    challenger: m.challenger,
                    opponent: m.opponent,
                })
            }
            Command::Add(raw) => {
                let unknown = || console_error(&ConsoleError::UnknownUnit(raw.to_string()));
                let id = raw
                    .trim_start_matches('#')
                    .parse::<u64>()
                    .map_err(|_| unknown())?;
                let (owner, unit) = self.roster.unit(UnitId(id)).ok_or_else(unknown)?;
                if owner != actor {
                    return Err(console_error(&ConsoleError::NotOwner));
                }
                let label = unit.to_string();
                let team = self.engine.add_unit(actor, unit).map_err(pvp_error)?;
                Ok(Event::UnitAdded {
                    participant: actor,
                    unit: UnitId(id),
                    label,
                    team_size: team.len(),
                    capacity: self.engine.rules().team_size,
                })
            }
            Command::Accept => {
                let m = self.engine.accept(actor).map_err(pvp_error)?;
                Ok(Event::Accepted {
                    match_id: m.id,
                    challenger_health: m.health_of(m.challenger).unwrap_or(0),
                    opponent_health: m.health_of(m.opponent).unwrap_or(0),
                })
            }
            Command::Attack => self.engine.attack(actor).map(Event::Attack).map_err(pvp_error),
            Command::Status => self.engine.status(actor).map(Event::Status).map_err(pvp_error),
            Command::Forfeit => self.engine.forfeit(actor).map(Event::Forfeit).map_err(pvp_error),
            Command::Units => Ok(Event::Units {
                participant: actor,
                units: self
                    .roster
                    .units_of(actor)
                    .iter()
                    .map(|u| format!("{} {}", u.id, u))
                    .collect(),
            }),
        }
    }

    /// User-facing text for an engine error
    fn pvp_error(&self, command: &Command, err: PvpError) -> Event {
        let message = match err {
            PvpError::InvalidTarget => "Invalid challenge target.".to_string(),
            PvpError::AlreadyMatched => "One of you is already in a match.".to_string(),
            PvpError::NotInMatch => "You're not in an active challenge.".to_string(),
            PvpError::TeamFull => format!(
                "You've already added {} units.",
                self.engine.rules().team_size
            ),
            PvpError::DuplicateUnit => "This unit is already added.".to_string(),
            PvpError::NotChallenged => "You are not being challenged.".to_string(),
            PvpError::TeamsIncomplete => format!(
                "Both players need {} units selected.",
                self.engine.rules().team_size
            ),
            PvpError::NoActiveMatch => "No active battle found.".to_string(),
            PvpError::NotYourTurn => "It's not your turn.".to_string(),
            PvpError::NoMatch if *command == Command::Forfeit => {
                "You are not in an active match.".to_string()
            }
            PvpError::NoMatch => "No ongoing match.".to_string(),
        };
        Event::Error {
            code: err.code().to_string(),
            message,
        }
    }

    fn mention(&self, id: ParticipantId) -> String {
        format!("@{}", self.roster.name_of(id))
    }

    /// Chat text for an event
    pub fn render(&self, event: &Event) -> String {
        match event {
            Event::Challenged { opponent, .. } => {
                format!("You have challenged {} to a PvP match!", self.mention(*opponent))
            }
            Event::UnitAdded {
                label,
                team_size,
                capacity,
                ..
            } => format!("{} has been added to your team. ({}/{})", label, team_size, capacity),
            Event::Accepted { .. } => "PvP match accepted! Let the battle begin.".to_string(),
            Event::Attack(hit) => {
                let mut text = format!(
                    "{} attacks {} for **{}** damage! {} now has **{}** HP left.",
                    self.mention(hit.attacker),
                    self.mention(hit.defender),
                    hit.damage,
                    self.mention(hit.defender),
                    hit.remaining_health
                );
                if let Some(winner) = hit.winner {
                    text.push_str(&format!("\n{} has won the PvP match!", self.mention(winner)));
                }
                text
            }
            Event::Status(view) => {
                let mut text = format!("**State:** {}", view.state);
                if view.state == MatchState::Active {
                    if let Some([challenger, opponent]) = view.health {
                        text.push_str(&format!("\n**Challenger HP:** {}", challenger.health));
                        text.push_str(&format!("\n**Opponent HP:** {}", opponent.health));
                    }
                    if let Some(turn) = view.turn {
                        text.push_str(&format!("\n**Current Turn:** {}", self.mention(turn)));
                    }
                }
                text
            }
            Event::Forfeit(outcome) => format!(
                "{} has forfeited the match. {} wins!",
                self.mention(outcome.forfeiter),
                self.mention(outcome.winner)
            ),
            Event::Expired {
                challenger,
                opponent,
                ..
            } => format!(
                "The challenge between {} and {} expired.",
                self.mention(*challenger),
                self.mention(*opponent)
            ),
            Event::Units { units, .. } if units.is_empty() => "You have no units.".to_string(),
            Event::Units { units, .. } => units.join("\n"),
            Event::Help { text } => text.clone(),
            Event::Error { message, .. } => message.clone(),
        }
    }

    /// Format an event for output in the configured mode
    pub fn format(&self, event: &Event) -> String {
        if self.json {
            serde_json::to_string(event).unwrap_or_else(|e| {
                format!(r#"{{"type":"error","code":"serialize","message":"{}"}}"#, e)
            })
        } else {
            self.render(event)
        }
    }

    /// Read commands line by line until EOF or quit
    pub async fn run<R, W>(&self, input: R, mut output: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("console ready");
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let Some(events) = self.execute(&line) else {
                break;
            };
            for event in &events {
                output.write_all(self.format(event).as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
            output.flush().await?;
        }
        info!("console closed");
        Ok(())
    }
}

fn console_error(err: &ConsoleError) -> Event {
    let code = match err {
        ConsoleError::UnknownCommand(_) => "unknown_command",
        ConsoleError::MissingArgument(_) => "missing_argument",
        ConsoleError::UnknownPlayer(_) => "unknown_player",
        ConsoleError::UnknownUnit(_) => "unknown_unit",
        ConsoleError::NotOwner => "not_owner",
    };
    Event::Error {
        code: code.to_string(),
        message: err.to_string(),
    }
}
