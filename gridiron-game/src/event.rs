//! Structured notifications emitted by play resolution.
//!
//! The engine never renders anything; a presentation adapter consumes these
//! events and decides how to show them.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::TeamNames;
use crate::state::{GameState, GameStatus, Score, Side, format_clock, quarter_label};

/// Presentation tone hint for a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Normal,
    Shake,
    Celebrate,
}

/// Play-by-play entry with the game context at the moment it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub quarter: u8,
    pub clock: u32,
    pub possession: Side,
    /// Preformatted context line, e.g. `Q1 04:32 • Chiefs ball`.
    pub meta: String,
    pub text: String,
}

/// Short-lived headline for the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub title: String,
    pub subtitle: String,
    pub tone: Tone,
}

/// Numeric view of the full game state after a resolution step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: Score,
    pub quarter: u8,
    pub quarter_label: String,
    pub clock: u32,
    pub clock_label: String,
    pub possession: Side,
    pub down: u8,
    pub to_go: i32,
    pub ball_on: i32,
    pub chain_spot: i32,
    pub field_label: String,
    pub situation: String,
    pub expecting_chaos: bool,
    pub status: GameStatus,
}

impl Scoreboard {
    #[must_use]
    pub fn capture(state: &GameState, teams: &TeamNames) -> Self {
        Self {
            score: state.score,
            quarter: state.quarter,
            quarter_label: quarter_label(state.quarter),
            clock: state.clock,
            clock_label: format_clock(state.clock),
            possession: state.possession,
            down: state.down,
            to_go: state.to_go,
            ball_on: state.ball_on,
            chain_spot: state.chain_spot(),
            field_label: state.field_label(teams),
            situation: state.situation_line(teams),
            expecting_chaos: state.expecting_chaos,
            status: state.status,
        }
    }
}

/// Event emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEvent {
    Log(LogEntry),
    Banner(Banner),
    Snapshot(Scoreboard),
}

/// Events from a single resolution step; most steps emit a handful.
pub type EventList = SmallVec<[EngineEvent; 6]>;

/// Collects events against the state they describe.
#[derive(Debug)]
pub(crate) struct EventSink<'a> {
    teams: &'a TeamNames,
    events: EventList,
}

impl<'a> EventSink<'a> {
    pub(crate) fn new(teams: &'a TeamNames) -> Self {
        Self {
            teams,
            events: EventList::new(),
        }
    }

    pub(crate) const fn teams(&self) -> &'a TeamNames {
        self.teams
    }

    pub(crate) fn log(&mut self, state: &GameState, text: impl Into<String>) {
        let text = text.into();
        log::debug!("play-by-play: {text}");
        self.events.push(EngineEvent::Log(LogEntry {
            quarter: state.quarter,
            clock: state.clock,
            possession: state.possession,
            meta: state.meta_line(self.teams),
            text,
        }));
    }

    pub(crate) fn banner(
        &mut self,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        tone: Tone,
    ) {
        self.events.push(EngineEvent::Banner(Banner {
            title: title.into(),
            subtitle: subtitle.into(),
            tone,
        }));
    }

    pub(crate) fn snapshot(&mut self, state: &GameState) {
        self.events
            .push(EngineEvent::Snapshot(Scoreboard::capture(state, self.teams)));
    }

    pub(crate) fn finish(self) -> EventList {
        self.events
    }
}
