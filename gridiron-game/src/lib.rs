//! Gridiron Dice Engine
//!
//! Platform-agnostic play-resolution rules for an arcade dice football game.
//! Physical dice are rolled outside the program; this crate validates the
//! entered values, resolves plays, and emits structured events without any
//! UI or platform-specific dependencies.

pub mod chaos;
pub mod config;
pub(crate) mod constants;
pub mod cpu;
pub mod dice;
pub mod engine;
pub mod event;
pub mod rng;
pub mod session;
pub mod special_teams;
pub mod state;

// Re-export commonly used types
pub use chaos::{ChaosOutcome, ChaosTrigger, Penalty, should_trigger, trigger_reason};
pub use config::{ConfigError, PenaltyWeights, PuntRange, RulesConfig, SessionConfig, TeamNames};
pub use cpu::choose_play_call;
pub use dice::{
    DiceBag, DiceContext, DiceError, DiceRoll, GainTier, PlayFace, ValidDice, read_die,
    validate_dice,
};
pub use engine::{PlayEngine, PlayKind, PlaySummary, ResolutionOutcome, ResolveError};
pub use event::{Banner, EngineEvent, EventList, LogEntry, Scoreboard, Tone};
pub use rng::{CountingRng, RngBundle};
pub use session::{GameSession, SelectionError};
pub use special_teams::{kick_distance, needed_roll, punt_landing};
pub use state::{
    GameResult, GameState, GameStatus, Outcome, PlayCall, PossessionChange, QuarterChange, Score,
    Side, Verdict,
};
