//! The boundary the presentation layer talks to.
use thiserror::Error;

use crate::config::{ConfigError, SessionConfig};
use crate::dice::DiceRoll;
use crate::engine::{PlayEngine, ResolutionOutcome, ResolveError};
use crate::event::{Banner, EventList, EventSink, Scoreboard, Tone};
use crate::state::{GameState, PlayCall, Side};

/// Rejection of a play-call selection. The state is untouched when returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("not your turn: the {0} offense is calling plays")]
    NotYourTurn(Side),
    #[error("chaos triggered — enter D20 (1-20) before calling another play")]
    ChaosPending,
    #[error("game over: start a new game")]
    GameOver,
}

/// High-level session wrapper binding a play engine to an owned game state.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    state: GameState,
    engine: PlayEngine,
    cpu_hint: Option<PlayCall>,
}

impl Default for GameSession {
    fn default() -> Self {
        let config = SessionConfig::default();
        let state = GameState::new_game(config.rules.quarter_seconds);
        Self::from_state(config, state)
    }
}

impl GameSession {
    /// Construct a fresh session at kickoff.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration violates its invariants.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = GameState::new_game(config.rules.quarter_seconds);
        Ok(Self::from_state(config, state))
    }

    /// Build a session around an existing game state.
    #[must_use]
    pub fn from_state(config: SessionConfig, state: GameState) -> Self {
        let engine = PlayEngine::new(config.rules.clone(), config.teams.clone(), config.seed);
        Self {
            config,
            state,
            engine,
            cpu_hint: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    /// Consume the session, returning the underlying game state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn is_human_turn(&self) -> bool {
        self.state.possession == self.config.human_side
    }

    #[must_use]
    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard::capture(&self.state, &self.config.teams)
    }

    /// Set the pending call for the human side.
    ///
    /// # Errors
    ///
    /// Rejects the call when the game is over, when the CPU has the ball, or
    /// while a chaos die is awaited.
    pub fn select_play_call(&mut self, call: PlayCall) -> Result<Banner, SelectionError> {
        if self.state.is_final() {
            return Err(SelectionError::GameOver);
        }
        if !self.is_human_turn() {
            return Err(SelectionError::NotYourTurn(self.state.possession));
        }
        if self.state.expecting_chaos {
            return Err(SelectionError::ChaosPending);
        }
        self.state.pending_play_call = Some(call);
        let who = self.config.teams.name(self.state.possession);
        log::debug!("{who} select {call}");
        Ok(Banner {
            title: format!("{who} call: {call}"),
            subtitle: String::from("Type your dice rolls, then hit Resolve."),
            tone: Tone::Normal,
        })
    }

    /// The CPU's call for its upcoming snap, if it has the ball and nothing is pending.
    ///
    /// The suggestion is cached so the call resolved next is the one shown.
    pub fn cpu_hint(&mut self) -> Option<PlayCall> {
        if self.is_human_turn()
            || self.state.is_final()
            || self.state.expecting_chaos
            || self.state.pending_play_call.is_some()
        {
            return None;
        }
        if self.cpu_hint.is_none() {
            self.cpu_hint = Some(self.engine.suggest_cpu_call(&self.state));
        }
        self.cpu_hint
    }

    /// One-line prompt describing whose call it is.
    pub fn hint_line(&mut self) -> String {
        let human = self.config.teams.name(self.config.human_side).to_string();
        match self.cpu_hint() {
            Some(call) => format!(
                "CPU ({}) will call: {call}. You still enter the dice you rolled.",
                self.config.teams.name(self.config.cpu_side())
            ),
            None if self.state.expecting_chaos => {
                String::from("Chaos pending. Enter the D20 you rolled and resolve.")
            }
            None => format!("You are the {human}. Pick a play, then type your dice rolls."),
        }
    }

    /// Resolve the pending play with the entered dice.
    ///
    /// On the CPU's turn with nothing pending, the CPU's call is used.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when no call is available or dice are missing;
    /// the state is left unchanged.
    pub fn resolve(&mut self, roll: &DiceRoll) -> Result<ResolutionOutcome, ResolveError> {
        if self.state.is_final() {
            return Err(ResolveError::GameOver);
        }
        let call = match self.state.pending_play_call {
            Some(call) => call,
            None if self.state.expecting_chaos => PlayCall::Run,
            None if !self.is_human_turn() => match self.cpu_hint {
                Some(call) => call,
                None => {
                    let call = self.engine.suggest_cpu_call(&self.state);
                    self.cpu_hint = Some(call);
                    call
                }
            },
            None => return Err(ResolveError::NoPlayCall),
        };
        let outcome = self.engine.resolve(&mut self.state, call, roll)?;
        if !self.state.expecting_chaos {
            self.cpu_hint = None;
        }
        Ok(outcome)
    }

    /// Parse the three raw dice entries and resolve.
    ///
    /// # Errors
    ///
    /// See [`GameSession::resolve`].
    pub fn resolve_text(
        &mut self,
        d6: &str,
        d10: &str,
        d20: &str,
    ) -> Result<ResolutionOutcome, ResolveError> {
        self.resolve(&DiceRoll::parse(d6, d10, d20))
    }

    /// Reset to kickoff and announce it.
    pub fn new_game(&mut self) -> EventList {
        self.state = GameState::new_game(self.config.rules.quarter_seconds);
        self.cpu_hint = None;
        log::info!("new game");
        let mut sink = EventSink::new(&self.config.teams);
        let starter = self.config.teams.name(self.state.possession);
        sink.banner(
            "NEW GAME",
            format!("{starter} start with the ball at the 25."),
            Tone::Normal,
        );
        sink.snapshot(&self.state);
        sink.finish()
    }

    /// Opening banner and snapshot for a freshly constructed session.
    #[must_use]
    pub fn intro_events(&self) -> EventList {
        let mut sink = EventSink::new(&self.config.teams);
        let starter = self.config.teams.name(self.state.possession);
        sink.banner(
            "READY",
            format!("{starter} start on offense. Pick a play, type your dice, and resolve."),
            Tone::Normal,
        );
        sink.snapshot(&self.state);
        sink.finish()
    }
}
