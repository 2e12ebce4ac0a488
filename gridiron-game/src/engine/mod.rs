//! Play resolution engine.
//!
//! Given a play call and validated dice, dispatches to the chaos resolver,
//! special teams, or the normal-play table, then runs the clock and rolls the
//! quarter over. Every resolution step returns its emitted events so the
//! caller can render them; nothing here touches a rendering surface.
mod normal;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chaos::{self, ChaosOutcome};
use crate::config::{RulesConfig, TeamNames};
use crate::cpu;
use crate::dice::{DiceContext, DiceError, DiceRoll, GainTier, ValidDice, validate_dice};
use crate::event::{EventList, EventSink, Scoreboard, Tone};
use crate::rng::RngBundle;
use crate::special_teams;
use crate::state::{
    GameResult, GameState, Outcome, PlayCall, PossessionChange, QuarterChange, Side,
};

pub use normal::{nominal_gain, runoff_for};

/// Rejection of a resolution request. The state is untouched when returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Dice(#[from] DiceError),
    #[error("pick a play: choose run, pass, punt or field goal first")]
    NoPlayCall,
    #[error("game over: start a new game")]
    GameOver,
}

/// What happened on a resolution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "play", content = "detail", rename_all = "snake_case")]
pub enum PlayKind {
    Touchdown,
    Sack,
    Stuffed,
    Gain(GainTier),
    Breakaway,
    Punt,
    FieldGoal { made: bool },
    Chaos(ChaosOutcome),
}

/// Mechanical summary of a resolution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaySummary {
    pub kind: PlayKind,
    pub offense: Side,
    /// Actual signed displacement from the offense's perspective.
    pub yards: i32,
    pub points: u32,
    /// Seconds taken off the clock by this step.
    pub runoff: u32,
    pub first_down: bool,
    pub touchdown: bool,
    /// The step parked the engine awaiting a chaos die.
    pub chaos_pending: bool,
    pub possession_change: Option<PossessionChange>,
}

impl PlaySummary {
    #[must_use]
    pub const fn new(kind: PlayKind, offense: Side) -> Self {
        Self {
            kind,
            offense,
            yards: 0,
            points: 0,
            runoff: 0,
            first_down: false,
            touchdown: false,
            chaos_pending: false,
            possession_change: None,
        }
    }
}

/// Everything a collaborator needs after one resolution step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionOutcome {
    pub summary: PlaySummary,
    pub events: EventList,
    pub scoreboard: Scoreboard,
    /// Present once the fourth quarter has expired.
    pub result: Option<GameResult>,
}

impl ResolutionOutcome {
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.result.is_some()
    }
}

/// Score six plus the automatic extra point, then kick off to the defense.
pub(crate) fn finish_touchdown(state: &mut GameState, summary: &mut PlaySummary) {
    let scorer = state.possession;
    state.score_touchdown();
    summary.points += crate::constants::TOUCHDOWN_POINTS + crate::constants::EXTRA_POINT;
    summary.touchdown = true;
    summary.first_down = false;
    log::info!(
        "{scorer} touchdown, score {}-{}",
        state.score.home,
        state.score.away
    );
    state.switch_possession(PossessionChange::Touchdown);
    summary.possession_change = Some(PossessionChange::Touchdown);
}

/// Flip possession when the series is exhausted. Returns `true` if it flipped.
pub(crate) fn turnover_on_downs_if_needed(
    state: &mut GameState,
    sink: &mut EventSink<'_>,
    summary: &mut PlaySummary,
) -> bool {
    if state.down <= crate::constants::MAX_DOWN {
        return false;
    }
    let offense_name = sink.teams().name(state.possession);
    sink.log(state, format!("{offense_name} turned it over on downs."));
    sink.banner("TURNOVER ON DOWNS", "Defense takes over.", Tone::Shake);
    log::info!("{} turnover on downs", state.possession);
    state.switch_possession(PossessionChange::TurnoverOnDowns);
    summary.possession_change = Some(PossessionChange::TurnoverOnDowns);
    summary.first_down = false;
    true
}

/// The orchestrator: owns the rules, team names and random streams, and
/// mutates a caller-owned [`GameState`].
#[derive(Debug, Clone)]
pub struct PlayEngine {
    rules: RulesConfig,
    teams: TeamNames,
    rng: RngBundle,
}

impl PlayEngine {
    #[must_use]
    pub fn new(rules: RulesConfig, teams: TeamNames, seed: u64) -> Self {
        Self::with_rng(rules, teams, RngBundle::from_user_seed(seed))
    }

    #[must_use]
    pub const fn with_rng(rules: RulesConfig, teams: TeamNames, rng: RngBundle) -> Self {
        Self { rules, teams, rng }
    }

    #[must_use]
    pub const fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    #[must_use]
    pub const fn teams(&self) -> &TeamNames {
        &self.teams
    }

    #[must_use]
    pub const fn rng(&self) -> &RngBundle {
        &self.rng
    }

    /// Draw the CPU play-caller's choice for the current state.
    pub fn suggest_cpu_call(&mut self, state: &GameState) -> PlayCall {
        cpu::choose_play_call(state, self.rules.cpu_run_chance, self.rng.cpu())
    }

    /// Resolve one step.
    ///
    /// While a chaos die is awaited, `call` and the d6/d10 channels are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Dice`] when the required dice are missing, or
    /// [`ResolveError::GameOver`] once the game is final; the state is left
    /// unchanged.
    pub fn resolve(
        &mut self,
        state: &mut GameState,
        call: PlayCall,
        roll: &DiceRoll,
    ) -> Result<ResolutionOutcome, ResolveError> {
        if state.is_final() {
            return Err(ResolveError::GameOver);
        }
        let ctx = DiceContext {
            expecting_chaos: state.expecting_chaos,
            play_call: Some(call),
        };
        let dice = validate_dice(roll, ctx)?;
        let mut sink = EventSink::new(&self.teams);

        let summary = match dice {
            ValidDice::Chaos { d20 } => {
                log::debug!("dispatch: chaos follow-up");
                chaos::resolve_chaos(state, d20, &self.rules.penalty, self.rng.penalty(), &mut sink)
            }
            ValidDice::Play { face, d20 } => {
                match call {
                    PlayCall::Punt => {
                        log::debug!("dispatch: punt");
                        special_teams::resolve_punt(
                            state,
                            self.rules.punt,
                            self.rng.special_teams(),
                            &mut sink,
                        )
                    }
                    PlayCall::FieldGoal => {
                        log::debug!("dispatch: field goal");
                        let Some(d20) = d20 else {
                            return Err(DiceError::MissingFieldGoalD20.into());
                        };
                        special_teams::resolve_field_goal(state, d20, &mut sink)
                    }
                    PlayCall::Run | PlayCall::Pass => {
                        log::debug!("dispatch: normal play d6={}", face.d6());
                        state.pending_play_call = Some(call);
                        normal::resolve_normal(
                            state,
                            call,
                            face,
                            d20,
                            self.rules.chaos_enabled,
                            self.rng.play(),
                            &mut sink,
                        )
                    }
                }
            }
        };

        if !state.expecting_chaos {
            state.pending_play_call = None;
        }
        state.run_clock(summary.runoff);
        if let Some(change) = state.advance_quarter_if_needed(self.rules.quarter_seconds) {
            announce_quarter_change(state, change, &mut sink);
        }
        sink.snapshot(state);

        Ok(ResolutionOutcome {
            summary,
            scoreboard: Scoreboard::capture(state, &self.teams),
            events: sink.finish(),
            result: state.result(),
        })
    }
}

fn announce_quarter_change(state: &GameState, change: QuarterChange, sink: &mut EventSink<'_>) {
    match change {
        QuarterChange::Started(quarter) => {
            log::info!("quarter {quarter} begins");
            sink.log(state, format!("End of quarter. Starting Q{quarter}."));
            sink.banner(
                format!("Q{quarter} START"),
                "Fresh quarter, fresh chaos.",
                Tone::Normal,
            );
        }
        QuarterChange::GameOver(result) => {
            let teams = sink.teams();
            let title = match result.outcome {
                Outcome::Tie => String::from("TIE GAME"),
                Outcome::HomeWin => format!("{} WIN", teams.home_name.to_uppercase()),
                Outcome::AwayWin => format!("{} WIN", teams.away_name.to_uppercase()),
            };
            let subtitle = format!(
                "Final: {} {} - {} {}",
                teams.home_name, result.score.home, teams.away_name, result.score.away
            );
            log::info!("game over: {subtitle}");
            sink.log(state, subtitle.clone());
            sink.banner(title, subtitle, Tone::Celebrate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EngineEvent;
    use crate::state::Score;

    fn engine() -> PlayEngine {
        PlayEngine::new(RulesConfig::default(), TeamNames::default(), 42)
    }

    #[test]
    fn rejected_dice_leave_state_untouched() {
        let mut engine = engine();
        let mut state = GameState::default();
        let before = state.clone();
        let err = engine
            .resolve(&mut state, PlayCall::Pass, &DiceRoll::d6(4))
            .unwrap_err();
        assert_eq!(err, ResolveError::Dice(DiceError::MissingD10));
        assert_eq!(state, before);

        let err = engine
            .resolve(&mut state, PlayCall::FieldGoal, &DiceRoll::d6(2))
            .unwrap_err();
        assert_eq!(err, ResolveError::Dice(DiceError::MissingFieldGoalD20));
        assert_eq!(state, before);
        assert_eq!(engine.rng().total_draws(), 0);
    }

    #[test]
    fn out_of_range_dice_never_resolve() {
        let mut engine = engine();
        let mut state = GameState::default();
        let before = state.clone();
        let err = engine
            .resolve(&mut state, PlayCall::Run, &DiceRoll::d6(42))
            .unwrap_err();
        assert_eq!(err, ResolveError::Dice(DiceError::MissingD6));
        let err = engine
            .resolve(&mut state, PlayCall::Pass, &DiceRoll::d6(5).with_d10(200))
            .unwrap_err();
        assert_eq!(err, ResolveError::Dice(DiceError::MissingD10));
        assert_eq!(state, before);
        assert_eq!(state.score, Score::default());
    }

    #[test]
    fn chaos_follow_up_ignores_call_and_d6() {
        let mut engine = engine();
        let mut state = GameState {
            ball_on: 20,
            ..GameState::default()
        };
        let first = engine
            .resolve(&mut state, PlayCall::Run, &DiceRoll::d6(1))
            .unwrap();
        assert!(first.summary.chaos_pending);
        assert_eq!(state.ball_on, 14);
        assert_eq!(state.clock, 300);
        assert_eq!(state.pending_play_call, Some(PlayCall::Run));

        let err = engine
            .resolve(&mut state, PlayCall::Punt, &DiceRoll::d6(6))
            .unwrap_err();
        assert_eq!(err, ResolveError::Dice(DiceError::MissingChaosD20));

        let second = engine
            .resolve(&mut state, PlayCall::Punt, &DiceRoll::d6(6).with_d20(12))
            .unwrap();
        assert_eq!(second.summary.kind, PlayKind::Chaos(ChaosOutcome::Clean));
        assert_eq!((state.down, state.to_go), (2, 16));
        assert_eq!(state.clock, 290);
        assert!(state.pending_play_call.is_none());
        assert!(!state.expecting_chaos);
    }

    #[test]
    fn quarter_rolls_over_when_clock_expires() {
        let mut engine = engine();
        let mut state = GameState {
            ball_on: 50,
            clock: 15,
            ..GameState::default()
        };
        let outcome = engine
            .resolve(&mut state, PlayCall::Run, &DiceRoll::d6(4).with_d10(4))
            .unwrap();
        assert_eq!(state.quarter, 2);
        assert_eq!(state.clock, 300);
        assert!(outcome.events.iter().any(|event| matches!(
            event,
            EngineEvent::Banner(banner) if banner.title == "Q2 START"
        )));
        assert!(!outcome.is_game_over());
    }

    #[test]
    fn final_whistle_reports_result() {
        let mut engine = engine();
        let mut state = GameState {
            ball_on: 50,
            quarter: 4,
            clock: 10,
            score: Score { home: 14, away: 3 },
            ..GameState::default()
        };
        let outcome = engine
            .resolve(&mut state, PlayCall::Pass, &DiceRoll::d6(3).with_d10(1))
            .unwrap();
        let result = outcome.result.expect("game should be over");
        assert_eq!(result.outcome, Outcome::HomeWin);
        assert!(state.is_final());
        assert!(outcome.events.iter().any(|event| matches!(
            event,
            EngineEvent::Banner(banner) if banner.title == "CHIEFS WIN"
        )));
        assert!(matches!(
            outcome.events.last(),
            Some(EngineEvent::Snapshot(_))
        ));
    }

    #[test]
    fn cpu_suggestion_draws_from_cpu_stream_only() {
        let mut engine = engine();
        let state = GameState {
            possession: Side::Away,
            ball_on: 75,
            ..GameState::default()
        };
        let call = engine.suggest_cpu_call(&state);
        assert!(matches!(call, PlayCall::Run | PlayCall::Pass));
        assert_eq!(engine.rng().total_draws(), 1);
    }
}
