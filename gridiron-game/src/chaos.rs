//! Chaos: the secondary sub-resolution that can follow a sack.
//!
//! A chaos-eligible sack is resolved in two calls. The first applies the sack
//! yardage and parks the engine; the second consumes a d20 and applies the
//! outcome below together with the deferred down and clock update.
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::config::PenaltyWeights;
use crate::constants::{
    ABSOLUTE_CHAOS_BAILOUT, DEF_MISTAKE_BONUS, DEFENSIVE_PENALTY_PASS_YARDS,
    DEFENSIVE_PENALTY_RUN_YARDS, FINAL_QUARTER, LATE_HALF_SECONDS, MAX_DOWN,
    OFFENSIVE_PENALTY_LONG, OFFENSIVE_PENALTY_SHORT, RUNOFF_CHAOS_BAILOUT,
    RUNOFF_CHAOS_DEF_MISTAKE, RUNOFF_CHAOS_NEAR_MISS, RUNOFF_CHAOS_STANDARD, SACK_LOSS,
    TRAILING_LATE_SECONDS,
};
use crate::engine::{PlayKind, PlaySummary, finish_touchdown, turnover_on_downs_if_needed};
use crate::event::{EventSink, Tone};
use crate::state::{GameState, PlayCall, PossessionChange};

/// Why a sack became chaos-eligible. Reported in priority order for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChaosTrigger {
    OwnTerritory,
    GoalLineDanger,
    BackToBackSack,
    LateHalf,
    TrailingLate,
    FourthDownGamble,
}

/// Evaluate the chaos predicate against the state before the sack is applied.
///
/// Pure: the same state and call always give the same answer.
#[must_use]
pub fn trigger_reason(state: &GameState, call: PlayCall) -> Option<ChaosTrigger> {
    if state.is_own_territory() {
        return Some(ChaosTrigger::OwnTerritory);
    }
    if state.is_goal_line_danger() {
        return Some(ChaosTrigger::GoalLineDanger);
    }
    if state.last_play_was_sack {
        return Some(ChaosTrigger::BackToBackSack);
    }
    if is_late_half(state) {
        return Some(ChaosTrigger::LateHalf);
    }
    if is_trailing_late(state) {
        return Some(ChaosTrigger::TrailingLate);
    }
    if state.down == MAX_DOWN && !call.is_special_teams() {
        return Some(ChaosTrigger::FourthDownGamble);
    }
    None
}

#[must_use]
pub fn should_trigger(state: &GameState, call: PlayCall) -> bool {
    trigger_reason(state, call).is_some()
}

fn is_late_half(state: &GameState) -> bool {
    state.clock <= LATE_HALF_SECONDS && (state.quarter == 2 || state.quarter == FINAL_QUARTER)
}

fn is_trailing_late(state: &GameState) -> bool {
    if state.quarter != FINAL_QUARTER || state.clock > TRAILING_LATE_SECONDS {
        return false;
    }
    state.score.get(state.possession) < state.score.get(state.defense())
}

/// Chaos table keyed by the d20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChaosOutcome {
    Turnover,
    NearMiss,
    Penalty,
    HardHit,
    Clean,
    MomentumSwing,
    DefensiveMistake,
    AbsoluteChaos,
}

impl ChaosOutcome {
    #[must_use]
    pub const fn from_d20(d20: u8) -> Self {
        match d20 {
            0 | 1 => Self::Turnover,
            2..=3 => Self::NearMiss,
            4..=5 => Self::Penalty,
            6..=8 => Self::HardHit,
            9..=15 => Self::Clean,
            16..=18 => Self::MomentumSwing,
            19 => Self::DefensiveMistake,
            _ => Self::AbsoluteChaos,
        }
    }

    #[must_use]
    pub const fn flavor(self) -> &'static str {
        match self {
            Self::Turnover => "Turnover! Ball pops loose.",
            Self::NearMiss => "Near turnover, offense barely recovers.",
            Self::Penalty => "Penalty swings it.",
            Self::HardHit => "No chaos, just a hard hit.",
            Self::Clean => "Clean play, no extra effect.",
            Self::MomentumSwing => "Momentum swing, crowd goes nuts.",
            Self::DefensiveMistake => "Defensive mistake, bonus for offense.",
            Self::AbsoluteChaos => "ABSOLUTE CHAOS, huge swing!",
        }
    }
}

/// Result of the penalty sub-event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "side", content = "yards", rename_all = "snake_case")]
pub enum Penalty {
    /// Offense gains yards and an automatic first down.
    Defensive(i32),
    /// Offense loses yards and replays the down.
    Offensive(i32),
}

/// Draw the penalty type and magnitude for the pending call.
pub fn roll_penalty<R: RngCore>(call: PlayCall, weights: &PenaltyWeights, rng: &mut R) -> Penalty {
    let is_pass = matches!(call, PlayCall::Pass);
    let defensive_chance = if is_pass {
        weights.defensive_pass_chance
    } else {
        weights.defensive_run_chance
    };
    if rng.gen_bool(defensive_chance.clamp(0.0, 1.0)) {
        let yards = if is_pass {
            DEFENSIVE_PENALTY_PASS_YARDS
        } else {
            DEFENSIVE_PENALTY_RUN_YARDS
        };
        return Penalty::Defensive(yards);
    }
    if rng.gen_bool(weights.offensive_short_chance.clamp(0.0, 1.0)) {
        Penalty::Offensive(OFFENSIVE_PENALTY_SHORT)
    } else {
        Penalty::Offensive(OFFENSIVE_PENALTY_LONG)
    }
}

/// A roll of 20 is split evenly between a turnover and a bailout by the parity of a coin draw.
///
/// Parity comes from the penalty stream, not the die: the d20 is always 20 here.
fn absolute_chaos_is_turnover<R: RngCore>(rng: &mut R) -> bool {
    let draw = rng.next_u32();
    log::trace!("absolute chaos draw {draw}");
    draw % 2 == 0
}

/// Apply the deferred sack down update: the full sack loss is added to the distance.
fn post_sack_update(state: &mut GameState) {
    state.set_to_go(state.to_go + SACK_LOSS);
    state.advance_down();
}

/// Resolve the awaited chaos die against a state parked after a sack.
pub(crate) fn resolve_chaos<R: RngCore>(
    state: &mut GameState,
    d20: u8,
    weights: &PenaltyWeights,
    rng: &mut R,
    sink: &mut EventSink<'_>,
) -> PlaySummary {
    let outcome = ChaosOutcome::from_d20(d20);
    let call = state.pending_play_call.unwrap_or(PlayCall::Run);
    let offense = state.possession;
    let offense_name = sink.teams().name(offense).to_string();
    let defense_name = sink.teams().name(state.defense()).to_string();
    let mut summary = PlaySummary::new(PlayKind::Chaos(outcome), offense);
    state.expecting_chaos = false;
    log::debug!("chaos d20={d20} -> {outcome:?}");

    match outcome {
        ChaosOutcome::Turnover => {
            sink.log(
                state,
                format!("CHAOS (D20={d20}): {} {defense_name} take over!", outcome.flavor()),
            );
            sink.banner("TURNOVER!", outcome.flavor(), Tone::Shake);
            state.switch_possession(PossessionChange::Turnover);
            summary.possession_change = Some(PossessionChange::Turnover);
        }
        ChaosOutcome::NearMiss => {
            sink.log(state, format!("CHAOS (D20={d20}): {}", outcome.flavor()));
            sink.banner("NEAR TURNOVER", outcome.flavor(), Tone::Shake);
            post_sack_update(state);
            summary.runoff = RUNOFF_CHAOS_NEAR_MISS;
        }
        ChaosOutcome::Penalty => {
            summary.runoff = RUNOFF_CHAOS_STANDARD;
            match roll_penalty(call, weights, rng) {
                Penalty::Defensive(yards) => {
                    summary.yards = state.move_ball(yards);
                    sink.log(
                        state,
                        format!(
                            "CHAOS (D20={d20}): Defensive penalty, {offense_name} +{} and a first down.",
                            summary.yards
                        ),
                    );
                    sink.banner("PENALTY!", format!("On the defense (+{yards})."), Tone::Normal);
                    if state.is_in_end_zone() {
                        touchdown_from_chaos(state, sink, &mut summary, &offense_name);
                    } else {
                        state.first_down();
                        summary.first_down = true;
                    }
                }
                Penalty::Offensive(yards) => {
                    summary.yards = state.move_ball(-yards);
                    state.set_to_go(state.to_go + SACK_LOSS - summary.yards);
                    sink.log(
                        state,
                        format!(
                            "CHAOS (D20={d20}): Offensive penalty, {offense_name} {} yards. Replay the down.",
                            summary.yards
                        ),
                    );
                    sink.banner("PENALTY!", format!("On the offense (-{yards})."), Tone::Shake);
                }
            }
        }
        ChaosOutcome::HardHit | ChaosOutcome::Clean | ChaosOutcome::MomentumSwing => {
            sink.log(state, format!("CHAOS (D20={d20}): {}", outcome.flavor()));
            let tone = if outcome == ChaosOutcome::HardHit {
                Tone::Shake
            } else {
                Tone::Normal
            };
            sink.banner("CHAOS", outcome.flavor(), tone);
            post_sack_update(state);
            summary.runoff = RUNOFF_CHAOS_STANDARD;
        }
        ChaosOutcome::DefensiveMistake => {
            summary.yards = state.move_ball(DEF_MISTAKE_BONUS);
            summary.runoff = RUNOFF_CHAOS_DEF_MISTAKE;
            sink.log(
                state,
                format!(
                    "CHAOS (D20={d20}): {} Offense gets +{}.",
                    outcome.flavor(),
                    summary.yards
                ),
            );
            sink.banner(
                "DEFENSE BLOWS IT",
                format!("{} (+{})", outcome.flavor(), summary.yards),
                Tone::Normal,
            );
            offset_sack(state, sink, &mut summary, &offense_name);
        }
        ChaosOutcome::AbsoluteChaos => {
            if absolute_chaos_is_turnover(rng) {
                sink.log(
                    state,
                    format!("CHAOS (D20={d20}): {} TURNOVER!", outcome.flavor()),
                );
                sink.banner(
                    "ABSOLUTE CHAOS!",
                    "Turnover eruption. Defense takes it.",
                    Tone::Shake,
                );
                state.switch_possession(PossessionChange::Turnover);
                summary.possession_change = Some(PossessionChange::Turnover);
            } else {
                summary.yards = state.move_ball(ABSOLUTE_CHAOS_BAILOUT);
                summary.runoff = RUNOFF_CHAOS_BAILOUT;
                sink.log(
                    state,
                    format!(
                        "CHAOS (D20={d20}): {} {offense_name} bail out (+{}).",
                        outcome.flavor(),
                        summary.yards
                    ),
                );
                sink.banner(
                    "ABSOLUTE CHAOS!",
                    format!("Offense escapes with +{}!", summary.yards),
                    Tone::Celebrate,
                );
                offset_sack(state, sink, &mut summary, &offense_name);
            }
        }
    }

    if summary.possession_change.is_none() {
        turnover_on_downs_if_needed(state, sink, &mut summary);
    }
    summary
}

/// Forward chaos movement partially erases the sack; reaching the goal line scores.
fn offset_sack(
    state: &mut GameState,
    sink: &mut EventSink<'_>,
    summary: &mut PlaySummary,
    offense_name: &str,
) {
    if state.is_in_end_zone() {
        touchdown_from_chaos(state, sink, summary, offense_name);
        return;
    }
    state.set_to_go(state.to_go + SACK_LOSS - summary.yards);
    state.advance_down();
}

fn touchdown_from_chaos(
    state: &mut GameState,
    sink: &mut EventSink<'_>,
    summary: &mut PlaySummary,
    offense_name: &str,
) {
    sink.log(state, format!("{offense_name} turn the chaos into a TOUCHDOWN!"));
    sink.banner("TOUCHDOWN!", "Chaos pays off!", Tone::Celebrate);
    finish_touchdown(state, summary);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TeamNames;
    use crate::state::{Score, Side};

    struct StubRng {
        value: u32,
        calls: u32,
    }

    impl StubRng {
        fn new(value: u32) -> Self {
            Self { value, calls: 0 }
        }
    }

    impl RngCore for StubRng {
        fn next_u32(&mut self) -> u32 {
            self.calls = self.calls.saturating_add(1);
            self.value
        }

        fn next_u64(&mut self) -> u64 {
            self.calls = self.calls.saturating_add(1);
            u64::from(self.value) << 32
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let value = self.next_u32().to_le_bytes();
            for (idx, byte) in dest.iter_mut().enumerate() {
                *byte = value[idx % value.len()];
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    /// State parked after a sack from the home 30 (now at the 24).
    fn parked(call: PlayCall) -> GameState {
        GameState {
            ball_on: 24,
            down: 1,
            to_go: 10,
            last_play_was_sack: true,
            expecting_chaos: true,
            pending_play_call: Some(call),
            ..GameState::default()
        }
    }

    fn midfield() -> GameState {
        GameState {
            ball_on: 50,
            ..GameState::default()
        }
    }

    #[test]
    fn midfield_first_down_is_not_eligible() {
        assert!(!should_trigger(&midfield(), PlayCall::Pass));
    }

    #[test]
    fn each_trigger_fires_independently() {
        let own = GameState {
            ball_on: 20,
            ..GameState::default()
        };
        assert_eq!(
            trigger_reason(&own, PlayCall::Run),
            Some(ChaosTrigger::OwnTerritory)
        );

        let repeat = GameState {
            last_play_was_sack: true,
            ..midfield()
        };
        assert_eq!(
            trigger_reason(&repeat, PlayCall::Run),
            Some(ChaosTrigger::BackToBackSack)
        );

        let late = GameState {
            quarter: 2,
            clock: 120,
            ..midfield()
        };
        assert_eq!(
            trigger_reason(&late, PlayCall::Run),
            Some(ChaosTrigger::LateHalf)
        );
        let not_late = GameState {
            quarter: 3,
            clock: 60,
            ..midfield()
        };
        assert_eq!(trigger_reason(&not_late, PlayCall::Run), None);

        let trailing = GameState {
            quarter: 4,
            clock: 170,
            score: Score { home: 0, away: 7 },
            ..midfield()
        };
        assert_eq!(
            trigger_reason(&trailing, PlayCall::Run),
            Some(ChaosTrigger::TrailingLate)
        );

        let fourth = GameState {
            down: 4,
            ..midfield()
        };
        assert_eq!(
            trigger_reason(&fourth, PlayCall::Pass),
            Some(ChaosTrigger::FourthDownGamble)
        );
        assert_eq!(trigger_reason(&fourth, PlayCall::Punt), None);
    }

    #[test]
    fn goal_line_danger_is_reported_for_backed_up_away_offense() {
        let state = GameState {
            ball_on: 97,
            possession: Side::Away,
            ..GameState::default()
        };
        // Own territory covers the goal line too; the predicate only needs one reason.
        assert!(should_trigger(&state, PlayCall::Run));
    }

    #[test]
    fn predicate_is_deterministic() {
        let state = GameState {
            ball_on: 45,
            down: 3,
            ..GameState::default()
        };
        let first = trigger_reason(&state, PlayCall::Pass);
        for _ in 0..10 {
            assert_eq!(trigger_reason(&state, PlayCall::Pass), first);
        }
    }

    #[test]
    fn outcome_table_covers_all_faces() {
        assert_eq!(ChaosOutcome::from_d20(1), ChaosOutcome::Turnover);
        assert_eq!(ChaosOutcome::from_d20(3), ChaosOutcome::NearMiss);
        assert_eq!(ChaosOutcome::from_d20(4), ChaosOutcome::Penalty);
        assert_eq!(ChaosOutcome::from_d20(8), ChaosOutcome::HardHit);
        assert_eq!(ChaosOutcome::from_d20(9), ChaosOutcome::Clean);
        assert_eq!(ChaosOutcome::from_d20(15), ChaosOutcome::Clean);
        assert_eq!(ChaosOutcome::from_d20(18), ChaosOutcome::MomentumSwing);
        assert_eq!(ChaosOutcome::from_d20(19), ChaosOutcome::DefensiveMistake);
        assert_eq!(ChaosOutcome::from_d20(20), ChaosOutcome::AbsoluteChaos);
    }

    #[test]
    fn turnover_flips_possession_without_runoff() {
        let teams = TeamNames::default();
        let mut sink = EventSink::new(&teams);
        let mut state = parked(PlayCall::Run);
        let mut rng = StubRng::new(0);
        let summary = resolve_chaos(&mut state, 1, &PenaltyWeights::default(), &mut rng, &mut sink);
        assert_eq!(state.possession, Side::Away);
        assert_eq!(state.ball_on, 75);
        assert!(!state.expecting_chaos);
        assert!(state.last_was_turnover);
        assert_eq!(summary.runoff, 0);
        assert_eq!(rng.calls, 0);
    }

    #[test]
    fn clean_band_applies_standard_sack_update() {
        let teams = TeamNames::default();
        let mut sink = EventSink::new(&teams);
        let mut state = parked(PlayCall::Pass);
        let mut rng = StubRng::new(0);
        let summary = resolve_chaos(&mut state, 12, &PenaltyWeights::default(), &mut rng, &mut sink);
        assert_eq!((state.down, state.to_go), (2, 16));
        assert_eq!(state.ball_on, 24);
        assert_eq!(summary.runoff, 10);
        assert!(state.pending_play_call.is_some());
    }

    #[test]
    fn near_miss_runs_eight_seconds() {
        let teams = TeamNames::default();
        let mut sink = EventSink::new(&teams);
        let mut state = parked(PlayCall::Run);
        let summary = resolve_chaos(
            &mut state,
            2,
            &PenaltyWeights::default(),
            &mut StubRng::new(0),
            &mut sink,
        );
        assert_eq!((state.down, state.to_go), (2, 16));
        assert_eq!(summary.runoff, 8);
    }

    #[test]
    fn defensive_mistake_offsets_sack() {
        let teams = TeamNames::default();
        let mut sink = EventSink::new(&teams);
        let mut state = parked(PlayCall::Run);
        let summary = resolve_chaos(
            &mut state,
            19,
            &PenaltyWeights::default(),
            &mut StubRng::new(0),
            &mut sink,
        );
        assert_eq!(state.ball_on, 30);
        assert_eq!((state.down, state.to_go), (2, 10));
        assert_eq!(summary.runoff, 8);
    }

    #[test]
    fn absolute_chaos_bailout_on_odd_coin() {
        let teams = TeamNames::default();
        let mut sink = EventSink::new(&teams);
        let mut state = parked(PlayCall::Pass);
        let summary = resolve_chaos(
            &mut state,
            20,
            &PenaltyWeights::default(),
            &mut StubRng::new(1),
            &mut sink,
        );
        assert_eq!(state.possession, Side::Home);
        assert_eq!(state.ball_on, 36);
        assert_eq!((state.down, state.to_go), (2, 4));
        assert_eq!(summary.runoff, 6);
    }

    #[test]
    fn absolute_chaos_turnover_on_even_coin() {
        let teams = TeamNames::default();
        let mut sink = EventSink::new(&teams);
        let mut state = parked(PlayCall::Pass);
        resolve_chaos(
            &mut state,
            20,
            &PenaltyWeights::default(),
            &mut StubRng::new(2),
            &mut sink,
        );
        assert_eq!(state.possession, Side::Away);
        assert!(state.last_was_turnover);
    }

    #[test]
    fn chaos_on_fourth_down_can_turn_it_over_on_downs() {
        let teams = TeamNames::default();
        let mut sink = EventSink::new(&teams);
        let mut state = GameState {
            down: 4,
            ..parked(PlayCall::Pass)
        };
        let summary = resolve_chaos(
            &mut state,
            10,
            &PenaltyWeights::default(),
            &mut StubRng::new(0),
            &mut sink,
        );
        assert_eq!(state.possession, Side::Away);
        assert_eq!(
            summary.possession_change,
            Some(PossessionChange::TurnoverOnDowns)
        );
        assert_eq!(state.down, 1);
    }

    #[test]
    fn penalty_weights_follow_call() {
        let weights = PenaltyWeights::default();
        // A draw of zero lands under every nonzero probability.
        let mut low = StubRng::new(0);
        assert_eq!(
            roll_penalty(PlayCall::Pass, &weights, &mut low),
            Penalty::Defensive(15)
        );
        assert_eq!(
            roll_penalty(PlayCall::Run, &weights, &mut low),
            Penalty::Defensive(5)
        );
        // A maximal draw fails every probability below one.
        let mut high = StubRng::new(u32::MAX);
        assert_eq!(
            roll_penalty(PlayCall::Pass, &weights, &mut high),
            Penalty::Offensive(10)
        );
    }

    #[test]
    fn defensive_penalty_awards_first_down() {
        let teams = TeamNames::default();
        let mut sink = EventSink::new(&teams);
        let mut state = GameState {
            down: 3,
            to_go: 8,
            ..parked(PlayCall::Pass)
        };
        let summary = resolve_chaos(
            &mut state,
            5,
            &PenaltyWeights::default(),
            &mut StubRng::new(0),
            &mut sink,
        );
        assert_eq!(state.ball_on, 39);
        assert_eq!((state.down, state.to_go), (1, 10));
        assert!(summary.first_down);
        assert_eq!(summary.runoff, 10);
    }

    #[test]
    fn offensive_penalty_replays_the_down() {
        let teams = TeamNames::default();
        let mut sink = EventSink::new(&teams);
        let mut state = GameState {
            down: 2,
            to_go: 7,
            ..parked(PlayCall::Run)
        };
        resolve_chaos(
            &mut state,
            4,
            &PenaltyWeights::default(),
            &mut StubRng::new(u32::MAX),
            &mut sink,
        );
        assert_eq!(state.ball_on, 14);
        assert_eq!(state.down, 2);
        assert_eq!(state.to_go, 23);
    }
}
