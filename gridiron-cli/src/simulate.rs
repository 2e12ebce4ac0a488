use std::fmt;

use anyhow::{Result, bail};
use clap::ValueEnum;
use gridiron_game::{
    DiceBag, GameSession, GameState, PlayCall, PlayKind, SessionConfig, Verdict,
    choose_play_call,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

const MAX_STEPS_PER_GAME: usize = 10_000;

/// Built-in play-calling strategies for the human side in automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeStrategy {
    /// Run-heavy; punts or kicks on every fourth down.
    Conservative,
    /// Same tendencies as the CPU play-caller.
    Balanced,
    /// Pass-heavy; goes for it on fourth down outside chip-shot range.
    Aggressive,
}

impl HomeStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Balanced => "Balanced",
            Self::Aggressive => "Aggressive",
        }
    }

    pub fn pick<R: Rng>(self, state: &GameState, rng: &mut R) -> PlayCall {
        let fourth = state.down >= 4;
        let distance = state.distance_to_score();
        match self {
            Self::Balanced => choose_play_call(state, 0.48, rng),
            Self::Conservative if fourth => {
                if distance <= 35 {
                    PlayCall::FieldGoal
                } else {
                    PlayCall::Punt
                }
            }
            Self::Conservative => {
                if rng.gen_bool(0.7) {
                    PlayCall::Run
                } else {
                    PlayCall::Pass
                }
            }
            Self::Aggressive if fourth => {
                if distance <= 20 && state.to_go > 3 {
                    PlayCall::FieldGoal
                } else {
                    PlayCall::Pass
                }
            }
            Self::Aggressive => {
                if rng.gen_bool(0.3) {
                    PlayCall::Run
                } else {
                    PlayCall::Pass
                }
            }
        }
    }
}

impl fmt::Display for HomeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-game record from an automated run.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub seed: u64,
    pub iteration: usize,
    pub strategy: HomeStrategy,
    pub home_score: u32,
    pub away_score: u32,
    pub verdict: Verdict,
    pub steps: usize,
    pub touchdowns: u32,
    pub field_goals: u32,
    pub punts: u32,
    pub chaos_triggers: u32,
    pub turnovers: u32,
}

/// Aggregate metrics across every game of one strategy.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationAggregate {
    pub strategy: HomeStrategy,
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    pub win_pct: f64,
    pub mean_home_score: f64,
    pub mean_away_score: f64,
    pub mean_touchdowns: f64,
    pub mean_field_goals: f64,
    pub mean_chaos_triggers: f64,
    pub mean_turnovers: f64,
    pub mean_steps: f64,
}

/// Play one full game with auto-rolled dice and automated calls on both sides.
pub fn run_game(
    config: &SessionConfig,
    strategy: HomeStrategy,
    seed: u64,
    iteration: usize,
) -> Result<GameRecord> {
    let game_seed = seed.wrapping_add(iteration as u64);
    let mut session = GameSession::new(config.clone().with_seed(game_seed))?;
    let mut dice = DiceBag::from_seed(game_seed.rotate_left(17));
    let mut caller = ChaCha20Rng::seed_from_u64(game_seed);
    let human = config.human_side;
    let mut record = GameRecord {
        seed,
        iteration,
        strategy,
        home_score: 0,
        away_score: 0,
        verdict: Verdict::Tie,
        steps: 0,
        touchdowns: 0,
        field_goals: 0,
        punts: 0,
        chaos_triggers: 0,
        turnovers: 0,
    };

    while !session.state().is_final() {
        if record.steps >= MAX_STEPS_PER_GAME {
            bail!("seed {game_seed} did not finish within {MAX_STEPS_PER_GAME} steps");
        }
        let state = session.state();
        if session.is_human_turn() && !state.expecting_chaos && state.pending_play_call.is_none()
        {
            let call = strategy.pick(state, &mut caller);
            session.select_play_call(call)?;
        }
        let outcome = session.resolve(&dice.roll())?;
        record.steps += 1;

        let summary = outcome.summary;
        if summary.touchdown {
            record.touchdowns += 1;
        }
        if summary.chaos_pending {
            record.chaos_triggers += 1;
        }
        if summary.possession_change.is_some_and(|change| change.is_turnover()) {
            record.turnovers += 1;
        }
        match summary.kind {
            PlayKind::FieldGoal { made: true } => record.field_goals += 1,
            PlayKind::Punt => record.punts += 1,
            _ => {}
        }
    }

    let state = session.state();
    record.home_score = state.score.home;
    record.away_score = state.score.away;
    if let Some(result) = state.result() {
        record.verdict = result.verdict_for(human);
    }
    log::info!(
        "seed {game_seed} [{strategy}] final {}-{} ({})",
        record.home_score,
        record.away_score,
        record.verdict
    );
    Ok(record)
}

/// Run every seed and iteration for one strategy.
pub fn run_simulation(
    config: &SessionConfig,
    strategy: HomeStrategy,
    seeds: &[u64],
    iterations: usize,
) -> Result<Vec<GameRecord>> {
    let mut records = Vec::with_capacity(seeds.len() * iterations);
    for &seed in seeds {
        for iteration in 0..iterations {
            records.push(run_game(config, strategy, seed, iteration)?);
        }
    }
    Ok(records)
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

#[must_use]
pub fn aggregate(strategy: HomeStrategy, records: &[GameRecord]) -> SimulationAggregate {
    let games = records.len();
    let count = |verdict: Verdict| records.iter().filter(|r| r.verdict == verdict).count();
    let wins = count(Verdict::Win);
    #[allow(clippy::cast_precision_loss)]
    let win_pct = if games == 0 {
        0.0
    } else {
        wins as f64 / games as f64
    };
    #[allow(clippy::cast_precision_loss)]
    let mean_steps = mean(records.iter().map(|r| r.steps as f64), games);
    SimulationAggregate {
        strategy,
        games,
        wins,
        losses: count(Verdict::Loss),
        ties: count(Verdict::Tie),
        win_pct,
        mean_home_score: mean(records.iter().map(|r| f64::from(r.home_score)), games),
        mean_away_score: mean(records.iter().map(|r| f64::from(r.away_score)), games),
        mean_touchdowns: mean(records.iter().map(|r| f64::from(r.touchdowns)), games),
        mean_field_goals: mean(records.iter().map(|r| f64::from(r.field_goals)), games),
        mean_chaos_triggers: mean(records.iter().map(|r| f64::from(r.chaos_triggers)), games),
        mean_turnovers: mean(records.iter().map(|r| f64::from(r.turnovers)), games),
        mean_steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridiron_game::Side;

    #[test]
    fn strategies_differ_on_fourth_down() {
        let state = GameState {
            ball_on: 55,
            down: 4,
            to_go: 6,
            ..GameState::default()
        };
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert_eq!(HomeStrategy::Conservative.pick(&state, &mut rng), PlayCall::Punt);
        assert_eq!(HomeStrategy::Balanced.pick(&state, &mut rng), PlayCall::Punt);
        assert_eq!(HomeStrategy::Aggressive.pick(&state, &mut rng), PlayCall::Pass);
    }

    #[test]
    fn simulated_games_are_reproducible() {
        let config = SessionConfig::default();
        let first = run_game(&config, HomeStrategy::Balanced, 42, 0).unwrap();
        let second = run_game(&config, HomeStrategy::Balanced, 42, 0).unwrap();
        assert_eq!(first.home_score, second.home_score);
        assert_eq!(first.away_score, second.away_score);
        assert_eq!(first.steps, second.steps);
        assert!(first.steps > 0);
    }

    #[test]
    fn aggregate_counts_verdicts() {
        let config = SessionConfig::default();
        let records = run_simulation(&config, HomeStrategy::Aggressive, &[1, 2], 2).unwrap();
        assert_eq!(records.len(), 4);
        let agg = aggregate(HomeStrategy::Aggressive, &records);
        assert_eq!(agg.games, 4);
        assert_eq!(agg.wins + agg.losses + agg.ties, 4);
        assert!((0.0..=1.0).contains(&agg.win_pct));
    }

    #[test]
    fn verdict_follows_configured_human_side() {
        let config = SessionConfig {
            human_side: Side::Away,
            ..SessionConfig::default()
        };
        let record = run_game(&config, HomeStrategy::Balanced, 9, 0).unwrap();
        let expected = match record.away_score.cmp(&record.home_score) {
            std::cmp::Ordering::Greater => Verdict::Win,
            std::cmp::Ordering::Less => Verdict::Loss,
            std::cmp::Ordering::Equal => Verdict::Tie,
        };
        assert_eq!(record.verdict, expected);
    }

    #[test]
    fn empty_aggregate_is_zeroed() {
        let agg = aggregate(HomeStrategy::Balanced, &[]);
        assert_eq!(agg.games, 0);
        assert!(agg.win_pct.abs() < f64::EPSILON);
    }
}
