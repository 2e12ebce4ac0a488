//! Field and clock model: the single aggregate mutated by play resolution.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::TeamNames;
use crate::constants::{
    EXTRA_POINT, FIELD_MAX, FIELD_MIN, FINAL_QUARTER, FIRST_DOWN_DISTANCE, GOAL_LINE_DANGER,
    KICKOFF_SPOT, MAX_CLOCK_SECONDS, MAX_DOWN, MIDFIELD, QUARTER_SECONDS, TOUCHDOWN_POINTS,
};

/// One of the two teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    #[default]
    Home,
    Away,
}

impl Side {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }

    /// Sign of forward movement on the absolute field: home drives toward 100.
    #[must_use]
    pub const fn direction(self) -> i32 {
        match self {
            Self::Home => 1,
            Self::Away => -1,
        }
    }

    /// Absolute spot of this side's own goal line.
    #[must_use]
    pub const fn own_goal_line(self) -> i32 {
        match self {
            Self::Home => FIELD_MIN,
            Self::Away => FIELD_MAX,
        }
    }

    /// Absolute spot `yards` away from this side's own goal line.
    #[must_use]
    pub const fn spot_from_own_goal(self, yards: i32) -> i32 {
        match self {
            Self::Home => yards,
            Self::Away => FIELD_MAX - yards,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "HOME",
            Self::Away => "AWAY",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Self::Home),
            "away" => Ok(Self::Away),
            _ => Err(()),
        }
    }
}

/// Play call selected for the upcoming resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayCall {
    #[serde(rename = "RUN")]
    Run,
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "PUNT")]
    Punt,
    #[serde(rename = "FG")]
    FieldGoal,
}

impl PlayCall {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Run => "RUN",
            Self::Pass => "PASS",
            Self::Punt => "PUNT",
            Self::FieldGoal => "FG",
        }
    }

    #[must_use]
    pub const fn is_special_teams(self) -> bool {
        matches!(self, Self::Punt | Self::FieldGoal)
    }
}

impl fmt::Display for PlayCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayCall {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "run" => Ok(Self::Run),
            "pass" => Ok(Self::Pass),
            "punt" => Ok(Self::Punt),
            "fg" | "field_goal" | "field-goal" => Ok(Self::FieldGoal),
            _ => Err(()),
        }
    }
}

/// Points on the board for both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    #[must_use]
    pub const fn get(self, side: Side) -> u32 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    pub fn add(&mut self, side: Side, points: u32) {
        let slot = match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        };
        *slot = slot.saturating_add(points);
    }
}

/// Final verdict once the fourth quarter expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Tie,
}

/// Result from one side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Win,
    Loss,
    Tie,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win => f.write_str("WIN"),
            Self::Loss => f.write_str("LOSS"),
            Self::Tie => f.write_str("TIE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub score: Score,
    pub outcome: Outcome,
}

impl GameResult {
    #[must_use]
    pub fn from_score(score: Score) -> Self {
        let outcome = match score.home.cmp(&score.away) {
            std::cmp::Ordering::Greater => Outcome::HomeWin,
            std::cmp::Ordering::Less => Outcome::AwayWin,
            std::cmp::Ordering::Equal => Outcome::Tie,
        };
        Self { score, outcome }
    }

    #[must_use]
    pub const fn verdict_for(&self, side: Side) -> Verdict {
        match (self.outcome, side) {
            (Outcome::Tie, _) => Verdict::Tie,
            (Outcome::HomeWin, Side::Home) | (Outcome::AwayWin, Side::Away) => Verdict::Win,
            _ => Verdict::Loss,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    InProgress,
    Final(GameResult),
}

/// Why possession is changing hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PossessionChange {
    Touchdown,
    FieldGoal,
    MissedFieldGoal,
    Punt,
    TurnoverOnDowns,
    Turnover,
}

impl PossessionChange {
    #[must_use]
    pub const fn is_turnover(self) -> bool {
        matches!(self, Self::TurnoverOnDowns | Self::Turnover)
    }
}

/// Canonical game state. Owned by a session and mutated only by play resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Absolute field position: 0 is the home goal line, 100 the away goal line.
    pub ball_on: i32,
    pub down: u8,
    pub to_go: i32,
    pub possession: Side,
    pub score: Score,
    pub quarter: u8,
    /// Seconds remaining in the quarter.
    pub clock: u32,
    pub last_play_was_sack: bool,
    pub expecting_chaos: bool,
    pub pending_play_call: Option<PlayCall>,
    #[serde(default)]
    pub last_was_turnover: bool,
    #[serde(default)]
    pub status: GameStatus,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_game(QUARTER_SECONDS)
    }
}

impl GameState {
    /// Fresh kickoff state: home ball at its own 25, first and ten.
    #[must_use]
    pub fn new_game(quarter_seconds: u32) -> Self {
        Self {
            ball_on: Side::Home.spot_from_own_goal(KICKOFF_SPOT),
            down: 1,
            to_go: FIRST_DOWN_DISTANCE,
            possession: Side::Home,
            score: Score::default(),
            quarter: 1,
            clock: quarter_seconds.min(MAX_CLOCK_SECONDS),
            last_play_was_sack: false,
            expecting_chaos: false,
            pending_play_call: None,
            last_was_turnover: false,
            status: GameStatus::InProgress,
        }
    }

    #[must_use]
    pub const fn defense(&self) -> Side {
        self.possession.opponent()
    }

    /// Yards between the ball and the goal line the offense attacks.
    #[must_use]
    pub const fn distance_to_score(&self) -> i32 {
        match self.possession {
            Side::Home => FIELD_MAX - self.ball_on,
            Side::Away => self.ball_on - FIELD_MIN,
        }
    }

    /// Yards between the ball and the offense's own goal line.
    #[must_use]
    pub const fn distance_from_own_goal(&self) -> i32 {
        FIELD_MAX - self.distance_to_score()
    }

    #[must_use]
    pub const fn is_own_territory(&self) -> bool {
        self.distance_from_own_goal() < MIDFIELD
    }

    #[must_use]
    pub const fn is_goal_line_danger(&self) -> bool {
        self.distance_from_own_goal() <= GOAL_LINE_DANGER
    }

    #[must_use]
    pub const fn is_in_end_zone(&self) -> bool {
        self.distance_to_score() <= 0
    }

    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self.status, GameStatus::Final(_))
    }

    #[must_use]
    pub const fn result(&self) -> Option<GameResult> {
        match self.status {
            GameStatus::Final(result) => Some(result),
            GameStatus::InProgress => None,
        }
    }

    /// Move the ball `yards` in the offense's driving direction, clamped to the field.
    ///
    /// Returns the actual signed displacement from the offense's perspective.
    pub fn move_ball(&mut self, yards: i32) -> i32 {
        let before = self.ball_on;
        let next = self.ball_on + self.possession.direction() * yards;
        self.ball_on = next.clamp(FIELD_MIN, FIELD_MAX);
        (self.ball_on - before) * self.possession.direction()
    }

    pub fn run_clock(&mut self, seconds: u32) {
        self.clock = self.clock.saturating_sub(seconds).min(MAX_CLOCK_SECONDS);
    }

    pub fn set_to_go(&mut self, to_go: i32) {
        self.to_go = to_go.clamp(crate::constants::TO_GO_MIN, crate::constants::TO_GO_MAX);
    }

    pub fn first_down(&mut self) {
        self.down = 1;
        self.to_go = FIRST_DOWN_DISTANCE;
    }

    /// Advance the down counter; returns `true` when the series is exhausted.
    pub fn advance_down(&mut self) -> bool {
        self.down = self.down.saturating_add(1);
        self.down > MAX_DOWN
    }

    /// Add six for the touchdown plus the automatic extra point.
    pub fn score_touchdown(&mut self) {
        self.score.add(self.possession, TOUCHDOWN_POINTS + EXTRA_POINT);
    }

    /// Hand the ball to the defense at its own 25 with a fresh series.
    pub fn switch_possession(&mut self, change: PossessionChange) {
        let receiver = self.defense();
        self.hand_over(change, receiver.spot_from_own_goal(KICKOFF_SPOT));
    }

    /// Hand the ball to the defense at an absolute spot with a fresh series.
    pub fn hand_over(&mut self, change: PossessionChange, spot: i32) {
        self.possession = self.defense();
        self.ball_on = spot.clamp(FIELD_MIN, FIELD_MAX);
        self.down = 1;
        self.to_go = FIRST_DOWN_DISTANCE;
        self.last_play_was_sack = false;
        self.expecting_chaos = false;
        self.pending_play_call = None;
        self.last_was_turnover = change.is_turnover();
    }

    /// Roll the quarter over when its clock has expired.
    ///
    /// Returns the new quarter number, or the final result once the last quarter ends.
    pub fn advance_quarter_if_needed(&mut self, quarter_seconds: u32) -> Option<QuarterChange> {
        if self.clock > 0 || self.is_final() {
            return None;
        }
        if self.quarter < FINAL_QUARTER {
            self.quarter += 1;
            self.clock = quarter_seconds.min(MAX_CLOCK_SECONDS);
            Some(QuarterChange::Started(self.quarter))
        } else {
            let result = GameResult::from_score(self.score);
            self.status = GameStatus::Final(result);
            Some(QuarterChange::GameOver(result))
        }
    }

    /// Absolute spot of the first-down marker.
    #[must_use]
    pub fn chain_spot(&self) -> i32 {
        (self.ball_on + self.possession.direction() * self.to_go).clamp(FIELD_MIN, FIELD_MAX)
    }

    /// Field position from the offense's perspective, e.g. `CHI 25`.
    #[must_use]
    pub fn field_label(&self, teams: &TeamNames) -> String {
        format!(
            "{} {}",
            teams.abbr(self.possession),
            self.distance_from_own_goal()
        )
    }

    /// Down and distance line, e.g. `1st & 10 @ CHI 25`.
    #[must_use]
    pub fn situation_line(&self, teams: &TeamNames) -> String {
        format!(
            "{} & {} @ {}",
            ordinal_down(self.down),
            self.to_go,
            self.field_label(teams)
        )
    }

    /// Quarter, clock and possession context used for play-by-play entries.
    #[must_use]
    pub fn meta_line(&self, teams: &TeamNames) -> String {
        format!(
            "{} {} • {} ball",
            quarter_label(self.quarter),
            format_clock(self.clock),
            teams.name(self.possession)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuarterChange {
    Started(u8),
    GameOver(GameResult),
}

#[must_use]
pub const fn ordinal_down(down: u8) -> &'static str {
    match down {
        1 => "1st",
        2 => "2nd",
        3 => "3rd",
        _ => "4th",
    }
}

#[must_use]
pub fn quarter_label(quarter: u8) -> String {
    format!("Q{quarter}")
}

/// Format seconds as `mm:ss`, clamped to the clock ceiling.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    let s = seconds.min(MAX_CLOCK_SECONDS);
    format!("{:02}:{:02}", s / 60, s % 60)
}
