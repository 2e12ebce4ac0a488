//! Centralized rule tables and tuning constants for the Gridiron Dice ruleset.
//!
//! These values define the deterministic math for play resolution. Keeping
//! them together means the cartoon ruleset can only be adjusted via reviewed
//! code changes; the few knobs exposed to configuration default to these.

// Field geometry -----------------------------------------------------------
pub(crate) const FIELD_MIN: i32 = 0;
pub(crate) const FIELD_MAX: i32 = 100;
pub(crate) const MIDFIELD: i32 = 50;
/// Distance from a team's own goal line where a new possession starts.
pub(crate) const KICKOFF_SPOT: i32 = 25;
/// Distance from a team's own goal line where a punt touchback is placed.
pub(crate) const TOUCHBACK_SPOT: i32 = 20;
/// Punts landing this close to the receiving goal line become touchbacks.
pub(crate) const TOUCHBACK_ZONE: i32 = 5;
pub(crate) const GOAL_LINE_DANGER: i32 = 5;

// Down chain ---------------------------------------------------------------
pub(crate) const FIRST_DOWN_DISTANCE: i32 = 10;
pub(crate) const MAX_DOWN: u8 = 4;
pub(crate) const TO_GO_MIN: i32 = 1;
pub(crate) const TO_GO_MAX: i32 = 99;

// Clock --------------------------------------------------------------------
pub(crate) const QUARTER_SECONDS: u32 = 5 * 60;
pub(crate) const MAX_CLOCK_SECONDS: u32 = 15 * 60;
pub(crate) const FINAL_QUARTER: u8 = 4;
pub(crate) const LATE_HALF_SECONDS: u32 = 120;
pub(crate) const TRAILING_LATE_SECONDS: u32 = 180;

// Normal-play yardage ------------------------------------------------------
pub(crate) const SACK_LOSS: i32 = 6;
pub(crate) const SHORT_GAIN_BASE: i32 = 3;
pub(crate) const SHORT_GAIN_DIVISOR: i32 = 5;
pub(crate) const MEDIUM_GAIN_BASE: i32 = 10;
pub(crate) const MEDIUM_GAIN_DIVISOR: i32 = 2;
pub(crate) const BIG_GAIN_BASE: i32 = 20;
pub(crate) const BREAKAWAY_D20: u8 = 20;

// Clock runoff per play (seconds) -------------------------------------------
pub(crate) const RUNOFF_TOUCHDOWN: u32 = 10;
pub(crate) const RUNOFF_PUNT: u32 = 12;
pub(crate) const RUNOFF_FIELD_GOAL: u32 = 10;
pub(crate) const RUNOFF_SACK: u32 = 28;
pub(crate) const RUNOFF_STUFFED: u32 = 25;
pub(crate) const RUNOFF_SHORT_GAIN: u32 = 24;
pub(crate) const RUNOFF_MEDIUM_GAIN: u32 = 20;
pub(crate) const RUNOFF_BIG_GAIN: u32 = 16;

// Scoring ------------------------------------------------------------------
pub(crate) const TOUCHDOWN_POINTS: u32 = 6;
pub(crate) const EXTRA_POINT: u32 = 1;
pub(crate) const FIELD_GOAL_POINTS: u32 = 3;

// Chaos --------------------------------------------------------------------
pub(crate) const RUNOFF_CHAOS_NEAR_MISS: u32 = 8;
pub(crate) const RUNOFF_CHAOS_STANDARD: u32 = 10;
pub(crate) const RUNOFF_CHAOS_DEF_MISTAKE: u32 = 8;
pub(crate) const RUNOFF_CHAOS_BAILOUT: u32 = 6;
pub(crate) const DEF_MISTAKE_BONUS: i32 = 6;
pub(crate) const ABSOLUTE_CHAOS_BAILOUT: i32 = 12;
pub(crate) const DEFENSIVE_PENALTY_PASS_YARDS: i32 = 15;
pub(crate) const DEFENSIVE_PENALTY_RUN_YARDS: i32 = 5;
pub(crate) const OFFENSIVE_PENALTY_SHORT: i32 = 5;
pub(crate) const OFFENSIVE_PENALTY_LONG: i32 = 10;
pub(crate) const DEFENSIVE_PENALTY_PASS_CHANCE: f64 = 0.45;
pub(crate) const DEFENSIVE_PENALTY_RUN_CHANCE: f64 = 0.25;
pub(crate) const OFFENSIVE_PENALTY_SHORT_CHANCE: f64 = 0.35;

// Special teams ------------------------------------------------------------
pub(crate) const PUNT_NET_MIN: i32 = 38;
pub(crate) const PUNT_NET_MAX: i32 = 47;
/// Snap, hold and end zone depth added to the distance to the goal line.
pub(crate) const FIELD_GOAL_ALLOWANCE: i32 = 17;
/// Stepped difficulty ladder: `(max kick distance, needed d20)`.
pub(crate) const FIELD_GOAL_LADDER: [(i32, u8); 4] = [(33, 4), (40, 7), (47, 11), (54, 15)];
pub(crate) const FIELD_GOAL_MAX_NEEDED: u8 = 18;

// CPU play-caller ----------------------------------------------------------
pub(crate) const CPU_FG_RANGE: i32 = 35;
pub(crate) const CPU_DEEP_TERRITORY: i32 = 75;
pub(crate) const CPU_GO_FOR_IT_TO_GO: i32 = 3;
pub(crate) const CPU_RUN_CHANCE: f64 = 0.48;

// Dice faces ---------------------------------------------------------------
pub(crate) const D6_FACES: u8 = 6;
pub(crate) const D10_FACES: u8 = 10;
pub(crate) const D20_FACES: u8 = 20;
