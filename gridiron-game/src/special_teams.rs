//! Punts and field goals.
use rand::{Rng, RngCore};

use crate::config::PuntRange;
use crate::constants::{
    FIELD_GOAL_ALLOWANCE, FIELD_GOAL_LADDER, FIELD_GOAL_MAX_NEEDED, FIELD_GOAL_POINTS, FIELD_MAX,
    FIELD_MIN, RUNOFF_FIELD_GOAL, RUNOFF_PUNT, TOUCHBACK_SPOT, TOUCHBACK_ZONE,
};
use crate::engine::{PlayKind, PlaySummary};
use crate::event::{EventSink, Tone};
use crate::state::{GameState, PossessionChange};

/// Absolute landing spot of a punt with the given net distance.
///
/// A ball settling within five yards of the receiver's goal line comes out
/// to the receiver's 20.
#[must_use]
pub fn punt_landing(state: &GameState, net: i32) -> i32 {
    let kicker = state.possession;
    let receiver = kicker.opponent();
    let landing = (state.ball_on + kicker.direction() * net).clamp(FIELD_MIN, FIELD_MAX);
    if (landing - receiver.own_goal_line()).abs() <= TOUCHBACK_ZONE {
        receiver.spot_from_own_goal(TOUCHBACK_SPOT)
    } else {
        landing
    }
}

pub(crate) fn resolve_punt<R: RngCore>(
    state: &mut GameState,
    range: PuntRange,
    rng: &mut R,
    sink: &mut EventSink<'_>,
) -> PlaySummary {
    let kicker = state.possession;
    let kicker_name = sink.teams().name(kicker).to_string();
    let mut summary = PlaySummary::new(PlayKind::Punt, kicker);
    let net = rng.gen_range(range.min..=range.max.max(range.min));
    log::trace!("punt net draw {net} from {}..={}", range.min, range.max);
    let landing = punt_landing(state, net);
    summary.yards = (landing - state.ball_on) * kicker.direction();
    summary.runoff = RUNOFF_PUNT;
    log::debug!("punt net {net}, lands at {landing}");

    state.hand_over(PossessionChange::Punt, landing);
    summary.possession_change = Some(PossessionChange::Punt);
    sink.log(state, format!("{kicker_name} punt it away. New possession."));
    sink.banner("PUNT", "Field flips. New possession.", Tone::Normal);
    summary
}

/// Approximate kick length from the current spot.
#[must_use]
pub const fn kick_distance(state: &GameState) -> i32 {
    state.distance_to_score() + FIELD_GOAL_ALLOWANCE
}

/// Minimum d20 that makes a kick of `distance` yards.
#[must_use]
pub fn needed_roll(distance: i32) -> u8 {
    FIELD_GOAL_LADDER
        .iter()
        .find(|(max_distance, _)| distance <= *max_distance)
        .map_or(FIELD_GOAL_MAX_NEEDED, |(_, needed)| *needed)
}

pub(crate) fn resolve_field_goal(
    state: &mut GameState,
    d20: u8,
    sink: &mut EventSink<'_>,
) -> PlaySummary {
    let kicker = state.possession;
    let distance = kick_distance(state);
    let needed = needed_roll(distance);
    let made = d20 >= needed;
    let mut summary = PlaySummary::new(PlayKind::FieldGoal { made }, kicker);
    summary.runoff = RUNOFF_FIELD_GOAL;

    if made {
        state.score.add(kicker, FIELD_GOAL_POINTS);
        summary.points = FIELD_GOAL_POINTS;
        log::info!(
            "{kicker} field goal from {distance}, score {}-{}",
            state.score.home,
            state.score.away
        );
        sink.log(
            state,
            format!("FIELD GOAL is GOOD! (D20 {d20} vs need {needed})"),
        );
        sink.banner(
            "FIELD GOAL!",
            format!("Good from ~{distance} yards (need {needed}+)."),
            Tone::Celebrate,
        );
        state.switch_possession(PossessionChange::FieldGoal);
        summary.possession_change = Some(PossessionChange::FieldGoal);
    } else {
        log::info!("{kicker} missed field goal from {distance}");
        sink.log(
            state,
            format!("Field goal missed. (D20 {d20} vs need {needed})"),
        );
        sink.banner(
            "NO GOOD",
            format!("Missed from ~{distance} yards (needed {needed}+)."),
            Tone::Shake,
        );
        state.switch_possession(PossessionChange::MissedFieldGoal);
        summary.possession_change = Some(PossessionChange::MissedFieldGoal);
    }
    summary
}
