use rand::{Rng, RngCore};

use super::{PlayKind, PlaySummary, finish_touchdown, turnover_on_downs_if_needed};
use crate::chaos;
use crate::constants::{
    BIG_GAIN_BASE, BREAKAWAY_D20, MEDIUM_GAIN_BASE, MEDIUM_GAIN_DIVISOR, RUNOFF_BIG_GAIN,
    RUNOFF_MEDIUM_GAIN, RUNOFF_SACK, RUNOFF_SHORT_GAIN, RUNOFF_STUFFED, RUNOFF_TOUCHDOWN,
    SACK_LOSS, SHORT_GAIN_BASE, SHORT_GAIN_DIVISOR,
};
use crate::dice::{GainTier, PlayFace};
use crate::event::{EventSink, Tone};
use crate::state::{GameState, PlayCall, ordinal_down};

/// Seconds of game clock consumed by a normal play with this face.
#[must_use]
pub const fn runoff_for(face: PlayFace) -> u32 {
    match face {
        PlayFace::Touchdown => RUNOFF_TOUCHDOWN,
        PlayFace::Sack => RUNOFF_SACK,
        PlayFace::Stuffed => RUNOFF_STUFFED,
        PlayFace::Gain { tier, .. } => match tier {
            GainTier::Short => RUNOFF_SHORT_GAIN,
            GainTier::Medium => RUNOFF_MEDIUM_GAIN,
            GainTier::Big => RUNOFF_BIG_GAIN,
        },
    }
}

/// Yardage rolled for a gain face before field clamping.
#[must_use]
pub const fn nominal_gain(tier: GainTier, d10: u8) -> i32 {
    let d10 = d10 as i32;
    match tier {
        GainTier::Short => SHORT_GAIN_BASE + d10 / SHORT_GAIN_DIVISOR,
        GainTier::Medium => MEDIUM_GAIN_BASE + d10 / MEDIUM_GAIN_DIVISOR,
        GainTier::Big => BIG_GAIN_BASE + d10,
    }
}

pub(super) fn resolve_normal<R: RngCore>(
    state: &mut GameState,
    call: PlayCall,
    face: PlayFace,
    d20: Option<u8>,
    chaos_enabled: bool,
    rng: &mut R,
    sink: &mut EventSink<'_>,
) -> PlaySummary {
    let offense_name = sink.teams().name(state.possession).to_string();
    match face {
        PlayFace::Touchdown => {
            let mut summary = PlaySummary::new(PlayKind::Touchdown, state.possession);
            summary.yards = state.distance_to_score();
            summary.runoff = runoff_for(face);
            sink.log(state, format!("{offense_name} hit a TOUCHDOWN! (D6=6)"));
            sink.banner(
                "TOUCHDOWN!",
                "Dice said: straight to the end zone. (+XP)",
                Tone::Celebrate,
            );
            finish_touchdown(state, &mut summary);
            summary
        }
        PlayFace::Sack => resolve_sack(state, call, chaos_enabled, sink, &offense_name),
        PlayFace::Stuffed => {
            let mut summary = PlaySummary::new(PlayKind::Stuffed, state.possession);
            let nominal = if rng.gen_bool(0.5) { -1 } else { 0 };
            log::trace!("stuffed draw {nominal}");
            summary.yards = state.move_ball(nominal);
            summary.runoff = runoff_for(face);
            state.last_play_was_sack = false;
            state.set_to_go(state.to_go - summary.yards);
            state.advance_down();
            sink.log(
                state,
                format!("{offense_name} stuffed run: {} yards.", summary.yards),
            );
            sink.banner("STUFFED", format!("No room. {} yards.", summary.yards), Tone::Shake);
            turnover_on_downs_if_needed(state, sink, &mut summary);
            summary
        }
        PlayFace::Gain { tier, d10 } => {
            resolve_gain(state, tier, d10, d20, runoff_for(face), sink, &offense_name)
        }
    }
}

fn resolve_sack(
    state: &mut GameState,
    call: PlayCall,
    chaos_enabled: bool,
    sink: &mut EventSink<'_>,
    offense_name: &str,
) -> PlaySummary {
    let mut summary = PlaySummary::new(PlayKind::Sack, state.possession);
    // Eligibility is judged on the pre-snap situation.
    let trigger = chaos_enabled
        .then(|| chaos::trigger_reason(state, call))
        .flatten();
    summary.yards = state.move_ball(-SACK_LOSS);
    state.last_play_was_sack = true;

    if let Some(reason) = trigger {
        log::debug!("sack is chaos-eligible: {reason:?}");
        state.expecting_chaos = true;
        summary.chaos_pending = true;
        sink.log(
            state,
            format!("{offense_name} sacked for -{SACK_LOSS}. CHAOS TRIGGERED."),
        );
        sink.banner(
            "SACK!",
            "Chaos triggered. Enter your D20 and resolve again.",
            Tone::Shake,
        );
        return summary;
    }

    summary.runoff = RUNOFF_SACK;
    state.set_to_go(state.to_go + SACK_LOSS);
    let exhausted = state.advance_down();
    sink.log(state, format!("{offense_name} take a sack (-{SACK_LOSS})."));
    if exhausted {
        turnover_on_downs_if_needed(state, sink, &mut summary);
        return summary;
    }
    sink.banner(
        "SACK!",
        format!(
            "Big loss. Now {} & {}.",
            ordinal_down(state.down),
            state.to_go
        ),
        Tone::Shake,
    );
    summary
}

fn resolve_gain(
    state: &mut GameState,
    tier: GainTier,
    d10: u8,
    d20: Option<u8>,
    runoff: u32,
    sink: &mut EventSink<'_>,
    offense_name: &str,
) -> PlaySummary {
    let breakaway = tier == GainTier::Big && d20 == Some(BREAKAWAY_D20);
    let kind = if breakaway {
        PlayKind::Breakaway
    } else {
        PlayKind::Gain(tier)
    };
    let mut summary = PlaySummary::new(kind, state.possession);
    summary.runoff = runoff;
    state.last_play_was_sack = false;

    let nominal = if breakaway {
        state.distance_to_score()
    } else {
        nominal_gain(tier, d10)
    };
    summary.yards = state.move_ball(nominal);

    if state.is_in_end_zone() {
        let headline = if breakaway {
            "Breakaway! Gone to the house. (+XP)"
        } else {
            "Explodes for a score! (+XP)"
        };
        sink.log(state, format!("{offense_name} break loose for a TOUCHDOWN!"));
        sink.banner("TOUCHDOWN!", headline, Tone::Celebrate);
        finish_touchdown(state, &mut summary);
        return summary;
    }

    let title = if tier == GainTier::Big {
        "BIG PLAY!"
    } else if summary.yards >= state.to_go {
        "FIRST DOWN!"
    } else {
        "GAIN"
    };
    if summary.yards >= state.to_go {
        state.first_down();
        summary.first_down = true;
        sink.log(
            state,
            format!("{offense_name} gain {} yards. FIRST DOWN.", summary.yards),
        );
        sink.banner(
            title,
            format!("Gains {} yards. Chains move.", summary.yards),
            Tone::Normal,
        );
    } else {
        state.set_to_go(state.to_go - summary.yards);
        state.advance_down();
        sink.log(state, format!("{offense_name} gain {} yards.", summary.yards));
        sink.banner(title, format!("Gains {} yards.", summary.yards), Tone::Normal);
        turnover_on_downs_if_needed(state, sink, &mut summary);
    }
    summary
}
