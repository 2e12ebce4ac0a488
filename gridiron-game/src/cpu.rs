//! CPU play-caller.
use rand::{Rng, RngCore};

use crate::constants::{CPU_DEEP_TERRITORY, CPU_FG_RANGE, CPU_GO_FOR_IT_TO_GO, MAX_DOWN};
use crate::state::{GameState, PlayCall};

/// Pick the CPU offense's call. Fourth down is deterministic; earlier downs
/// draw once from `rng` to mix runs and passes.
pub fn choose_play_call<R: RngCore>(state: &GameState, run_chance: f64, rng: &mut R) -> PlayCall {
    let distance = state.distance_to_score();
    if state.down >= MAX_DOWN {
        if distance <= CPU_FG_RANGE {
            return PlayCall::FieldGoal;
        }
        if distance >= CPU_DEEP_TERRITORY {
            return PlayCall::Punt;
        }
        if state.to_go <= CPU_GO_FOR_IT_TO_GO {
            return PlayCall::Pass;
        }
        return PlayCall::Punt;
    }
    let run = rng.gen_bool(run_chance.clamp(0.0, 1.0));
    log::trace!("cpu run draw {run} at {run_chance}");
    if run {
        PlayCall::Run
    } else {
        PlayCall::Pass
    }
}
