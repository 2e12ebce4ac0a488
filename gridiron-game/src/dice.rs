//! Dice input parsing and the dice validator.
//!
//! Raw die entries arrive as text from the collaborator. Empty input,
//! non-integers and out-of-range values are all treated as "missing".
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{D6_FACES, D10_FACES, D20_FACES};
use crate::state::PlayCall;

/// Rejection returned when the dice needed for a resolution are absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("enter D6 (1-6)")]
    MissingD6,
    #[error("enter D10 (1-10) for this D6 result")]
    MissingD10,
    #[error("chaos triggered — enter D20 (1-20)")]
    MissingChaosD20,
    #[error("enter D20 (1-20) to attempt the kick")]
    MissingFieldGoalD20,
}

/// Dice values as entered; `None` marks a missing or invalid channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiceRoll {
    pub d6: Option<u8>,
    pub d10: Option<u8>,
    pub d20: Option<u8>,
}

impl DiceRoll {
    /// Build a roll from numeric entries, discarding values outside each die's faces.
    #[must_use]
    pub fn new(d6: Option<u8>, d10: Option<u8>, d20: Option<u8>) -> Self {
        Self {
            d6: d6.filter(|v| in_range(*v, D6_FACES)),
            d10: d10.filter(|v| in_range(*v, D10_FACES)),
            d20: d20.filter(|v| in_range(*v, D20_FACES)),
        }
    }

    /// Parse the three raw text channels.
    #[must_use]
    pub fn parse(d6: &str, d10: &str, d20: &str) -> Self {
        Self {
            d6: read_die(d6, D6_FACES),
            d10: read_die(d10, D10_FACES),
            d20: read_die(d20, D20_FACES),
        }
    }

    #[must_use]
    pub const fn d6(d6: u8) -> Self {
        Self {
            d6: Some(d6),
            d10: None,
            d20: None,
        }
    }

    #[must_use]
    pub const fn with_d10(mut self, d10: u8) -> Self {
        self.d10 = Some(d10);
        self
    }

    #[must_use]
    pub const fn with_d20(mut self, d20: u8) -> Self {
        self.d20 = Some(d20);
        self
    }

    #[must_use]
    pub const fn chaos(d20: u8) -> Self {
        Self {
            d6: None,
            d10: None,
            d20: Some(d20),
        }
    }
}

const fn in_range(value: u8, faces: u8) -> bool {
    value >= 1 && value <= faces
}

/// Read one die entry; anything but an integer within `1..=faces` is missing.
#[must_use]
pub fn read_die(raw: &str, faces: u8) -> Option<u8> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: i64 = trimmed.parse().ok()?;
    let value = u8::try_from(value).ok()?;
    in_range(value, faces).then_some(value)
}

/// Resolution context the validator checks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceContext {
    pub expecting_chaos: bool,
    pub play_call: Option<PlayCall>,
}

/// Yardage tier for the gain faces of the d6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GainTier {
    Short,
    Medium,
    Big,
}

/// Normal-play meaning of a validated d6, carrying the d10 when the face needs one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "face", rename_all = "snake_case")]
pub enum PlayFace {
    Sack,
    Stuffed,
    Gain { tier: GainTier, d10: u8 },
    Touchdown,
}

impl PlayFace {
    #[must_use]
    pub const fn d6(self) -> u8 {
        match self {
            Self::Sack => 1,
            Self::Stuffed => 2,
            Self::Gain {
                tier: GainTier::Short,
                ..
            } => 3,
            Self::Gain {
                tier: GainTier::Medium,
                ..
            } => 4,
            Self::Gain {
                tier: GainTier::Big,
                ..
            } => 5,
            Self::Touchdown => 6,
        }
    }
}

/// Dice confirmed present for the context they were validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidDice {
    /// Follow-up to a chaos-eligible sack; only the d20 matters.
    Chaos { d20: u8 },
    Play { face: PlayFace, d20: Option<u8> },
}

/// Check that the dice required for `ctx` are present.
///
/// Pure: identical inputs always yield identical results.
///
/// # Errors
///
/// Returns the first missing channel, in validator rule order.
pub fn validate_dice(roll: &DiceRoll, ctx: DiceContext) -> Result<ValidDice, DiceError> {
    // Public fields can bypass `new`; re-filter every channel.
    let roll = DiceRoll::new(roll.d6, roll.d10, roll.d20);
    if ctx.expecting_chaos {
        let d20 = roll.d20.ok_or(DiceError::MissingChaosD20)?;
        return Ok(ValidDice::Chaos { d20 });
    }
    let face = match roll.d6 {
        Some(1) => PlayFace::Sack,
        Some(2) => PlayFace::Stuffed,
        Some(d6 @ 3..=5) => {
            let d10 = roll.d10.ok_or(DiceError::MissingD10)?;
            let tier = match d6 {
                3 => GainTier::Short,
                4 => GainTier::Medium,
                _ => GainTier::Big,
            };
            PlayFace::Gain { tier, d10 }
        }
        Some(6) => PlayFace::Touchdown,
        _ => return Err(DiceError::MissingD6),
    };
    if ctx.play_call == Some(PlayCall::FieldGoal) && roll.d20.is_none() {
        return Err(DiceError::MissingFieldGoalD20);
    }
    Ok(ValidDice::Play {
        face,
        d20: roll.d20,
    })
}

/// Seeded physical-dice stand-in for simulations and auto-roll.
#[derive(Debug, Clone)]
pub struct DiceBag {
    rng: ChaCha20Rng,
}

impl DiceBag {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn roll_die(&mut self, faces: u8) -> u8 {
        self.rng.gen_range(1..=faces.max(1))
    }

    /// Roll all three dice at once.
    pub fn roll(&mut self) -> DiceRoll {
        DiceRoll {
            d6: Some(self.roll_die(D6_FACES)),
            d10: Some(self.roll_die(D10_FACES)),
            d20: Some(self.roll_die(D20_FACES)),
        }
    }
}
