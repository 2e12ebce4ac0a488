//! Seedable random streams injected into play resolution.
//!
//! Each concern draws from its own stream derived from the session seed, so
//! adding a draw to one resolver never shifts the outcomes of another.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::Sha256;

/// Per-concern random streams for a session.
#[derive(Debug, Clone)]
pub struct RngBundle {
    play: CountingRng<SmallRng>,
    special_teams: CountingRng<SmallRng>,
    penalty: CountingRng<SmallRng>,
    cpu: CountingRng<SmallRng>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            play: CountingRng::new(derive_stream_seed(seed, b"play")),
            special_teams: CountingRng::new(derive_stream_seed(seed, b"special_teams")),
            penalty: CountingRng::new(derive_stream_seed(seed, b"penalty")),
            cpu: CountingRng::new(derive_stream_seed(seed, b"cpu")),
        }
    }

    /// Stream for normal-play variance (stuffed-run direction).
    pub fn play(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.play
    }

    /// Stream for punt distance.
    pub fn special_teams(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.special_teams
    }

    /// Stream for chaos penalty type and magnitude.
    pub fn penalty(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.penalty
    }

    /// Stream for the CPU run/pass mix.
    pub fn cpu(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.cpu
    }

    /// Total draws across every stream.
    #[must_use]
    pub const fn total_draws(&self) -> u64 {
        self.play
            .draws()
            .saturating_add(self.special_teams.draws())
            .saturating_add(self.penalty.draws())
            .saturating_add(self.cpu.draws())
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    // HMAC accepts keys of any length, so the fallback is unreachable.
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
