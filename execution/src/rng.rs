//! Random sources for spin resolution.
//!
//! Engine logic only ever draws through [RandomSource]; the caller decides whether that is a
//! reproducible [GameRng], a wrapped `rand` generator, or a scripted sequence in tests.

use commonware_cryptography::sha256::Sha256;
use commonware_cryptography::Hasher;
use goldspin_types::UserId;
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

/// Source of independent uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `[0, len)`, computed as `floor(u * len)`.
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let index = (self.next_unit() * len as f64) as usize;
        index.min(len - 1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Deterministic generator built on a SHA256 hash chain.
///
/// Each spin derives its own stream from `(seed, user_id, spin)`, so spins never share generator
/// state and replays with the same inputs reproduce the same grid.
#[derive(Clone)]
pub struct GameRng {
    state: [u8; 32],
    index: usize,
}

impl GameRng {
    /// Create a new RNG from a seed, user id, and spin number.
    pub fn new(seed: &[u8], user_id: UserId, spin: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update(&user_id.to_be_bytes());
        hasher.update(&spin.to_be_bytes());
        Self {
            state: hasher.finalize().0,
            index: 0,
        }
    }

    fn next_byte(&mut self) -> u8 {
        if self.index >= 32 {
            // Rehash to get more bytes
            let mut hasher = Sha256::new();
            hasher.update(&self.state);
            self.state = hasher.finalize().0;
            self.index = 0;
        }
        let result = self.state[self.index];
        self.index += 1;
        result
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        for byte in bytes.iter_mut() {
            *byte = self.next_byte();
        }
        u64::from_be_bytes(bytes)
    }
}

impl RandomSource for GameRng {
    fn next_unit(&mut self) -> f64 {
        // Top 53 bits fill the f64 mantissa exactly.
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Adapts any `rand` generator into a [RandomSource].
pub struct EntropySource<R: RngCore>(R);

impl<R: RngCore> EntropySource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl EntropySource<StdRng> {
    /// A generator seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seed_from_u64(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> RandomSource for EntropySource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}
