// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
/// Stateful `xoroshiro128+` pseudo-random number generator, one per particle.
///
/// * Not cryptographically secure; use only for Monte Carlo sampling.
/// * A particle's whole history is a function of its seed: the same seed
///   replays the same absorptions, bounces, and decay.
#[derive(Debug, Clone, Copy)]
pub struct Prng {
    state: [u64; 2],
}

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(GOLDEN_GAMMA);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Derives an independent per-particle seed from a run seed and the
/// particle's index in the batch.
///
/// Seeds depend only on `(run_seed, index)`, never on which worker thread
/// claims the particle.
pub fn derive_seed(run_seed: u64, index: u64) -> u64 {
    let mut state = run_seed ^ index.wrapping_mul(GOLDEN_GAMMA).rotate_left(17);
    splitmix64(&mut state)
}

impl Prng {
    /// Constructs a PRNG from two 64-bit seeds.
    pub fn from_seed(seed0: u64, seed1: u64) -> Self {
        let mut state = [seed0, seed1];
        if state[0] == 0 && state[1] == 0 {
            state[0] = GOLDEN_GAMMA;
        }
        Self { state }
    }

    /// Constructs a PRNG from a single 64-bit seed via SplitMix64 expansion.
    pub fn from_seed_u64(seed: u64) -> Self {
        let mut sm_state = seed;
        Self::from_seed(splitmix64(&mut sm_state), splitmix64(&mut sm_state))
    }

    /// Returns the next raw 64-bit output.
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(55) ^ s1 ^ (s1 << 14);
        self.state[1] = s1.rotate_left(36);

        result
    }

    /// Returns the next float in `[0, 1)`.
    ///
    /// Uses the high 52 bits of the output to fill the mantissa of a value in
    /// `[1, 2)` and shifts it down.
    pub fn next_f64(&mut self) -> f64 {
        let raw = self.next_u64();
        let bits = (raw >> 12) | 0x3ff0_0000_0000_0000;
        f64::from_bits(bits) - 1.0
    }

    /// Returns a float uniformly distributed in `[lo, hi)`.
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Returns a float in `(0, 1]`, safe to pass to `ln`.
    pub fn next_open_f64(&mut self) -> f64 {
        1.0 - self.next_f64()
    }
}
