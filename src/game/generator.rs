//! Secret number selection.

use rand::Rng;

use crate::catalog::DifficultySettings;
use crate::numbers::is_interesting;

/// Pick a secret in `[settings.min, settings.max]`.
///
/// With probability `special_bias` the draw is taken from the "interesting"
/// numbers in range instead (primes, squares, Fibonacci, legendary numbers).
/// That scan is linear in the range width, which is fine for ranges of a few
/// hundred values.
pub fn generate<R: Rng + ?Sized>(settings: &DifficultySettings, special_bias: f64, rng: &mut R) -> u32 {
    let plain = rng.gen_range(settings.min..=settings.max);

    if rng.gen_bool(special_bias.clamp(0.0, 1.0)) {
        let candidates: Vec<u32> = (settings.min..=settings.max).filter(|&n| is_interesting(n)).collect();
        if !candidates.is_empty() {
            return candidates[rng.gen_range(0..candidates.len())];
        }
    }

    plain
}
