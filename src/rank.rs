//! Presentation ranking - jitter-broken descending sort

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Jitter amplitude applied when ranking building-type candidates.
pub const CANDIDATE_JITTER: f32 = 0.1;

/// Jitter amplitude applied when ranking placement locations.
pub const LOCATION_JITTER: f32 = 1.0;

/// Injectable tie-break randomness for display ordering.
///
/// Disabled by default so repeated runs rank identically; seed it for
/// interactive use. The jitter perturbs ordering only and is never
/// written back into a stored weight.
#[derive(Debug, Clone)]
pub struct Jitter {
    rng: Option<ChaCha8Rng>,
}

impl Jitter {
    pub fn disabled() -> Self {
        Self { rng: None }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Some(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::disabled(),
        }
    }

    /// Uniform draw in `[0, amplitude)`; always zero when disabled.
    pub fn sample(&mut self, amplitude: f32) -> f32 {
        match self.rng.as_mut() {
            Some(rng) if amplitude > 0.0 => rng.gen_range(0.0..amplitude),
            _ => 0.0,
        }
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Sorts descending by `weight(item) + jitter`. The sort is stable, so
/// with jitter disabled ties keep their arrival order.
pub fn rank_by_weight<T>(
    items: &mut Vec<T>,
    weight: impl Fn(&T) -> f32,
    jitter: &mut Jitter,
    amplitude: f32,
) {
    let mut scored: Vec<(f32, T)> = items
        .drain(..)
        .map(|item| (weight(&item) + jitter.sample(amplitude), item))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    items.extend(scored.into_iter().map(|(_, item)| item));
}
