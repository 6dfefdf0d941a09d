//! Categorical sampling.

use rand::distributions::{Distribution as _, WeightedError, WeightedIndex};
use rand::Rng;

use crate::error::DistributionError;
use crate::models::Distribution;

/// Draw one label from `dist`, each with probability proportional to its
/// weight. Weights need not sum exactly to one.
///
/// Consumes randomness only from `rng`, so a seeded generator reproduces the
/// same draws.
pub fn sample<'d, K, R: Rng + ?Sized>(
    dist: &'d Distribution<K>,
    rng: &mut R,
) -> Result<&'d K, DistributionError> {
    let index = WeightedIndex::new(dist.weights()).map_err(|err| match err {
        WeightedError::NoItem => DistributionError::Empty,
        WeightedError::AllWeightsZero => DistributionError::AllWeightsZero,
        other => DistributionError::InvalidWeight(other.to_string()),
    })?;
    let (label, _) = &dist.entries()[index.sample(rng)];
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InPlayOutcome, LeagueAverages};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeMap;

    #[test]
    fn test_empty_distribution_is_error() {
        let dist: Distribution<InPlayOutcome> = Distribution::empty();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(sample(&dist, &mut rng), Err(DistributionError::Empty));
    }

    #[test]
    fn test_single_entry_always_drawn() {
        let dist = Distribution::from_weights([(InPlayOutcome::Triple, 3.0)]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(*sample(&dist, &mut rng).unwrap(), InPlayOutcome::Triple);
        }
    }

    #[test]
    fn test_same_seed_same_draws() {
        let league = LeagueAverages::default();
        let draw = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..50).map(|_| *sample(&league.in_play, &mut rng).unwrap()).collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
    }

    #[test]
    fn test_frequencies_track_weights() {
        let league = LeagueAverages::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let n = 200_000;
        let mut seen: BTreeMap<InPlayOutcome, u32> = BTreeMap::new();
        for _ in 0..n {
            *seen.entry(*sample(&league.in_play, &mut rng).unwrap()).or_default() += 1;
        }
        for (label, p) in league.in_play.entries() {
            let freq = seen.get(label).copied().unwrap_or(0) as f64 / n as f64;
            assert!((freq - p).abs() < 0.01, "{label}: {freq} vs {p}");
        }
    }
}
