use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::{PatternError, Result};
use crate::types::Pattern;

/// Builds a random pattern by drawing cut lengths uniformly until the
/// leftover is shorter than the smallest length.
///
/// Draws that would overflow the stock are thrown away and redrawn. Only
/// those rejected draws count towards `max_attempts`, so long patterns of
/// short cuts are never cut off.
pub fn random_pattern<R: Rng>(
    rng: &mut R,
    lengths: &[u32],
    stock_length: u32,
    max_attempts: usize,
) -> Result<Pattern> {
    let Some(&min_length) = lengths.iter().min() else {
        return Err(PatternError::InvalidCatalog(
            "catalog has no cut lengths".to_string(),
        ));
    };

    let mut pattern = Pattern::default();
    let mut remaining = stock_length;
    let mut attempts = 0;

    while remaining >= min_length {
        let Some(&cut) = lengths.choose(rng) else {
            break;
        };
        if cut <= remaining {
            pattern.push(cut);
            remaining -= cut;
            continue;
        }

        attempts += 1;
        if attempts >= max_attempts {
            return Err(PatternError::ConstructionExhausted { attempts });
        }
    }

    Ok(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_pattern_is_full() {
        let lengths = [3, 4, 5, 6];
        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let p = random_pattern(&mut rng, &lengths, 12, 10_000).unwrap();
            let total = p.total_length();
            assert!(total <= 12, "seed {seed}: {p} overflows stock");
            assert!(
                12 - total < 3,
                "seed {seed}: {p} leaves room for another cut"
            );
        }
    }

    #[test]
    fn test_single_length_fills_exactly() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let p = random_pattern(&mut rng, &[4], 12, 100).unwrap();
        assert_eq!(p.cuts(), &[4, 4, 4]);
    }

    #[test]
    fn test_nothing_fits_gives_empty_pattern() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let p = random_pattern(&mut rng, &[20], 12, 100).unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn test_attempt_ceiling() {
        // Drawing 100 first is the only way to fail; drawing 7 first fills
        // the stock as far as it goes.
        let mut failures = 0;
        for seed in 0..64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match random_pattern(&mut rng, &[7, 100], 12, 1) {
                Ok(p) => assert_eq!(p.cuts(), &[7], "seed {seed}"),
                Err(err) => {
                    assert_eq!(err, PatternError::ConstructionExhausted { attempts: 1 });
                    failures += 1;
                }
            }
        }
        assert!(failures > 0, "no seed drew the oversized cut first");
    }

    #[test]
    fn test_accepted_draws_do_not_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let p = random_pattern(&mut rng, &[1], 200_000, 10).unwrap();
        assert_eq!(p.len(), 200_000);
        assert_eq!(p.total_length(), 200_000);
    }

    #[test]
    fn test_empty_lengths_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = random_pattern(&mut rng, &[], 12, 100).unwrap_err();
        assert!(matches!(err, PatternError::InvalidCatalog(_)));
    }

    #[test]
    fn test_same_seed_same_pattern() {
        let lengths = [3, 4, 5, 6];
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(
                random_pattern(&mut a, &lengths, 40, 10_000).unwrap(),
                random_pattern(&mut b, &lengths, 40, 10_000).unwrap()
            );
        }
    }
}
