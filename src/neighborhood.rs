use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::{PatternError, Result};
use crate::types::Pattern;

/// Draws one candidate neighbor of `base`. The result may overflow the stock.
///
/// A random cut of `base` is swapped for a random catalog length (a no-op when
/// they match). With probability `prob_extra_move` one further move follows:
/// either a random cut is dropped, or a copy of a random cut of `base` is
/// appended.
pub fn candidate<R: Rng>(
    rng: &mut R,
    base: &Pattern,
    lengths: &[u32],
    prob_extra_move: f64,
) -> Pattern {
    let mut next = base.clone();

    let (Some(&remove), Some(&add)) = (base.cuts().choose(rng), lengths.choose(rng)) else {
        return next;
    };
    if remove != add {
        next.remove_one(remove);
        next.push(add);
    }

    if rng.random::<f64>() < prob_extra_move {
        if rng.random_bool(0.5) {
            if let Some(&extra) = next.cuts().choose(rng) {
                next.remove_one(extra);
            }
        } else if let Some(&extra) = base.cuts().choose(rng) {
            next.push(extra);
        }
    }

    next
}

/// Collects `size` feasible neighbors of `base` that are pairwise distinct as
/// multisets, in the order they were found.
///
/// Fails with [`PatternError::NeighborhoodExhausted`] once `max_attempts`
/// candidates have been drawn without filling the neighborhood, or straight
/// away when `base` is empty and so has no neighbors.
pub fn neighborhood<R: Rng>(
    rng: &mut R,
    base: &Pattern,
    lengths: &[u32],
    stock_length: u32,
    size: usize,
    prob_extra_move: f64,
    max_attempts: usize,
) -> Result<Vec<Pattern>> {
    if base.is_empty() && size > 0 {
        return Err(PatternError::NeighborhoodExhausted {
            requested: size,
            collected: 0,
            attempts: 0,
        });
    }

    // A huge request can never be filled within the attempt ceiling.
    let capacity = size.min(max_attempts);
    let mut seen: HashSet<Pattern> = HashSet::with_capacity(capacity);
    let mut found = Vec::with_capacity(capacity);
    let mut attempts = 0;

    while found.len() < size {
        if attempts == max_attempts {
            return Err(PatternError::NeighborhoodExhausted {
                requested: size,
                collected: found.len(),
                attempts,
            });
        }
        attempts += 1;

        let next = candidate(rng, base, lengths, prob_extra_move);
        if next.total_length() > stock_length as u64 {
            continue;
        }
        if seen.insert(next.canonical()) {
            found.push(next);
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const LENGTHS: [u32; 4] = [3, 4, 5, 6];

    #[test]
    fn test_swap_keeps_size_without_extra_move() {
        let base = Pattern::new(vec![3, 3, 4]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..500 {
            let next = candidate(&mut rng, &base, &LENGTHS, 0.0);
            assert_eq!(next.len(), base.len(), "{next} is not a single swap of {base}");
            // At most one cut differs between base and neighbor.
            let mut rest = next.clone();
            let shared = base.cuts().iter().filter(|&&c| rest.remove_one(c)).count();
            assert!(shared + 1 >= base.len(), "{next} differs from {base} by more than one cut");
        }
    }

    #[test]
    fn test_extra_move_changes_size_by_one() {
        let base = Pattern::new(vec![3, 4]);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut grew = false;
        let mut shrank = false;
        for _ in 0..500 {
            let next = candidate(&mut rng, &base, &LENGTHS, 1.0);
            match next.len() {
                1 => shrank = true,
                3 => {
                    grew = true;
                    // The appended cut comes from the base pattern.
                    let last = *next.cuts().last().unwrap();
                    assert!(base.cuts().contains(&last));
                }
                n => panic!("unexpected neighbor length {n}: {next}"),
            }
        }
        assert!(grew && shrank, "both extra moves should occur");
    }

    #[test]
    fn test_neighbors_feasible_and_distinct() {
        let base = Pattern::new(vec![3, 3, 4]);
        for seed in 0..100 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let hood = neighborhood(&mut rng, &base, &LENGTHS, 12, 5, 0.1, 10_000).unwrap();
            assert_eq!(hood.len(), 5);
            for p in &hood {
                assert!(p.total_length() <= 12, "seed {seed}: {p} overflows stock");
            }
            let unique: HashSet<Pattern> = hood.iter().map(Pattern::canonical).collect();
            assert_eq!(unique.len(), hood.len(), "seed {seed}: duplicate neighbors");
        }
    }

    #[test]
    fn test_single_fit_exhausts() {
        let base = Pattern::new(vec![10]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = neighborhood(&mut rng, &base, &[10], 10, 5, 0.1, 1_000).unwrap_err();
        match err {
            PatternError::NeighborhoodExhausted {
                requested,
                collected,
                attempts,
            } => {
                assert_eq!(requested, 5);
                assert!(collected < 5);
                assert_eq!(attempts, 1_000);
            }
            other => panic!("expected NeighborhoodExhausted, got {other:?}"),
        }
    }

    #[test]
    fn test_huge_size_exhausts_without_allocating() {
        let base = Pattern::new(vec![10]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = neighborhood(&mut rng, &base, &[10], 10, 1usize << 40, 0.1, 100).unwrap_err();
        match err {
            PatternError::NeighborhoodExhausted {
                requested,
                collected,
                attempts,
            } => {
                assert_eq!(requested, 1usize << 40);
                assert!(collected <= 2);
                assert_eq!(attempts, 100);
            }
            other => panic!("expected NeighborhoodExhausted, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_base_exhausts_immediately() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err =
            neighborhood(&mut rng, &Pattern::default(), &LENGTHS, 12, 1, 0.1, 100).unwrap_err();
        assert!(matches!(
            err,
            PatternError::NeighborhoodExhausted { attempts: 0, .. }
        ));
    }

    #[test]
    fn test_reordered_cuts_count_once() {
        // Without extra moves [5, 6] reaches seven multisets: {3,5} {4,5}
        // {5,5} {5,6} by replacing the 6, and {3,6} {4,6} {6,6} by replacing
        // the 5. Swapping the 5 back in yields [6, 5], a reordering of {5,6}.
        let base = Pattern::new(vec![5, 6]);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let hood = neighborhood(&mut rng, &base, &LENGTHS, 12, 7, 0.0, 10_000).unwrap();
        let unique: HashSet<Pattern> = hood.iter().map(Pattern::canonical).collect();
        assert_eq!(unique.len(), 7);

        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert!(neighborhood(&mut rng, &base, &LENGTHS, 12, 8, 0.0, 10_000).is_err());
    }
}
