use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::construct::random_pattern;
use crate::error::{PatternError, Result};
use crate::neighborhood::neighborhood;
use crate::types::{ClimbConfig, ClimbResult, ClimbStatus, CutCatalog, Pattern};

/// Randomized hill climber producing a single low-waste cut pattern.
///
/// The engine owns its random source, so separate instances share no state
/// and can run on separate threads. Two instances built from the same inputs
/// and the same seed produce the same patterns.
///
/// Local optima are returned as-is: a spread of decent but imperfect patterns
/// is what a downstream allocation solver wants to choose from.
#[derive(Debug, Clone)]
pub struct CutsHillClimb<R> {
    catalog: CutCatalog,
    lengths: Vec<u32>,
    stock_length: u32,
    nbr_hood_size: usize,
    config: ClimbConfig,
    rng: R,
}

impl CutsHillClimb<ChaCha8Rng> {
    pub fn seeded(
        catalog: CutCatalog,
        stock_length: u32,
        nbr_hood_size: usize,
        config: ClimbConfig,
        seed: u64,
    ) -> Result<Self> {
        Self::new(
            catalog,
            stock_length,
            nbr_hood_size,
            config,
            ChaCha8Rng::seed_from_u64(seed),
        )
    }

    /// Seeds the engine from the thread-local generator.
    pub fn from_entropy(
        catalog: CutCatalog,
        stock_length: u32,
        nbr_hood_size: usize,
        config: ClimbConfig,
    ) -> Result<Self> {
        let rng = ChaCha8Rng::from_rng(&mut rand::rng());
        Self::new(catalog, stock_length, nbr_hood_size, config, rng)
    }
}

impl<R: Rng> CutsHillClimb<R> {
    pub fn new(
        catalog: CutCatalog,
        stock_length: u32,
        nbr_hood_size: usize,
        config: ClimbConfig,
        rng: R,
    ) -> Result<Self> {
        if stock_length == 0 {
            return Err(PatternError::InvalidConfiguration(
                "stock length must be non-zero".to_string(),
            ));
        }
        if nbr_hood_size == 0 {
            return Err(PatternError::InvalidConfiguration(
                "neighborhood size must be non-zero".to_string(),
            ));
        }
        config.validate()?;
        if catalog.min_length() > stock_length {
            return Err(PatternError::InvalidCatalog(format!(
                "no cut length fits in stock of length {stock_length}"
            )));
        }

        let lengths = catalog.lengths();
        Ok(Self {
            catalog,
            lengths,
            stock_length,
            nbr_hood_size,
            config,
            rng,
        })
    }

    pub fn catalog(&self) -> &CutCatalog {
        &self.catalog
    }

    pub fn stock_length(&self) -> u32 {
        self.stock_length
    }

    pub fn nbr_hood_size(&self) -> usize {
        self.nbr_hood_size
    }

    pub fn config(&self) -> &ClimbConfig {
        &self.config
    }

    /// Random pattern that leaves no room for another cut.
    pub fn starting_solution(&mut self) -> Result<Pattern> {
        random_pattern(
            &mut self.rng,
            &self.lengths,
            self.stock_length,
            self.config.max_construction_attempts,
        )
    }

    /// Whether the pattern fits on one stock piece.
    pub fn check_pattern(&self, pattern: &Pattern) -> bool {
        pattern.total_length() <= self.stock_length as u64
    }

    pub fn create_nbr_hood(
        &mut self,
        base: &Pattern,
        size: usize,
        prob_extra_move: f64,
    ) -> Result<Vec<Pattern>> {
        neighborhood(
            &mut self.rng,
            base,
            &self.lengths,
            self.stock_length,
            size,
            prob_extra_move,
            self.config.max_neighborhood_attempts,
        )
    }

    /// Stock left over after the pattern's cuts; negative if it overflows.
    pub fn calc_waste(&self, pattern: &Pattern) -> i64 {
        self.stock_length as i64 - pattern.total_length() as i64
    }

    pub fn hill_climb(&mut self, max_iter: usize) -> Result<Pattern> {
        self.climb(max_iter).map(|result| result.pattern)
    }

    /// Runs a best-improvement climb from a fresh random start.
    ///
    /// Each iteration scans a whole neighborhood and moves to its lowest-waste
    /// member only when that strictly beats the current pattern. A perfect
    /// fit ends the climb at once.
    pub fn climb(&mut self, max_iter: usize) -> Result<ClimbResult> {
        let mut best = self.starting_solution()?;
        let mut best_waste = self.calc_waste(&best);
        debug!(event = "climb_start", pattern = %best, waste = best_waste);

        if best_waste == 0 {
            return Ok(ClimbResult {
                pattern: best,
                waste: best_waste,
                status: ClimbStatus::Converged,
                iterations: 0,
            });
        }

        for iteration in 1..=max_iter {
            let nbr_hood =
                self.create_nbr_hood(&best, self.nbr_hood_size, self.config.prob_extra_move)?;

            let mut winner: Option<(Pattern, i64)> = None;
            for nbr in nbr_hood {
                let waste = self.calc_waste(&nbr);
                if winner.as_ref().is_none_or(|(_, w)| waste < *w) {
                    winner = Some((nbr, waste));
                }
            }

            match winner {
                Some((nbr, waste)) if waste < best_waste => {
                    trace!(event = "climb_step", iteration, pattern = %nbr, waste);
                    best = nbr;
                    best_waste = waste;
                    if best_waste == 0 {
                        debug!(event = "climb_end", status = "converged", iteration, waste = 0);
                        return Ok(ClimbResult {
                            pattern: best,
                            waste: best_waste,
                            status: ClimbStatus::Converged,
                            iterations: iteration,
                        });
                    }
                }
                _ => {
                    debug!(
                        event = "climb_end",
                        status = "converged",
                        iteration,
                        waste = best_waste
                    );
                    return Ok(ClimbResult {
                        pattern: best,
                        waste: best_waste,
                        status: ClimbStatus::Converged,
                        iterations: iteration,
                    });
                }
            }
        }

        debug!(event = "climb_end", status = "capped", iteration = max_iter, waste = best_waste);
        Ok(ClimbResult {
            pattern: best,
            waste: best_waste,
            status: ClimbStatus::Capped,
            iterations: max_iter,
        })
    }
}
