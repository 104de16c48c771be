use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::hill_climb::CutsHillClimb;
use crate::types::Pattern;

/// Pattern counts per length, keyed by pattern index in the pool.
pub type CutMapping = BTreeMap<usize, BTreeMap<u32, u32>>;

/// Inputs for an external solver that picks how many stock pieces to cut
/// with each pattern so every length's demand is met.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LpInput {
    pub stock_length: u32,
    pub patterns: Vec<Pattern>,
    pub cut_mapping: CutMapping,
    pub demand: BTreeMap<u32, u32>,
}

/// Collects distinct patterns by running the hill climber repeatedly.
///
/// Patterns are stored sorted, so two climbs that end on the same cuts in a
/// different order count once.
pub struct PatternPool<'a, R> {
    engine: &'a mut CutsHillClimb<R>,
    patterns: Vec<Pattern>,
    seen: HashSet<Pattern>,
    calls: usize,
}

impl<'a, R: Rng> PatternPool<'a, R> {
    pub fn new(engine: &'a mut CutsHillClimb<R>) -> Self {
        Self {
            engine,
            patterns: Vec::new(),
            seen: HashSet::new(),
            calls: 0,
        }
    }

    /// Climbs until `target` distinct patterns are held or `max_calls` climbs
    /// have run in this call, whichever comes first.
    pub fn build(&mut self, target: usize, max_calls: usize) -> Result<&[Pattern]> {
        let max_iter = self.engine.config().max_iter;
        let mut calls = 0;

        while self.patterns.len() < target {
            if calls == max_calls {
                warn!(
                    event = "pool_capped",
                    calls,
                    patterns = self.patterns.len(),
                    target,
                );
                break;
            }
            calls += 1;

            let pattern = self.engine.hill_climb(max_iter)?.canonical();
            if self.seen.insert(pattern.clone()) {
                self.patterns.push(pattern);
            }
        }

        self.calls += calls;
        info!(
            event = "pool_built",
            calls = self.calls,
            patterns = self.patterns.len(),
        );
        Ok(&self.patterns)
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Climbs run across all `build` calls.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Counts of each catalog length per pattern; lengths a pattern does not
    /// use map to zero.
    pub fn cut_mapping(&self) -> CutMapping {
        let lengths = self.engine.catalog().lengths();
        self.patterns
            .iter()
            .enumerate()
            .map(|(id, pattern)| {
                let counts = pattern.counts();
                let row = lengths
                    .iter()
                    .map(|&len| (len, counts.get(&len).copied().unwrap_or(0)))
                    .collect();
                (id, row)
            })
            .collect()
    }

    /// Minimum number of pieces required for each length.
    pub fn demand_constraints(&self) -> BTreeMap<u32, u32> {
        self.engine.catalog().demands().clone()
    }

    pub fn lp_input(&self) -> LpInput {
        LpInput {
            stock_length: self.engine.stock_length(),
            patterns: self.patterns.clone(),
            cut_mapping: self.cut_mapping(),
            demand: self.demand_constraints(),
        }
    }
}
