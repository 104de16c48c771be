use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PatternError, Result};

/// Required cut lengths mapped to how many pieces of each are needed.
///
/// Keys are kept ordered so that sampling over them is reproducible for a
/// given random source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutCatalog {
    demands: BTreeMap<u32, u32>,
}

impl CutCatalog {
    pub fn new<I>(demands: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut map = BTreeMap::new();
        for (length, qty) in demands {
            if length == 0 {
                return Err(PatternError::InvalidCatalog(
                    "cut lengths must be non-zero".to_string(),
                ));
            }
            if map.insert(length, qty).is_some() {
                return Err(PatternError::InvalidCatalog(format!(
                    "cut length {length} listed more than once"
                )));
            }
        }
        if map.is_empty() {
            return Err(PatternError::InvalidCatalog(
                "catalog has no cut lengths".to_string(),
            ));
        }
        Ok(Self { demands: map })
    }

    /// Distinct cut lengths in ascending order.
    pub fn lengths(&self) -> Vec<u32> {
        self.demands.keys().copied().collect()
    }

    pub fn min_length(&self) -> u32 {
        // Construction rejects empty catalogs.
        self.demands.keys().next().copied().unwrap_or(0)
    }

    pub fn demand(&self, length: u32) -> Option<u32> {
        self.demands.get(&length).copied()
    }

    pub fn demands(&self) -> &BTreeMap<u32, u32> {
        &self.demands
    }

    pub fn len(&self) -> usize {
        self.demands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demands.is_empty()
    }
}

/// Cut lengths to take from a single stock piece.
///
/// Order records how the pattern was built and is otherwise meaningless;
/// use [`Pattern::canonical`] when comparing patterns as multisets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern(Vec<u32>);

impl Pattern {
    pub fn new(cuts: Vec<u32>) -> Self {
        Self(cuts)
    }

    pub fn cuts(&self) -> &[u32] {
        &self.0
    }

    pub fn into_cuts(self) -> Vec<u32> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_length(&self) -> u64 {
        self.0.iter().map(|&c| c as u64).sum()
    }

    /// Same cuts, sorted ascending.
    pub fn canonical(&self) -> Pattern {
        let mut cuts = self.0.clone();
        cuts.sort_unstable();
        Pattern(cuts)
    }

    /// Number of pieces of each length in this pattern.
    pub fn counts(&self) -> BTreeMap<u32, u32> {
        let mut counts = BTreeMap::new();
        for &cut in &self.0 {
            *counts.entry(cut).or_insert(0) += 1;
        }
        counts
    }

    pub(crate) fn push(&mut self, cut: u32) {
        self.0.push(cut);
    }

    /// Removes the first occurrence of `cut`, returning whether one was found.
    pub(crate) fn remove_one(&mut self, cut: u32) -> bool {
        match self.0.iter().position(|&c| c == cut) {
            Some(idx) => {
                self.0.remove(idx);
                true
            }
            None => false,
        }
    }
}

impl From<Vec<u32>> for Pattern {
    fn from(cuts: Vec<u32>) -> Self {
        Self(cuts)
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, cut) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{cut}")?;
        }
        write!(f, "]")
    }
}

/// Tuning knobs for a hill climb.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbConfig {
    /// Neighborhood scans allowed before the climb gives up on converging.
    pub max_iter: usize,
    /// Chance that a neighbor gets one extra add or remove move.
    pub prob_extra_move: f64,
    /// Rejected draws (cuts that would overflow the stock) allowed while
    /// building a starting pattern. Accepted draws are not counted.
    pub max_construction_attempts: usize,
    /// Candidate draws allowed while collecting one neighborhood.
    pub max_neighborhood_attempts: usize,
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self {
            max_iter: 150,
            prob_extra_move: 0.1,
            max_construction_attempts: 100_000,
            max_neighborhood_attempts: 10_000,
        }
    }
}

impl ClimbConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.prob_extra_move) {
            return Err(PatternError::InvalidConfiguration(format!(
                "prob_extra_move must be within [0, 1], got {}",
                self.prob_extra_move
            )));
        }
        if self.max_construction_attempts == 0 {
            return Err(PatternError::InvalidConfiguration(
                "max_construction_attempts must be non-zero".to_string(),
            ));
        }
        if self.max_neighborhood_attempts == 0 {
            return Err(PatternError::InvalidConfiguration(
                "max_neighborhood_attempts must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimbStatus {
    /// No neighbor improved on the returned pattern, or it was a perfect fit.
    Converged,
    /// `max_iter` ran out first; the pattern may not be a local optimum.
    Capped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClimbResult {
    pub pattern: Pattern,
    pub waste: i64,
    pub status: ClimbStatus,
    pub iterations: usize,
}
