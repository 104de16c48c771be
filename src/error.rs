use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The starting pattern was still open when the rejected-draw ceiling was hit.
    #[error("no starting pattern after {attempts} rejected draws")]
    ConstructionExhausted { attempts: usize },

    /// Fewer distinct feasible neighbors were found than requested.
    #[error("collected {collected} of {requested} neighbors after {attempts} attempts")]
    NeighborhoodExhausted {
        requested: usize,
        collected: usize,
        attempts: usize,
    },
}

pub type Result<T> = std::result::Result<T, PatternError>;
