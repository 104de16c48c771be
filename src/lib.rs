pub mod construct;
pub mod error;
pub mod hill_climb;
pub mod neighborhood;
pub mod pool;
pub mod render;
pub mod types;

pub use error::{PatternError, Result};
pub use hill_climb::CutsHillClimb;
pub use pool::{LpInput, PatternPool};
pub use types::{ClimbConfig, ClimbResult, ClimbStatus, CutCatalog, Pattern};
