pub mod error;
pub mod policy;
pub mod pool;
pub mod solver_state;

pub use error::{PolicyError, Result};
pub use pool::{Arch, DepId, Pool, Repository, RepoId, RepoKind, Solvable, SolvableId, Vendor};
pub use solver_state::{PolicyFlags, SolverState};
