use thiserror::Error;

/// Result type alias for all solver entry points.
pub type Result<T> = std::result::Result<T, SolveError>;

/// Errors that can occur while validating an instance or solving it.
///
/// Exhausting a time or node budget is not an error: the best solution found so far is
/// returned, tagged with [`SolveStatus::BudgetExhausted`](crate::entities::SolveStatus::BudgetExhausted).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// An item with a non-positive size.
    #[error("item {id} has a non-positive size: {size}")]
    InvalidItem { id: usize, size: i64 },

    /// A bin capacity, stock length or sheet dimension that is not positive.
    #[error("capacity must be positive, got {0}")]
    InvalidCapacity(i64),

    /// Structurally malformed input.
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// A single item is larger than the bin (or roll, or sheet) it has to go into.
    #[error("item {id} of size {size} exceeds the capacity of {capacity}")]
    ItemExceedsCapacity { id: usize, size: u64, capacity: u64 },

    /// The problem cannot be solved, not even in principle.
    #[error("infeasible: {0}")]
    Infeasible(String),

    /// The underlying optimization engine failed to produce a solution.
    #[error("solver failure: {0}")]
    SolverFailure(String),
}

#[cfg(feature = "lp")]
impl From<good_lp::ResolutionError> for SolveError {
    fn from(err: good_lp::ResolutionError) -> Self {
        match err {
            good_lp::ResolutionError::Infeasible => {
                SolveError::Infeasible("the LP engine proved the model infeasible".into())
            }
            other => SolveError::SolverFailure(other.to_string()),
        }
    }
}
