//! Domain-specific errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("no pick-list loaded")]
    NoPickList,
    #[error("pick-list already complete")]
    ListComplete,
    #[error("nothing has been picked yet")]
    NothingPicked,
    #[error("picked index {index} out of range for a pick-list of {len} lines")]
    IndexOutOfRange { index: i64, len: usize },
}
