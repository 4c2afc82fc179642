//! Cell family and port classification error handling.

use thiserror::Error;

use super::Family;

/// An error type for the classification API.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ClassifyError {
    #[error("unknown cell type: `{0}`")]
    UnknownCellFamily(String),

    #[error("unknown port `{port}` in cell family `{family}`")]
    UnknownPort { port: String, family: Family },
}
