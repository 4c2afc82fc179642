//! Layout parsing error handling.

use thiserror::Error;

/// An error type for reading layout descriptions.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum LayoutError {
    #[error("malformed `{kind}` record on line {line}: `{record}`")]
    MalformedRecord {
        kind: &'static str,
        line: usize,
        record: String,
    },

    #[error("layout of cell `{0}` contains no bounding geometry")]
    NoGeometry(String),
}
