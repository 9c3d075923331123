use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("{field} value {value:?} is not a number")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field} value {value:?} must not be negative")]
    NegativeNumber { field: &'static str, value: String },
    #[error("{what} is too large to compute")]
    Overflow { what: String },
    #[error("portfolio {name:?} has no value to allocate")]
    EmptyPortfolio { name: String },
    #[error("classification line {line}: {reason}")]
    MalformedClassification { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
