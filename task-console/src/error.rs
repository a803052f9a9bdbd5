//! Error taxonomy shared by the validator, the store and the persistence gateway.

use std::path::PathBuf;
use thiserror::Error;

/// Bad user input, rejected before anything is mutated.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("the description cannot be empty")]
    Empty,
    #[error("the description cannot be longer than {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
    #[error("the ID must be a positive number greater than 0 (got {0})")]
    NonPositive(i32),
    #[error("invalid option {choice}, valid options are: {allowed:?}")]
    InvalidChoice { choice: i32, allowed: Vec<i32> },
    #[error("'{0}' is not a valid whole number")]
    NotANumber(String),
}

/// Failures reading or writing the task file.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("could not load tasks from {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not save tasks to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not load tasks from {}: line {line} has a malformed id '{value}'", path.display())]
    MalformedId {
        path: PathBuf,
        line: usize,
        value: String,
        #[source]
        source: ValidationError,
    },
}

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("validation error")]
    Validation(#[from] ValidationError),
    #[error("no task found with ID {0}")]
    NotFound(u32),
    #[error("no task IDs left, the highest ID is {0}")]
    IdsExhausted(u32),
    #[error("persistence error")]
    Persistence(#[from] PersistenceError),
}
