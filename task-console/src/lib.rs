//! Personal task list managed from an interactive console menu and kept in a
//! pipe-delimited text file between runs.

pub mod config;
pub mod console;
pub mod error;
pub mod persistence;
pub mod store;
pub mod task;
pub mod validation;

pub use error::{PersistenceError, TaskError, ValidationError};
pub use persistence::{TaskGateway, TextFileGateway};
pub use store::{Completion, TaskStore};
pub use task::Task;
pub use validation::Validator;
