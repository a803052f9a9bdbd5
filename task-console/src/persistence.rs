//! Text file persistence for the task store.
//!
//! Each task is written on its own line as pipe-delimited fields:
//!
//! ```text
//! id|description|completed|created_at|completed_at
//! ```
//!
//! Timestamps use `dd/MM/yyyy HH:mm`, and a pending task carries the literal
//! `No completada` in the last field. Backslashes, pipes and line breaks inside
//! a description are escaped with a backslash so any description survives a
//! save and load.

use crate::error::{PersistenceError, ValidationError};
use crate::task::{TIMESTAMP_FORMAT, Task};
use crate::validation::validate_id;
use chrono::{DateTime, Local, NaiveDateTime};
use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

pub const DEFAULT_TASK_FILE: &str = "tareas.txt";

const DELIMITER: char = '|';
const ESCAPE: char = '\\';
/// Lines with fewer fields than this are not tasks.
const MIN_FIELDS: usize = 3;

/// Loads and saves the whole task list.
#[cfg_attr(test, mockall::automock)]
pub trait TaskGateway {
    /// Reads every persisted task, in file order. A missing file is an empty list.
    fn load(&self) -> Result<Vec<Task>, PersistenceError>;

    /// Replaces the persisted tasks with `tasks`.
    fn save(&self, tasks: &[Task]) -> Result<(), PersistenceError>;
}

/// [`TaskGateway`] backed by a line-oriented text file.
#[derive(Debug, Clone)]
pub struct TextFileGateway {
    path: PathBuf,
}

impl TextFileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl TaskGateway for TextFileGateway {
    fn load(&self) -> Result<Vec<Task>, PersistenceError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No task file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.read_error(e)),
        };

        let mut tasks = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.read_error(e))?;
            let line_number = index + 1;
            match parse_line(&line) {
                Ok(Some(task)) => tasks.push(task),
                Ok(None) => {
                    if !line.trim().is_empty() {
                        warn!("Skipping line {line_number}: not enough fields");
                    }
                }
                Err((value, source)) => {
                    return Err(PersistenceError::MalformedId {
                        path: self.path.clone(),
                        line: line_number,
                        value,
                        source,
                    });
                }
            }
        }
        info!("Loaded {} tasks from {}", tasks.len(), self.path.display());
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> Result<(), PersistenceError> {
        let file = File::create(&self.path).map_err(|e| self.write_error(e))?;
        let mut writer = BufWriter::new(file);
        for task in tasks {
            writeln!(writer, "{}", format_line(task)).map_err(|e| self.write_error(e))?;
        }
        writer.flush().map_err(|e| self.write_error(e))?;
        info!("Saved {} tasks to {}", tasks.len(), self.path.display());
        Ok(())
    }
}

pub fn format_line(task: &Task) -> String {
    format!(
        "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
        task.id(),
        escape(task.description()),
        task.is_completed(),
        task.created_at_formatted(),
        task.completed_at_formatted(),
    )
}

/// Parses one line of the task file.
///
/// Returns `Ok(None)` for lines that do not hold a task, and the offending
/// text with the reason when the id field is not a positive 32-bit number.
pub fn parse_line(line: &str) -> Result<Option<Task>, (String, ValidationError)> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    let fields = split_fields(line);
    if fields.len() < MIN_FIELDS {
        return Ok(None);
    }

    let id = fields[0]
        .parse::<i32>()
        .map_err(|_| ValidationError::NotANumber(fields[0].clone()))
        .and_then(validate_id)
        .map_err(|e| (fields[0].clone(), e))?;
    let completed = fields[2].eq_ignore_ascii_case("true");
    let created_at = fields.get(3).and_then(|field| parse_timestamp(field));
    let completed_at = fields.get(4).and_then(|field| parse_timestamp(field));

    Ok(Some(Task::restore(
        id,
        fields[1].clone(),
        completed,
        created_at,
        completed_at,
    )))
}

fn parse_timestamp(field: &str) -> Option<DateTime<Local>> {
    NaiveDateTime::parse_from_str(field, TIMESTAMP_FORMAT)
        .ok()?
        .and_local_timezone(Local)
        .earliest()
}

fn escape(description: &str) -> String {
    let mut escaped = String::with_capacity(description.len());
    for c in description.chars() {
        match c {
            ESCAPE | DELIMITER => {
                escaped.push(ESCAPE);
                escaped.push(c);
            }
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Splits on unescaped delimiters and unescapes each field.
///
/// Trailing empty fields are dropped, so `1|desc|` has two fields.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            ESCAPE => match chars.next() {
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                Some(other) => current.push(other),
                None => current.push(ESCAPE),
            },
            DELIMITER => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    while fields.last().is_some_and(|field| field.is_empty()) {
        fields.pop();
    }
    fields
}
