use chrono::{DateTime, Local};
use std::fmt::{Display, Formatter};

/// Timestamp layout used both for display and in the task file (`dd/MM/yyyy HH:mm`).
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Written in place of the completion timestamp for tasks that are still pending.
pub const NOT_COMPLETED: &str = "No completada";

#[derive(Debug, Eq, PartialEq)]
pub struct Task {
    id: u32,
    description: String,
    completed: bool,
    created_at: DateTime<Local>,
    completed_at: Option<DateTime<Local>>,
}

impl Task {
    pub(crate) fn new(id: u32, description: String) -> Self {
        Self {
            id,
            description,
            completed: false,
            created_at: Local::now(),
            completed_at: None,
        }
    }

    /// Rebuilds a task read back from the task file.
    ///
    /// A completed task without a known completion time is stamped with the
    /// current time so that `completed_at` stays set for every completed task.
    pub(crate) fn restore(
        id: u32,
        description: String,
        completed: bool,
        created_at: Option<DateTime<Local>>,
        completed_at: Option<DateTime<Local>>,
    ) -> Self {
        let completed_at = if completed {
            Some(completed_at.unwrap_or_else(Local::now))
        } else {
            None
        };
        Self {
            id,
            description,
            completed,
            created_at: created_at.unwrap_or_else(Local::now),
            completed_at,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Local>> {
        self.completed_at
    }

    /// Sets the completion flag.
    ///
    /// The completion time is only stamped on the first transition to
    /// completed; resetting to pending clears it.
    pub(crate) fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
        if !completed {
            self.completed_at = None;
        } else if self.completed_at.is_none() {
            self.completed_at = Some(Local::now());
        }
    }

    pub fn created_at_formatted(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn completed_at_formatted(&self) -> String {
        self.completed_at
            .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| NOT_COMPLETED.to_string())
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let status = if self.completed {
            "✓ Completed"
        } else {
            "○ Pending"
        };
        write!(f, "[{}] {} - {}", self.id, status, self.description)
    }
}
