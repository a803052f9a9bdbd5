//! Interactive numbered menu over the task store.
//!
//! The console loads the task file on start, runs one menu action per line of
//! input and saves the tasks when the user exits or the input ends. Failures of
//! a single action are printed. After every action except exit the console
//! waits for Enter before showing the menu again.

use crate::error::{TaskError, ValidationError};
use crate::persistence::TaskGateway;
use crate::store::{Completion, TaskStore};
use crate::task::Task;
use crate::validation::{Validator, parse_integer, validate_menu_choice};
use log::{error, warn};
use std::io::{BufRead, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error("console input/output failed")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for Error {
    fn from(error: ValidationError) -> Self {
        Self::Task(error.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Add,
    ListAll,
    Delete,
    Complete,
    ListCompleted,
    ListPending,
    Exit,
    Reopen,
}

impl MenuOption {
    pub const ALL: [MenuOption; 8] = [
        MenuOption::Add,
        MenuOption::ListAll,
        MenuOption::Delete,
        MenuOption::Complete,
        MenuOption::ListCompleted,
        MenuOption::ListPending,
        MenuOption::Exit,
        MenuOption::Reopen,
    ];

    pub fn number(self) -> i32 {
        match self {
            MenuOption::Add => 1,
            MenuOption::ListAll => 2,
            MenuOption::Delete => 3,
            MenuOption::Complete => 4,
            MenuOption::ListCompleted => 5,
            MenuOption::ListPending => 6,
            MenuOption::Exit => 7,
            MenuOption::Reopen => 8,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::Add => "Add task",
            MenuOption::ListAll => "Show all tasks",
            MenuOption::Delete => "Delete task",
            MenuOption::Complete => "Mark task as completed",
            MenuOption::ListCompleted => "Show completed tasks",
            MenuOption::ListPending => "Show pending tasks",
            MenuOption::Exit => "Exit",
            MenuOption::Reopen => "Mark task as pending",
        }
    }

    /// Parses and validates a line typed at the menu prompt.
    pub fn parse(line: &str) -> Result<Self, ValidationError> {
        let choice = parse_integer(line)?;
        let allowed: Vec<i32> = Self::ALL.iter().map(|option| option.number()).collect();
        validate_menu_choice(choice, &allowed)?;
        Self::ALL
            .into_iter()
            .find(|option| option.number() == choice)
            .ok_or(ValidationError::InvalidChoice { choice, allowed })
    }
}

/// One interactive session: owns the store, borrows the gateway.
pub struct Console<'a, G: TaskGateway, R: BufRead, W: Write> {
    gateway: &'a G,
    store: TaskStore,
    input: R,
    output: W,
}

impl<'a, G: TaskGateway, R: BufRead, W: Write> Console<'a, G, R, W> {
    pub fn new(gateway: &'a G, validator: Validator, input: R, output: W) -> Self {
        Self {
            gateway,
            store: TaskStore::new(validator),
            input,
            output,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Loads the task file, then serves the menu until exit or end of input.
    pub fn run(&mut self) -> Result<(), std::io::Error> {
        self.load_tasks()?;
        loop {
            self.print_menu()?;
            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                return self.save_tasks();
            };
            match self.handle(&line) {
                Ok(MenuOption::Exit) => return Ok(()),
                Ok(_) => {}
                Err(Error::Task(e)) => writeln!(self.output, "Error: {}", describe(&e))?,
                Err(Error::Io(e)) => return Err(e),
            }
            self.wait_for_enter()?;
        }
    }

    fn wait_for_enter(&mut self) -> Result<(), std::io::Error> {
        self.prompt("\nPress Enter to continue...")?;
        self.read_line()?;
        Ok(())
    }

    fn handle(&mut self, line: &str) -> Result<MenuOption, Error> {
        let option = MenuOption::parse(line)?;
        match option {
            MenuOption::Add => self.add_task()?,
            MenuOption::ListAll => self.show_all()?,
            MenuOption::Delete => self.delete_task()?,
            MenuOption::Complete => self.complete_task()?,
            MenuOption::ListCompleted => self.show_completed()?,
            MenuOption::ListPending => self.show_pending()?,
            MenuOption::Reopen => self.reopen_task()?,
            MenuOption::Exit => {
                writeln!(self.output, "Exiting")?;
                self.save_tasks()?;
            }
        }
        Ok(option)
    }

    fn load_tasks(&mut self) -> Result<(), std::io::Error> {
        let validator = *self.store.validator();
        match self.gateway.load() {
            Ok(tasks) => {
                self.store = TaskStore::from_tasks(validator, tasks);
                if !self.store.is_empty() {
                    writeln!(self.output, "✓ Loaded {} tasks from file.", self.store.len())?;
                }
            }
            Err(e) => {
                warn!("Starting with an empty task list: {e}");
                writeln!(self.output, "Warning: {}", describe(&e))?;
                writeln!(self.output, "Starting with an empty task list.")?;
            }
        }
        Ok(())
    }

    fn save_tasks(&mut self) -> Result<(), std::io::Error> {
        match self.gateway.save(self.store.tasks()) {
            Ok(()) => writeln!(self.output, "✓ Tasks saved to file."),
            Err(e) => {
                error!("Saving tasks failed: {e}");
                writeln!(self.output, "Error saving tasks: {}", describe(&e))
            }
        }
    }

    fn print_menu(&mut self) -> Result<(), std::io::Error> {
        writeln!(self.output, "\n=== TASK MENU ===")?;
        for option in MenuOption::ALL {
            writeln!(self.output, "{}. {}", option.number(), option.label())?;
        }
        self.prompt("Choose an option: ")
    }

    fn add_task(&mut self) -> Result<(), Error> {
        writeln!(self.output, "\n=== NEW TASK ===")?;
        self.prompt("Enter the task description: ")?;
        let description = self.read_line()?.unwrap_or_default();
        let task = self.store.add(&description)?;
        writeln!(self.output, "✓ Task created with ID {}", task.id())?;
        Ok(())
    }

    fn delete_task(&mut self) -> Result<(), Error> {
        writeln!(self.output, "\n=== DELETE TASK ===")?;
        self.show_all()?;
        if self.store.is_empty() {
            writeln!(self.output, "No tasks to delete.")?;
            return Ok(());
        }
        let id = self.read_id("Enter the ID of the task to delete: ")?;
        let task = self.store.delete(id)?;
        writeln!(self.output, "✓ Task deleted: {}", task.description())?;
        Ok(())
    }

    fn complete_task(&mut self) -> Result<(), Error> {
        writeln!(self.output, "\n=== COMPLETE TASK ===")?;
        self.show_pending()?;
        if self.store.list_pending().is_empty() {
            writeln!(self.output, "No pending tasks to mark as completed.")?;
            return Ok(());
        }
        let id = self.read_id("Enter the ID of the task to mark as completed: ")?;
        match self.store.mark_completed(id)? {
            Completion::Completed(task) => writeln!(
                self.output,
                "✓ Task '{}' marked as completed",
                task.description()
            )?,
            Completion::AlreadyCompleted(_) => {
                writeln!(self.output, "This task is already completed.")?
            }
        }
        Ok(())
    }

    fn reopen_task(&mut self) -> Result<(), Error> {
        writeln!(self.output, "\n=== REOPEN TASK ===")?;
        self.show_completed()?;
        if self.store.list_completed().is_empty() {
            writeln!(self.output, "No completed tasks to mark as pending.")?;
            return Ok(());
        }
        let id = self.read_id("Enter the ID of the task to mark as pending: ")?;
        let task = self.store.mark_pending(id)?;
        writeln!(
            self.output,
            "✓ Task '{}' marked as pending",
            task.description()
        )?;
        Ok(())
    }

    fn show_all(&mut self) -> Result<(), std::io::Error> {
        let tasks = self.store.list_all();
        write_section(&mut self.output, "ALL TASKS", &tasks, "No tasks recorded.")
    }

    fn show_completed(&mut self) -> Result<(), std::io::Error> {
        let tasks = self.store.list_completed();
        write_section(&mut self.output, "COMPLETED TASKS", &tasks, "No completed tasks.")
    }

    fn show_pending(&mut self) -> Result<(), std::io::Error> {
        let tasks = self.store.list_pending();
        write_section(&mut self.output, "PENDING TASKS", &tasks, "No pending tasks.")
    }

    fn read_id(&mut self, prompt: &str) -> Result<i32, Error> {
        self.prompt(prompt)?;
        let line = self.read_line()?.unwrap_or_default();
        Ok(parse_integer(&line)?)
    }

    fn prompt(&mut self, text: &str) -> Result<(), std::io::Error> {
        write!(self.output, "{text}")?;
        self.output.flush()
    }

    /// Next input line without its line ending, `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>, std::io::Error> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

fn write_section(
    output: &mut impl Write,
    title: &str,
    tasks: &[&Task],
    empty_message: &str,
) -> Result<(), std::io::Error> {
    writeln!(output, "\n=== {title} ===")?;
    if tasks.is_empty() {
        return writeln!(output, "{empty_message}");
    }
    for task in tasks {
        writeln!(output, "{task}")?;
    }
    Ok(())
}

/// Message of an error followed by the messages of its sources.
fn describe(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
