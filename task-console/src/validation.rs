//! Pure checks applied to user input before the store is touched.

use crate::error::ValidationError;

pub const DEFAULT_MAX_DESCRIPTION_LENGTH: usize = 200;

/// Highest id the menu can address, since typed ids parse as `i32`.
pub const MAX_TASK_ID: u32 = i32::MAX as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    max_description_length: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DESCRIPTION_LENGTH)
    }
}

impl Validator {
    pub fn new(max_description_length: usize) -> Self {
        Self {
            max_description_length,
        }
    }

    /// Rejects blank descriptions and descriptions over the configured length.
    ///
    /// Blankness is judged on the trimmed text, length on the raw text.
    pub fn validate_description(&self, text: &str) -> Result<(), ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::Empty);
        }
        let length = text.chars().count();
        if length > self.max_description_length {
            return Err(ValidationError::TooLong {
                max: self.max_description_length,
                actual: length,
            });
        }
        Ok(())
    }
}

/// Checks that an id typed by the user can name a task.
pub fn validate_id(id: i32) -> Result<u32, ValidationError> {
    u32::try_from(id)
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ValidationError::NonPositive(id))
}

pub fn validate_menu_choice(choice: i32, allowed: &[i32]) -> Result<(), ValidationError> {
    if allowed.contains(&choice) {
        Ok(())
    } else {
        Err(ValidationError::InvalidChoice {
            choice,
            allowed: allowed.to_vec(),
        })
    }
}

pub fn parse_integer(text: &str) -> Result<i32, ValidationError> {
    let trimmed = text.trim();
    trimmed
        .parse::<i32>()
        .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))
}
