use crate::error::TaskError;
use crate::task::Task;
use crate::validation::{MAX_TASK_ID, Validator, validate_id};
use log::{debug, warn};

/// Result of asking the store to complete a task.
#[derive(Debug, PartialEq, Eq)]
pub enum Completion<'a> {
    Completed(&'a Task),
    AlreadyCompleted(&'a Task),
}

impl<'a> Completion<'a> {
    pub fn task(&self) -> &'a Task {
        match *self {
            Completion::Completed(task) | Completion::AlreadyCompleted(task) => task,
        }
    }
}

/// In-memory tasks of one session, kept in insertion order.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u32,
    validator: Validator,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new(Validator::default())
    }
}

impl TaskStore {
    pub fn new(validator: Validator) -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            validator,
        }
    }

    /// Seeds a store with tasks read from persistence.
    ///
    /// Ids resume after the highest loaded id. A task repeating an id already
    /// seen, or with an id outside `1..=MAX_TASK_ID`, is dropped.
    pub fn from_tasks(validator: Validator, loaded: Vec<Task>) -> Self {
        let mut store = Self::new(validator);
        for task in loaded {
            if !(1..=MAX_TASK_ID).contains(&task.id()) {
                warn!("Dropping task with out of range ID {}", task.id());
                continue;
            }
            if store.find_by_id(task.id()).is_some() {
                warn!("Dropping task with duplicate ID {}", task.id());
                continue;
            }
            store.next_id = store.next_id.max(task.id() + 1);
            store.tasks.push(task);
        }
        store
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn add(&mut self, description: &str) -> Result<&Task, TaskError> {
        self.validator.validate_description(description)?;
        let curr_id = self.next_id;
        if curr_id > MAX_TASK_ID {
            return Err(TaskError::IdsExhausted(MAX_TASK_ID));
        }
        self.tasks.push(Task::new(curr_id, description.to_string()));
        self.next_id += 1;
        debug!("Added task {curr_id}");
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn delete(&mut self, id: i32) -> Result<Task, TaskError> {
        let id = validate_id(id)?;
        let index = self.position(id)?;
        debug!("Deleted task {id}");
        Ok(self.tasks.remove(index))
    }

    pub fn mark_completed(&mut self, id: i32) -> Result<Completion<'_>, TaskError> {
        let id = validate_id(id)?;
        let index = self.position(id)?;
        let task = &mut self.tasks[index];
        if task.is_completed() {
            return Ok(Completion::AlreadyCompleted(task));
        }
        task.set_completed(true);
        debug!("Completed task {id}");
        Ok(Completion::Completed(task))
    }

    pub fn mark_pending(&mut self, id: i32) -> Result<&Task, TaskError> {
        let id = validate_id(id)?;
        let index = self.position(id)?;
        let task = &mut self.tasks[index];
        task.set_completed(false);
        debug!("Reopened task {id}");
        Ok(task)
    }

    pub fn find_by_id(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn list_all(&self) -> Vec<&Task> {
        self.tasks.iter().collect()
    }

    pub fn list_completed(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.is_completed()).collect()
    }

    pub fn list_pending(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| !task.is_completed()).collect()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    fn position(&self, id: u32) -> Result<usize, TaskError> {
        self.tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or(TaskError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn ids(tasks: &[&Task]) -> Vec<u32> {
        tasks.iter().map(|task| task.id()).collect()
    }

    #[test]
    fn test_add_task() {
        // Arrange
        let mut store = TaskStore::default();

        // Act
        let task = store.add("Test task").unwrap();

        // Assert
        assert_eq!(task.id(), 1);
        assert_eq!(task.description(), "Test task");
        assert!(!task.is_completed());
        assert_eq!(store.len(), 1);
        assert!(store.find_by_id(1).is_some());
    }

    #[test]
    fn test_add_rejects_blank_descriptions() {
        let mut store = TaskStore::default();

        for description in ["", "   "] {
            let result = store.add(description);
            assert!(matches!(
                result,
                Err(TaskError::Validation(ValidationError::Empty))
            ));
        }

        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1, "rejected adds must not consume ids");
    }

    #[test]
    fn test_add_rejects_too_long_description() {
        let mut store = TaskStore::default();

        let result = store.add(&"a".repeat(201));

        assert!(matches!(
            result,
            Err(TaskError::Validation(ValidationError::TooLong { .. }))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_returns_removed_task() {
        let mut store = TaskStore::default();
        store.add("Task 1").unwrap();
        store.add("Task 2").unwrap();

        let removed = store.delete(1).unwrap();

        assert_eq!(removed.id(), 1);
        assert_eq!(removed.description(), "Task 1");
        assert_eq!(ids(&store.list_all()), vec![2]);
    }

    #[test]
    fn test_delete_unknown_id_is_not_found() {
        let mut store = TaskStore::default();
        store.add("Task 1").unwrap();

        assert!(matches!(store.delete(9), Err(TaskError::NotFound(9))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_validates_id() {
        let mut store = TaskStore::default();

        assert!(matches!(
            store.delete(0),
            Err(TaskError::Validation(ValidationError::NonPositive(0)))
        ));
    }

    #[test]
    fn test_mark_completed_sets_flag_and_timestamp() {
        let mut store = TaskStore::default();
        store.add("Task 1").unwrap();

        let completion = store.mark_completed(1).unwrap();

        assert!(matches!(completion, Completion::Completed(_)));
        assert!(completion.task().is_completed());
        assert!(completion.task().completed_at().is_some());
    }

    #[test]
    fn test_mark_completed_twice_keeps_completion_time() {
        let mut store = TaskStore::default();
        store.add("Task 1").unwrap();
        let first = store.mark_completed(1).unwrap().task().completed_at();

        let completion = store.mark_completed(1).unwrap();

        assert!(matches!(completion, Completion::AlreadyCompleted(_)));
        assert_eq!(completion.task().completed_at(), first);
    }

    #[test]
    fn test_mark_completed_unknown_id_is_not_found() {
        let mut store = TaskStore::default();

        assert!(matches!(
            store.mark_completed(3),
            Err(TaskError::NotFound(3))
        ));
    }

    #[test]
    fn test_mark_pending_clears_completion() {
        let mut store = TaskStore::default();
        store.add("Task 1").unwrap();
        store.mark_completed(1).unwrap();

        let task = store.mark_pending(1).unwrap();

        assert!(!task.is_completed());
        assert_eq!(task.completed_at(), None);
        assert!(matches!(store.mark_pending(2), Err(TaskError::NotFound(2))));
    }

    #[test]
    fn test_listing_by_status_preserves_order() {
        // Arrange
        let mut store = TaskStore::default();
        store.add("Buy milk").unwrap();
        store.add("Pay bills").unwrap();
        store.add("Walk dog").unwrap();

        // Act
        store.mark_completed(3).unwrap();
        store.mark_completed(1).unwrap();

        // Assert
        assert_eq!(ids(&store.list_all()), vec![1, 2, 3]);
        assert_eq!(ids(&store.list_completed()), vec![1, 3]);
        assert_eq!(ids(&store.list_pending()), vec![2]);
    }

    #[test]
    fn test_walkthrough_example() {
        let mut store = TaskStore::default();

        assert_eq!(store.add("Buy milk").unwrap().id(), 1);
        assert_eq!(store.add("Pay bills").unwrap().id(), 2);
        store.mark_completed(1).unwrap();

        assert!(store.find_by_id(1).unwrap().is_completed());
        assert!(!store.find_by_id(2).unwrap().is_completed());
        assert_eq!(ids(&store.list_pending()), vec![2]);

        store.delete(2).unwrap();
        assert_eq!(ids(&store.list_all()), vec![1]);
    }

    mod next_id_tests {
        use super::*;

        #[test]
        fn test_new_store_starts_with_id_one() {
            let store = TaskStore::default();
            assert_eq!(store.next_id(), 1, "New store should start with next_id = 1");
        }

        #[test]
        fn test_next_id_increments_correctly_for_multiple_tasks() {
            let mut store = TaskStore::default();

            let id1 = store.add("Task 1").unwrap().id();
            let id2 = store.add("Task 2").unwrap().id();
            let id3 = store.add("Task 3").unwrap().id();

            assert_eq!((id1, id2, id3), (1, 2, 3));
            assert_eq!(store.next_id(), 4, "next_id should be incremented to 4");
        }

        #[test]
        fn test_next_id_maintained_after_removing_tasks() {
            let mut store = TaskStore::default();
            store.add("Task 1").unwrap();
            store.add("Task 2").unwrap();
            store.add("Task 3").unwrap();

            store.delete(3).unwrap();
            let id = store.add("Task 4").unwrap().id();

            assert_eq!(id, 4, "New task should get ID 4, not reuse the removed ID 3");
        }

        #[test]
        fn test_seeded_store_resumes_after_max_id() {
            let loaded = vec![
                Task::restore(4, "Task 4".to_string(), false, None, None),
                Task::restore(9, "Task 9".to_string(), true, None, None),
                Task::restore(2, "Task 2".to_string(), false, None, None),
            ];

            let mut store = TaskStore::from_tasks(Validator::default(), loaded);

            assert_eq!(store.next_id(), 10);
            assert_eq!(ids(&store.list_all()), vec![4, 9, 2]);
            assert_eq!(store.add("Task 10").unwrap().id(), 10);
        }

        #[test]
        fn test_seeded_store_drops_duplicate_ids() {
            let loaded = vec![
                Task::restore(1, "first".to_string(), false, None, None),
                Task::restore(1, "second".to_string(), false, None, None),
            ];

            let store = TaskStore::from_tasks(Validator::default(), loaded);

            assert_eq!(store.len(), 1);
            assert_eq!(store.find_by_id(1).unwrap().description(), "first");
        }

        #[test]
        fn test_add_after_highest_id_is_refused() {
            let loaded = vec![Task::restore(MAX_TASK_ID, "last".to_string(), false, None, None)];
            let mut store = TaskStore::from_tasks(Validator::default(), loaded);

            let result = store.add("one too many");

            assert!(matches!(result, Err(TaskError::IdsExhausted(MAX_TASK_ID))));
            assert!(matches!(store.add("again"), Err(TaskError::IdsExhausted(_))));
            assert_eq!(store.len(), 1);
            assert_eq!(store.list_all()[0].id(), MAX_TASK_ID);
        }

        #[test]
        fn test_seeded_store_drops_unaddressable_ids() {
            let loaded = vec![
                Task::restore(0, "zero".to_string(), false, None, None),
                Task::restore(u32::MAX, "huge".to_string(), false, None, None),
                Task::restore(2, "two".to_string(), false, None, None),
            ];

            let mut store = TaskStore::from_tasks(Validator::default(), loaded);

            assert_eq!(ids(&store.list_all()), vec![2]);
            assert_eq!(store.add("three").unwrap().id(), 3);
        }

        #[test]
        fn test_empty_seed_starts_with_id_one() {
            let store = TaskStore::from_tasks(Validator::default(), Vec::new());
            assert_eq!(store.next_id(), 1);
        }
    }
}
