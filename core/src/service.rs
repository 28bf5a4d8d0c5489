//! In-memory todo store and the request operations over it.
//!
//! # Design
//! `TodoService` owns everything a request can touch: the todos (kept in
//! insertion order), the creation counter and the `ActivityLog`. Operations
//! take raw query strings so validation and its logging side effects live in
//! one place. Every failure goes through `fail`, which logs the message on the
//! todo channel and raises that channel to `ERROR` until the next request.
//!
//! The service never reads the clock; `create` takes `now` from the caller.

use feruca::{Collator, Tailoring};
use tracing::{debug, error, info};

use crate::activity::{ActivityLog, Channel, ChannelLevels, LevelSink, LogLevel, REQUEST_TARGET, TODO_TARGET};
use crate::error::TodoError;
use crate::types::{NewTodo, SortBy, StatusFilter, Todo, TodoStatus};

#[derive(Debug, Default)]
pub struct TodoService {
    todos: Vec<Todo>,
    created: u64,
    log: ActivityLog,
}

impl TodoService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service whose channel level changes are enforced by `sink`.
    pub fn with_sink(sink: Box<dyn LevelSink>) -> Self {
        Self {
            todos: Vec::new(),
            created: 0,
            log: ActivityLog::new(sink),
        }
    }

    /// Registers an incoming request and returns its number.
    pub fn begin_request(&mut self, resource: &str, method: &str) -> u64 {
        let number = self.log.begin_request();
        info!(
            target: REQUEST_TARGET,
            "Incoming request | #{number} | resource: {resource} | HTTP Verb {method}"
        );
        number
    }

    pub fn create(&mut self, input: NewTodo, now: i64) -> Result<u64, TodoError> {
        if self.todos.iter().any(|todo| todo.title == input.title) {
            return Err(self.fail(TodoError::TitleExists(input.title)));
        }
        if input.due_date <= now {
            return Err(self.fail(TodoError::DueDateInPast));
        }

        let id = self.created + 1;
        info!(target: TODO_TARGET, "Creating new TODO with Title [{}]", input.title);
        debug!(
            target: TODO_TARGET,
            "Currently there are {} TODOs in the system. New TODO will be assigned with id {id}",
            self.todos.len()
        );

        self.created = id;
        self.todos.push(Todo {
            id,
            title: input.title,
            content: input.content,
            due_date: input.due_date,
            status: TodoStatus::Pending,
        });
        Ok(id)
    }

    pub fn count_by_status(&mut self, status: &str) -> Result<usize, TodoError> {
        let filter = self.parse_filter(status)?;
        let count = self.todos.iter().filter(|t| filter.matches(t.status)).count();
        info!(target: TODO_TARGET, "Total TODOs count for state {filter} is {count}");
        Ok(count)
    }

    pub fn list_by_status(&mut self, status: &str, sort_by: &str) -> Result<Vec<Todo>, TodoError> {
        let filter = self.parse_filter(status)?;
        let sort_by: SortBy = match sort_by.parse() {
            Ok(sort_by) => sort_by,
            Err(()) => return Err(self.fail(TodoError::InvalidSortBy)),
        };

        let mut selected: Vec<Todo> = self
            .todos
            .iter()
            .filter(|t| filter.matches(t.status))
            .cloned()
            .collect();
        // `sort_by` is stable, so ties keep insertion order.
        match sort_by {
            SortBy::Id => selected.sort_by_key(|t| t.id),
            SortBy::DueDate => selected.sort_by_key(|t| t.due_date),
            SortBy::Title => {
                let mut collator = title_collator();
                selected.sort_by(|a, b| collator.collate(&a.title, &b.title));
            }
        }

        info!(target: TODO_TARGET, "Extracting todos content. Filter: {filter} | Sorting by: {sort_by}");
        debug!(
            target: TODO_TARGET,
            "There are a total of {} todos in the system. The result holds {} todos",
            self.todos.len(),
            selected.len()
        );
        Ok(selected)
    }

    /// Sets a new status and returns the one it replaced. `ALL` is a filter,
    /// not a status, and is rejected like any other unknown value.
    pub fn update_status(&mut self, id: &str, status: &str) -> Result<TodoStatus, TodoError> {
        let status: TodoStatus = match status.parse() {
            Ok(status) => status,
            Err(()) => return Err(self.fail(TodoError::InvalidStatus)),
        };
        let index = self.position(id)?;

        let todo = &mut self.todos[index];
        let old = std::mem::replace(&mut todo.status, status);
        info!(target: TODO_TARGET, "Update TODO id [{}] state to {status}", todo.id);
        debug!(target: TODO_TARGET, "Todo id [{}] state change: {old} --> {status}", todo.id);
        Ok(old)
    }

    /// Removes a todo and returns how many remain.
    pub fn delete(&mut self, id: &str) -> Result<usize, TodoError> {
        let index = self.position(id)?;
        let removed = self.todos.remove(index);
        info!(target: TODO_TARGET, "Removing todo id {}", removed.id);
        debug!(
            target: TODO_TARGET,
            "After removing todo id [{}] there are {} TODOs in the system",
            removed.id,
            self.todos.len()
        );
        Ok(self.todos.len())
    }

    pub fn logger_level(&mut self, logger_name: &str) -> Result<LogLevel, TodoError> {
        let channel = self.parse_channel(logger_name)?;
        Ok(self.log.level(channel))
    }

    pub fn set_logger_level(&mut self, logger_name: &str, level: &str) -> Result<LogLevel, TodoError> {
        let channel = self.parse_channel(logger_name)?;
        let level: LogLevel = match level.parse() {
            Ok(level) => level,
            Err(()) => return Err(self.fail(TodoError::UnknownLevel)),
        };
        self.log.set_level(channel, level);
        Ok(level)
    }

    /// Records a failure detected outside the service, such as a body that
    /// could not be decoded.
    pub fn reject(&mut self, err: TodoError) -> TodoError {
        self.fail(err)
    }

    pub fn levels(&self) -> ChannelLevels {
        self.log.levels()
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    fn fail(&mut self, err: TodoError) -> TodoError {
        error!(target: TODO_TARGET, "{err}");
        self.log.alert(Channel::Todo);
        err
    }

    fn parse_filter(&mut self, status: &str) -> Result<StatusFilter, TodoError> {
        status.parse::<StatusFilter>().map_err(|()| self.fail(TodoError::InvalidStatus))
    }

    fn parse_channel(&mut self, logger_name: &str) -> Result<Channel, TodoError> {
        logger_name.parse::<Channel>().map_err(|()| self.fail(TodoError::UnknownLogger))
    }

    fn position(&mut self, id: &str) -> Result<usize, TodoError> {
        let found = leading_id(id).and_then(|id| self.todos.iter().position(|t| t.id == id));
        match found {
            Some(index) => Ok(index),
            None => Err(self.fail(TodoError::NoSuchTodo(id.to_string()))),
        }
    }
}

/// Reads the integer an id parameter starts with. Leading whitespace and an
/// optional `+` are skipped, a `0x` prefix switches to hex, and everything
/// after the digits is ignored, so `"1.5"` and `"1abc"` both name todo 1.
fn leading_id(raw: &str) -> Option<u64> {
    let digits = raw.trim_start();
    let digits = digits.strip_prefix('+').unwrap_or(digits);
    let (digits, radix) = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (digits, 10),
    };
    let end = digits.find(|c: char| !c.is_digit(radix)).unwrap_or(digits.len());
    u64::from_str_radix(&digits[..end], radix).ok()
}

/// Root-locale Unicode collation for titles. Punctuation is not ignorable,
/// so it sorts ahead of letters; accents and case only break ties, with the
/// lowercase form first.
fn title_collator() -> Collator {
    Collator::new(Tailoring::default(), false, true)
}
