//! Named log channels with runtime-adjustable verbosity.
//!
//! # Design
//! The service emits `tracing` events under two fixed targets, one per
//! channel. `ActivityLog` only tracks which level each channel is at and
//! pushes every change to a `LevelSink`; whoever owns the subscriber decides
//! how to enforce it. The core ships `NoopSink` so it stays usable (and
//! testable) without any subscriber installed.

use std::fmt;
use std::str::FromStr;

/// `tracing` target for request bookkeeping events.
pub const REQUEST_TARGET: &str = "request";
/// `tracing` target for todo lifecycle events.
pub const TODO_TARGET: &str = "todo";

/// A log channel addressable by name through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Request,
    Todo,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Request, Channel::Todo];

    /// Public name used by the `loggerName` query parameter.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Request => "request-logger",
            Channel::Todo => "todo-logger",
        }
    }

    pub fn target(self) -> &'static str {
        match self {
            Channel::Request => REQUEST_TARGET,
            Channel::Todo => TODO_TARGET,
        }
    }

    pub fn default_level(self) -> LogLevel {
        match self {
            Channel::Request => LogLevel::Info,
            Channel::Todo => LogLevel::Debug,
        }
    }
}

impl FromStr for Channel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL.into_iter().find(|c| c.name() == s).ok_or(())
    }
}

/// Verbosity a channel can be set to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Debug,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing` filters.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Error => "ERROR",
        })
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(()),
        }
    }
}

/// Current level of every channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLevels {
    pub request: LogLevel,
    pub todo: LogLevel,
}

impl ChannelLevels {
    pub fn get(&self, channel: Channel) -> LogLevel {
        match channel {
            Channel::Request => self.request,
            Channel::Todo => self.todo,
        }
    }

    fn set(&mut self, channel: Channel, level: LogLevel) {
        match channel {
            Channel::Request => self.request = level,
            Channel::Todo => self.todo = level,
        }
    }

    fn any_alerted(&self) -> bool {
        self.request == LogLevel::Error || self.todo == LogLevel::Error
    }
}

impl Default for ChannelLevels {
    fn default() -> Self {
        Self {
            request: Channel::Request.default_level(),
            todo: Channel::Todo.default_level(),
        }
    }
}

/// Receives every channel level change.
pub trait LevelSink: Send + Sync {
    fn apply(&self, levels: ChannelLevels);
}

/// Sink that enforces nothing.
#[derive(Debug, Default)]
pub struct NoopSink;

impl LevelSink for NoopSink {
    fn apply(&self, _levels: ChannelLevels) {}
}

pub struct ActivityLog {
    levels: ChannelLevels,
    requests: u64,
    sink: Box<dyn LevelSink>,
}

impl ActivityLog {
    pub fn new(sink: Box<dyn LevelSink>) -> Self {
        let levels = ChannelLevels::default();
        sink.apply(levels);
        Self {
            levels,
            requests: 0,
            sink,
        }
    }

    pub fn levels(&self) -> ChannelLevels {
        self.levels
    }

    pub fn level(&self, channel: Channel) -> LogLevel {
        self.levels.get(channel)
    }

    pub fn set_level(&mut self, channel: Channel, level: LogLevel) {
        self.levels.set(channel, level);
        self.sink.apply(self.levels);
    }

    /// Flags `channel` after a failure. Cleared by the next `begin_request`.
    pub fn alert(&mut self, channel: Channel) {
        self.set_level(channel, LogLevel::Error);
    }

    /// Starts a new request and returns its number, counting from 1.
    ///
    /// If any channel is still alerted from an earlier failure, every
    /// channel goes back to its default level first.
    pub fn begin_request(&mut self) -> u64 {
        if self.levels.any_alerted() {
            self.levels = ChannelLevels::default();
            self.sink.apply(self.levels);
        }
        self.requests += 1;
        self.requests
    }

    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(Box::new(NoopSink))
    }
}

impl fmt::Debug for ActivityLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityLog")
            .field("levels", &self.levels)
            .field("requests", &self.requests)
            .finish_non_exhaustive()
    }
}
