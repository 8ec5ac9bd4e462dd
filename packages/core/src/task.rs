//! Task domain types for work items in the dispatcher.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Priority;
use crate::error::{InvalidTaskId, InvalidTransition};

/// Client-assigned identifier for a task.
///
/// Never empty; immutable once the task is created.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Parse a task ID, rejecting the empty string.
    pub fn parse(s: impl Into<String>) -> Result<Self, InvalidTaskId> {
        let s = s.into();
        if s.is_empty() {
            return Err(InvalidTaskId);
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskId {
    type Error = InvalidTaskId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Waiting in the pool to be claimed.
    #[default]
    Pending,
    /// Handed out to a worker.
    Claimed,
    /// Reported finished. Terminal.
    Done,
}

impl TaskState {
    /// Every state, in lifecycle order.
    pub const ALL: [TaskState; 3] = [TaskState::Pending, TaskState::Claimed, TaskState::Done];

    /// Check whether moving from `self` to `to` is a legal transition.
    ///
    /// States only move forward. `Pending -> Done` is allowed here; whether a
    /// dispatcher accepts it is a policy decision made by the caller.
    pub fn can_transition_to(self, to: TaskState) -> bool {
        matches!(
            (self, to),
            (TaskState::Pending, TaskState::Claimed)
                | (TaskState::Pending, TaskState::Done)
                | (TaskState::Claimed, TaskState::Done)
        )
    }

    /// Check if the task is in a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Done)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Pending => "pending",
            TaskState::Claimed => "claimed",
            TaskState::Done => "done",
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown state name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task state: {0}")]
pub struct UnknownState(pub String);

impl FromStr for TaskState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskState::Pending),
            "claimed" => Ok(TaskState::Claimed),
            "done" => Ok(TaskState::Done),
            other => Err(UnknownState(other.to_string())),
        }
    }
}

/// A unit of work with identity, priority, and lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, chosen by the enqueuing client.
    pub id: TaskId,
    /// Current lifecycle state.
    pub state: TaskState,
    /// Ordering key. Lower values are claimed first.
    pub priority: Priority,
    /// When the task was enqueued. Breaks ties between equal priorities.
    pub enqueued_at: DateTime<Utc>,
    /// When the task last changed state.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new pending task.
    pub fn new(id: TaskId, priority: Priority) -> Self {
        let now = Utc::now();
        Self {
            id,
            state: TaskState::Pending,
            priority,
            enqueued_at: now,
            updated_at: now,
        }
    }

    /// Move the task to `to`, refusing anything the state machine forbids.
    pub fn transition(&mut self, to: TaskState) -> Result<(), InvalidTransition> {
        if !self.state.can_transition_to(to) {
            return Err(InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    #[test]
    fn empty_id_is_rejected() {
        assert_eq!(TaskId::parse(""), Err(InvalidTaskId));
        assert_eq!(TaskId::parse("a").map(|id| id.to_string()), Ok("a".to_string()));
    }

    #[test]
    fn task_id_deserialization_validates() {
        let parsed: Result<TaskId, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
        let parsed: TaskId = serde_json::from_str("\"job-7\"").unwrap();
        assert_eq!(parsed.as_str(), "job-7");
    }

    #[test]
    fn states_only_move_forward() {
        use TaskState::*;
        assert!(Pending.can_transition_to(Claimed));
        assert!(Claimed.can_transition_to(Done));
        assert!(Pending.can_transition_to(Done));

        assert!(!Claimed.can_transition_to(Pending));
        assert!(!Done.can_transition_to(Pending));
        assert!(!Done.can_transition_to(Claimed));
        for state in TaskState::ALL {
            assert!(!state.can_transition_to(state));
        }
    }

    #[test]
    fn transition_rejects_regression_and_keeps_state() {
        let mut task = Task::new(TaskId::parse("t").unwrap(), Priority::new(3));
        task.transition(TaskState::Claimed).unwrap();
        task.transition(TaskState::Done).unwrap();

        let err = task.transition(TaskState::Claimed).unwrap_err();
        assert_eq!(err.from, TaskState::Done);
        assert_eq!(err.to, TaskState::Claimed);
        assert_eq!(task.state, TaskState::Done);
    }

    #[test]
    fn state_names_round_trip() {
        for state in TaskState::ALL {
            assert_eq!(state.as_str().parse::<TaskState>(), Ok(state));
        }
        assert!("doing".parse::<TaskState>().is_err());
    }
}
