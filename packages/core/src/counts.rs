//! Aggregate task counts per lifecycle state.

use serde::{Deserialize, Serialize};

use crate::TaskState;

/// Number of tasks currently in each state.
///
/// Counts may be taken at slightly different instants; they are not a
/// transactional snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskCounts {
    pub pending: u64,
    pub claimed: u64,
    pub done: u64,
}

impl TaskCounts {
    /// Count for a single state.
    pub fn get(&self, state: TaskState) -> u64 {
        match state {
            TaskState::Pending => self.pending,
            TaskState::Claimed => self.claimed,
            TaskState::Done => self.done,
        }
    }

    /// Total tasks ever enqueued (tasks are never deleted).
    pub fn total(&self) -> u64 {
        self.pending + self.claimed + self.done
    }
}

impl std::fmt::Display for TaskCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for state in TaskState::ALL {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{}:{}", state, self.get(state))?;
        }
        Ok(())
    }
}
