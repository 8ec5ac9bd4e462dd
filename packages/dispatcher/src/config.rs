//! Lifecycle policy knobs.

/// Policy settings for a [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Accept `complete` on a task that was never claimed (`Pending -> Done`).
    pub allow_complete_unclaimed: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            allow_complete_unclaimed: true,
        }
    }
}

impl DispatcherConfig {
    /// Require tasks to be claimed before they can be completed.
    pub fn strict() -> Self {
        Self {
            allow_complete_unclaimed: false,
        }
    }

    pub fn with_allow_complete_unclaimed(mut self, allow: bool) -> Self {
        self.allow_complete_unclaimed = allow;
        self
    }
}
