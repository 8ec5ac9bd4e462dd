//! Task priority and the policy deciding where it comes from.

use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) for randomly drawn priorities.
pub const RANDOM_PRIORITY_MAX: i64 = 1_000_000;

/// Ordering key for claim selection. Lower values are claimed first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Priority(pub i64);

impl Priority {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Draw a uniformly random priority in `[0, RANDOM_PRIORITY_MAX)`.
    pub fn random() -> Self {
        Self(rand::thread_rng().gen_range(0..RANDOM_PRIORITY_MAX))
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for Priority {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an enqueued task gets its priority from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrioritySource {
    /// Use the caller's score; draw a random one when none is supplied.
    #[default]
    Caller,
    /// Always draw a random priority, ignoring any caller score.
    Random,
}

impl PrioritySource {
    /// Resolve the priority for a new task given the caller's optional score.
    pub fn resolve(self, supplied: Option<i64>) -> Priority {
        match (self, supplied) {
            (PrioritySource::Caller, Some(score)) => Priority(score),
            _ => Priority::random(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrioritySource::Caller => "caller",
            PrioritySource::Random => "random",
        }
    }
}

impl std::fmt::Display for PrioritySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrioritySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "caller" => Ok(PrioritySource::Caller),
            "random" => Ok(PrioritySource::Random),
            other => Err(format!(
                "unsupported priority source {other} (expected caller|random)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_score_wins_when_present() {
        assert_eq!(PrioritySource::Caller.resolve(Some(42)), Priority(42));
        assert_eq!(PrioritySource::Caller.resolve(Some(-3)), Priority(-3));
    }

    #[test]
    fn random_priorities_stay_in_range() {
        for _ in 0..200 {
            let drawn = PrioritySource::Random.resolve(Some(7)).value();
            assert!((0..RANDOM_PRIORITY_MAX).contains(&drawn));
            let fallback = PrioritySource::Caller.resolve(None).value();
            assert!((0..RANDOM_PRIORITY_MAX).contains(&fallback));
        }
    }

    #[test]
    fn parses_source_names() {
        assert_eq!("Random".parse::<PrioritySource>(), Ok(PrioritySource::Random));
        assert_eq!(" caller ".parse::<PrioritySource>(), Ok(PrioritySource::Caller));
        assert!("fifo".parse::<PrioritySource>().is_err());
    }
}
