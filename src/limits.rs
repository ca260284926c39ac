use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Why a search stopped before it was finished.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Interruption {
    /// The search visited as many nodes as it was allowed to.
    NodeLimit,
    /// The deadline passed.
    Deadline,
    /// The shared stop flag was raised.
    Stopped,
}

/// Conditions under which a search gives up early, checked between search steps.
///
/// The default places no limits.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Maximum number of search nodes (propagation passes) per search.
    pub node_limit: Option<u64>,
    /// Point in time after which the search stops.
    pub deadline: Option<Instant>,
    /// Raised from elsewhere to stop the search.
    pub stop: Option<Arc<AtomicBool>>,
}

impl Limits {
    /// Stop after `nodes` search nodes.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Stop once `timeout` has passed from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Stop once `flag` is set.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    /// Whether a search which has visited `nodes` nodes must stop, and why.
    pub(crate) fn exceeded(&self, nodes: u64) -> Option<Interruption> {
        if self.node_limit.is_some_and(|limit| nodes >= limit) {
            Some(Interruption::NodeLimit)
        } else if self.stop.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            Some(Interruption::Stopped)
        } else if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            Some(Interruption::Deadline)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_by_default() {
        assert_eq!(Limits::default().exceeded(u64::MAX - 1), None);
    }

    #[test]
    fn node_limit() {
        let limits = Limits::default().with_node_limit(3);
        assert_eq!(limits.exceeded(2), None);
        assert_eq!(limits.exceeded(3), Some(Interruption::NodeLimit));
    }

    #[test]
    fn stop_flag_and_deadline() {
        let flag = Arc::new(AtomicBool::new(false));
        let limits = Limits::default().with_stop_flag(flag.clone());
        assert_eq!(limits.exceeded(0), None);
        flag.store(true, Ordering::Relaxed);
        assert_eq!(limits.exceeded(0), Some(Interruption::Stopped));

        let expired = Limits::default().with_timeout(Duration::ZERO);
        assert_eq!(expired.exceeded(0), Some(Interruption::Deadline));
        assert_eq!(Interruption::NodeLimit.to_string(), "node_limit");
    }
}
