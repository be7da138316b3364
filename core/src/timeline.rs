use crate::slot::SlotKey;
use serde::{Deserialize, Serialize};

/// Represents a discrete event in a gate's evaluation.
///
/// `pass` is the evaluation pass in which the event happened; slots launched
/// in the same pass were started together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineEvent {
    /// A fetch was invoked
    Launched { key: SlotKey, pass: u64, timestamp: u64 },
    /// A fetch resolved
    Resolved {
        key: SlotKey,
        pass: u64,
        changed: bool,
        timestamp: u64,
    },
    /// A fetch failed
    Failed {
        key: SlotKey,
        pass: u64,
        error: String,
        timestamp: u64,
    },
    /// A settled slot went back to pending
    Reset {
        key: SlotKey,
        cause: SlotKey,
        pass: u64,
        timestamp: u64,
    },
    /// An in-flight result was dropped because its inputs changed meanwhile
    Discarded { key: SlotKey, pass: u64, timestamp: u64 },
    /// The caller supplied a value directly
    Overridden {
        key: SlotKey,
        changed: bool,
        pass: u64,
        timestamp: u64,
    },
}

impl TimelineEvent {
    pub fn key(&self) -> &str {
        match self {
            TimelineEvent::Launched { key, .. }
            | TimelineEvent::Resolved { key, .. }
            | TimelineEvent::Failed { key, .. }
            | TimelineEvent::Reset { key, .. }
            | TimelineEvent::Discarded { key, .. }
            | TimelineEvent::Overridden { key, .. } => key,
        }
    }

    pub fn pass(&self) -> u64 {
        match self {
            TimelineEvent::Launched { pass, .. }
            | TimelineEvent::Resolved { pass, .. }
            | TimelineEvent::Failed { pass, .. }
            | TimelineEvent::Reset { pass, .. }
            | TimelineEvent::Discarded { pass, .. }
            | TimelineEvent::Overridden { pass, .. } => *pass,
        }
    }
}

/// A sequential record of a gate's evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Timeline {
    pub events: Vec<TimelineEvent>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TimelineEvent) {
        self.events.push(event);
    }

    /// Passes in which `key` was launched, in order.
    pub fn launches_of(&self, key: &str) -> Vec<u64> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TimelineEvent::Launched { key: k, pass, .. } if k == key => Some(*pass),
                _ => None,
            })
            .collect()
    }

    /// Position of the first `Resolved` event for `key`.
    pub fn resolution_index(&self, key: &str) -> Option<usize> {
        self.events
            .iter()
            .position(|event| matches!(event, TimelineEvent::Resolved { key: k, .. } if k == key))
    }

    /// Position of the first `Launched` event for `key`.
    pub fn launch_index(&self, key: &str) -> Option<usize> {
        self.events
            .iter()
            .position(|event| matches!(event, TimelineEvent::Launched { key: k, .. } if k == key))
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Milliseconds since the Unix epoch, for event timestamps.
pub fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_queries() {
        let mut timeline = Timeline::new();
        timeline.push(TimelineEvent::Launched {
            key: "username".into(),
            pass: 1,
            timestamp: 0,
        });
        timeline.push(TimelineEvent::Resolved {
            key: "username".into(),
            pass: 1,
            changed: true,
            timestamp: 0,
        });
        timeline.push(TimelineEvent::Launched {
            key: "userData".into(),
            pass: 2,
            timestamp: 0,
        });

        assert_eq!(timeline.launches_of("userData"), vec![2]);
        assert!(timeline.resolution_index("username") < timeline.launch_index("userData"));
        assert_eq!(timeline.events[2].key(), "userData");
    }
}
