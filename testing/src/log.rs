use parking_lot::Mutex;
use postgate_core::slot::SlotKey;
use std::sync::Arc;

/// One recorded fetch invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub slot: SlotKey,
    /// Keys of the inputs the fetch received, sorted.
    pub inputs: Vec<SlotKey>,
}

/// Shared, ordered record of fetch invocations across slots.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, slot: &str, inputs: impl IntoIterator<Item = String>) {
        let mut inputs: Vec<SlotKey> = inputs.into_iter().collect();
        inputs.sort();
        self.calls.lock().push(Call {
            slot: slot.to_string(),
            inputs,
        });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Slot keys in invocation order.
    pub fn order(&self) -> Vec<SlotKey> {
        self.calls.lock().iter().map(|c| c.slot.clone()).collect()
    }

    pub fn count(&self, slot: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.slot == slot).count()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let log = CallLog::new();
        log.record("settings", []);
        log.record("userData", ["username".to_string()]);
        log.record("settings", []);

        assert_eq!(log.order(), vec!["settings", "userData", "settings"]);
        assert_eq!(log.count("settings"), 2);
        assert_eq!(log.calls()[1].inputs, vec!["username".to_string()]);
    }
}
