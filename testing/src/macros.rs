/// Assert the status of one slot in a gate.
///
/// ```rust,ignore
/// assert_slot_status!(gate, "userData", SlotStatus::Resolved);
/// ```
#[macro_export]
macro_rules! assert_slot_status {
    ($gate:expr, $key:expr, $status:expr) => {{
        let actual = $gate.status($key);
        assert_eq!(
            actual,
            Some($status),
            "slot `{}` expected {:?}, got {:?}",
            $key,
            $status,
            actual
        );
    }};
}

/// Assert that every slot in a gate has resolved.
#[macro_export]
macro_rules! assert_ready {
    ($gate:expr) => {{
        assert!($gate.is_ready(), "gate is not ready: {:?}", $gate);
    }};
}
