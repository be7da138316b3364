use crate::error::FetchError;
use crate::slot::SlotKey;

/// A slot that ended in `failed`, with the error it stored.
#[derive(Debug, Clone)]
pub struct SlotFailure {
    pub key: SlotKey,
    pub error: FetchError,
}

/// Overall state of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// At least one slot is pending or running, none failed.
    Loading,
    /// Every slot resolved.
    Ready,
    /// At least one slot failed. Terminal until the caller refreshes it.
    Failed,
}

/// What a caller should render for a gate.
///
/// Every gate query that produces user-facing output returns a `GateView`,
/// so there is always something to show: a loading indicator, an error
/// view, or the ready output.
#[derive(Debug, Clone)]
pub enum GateView<R> {
    Loading,
    Failed(Vec<SlotFailure>),
    Ready(R),
}

impl<R> GateView<R> {
    pub fn readiness(&self) -> Readiness {
        match self {
            GateView::Loading => Readiness::Loading,
            GateView::Failed(_) => Readiness::Failed,
            GateView::Ready(_) => Readiness::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, GateView::Ready(_))
    }

    pub fn into_ready(self) -> Option<R> {
        match self {
            GateView::Ready(r) => Some(r),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(R) -> U>(self, op: F) -> GateView<U> {
        match self {
            GateView::Loading => GateView::Loading,
            GateView::Failed(failures) => GateView::Failed(failures),
            GateView::Ready(r) => GateView::Ready(op(r)),
        }
    }
}
