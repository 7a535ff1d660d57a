//! Cooperative cancellation for collaborator calls.

use std::cell::Cell;
use std::rc::Rc;

/// Shared flag checked before a collaborator delivers its response.
///
/// Views own one token for their whole lifetime and cancel it on teardown,
/// which drops the continuation of every request still in flight. Clones
/// share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let token = CancellationToken::new();
        let held_by_request = token.clone();
        assert!(!held_by_request.is_cancelled());
        token.cancel();
        assert!(held_by_request.is_cancelled());
    }
}
