//! # Session State
//!
//! The authenticated flag set by a correct PIN.
//!
//! An interactive shell is one session; a one-shot invocation is its own
//! session. Nothing is persisted, so the flag dies with the process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Session-scoped authentication flag.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    authenticated: Arc<AtomicBool>,
}

impl SessionState {
    /// A new, locked session.
    pub fn new() -> Self {
        SessionState::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    pub fn open(&self) {
        self.authenticated.store(true, Ordering::SeqCst);
    }

    pub fn close(&self) {
        self.authenticated.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let session = SessionState::new();
        assert!(!session.is_authenticated());

        session.open();
        assert!(session.clone().is_authenticated());

        session.close();
        assert!(!session.is_authenticated());
    }
}
