//! # Auth Commands
//!
//! The PIN gate in front of every other command.
//!
//! ```text
//! ┌───────────────┐   correct    ┌────────────────┐   sair    ┌───────────────┐
//! │   locked      │ ───────────► │ authenticated  │ ────────► │   locked      │
//! │ (new session) │              │                │           │               │
//! └───────────────┘              └────────────────┘           └───────────────┘
//!        ▲  │ wrong PIN: Unauthorized, input discarded, try again
//!        └──┘
//! ```
//!
//! A static PIN compared in memory. No hashing, no lockout, no rotation.

use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::{ConfigState, SessionState};

/// Opens the session if `entered` matches the configured PIN.
pub fn login(config: &ConfigState, session: &SessionState, entered: &str) -> Result<(), ApiError> {
    if config.pin_matches(entered) {
        session.open();
        info!("Session opened");
        Ok(())
    } else {
        warn!("Wrong PIN entered");
        Err(ApiError::unauthorized("PIN incorreto"))
    }
}

/// Closes the session.
pub fn logout(session: &SessionState) {
    session.close();
    info!("Session closed");
}

/// Fails unless the session is open.
pub fn require_session(session: &SessionState) -> Result<(), ApiError> {
    if session.is_authenticated() {
        Ok(())
    } else {
        Err(ApiError::unauthorized("Acesso restrito: informe o PIN"))
    }
}
