//! Session lookup trait.

use crate::types::session::SessionContext;

/// Supplies the currently signed-in user.
pub trait SessionProvider: Send + Sync + 'static {
    /// The current session, or `None` when nobody is signed in.
    fn current(&self) -> Option<SessionContext>;
}

/// A session that never changes. Used by headless runs and tests.
#[derive(Debug, Clone)]
pub struct StaticSession(pub SessionContext);

impl SessionProvider for StaticSession {
    fn current(&self) -> Option<SessionContext> {
        Some(self.0.clone())
    }
}
