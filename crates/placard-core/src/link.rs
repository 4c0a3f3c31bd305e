//! Controller link state.
//!
//! Provides [`LinkState`] and [`LinkHandle`] for tracking whether the last
//! exchange with the controller succeeded. The sync service updates the
//! handle after every register operation; the HTTP layer reports it.
//!
//! # Usage
//!
//! ```rust
//! use placard_core::link::{LinkHandle, LinkState};
//!
//! let link = LinkHandle::new("plc");
//! assert_eq!(link.state(), LinkState::Disconnected);
//!
//! link.set_state(LinkState::Connected);
//! assert!(link.state().is_connected());
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::watch;

// ============================================================================
// LinkState
// ============================================================================

/// Last known state of the controller link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum LinkState {
    /// No register operation has completed yet.
    Disconnected,
    /// The last register operation succeeded.
    Connected,
    /// The last register operation failed.
    Faulted(String),
}

impl LinkState {
    /// Returns `true` if the last exchange succeeded.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connected => write!(f, "connected"),
            Self::Faulted(reason) => write!(f, "faulted: {reason}"),
        }
    }
}

// ============================================================================
// LinkHandle
// ============================================================================

/// Thread-safe handle for observing and updating link state.
///
/// Cheap to clone (Arc internals). State lives in a watch channel so a
/// repeated state is neither stored nor logged again.
#[derive(Clone)]
pub struct LinkHandle {
    inner: Arc<LinkHandleInner>,
}

struct LinkHandleInner {
    name: String,
    tx: watch::Sender<LinkState>,
    created_at: Instant,
}

impl LinkHandle {
    /// Create a new handle. Initial state is [`LinkState::Disconnected`].
    pub fn new(name: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(LinkState::Disconnected);
        Self {
            inner: Arc::new(LinkHandleInner {
                name: name.into(),
                tx,
                created_at: Instant::now(),
            }),
        }
    }

    /// Get the link name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Get the current state.
    pub fn state(&self) -> LinkState {
        self.inner.tx.borrow().clone()
    }

    /// Update the state. Only actual changes are logged.
    pub fn set_state(&self, state: LinkState) {
        let changed = self.inner.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state.clone();
                true
            }
        });
        if changed {
            tracing::info!(link = %self.inner.name, "Controller link → {state}");
        }
    }

    /// Elapsed time since the handle was created.
    pub fn uptime(&self) -> Duration {
        self.inner.created_at.elapsed()
    }
}

impl fmt::Debug for LinkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkHandle")
            .field("name", &self.inner.name)
            .field("state", &self.state())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
