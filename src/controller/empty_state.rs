//! One-shot refresh offer for an emptied list
//!
//! When the list ends up with no cards, the user is offered a single manual
//! refresh. Using it sets a flag in session storage, after which the offer is
//! never made again for the rest of the session.
//!
//! ```text
//! NotOffered --BecameEmpty--> Offered --use_refresh--> UsedPermanently
//!      ^                         |
//!      +-------Replaced----------+
//! ```

use tracing::{debug, info};

use crate::storage::{Storage, StorageError};

/// Session storage key marking the refresh as used
pub const REFRESH_USED_KEY: &str = "refreshButtonUsed";

/// Value stored under `REFRESH_USED_KEY`
pub const REFRESH_USED_VALUE: &str = "true";

/// Where the session stands with respect to the refresh control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOffer {
    /// No control is shown
    NotOffered,
    /// The control is shown and has not been used
    Offered,
    /// The control was used; terminal for the session
    UsedPermanently,
}

/// Structural changes reported by the renderer and the deletion handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEvent {
    /// The container holds no cards and no refresh control
    BecameEmpty,
    /// The container's children were replaced wholesale
    Replaced,
}

/// Decides when the refresh control may be inserted
#[derive(Debug)]
pub struct EmptyStateMonitor<P> {
    session: P,
    state: RefreshOffer,
}

impl<P: Storage> EmptyStateMonitor<P> {
    /// Creates a monitor, picking up a flag already set in this session
    pub fn new(session: P) -> Result<Self, StorageError> {
        let mut monitor = Self {
            session,
            state: RefreshOffer::NotOffered,
        };
        if monitor.flag_set()? {
            monitor.state = RefreshOffer::UsedPermanently;
        }
        Ok(monitor)
    }

    pub fn state(&self) -> RefreshOffer {
        self.state
    }

    pub fn session(&self) -> &P {
        &self.session
    }

    fn flag_set(&self) -> Result<bool, StorageError> {
        Ok(self.session.get(REFRESH_USED_KEY)?.is_some())
    }

    /// Feeds a list event to the state machine
    ///
    /// Returns `true` when the caller should insert the refresh control.
    pub fn on_event(&mut self, event: ListEvent) -> Result<bool, StorageError> {
        match (event, self.state) {
            (ListEvent::Replaced, RefreshOffer::Offered) => {
                self.state = RefreshOffer::NotOffered;
                Ok(false)
            }
            (ListEvent::BecameEmpty, RefreshOffer::NotOffered) => {
                if self.flag_set()? {
                    self.state = RefreshOffer::UsedPermanently;
                    return Ok(false);
                }
                info!("User list is empty, offering refresh");
                self.state = RefreshOffer::Offered;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Consumes the refresh offer
    ///
    /// Returns `false` if no offer is outstanding; otherwise records the use
    /// in session storage and returns `true`.
    pub fn use_refresh(&mut self) -> Result<bool, StorageError> {
        if self.state != RefreshOffer::Offered {
            debug!(state = ?self.state, "Ignoring refresh without an outstanding offer");
            return Ok(false);
        }
        self.session.set(REFRESH_USED_KEY, REFRESH_USED_VALUE)?;
        self.state = RefreshOffer::UsedPermanently;
        Ok(true)
    }
}
