//! User list controller
//!
//! Ties together the cache, the user source and the document. On start the
//! cache is consulted; a fresh envelope is rendered directly, otherwise a
//! network load is started. Deletions update memory, cache and document in
//! one step. After every structural change the container is checked and, if
//! it holds nothing, the empty-state monitor decides whether to offer a
//! manual refresh.
//!
//! Network loads are split into `begin_fetch` and `finish_fetch` so a caller
//! can run the request elsewhere (the terminal front-end spawns it on a task).
//! Each load gets a ticket from a generation counter, and only the newest
//! ticket's result is applied.

mod empty_state;

pub use empty_state::{
    EmptyStateMonitor, ListEvent, RefreshOffer, REFRESH_USED_KEY, REFRESH_USED_VALUE,
};

use tracing::{debug, error, info};

use crate::cache::{CacheLoad, CacheManager};
use crate::clock::Clock;
use crate::data::{LoadError, User, UserId, UserSource};
use crate::storage::{Storage, StorageError};
use crate::view::{
    render_error, render_users, Action, Container, Document, Node, USER_CONTAINER_SELECTOR,
};

/// Identifies one network load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a completed load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Users were stored and rendered
    Applied(usize),
    /// The error message was rendered; cache untouched
    Failed,
    /// A newer load was started; result dropped
    Stale,
}

/// Owns the in-memory user list and keeps cache and document in step with it
#[derive(Debug)]
pub struct UserListController<S, P, F, C> {
    cache: CacheManager<S, C>,
    empty_state: EmptyStateMonitor<P>,
    source: F,
    document: Document,
    selector: String,
    users: Vec<User>,
    generation: u64,
    pending: Option<u64>,
}

impl<S, P, F, C> UserListController<S, P, F, C>
where
    S: Storage,
    P: Storage,
    F: UserSource,
    C: Clock,
{
    /// Creates a controller mounted on the standard document
    pub fn new(cache: CacheManager<S, C>, session: P, source: F) -> Result<Self, StorageError> {
        Ok(Self {
            cache,
            empty_state: EmptyStateMonitor::new(session)?,
            source,
            document: Document::new(),
            selector: USER_CONTAINER_SELECTOR.to_string(),
            users: Vec::new(),
            generation: 0,
            pending: None,
        })
    }

    /// Mounts the list on a different document or selector
    pub fn with_document(mut self, document: Document, selector: impl Into<String>) -> Self {
        self.document = document;
        self.selector = selector.into();
        self
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The container the list is mounted in, if present
    pub fn container(&self) -> Option<&Container> {
        self.document.query(&self.selector)
    }

    pub fn cache(&self) -> &CacheManager<S, C> {
        &self.cache
    }

    pub fn empty_state(&self) -> &EmptyStateMonitor<P> {
        &self.empty_state
    }

    pub fn source(&self) -> &F {
        &self.source
    }

    /// True while the newest load has not completed
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Renders from cache when possible
    ///
    /// Returns a ticket when the list has to be loaded from the network.
    pub fn start(&mut self) -> Result<Option<FetchTicket>, StorageError> {
        match self.cache.load()? {
            CacheLoad::Valid(users) => {
                info!(count = users.len(), "Rendering users from cache");
                self.users = users;
                self.render()?;
                Ok(None)
            }
            CacheLoad::Absent | CacheLoad::Expired => Ok(Some(self.begin_fetch())),
        }
    }

    /// Starts up and, if needed, loads from the network
    pub async fn init(&mut self) -> Result<(), StorageError> {
        if let Some(ticket) = self.start()? {
            self.fetch(ticket).await?;
        }
        Ok(())
    }

    /// Starts a new load, superseding any load still in flight
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.pending = Some(self.generation);
        debug!(generation = self.generation, "Starting user fetch");
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Applies the result of a load
    ///
    /// Success replaces the list, writes the cache and re-renders. Failure
    /// shows the error in place of the list and leaves the cache alone.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<User>, LoadError>,
    ) -> Result<FetchOutcome, StorageError> {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                "Dropping stale fetch result"
            );
            return Ok(FetchOutcome::Stale);
        }
        self.pending = None;

        match result {
            Ok(users) => {
                info!(count = users.len(), "Fetched users");
                self.users = users;
                self.cache.save(&self.users)?;
                self.render()?;
                Ok(FetchOutcome::Applied(self.users.len()))
            }
            Err(e) => {
                error!(error = %e, "Error fetching users");
                self.show_error(&e)?;
                Ok(FetchOutcome::Failed)
            }
        }
    }

    /// Runs a load through the user source
    pub async fn fetch(&mut self, ticket: FetchTicket) -> Result<FetchOutcome, StorageError> {
        let result = self.source.fetch_users().await;
        self.finish_fetch(ticket, result)
    }

    /// Begins and runs a load
    pub async fn load_users(&mut self) -> Result<FetchOutcome, StorageError> {
        let ticket = self.begin_fetch();
        self.fetch(ticket).await
    }

    /// Replaces the container's contents with the current users
    ///
    /// A missing container is logged and rendering is skipped.
    pub fn render(&mut self) -> Result<(), StorageError> {
        match self.document.mount_point(&self.selector) {
            Ok(container) => render_users(container, &self.users),
            Err(e) => {
                error!(error = %e, "Skipping render");
                return Ok(());
            }
        }
        self.settle(true)
    }

    fn show_error(&mut self, err: &LoadError) -> Result<(), StorageError> {
        match self.document.mount_point(&self.selector) {
            Ok(container) => render_error(container, err),
            Err(e) => {
                error!(error = %e, "Cannot show load error");
                return Ok(());
            }
        }
        self.settle(true)
    }

    /// Deletes one user locally
    ///
    /// Removing an id that is not present does nothing.
    pub fn delete_user(&mut self, id: UserId) -> Result<(), StorageError> {
        let before = self.users.len();
        self.users.retain(|user| user.id != id);
        if self.users.len() == before {
            debug!(id, "Delete of unknown user ignored");
            return Ok(());
        }

        self.cache.save(&self.users)?;
        if let Some(container) = self.document.query_mut(&self.selector) {
            container.remove_card(id);
        }
        info!(id, remaining = self.users.len(), "Deleted user");
        self.settle(false)
    }

    /// Performs a control's action
    ///
    /// Returns a ticket when the action started a network load.
    pub fn activate(&mut self, action: Action) -> Result<Option<FetchTicket>, StorageError> {
        match action {
            Action::Delete(id) => {
                self.delete_user(id)?;
                Ok(None)
            }
            Action::Refresh => {
                if !self.empty_state.use_refresh()? {
                    return Ok(None);
                }
                if let Some(container) = self.document.query_mut(&self.selector) {
                    container.remove_refresh_control();
                }
                self.settle(false)?;
                Ok(Some(self.begin_fetch()))
            }
        }
    }

    /// Reports the container's state to the empty-state monitor
    fn settle(&mut self, replaced: bool) -> Result<(), StorageError> {
        if replaced {
            self.empty_state.on_event(ListEvent::Replaced)?;
        }
        let Some(container) = self.document.query_mut(&self.selector) else {
            return Ok(());
        };
        if container.is_list_empty() && self.empty_state.on_event(ListEvent::BecameEmpty)? {
            container.append(Node::RefreshControl);
        }
        Ok(())
    }
}
