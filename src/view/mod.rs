//! Document model for the user list
//!
//! The controller never draws anything itself. It mutates a small tree: a
//! `Document` owns containers addressed by `#id` selectors, and each
//! `Container` holds an ordered list of `Node`s (user cards, the refresh
//! control, or an error message). The terminal front-end draws this tree.
//!
//! Controls carry an `Action` value instead of a callback, so replacing the
//! nodes on re-render leaves nothing bound to old state.

mod render;

pub use render::{error_message, render_error, render_users};

use thiserror::Error;

use crate::data::{display_text, User, UserId};

/// Title and heading of the document
pub const DOCUMENT_TITLE: &str = "User Management System";

/// Id of the container the user list is mounted in
pub const USER_CONTAINER_ID: &str = "userContainer";

/// Selector resolving to the user list container
pub const USER_CONTAINER_SELECTOR: &str = "#userContainer";

/// Label of the delete control on each card
pub const DELETE_LABEL: &str = "Delete User";

/// Label of the manual refresh control
pub const REFRESH_LABEL: &str = "Fetch Users Again";

/// Errors raised while resolving the mount point
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// No container matches the selector
    #[error("Element with selector \"{0}\" not found")]
    ContainerMissing(String),
}

/// What activating a control does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Delete the user with this id
    Delete(UserId),
    /// Fetch the user list again
    Refresh,
}

/// Visual unit for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Card {
    /// The action bound to this card's delete control
    pub fn delete_action(&self) -> Action {
        Action::Delete(self.user_id)
    }

    /// Visible text of the card, one entry per line
    pub fn lines(&self) -> [String; 4] {
        [
            self.name.clone(),
            format!("Email: {}", self.email),
            format!("Phone: {}", self.phone),
            DELETE_LABEL.to_string(),
        ]
    }
}

impl From<&User> for Card {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: display_text(&user.name),
            email: display_text(&user.email),
            phone: display_text(&user.phone),
        }
    }
}

/// A child of a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A user card
    Card(Card),
    /// The one-shot "fetch again" control
    RefreshControl,
    /// Inline error replacing the list
    Error(String),
}

impl Node {
    /// The action triggered by activating this node, if it is a control
    pub fn action(&self) -> Option<Action> {
        match self {
            Node::Card(card) => Some(card.delete_action()),
            Node::RefreshControl => Some(Action::Refresh),
            Node::Error(_) => None,
        }
    }
}

/// An element holding an ordered list of nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    id: String,
    children: Vec<Node>,
}

impl Container {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Removes every child
    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn append(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Cards in display order
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.children.iter().filter_map(|node| match node {
            Node::Card(card) => Some(card),
            _ => None,
        })
    }

    pub fn card_count(&self) -> usize {
        self.cards().count()
    }

    pub fn has_refresh_control(&self) -> bool {
        self.children.iter().any(|node| *node == Node::RefreshControl)
    }

    /// Error messages currently shown
    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|node| match node {
            Node::Error(message) => Some(message.as_str()),
            _ => None,
        })
    }

    /// Actions of all controls, in display order
    pub fn actions(&self) -> Vec<Action> {
        self.children.iter().filter_map(Node::action).collect()
    }

    /// Removes the card for `user_id`, leaving siblings untouched
    ///
    /// Returns whether a card was removed.
    pub fn remove_card(&mut self, user_id: UserId) -> bool {
        let position = self
            .children
            .iter()
            .position(|node| matches!(node, Node::Card(card) if card.user_id == user_id));
        match position {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes the refresh control, returning whether one was present
    pub fn remove_refresh_control(&mut self) -> bool {
        let before = self.children.len();
        self.children.retain(|node| *node != Node::RefreshControl);
        self.children.len() != before
    }

    /// True when the container holds neither cards nor a refresh control
    pub fn is_list_empty(&self) -> bool {
        self.card_count() == 0 && !self.has_refresh_control()
    }
}

/// The presentation surface: a title plus mountable containers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    title: String,
    containers: Vec<Container>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates the standard document with its user container
    pub fn new() -> Self {
        Self {
            title: DOCUMENT_TITLE.to_string(),
            containers: vec![Container::new(USER_CONTAINER_ID)],
        }
    }

    /// Creates a document with a title and no containers
    pub fn blank(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            containers: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn add_container(&mut self, container: Container) {
        self.containers.push(container);
    }

    /// Resolves an `#id` selector
    pub fn query(&self, selector: &str) -> Option<&Container> {
        let id = selector.strip_prefix('#')?;
        self.containers.iter().find(|c| c.id == id)
    }

    /// Resolves an `#id` selector for mutation
    pub fn query_mut(&mut self, selector: &str) -> Option<&mut Container> {
        let id = selector.strip_prefix('#')?;
        self.containers.iter_mut().find(|c| c.id == id)
    }

    /// Like `query_mut`, but reports a missing mount point as an error
    pub fn mount_point(&mut self, selector: &str) -> Result<&mut Container, ViewError> {
        self.query_mut(selector)
            .ok_or_else(|| ViewError::ContainerMissing(selector.to_string()))
    }
}
