//! Rendering of users and errors into a container

use std::fmt::Display;

use super::{Card, Container, Node};
use crate::data::User;

/// Replaces the container's children with one card per user, in order
pub fn render_users(container: &mut Container, users: &[User]) {
    container.clear();
    for user in users {
        container.append(Node::Card(Card::from(user)));
    }
}

/// Text shown in place of the list when loading fails
pub fn error_message(err: &impl Display) -> String {
    format!("Error loading users: {}", err)
}

/// Replaces the container's children with a single error message
pub fn render_error(container: &mut Container, err: &impl Display) {
    container.clear();
    container.append(Node::Error(error_message(err)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LoadError;
    use crate::view::Action;

    fn users() -> Vec<User> {
        vec![
            User::new(1, "Ann", "a@x.com", "555"),
            User::new(2, "Bob", "b@x.com", "556"),
        ]
    }

    #[test]
    fn test_render_users_in_order() {
        let mut container = Container::new("c");
        render_users(&mut container, &users());

        let cards: Vec<&Card> = container.cards().collect();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].lines()[0], "Ann");
        assert_eq!(cards[0].lines()[1], "Email: a@x.com");
        assert_eq!(cards[1].lines()[0], "Bob");
        assert_eq!(cards[1].lines()[2], "Phone: 556");
        assert_eq!(container.actions(), vec![Action::Delete(1), Action::Delete(2)]);
    }

    #[test]
    fn test_render_empty_list_has_no_cards() {
        let mut container = Container::new("c");
        render_users(&mut container, &users());
        render_users(&mut container, &[]);
        assert_eq!(container.card_count(), 0);
        assert!(container.children().is_empty());
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut first = Container::new("c");
        render_users(&mut first, &users());
        let snapshot = first.clone();

        render_users(&mut first, &users());

        assert_eq!(first, snapshot);
    }

    #[test]
    fn test_render_discards_previous_controls() {
        let mut container = Container::new("c");
        container.append(Node::RefreshControl);
        container.append(Node::Error("old".to_string()));

        render_users(&mut container, &users()[..1]);

        assert_eq!(container.children().len(), 1);
        assert!(!container.has_refresh_control());
    }

    #[test]
    fn test_render_error_replaces_contents() {
        let mut container = Container::new("c");
        render_users(&mut container, &users());

        render_error(&mut container, &LoadError::Status(500));

        let errors: Vec<&str> = container.errors().collect();
        assert_eq!(errors, vec!["Error loading users: Failed to fetch users"]);
        assert_eq!(container.card_count(), 0);
    }
}
