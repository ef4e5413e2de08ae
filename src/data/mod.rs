//! User data and the API client that loads it

pub mod client;
pub mod user;

pub use client::{parse_users, LoadError, UserSource, UsersClient, USERS_ENDPOINT};
pub use user::{display_text, User, UserId};
