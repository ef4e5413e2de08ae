//! User list library
//!
//! Loads a list of users from a remote endpoint, keeps it in a time-bounded
//! cache and lets the user delete entries locally. The controller works on an
//! in-memory document; the `userlist` binary draws that document in a
//! terminal.

pub mod cache;
pub mod cli;
pub mod clock;
pub mod controller;
pub mod data;
pub mod storage;
pub mod view;
