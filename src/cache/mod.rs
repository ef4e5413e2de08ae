//! Time-bounded cache of the user list
//!
//! The whole list is stored as one JSON envelope (`users` plus a millisecond
//! `timestamp`) in a single storage slot. Every write replaces the envelope.
//! An envelope older than the expiration window is cleared on read.

mod manager;

pub use manager::{CacheEnvelope, CacheLoad, CacheManager, EXPIRATION_MINUTES, USER_DATA_KEY};
