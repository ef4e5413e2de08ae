//! Cache manager for the persisted user list
//!
//! Provides a `CacheManager` that stores the user list with a creation
//! timestamp and treats it as stale once the expiration window has passed.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::data::User;
use crate::storage::{Storage, StorageError};

/// Storage slot holding the envelope
pub const USER_DATA_KEY: &str = "userData";

/// Cached users are considered stale after one hour
pub const EXPIRATION_MINUTES: i64 = 60;

/// The persisted bundle of users and the instant it was written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEnvelope {
    /// Users in display order
    pub users: Vec<User>,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Result of reading the cache slot
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLoad {
    /// Nothing is stored
    Absent,
    /// A fresh envelope was found
    Valid(Vec<User>),
    /// The stored envelope was stale and has been cleared
    Expired,
}

/// Reads and writes the user list envelope
#[derive(Debug)]
pub struct CacheManager<S, C> {
    storage: S,
    clock: C,
    window: Duration,
}

impl<S: Storage, C: Clock> CacheManager<S, C> {
    /// Creates a manager with the default one hour window
    pub fn new(storage: S, clock: C) -> Self {
        Self {
            storage,
            clock,
            window: Duration::minutes(EXPIRATION_MINUTES),
        }
    }

    /// Overrides the expiration window
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Reads the envelope from storage
    ///
    /// A stale envelope is removed before `Expired` is returned. A slot that
    /// does not hold a readable envelope is removed and reported as `Absent`.
    pub fn load(&mut self) -> Result<CacheLoad, StorageError> {
        let Some(raw) = self.storage.get(USER_DATA_KEY)? else {
            debug!("No cached users");
            return Ok(CacheLoad::Absent);
        };

        let envelope: CacheEnvelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable user cache");
                self.storage.remove(USER_DATA_KEY)?;
                return Ok(CacheLoad::Absent);
            }
        };

        let now_ms = self.clock.now().timestamp_millis();
        let Some(age_ms) = now_ms.checked_sub(envelope.timestamp) else {
            warn!(
                timestamp = envelope.timestamp,
                "Discarding user cache with out of range timestamp"
            );
            self.storage.remove(USER_DATA_KEY)?;
            return Ok(CacheLoad::Expired);
        };

        if age_ms < self.window.num_milliseconds() {
            debug!(count = envelope.users.len(), age_ms, "Using cached users");
            Ok(CacheLoad::Valid(envelope.users))
        } else {
            info!(age_ms, "Cached users expired");
            self.storage.remove(USER_DATA_KEY)?;
            Ok(CacheLoad::Expired)
        }
    }

    /// Writes `users` with the current timestamp, replacing any prior envelope
    pub fn save(&mut self, users: &[User]) -> Result<(), StorageError> {
        let envelope = CacheEnvelope {
            users: users.to_vec(),
            timestamp: self.clock.now().timestamp_millis(),
        };
        let json = serde_json::to_string(&envelope)?;
        self.storage.set(USER_DATA_KEY, &json)?;
        debug!(count = users.len(), "Saved users to cache");
        Ok(())
    }

    /// Removes the envelope
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(USER_DATA_KEY)
    }

    /// Reads the raw envelope without expiry handling
    ///
    /// Inspection helper: nothing is removed, and an unreadable envelope is
    /// logged and reported as `None`.
    pub fn peek(&self) -> Result<Option<CacheEnvelope>, StorageError> {
        let Some(raw) = self.storage.get(USER_DATA_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(envelope) => Ok(Some(envelope)),
            Err(e) => {
                warn!(error = %e, "Stored user cache is unreadable");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::{FileStorage, MemoryStorage};
    use chrono::{DateTime, Utc};
    use tempfile::TempDir;

    fn start_instant() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    fn sample_users() -> Vec<User> {
        vec![
            User::new(1, "Ann", "a@x.com", "555"),
            User::new(2, "Bob", "b@x.com", "556"),
        ]
    }

    fn create_test_cache() -> (CacheManager<MemoryStorage, ManualClock>, ManualClock) {
        let clock = ManualClock::new(start_instant());
        (CacheManager::new(MemoryStorage::new(), clock.clone()), clock)
    }

    #[test]
    fn test_load_returns_absent_for_empty_slot() {
        let (mut cache, _clock) = create_test_cache();
        assert_eq!(cache.load().unwrap(), CacheLoad::Absent);
    }

    #[test]
    fn test_save_then_load_returns_same_users() {
        let (mut cache, _clock) = create_test_cache();
        let users = sample_users();

        cache.save(&users).unwrap();

        assert_eq!(cache.load().unwrap(), CacheLoad::Valid(users));
    }

    #[test]
    fn test_load_within_window_keeps_entry() {
        let (mut cache, clock) = create_test_cache();
        cache.save(&sample_users()).unwrap();

        clock.advance(Duration::minutes(59));

        assert_eq!(cache.load().unwrap(), CacheLoad::Valid(sample_users()));
        assert!(cache.storage().get(USER_DATA_KEY).unwrap().is_some());
    }

    #[test]
    fn test_load_after_window_expires_and_clears() {
        let (mut cache, clock) = create_test_cache();
        cache.save(&sample_users()).unwrap();

        clock.advance(Duration::minutes(61));

        assert_eq!(cache.load().unwrap(), CacheLoad::Expired);
        assert!(cache.storage().get(USER_DATA_KEY).unwrap().is_none());
        assert_eq!(cache.load().unwrap(), CacheLoad::Absent);
    }

    #[test]
    fn test_load_exactly_at_window_is_expired() {
        let (mut cache, clock) = create_test_cache();
        cache.save(&sample_users()).unwrap();

        clock.advance(Duration::minutes(EXPIRATION_MINUTES));

        assert_eq!(cache.load().unwrap(), CacheLoad::Expired);
    }

    #[test]
    fn test_save_refreshes_timestamp() {
        let (mut cache, clock) = create_test_cache();
        cache.save(&sample_users()).unwrap();

        clock.advance(Duration::minutes(45));
        cache.save(&sample_users()[..1]).unwrap();
        clock.advance(Duration::minutes(45));

        assert_eq!(
            cache.load().unwrap(),
            CacheLoad::Valid(sample_users()[..1].to_vec())
        );
    }

    #[test]
    fn test_envelope_format_uses_millisecond_timestamp() {
        let (mut cache, _clock) = create_test_cache();
        cache.save(&sample_users()).unwrap();

        let raw = cache.storage().get(USER_DATA_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["timestamp"], 1_700_000_000_000i64);
        assert_eq!(value["users"][0]["name"], "Ann");
        assert_eq!(value["users"][1]["id"], 2);
    }

    #[test]
    fn test_unreadable_envelope_is_cleared() {
        let (mut cache, _clock) = create_test_cache();
        cache.storage.set(USER_DATA_KEY, "{not json").unwrap();

        assert_eq!(cache.load().unwrap(), CacheLoad::Absent);
        assert!(cache.storage().get(USER_DATA_KEY).unwrap().is_none());
    }

    #[test]
    fn test_out_of_range_timestamp_is_cleared() {
        let (mut cache, _clock) = create_test_cache();
        cache
            .storage
            .set(USER_DATA_KEY, r#"{"users":[],"timestamp":-9223372036854775808}"#)
            .unwrap();

        assert_eq!(cache.load().unwrap(), CacheLoad::Expired);
        assert!(cache.storage().get(USER_DATA_KEY).unwrap().is_none());
    }

    #[test]
    fn test_far_future_timestamp_counts_as_fresh() {
        let (mut cache, _clock) = create_test_cache();
        cache
            .storage
            .set(USER_DATA_KEY, r#"{"users":[],"timestamp":9223372036854775807}"#)
            .unwrap();

        assert_eq!(cache.load().unwrap(), CacheLoad::Valid(Vec::new()));
    }

    #[test]
    fn test_untyped_display_fields_round_trip() {
        let (mut cache, _clock) = create_test_cache();
        let users = vec![User::new(1, "Ann", serde_json::Value::Null, 5551234)];

        cache.save(&users).unwrap();

        let raw = cache.storage().get(USER_DATA_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["users"][0]["email"], serde_json::Value::Null);
        assert_eq!(value["users"][0]["phone"], 5551234);
        assert_eq!(cache.load().unwrap(), CacheLoad::Valid(users));
    }

    #[test]
    fn test_peek_reports_unreadable_envelope_as_none() {
        let (mut cache, _clock) = create_test_cache();
        cache.storage.set(USER_DATA_KEY, "{not json").unwrap();

        assert!(cache.peek().unwrap().is_none());
        assert!(
            cache.storage().get(USER_DATA_KEY).unwrap().is_some(),
            "peek leaves the slot alone"
        );
    }

    #[test]
    fn test_custom_window() {
        let (cache, clock) = create_test_cache();
        let mut cache = cache.with_window(Duration::minutes(5));
        cache.save(&sample_users()).unwrap();

        clock.advance(Duration::minutes(6));

        assert_eq!(cache.load().unwrap(), CacheLoad::Expired);
    }

    #[test]
    fn test_cache_survives_on_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let clock = ManualClock::new(start_instant());

        let mut writer = CacheManager::new(
            FileStorage::with_dir(temp_dir.path().to_path_buf()),
            clock.clone(),
        );
        writer.save(&sample_users()).unwrap();

        let mut reader = CacheManager::new(
            FileStorage::with_dir(temp_dir.path().to_path_buf()),
            clock,
        );
        assert_eq!(reader.load().unwrap(), CacheLoad::Valid(sample_users()));
    }

    #[test]
    fn test_peek_does_not_expire() {
        let (mut cache, clock) = create_test_cache();
        cache.save(&sample_users()).unwrap();
        clock.advance(Duration::hours(3));

        let envelope = cache.peek().unwrap().expect("Envelope should still be stored");
        assert_eq!(envelope.users.len(), 2);
        assert_eq!(envelope.timestamp, start_instant().timestamp_millis());
    }
}
