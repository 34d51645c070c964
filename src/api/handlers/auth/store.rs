//! Persistence interface for the authentication state machine.
//!
//! The session state machine only needs this small capability set, so it is
//! expressed as a trait: the production implementation runs SQL
//! (`super::storage`), while tests drive the same transitions against an
//! in-memory store.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub(crate) struct UserRecord {
    pub(crate) id: Uuid,
    pub(crate) username: String,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct RefreshRecord {
    pub(crate) user_id: Uuid,
}

#[async_trait]
pub(crate) trait AuthStore: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>>;

    /// Persist a refresh token row with `revoked = false` expiring
    /// `ttl_seconds` from now.
    async fn create_refresh(&self, user_id: Uuid, token: &str, ttl_seconds: i64) -> Result<()>;

    /// Look up a refresh token that is neither revoked nor expired.
    async fn find_refresh(&self, token: &str) -> Result<Option<RefreshRecord>>;

    /// Flip `revoked` on the matching live row. A missing or already-dead row
    /// is a no-op, not an error: logout must not fail merely because the
    /// refresh token was already invalid.
    async fn revoke_refresh(&self, token: &str) -> Result<()>;

    /// Probe the ledger for an unexpired entry with this fingerprint.
    async fn is_blacklisted(&self, token_hash: &[u8]) -> Result<bool>;

    /// Insert a blacklist entry. Inserting a fingerprint that is already
    /// present must succeed (entries are idempotent in effect); any other
    /// storage failure must propagate so the caller can refuse to report a
    /// token as revoked when it is not.
    async fn create_blacklist(&self, token_hash: &[u8], expires_at_unix: i64) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory store used by state-machine tests.

    use super::{AuthStore, RefreshRecord, UserRecord};
    use crate::api::handlers::now_unix_seconds;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Debug)]
    struct RefreshRow {
        user_id: Uuid,
        token: String,
        expires_at_unix: i64,
        revoked: bool,
    }

    #[derive(Default)]
    pub(crate) struct MemoryAuthStore {
        users: Mutex<Vec<UserRecord>>,
        refresh_tokens: Mutex<Vec<RefreshRow>>,
        blacklist: Mutex<HashMap<Vec<u8>, i64>>,
    }

    impl MemoryAuthStore {
        pub(crate) fn add_user(&self, username: &str, password_hash: &str) -> Uuid {
            let id = Uuid::new_v4();
            self.users
                .lock()
                .expect("users lock")
                .push(UserRecord {
                    id,
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                });
            id
        }

        pub(crate) fn refresh_rows(&self) -> usize {
            self.refresh_tokens.lock().expect("refresh lock").len()
        }

        pub(crate) fn refresh_expiry(&self, token: &str) -> Option<i64> {
            self.refresh_tokens
                .lock()
                .expect("refresh lock")
                .iter()
                .find(|row| row.token == token)
                .map(|row| row.expires_at_unix)
        }

        pub(crate) fn blacklist_entries(&self) -> usize {
            self.blacklist.lock().expect("blacklist lock").len()
        }
    }

    #[async_trait]
    impl AuthStore for MemoryAuthStore {
        async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
            Ok(self
                .users
                .lock()
                .expect("users lock")
                .iter()
                .find(|user| user.username == username)
                .cloned())
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>> {
            Ok(self
                .users
                .lock()
                .expect("users lock")
                .iter()
                .find(|user| user.id == id)
                .cloned())
        }

        async fn create_refresh(&self, user_id: Uuid, token: &str, ttl_seconds: i64) -> Result<()> {
            self.refresh_tokens
                .lock()
                .expect("refresh lock")
                .push(RefreshRow {
                    user_id,
                    token: token.to_string(),
                    expires_at_unix: now_unix_seconds() + ttl_seconds,
                    revoked: false,
                });
            Ok(())
        }

        async fn find_refresh(&self, token: &str) -> Result<Option<RefreshRecord>> {
            let now = now_unix_seconds();
            Ok(self
                .refresh_tokens
                .lock()
                .expect("refresh lock")
                .iter()
                .find(|row| row.token == token && !row.revoked && row.expires_at_unix > now)
                .map(|row| RefreshRecord {
                    user_id: row.user_id,
                }))
        }

        async fn revoke_refresh(&self, token: &str) -> Result<()> {
            let now = now_unix_seconds();
            for row in self
                .refresh_tokens
                .lock()
                .expect("refresh lock")
                .iter_mut()
            {
                if row.token == token && !row.revoked && row.expires_at_unix > now {
                    row.revoked = true;
                }
            }
            Ok(())
        }

        async fn is_blacklisted(&self, token_hash: &[u8]) -> Result<bool> {
            let now = now_unix_seconds();
            Ok(self
                .blacklist
                .lock()
                .expect("blacklist lock")
                .get(token_hash)
                .is_some_and(|expires_at| *expires_at > now))
        }

        async fn create_blacklist(&self, token_hash: &[u8], expires_at_unix: i64) -> Result<()> {
            // A duplicate insert leaves one effective entry, mirroring the
            // unique-constraint behavior of the SQL store.
            self.blacklist
                .lock()
                .expect("blacklist lock")
                .entry(token_hash.to_vec())
                .or_insert(expires_at_unix);
            Ok(())
        }
    }
}
