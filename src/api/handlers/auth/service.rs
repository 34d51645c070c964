//! The authentication state machine.
//!
//! Session state lives in storage only: {no-session, access-valid,
//! access-blacklisted, refresh-valid, refresh-revoked-or-expired}. The named
//! transitions below (login, authenticate, refresh, logout) are the only ways
//! between those states, and each is expressed against the `AuthStore`
//! capability set so it can be exercised without a database.

use anyhow::{anyhow, Result};
use tracing::{debug, error};

use super::principal::Principal;
use super::state::{AuthConfig, REFRESH_TOKEN_TTL_SECONDS};
use super::store::AuthStore;
use super::token;
use super::utils::{fingerprint, generate_refresh_token, verify_password};
use crate::api::handlers::now_unix_seconds;

#[derive(Debug)]
pub(crate) enum LoginOutcome {
    Success {
        token: String,
        refresh_token: String,
    },
    /// No user with that username. Kept distinct from `WrongPassword`; the
    /// login handler reports different messages for the two (see DESIGN.md).
    UnknownUser,
    WrongPassword,
}

#[derive(Debug)]
pub(crate) enum RefreshOutcome {
    Success { token: String, username: String },
    /// Missing, revoked, or expired refresh token.
    Invalid,
}

/// Verify credentials, mint an access token, and issue a refresh token.
pub(crate) async fn login<S: AuthStore>(
    store: &S,
    config: &AuthConfig,
    username: &str,
    password: &str,
) -> Result<LoginOutcome> {
    let Some(user) = store.find_user_by_username(username).await? else {
        return Ok(LoginOutcome::UnknownUser);
    };

    if !verify_password(password, &user.password_hash) {
        return Ok(LoginOutcome::WrongPassword);
    }

    let now = now_unix_seconds();
    let access_token = token::mint(
        config.jwt_secret(),
        &user.id.to_string(),
        &user.username,
        now,
        config.access_ttl_seconds(),
    )
    .map_err(|err| anyhow!("failed to mint access token: {err}"))?;

    let refresh_token = generate_refresh_token()?;
    store
        .create_refresh(user.id, &refresh_token, REFRESH_TOKEN_TTL_SECONDS)
        .await?;

    Ok(LoginOutcome::Success {
        token: access_token,
        refresh_token,
    })
}

/// Resolve a presented access token into a principal.
///
/// The blacklist is probed first: it is a cheap indexed lookup and fast-fails
/// revoked tokens without touching the secret. Only then is the signature and
/// expiry verified.
///
/// Returns `Ok(None)` for any authentication failure; `Err` is reserved for
/// storage errors.
pub(crate) async fn authenticate<S: AuthStore>(
    store: &S,
    config: &AuthConfig,
    token_string: &str,
) -> Result<Option<Principal>> {
    if store.is_blacklisted(&fingerprint(token_string)).await? {
        debug!("rejected blacklisted access token");
        return Ok(None);
    }

    let claims = match token::verify_hs256(config.jwt_secret(), token_string, now_unix_seconds()) {
        Ok(claims) => claims,
        Err(err) => {
            debug!("access token verification failed: {err}");
            return Ok(None);
        }
    };

    let Ok(user_id) = claims.user_id.parse() else {
        debug!("access token carries a malformed subject id");
        return Ok(None);
    };

    Ok(Some(Principal {
        user_id,
        username: claims.username,
    }))
}

/// Exchange a live refresh token for a fresh access token.
///
/// The refresh token itself is left untouched: no rotation, it stays usable
/// until it expires or logout revokes it.
pub(crate) async fn refresh<S: AuthStore>(
    store: &S,
    config: &AuthConfig,
    token_value: &str,
) -> Result<RefreshOutcome> {
    let Some(record) = store.find_refresh(token_value).await? else {
        return Ok(RefreshOutcome::Invalid);
    };

    let Some(user) = store.find_user_by_id(record.user_id).await? else {
        // A live refresh token pointing at a missing user is a storage
        // inconsistency, not an auth failure.
        return Err(anyhow!("refresh token owner not found"));
    };

    let now = now_unix_seconds();
    let access_token = token::mint(
        config.jwt_secret(),
        &user.id.to_string(),
        &user.username,
        now,
        config.access_ttl_seconds(),
    )
    .map_err(|err| anyhow!("failed to mint access token: {err}"))?;

    Ok(RefreshOutcome::Success {
        token: access_token,
        username: user.username,
    })
}

/// Blacklist the access token and revoke the refresh token.
///
/// The blacklist insert uses the token's own claimed expiry when it decodes,
/// else a default horizon of now + access TTL; blacklisting proceeds even for
/// tokens that no longer parse. A blacklist write failure propagates (the
/// token would otherwise silently stay valid). Refresh revocation is
/// best-effort: the access token is already dead, so a failure here is logged
/// and reported via the returned flag instead of failing the logout.
pub(crate) async fn logout<S: AuthStore>(
    store: &S,
    config: &AuthConfig,
    bearer_token: &str,
    refresh_value: &str,
) -> Result<bool> {
    let expires_at = token::decode_exp_unverified(bearer_token)
        .unwrap_or_else(|| now_unix_seconds() + config.access_ttl_seconds());

    store
        .create_blacklist(&fingerprint(bearer_token), expires_at)
        .await?;

    match store.revoke_refresh(refresh_value).await {
        Ok(()) => Ok(true),
        Err(err) => {
            error!("failed to revoke refresh token during logout: {err}");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::store::memory::MemoryAuthStore;
    use super::super::utils::hash_password;
    use super::*;
    use anyhow::Context;
    use secrecy::SecretString;

    fn config() -> AuthConfig {
        AuthConfig::new(SecretString::from("state-machine-secret".to_string()))
    }

    fn store_with_alice() -> Result<MemoryAuthStore> {
        let store = MemoryAuthStore::default();
        store.add_user("alice", &hash_password("correct")?);
        Ok(store)
    }

    async fn login_alice(store: &MemoryAuthStore) -> Result<(String, String)> {
        match login(store, &config(), "alice", "correct").await? {
            LoginOutcome::Success {
                token,
                refresh_token,
            } => Ok((token, refresh_token)),
            other => Err(anyhow!("expected successful login, got {other:?}")),
        }
    }

    #[tokio::test]
    async fn login_issues_access_and_refresh_tokens() -> Result<()> {
        let store = store_with_alice()?;
        let (token, refresh_token) = login_alice(&store).await?;

        // Exactly one refresh row, expiring seven days out (±1s).
        assert_eq!(store.refresh_rows(), 1);
        let expires_at = store
            .refresh_expiry(&refresh_token)
            .context("refresh row missing")?;
        let expected = now_unix_seconds() + REFRESH_TOKEN_TTL_SECONDS;
        assert!((expires_at - expected).abs() <= 1);

        let principal = authenticate(&store, &config(), &token)
            .await?
            .context("freshly minted token should authenticate")?;
        assert_eq!(principal.username, "alice");
        Ok(())
    }

    #[tokio::test]
    async fn login_with_unknown_user() -> Result<()> {
        let store = store_with_alice()?;
        let outcome = login(&store, &config(), "mallory", "whatever").await?;
        assert!(matches!(outcome, LoginOutcome::UnknownUser));
        assert_eq!(store.refresh_rows(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn login_with_wrong_password_creates_no_refresh_row() -> Result<()> {
        let store = store_with_alice()?;
        let outcome = login(&store, &config(), "alice", "incorrect").await?;
        assert!(matches!(outcome, LoginOutcome::WrongPassword));
        assert_eq!(store.refresh_rows(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn authenticate_rejects_garbage_and_foreign_secret() -> Result<()> {
        let store = store_with_alice()?;
        assert!(authenticate(&store, &config(), "not-a-token").await?.is_none());

        let foreign = AuthConfig::new(SecretString::from("other-secret".to_string()));
        let (token, _) = login_alice(&store).await?;
        assert!(authenticate(&store, &foreign, &token).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn refresh_returns_new_token_without_rotation() -> Result<()> {
        let store = store_with_alice()?;
        let (_, refresh_token) = login_alice(&store).await?;

        let RefreshOutcome::Success { token, username } =
            refresh(&store, &config(), &refresh_token).await?
        else {
            panic!("live refresh token should be accepted");
        };
        assert_eq!(username, "alice");
        let principal = authenticate(&store, &config(), &token)
            .await?
            .context("refreshed token should authenticate")?;
        assert_eq!(principal.username, "alice");

        // No rotation: the same refresh token is immediately usable again.
        let outcome = refresh(&store, &config(), &refresh_token).await?;
        assert!(matches!(outcome, RefreshOutcome::Success { .. }));
        assert_eq!(store.refresh_rows(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn refresh_rejects_unknown_token() -> Result<()> {
        let store = store_with_alice()?;
        let outcome = refresh(&store, &config(), "never-issued").await?;
        assert!(matches!(outcome, RefreshOutcome::Invalid));
        Ok(())
    }

    #[tokio::test]
    async fn logout_blacklists_access_and_revokes_refresh() -> Result<()> {
        let store = store_with_alice()?;
        let (token, refresh_token) = login_alice(&store).await?;

        // Sanity: the session is live before logout.
        assert!(authenticate(&store, &config(), &token).await?.is_some());

        let revoked = logout(&store, &config(), &token, &refresh_token).await?;
        assert!(revoked);

        // The signature and expiry are still valid; only the ledger kills it.
        assert!(authenticate(&store, &config(), &token).await?.is_none());
        let outcome = refresh(&store, &config(), &refresh_token).await?;
        assert!(matches!(outcome, RefreshOutcome::Invalid));
        Ok(())
    }

    #[tokio::test]
    async fn logout_blacklists_unparseable_tokens() -> Result<()> {
        let store = store_with_alice()?;
        let revoked = logout(&store, &config(), "bearer-shaped-garbage", "no-such-refresh").await?;
        assert!(revoked);
        assert_eq!(store.blacklist_entries(), 1);
        assert!(
            authenticate(&store, &config(), "bearer-shaped-garbage")
                .await?
                .is_none()
        );
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_logout_is_benign() -> Result<()> {
        let store = store_with_alice()?;
        let (token, refresh_token) = login_alice(&store).await?;

        logout(&store, &config(), &token, &refresh_token).await?;
        logout(&store, &config(), &token, &refresh_token).await?;

        assert_eq!(store.blacklist_entries(), 1);
        assert!(authenticate(&store, &config(), &token).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn full_session_lifecycle() -> Result<()> {
        let store = store_with_alice()?;

        // login → authenticate succeeds and shows the subject
        let (t1, r1) = login_alice(&store).await?;
        let principal = authenticate(&store, &config(), &t1)
            .await?
            .context("t1 should authenticate before logout")?;
        assert_eq!(principal.username, "alice");

        // logout → both credentials die
        logout(&store, &config(), &t1, &r1).await?;
        assert!(authenticate(&store, &config(), &t1).await?.is_none());
        assert!(matches!(
            refresh(&store, &config(), &r1).await?,
            RefreshOutcome::Invalid
        ));
        Ok(())
    }
}
