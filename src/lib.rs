//! # Registro (Participant Registration Backend)
//!
//! `registro` is a participant-registration backend with a small, self-contained
//! authentication subsystem.
//!
//! ## Authentication
//!
//! Login issues two credentials with different transports:
//!
//! - A short-lived **access token** (HS256-signed JWT) returned in the response
//!   body and presented as a bearer header. Never stored server-side; validity
//!   is derived from its signature, its expiry, and the revocation ledger.
//! - A long-lived **refresh token** (opaque, 256-bit random) persisted in the
//!   database and bound to an `HttpOnly`, `SameSite=Lax` cookie. Exchanged for
//!   fresh access tokens; not rotated on use.
//!
//! Logout blacklists the access-token fingerprint (SHA-256 of the raw token)
//! until the token's own expiry and revokes the refresh token, so a signed,
//! unexpired token can still be shut out before its natural end of life.
//!
//! ## Participants
//!
//! Participant registration is public; listing, lookup, update, and delete are
//! protected and support pagination, name search, and allow-listed sorting.
//!
//! All authentication state lives in the database: instances are stateless and
//! can scale horizontally without session affinity.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
