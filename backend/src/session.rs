//! Session lifecycle: sign-up, sign-in, renewal, revocation.
//!
//! A user is either signed out (no refresh token stored) or has exactly one
//! active session (one refresh token stored). Sign-in and sign-up move a user
//! into the active state, revocation moves them out, renewal and rename leave
//! the state alone.
//!
//! The service keeps no state of its own. Every decision is made against the
//! credential store, one awaited step at a time.

use std::sync::Arc;

use mongli_common::{AccessTokenResponse, AuthRequest, TokenPair};

use crate::auth::{TokenCodec, TokenKind};
use crate::config::SessionPolicy;
use crate::error::{Result, SessionError};
use crate::models::{NewUser, SessionState};
use crate::store::{CredentialStore, SwapOutcome};

/// Successful sign-in result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    /// A new identity was registered.
    Created(TokenPair),
    /// An existing identity without an active session signed in again.
    Resumed(TokenPair),
}

impl SignInOutcome {
    pub fn into_tokens(self) -> TokenPair {
        match self {
            SignInOutcome::Created(pair) | SignInOutcome::Resumed(pair) => pair,
        }
    }
}

pub struct SessionService {
    store: Arc<dyn CredentialStore>,
    codec: TokenCodec,
    policy: SessionPolicy,
}

impl SessionService {
    pub fn new(store: Arc<dyn CredentialStore>, codec: TokenCodec, policy: SessionPolicy) -> Self {
        Self {
            store,
            codec,
            policy,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Sign up a new identity or sign in an existing one.
    ///
    /// A display name selects sign-up; its absence selects sign-in. Only the
    /// selected flow runs.
    pub async fn sign_in(&self, request: &AuthRequest) -> Result<SignInOutcome> {
        if request.external_id.trim().is_empty() {
            return Err(SessionError::BadRequest("externalId must not be empty".to_string()));
        }

        match &request.display_name {
            Some(display_name) => self.sign_up(&request.external_id, display_name).await,
            None => self.resume(&request.external_id).await,
        }
    }

    async fn sign_up(&self, external_id: &str, display_name: &str) -> Result<SignInOutcome> {
        let user = self
            .store
            .create_user(&NewUser {
                external_id: external_id.to_string(),
                display_name: Some(display_name.to_string()),
            })
            .await?;

        let pair = self.issue_pair(user.internal_id)?;

        let rows = self
            .store
            .set_refresh_token(user.internal_id, &pair.refresh_token)
            .await?;
        if rows == 0 {
            return Err(SessionError::Internal(format!(
                "user {} vanished right after creation",
                user.internal_id
            )));
        }

        tracing::info!("User {} signed up", user.internal_id);
        Ok(SignInOutcome::Created(pair))
    }

    async fn resume(&self, external_id: &str) -> Result<SignInOutcome> {
        match self.store.fetch_refresh_token(external_id).await? {
            None => {
                tracing::debug!("Sign-in for unknown external id {}", external_id);
                return Err(SessionError::NotFound("user"));
            }
            Some(SessionState::Active(_)) => {
                tracing::debug!("Sign-in rejected, session already active for {}", external_id);
                return Err(SessionError::Conflict);
            }
            Some(SessionState::None) => {}
        }

        let internal_id = self
            .store
            .find_id_by_external(external_id)
            .await?
            .ok_or(SessionError::NotFound("user"))?;

        let pair = self.issue_pair(internal_id)?;
        self.store_session(internal_id, &pair.refresh_token).await?;

        tracing::info!("User {} signed in", internal_id);
        Ok(SignInOutcome::Resumed(pair))
    }

    /// Persist the refresh token of a sign-in according to the session policy.
    async fn store_session(&self, internal_id: i64, refresh_token: &str) -> Result<()> {
        match self.policy {
            SessionPolicy::LastWriteWins => {
                // Another sign-in may have stored a token since the check in
                // `resume`; it is overwritten.
                let rows = self.store.set_refresh_token(internal_id, refresh_token).await?;
                if rows == 0 {
                    return Err(SessionError::NotFound("user"));
                }
                Ok(())
            }
            SessionPolicy::FirstWriteWins => {
                match self.store.claim_session(internal_id, refresh_token).await? {
                    SwapOutcome::Swapped => Ok(()),
                    SwapOutcome::Occupied(_) => {
                        tracing::warn!("Concurrent sign-in for user {} lost the race", internal_id);
                        Err(SessionError::Conflict)
                    }
                    SwapOutcome::Missing => Err(SessionError::NotFound("user")),
                }
            }
        }
    }

    /// Issue a fresh access token for the holder of a valid refresh token.
    ///
    /// The refresh token is not rotated and the stored session is not read.
    pub async fn renew(&self, refresh_token: &str) -> Result<AccessTokenResponse> {
        if !self.codec.verify(refresh_token, TokenKind::Refresh) {
            return Err(SessionError::Unauthorized);
        }

        let subject = self
            .codec
            .subject_of(refresh_token, TokenKind::Refresh)
            .ok_or_else(|| SessionError::Internal("verified token has no subject".to_string()))?;

        let internal_id = self
            .store
            .find_id_by_internal(subject)
            .await?
            .ok_or(SessionError::NotFound("user"))?;

        let access_token = self
            .codec
            .issue(&self.codec.claim(TokenKind::Access, internal_id))?;

        tracing::debug!("Renewed access token for user {}", internal_id);
        Ok(AccessTokenResponse { access_token })
    }

    /// End the active session of the refresh token's subject.
    ///
    /// The token is not checked against the stored one: any valid refresh
    /// token of the user ends the session. A token that yields no subject is
    /// reported as an internal error rather than as unauthorized.
    pub async fn revoke(&self, refresh_token: &str) -> Result<()> {
        let internal_id = self
            .codec
            .subject_of(refresh_token, TokenKind::Refresh)
            .ok_or_else(|| SessionError::Internal("cannot read subject of refresh token".to_string()))?;

        let rows = self.store.clear_refresh_token(internal_id).await?;
        if rows == 0 {
            tracing::debug!("Revoke for user {} without active session", internal_id);
            return Err(SessionError::NotFound("active session"));
        }

        tracing::info!("User {} signed out", internal_id);
        Ok(())
    }

    /// Change the display name of the access token's subject.
    pub async fn rename(&self, access_token: &str, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(SessionError::BadRequest("name must not be empty".to_string()));
        }

        if !self.codec.verify(access_token, TokenKind::Access) {
            return Err(SessionError::Unauthorized);
        }

        let internal_id = self
            .codec
            .subject_of(access_token, TokenKind::Access)
            .ok_or_else(|| SessionError::Internal("verified token has no subject".to_string()))?;

        let rows = self.store.rename_user(internal_id, name).await?;
        if rows == 0 {
            return Err(SessionError::NotFound("user"));
        }

        tracing::info!("User {} renamed", internal_id);
        Ok(())
    }

    fn issue_pair(&self, subject: i64) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.codec.issue(&self.codec.claim(TokenKind::Access, subject))?,
            refresh_token: self.codec.issue(&self.codec.claim(TokenKind::Refresh, subject))?,
        })
    }
}
