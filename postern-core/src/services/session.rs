use crate::{
    Error, UserId, UserRole,
    error::AuthError,
    repositories::{PasswordRepository, RefreshTokenRepository, UserRepository},
    services::{PasswordService, RefreshTokenService, TokenService, UserService},
    token::TokenForgeConfig,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The three-field contract returned to the boundary layer on every
/// successful login, federated login, and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub user_id: UserId,
    pub access_token: String,
    pub refresh_token: String,
}

/// The authenticated caller extracted from a valid access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub role: UserRole,
}

/// Orchestrates login, refresh, and sign-out.
///
/// Per-user session state is nothing but the refresh-token hash in the
/// ledger: a non-null hash is an active session, a null hash is none.
/// Every flow that authenticates a user ends in [`SessionService::issue`],
/// so password and federated logins share one issuance path.
pub struct SessionService<U, P, R>
where
    U: UserRepository,
    P: PasswordRepository,
    R: RefreshTokenRepository,
{
    user_service: Arc<UserService<U>>,
    password_service: Arc<PasswordService<U, P>>,
    token_service: Arc<TokenService>,
    ledger: Arc<RefreshTokenService<R>>,
}

impl<U, P, R> SessionService<U, P, R>
where
    U: UserRepository,
    P: PasswordRepository,
    R: RefreshTokenRepository,
{
    /// Create a new SessionService over the given repositories and signing
    /// configuration.
    pub fn new(
        user_repository: Arc<U>,
        password_repository: Arc<P>,
        refresh_token_repository: Arc<R>,
        tokens: TokenForgeConfig,
    ) -> Self {
        Self {
            user_service: Arc::new(UserService::new(user_repository.clone())),
            password_service: Arc::new(PasswordService::new(
                user_repository,
                password_repository,
            )),
            token_service: Arc::new(TokenService::new(tokens)),
            ledger: Arc::new(RefreshTokenService::new(refresh_token_repository)),
        }
    }

    /// Issue a fresh token pair for an already-authenticated user.
    ///
    /// This is the single issuance path: it forges the pair and commits the
    /// refresh hash, which supersedes any previously active session.
    pub async fn issue(&self, user_id: &UserId) -> Result<SessionTokens, Error> {
        let user = self
            .user_service
            .get_user(user_id)
            .await?
            .ok_or(Error::Auth(AuthError::UserNotFound))?;

        let pair = self.token_service.issue_pair(&user.id)?;
        self.ledger.commit(&user.id, &pair.refresh_token).await?;

        Ok(SessionTokens {
            user_id: user.id,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// Verify credentials and start a session.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionTokens, Error> {
        let user = self.password_service.authenticate(email, password).await?;
        self.issue(&user.id).await
    }

    /// Exchange a still-valid refresh token for a fresh pair.
    ///
    /// The old token is verified (signature, expiry, subject) and then
    /// superseded in one conditional ledger update; a replayed or already
    /// rotated token fails with `InvalidRefreshToken`, a signed-out user
    /// with `NoActiveSession`.
    pub async fn refresh(
        &self,
        user_id: &UserId,
        refresh_token: &str,
    ) -> Result<SessionTokens, Error> {
        let subject = self.token_service.verify_refresh(refresh_token)?;
        if subject != *user_id {
            tracing::warn!(user_id = %user_id, "refresh token subject mismatch");
            return Err(Error::Auth(AuthError::InvalidRefreshToken));
        }

        let pair = self.token_service.issue_pair(user_id)?;
        self.ledger
            .rotate(user_id, refresh_token, &pair.refresh_token)
            .await?;

        Ok(SessionTokens {
            user_id: user_id.clone(),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// End the user's session.
    ///
    /// Idempotent. Cuts off refresh capability only: access tokens are
    /// self-certifying and outstanding ones stay valid until they expire.
    pub async fn sign_out(&self, user_id: &UserId) -> Result<(), Error> {
        self.ledger.revoke(user_id).await
    }

    /// Authenticate a caller by access token.
    ///
    /// A stateless signature/expiry check followed by a directory lookup;
    /// the ledger is never consulted, so sign-out does not affect this
    /// path.
    pub async fn authenticate(&self, access_token: &str) -> Result<Principal, Error> {
        let user_id = self.token_service.verify_access(access_token)?;

        let user = self
            .user_service
            .get_user(&user_id)
            .await?
            .ok_or(Error::Auth(AuthError::UserNotFound))?;

        Ok(Principal {
            user_id: user.id,
            role: user.role,
        })
    }
}
