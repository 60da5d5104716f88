//! # Postern
//!
//! Postern is an account and session-authentication library: it registers
//! users, verifies credentials, issues and rotates access/refresh token
//! pairs, and resolves third-party identity-provider logins onto local
//! accounts.
//!
//! The design keeps the session core small and strict:
//!
//! - Access tokens are short-lived, self-certifying JWTs; nothing persisted
//!   is consulted to check one.
//! - Refresh tokens are longer-lived JWTs whose SHA-256 hash is the only
//!   durable session state. Each user has at most one active refresh token;
//!   every login or refresh supersedes the previous one, so a replayed
//!   token always fails.
//! - Sign-out clears the stored hash and thereby cuts off refreshes;
//!   outstanding access tokens run out on their own.
//!
//! Storage is pluggable: anything implementing
//! [`repositories::RepositoryProvider`](postern_core::repositories::RepositoryProvider)
//! can back the directory and the ledger. The `memory` feature ships an
//! in-process backend suitable for tests and small deployments.
//!
//! ## Example
//!
//! ```rust,no_run
//! use postern::{Postern, TokenForgeConfig};
//! use postern_storage_memory::MemoryRepositoryProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let repositories = Arc::new(MemoryRepositoryProvider::new());
//!     let tokens = TokenForgeConfig::new_hs256(
//!         b"access-signing-secret".to_vec(),
//!         b"refresh-signing-secret".to_vec(),
//!     );
//!
//!     let postern = Postern::new(repositories, tokens);
//!
//!     let user = postern
//!         .register_user_with_password("user@example.com", "Secr3tPass!", None)
//!         .await
//!         .unwrap();
//!
//!     let session = postern
//!         .login_user_with_password("user@example.com", "Secr3tPass!")
//!         .await
//!         .unwrap();
//!     assert_eq!(session.user_id, user.id);
//! }
//! ```
use std::sync::Arc;

use postern_core::{
    repositories::{
        PasswordRepositoryAdapter, RefreshTokenRepositoryAdapter, RepositoryProvider,
        UserRepositoryAdapter,
    },
    services::{FederationService, PasswordService, SessionService, UserService},
};

/// Re-export core types from postern_core
///
/// These types are commonly used when working with the Postern API.
pub use postern_core::{
    Error, JwtClaims, JwtConfig, JwtKey, NewUser, TokenForgeConfig, TokenPair, User, UserId,
    UserRole,
    error::{AuthError, StorageError, TokenError, ValidationError},
    services::{Principal, ProviderProfile, SessionTokens},
};

/// Re-export storage backends
///
/// Available when the corresponding feature is enabled.
#[cfg(feature = "memory")]
pub use postern_storage_memory::MemoryRepositoryProvider;

/// The main authentication interface.
///
/// Constructed once with an injected repository provider and token signing
/// configuration; no ambient container or global state. Every method is an
/// independent unit of work against the backing store.
pub struct Postern<R: RepositoryProvider> {
    user_service: UserService<UserRepositoryAdapter<R>>,
    password_service:
        PasswordService<UserRepositoryAdapter<R>, PasswordRepositoryAdapter<R>>,
    session_service: SessionService<
        UserRepositoryAdapter<R>,
        PasswordRepositoryAdapter<R>,
        RefreshTokenRepositoryAdapter<R>,
    >,
    federation_service: FederationService<UserRepositoryAdapter<R>>,
}

impl<R: RepositoryProvider> Postern<R> {
    /// Create a new Postern instance over the given repositories and token
    /// signing configuration.
    pub fn new(repositories: Arc<R>, tokens: TokenForgeConfig) -> Self {
        let user_repository = Arc::new(UserRepositoryAdapter::new(repositories.clone()));
        let password_repository = Arc::new(PasswordRepositoryAdapter::new(repositories.clone()));
        let refresh_token_repository =
            Arc::new(RefreshTokenRepositoryAdapter::new(repositories.clone()));

        Self {
            user_service: UserService::new(user_repository.clone()),
            password_service: PasswordService::new(
                user_repository.clone(),
                password_repository.clone(),
            ),
            session_service: SessionService::new(
                user_repository.clone(),
                password_repository,
                refresh_token_repository,
                tokens,
            ),
            federation_service: FederationService::new(user_repository),
        }
    }

    /// Register a new user with an email and password.
    ///
    /// Fails with [`AuthError::UserAlreadyExists`] if the email is taken.
    pub async fn register_user_with_password(
        &self,
        email: &str,
        password: &str,
        name: Option<String>,
    ) -> Result<User, Error> {
        self.password_service
            .register_user(email, password, name)
            .await
    }

    /// Verify credentials and start a session.
    ///
    /// Returns the id/access/refresh triple or
    /// [`AuthError::InvalidCredentials`]; the error does not reveal whether
    /// the email was registered.
    pub async fn login_user_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionTokens, Error> {
        self.session_service
            .login_with_password(email, password)
            .await
    }

    /// Resolve a federated provider profile and start a session,
    /// auto-provisioning the user on first sight.
    pub async fn login_user_with_provider(
        &self,
        profile: &ProviderProfile,
    ) -> Result<SessionTokens, Error> {
        let user = self.federation_service.resolve(profile).await?;
        self.session_service.issue(&user.id).await
    }

    /// Exchange a still-valid refresh token for a fresh pair, superseding
    /// the old one.
    pub async fn refresh_session(
        &self,
        user_id: &UserId,
        refresh_token: &str,
    ) -> Result<SessionTokens, Error> {
        self.session_service.refresh(user_id, refresh_token).await
    }

    /// End the user's session. Idempotent.
    ///
    /// The boundary layer must have authenticated the caller via
    /// [`authenticate`](Self::authenticate) before invoking this.
    pub async fn sign_out(&self, user_id: &UserId) -> Result<(), Error> {
        self.session_service.sign_out(user_id).await
    }

    /// Authenticate a caller by access token, returning the principal.
    pub async fn authenticate(&self, access_token: &str) -> Result<Principal, Error> {
        self.session_service.authenticate(access_token).await
    }

    /// Change a user's password, verifying the old one first.
    pub async fn change_password(
        &self,
        user_id: &UserId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), Error> {
        self.password_service
            .change_password(user_id, old_password, new_password)
            .await
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, Error> {
        self.user_service.get_user(user_id).await
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        self.user_service.get_user_by_email(email).await
    }

    /// Mark a user's email as verified
    pub async fn set_user_email_verified(&self, user_id: &UserId) -> Result<(), Error> {
        self.user_service.verify_email(user_id).await
    }

    /// Delete a user and end their session.
    pub async fn delete_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.session_service.sign_out(user_id).await?;
        self.password_service.remove_password(user_id).await?;
        self.user_service.delete_user(user_id).await
    }
}
