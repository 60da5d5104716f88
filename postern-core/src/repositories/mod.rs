//! Repository traits for data access
//!
//! These traits are the narrow seam between the authentication core and its
//! external collaborators: the user directory and the persistence store.
//! The core never assumes SQL, a particular schema, or even a database; any
//! backend that can honor these contracts will do.
//!
//! The hierarchy follows a composable pattern:
//!
//! - Individual `*Repository` traits define the operations for each data
//!   domain
//! - Individual `*RepositoryProvider` traits provide access to each
//!   repository type
//! - [`RepositoryProvider`] is a supertrait combining all provider traits
//!   plus lifecycle methods
//!
//! Backends implement the provider traits once; services stay generic over
//! single repositories via the adapters in [`adapter`].

pub mod adapter;
pub mod password;
pub mod refresh_token;
pub mod user;

pub use adapter::{
    PasswordRepositoryAdapter, RefreshTokenRepositoryAdapter, UserRepositoryAdapter,
};
pub use password::PasswordRepository;
pub use refresh_token::RefreshTokenRepository;
pub use user::UserRepository;

use async_trait::async_trait;

use crate::Error;

/// Provider trait for user repository access.
pub trait UserRepositoryProvider: Send + Sync + 'static {
    /// The user repository implementation type
    type UserRepo: UserRepository;

    /// Get the user repository
    fn user(&self) -> &Self::UserRepo;
}

/// Provider trait for password repository access.
pub trait PasswordRepositoryProvider: Send + Sync + 'static {
    /// The password repository implementation type
    type PasswordRepo: PasswordRepository;

    /// Get the password repository
    fn password(&self) -> &Self::PasswordRepo;
}

/// Provider trait for refresh-token repository access.
pub trait RefreshTokenRepositoryProvider: Send + Sync + 'static {
    /// The refresh-token repository implementation type
    type RefreshTokenRepo: RefreshTokenRepository;

    /// Get the refresh-token repository
    fn refresh_token(&self) -> &Self::RefreshTokenRepo;
}

/// Provider trait that storage implementations must implement to provide
/// all repositories, plus lifecycle methods for migrations and health
/// checks.
#[async_trait]
pub trait RepositoryProvider:
    UserRepositoryProvider + PasswordRepositoryProvider + RefreshTokenRepositoryProvider
{
    /// Run migrations for all repositories
    async fn migrate(&self) -> Result<(), Error>;

    /// Health check for all repositories
    async fn health_check(&self) -> Result<(), Error>;
}
