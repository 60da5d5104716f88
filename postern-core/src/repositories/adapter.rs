use crate::{
    Error, User, UserId,
    repositories::{
        PasswordRepository, RefreshTokenRepository, RepositoryProvider, UserRepository,
    },
    user::NewUser,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Adapter that wraps a [`RepositoryProvider`] and implements
/// [`UserRepository`], so services generic over a single repository can be
/// built from a provider.
pub struct UserRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> UserRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> UserRepository for UserRepositoryAdapter<R> {
    async fn create(&self, user: NewUser) -> Result<User, Error> {
        self.provider.user().create(user).await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.provider.user().find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        self.provider.user().find_by_email(email).await
    }

    async fn update(&self, user: &User) -> Result<User, Error> {
        self.provider.user().update(user).await
    }

    async fn delete(&self, id: &UserId) -> Result<(), Error> {
        self.provider.user().delete(id).await
    }

    async fn mark_email_verified(&self, user_id: &UserId) -> Result<(), Error> {
        self.provider.user().mark_email_verified(user_id).await
    }
}

/// Adapter that wraps a [`RepositoryProvider`] and implements
/// [`PasswordRepository`].
pub struct PasswordRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> PasswordRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> PasswordRepository for PasswordRepositoryAdapter<R> {
    async fn set_password_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error> {
        self.provider.password().set_password_hash(user_id, hash).await
    }

    async fn get_password_hash(&self, user_id: &UserId) -> Result<Option<String>, Error> {
        self.provider.password().get_password_hash(user_id).await
    }

    async fn remove_password_hash(&self, user_id: &UserId) -> Result<(), Error> {
        self.provider.password().remove_password_hash(user_id).await
    }
}

/// Adapter that wraps a [`RepositoryProvider`] and implements
/// [`RefreshTokenRepository`].
pub struct RefreshTokenRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> RefreshTokenRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> RefreshTokenRepository for RefreshTokenRepositoryAdapter<R> {
    async fn set_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error> {
        self.provider.refresh_token().set_hash(user_id, hash).await
    }

    async fn get_hash(&self, user_id: &UserId) -> Result<Option<String>, Error> {
        self.provider.refresh_token().get_hash(user_id).await
    }

    async fn clear(&self, user_id: &UserId) -> Result<(), Error> {
        self.provider.refresh_token().clear(user_id).await
    }

    async fn swap_hash(
        &self,
        user_id: &UserId,
        expected_hash: &str,
        new_hash: &str,
    ) -> Result<bool, Error> {
        self.provider
            .refresh_token()
            .swap_hash(user_id, expected_hash, new_hash)
            .await
    }
}
