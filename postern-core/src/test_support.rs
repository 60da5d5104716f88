//! In-memory mock repositories shared by service unit tests.

use crate::{
    Error, User, UserId,
    error::StorageError,
    repositories::{PasswordRepository, RefreshTokenRepository, UserRepository},
    user::NewUser,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
pub(crate) struct MockUserRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
}

impl MockUserRepository {
    pub(crate) async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, Error> {
        let mut users = self.users.lock().await;
        if users.values().any(|u| u.email == new_user.email) {
            return Err(Error::Storage(StorageError::Constraint(
                "email already exists".to_string(),
            )));
        }

        let now = Utc::now();
        let user = User {
            id: new_user.id,
            email: new_user.email,
            name: new_user.name,
            role: new_user.role,
            email_verified_at: new_user.email_verified_at,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        Ok(self.users.lock().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<User, Error> {
        let mut users = self.users.lock().await;
        if !users.contains_key(&user.id) {
            return Err(Error::Storage(StorageError::NotFound));
        }
        let mut updated = user.clone();
        updated.updated_at = Utc::now();
        users.insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &UserId) -> Result<(), Error> {
        self.users.lock().await.remove(id);
        Ok(())
    }

    async fn mark_email_verified(&self, user_id: &UserId) -> Result<(), Error> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(user_id)
            .ok_or(Error::Storage(StorageError::NotFound))?;
        user.email_verified_at = Some(Utc::now());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MockPasswordRepository {
    hashes: Arc<Mutex<HashMap<UserId, String>>>,
}

impl MockPasswordRepository {
    pub(crate) async fn has_hash(&self, user_id: &UserId) -> bool {
        self.hashes.lock().await.contains_key(user_id)
    }
}

#[async_trait]
impl PasswordRepository for MockPasswordRepository {
    async fn set_password_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error> {
        self.hashes
            .lock()
            .await
            .insert(user_id.clone(), hash.to_string());
        Ok(())
    }

    async fn get_password_hash(&self, user_id: &UserId) -> Result<Option<String>, Error> {
        Ok(self.hashes.lock().await.get(user_id).cloned())
    }

    async fn remove_password_hash(&self, user_id: &UserId) -> Result<(), Error> {
        self.hashes.lock().await.remove(user_id);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MockRefreshTokenRepository {
    hashes: Arc<Mutex<HashMap<UserId, String>>>,
}

#[async_trait]
impl RefreshTokenRepository for MockRefreshTokenRepository {
    async fn set_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error> {
        self.hashes
            .lock()
            .await
            .insert(user_id.clone(), hash.to_string());
        Ok(())
    }

    async fn get_hash(&self, user_id: &UserId) -> Result<Option<String>, Error> {
        Ok(self.hashes.lock().await.get(user_id).cloned())
    }

    async fn clear(&self, user_id: &UserId) -> Result<(), Error> {
        self.hashes.lock().await.remove(user_id);
        Ok(())
    }

    async fn swap_hash(
        &self,
        user_id: &UserId,
        expected_hash: &str,
        new_hash: &str,
    ) -> Result<bool, Error> {
        let mut hashes = self.hashes.lock().await;
        match hashes.get(user_id) {
            Some(stored) if crate::crypto::constant_time_compare(
                stored.as_bytes(),
                expected_hash.as_bytes(),
            ) =>
            {
                hashes.insert(user_id.clone(), new_hash.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
