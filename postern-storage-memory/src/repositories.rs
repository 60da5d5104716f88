use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use postern_core::{
    Error, User, UserId,
    crypto::constant_time_compare,
    error::StorageError,
    repositories::{
        PasswordRepository, PasswordRepositoryProvider, RefreshTokenRepository,
        RefreshTokenRepositoryProvider, RepositoryProvider, UserRepository,
        UserRepositoryProvider,
    },
    user::NewUser,
};

/// In-memory user directory.
///
/// The email index enforces the uniqueness constraint a relational backend
/// would carry on the email column.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, Error> {
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

        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(Error::Storage(StorageError::Constraint(format!(
                "email already exists: {}",
                user.email
            )))),
            Entry::Vacant(entry) => {
                entry.insert(user.id.clone());
                self.users.insert(user.id.clone(), user.clone());
                Ok(user)
            }
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let id = match self.emails.get(email) {
            Some(id) => id.clone(),
            None => return Ok(None),
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn update(&self, user: &User) -> Result<User, Error> {
        let mut entry = self
            .users
            .get_mut(&user.id)
            .ok_or(Error::Storage(StorageError::NotFound))?;

        if entry.email != user.email {
            match self.emails.entry(user.email.clone()) {
                Entry::Occupied(_) => {
                    return Err(Error::Storage(StorageError::Constraint(format!(
                        "email already exists: {}",
                        user.email
                    ))));
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(user.id.clone());
                }
            }
            self.emails.remove(&entry.email);
        }

        let mut updated = user.clone();
        updated.updated_at = Utc::now();
        *entry = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &UserId) -> Result<(), Error> {
        if let Some((_, user)) = self.users.remove(id) {
            self.emails.remove(&user.email);
        }
        Ok(())
    }

    async fn mark_email_verified(&self, user_id: &UserId) -> Result<(), Error> {
        let mut user = self
            .users
            .get_mut(user_id)
            .ok_or(Error::Storage(StorageError::NotFound))?;
        user.email_verified_at = Some(Utc::now());
        user.updated_at = Utc::now();
        Ok(())
    }
}

/// In-memory password-hash store.
#[derive(Default)]
pub struct MemoryPasswordRepository {
    hashes: DashMap<UserId, String>,
}

#[async_trait]
impl PasswordRepository for MemoryPasswordRepository {
    async fn set_password_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error> {
        self.hashes.insert(user_id.clone(), hash.to_string());
        Ok(())
    }

    async fn get_password_hash(&self, user_id: &UserId) -> Result<Option<String>, Error> {
        Ok(self.hashes.get(user_id).map(|h| h.clone()))
    }

    async fn remove_password_hash(&self, user_id: &UserId) -> Result<(), Error> {
        self.hashes.remove(user_id);
        Ok(())
    }
}

/// In-memory refresh-token hash store.
#[derive(Default)]
pub struct MemoryRefreshTokenRepository {
    hashes: DashMap<UserId, String>,
}

#[async_trait]
impl RefreshTokenRepository for MemoryRefreshTokenRepository {
    async fn set_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error> {
        self.hashes.insert(user_id.clone(), hash.to_string());
        Ok(())
    }

    async fn get_hash(&self, user_id: &UserId) -> Result<Option<String>, Error> {
        Ok(self.hashes.get(user_id).map(|h| h.clone()))
    }

    async fn clear(&self, user_id: &UserId) -> Result<(), Error> {
        self.hashes.remove(user_id);
        Ok(())
    }

    async fn swap_hash(
        &self,
        user_id: &UserId,
        expected_hash: &str,
        new_hash: &str,
    ) -> Result<bool, Error> {
        // The entry guard locks the key for the duration of the compare and
        // swap, so concurrent rotations serialize and only one can match.
        match self.hashes.entry(user_id.clone()) {
            Entry::Occupied(mut entry)
                if constant_time_compare(entry.get().as_bytes(), expected_hash.as_bytes()) =>
            {
                entry.insert(new_hash.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// In-memory implementation of the full repository provider.
#[derive(Default)]
pub struct MemoryRepositoryProvider {
    users: MemoryUserRepository,
    passwords: MemoryPasswordRepository,
    refresh_tokens: MemoryRefreshTokenRepository,
}

impl MemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepositoryProvider for MemoryRepositoryProvider {
    type UserRepo = MemoryUserRepository;

    fn user(&self) -> &Self::UserRepo {
        &self.users
    }
}

impl PasswordRepositoryProvider for MemoryRepositoryProvider {
    type PasswordRepo = MemoryPasswordRepository;

    fn password(&self) -> &Self::PasswordRepo {
        &self.passwords
    }
}

impl RefreshTokenRepositoryProvider for MemoryRepositoryProvider {
    type RefreshTokenRepo = MemoryRefreshTokenRepository;

    fn refresh_token(&self) -> &Self::RefreshTokenRepo {
        &self.refresh_tokens
    }
}

#[async_trait]
impl RepositoryProvider for MemoryRepositoryProvider {
    async fn migrate(&self) -> Result<(), Error> {
        // Nothing to migrate in memory.
        Ok(())
    }

    async fn health_check(&self) -> Result<(), Error> {
        Ok(())
    }
}
