use crate::{
    Error, User, UserId, UserRole,
    error::AuthError,
    repositories::{PasswordRepository, UserRepository},
    services::UserService,
    validation::validate_password,
};
use std::sync::Arc;

/// Service for credential verification and password management
pub struct PasswordService<U: UserRepository, P: PasswordRepository> {
    user_service: Arc<UserService<U>>,
    password_repository: Arc<P>,
}

impl<U: UserRepository, P: PasswordRepository> PasswordService<U, P> {
    /// Create a new PasswordService with the given repositories
    pub fn new(user_repository: Arc<U>, password_repository: Arc<P>) -> Self {
        let user_service = Arc::new(UserService::new(user_repository));
        Self {
            user_service,
            password_repository,
        }
    }

    /// Register a new user with a password.
    ///
    /// Fails with `UserAlreadyExists` when the email is taken; the existing
    /// account is never touched, so registration can not be used to take
    /// over an account by resetting its password.
    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        name: Option<String>,
    ) -> Result<User, Error> {
        validate_password(password)?;

        if self
            .user_service
            .get_user_by_email(email)
            .await?
            .is_some()
        {
            return Err(Error::Auth(AuthError::UserAlreadyExists));
        }

        let password_hash = Self::hash_password(password);

        let user = self
            .user_service
            .create_user(email, name, UserRole::User)
            .await?;

        self.password_repository
            .set_password_hash(&user.id, &password_hash)
            .await?;

        Ok(user)
    }

    /// Authenticate a user with email and password.
    ///
    /// Unknown email, missing hash (federation-only account), and password
    /// mismatch all collapse into `InvalidCredentials`, so the outcome
    /// reveals nothing about whether the email is registered.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, Error> {
        let user = self
            .user_service
            .get_user_by_email(email)
            .await?
            .ok_or(Error::Auth(AuthError::InvalidCredentials))?;

        let password_hash = self
            .password_repository
            .get_password_hash(&user.id)
            .await?
            .ok_or(Error::Auth(AuthError::InvalidCredentials))?;

        if !Self::verify_password(password, &password_hash) {
            return Err(Error::Auth(AuthError::InvalidCredentials));
        }

        Ok(user)
    }

    /// Change a user's password, verifying the old one first.
    pub async fn change_password(
        &self,
        user_id: &UserId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), Error> {
        validate_password(new_password)?;

        let current_hash = self
            .password_repository
            .get_password_hash(user_id)
            .await?
            .ok_or(Error::Auth(AuthError::InvalidCredentials))?;

        if !Self::verify_password(old_password, &current_hash) {
            return Err(Error::Auth(AuthError::InvalidCredentials));
        }

        let new_hash = Self::hash_password(new_password);

        self.password_repository
            .set_password_hash(user_id, &new_hash)
            .await?;

        Ok(())
    }

    /// Set a user's password (directory-level operation, no old password
    /// required)
    pub async fn set_password(&self, user_id: &UserId, password: &str) -> Result<(), Error> {
        validate_password(password)?;

        let password_hash = Self::hash_password(password);
        self.password_repository
            .set_password_hash(user_id, &password_hash)
            .await
    }

    /// Remove a user's password, turning it into a federation-only account
    pub async fn remove_password(&self, user_id: &UserId) -> Result<(), Error> {
        self.password_repository.remove_password_hash(user_id).await
    }

    /// Hash a password using argon2
    fn hash_password(password: &str) -> String {
        use password_auth::generate_hash;
        generate_hash(password)
    }

    /// Verify a password against a hash.
    ///
    /// Any verification failure, including an unparseable stored hash, is
    /// a non-match.
    fn verify_password(password: &str, hash: &str) -> bool {
        use password_auth::verify_password;
        verify_password(password, hash).is_ok()
    }
}
