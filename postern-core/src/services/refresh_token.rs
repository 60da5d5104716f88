use crate::{
    Error, UserId,
    crypto::{hash_token, verify_token_hash},
    error::AuthError,
    repositories::RefreshTokenRepository,
};
use std::sync::Arc;

/// Ledger of the per-user active refresh token.
///
/// The ledger binds at most one refresh token to a user at a time, stored
/// as a SHA-256 hash. Committing a new token supersedes the old one, which
/// is what makes stolen-then-superseded tokens permanently unusable.
pub struct RefreshTokenService<R: RefreshTokenRepository> {
    repository: Arc<R>,
}

impl<R: RefreshTokenRepository> RefreshTokenService<R> {
    /// Create a new RefreshTokenService with the given repository
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Store the hash of `refresh_token` as the user's sole active refresh
    /// token, overwriting any prior value. Idempotent per call.
    pub async fn commit(&self, user_id: &UserId, refresh_token: &str) -> Result<(), Error> {
        let hash = hash_token(refresh_token);
        self.repository.set_hash(user_id, &hash).await
    }

    /// Check `refresh_token` against the stored hash.
    ///
    /// `NoActiveSession` when no hash is on record, `InvalidRefreshToken`
    /// on mismatch.
    pub async fn validate(&self, user_id: &UserId, refresh_token: &str) -> Result<(), Error> {
        let stored = self
            .repository
            .get_hash(user_id)
            .await?
            .ok_or(Error::Auth(AuthError::NoActiveSession))?;

        if !verify_token_hash(refresh_token, &stored) {
            return Err(Error::Auth(AuthError::InvalidRefreshToken));
        }

        Ok(())
    }

    /// Atomically supersede `old_token` with `new_token`.
    ///
    /// The swap happens only if the stored hash still matches `old_token`,
    /// so of two concurrent rotations presenting the same token exactly one
    /// wins; the loser gets `InvalidRefreshToken`.
    pub async fn rotate(
        &self,
        user_id: &UserId,
        old_token: &str,
        new_token: &str,
    ) -> Result<(), Error> {
        // Missing hash is reported before the conditional swap so callers
        // can tell "signed out" apart from "superseded".
        if self.repository.get_hash(user_id).await?.is_none() {
            return Err(Error::Auth(AuthError::NoActiveSession));
        }

        let expected = hash_token(old_token);
        let new_hash = hash_token(new_token);

        if !self
            .repository
            .swap_hash(user_id, &expected, &new_hash)
            .await?
        {
            tracing::warn!(user_id = %user_id, "refresh token superseded or replayed");
            return Err(Error::Auth(AuthError::InvalidRefreshToken));
        }

        Ok(())
    }

    /// Drop the user's refresh-token hash. Idempotent: revoking with no
    /// active session is a no-op.
    pub async fn revoke(&self, user_id: &UserId) -> Result<(), Error> {
        self.repository.clear(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockRefreshTokenRepository;

    fn ledger() -> RefreshTokenService<MockRefreshTokenRepository> {
        RefreshTokenService::new(Arc::new(MockRefreshTokenRepository::default()))
    }

    #[tokio::test]
    async fn test_commit_then_validate() {
        let ledger = ledger();
        let user_id = UserId::new_random();

        ledger.commit(&user_id, "token-a").await.unwrap();
        ledger.validate(&user_id, "token-a").await.unwrap();

        let result = ledger.validate(&user_id, "token-b").await;
        assert!(matches!(
            result,
            Err(Error::Auth(AuthError::InvalidRefreshToken))
        ));
    }

    #[tokio::test]
    async fn test_validate_without_session() {
        let ledger = ledger();
        let user_id = UserId::new_random();

        let result = ledger.validate(&user_id, "token-a").await;
        assert!(matches!(
            result,
            Err(Error::Auth(AuthError::NoActiveSession))
        ));
    }

    #[tokio::test]
    async fn test_commit_supersedes_previous_token() {
        let ledger = ledger();
        let user_id = UserId::new_random();

        ledger.commit(&user_id, "token-a").await.unwrap();
        ledger.commit(&user_id, "token-b").await.unwrap();

        assert!(ledger.validate(&user_id, "token-a").await.is_err());
        ledger.validate(&user_id, "token-b").await.unwrap();
    }

    #[tokio::test]
    async fn test_rotate_wins_once() {
        let ledger = ledger();
        let user_id = UserId::new_random();

        ledger.commit(&user_id, "token-a").await.unwrap();

        ledger.rotate(&user_id, "token-a", "token-b").await.unwrap();

        // Replaying the consumed token loses the conditional swap.
        let result = ledger.rotate(&user_id, "token-a", "token-c").await;
        assert!(matches!(
            result,
            Err(Error::Auth(AuthError::InvalidRefreshToken))
        ));

        ledger.validate(&user_id, "token-b").await.unwrap();
    }

    #[tokio::test]
    async fn test_rotate_without_session() {
        let ledger = ledger();
        let user_id = UserId::new_random();

        let result = ledger.rotate(&user_id, "token-a", "token-b").await;
        assert!(matches!(
            result,
            Err(Error::Auth(AuthError::NoActiveSession))
        ));
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let ledger = ledger();
        let user_id = UserId::new_random();

        ledger.commit(&user_id, "token-a").await.unwrap();
        ledger.revoke(&user_id).await.unwrap();
        ledger.revoke(&user_id).await.unwrap();

        let result = ledger.validate(&user_id, "token-a").await;
        assert!(matches!(
            result,
            Err(Error::Auth(AuthError::NoActiveSession))
        ));
    }
}
