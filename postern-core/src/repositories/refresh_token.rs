use crate::{Error, UserId};
use async_trait::async_trait;

/// Repository for the per-user refresh-token hash
///
/// Session state is a single nullable hash per user: `Some` means an active
/// session, `None` means no session. Backends never see raw refresh tokens,
/// only their hashes.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Store `hash` as the user's sole active refresh-token hash,
    /// overwriting any prior value.
    async fn set_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error>;

    /// Retrieve the user's current refresh-token hash, if any.
    async fn get_hash(&self, user_id: &UserId) -> Result<Option<String>, Error>;

    /// Clear the user's refresh-token hash. Clearing an absent hash is a
    /// no-op, not an error.
    async fn clear(&self, user_id: &UserId) -> Result<(), Error>;

    /// Replace the stored hash with `new_hash` only if it still equals
    /// `expected_hash`, returning whether the swap happened.
    ///
    /// This must be a single conditional update against the backing store:
    /// two concurrent rotations presenting the same expected hash must not
    /// both succeed.
    async fn swap_hash(
        &self,
        user_id: &UserId,
        expected_hash: &str,
        new_hash: &str,
    ) -> Result<bool, Error>;
}
