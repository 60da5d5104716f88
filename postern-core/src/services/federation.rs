use crate::{
    Error, User, UserId, UserRole,
    repositories::UserRepository,
    services::UserService,
    user::NewUser,
    validation::validate_email,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Profile payload handed over by a third-party identity provider after a
/// completed OAuth2 exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProfile {
    /// Provider name, e.g. "google"
    pub provider: String,
    /// Provider-side stable subject identifier, when the provider sends one
    pub subject: Option<String>,
    /// Email claim attested by the provider
    pub email: String,
    /// Display name, if known
    pub name: Option<String>,
    /// Avatar URL, if known
    pub avatar_url: Option<String>,
}

/// Maps federated profiles onto local user identities.
///
/// Resolution is by the provider's email claim. On first sight the user is
/// auto-provisioned as a passwordless account with the provider-attested
/// email already marked verified. No tokens are issued here; callers take
/// the resolved user through the regular issuance path.
pub struct FederationService<U: UserRepository> {
    user_service: Arc<UserService<U>>,
    user_repository: Arc<U>,
}

impl<U: UserRepository> FederationService<U> {
    /// Create a new FederationService with the given repository
    pub fn new(user_repository: Arc<U>) -> Self {
        Self {
            user_service: Arc::new(UserService::new(user_repository.clone())),
            user_repository,
        }
    }

    /// Resolve a federated profile to a local user, creating one on first
    /// sight.
    pub async fn resolve(&self, profile: &ProviderProfile) -> Result<User, Error> {
        validate_email(&profile.email)?;
        let email = profile.email.to_lowercase();

        if let Some(existing) = self.user_service.get_user_by_email(&email).await? {
            return Ok(existing);
        }

        let mut builder = NewUser::builder()
            .id(UserId::new_random())
            .email(email)
            .role(UserRole::User)
            // The provider attested this email; no local verification
            // round-trip is needed.
            .email_verified_at(Some(Utc::now()));

        if let Some(name) = &profile.name {
            builder = builder.name(name.clone());
        }

        let user = self.user_repository.create(builder.build()?).await?;

        tracing::info!(
            user_id = %user.id,
            provider = %profile.provider,
            "provisioned user from federated profile"
        );

        Ok(user)
    }
}
