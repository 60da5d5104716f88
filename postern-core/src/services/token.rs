use crate::{
    Error, UserId,
    error::TokenError,
    token::{self, JwtClaims, TokenForgeConfig, TokenPair},
};

/// Stateless token forge.
///
/// Given signing configuration, issues access/refresh pairs and verifies
/// either class, extracting the subject. Holds no mutable state; the same
/// instance serves every request.
pub struct TokenService {
    config: TokenForgeConfig,
}

impl TokenService {
    /// Create a new TokenService with the given signing configuration
    pub fn new(config: TokenForgeConfig) -> Self {
        Self { config }
    }

    /// Issue a fresh access/refresh pair for `user_id`.
    ///
    /// Both tokens carry the same subject; they differ only in signing key
    /// and expiry.
    pub fn issue_pair(&self, user_id: &UserId) -> Result<TokenPair, Error> {
        let access_token = token::sign(user_id, &self.config.access)?;
        let refresh_token = token::sign(user_id, &self.config.refresh)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verify an access token and return its subject.
    pub fn verify_access(&self, access_token: &str) -> Result<UserId, Error> {
        let claims = token::verify(access_token, &self.config.access)?;
        Self::subject(&claims)
    }

    /// Verify a refresh token and return its subject.
    pub fn verify_refresh(&self, refresh_token: &str) -> Result<UserId, Error> {
        let claims = token::verify(refresh_token, &self.config.refresh)?;
        Self::subject(&claims)
    }

    fn subject(claims: &JwtClaims) -> Result<UserId, Error> {
        if claims.sub.is_empty() {
            return Err(Error::Token(TokenError::Invalid(
                "Missing subject claim".to_string(),
            )));
        }
        Ok(UserId::new(&claims.sub))
    }
}
