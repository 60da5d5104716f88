use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. The two cases are deliberately
    /// indistinguishable so callers cannot probe for registered emails.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    /// A refresh was attempted while no refresh-token hash is on record.
    #[error("No active session")]
    NoActiveSession,

    /// The presented refresh token does not match the stored hash, either
    /// because it was superseded by a later rotation or never issued.
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature checked out but the token is past its expiry. This is the
    /// one token failure a client can act on by refreshing.
    #[error("Token expired")]
    Expired,

    /// Bad signature, malformed payload, or wrong key.
    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Record not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

impl Error {
    /// Whether this error is a definitive rejection of credentials or
    /// tokens. Rejections must never be retried by callers.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::Auth(_) | Error::Token(_))
    }

    /// Whether this error is a transient infrastructure failure. Only this
    /// class is eligible for caller-side retry; a storage outage must never
    /// be reported as a wrong password.
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Storage(_))
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let auth_error = Error::Auth(AuthError::InvalidCredentials);
        assert_eq!(
            auth_error.to_string(),
            "Authentication error: Invalid credentials"
        );

        let token_error = Error::Token(TokenError::Expired);
        assert_eq!(token_error.to_string(), "Token error: Token expired");

        let storage_error = Error::Storage(StorageError::NotFound);
        assert_eq!(storage_error.to_string(), "Storage error: Record not found");
    }

    #[test]
    fn test_auth_error_variants() {
        assert_eq!(
            AuthError::InvalidRefreshToken.to_string(),
            "Invalid refresh token"
        );
        assert_eq!(AuthError::NoActiveSession.to_string(), "No active session");
        assert_eq!(AuthError::UserNotFound.to_string(), "User not found");
    }

    #[test]
    fn test_expired_and_invalid_are_distinct() {
        let expired = Error::Token(TokenError::Expired);
        let invalid = Error::Token(TokenError::Invalid("bad signature".to_string()));

        assert!(matches!(expired, Error::Token(TokenError::Expired)));
        assert!(matches!(invalid, Error::Token(TokenError::Invalid(_))));
        assert_ne!(expired.to_string(), invalid.to_string());
    }

    #[test]
    fn test_rejection_vs_storage_classification() {
        assert!(Error::Auth(AuthError::InvalidCredentials).is_rejection());
        assert!(Error::Token(TokenError::Expired).is_rejection());
        assert!(!Error::Storage(StorageError::Connection("timeout".to_string())).is_rejection());

        assert!(Error::Storage(StorageError::Database("down".to_string())).is_storage_error());
        assert!(!Error::Auth(AuthError::InvalidCredentials).is_storage_error());
    }

    #[test]
    fn test_error_from_conversions() {
        let error: Error = AuthError::NoActiveSession.into();
        assert!(matches!(error, Error::Auth(AuthError::NoActiveSession)));

        let error: Error = ValidationError::MissingField("email".to_string()).into();
        assert!(matches!(
            error,
            Error::Validation(ValidationError::MissingField(_))
        ));
    }
}
