//! Service layer for authentication logic
//!
//! This module contains concrete service implementations that encapsulate
//! credential verification, token issuance and rotation, refresh-token
//! bookkeeping, and federated login.

pub mod federation;
pub mod password;
pub mod refresh_token;
pub mod session;
pub mod token;
pub mod user;

pub use federation::{FederationService, ProviderProfile};
pub use password::PasswordService;
pub use refresh_token::RefreshTokenService;
pub use session::{Principal, SessionService, SessionTokens};
pub use token::TokenService;
pub use user::UserService;
