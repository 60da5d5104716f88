//! Core functionality for the postern authentication ecosystem
//!
//! This crate contains the domain types, error taxonomy, repository traits,
//! and services that make up the account and session-authentication core:
//! credential verification, token issuance and rotation, refresh-token
//! invalidation, and federated (third-party identity provider) login.
//!
//! The core does not speak HTTP and does not own a database. It consumes a
//! user directory and a persistence store through the narrow traits in
//! [`repositories`], and it hands tokens back to whatever boundary layer is
//! driving it.
//!
//! See [`User`] for the core user struct, [`TokenPair`] for the issued
//! access/refresh pair, and [`services`] for the service layer.
pub mod crypto;
pub mod error;
pub mod id;
pub mod repositories;
pub mod services;
pub mod token;
pub mod user;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;
pub use token::{JwtClaims, JwtConfig, JwtKey, TokenForgeConfig, TokenPair};
pub use user::{NewUser, User, UserId, UserRole};
