//! In-memory storage backend for postern
//!
//! Backs the repository traits with `dashmap`, for tests and single-process
//! deployments where the user directory and persistence store live in the
//! same process. All data is lost on drop.

mod repositories;

pub use repositories::{
    MemoryPasswordRepository, MemoryRefreshTokenRepository, MemoryRepositoryProvider,
    MemoryUserRepository,
};
