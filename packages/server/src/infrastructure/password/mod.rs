//! PasswordHasher 実装

pub mod argon2;

pub use argon2::Argon2PasswordHasher;
