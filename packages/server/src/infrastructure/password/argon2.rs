//! Argon2 による PasswordHasher 実装
//!
//! ロック付きルームのパスワードをソルト付き PHC 文字列として保存します。
//! 照合は argon2 クレート内部の定数時間比較に委ねます。

use argon2::password_hash::{PasswordHash, PasswordVerifier, SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher as _};

use crate::domain::{PasswordHashError, PasswordHasher};

/// Argon2 実装
///
/// デフォルトパラメータ（Argon2id v19）を使用。コスト係数を上げたい場合は
/// `Argon2::new` でチューニングした instance を持たせる拡張余地があります。
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordHashError::Hash(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordHashError::Malformed(e.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordHashError::Malformed(e.to_string())),
        }
    }
}
