//! パスワードハッシュの抽象化
//!
//! ロック付きルームのパスワードゲートが必要とするインターフェース。
//! 具体的なアルゴリズム（Argon2）は Infrastructure 層が実装します。

use thiserror::Error;

/// パスワードハッシュ操作のエラー
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PasswordHashError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("stored password hash is malformed: {0}")]
    Malformed(String),
}

/// パスワードのハッシュ化と検証
///
/// 実装はソルト付き・コスト係数付きの一方向ハッシュを生成し、
/// 検証は定数時間比較で行うこと。
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// 平文パスワードから PHC 形式のハッシュ文字列を生成
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// 平文パスワードを保存済みハッシュと照合（一致すれば true）
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
