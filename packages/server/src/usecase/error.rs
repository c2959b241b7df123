//! UseCase 層のエラー型定義
//!
//! エラーの分類（PasswordRequired / InvalidPassword / NotFound /
//! NotAuthorized / 一時的失敗）をユースケースごとの enum として表現します。
//! 一時的失敗は `RepositoryError::Transient` のまま内包され、リトライの
//! 判断は Infrastructure 層のリトライヘルパーが行います。

use thiserror::Error;

use crate::domain::{DomainError, PasswordHashError, RepositoryError};

/// ルーム解決のエラー
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolveRoomError {
    /// ロック付きルームにパスワード無しで参加しようとした
    #[error("room is locked and requires a password")]
    PasswordRequired,

    /// パスワードがハッシュ検証に失敗した
    #[error("supplied password does not match")]
    InvalidPassword,

    /// トピックがスラグに正規化できない（空白のみ等）
    #[error("invalid topic: {0}")]
    InvalidTopic(#[from] DomainError),

    /// ハッシュ生成・照合の失敗
    #[error("password hashing failed: {0}")]
    Hash(#[from] PasswordHashError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// ルーム削除のエラー
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DeleteRoomError {
    #[error("room not found")]
    RoomNotFound,

    /// 作成者以外による削除
    #[error("only the room creator may delete it")]
    NotAuthorized,

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// メッセージ削除のエラー
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DeleteMessageError {
    #[error("message not found")]
    MessageNotFound,

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// 接続リクエスト作成のエラー
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequestConnectionError {
    /// 同じペア間に Pending のリクエストがすでにある
    /// （許容するかどうかは HandshakePolicy の設定次第）
    #[error("a pending request already exists between these users")]
    AlreadyPending,

    /// 自分自身への接続リクエスト
    #[error("cannot request a connection to oneself")]
    SelfPair,

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// 接続リクエスト解決（承諾・拒否）のエラー
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolveConnectionError {
    #[error("connection request not found")]
    RequestNotFound,

    /// 宛先ユーザー以外による解決
    #[error("only the recipient may resolve this request")]
    NotAuthorized,

    /// すでに反対の結果で解決済み
    #[error("request is no longer pending")]
    NotPending,

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
