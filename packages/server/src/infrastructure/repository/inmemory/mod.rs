//! InMemory Repository 実装
//!
//! ドメイン層が定義する Repository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## 技術的負債
//!
//! 現在、ドメインモデルを直接ストレージとして使用しています。
//! ホスト型ストア（DBMS / BaaS）のアダプタを実装する際は
//! `DB Row/JSON → DTO → ドメインモデル` の変換層が必要になります。

pub mod connection;
pub mod message;
pub mod presence;
pub mod profile;
pub mod room;

pub use connection::InMemoryConnectionRepository;
pub use message::InMemoryMessageRepository;
pub use presence::InMemoryPresenceRepository;
pub use profile::InMemoryProfileRepository;
pub use room::InMemoryRoomRepository;
