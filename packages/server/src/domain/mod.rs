//! ドメイン層
//!
//! リレーのコアとなる値オブジェクト・エンティティ・エラー、および
//! Infrastructure 層が実装するポート（trait）を定義します。

pub mod command;
pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod message_pusher;
pub mod message_store;
pub mod registry;
pub mod token_verifier;
pub mod value_object;

pub use command::Command;
pub use entity::{ChatMessage, ConnectionEntry};
pub use error::{
    AuthError, MessagePushError, ProtocolError, RegistryError, StorageError, ValueObjectError,
};
pub use event::ServerEvent;
pub use factory::{ConnectionIdFactory, MessageIdFactory};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use message_store::MessageStore;
pub use registry::ConnectionRegistry;
pub use token_verifier::TokenVerifier;
pub use value_object::{ConnectionId, MessageContent, MessageId, RoomId, Timestamp, UserId};

#[cfg(test)]
pub use message_store::MockMessageStore;
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
