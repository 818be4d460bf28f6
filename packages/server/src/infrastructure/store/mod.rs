//! Message Store の実装
//!
//! - `inmemory`: プロセス内に保持する実装（永続化バックエンドの代替・テスト用）
//! - 将来的に: `postgres` など

pub mod inmemory;

pub use inmemory::InMemoryMessageStore;
