//! Runtime configuration of the relay.

/// Default capacity of each connection's outbound queue.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 64;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to (e.g., "127.0.0.1")
    pub host: String,
    /// Port number to bind to (e.g., 8080)
    pub port: u16,
    /// Capacity of each connection's outbound queue; frames beyond it are dropped
    pub outbound_capacity: usize,
    /// Upper bound on rooms a single connection may join (None = unlimited)
    pub max_rooms_per_connection: Option<usize>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Outbound queue capacity, never zero.
    pub fn outbound_capacity(&self) -> usize {
        self.outbound_capacity.max(1)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
            max_rooms_per_connection: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_addr() {
        // テスト項目: host と port から bind アドレスが組み立てられる
        // given (前提条件):
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..ServerConfig::default()
        };

        // when (操作):
        let addr = config.bind_addr();

        // then (期待する結果):
        assert_eq!(addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_outbound_capacity_is_never_zero() {
        // テスト項目: 送信キュー容量に 0 が指定されても 1 に切り上げられる
        // given (前提条件):
        let config = ServerConfig {
            outbound_capacity: 0,
            ..ServerConfig::default()
        };

        // when (操作):
        let capacity = config.outbound_capacity();

        // then (期待する結果):
        assert_eq!(capacity, 1);
    }
}
