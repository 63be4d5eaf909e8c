//! 消息总线核心实现
//!
//! A thin broadcast fan-out: publishers never block and never observe
//! delivery failures; slow or disconnected subscribers simply miss
//! messages (at-most-once). Per-connection audience filtering happens in
//! the WebSocket pump, not here.

use std::sync::Arc;

use dashmap::DashMap;
use shared::message::{Audience, BusMessage};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Connected push channel client (for diagnostics)
#[derive(Debug, Clone)]
pub struct ConnectedClient {
    pub id: String,
    pub audience: Audience,
}

/// 消息总线 - 负责广播和连接管理
#[derive(Debug, Clone)]
pub struct MessageBus {
    /// 服务器到客户端的广播通道
    server_tx: broadcast::Sender<BusMessage>,
    /// 关闭信号令牌
    shutdown_token: CancellationToken,
    /// 已连接的客户端 (connection id -> info)
    clients: Arc<DashMap<String, ConnectedClient>>,
}

impl MessageBus {
    /// 创建默认容量 (1024) 的消息总线
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// 创建指定容量的消息总线
    pub fn with_capacity(capacity: usize) -> Self {
        let (server_tx, _) = broadcast::channel(capacity);
        Self {
            server_tx,
            shutdown_token: CancellationToken::new(),
            clients: Arc::new(DashMap::new()),
        }
    }

    /// 发布消息 (服务器 -> 所有订阅者)
    ///
    /// Fire-and-forget: an error just means nobody is connected.
    pub fn publish(&self, msg: BusMessage) {
        if self.server_tx.send(msg).is_err() {
            tracing::debug!("No push channel subscribers, message dropped");
        }
    }

    /// 订阅服务器广播 (每个连接一个接收端)
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.server_tx.subscribe()
    }

    /// 注册新连接
    pub fn register(&self, client: ConnectedClient) {
        self.clients.insert(client.id.clone(), client);
    }

    /// 注销连接
    pub fn unregister(&self, id: &str) {
        self.clients.remove(id);
    }

    /// 获取已连接客户端列表
    pub fn connected_clients(&self) -> Vec<ConnectedClient> {
        self.clients.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// 获取关闭令牌 (连接任务监听此信号退出)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 优雅关闭消息总线
    pub fn shutdown(&self) {
        tracing::info!("Shutting down message bus");
        self.shutdown_token.cancel();
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::EventType;

    #[test]
    fn test_publish_without_subscribers_does_not_panic() {
        let bus = MessageBus::new();
        bus.publish(BusMessage::queue_update());
    }

    #[tokio::test]
    async fn test_subscribers_receive_published_messages() {
        let bus = MessageBus::new();
        let mut rx = bus.subscribe();

        bus.publish(BusMessage::queue_update());
        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.event_type, EventType::QueueUpdate);
    }

    #[test]
    fn test_connection_registry() {
        let bus = MessageBus::new();
        bus.register(ConnectedClient {
            id: "c1".to_string(),
            audience: Audience::Guest,
        });
        bus.register(ConnectedClient {
            id: "c2".to_string(),
            audience: Audience::Admin,
        });
        assert_eq!(bus.client_count(), 2);

        bus.unregister("c1");
        assert_eq!(bus.client_count(), 1);
        assert_eq!(bus.connected_clients()[0].id, "c2");
    }
}
