//! 内存版消息总线（InMemoryMessageBus）
//!
//! 基于 `tokio::sync::broadcast` 的轻量消息总线，满足 `MessagePublisher` 协议：
//! - `publish` / `publish_to`：记录并广播消息（附带可选主题与发布时间）；
//! - `subscribe`：返回 `'static` 生命周期消息流，便于在 `tokio::spawn` 中使用；
//! - `published` / `drain`：读取已发布的消息记录，便于测试断言。
//!
//! 注意：若无订阅者，广播会被忽略，但发布记录仍会保留。

use crate::error::{DomainError, DomainResult as Result};
use crate::messaging::{Message, MessagePublisher};
use chrono::{DateTime, Utc};
use futures_core::stream::BoxStream;
use futures_util::StreamExt;
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

/// 已发布的消息
#[derive(Clone, Debug)]
pub struct PublishedMessage {
    message: Arc<dyn Message>,
    topic: Option<String>,
    published_at: DateTime<Utc>,
}

impl PublishedMessage {
    pub fn message(&self) -> &dyn Message {
        self.message.as_ref()
    }

    /// 发布时指定的主题，`None` 表示默认通道
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn published_at(&self) -> &DateTime<Utc> {
        &self.published_at
    }

    pub fn downcast_ref<M: Message>(&self) -> Option<&M> {
        self.message.downcast_ref::<M>()
    }
}

/// 内存总线配置
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct MessageBusConfig {
    /// 广播缓冲区容量
    pub capacity: usize,
}

impl Default for MessageBusConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

/// 简单的内存消息总线实现
#[derive(Clone)]
pub struct InMemoryMessageBus {
    tx: broadcast::Sender<PublishedMessage>,
    log: Arc<Mutex<Vec<PublishedMessage>>>,
}

impl Default for InMemoryMessageBus {
    fn default() -> Self {
        Self::with_config(MessageBusConfig::default())
    }
}

impl InMemoryMessageBus {
    /// 创建一个内存总线，`capacity` 为广播缓冲区容量
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_config(config: MessageBusConfig) -> Self {
        Self::new(config.capacity)
    }

    /// 返回一个 'static 生命周期的消息流
    pub fn subscribe(&self) -> BoxStream<'static, Result<PublishedMessage>> {
        let rx = self.tx.subscribe();
        let stream = BroadcastStream::new(rx)
            .map(|r| r.map_err(|e| DomainError::message_bus(e.to_string())));
        Box::pin(stream)
    }

    /// 已发布消息的快照（按发布顺序）
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.log().clone()
    }

    /// 取出并清空发布记录
    pub fn drain(&self) -> Vec<PublishedMessage> {
        std::mem::take(&mut *self.log())
    }

    pub fn len(&self) -> usize {
        self.log().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log().is_empty()
    }

    fn log(&self) -> MutexGuard<'_, Vec<PublishedMessage>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, message: Box<dyn Message>, topic: Option<&str>) {
        let published = PublishedMessage {
            message: Arc::from(message),
            topic: topic.map(str::to_owned),
            published_at: Utc::now(),
        };
        self.log().push(published.clone());
        // 若当前无订阅者，broadcast 的 send 会返回错误，这里视为非致命并忽略
        let _ = self.tx.send(published);
    }
}

impl MessagePublisher for InMemoryMessageBus {
    fn publish(&self, message: Box<dyn Message>) -> Result<()> {
        self.record(message, None);
        Ok(())
    }

    fn publish_to(&self, message: Box<dyn Message>, topic: &str) -> Result<()> {
        if topic.is_empty() {
            return Err(DomainError::InvalidValue {
                reason: "topic must not be empty".to_string(),
            });
        }
        self.record(message, Some(topic));
        Ok(())
    }
}
