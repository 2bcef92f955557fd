//! 消息传输协议（messaging）
//!
//! 面向消息总线的最小抽象：
//! - `Message`：可发送到总线的传输消息（运行时类型区分）；
//! - `MessagePublisher`：发布到默认通道或指定主题；
//! - `InMemoryMessageBus`：基于 `tokio::sync::broadcast` 的进程内实现，用于测试、示例与本地开发。
//!
//! 该模块不涉及序列化与网络投递，具体传输由基础设施层适配。
//!
pub mod bus;
#[cfg(feature = "inmemory")]
pub mod bus_inmemory;
pub mod message;

pub use bus::MessagePublisher;
#[cfg(feature = "inmemory")]
pub use bus_inmemory::{InMemoryMessageBus, MessageBusConfig, PublishedMessage};
pub use message::{Message, MessageType};
