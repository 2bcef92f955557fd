//! DDD 应用层（ddd-application）
//!
//! 命令处理与领域事件桥接：
//! - `command` / `command_handler` / `command_bus`：命令、同步与异步处理器、命令总线；
//! - `converter`：领域事件到传输消息的转换器与注册表；
//! - `bridge`：单次命令执行期间拦截领域事件并发布到消息总线；
//! - `event_aware_handler`：把桥接生命周期套在任意命令处理器外层。
//!
pub mod bridge;
pub mod command;
pub mod command_bus;
pub mod command_handler;
pub mod config;
pub mod context;
pub mod converter;
pub mod error;
pub mod event_aware_handler;
pub mod inmemory_command_bus;

pub use bridge::{EventBridge, ScopedEventBridge};
pub use converter::{ConverterRegistry, EventConverter};
pub use event_aware_handler::DomainEventAwareCommandHandler;
pub use inmemory_command_bus::InMemoryCommandBus;
