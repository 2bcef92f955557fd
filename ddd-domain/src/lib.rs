//! DDD 领域层基础库（ddd-domain）
//!
//! 提供领域事件与消息传输两侧的最小抽象：
//! - 领域事件（`domain_event`）：运行时类型化的 `DomainEvent`、`EventType`，
//!   以及在业务执行期间同步分发事件的 `DomainEventBroadcaster`；
//! - 消息传输（`messaging`）：`Message`、`MessagePublisher` 与内存版总线。
//!
//! 本 crate 不绑定具体传输实现，仅定义协议与最小必要的错误类型，
//! 以便在不同基础设施（例如消息中间件）上进行适配实现。
//!
//! 典型用法：
//! 1. 为业务事件实现 `DomainEvent`，为传输消息实现 `Message`；
//! 2. 在进程装配时创建一个 `DomainEventBroadcaster` 并传给业务逻辑；
//! 3. 业务逻辑通过 `raise` 发出事件，由应用层的桥接组件转换并发布到总线。
//!
pub mod domain_event;
pub mod error;
pub mod messaging;
