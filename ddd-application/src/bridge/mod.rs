//! 领域事件桥（bridge）
//!
//! 在一次命令执行期间拦截业务逻辑广播的全部领域事件，经转换器注册表
//! 转为传输消息后交给消息发布者；业务逻辑本身无需感知消息总线的存在。
//!
//! - `EventBridge`：长期存活的装配对象，按需创建作用域桥；
//! - `ScopedEventBridge`：单次执行的订阅生命周期，析构时保证退订；
//!   只转发在本执行作用域内广播的事件，并发执行之间互不串扰；
//! - `TopicResolver`：发布前解析可选主题。
//!
//! 单个事件的转换/发布失败只记录日志，既不影响后续事件，也不影响命令结果。

mod event_bridge;
mod execution_scope;
mod forwarder;
mod scoped;
mod topic;

pub use event_bridge::{EventBridge, EventBridgeBuilder};
pub use forwarder::BridgeStats;
pub use scoped::{BridgeState, ScopedEventBridge};
pub use topic::{ConfiguredTopicResolver, NoTopic, TopicResolver};
