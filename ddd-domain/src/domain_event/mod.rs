//! 领域事件（Domain Event）与事件广播
//!
//! 定义事件载荷需要实现的最小接口（`DomainEvent`）与运行时类型标识（`EventType`），
//! 以及在一次业务执行期间把事件同步分发给订阅者的 `DomainEventBroadcaster`。

mod broadcaster;
mod business_context;
mod domain_event_trait;

pub use broadcaster::{DomainEventBroadcaster, DomainEventSubscriber, SubscriptionId};
pub use business_context::BusinessContext;
pub use domain_event_trait::{DomainEvent, EventType};

pub(crate) use domain_event_trait::short_type_name;
