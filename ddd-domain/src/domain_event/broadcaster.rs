//! 领域事件广播器（DomainEventBroadcaster）
//!
//! 进程内的同步发布/订阅机制：业务逻辑调用 `raise` 时，广播器在调用方所在的
//! 线程/任务上依次调用当前全部订阅者，不经过队列，也不另起分发线程。
//!
//! 广播器以显式实例传递（内部为 `Arc`，克隆即共享同一订阅表），
//! 测试可以为每个用例创建独立实例，无需进程级的全局状态。
//!
use super::DomainEvent;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 事件订阅者
///
/// `handle` 不返回结果，实现方需自行消化失败，不应 panic。
pub trait DomainEventSubscriber: Send + Sync {
    fn handle(&self, event: &dyn DomainEvent);
}

impl<F> DomainEventSubscriber for F
where
    F: Fn(&dyn DomainEvent) + Send + Sync,
{
    fn handle(&self, event: &dyn DomainEvent) {
        self(event)
    }
}

/// 订阅句柄：`subscribe` 返回，`unsubscribe` 时凭此移除对应订阅者
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

#[derive(Default)]
struct Subscribers {
    next_id: AtomicU64,
    entries: DashMap<SubscriptionId, Arc<dyn DomainEventSubscriber>>,
}

/// 线程安全的领域事件广播器
#[derive(Clone, Default)]
pub struct DomainEventBroadcaster {
    inner: Arc<Subscribers>,
}

impl DomainEventBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册订阅者，返回唯一的订阅句柄
    pub fn subscribe(&self, subscriber: Arc<dyn DomainEventSubscriber>) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.entries.insert(id, subscriber);
        id
    }

    /// 移除订阅者；句柄不存在（或已移除）时返回 `false`
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.entries.remove(&id).is_some()
    }

    /// 将事件同步投递给当前全部订阅者（按订阅先后顺序）
    ///
    /// 投递前先对订阅表做快照并释放锁，因此订阅者在 `handle` 中再次 `raise`、
    /// 订阅或退订都是安全的；快照之后新增的订阅者不会收到本次事件。
    pub fn raise(&self, event: &dyn DomainEvent) {
        for subscriber in self.snapshot() {
            subscriber.handle(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.inner.entries.contains_key(&id)
    }

    fn snapshot(&self) -> Vec<Arc<dyn DomainEventSubscriber>> {
        let mut entries: Vec<(SubscriptionId, Arc<dyn DomainEventSubscriber>)> = self
            .inner
            .entries
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries.into_iter().map(|(_, s)| s).collect()
    }
}

impl fmt::Debug for DomainEventBroadcaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainEventBroadcaster")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
