use super::forwarder::{BridgeStats, EventForwarder};
use crate::error::BridgeError;
use ddd_domain::domain_event::{DomainEvent, DomainEventBroadcaster, SubscriptionId};
use std::future::Future;
use std::sync::Arc;
use tracing::{trace, warn};

/// 桥接生命周期：`Idle → Subscribed → Unsubscribed`（终态）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgeState {
    Idle,
    Subscribed,
    Unsubscribed,
}

/// 作用域事件桥
///
/// 归属于一次命令执行，不跨执行共享：
/// - `subscribe`：把捕获全部事件的订阅者挂到广播器上；
/// - `enter` / `enter_async`：在本执行作用域内运行业务逻辑，只有其间广播的事件会被转发；
/// - `unsubscribe`：移除订阅者并返回本次统计，只生效一次；
/// - `Drop`：若仍处于 `Subscribed`，自动退订。命令正常返回、返回错误、panic
///   展开或异步执行被取消（future 被丢弃）时都会走到这里。
pub struct ScopedEventBridge {
    broadcaster: DomainEventBroadcaster,
    forwarder: Arc<EventForwarder>,
    subscription: Option<SubscriptionId>,
    state: BridgeState,
}

impl ScopedEventBridge {
    pub(crate) fn new(broadcaster: DomainEventBroadcaster, forwarder: EventForwarder) -> Self {
        Self {
            broadcaster,
            forwarder: Arc::new(forwarder),
            subscription: None,
            state: BridgeState::Idle,
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    pub fn stats(&self) -> BridgeStats {
        self.forwarder.stats()
    }

    /// `Idle → Subscribed`；其余状态下调用无效
    pub fn subscribe(&mut self) {
        if self.state != BridgeState::Idle {
            warn!(state = ?self.state, "event bridge can only subscribe once");
            return;
        }

        let id = self.broadcaster.subscribe(self.forwarder.clone());
        trace!(subscription = %id, "event bridge subscribed");
        self.subscription = Some(id);
        self.state = BridgeState::Subscribed;
    }

    /// 在本执行作用域内同步运行 `f`
    pub fn enter<R>(&self, f: impl FnOnce() -> R) -> R {
        self.forwarder.scope().enter(f)
    }

    /// 在本执行作用域内运行 `fut`，作用域随 future 在任意线程上被轮询
    pub fn enter_async<F: Future>(&self, fut: F) -> impl Future<Output = F::Output> + use<F> {
        self.forwarder.scope().enter_async(fut)
    }

    /// 进入终态并返回本次统计；重复调用只返回统计
    pub fn unsubscribe(&mut self) -> BridgeStats {
        if let Some(id) = self.subscription.take() {
            self.broadcaster.unsubscribe(id);
            trace!(subscription = %id, "event bridge unsubscribed");
        }
        self.state = BridgeState::Unsubscribed;
        self.stats()
    }

    /// 直接转发一个（可能缺失的）事件，不经过广播器
    ///
    /// 失败已记录日志并计入统计，返回值仅供观察。
    pub fn forward(&self, event: Option<&dyn DomainEvent>) -> Result<(), BridgeError> {
        self.forwarder.forward(event)
    }
}

impl Drop for ScopedEventBridge {
    fn drop(&mut self) {
        if self.state == BridgeState::Subscribed {
            self.unsubscribe();
        }
    }
}
