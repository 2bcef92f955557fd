//! 事件桥装配（EventBridge）
//!
//! 长期存活的装配对象：持有转换器注册表、消息发布者、广播器与主题解析，
//! 每次命令执行时由它创建一个新的 [`ScopedEventBridge`]。
//!
use super::forwarder::EventForwarder;
use super::{ConfiguredTopicResolver, NoTopic, ScopedEventBridge, TopicResolver};
use crate::config::EventBridgeConfig;
use crate::context::AppContext;
use crate::converter::ConverterRegistry;
use bon::Builder;
use ddd_domain::domain_event::DomainEventBroadcaster;
use ddd_domain::messaging::MessagePublisher;
use std::future::Future;
use std::sync::Arc;

// 导入由 bon::Builder 生成的 typestate 模块与状态转换别名
use self::event_bridge_builder::{IsUnset, SetTopicResolver, State as BuilderState};

#[derive(Builder, Clone)]
pub struct EventBridge {
    registry: Arc<ConverterRegistry>,
    publisher: Arc<dyn MessagePublisher>,
    broadcaster: DomainEventBroadcaster,
    #[builder(default = Arc::new(NoTopic) as Arc<dyn TopicResolver>)]
    topic_resolver: Arc<dyn TopicResolver>,
}

impl<S: BuilderState> EventBridgeBuilder<S> {
    /// 由配置构造主题解析，替代手动设置 `topic_resolver`
    pub fn topic_config(self, config: &EventBridgeConfig) -> EventBridgeBuilder<SetTopicResolver<S>>
    where
        <S as BuilderState>::TopicResolver: IsUnset,
    {
        self.topic_resolver(Arc::new(ConfiguredTopicResolver::from_config(config)))
    }
}

impl EventBridge {
    /// 为一次命令执行创建处于 `Idle` 状态的作用域桥
    pub fn scope(&self, command: &'static str, ctx: &AppContext) -> ScopedEventBridge {
        let forwarder = EventForwarder::new(
            self.registry.clone(),
            self.publisher.clone(),
            self.topic_resolver.clone(),
            command,
            ctx.biz.correlation_id().map(str::to_owned),
        );
        ScopedEventBridge::new(self.broadcaster.clone(), forwarder)
    }

    /// 在桥接作用域内同步执行 `f`
    ///
    /// `f` 内广播的事件全部转换并发布，同一广播器上并发的其他执行不受影响；
    /// `f` 的返回值原样返回，转发失败只记录日志。`f` panic 时退订在展开过程中完成。
    pub fn execute<R>(&self, command: &'static str, ctx: &AppContext, f: impl FnOnce() -> R) -> R {
        let mut bridge = self.scope(command, ctx);
        bridge.subscribe();
        let output = bridge.enter(f);
        bridge.unsubscribe();
        output
    }

    /// 在桥接作用域内异步执行 `fut`
    ///
    /// 若返回的 future 在完成前被丢弃（取消），作用域桥随之析构并退订。
    pub async fn execute_async<F>(&self, command: &'static str, ctx: &AppContext, fut: F) -> F::Output
    where
        F: Future,
    {
        let mut bridge = self.scope(command, ctx);
        bridge.subscribe();
        let output = bridge.enter_async(fut).await;
        bridge.unsubscribe();
        output
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    pub fn broadcaster(&self) -> &DomainEventBroadcaster {
        &self.broadcaster
    }
}
