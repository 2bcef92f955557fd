use super::TopicResolver;
use super::execution_scope::ScopeId;
use crate::converter::ConverterRegistry;
use crate::error::BridgeError;
use ddd_domain::domain_event::{DomainEvent, DomainEventSubscriber};
use ddd_domain::messaging::MessagePublisher;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error};

/// 单次执行的转发统计
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BridgeStats {
    /// 收到的事件数（含失败）
    pub received: usize,
    /// 成功交给发布者的消息数
    pub published: usize,
    /// 转换或发布失败的事件数
    pub failed: usize,
}

#[derive(Default)]
struct Counters {
    received: AtomicUsize,
    published: AtomicUsize,
    failed: AtomicUsize,
}

/// 捕获全部事件的订阅者
///
/// 在一次命令执行开始时创建、结束时丢弃，只持有转发所需的引用。
/// 只处理在自身执行作用域内广播的事件，其他执行的事件直接忽略。
/// 每个事件的失败都在这里截止：记录日志、计数，然后继续处理后续事件。
pub(crate) struct EventForwarder {
    registry: Arc<ConverterRegistry>,
    publisher: Arc<dyn MessagePublisher>,
    topics: Arc<dyn TopicResolver>,
    command: &'static str,
    correlation_id: Option<String>,
    scope: ScopeId,
    counters: Counters,
}

impl EventForwarder {
    pub(crate) fn new(
        registry: Arc<ConverterRegistry>,
        publisher: Arc<dyn MessagePublisher>,
        topics: Arc<dyn TopicResolver>,
        command: &'static str,
        correlation_id: Option<String>,
    ) -> Self {
        Self {
            registry,
            publisher,
            topics,
            command,
            correlation_id,
            scope: ScopeId::next(),
            counters: Counters::default(),
        }
    }

    /// 转换并发布一个事件；失败已在此记录日志，返回值仅供调用方观察
    pub(crate) fn forward(&self, event: Option<&dyn DomainEvent>) -> Result<(), BridgeError> {
        self.counters.received.fetch_add(1, Ordering::Relaxed);

        match self.try_forward(event) {
            Ok(topic) => {
                self.counters.published.fetch_add(1, Ordering::Relaxed);
                debug!(
                    command = self.command,
                    correlation_id = ?self.correlation_id,
                    event_type = event.map(|e| e.event_type().name()),
                    topic = ?topic,
                    "domain event forwarded"
                );
                Ok(())
            }
            Err(err) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                error!(
                    command = self.command,
                    correlation_id = ?self.correlation_id,
                    event_type = event.map(|e| e.event_type().name()).unwrap_or("<absent>"),
                    stage = err.stage(),
                    error = %err,
                    "failed to forward domain event"
                );
                Err(err)
            }
        }
    }

    fn try_forward(&self, event: Option<&dyn DomainEvent>) -> Result<Option<String>, BridgeError> {
        let event = event.ok_or(BridgeError::NullEvent)?;
        let message = self.registry.convert(event)?;
        let topic = self.topics.topic(event);

        let published = match topic.as_deref() {
            Some(topic) => self.publisher.publish_to(message, topic),
            None => self.publisher.publish(message),
        };

        if let Err(source) = published {
            return Err(BridgeError::PublishFailure {
                event_type: event.event_type().name(),
                topic,
                source,
            });
        }

        Ok(topic)
    }

    pub(crate) fn scope(&self) -> ScopeId {
        self.scope
    }

    pub(crate) fn stats(&self) -> BridgeStats {
        BridgeStats {
            received: self.counters.received.load(Ordering::Relaxed),
            published: self.counters.published.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }
}

impl DomainEventSubscriber for EventForwarder {
    fn handle(&self, event: &dyn DomainEvent) {
        if !self.scope.is_current() {
            return;
        }
        let _ = self.forward(Some(event));
    }
}
