//! 主题解析（TopicResolver）
//!
//! 每个事件在发布前可解析出一个可选主题：有主题则走主题发布，
//! 否则发布到传输层默认通道。默认实现 [`NoTopic`] 总是返回 `None`。
//!
use crate::config::EventBridgeConfig;
use ddd_domain::domain_event::DomainEvent;
use std::collections::HashMap;

pub trait TopicResolver: Send + Sync {
    fn topic(&self, event: &dyn DomainEvent) -> Option<String>;
}

impl<F> TopicResolver for F
where
    F: Fn(&dyn DomainEvent) -> Option<String> + Send + Sync,
{
    fn topic(&self, event: &dyn DomainEvent) -> Option<String> {
        self(event)
    }
}

/// 不指定主题，全部发布到默认通道
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTopic;

impl TopicResolver for NoTopic {
    fn topic(&self, _event: &dyn DomainEvent) -> Option<String> {
        None
    }
}

/// 基于配置的主题解析
///
/// 先按完整类型路径匹配，再按短类型名匹配，都未命中时使用 `default_topic`。
#[derive(Clone, Debug, Default)]
pub struct ConfiguredTopicResolver {
    topics: HashMap<String, String>,
    default_topic: Option<String>,
}

impl ConfiguredTopicResolver {
    pub fn from_config(config: &EventBridgeConfig) -> Self {
        Self {
            topics: config.topics.clone(),
            default_topic: config.default_topic.clone(),
        }
    }
}

impl TopicResolver for ConfiguredTopicResolver {
    fn topic(&self, event: &dyn DomainEvent) -> Option<String> {
        let event_type = event.event_type();
        self.topics
            .get(event_type.name())
            .or_else(|| self.topics.get(event_type.short_name()))
            .or(self.default_topic.as_ref())
            .cloned()
    }
}
