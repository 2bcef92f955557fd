use crate::error::BridgeError;
use ddd_domain::domain_event::{DomainEvent, EventType};
use ddd_domain::messaging::{Message, MessageType};
use std::any::type_name;
use std::sync::Arc;

/// 领域事件转换器（单一类型）
///
/// 把一种具体的领域事件映射为一种传输消息。通过关联类型显式声明
/// “处理哪种事件、产出哪种消息”，注册表据此建立类型到转换器的一一绑定。
///
/// `convert` 应为纯函数：不产生可观察的副作用，内部失败以 `Err` 返回，
/// 由桥接层记录日志。
pub trait EventConverter: Send + Sync + 'static {
    type Event: DomainEvent;
    type Message: Message;

    fn convert(&self, event: &Self::Event) -> anyhow::Result<Self::Message>;
}

/// 类型擦除后的转换器
///
/// 注册表只面向该 trait 工作。一般通过 [`TypedConverter`] 由 [`EventConverter`]
/// 自动获得；直接实现时必须恰好声明一种事件类型与一种消息类型，否则注册失败。
pub trait ErasedEventConverter: Send + Sync {
    /// 转换器名称（用于错误信息与日志）
    fn converter_name(&self) -> &str;

    /// 声明处理的事件类型
    fn declared_event_types(&self) -> Vec<EventType>;

    /// 声明产出的消息类型
    fn declared_message_types(&self) -> Vec<MessageType>;

    fn convert(&self, event: &dyn DomainEvent) -> Result<Box<dyn Message>, BridgeError>;
}

impl<T> ErasedEventConverter for Arc<T>
where
    T: ErasedEventConverter + ?Sized,
{
    fn converter_name(&self) -> &str {
        (**self).converter_name()
    }

    fn declared_event_types(&self) -> Vec<EventType> {
        (**self).declared_event_types()
    }

    fn declared_message_types(&self) -> Vec<MessageType> {
        (**self).declared_message_types()
    }

    fn convert(&self, event: &dyn DomainEvent) -> Result<Box<dyn Message>, BridgeError> {
        (**self).convert(event)
    }
}

/// 把 [`EventConverter`] 适配为 [`ErasedEventConverter`]
///
/// 在调用具体转换逻辑前做一次类型检查，类型不符时返回 `ConversionTypeMismatch`。
pub struct TypedConverter<C> {
    inner: C,
}

impl<C: EventConverter> TypedConverter<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: EventConverter> ErasedEventConverter for TypedConverter<C> {
    fn converter_name(&self) -> &str {
        type_name::<C>()
    }

    fn declared_event_types(&self) -> Vec<EventType> {
        vec![EventType::of::<C::Event>()]
    }

    fn declared_message_types(&self) -> Vec<MessageType> {
        vec![MessageType::of::<C::Message>()]
    }

    fn convert(&self, event: &dyn DomainEvent) -> Result<Box<dyn Message>, BridgeError> {
        let Some(typed) = event.downcast_ref::<C::Event>() else {
            return Err(BridgeError::ConversionTypeMismatch {
                expected: type_name::<C::Event>(),
                found: event.event_type().name(),
            });
        };

        match self.inner.convert(typed) {
            Ok(message) => Ok(Box::new(message)),
            Err(source) => Err(BridgeError::ConversionFailure {
                event_type: type_name::<C::Event>(),
                source,
            }),
        }
    }
}
