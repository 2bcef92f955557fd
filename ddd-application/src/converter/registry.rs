use super::{ErasedEventConverter, EventConverter, TypedConverter};
use crate::error::BridgeError;
use ddd_domain::domain_event::{DomainEvent, EventType};
use ddd_domain::messaging::{Message, MessageType};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

struct Registration {
    event_type: EventType,
    message_type: MessageType,
    converter: Arc<dyn ErasedEventConverter>,
}

/// 转换器注册表
///
/// - 以事件的运行时 `TypeId` 为键，每种事件类型至多一个转换器；
/// - 装配期完成注册，之后只读，查找无需加锁（通常以 `Arc` 共享）；
/// - 重复注册或转换器声明不合法时，构造直接失败。
#[derive(Default)]
pub struct ConverterRegistry {
    converters: HashMap<TypeId, Registration>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ConverterRegistryBuilder {
        ConverterRegistryBuilder::default()
    }

    /// 由一组转换器构造注册表，任一注册失败即返回错误
    pub fn from_converters<I>(converters: I) -> Result<Self, BridgeError>
    where
        I: IntoIterator<Item = Arc<dyn ErasedEventConverter>>,
    {
        let mut registry = Self::new();
        for converter in converters {
            registry.register_erased(converter)?;
        }
        Ok(registry)
    }

    /// 注册类型化转换器，事件类型取自其关联类型 `C::Event`
    pub fn register<C: EventConverter>(&mut self, converter: C) -> Result<(), BridgeError> {
        self.register_erased(Arc::new(TypedConverter::new(converter)))
    }

    /// 注册类型擦除的转换器
    ///
    /// 转换器必须恰好声明一种事件类型与一种消息类型（`InvalidConverterShape`），
    /// 且该事件类型尚未注册（`DuplicateConverterRegistration`）。
    pub fn register_erased(
        &mut self,
        converter: Arc<dyn ErasedEventConverter>,
    ) -> Result<(), BridgeError> {
        let event_type = single(converter.declared_event_types(), || {
            invalid_shape(converter.as_ref(), "event")
        })?;
        let message_type = single(converter.declared_message_types(), || {
            invalid_shape(converter.as_ref(), "message")
        })?;

        if self.converters.contains_key(&event_type.id()) {
            return Err(BridgeError::DuplicateConverterRegistration {
                event_type: event_type.name(),
            });
        }

        self.converters.insert(
            event_type.id(),
            Registration {
                event_type,
                message_type,
                converter,
            },
        );

        Ok(())
    }

    /// 按事件的真实运行时类型选择转换器并执行转换
    ///
    /// 查找以 `Any::type_id` 为准，不信任事件自报的 `event_type()`。
    /// - 未注册：`UnregisteredConverterType`；
    /// - 事件自报类型与绑定的事件类型不符，或产出的消息类型与声明不符：`ConversionTypeMismatch`；
    /// - 转换器自身失败：`ConversionFailure`。
    pub fn convert(&self, event: &dyn DomainEvent) -> Result<Box<dyn Message>, BridgeError> {
        let reported = event.event_type();
        let Some(registration) = self.converters.get(&(event as &dyn Any).type_id()) else {
            return Err(BridgeError::UnregisteredConverterType {
                event_type: reported.name(),
            });
        };

        if registration.event_type != reported {
            return Err(BridgeError::ConversionTypeMismatch {
                expected: registration.event_type.name(),
                found: reported.name(),
            });
        }

        let message = registration.converter.convert(event)?;

        let produced = message.message_type();
        if produced != registration.message_type {
            return Err(BridgeError::ConversionTypeMismatch {
                expected: registration.message_type.name(),
                found: produced.name(),
            });
        }

        Ok(message)
    }

    pub fn contains(&self, event_type: &EventType) -> bool {
        self.converters.contains_key(&event_type.id())
    }

    pub fn contains_event<E: DomainEvent>(&self) -> bool {
        self.contains(&EventType::of::<E>())
    }

    /// 某事件类型绑定的消息类型
    pub fn message_type_for(&self, event_type: &EventType) -> Option<MessageType> {
        self.converters
            .get(&event_type.id())
            .map(|r| r.message_type)
    }

    /// 已注册的事件类型列表（只读视图）
    pub fn registered_event_types(&self) -> Vec<EventType> {
        self.converters.values().map(|r| r.event_type).collect()
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.converters
                    .values()
                    .map(|r| (r.event_type.name(), r.message_type.name())),
            )
            .finish()
    }
}

fn single<T>(
    mut declared: Vec<T>,
    err: impl FnOnce() -> BridgeError,
) -> Result<T, BridgeError> {
    match declared.len() {
        1 => declared.pop().ok_or_else(err),
        _ => Err(err()),
    }
}

fn invalid_shape(converter: &dyn ErasedEventConverter, kind: &str) -> BridgeError {
    BridgeError::InvalidConverterShape {
        converter: converter.converter_name().to_string(),
        reason: format!("converter must declare exactly one {kind} type"),
    }
}

/// 注册表构建器：收集转换器，`build` 时统一校验
#[derive(Default)]
pub struct ConverterRegistryBuilder {
    converters: Vec<Arc<dyn ErasedEventConverter>>,
}

impl ConverterRegistryBuilder {
    pub fn converter<C: EventConverter>(mut self, converter: C) -> Self {
        self.converters
            .push(Arc::new(TypedConverter::new(converter)));
        self
    }

    pub fn erased(mut self, converter: Arc<dyn ErasedEventConverter>) -> Self {
        self.converters.push(converter);
        self
    }

    pub fn build(self) -> Result<ConverterRegistry, BridgeError> {
        ConverterRegistry::from_converters(self.converters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct OrderCreated {
        order_id: String,
    }
    impl DomainEvent for OrderCreated {}

    #[derive(Debug)]
    struct OrderShipped {
        order_id: String,
    }
    impl DomainEvent for OrderShipped {}

    #[derive(Debug, PartialEq)]
    struct OrderCreatedMessage {
        order_id: String,
    }
    impl Message for OrderCreatedMessage {}

    #[derive(Debug, PartialEq)]
    struct OrderShippedMessage {
        order_id: String,
    }
    impl Message for OrderShippedMessage {}

    struct OrderCreatedConverter;
    impl EventConverter for OrderCreatedConverter {
        type Event = OrderCreated;
        type Message = OrderCreatedMessage;
        fn convert(&self, event: &OrderCreated) -> anyhow::Result<OrderCreatedMessage> {
            Ok(OrderCreatedMessage {
                order_id: event.order_id.clone(),
            })
        }
    }

    struct AnotherOrderCreatedConverter;
    impl EventConverter for AnotherOrderCreatedConverter {
        type Event = OrderCreated;
        type Message = OrderShippedMessage;
        fn convert(&self, event: &OrderCreated) -> anyhow::Result<OrderShippedMessage> {
            Ok(OrderShippedMessage {
                order_id: event.order_id.clone(),
            })
        }
    }

    struct OrderShippedConverter;
    impl EventConverter for OrderShippedConverter {
        type Event = OrderShipped;
        type Message = OrderShippedMessage;
        fn convert(&self, event: &OrderShipped) -> anyhow::Result<OrderShippedMessage> {
            Ok(OrderShippedMessage {
                order_id: event.order_id.clone(),
            })
        }
    }

    /// 直接实现擦除接口、声明可配置的转换器
    struct HandRolled {
        events: Vec<EventType>,
        messages: Vec<MessageType>,
        produce_shipped: bool,
    }
    impl ErasedEventConverter for HandRolled {
        fn converter_name(&self) -> &str {
            "hand-rolled"
        }
        fn declared_event_types(&self) -> Vec<EventType> {
            self.events.clone()
        }
        fn declared_message_types(&self) -> Vec<MessageType> {
            self.messages.clone()
        }
        fn convert(&self, _event: &dyn DomainEvent) -> Result<Box<dyn Message>, BridgeError> {
            if self.produce_shipped {
                Ok(Box::new(OrderShippedMessage {
                    order_id: "x".into(),
                }))
            } else {
                Ok(Box::new(OrderCreatedMessage {
                    order_id: "x".into(),
                }))
            }
        }
    }

    #[test]
    fn distinct_event_types_register_and_route_by_runtime_type() {
        let registry = ConverterRegistry::builder()
            .converter(OrderCreatedConverter)
            .converter(OrderShippedConverter)
            .build()
            .unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains_event::<OrderCreated>());
        assert_eq!(
            registry.message_type_for(&EventType::of::<OrderShipped>()),
            Some(MessageType::of::<OrderShippedMessage>())
        );

        let created = registry
            .convert(&OrderCreated {
                order_id: "o-1".into(),
            })
            .unwrap();
        let shipped = registry
            .convert(&OrderShipped {
                order_id: "o-2".into(),
            })
            .unwrap();

        assert_eq!(
            created.downcast_ref::<OrderCreatedMessage>(),
            Some(&OrderCreatedMessage {
                order_id: "o-1".into()
            })
        );
        assert_eq!(
            shipped.downcast_ref::<OrderShippedMessage>(),
            Some(&OrderShippedMessage {
                order_id: "o-2".into()
            })
        );
    }

    #[test]
    fn duplicate_event_type_is_rejected_regardless_of_order() {
        let forward = ConverterRegistry::builder()
            .converter(OrderCreatedConverter)
            .converter(AnotherOrderCreatedConverter)
            .build()
            .unwrap_err();
        let backward = ConverterRegistry::builder()
            .converter(AnotherOrderCreatedConverter)
            .converter(OrderCreatedConverter)
            .build()
            .unwrap_err();

        for err in [forward, backward] {
            assert!(err.is_construction_error());
            match err {
                BridgeError::DuplicateConverterRegistration { event_type } => {
                    assert!(event_type.ends_with("OrderCreated"))
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn converter_without_single_declared_type_is_rejected() {
        let cases = [
            (vec![], vec![MessageType::of::<OrderCreatedMessage>()]),
            (
                vec![EventType::of::<OrderCreated>(), EventType::of::<OrderShipped>()],
                vec![MessageType::of::<OrderCreatedMessage>()],
            ),
            (vec![EventType::of::<OrderCreated>()], vec![]),
        ];

        for (events, messages) in cases {
            let mut registry = ConverterRegistry::new();
            let err = registry
                .register_erased(Arc::new(HandRolled {
                    events,
                    messages,
                    produce_shipped: false,
                }))
                .unwrap_err();
            assert!(matches!(
                err,
                BridgeError::InvalidConverterShape { ref converter, .. } if converter == "hand-rolled"
            ));
            assert!(registry.is_empty());
        }
    }

    #[test]
    fn unregistered_event_type_fails_without_panicking() {
        let registry = ConverterRegistry::builder()
            .converter(OrderCreatedConverter)
            .build()
            .unwrap();

        let err = registry
            .convert(&OrderShipped {
                order_id: "o-3".into(),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::UnregisteredConverterType { event_type } if event_type.ends_with("OrderShipped")
        ));
        assert!(!err.is_construction_error());
    }

    #[test]
    fn produced_message_must_match_declared_message_type() {
        let mut registry = ConverterRegistry::new();
        registry
            .register_erased(Arc::new(HandRolled {
                events: vec![EventType::of::<OrderCreated>()],
                messages: vec![MessageType::of::<OrderCreatedMessage>()],
                produce_shipped: true,
            }))
            .unwrap();

        let err = registry
            .convert(&OrderCreated {
                order_id: "o-4".into(),
            })
            .unwrap_err();
        assert!(matches!(err, BridgeError::ConversionTypeMismatch { .. }));
    }

    /// 自报为 OrderCreated 的其他事件
    #[derive(Debug)]
    struct Impostor;
    impl DomainEvent for Impostor {
        fn event_type(&self) -> EventType {
            EventType::of::<OrderCreated>()
        }
    }

    #[test]
    fn event_misreporting_its_type_is_not_routed_to_another_converter() {
        let mut registry = ConverterRegistry::new();
        registry
            .register_erased(Arc::new(HandRolled {
                events: vec![EventType::of::<OrderCreated>()],
                messages: vec![MessageType::of::<OrderCreatedMessage>()],
                produce_shipped: false,
            }))
            .unwrap();

        let err = registry.convert(&Impostor).unwrap_err();
        assert!(matches!(err, BridgeError::UnregisteredConverterType { .. }));
    }

    #[test]
    fn event_misreporting_its_type_fails_the_declared_type_check() {
        let mut registry = ConverterRegistry::new();
        registry
            .register_erased(Arc::new(HandRolled {
                events: vec![EventType::of::<Impostor>()],
                messages: vec![MessageType::of::<OrderCreatedMessage>()],
                produce_shipped: false,
            }))
            .unwrap();

        match registry.convert(&Impostor).unwrap_err() {
            BridgeError::ConversionTypeMismatch { expected, found } => {
                assert!(expected.ends_with("Impostor"));
                assert!(found.ends_with("OrderCreated"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn converting_twice_yields_independent_messages() {
        let registry = ConverterRegistry::builder()
            .converter(OrderCreatedConverter)
            .build()
            .unwrap();
        let event = OrderCreated {
            order_id: "o-5".into(),
        };

        let first = registry.convert(&event).unwrap();
        let second = registry.convert(&event).unwrap();

        assert_eq!(
            first.downcast_ref::<OrderCreatedMessage>(),
            second.downcast_ref::<OrderCreatedMessage>()
        );
        let first_ptr = first.as_ref() as *const dyn Message as *const ();
        let second_ptr = second.as_ref() as *const dyn Message as *const ();
        assert_ne!(first_ptr, second_ptr);
    }
}
