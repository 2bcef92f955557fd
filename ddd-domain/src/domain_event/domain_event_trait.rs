use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// 领域事件载荷需要满足的通用能力边界
///
/// 事件以运行时类型区分：桥接层只关心事件的具体类型（[`EventType`]），
/// 不解析其字段。任何 `'static + Debug + Send + Sync` 的类型实现该 trait 即可，
/// 通常只需一行空实现：
///
/// ```rust
/// use ddd_domain::domain_event::DomainEvent;
///
/// #[derive(Debug)]
/// struct OrderCreated {
///     order_id: String,
/// }
///
/// impl DomainEvent for OrderCreated {}
/// ```
pub trait DomainEvent: Any + fmt::Debug + Send + Sync + 'static {
    /// 事件的运行时类型标识
    ///
    /// 默认实现取具体类型的 `TypeId` 与类型名，不应覆写；
    /// 转换器注册表按真实运行时类型路由，覆写的结果只会导致类型不符错误。
    fn event_type(&self) -> EventType {
        EventType::from_parts(TypeId::of::<Self>(), type_name::<Self>())
    }
}

impl dyn DomainEvent {
    /// 判断事件是否为具体类型 `E`
    pub fn is<E: DomainEvent>(&self) -> bool {
        (self as &dyn Any).is::<E>()
    }

    /// 还原为具体事件类型的引用，类型不符时返回 `None`
    pub fn downcast_ref<E: DomainEvent>(&self) -> Option<&E> {
        (self as &dyn Any).downcast_ref::<E>()
    }
}

/// 事件类型标识
///
/// 相等性只比较 `TypeId`，类型名仅用于日志、错误信息与主题路由。
#[derive(Clone, Copy)]
pub struct EventType {
    id: TypeId,
    name: &'static str,
}

impl EventType {
    pub fn of<E: DomainEvent>() -> Self {
        Self::from_parts(TypeId::of::<E>(), type_name::<E>())
    }

    fn from_parts(id: TypeId, name: &'static str) -> Self {
        Self { id, name }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// 完整类型路径，如 `shop::orders::OrderCreated`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 去掉模块路径与泛型参数后的类型名，如 `OrderCreated`
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventType {}

impl Hash for EventType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventType").field(&self.name).finish()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
