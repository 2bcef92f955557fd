use crate::domain_event::short_type_name;
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// 传输消息
///
/// 由转换器从恰好一个领域事件生成，除自身内容外没有身份。
pub trait Message: Any + fmt::Debug + Send + Sync + 'static {
    /// 消息的运行时类型标识，默认实现即可
    fn message_type(&self) -> MessageType {
        MessageType::from_parts(TypeId::of::<Self>(), type_name::<Self>())
    }
}

impl dyn Message {
    pub fn is<M: Message>(&self) -> bool {
        (self as &dyn Any).is::<M>()
    }

    pub fn downcast_ref<M: Message>(&self) -> Option<&M> {
        (self as &dyn Any).downcast_ref::<M>()
    }
}

/// 消息类型标识（相等性只比较 `TypeId`）
#[derive(Clone, Copy)]
pub struct MessageType {
    id: TypeId,
    name: &'static str,
}

impl MessageType {
    pub fn of<M: Message>() -> Self {
        Self::from_parts(TypeId::of::<M>(), type_name::<M>())
    }

    fn from_parts(id: TypeId, name: &'static str) -> Self {
        Self { id, name }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }
}

impl PartialEq for MessageType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MessageType {}

impl Hash for MessageType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageType").field(&self.name).finish()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
