//! 领域事件到传输消息的转换
//!
//! - `EventConverter`：单一事件类型到单一消息类型的纯映射；
//! - `ErasedEventConverter` / `TypedConverter`：注册表使用的类型擦除接口与适配器；
//! - `ConverterRegistry`：按事件运行时类型路由到唯一转换器。

mod event_converter;
mod registry;

pub use event_converter::{ErasedEventConverter, EventConverter, TypedConverter};
pub use registry::{ConverterRegistry, ConverterRegistryBuilder};
