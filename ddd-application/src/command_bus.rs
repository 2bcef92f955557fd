use crate::{command::Command, context::AppContext, error::AppError};
use async_trait::async_trait;

/// 命令总线（Command Bus）
///
/// - 负责根据命令的具体类型路由到对应的处理器；
/// - 处理器可以是被 `DomainEventAwareCommandHandler` 包装过的，
///   总线本身对事件桥接无感知。
#[async_trait]
pub trait CommandBus: Send + Sync {
    /// 分发命令到对应处理器
    async fn dispatch<C: Command>(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError>;
}
