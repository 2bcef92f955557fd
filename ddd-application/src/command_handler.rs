use crate::{command::Command, context::AppContext, error::AppError};
use async_trait::async_trait;

/// 异步命令处理器
#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError>;
}

/// 同步命令处理器：业务逻辑不涉及异步 I/O 时使用
pub trait SyncCommandHandler<C>: Send + Sync
where
    C: Command,
{
    fn handle_sync(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError>;
}
