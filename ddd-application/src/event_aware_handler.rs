//! 感知领域事件的命令处理器
//!
//! 包装任意命令处理器：每次执行前创建并订阅一个 [`ScopedEventBridge`]，
//! 执行结束后退订。内层处理器广播的领域事件因此被转换为传输消息并发布，
//! 而内层处理器对消息总线一无所知。
//!
//! 命令结果只取决于内层处理器；转发失败只出现在日志中。
//!
use crate::bridge::EventBridge;
use crate::command::Command;
use crate::command_handler::{CommandHandler, SyncCommandHandler};
use crate::context::AppContext;
use crate::error::AppError;
use async_trait::async_trait;

pub struct DomainEventAwareCommandHandler<H> {
    inner: H,
    bridge: EventBridge,
}

impl<H> DomainEventAwareCommandHandler<H> {
    pub fn new(inner: H, bridge: EventBridge) -> Self {
        Self { inner, bridge }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn bridge(&self) -> &EventBridge {
        &self.bridge
    }
}

#[async_trait]
impl<C, H> CommandHandler<C> for DomainEventAwareCommandHandler<H>
where
    C: Command,
    H: CommandHandler<C>,
{
    async fn handle(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError> {
        self.bridge
            .execute_async(C::NAME, ctx, self.inner.handle(ctx, cmd))
            .await
    }
}

impl<C, H> SyncCommandHandler<C> for DomainEventAwareCommandHandler<H>
where
    C: Command,
    H: SyncCommandHandler<C>,
{
    fn handle_sync(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError> {
        self.bridge
            .execute(C::NAME, ctx, || self.inner.handle_sync(ctx, cmd))
    }
}
