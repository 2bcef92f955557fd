//! 消息发布协议（MessagePublisher）
//!
//! 发布为同步调用：调用方只关心是否成功交给了传输层，不等待任何确认。
//! 若底层传输是异步的，实现方应自行缓冲或派发，而不是阻塞调用线程。
//!
use super::Message;
use crate::error::DomainResult as Result;
use std::sync::Arc;

/// 消息发布者：把消息交给传输层
pub trait MessagePublisher: Send + Sync {
    /// 发布到传输层的默认通道
    fn publish(&self, message: Box<dyn Message>) -> Result<()>;

    /// 发布到指定主题
    fn publish_to(&self, message: Box<dyn Message>, topic: &str) -> Result<()>;
}

impl<T> MessagePublisher for Arc<T>
where
    T: MessagePublisher + ?Sized,
{
    fn publish(&self, message: Box<dyn Message>) -> Result<()> {
        (**self).publish(message)
    }

    fn publish_to(&self, message: Box<dyn Message>, topic: &str) -> Result<()> {
        (**self).publish_to(message, topic)
    }
}
