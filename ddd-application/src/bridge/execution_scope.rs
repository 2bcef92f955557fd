//! 执行作用域（ExecutionScope）
//!
//! 多个命令执行共享同一个广播器时，每个执行的作用域桥都挂在广播器上。
//! 作用域标识记录“当前事件由哪次执行广播”，转发器只处理本执行内的事件。
//!
//! - 异步路径：`tokio::task_local!` + `scope`，标识随 future 在任意线程上被轮询；
//! - 同步路径：`sync_scope`，标识只在闭包执行期间有效，panic 展开时自动恢复。
//!
//! 嵌套执行时内层标识覆盖外层，内层结束后恢复。
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::futures::TaskLocalFuture;

tokio::task_local! {
    static CURRENT: ScopeId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ScopeId(u64);

impl ScopeId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    pub(crate) fn is_current(self) -> bool {
        Self::current() == Some(self)
    }

    pub(crate) fn enter<R>(self, f: impl FnOnce() -> R) -> R {
        CURRENT.sync_scope(self, f)
    }

    pub(crate) fn enter_async<F: Future>(self, fut: F) -> TaskLocalFuture<ScopeId, F> {
        CURRENT.scope(self, fut)
    }
}
