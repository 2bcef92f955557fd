/// 应用层命令（Command）
///
/// 表达“意图”的写操作请求，执行过程中可能广播任意数量的领域事件。
/// - 不返回业务数据，仅表达执行结果（成功/失败）；
/// - 命令的结果只由业务逻辑决定，事件转发失败不会改变它；
/// - 建议保持语义化的“动宾结构”命名，如 `PlaceOrder`、`ShipOrder`。
///
/// 关联常量：
/// - `NAME`：命令的稳定名称，用于路由与转发日志中的 `command` 字段。
pub trait Command: Send + Sync + 'static {
    /// 命令的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;
}
