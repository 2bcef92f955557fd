//! 事件桥接配置
//!
//! 以声明方式配置主题路由，可从 JSON 加载：
//!
//! ```rust
//! use ddd_application::config::EventBridgeConfig;
//!
//! let config = EventBridgeConfig::from_json_str(
//!     r#"{ "topics": { "OrderCreated": "orders" }, "default_topic": null }"#,
//! )
//! .unwrap();
//! assert_eq!(config.topics.get("OrderCreated").map(String::as_str), Some("orders"));
//! ```
use ddd_domain::error::DomainResult;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventBridgeConfig {
    /// 事件类型名（短名如 `OrderCreated`，或完整类型路径）到主题的映射
    pub topics: HashMap<String, String>,
    /// 未命中映射时使用的主题；为空则发布到传输层默认通道
    pub default_topic: Option<String>,
}

impl EventBridgeConfig {
    pub fn from_json_str(raw: &str) -> DomainResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> DomainResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
