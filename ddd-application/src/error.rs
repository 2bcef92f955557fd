use ddd_domain::error::DomainError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("event bridge: {0}")]
    Bridge(#[from] BridgeError),

    #[error("validation: {0}")]
    Validation(String),

    #[error("cancelled: command={0}")]
    Cancelled(&'static str),

    #[error("handler not found: {0}")]
    HandlerNotFound(&'static str),

    #[error("handler already registered: command={command}")]
    AlreadyRegisteredCommand { command: &'static str },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// 领域事件桥接错误
///
/// 装配期错误（重复注册、转换器声明不合法）是编程错误，应在启动阶段直接失败；
/// 其余均为单个事件级别的错误，由桥接层捕获并记录，不会影响命令本身的结果。
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    // --- 单事件 ---
    #[error("domain event is absent")]
    NullEvent,

    #[error("no converter registered for domain event type '{event_type}'")]
    UnregisteredConverterType { event_type: &'static str },

    #[error("converter type mismatch: expected={expected}, found={found}")]
    ConversionTypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("conversion failed: event_type={event_type}, reason={source}")]
    ConversionFailure {
        event_type: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("publish failed: event_type={event_type}, topic={topic:?}, reason={source}")]
    PublishFailure {
        event_type: &'static str,
        topic: Option<String>,
        #[source]
        source: DomainError,
    },

    // --- 装配期 ---
    #[error("converter already registered for domain event type '{event_type}'")]
    DuplicateConverterRegistration { event_type: &'static str },

    #[error("invalid converter shape: converter={converter}, reason={reason}")]
    InvalidConverterShape { converter: String, reason: String },
}

impl BridgeError {
    /// 是否为装配期（启动阶段）错误
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            BridgeError::DuplicateConverterRegistration { .. }
                | BridgeError::InvalidConverterShape { .. }
        )
    }

    /// 出错的处理阶段，用于结构化日志
    pub fn stage(&self) -> &'static str {
        match self {
            BridgeError::NullEvent => "receive",
            BridgeError::UnregisteredConverterType { .. }
            | BridgeError::ConversionTypeMismatch { .. }
            | BridgeError::ConversionFailure { .. } => "convert",
            BridgeError::PublishFailure { .. } => "publish",
            BridgeError::DuplicateConverterRegistration { .. }
            | BridgeError::InvalidConverterShape { .. } => "register",
        }
    }
}
