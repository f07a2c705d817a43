//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载取图链路（调度 → 下载 → 校验 → 解码）中的所有错误来源。
//! 生命周期层只关心“是否为取消”：取消静默丢弃，其余一律折叠为一次失败事件。
//!
//! `code()` / `stage()` 提供稳定的机器可读标识，便于宿主侧日志与诊断。

/// 取图链路统一错误类型。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("网络错误：{0}")]
    Network(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("超时错误：{0}")]
    Timeout(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    /// 引擎实现内部崩溃（panic）。
    #[error("引擎内部错误：{0}")]
    Internal(String),

    #[error("未知优先级：{0}（可选：low / normal / high）")]
    InvalidPriority(String),

    /// 请求已被新的 source 替换、被清空或视图已销毁。
    #[error("请求已取消")]
    Cancelled,
}

impl FetchError {
    /// 稳定错误码。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E_NETWORK",
            Self::Decode(_) => "E_DECODE",
            Self::InvalidFormat(_) => "E_INVALID_FORMAT",
            Self::FileSystem(_) => "E_FILE_SYSTEM",
            Self::Timeout(_) => "E_TIMEOUT",
            Self::ResourceLimit(_) => "E_RESOURCE_LIMIT",
            Self::Internal(_) => "E_INTERNAL",
            Self::InvalidPriority(_) => "E_INVALID_PRIORITY",
            Self::Cancelled => "E_CANCELLED",
        }
    }

    /// 出错所在阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Network(_) | Self::Timeout(_) => "fetch",
            Self::FileSystem(_) => "load",
            Self::InvalidFormat(_) | Self::ResourceLimit(_) => "validate",
            Self::Decode(_) => "decode",
            Self::Internal(_) => "engine",
            Self::InvalidPriority(_) => "schedule",
            Self::Cancelled => "cancel",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
