//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 宿主适配层（视图管理器、stdio 宿主、Tauri 事件出口）统一返回 `AppError`，
//! 取图引擎内部的 `FetchError` 通过 `From` 自动转换。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 实现 `Serialize` 将错误序列化为字符串，满足宿主 IPC 要求。

use serde::Serialize;

use crate::image_request::FetchError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 宿主引用了不存在（或已销毁）的视图
    #[error("未知视图: #{0}")]
    UnknownView(i32),

    /// 属性或宿主命令格式错误
    #[error("属性无效: {0}")]
    InvalidProps(String),

    /// 图片请求错误（下载 / 解码 / 调度）
    #[error("{0}")]
    Image(#[from] FetchError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件无法解析
    #[error("配置无效: {0}")]
    Config(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidProps(err.to_string())
    }
}

/// 宿主 IPC 要求返回值实现 `Serialize`。
/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_converts_transparently() {
        let err: AppError = FetchError::Network("HTTP 404: 未找到".to_string()).into();
        assert!(matches!(err, AppError::Image(FetchError::Network(_))));
        assert_eq!(err.to_string(), FetchError::Network("HTTP 404: 未找到".to_string()).to_string());
    }

    #[test]
    fn serialises_as_plain_string() {
        let json = serde_json::to_string(&AppError::UnknownView(3)).expect("serialize");
        assert_eq!(json, "\"未知视图: #3\"");
    }
}
