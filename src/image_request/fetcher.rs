//! # 取图引擎抽象
//!
//! `ImageFetcher` 是生命周期层与具体取图实现之间的接缝：
//! 默认实现为 `HttpImageFetcher`，测试中可替换为脚本化的假引擎。
//!
//! 取消是“建议性”的：`CancellationToken` 触发后，分发器会直接丢弃进行中的 future，
//! 引擎内部也应在分块读取之间检查令牌，尽早停止网络/解码工作。

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::key::RequestKey;
use super::source::{ImageSource, LoadedImage};
use super::{FetchError, Priority, RequestTicket};

/// 一次取图请求。
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub ticket: RequestTicket,
    pub key: RequestKey,
    pub source: ImageSource,
}

impl FetchRequest {
    pub fn new(ticket: RequestTicket, source: ImageSource) -> Self {
        Self {
            ticket,
            key: source.key(),
            source,
        }
    }

    pub fn priority(&self) -> Priority {
        self.source.priority()
    }
}

/// 取图引擎。
///
/// 实现方负责下载、缓存与解码；返回的 future 会在分发器的工作任务中被驱动。
pub trait ImageFetcher: Send + Sync + 'static {
    fn fetch(
        &self,
        request: &FetchRequest,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Arc<LoadedImage>, FetchError>> + Send;
}
