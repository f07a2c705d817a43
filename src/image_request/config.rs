//! # 配置模块
//!
//! ## 设计思路
//!
//! 将取图引擎所有“可调策略”集中到 `ImageRequestConfig`：下载限制、超时、并发度与内存缓存容量。
//! 默认值即可直接用于生产；宿主也可以从 JSON 文件覆盖部分字段（缺省字段取默认值）。
//!
//! ## 实现思路
//!
//! - `Default` 提供平衡配置。
//! - `validate` 在引擎创建前做区间校验，错误统一为 `FetchError::InvalidFormat`。

use serde::Deserialize;

use super::FetchError;

/// 取图引擎配置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImageRequestConfig {
    /// 下载/读取原始字节时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 单次请求总超时（秒）。
    pub download_timeout: u64,
    /// 建立连接超时（秒）。
    pub connect_timeout: u64,
    /// 首包超时（毫秒）。
    pub stream_first_byte_timeout_ms: u64,
    /// 分块读取超时（毫秒）。
    pub stream_chunk_timeout_ms: u64,
    /// 最大重定向次数。
    pub max_redirects: usize,
    /// 解码前按图片头部尺寸检查的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 同时进行中的取图数量上限。超出的请求按优先级排队。
    pub max_concurrent_fetches: usize,
    /// 内存缓存条目数，`0` 表示关闭缓存。
    pub memory_cache_entries: usize,
}

impl Default for ImageRequestConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            download_timeout: 30,
            connect_timeout: 8,
            stream_first_byte_timeout_ms: 10_000,
            stream_chunk_timeout_ms: 15_000,
            max_redirects: 5,
            max_decoded_pixels: 40_000_000,
            max_concurrent_fetches: 4,
            memory_cache_entries: 64,
        }
    }
}

impl ImageRequestConfig {
    /// 校验配置取值范围。
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.max_file_size < 1024 {
            return Err(FetchError::InvalidFormat("max_file_size 不能小于 1KB".to_string()));
        }
        if !(1..=300).contains(&self.download_timeout) {
            return Err(FetchError::InvalidFormat("download_timeout 必须在 1~300 秒之间".to_string()));
        }
        if !(1..=120).contains(&self.connect_timeout) {
            return Err(FetchError::InvalidFormat("connect_timeout 必须在 1~120 秒之间".to_string()));
        }
        if !(100..=120_000).contains(&self.stream_first_byte_timeout_ms) {
            return Err(FetchError::InvalidFormat(
                "stream_first_byte_timeout_ms 必须在 100~120000 毫秒之间".to_string(),
            ));
        }
        if !(100..=120_000).contains(&self.stream_chunk_timeout_ms) {
            return Err(FetchError::InvalidFormat(
                "stream_chunk_timeout_ms 必须在 100~120000 毫秒之间".to_string(),
            ));
        }
        if self.max_redirects > 20 {
            return Err(FetchError::InvalidFormat("max_redirects 不能超过 20".to_string()));
        }
        if self.max_decoded_pixels == 0 {
            return Err(FetchError::InvalidFormat("max_decoded_pixels 不能为 0".to_string()));
        }
        if !(1..=64).contains(&self.max_concurrent_fetches) {
            return Err(FetchError::InvalidFormat("max_concurrent_fetches 必须在 1~64 之间".to_string()));
        }

        Ok(())
    }
}
