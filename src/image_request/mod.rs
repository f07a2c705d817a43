//! # 图片请求模块（image_request）
//!
//! ## 设计思路
//!
//! 该模块只关心“一次图片请求从提交到结果”的过程，与具体 UI 宿主无关：
//!
//! - `key`：由 URI + 有序请求头构造请求标识，避免鉴权头不同的请求串图
//! - `priority`：优先级解析与等待队列
//! - `fetcher`：取图引擎抽象 `ImageFetcher`（取消信号使用 `CancellationToken`）
//! - `dispatcher`：并发上限 + 优先级分发，完成结果经通道回送
//! - `loader`：默认引擎 `HttpImageFetcher`（网络/内联/本地 + 内存缓存）
//! - `pipeline`：解码与像素上限
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 实现思路
//!
//! 调用链：
//!
//! ```text
//! FetchLifecycleController（view 层）
//!    ↓ submit(FetchRequest) → FetchHandle
//! dispatcher.rs（排队 + 并发许可）
//!    ↓
//! ImageFetcher::fetch（默认 loader.rs → pipeline.rs）
//!    ↓ Completion { ticket, outcome }
//! mpsc 通道 → 回到 UI 上下文
//! ```

mod config;
mod dispatcher;
mod error;
mod fetcher;
mod key;
mod loader;
mod pipeline;
mod priority;
mod source;

pub use config::ImageRequestConfig;
pub use dispatcher::{Completion, FetchDispatcher, FetchHandle};
pub use error::FetchError;
pub use fetcher::{FetchRequest, ImageFetcher};
pub use key::{RequestKey, RequestKeyBuilder};
pub use loader::HttpImageFetcher;
pub use priority::{Priority, PriorityScheduler, RequestTicket};
pub use source::{DataSource, HeaderList, ImageSource, LoadedImage};
pub use tokio_util::sync::CancellationToken;
