//! # FastImageView：库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │        宿主 UI（stdio JSON 行 / Tauri webview / 自定义）   │
//! │   create(tag) ── update(tag, props) ── drop(tag)          │
//! └───────┬───────────────────────────────▲──────────────────┘
//!         ↓ HostCommand                    │ onFastImageLoad / onFastImageError
//! ┌───────┼────────────────────────────────┼─────────────────┐
//! │  view │                                │                 │
//! │  ├─ manager ─── FastImageViewManager   │                 │
//! │  ├─ lifecycle ─ FetchLifecycleController ── EventSink ───┘
//! │  └─ props ──── SourceProp / ResizeMode                   │
//! │       ↓ FetchRequest            ↑ Completion (mpsc)      │
//! │  image_request                                           │
//! │  ├─ dispatcher ─ 优先级队列 + 并发许可                    │
//! │  ├─ key ─────── RequestKey (URI + 有序请求头)            │
//! │  └─ loader ──── HttpImageFetcher → pipeline (解码)       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 宿主适配层统一错误类型 `AppError` |
//! | [`image_request`] | 请求标识、优先级调度、取图引擎与解码 |
//! | [`view`] | 视图绑定状态机、属性解析、事件出口与管理器 |

pub mod error;
pub mod image_request;
pub mod view;
