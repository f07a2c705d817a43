//! # 视图绑定模块（view）
//!
//! ## 设计思路
//!
//! 该模块把 `image_request` 的取图能力绑定到宿主 UI 元素上：
//!
//! - `props`：`source` / `resizeMode` 属性解析与常量映射表
//! - `event`：`EventSink` 通知边界、事件名与直接事件注册表
//! - `lifecycle`：每个视图的请求状态机（取消、替换、完成分派）
//! - `manager`：宿主生命周期钩子与消息循环
//! - `tauri_sink`：可选的 Tauri 事件出口（`tauri` feature）
//!
//! ## 实现思路
//!
//! 取图在后台并发执行，完成通知经通道回到管理器所在上下文后才修改绑定状态或发出事件，
//! 因此绑定状态始终只由一个上下文修改。

mod event;
mod lifecycle;
mod manager;
mod props;
#[cfg(feature = "tauri")]
mod tauri_sink;

pub use event::{
    exported_direct_event_types, BindingId, ChannelEventSink, EventPayload, EventSink, LoadEvent,
    ON_ERROR_EVENT, ON_LOAD_EVENT,
};
pub use lifecycle::{BindingState, CompletionOutcome, Displayed, FetchLifecycleController};
pub use manager::{FastImageViewManager, HostCommand, VIEW_NAME};
pub use props::{ResizeMode, ScaleType, SourceProp};
#[cfg(feature = "tauri")]
pub use tauri_sink::TauriEventSink;
