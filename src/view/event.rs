//! # 事件出口
//!
//! 宿主只关心两个直接（不冒泡）事件：`onFastImageLoad` 与 `onFastImageError`，
//! 均以视图标识为键，不携带额外字段。
//!
//! `EventSink` 在构造时注入，生命周期层不做任何动态查找。

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

pub const ON_LOAD_EVENT: &str = "onFastImageLoad";
pub const ON_ERROR_EVENT: &str = "onFastImageError";

/// 宿主 UI 元素标识（不透明整数）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BindingId(pub i32);

/// 终态事件。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadEvent {
    Loaded(BindingId),
    Failed(BindingId),
}

impl LoadEvent {
    pub fn binding(&self) -> BindingId {
        match self {
            Self::Loaded(id) | Self::Failed(id) => *id,
        }
    }

    /// 宿主侧事件名。
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loaded(_) => ON_LOAD_EVENT,
            Self::Failed(_) => ON_ERROR_EVENT,
        }
    }

    pub fn payload(&self) -> EventPayload {
        EventPayload {
            event: self.name(),
            target: self.binding(),
        }
    }
}

/// 序列化给宿主的事件体。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventPayload {
    pub event: &'static str,
    pub target: BindingId,
}

/// 宿主通知边界。
///
/// 两个回调都是“发出即忘”，不返回结果。
pub trait EventSink: Send + 'static {
    fn on_loaded(&mut self, binding: BindingId);

    fn on_failed(&mut self, binding: BindingId);

    fn deliver(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Loaded(id) => self.on_loaded(id),
            LoadEvent::Failed(id) => self.on_failed(id),
        }
    }
}

/// 将事件转发到 tokio 通道，供测试或自定义宿主消费。
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: UnboundedSender<LoadEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: UnboundedSender<LoadEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: LoadEvent) {
        if self.tx.send(event).is_err() {
            log::debug!("事件接收端已关闭，丢弃 {} #{}", event.name(), event.binding().0);
        }
    }
}

impl EventSink for ChannelEventSink {
    fn on_loaded(&mut self, binding: BindingId) {
        self.send(LoadEvent::Loaded(binding));
    }

    fn on_failed(&mut self, binding: BindingId) {
        self.send(LoadEvent::Failed(binding));
    }
}

/// 直接事件注册表：事件名 → `{ registrationName }`。
pub fn exported_direct_event_types() -> serde_json::Value {
    serde_json::json!({
        ON_LOAD_EVENT: { "registrationName": ON_LOAD_EVENT },
        ON_ERROR_EVENT: { "registrationName": ON_ERROR_EVENT },
    })
}
