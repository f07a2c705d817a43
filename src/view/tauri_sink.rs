//! Tauri 事件出口：把加载事件发给前端 webview。
//!
//! 事件名即 `onFastImageLoad` / `onFastImageError`，载荷携带视图标识 `target`，
//! 前端按 `target` 分发到对应组件。

use tauri::{AppHandle, Emitter, Runtime};

use super::event::{BindingId, EventSink, LoadEvent};

pub struct TauriEventSink<R: Runtime> {
    app: AppHandle<R>,
    window_label: Option<String>,
}

impl<R: Runtime> TauriEventSink<R> {
    /// 广播给所有 webview。
    pub fn new(app: AppHandle<R>) -> Self {
        Self {
            app,
            window_label: None,
        }
    }

    /// 只发给指定标签的窗口。
    pub fn for_window(app: AppHandle<R>, label: impl Into<String>) -> Self {
        Self {
            app,
            window_label: Some(label.into()),
        }
    }

    fn emit(&self, event: LoadEvent) {
        let payload = event.payload();
        let result = match &self.window_label {
            Some(label) => self.app.emit_to(label.as_str(), event.name(), payload),
            None => self.app.emit(event.name(), payload),
        };

        if let Err(err) = result {
            log::warn!("发送 {} 事件失败 (#{}): {}", event.name(), event.binding().0, err);
        }
    }
}

impl<R: Runtime> EventSink for TauriEventSink<R> {
    fn on_loaded(&mut self, binding: BindingId) {
        self.emit(LoadEvent::Loaded(binding));
    }

    fn on_failed(&mut self, binding: BindingId) {
        self.emit(LoadEvent::Failed(binding));
    }
}
