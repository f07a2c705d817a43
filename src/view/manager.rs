//! # 视图管理器
//!
//! ## 设计思路
//!
//! `FastImageViewManager` 是宿主框架看到的唯一入口，负责把宿主的三个生命周期钩子
//! （创建、属性变更、销毁）翻译为生命周期控制器的操作，并把取图完成通知
//! 收回到自身所在的上下文中统一应用。
//!
//! ## 实现思路
//!
//! - 管理器独占控制器与完成通道接收端，因此所有状态修改都发生在同一上下文
//! - `run` 以 `select!` 同时消费宿主命令与完成通知，适用于 stdio 等消息驱动宿主
//! - 嵌入式宿主也可以自行调用 `update_props` 并配合 `next_completion` / `drain_completions`

use serde::Deserialize;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::error::AppError;
use crate::image_request::{Completion, FetchDispatcher, ImageFetcher, ImageRequestConfig};

use super::event::{exported_direct_event_types, BindingId, EventSink};
use super::lifecycle::{CompletionOutcome, FetchLifecycleController};
use super::props::{ResizeMode, SourceProp};

/// 宿主框架注册的组件名。
pub const VIEW_NAME: &str = "FastImageView";

/// 宿主命令（JSON，以 `op` 字段区分）。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum HostCommand {
    Create {
        tag: BindingId,
    },
    Update {
        tag: BindingId,
        #[serde(default)]
        props: serde_json::Value,
    },
    #[serde(rename = "drop")]
    Destroy {
        tag: BindingId,
    },
}

pub struct FastImageViewManager<F: ImageFetcher, S: EventSink> {
    controller: FetchLifecycleController<F, S>,
    completions: UnboundedReceiver<Completion>,
}

impl<F: ImageFetcher, S: EventSink> FastImageViewManager<F, S> {
    pub const NAME: &'static str = VIEW_NAME;

    /// 创建管理器并启动分发器。必须在 tokio 运行时内调用。
    pub fn new(fetcher: F, sink: S, config: &ImageRequestConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = FetchDispatcher::spawn(fetcher, config.max_concurrent_fetches, tx);
        log::info!(
            "📦 {} 已就绪 - 最大并发 {}",
            Self::NAME,
            config.max_concurrent_fetches
        );

        Self {
            controller: FetchLifecycleController::new(dispatcher, sink),
            completions: rx,
        }
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn exported_events(&self) -> serde_json::Value {
        exported_direct_event_types()
    }

    pub fn create_view(&mut self, tag: BindingId) {
        if self.controller.create_binding(tag) {
            log::debug!("➕ 创建视图 #{}", tag.0);
        }
    }

    /// 应用属性变更。只处理出现的键；`source: null` 表示取消并清空。
    pub fn update_props(&mut self, tag: BindingId, props: &serde_json::Value) -> Result<(), AppError> {
        let props = props
            .as_object()
            .ok_or_else(|| AppError::InvalidProps("props 必须是对象".to_string()))?;

        if let Some(mode) = props.get("resizeMode") {
            let mode = ResizeMode::from_tag_or_default(mode.as_str());
            self.controller.set_resize_mode(tag, mode)?;
        }

        if let Some(source) = props.get("source") {
            let source = if source.is_null() {
                None
            } else {
                Some(SourceProp::deserialize(source)?.into_source())
            };
            self.controller.set_source(tag, source)?;
        }

        Ok(())
    }

    pub fn drop_view(&mut self, tag: BindingId) -> bool {
        let existed = self.controller.destroy_binding(tag);
        if existed {
            log::debug!("➖ 销毁视图 #{}", tag.0);
        }
        existed
    }

    pub fn apply(&mut self, command: HostCommand) -> Result<(), AppError> {
        match command {
            HostCommand::Create { tag } => self.create_view(tag),
            HostCommand::Update { tag, props } => self.update_props(tag, &props)?,
            HostCommand::Destroy { tag } => {
                if !self.drop_view(tag) {
                    return Err(AppError::UnknownView(tag.0));
                }
            }
        }
        Ok(())
    }

    /// 等待并应用下一条完成通知。
    pub async fn next_completion(&mut self) -> Option<CompletionOutcome> {
        let completion = self.completions.recv().await?;
        Some(self.controller.on_completion(completion))
    }

    /// 应用所有已到达的完成通知，不等待。返回处理条数。
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions.try_recv() {
            self.controller.on_completion(completion);
            applied += 1;
        }
        applied
    }

    /// 消息循环：命令通道关闭后退出。
    pub async fn run(mut self, mut commands: UnboundedReceiver<HostCommand>) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => {
                        if let Err(err) = self.apply(command) {
                            log::warn!("⚠️ 宿主命令处理失败: {}", err);
                        }
                    }
                    None => break,
                },
                Some(completion) = self.completions.recv() => {
                    self.controller.on_completion(completion);
                }
            }
        }

        // 命令通道关闭后，等进行中的请求全部落地再退出
        self.controller.dispatcher().close();
        while self.controller.in_flight_count() > 0 {
            if self.next_completion().await.is_none() {
                break;
            }
        }
        log::info!("👋 {} 命令通道已关闭，退出", Self::NAME);
    }

    pub fn controller(&self) -> &FetchLifecycleController<F, S> {
        &self.controller
    }
}
