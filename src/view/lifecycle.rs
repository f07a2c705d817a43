//! # 请求生命周期控制器
//!
//! ## 设计思路
//!
//! 每个视图绑定（`Binding`）同一时刻最多只有一个进行中的请求。
//! 状态机：`Idle → Pending → Loaded | Failed`，任意状态在清空来源或销毁时回到 `Idle`。
//!
//! - 重新设置来源：先取消旧请求，清空为透明占位，再发起新请求，避免显示旧图
//! - 清空来源 / 销毁视图：取消进行中的请求，保证迟到的结果不会修改已失效的绑定
//! - 失败不自动重试，保留透明占位
//!
//! ## 实现思路
//!
//! 每次发起请求分配单调递增的 `RequestTicket`，并记录 `ticket → binding`。
//! 完成通知回到 UI 上下文后，只有仍登记在册的 ticket 才会产生事件；
//! 被取消或被替换的请求已从表中移除，其结果直接丢弃。
//! 控制器本身不是线程安全的，只应由 UI 上下文持有。

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AppError;
use crate::image_request::{
    Completion, FetchDispatcher, FetchError, FetchHandle, FetchRequest, ImageFetcher, ImageSource, LoadedImage,
    RequestTicket,
};

use super::event::{BindingId, EventSink, LoadEvent};
use super::props::{ResizeMode, ScaleType};

/// 绑定状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    Idle,
    Pending,
    Loaded,
    Failed,
}

/// 视图当前展示内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Displayed {
    /// 未设置来源
    Nothing,
    /// 透明占位（加载中或加载失败）
    Placeholder,
    Image(Arc<LoadedImage>),
}

/// 完成通知的处理结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Delivered(LoadEvent),
    Discarded,
}

#[derive(Debug)]
struct Binding {
    state: BindingState,
    displayed: Displayed,
    resize_mode: ResizeMode,
    source: Option<ImageSource>,
    in_flight: Option<FetchHandle>,
}

impl Binding {
    fn new() -> Self {
        Self {
            state: BindingState::Idle,
            displayed: Displayed::Nothing,
            resize_mode: ResizeMode::default(),
            source: None,
            in_flight: None,
        }
    }
}

pub struct FetchLifecycleController<F: ImageFetcher, S: EventSink> {
    dispatcher: FetchDispatcher<F>,
    sink: S,
    bindings: HashMap<BindingId, Binding>,
    tickets: HashMap<RequestTicket, BindingId>,
    next_ticket: u64,
}

impl<F: ImageFetcher, S: EventSink> FetchLifecycleController<F, S> {
    pub fn new(dispatcher: FetchDispatcher<F>, sink: S) -> Self {
        Self {
            dispatcher,
            sink,
            bindings: HashMap::new(),
            tickets: HashMap::new(),
            next_ticket: 1,
        }
    }

    /// 登记新视图。已存在时返回 `false` 且保持原状。
    pub fn create_binding(&mut self, id: BindingId) -> bool {
        if self.bindings.contains_key(&id) {
            log::warn!("⚠️ 视图 #{} 已存在，忽略重复创建", id.0);
            return false;
        }
        self.bindings.insert(id, Binding::new());
        true
    }

    /// 设置或清空来源。任何情况下都先取消旧请求。
    pub fn set_source(&mut self, id: BindingId, source: Option<ImageSource>) -> Result<(), AppError> {
        let binding = self.bindings.get_mut(&id).ok_or(AppError::UnknownView(id.0))?;
        Self::cancel_in_flight(&mut self.tickets, id, binding);

        binding.state = BindingState::Idle;

        let Some(source) = source else {
            binding.source = None;
            binding.displayed = Displayed::Nothing;
            return Ok(());
        };

        binding.displayed = Displayed::Placeholder;
        binding.source = Some(source.clone());

        let ticket = RequestTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);

        let request = FetchRequest::new(ticket, source);
        log::info!(
            "🖼️ 加载图片 #{} - {} priority={} resize={}",
            id.0,
            request.key,
            request.priority().as_str(),
            binding.resize_mode.as_str()
        );

        binding.state = BindingState::Pending;
        match self.dispatcher.submit(request) {
            Ok(handle) => {
                binding.in_flight = Some(handle);
                self.tickets.insert(ticket, id);
            }
            Err(err) => {
                // 提交失败同样经过 Pending，随后立即落到 Failed
                log::error!("❌ 视图 #{} 请求提交失败: {}", id.0, err);
                binding.state = BindingState::Failed;
                self.sink.on_failed(id);
            }
        }

        Ok(())
    }

    pub fn set_resize_mode(&mut self, id: BindingId, mode: ResizeMode) -> Result<(), AppError> {
        let binding = self.bindings.get_mut(&id).ok_or(AppError::UnknownView(id.0))?;
        binding.resize_mode = mode;
        Ok(())
    }

    /// 视图被移除：取消进行中的请求并释放绑定。返回绑定是否存在。
    pub fn destroy_binding(&mut self, id: BindingId) -> bool {
        match self.bindings.remove(&id) {
            Some(mut binding) => {
                Self::cancel_in_flight(&mut self.tickets, id, &mut binding);
                true
            }
            None => false,
        }
    }

    /// 应用一条完成通知。必须在 UI 上下文调用。
    pub fn on_completion(&mut self, completion: Completion) -> CompletionOutcome {
        let Completion { ticket, outcome } = completion;

        let Some(id) = self.tickets.remove(&ticket) else {
            log::debug!("请求 #{} 已被取消或替换，丢弃完成结果", ticket.0);
            return CompletionOutcome::Discarded;
        };

        let Some(binding) = self.bindings.get_mut(&id) else {
            return CompletionOutcome::Discarded;
        };

        if binding.in_flight.as_ref().map(FetchHandle::ticket) != Some(ticket) {
            return CompletionOutcome::Discarded;
        }
        binding.in_flight = None;

        match outcome {
            Ok(image) => {
                let (width, height) = image.dimensions();
                log::info!(
                    "✅ 视图 #{} 加载完成 [{:?}] {}x{}",
                    id.0,
                    image.data_source(),
                    width,
                    height
                );
                binding.state = BindingState::Loaded;
                binding.displayed = Displayed::Image(image);
                self.sink.on_loaded(id);
                CompletionOutcome::Delivered(LoadEvent::Loaded(id))
            }
            Err(FetchError::Cancelled) => {
                binding.state = BindingState::Idle;
                CompletionOutcome::Discarded
            }
            Err(err) => {
                log::warn!(
                    "⚠️ 视图 #{} 加载失败 [{}:{}] {}",
                    id.0,
                    err.stage(),
                    err.code(),
                    err
                );
                binding.state = BindingState::Failed;
                binding.displayed = Displayed::Placeholder;
                self.sink.on_failed(id);
                CompletionOutcome::Delivered(LoadEvent::Failed(id))
            }
        }
    }

    fn cancel_in_flight(tickets: &mut HashMap<RequestTicket, BindingId>, id: BindingId, binding: &mut Binding) {
        if let Some(handle) = binding.in_flight.take() {
            log::debug!("🚫 取消视图 #{} 的请求 #{}", id.0, handle.ticket().0);
            handle.cancel();
            tickets.remove(&handle.ticket());
        }
    }

    pub fn state(&self, id: BindingId) -> Option<BindingState> {
        self.bindings.get(&id).map(|b| b.state)
    }

    pub fn displayed(&self, id: BindingId) -> Option<&Displayed> {
        self.bindings.get(&id).map(|b| &b.displayed)
    }

    pub fn source(&self, id: BindingId) -> Option<&ImageSource> {
        self.bindings.get(&id).and_then(|b| b.source.as_ref())
    }

    pub fn resize_mode(&self, id: BindingId) -> Option<ResizeMode> {
        self.bindings.get(&id).map(|b| b.resize_mode)
    }

    pub fn scale_type(&self, id: BindingId) -> Option<ScaleType> {
        self.resize_mode(id).map(ResizeMode::scale_type)
    }

    /// 当前进行中请求的票据。
    pub fn current_ticket(&self, id: BindingId) -> Option<RequestTicket> {
        self.bindings
            .get(&id)
            .and_then(|b| b.in_flight.as_ref())
            .map(FetchHandle::ticket)
    }

    pub fn has_in_flight(&self, id: BindingId) -> bool {
        self.current_ticket(id).is_some()
    }

    /// 全部视图的进行中请求数量。
    pub fn in_flight_count(&self) -> usize {
        self.tickets.len()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn dispatcher(&self) -> &FetchDispatcher<F> {
        &self.dispatcher
    }
}
