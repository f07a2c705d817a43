//! # 请求分发器
//!
//! ## 设计思路
//!
//! 分发器位于生命周期层与取图引擎之间：
//! - 提交立即返回 `FetchHandle`，从不阻塞调用方（UI 上下文）
//! - 等待中的请求进入 `PriorityScheduler`，按优先级启动
//! - 信号量限制同时进行中的请求数量
//! - 完成结果通过 mpsc 通道投递回 UI 上下文，由其统一应用
//!
//! ## 实现思路
//!
//! 单个泵任务循环：先拿并发许可，再从队列取出最高优先级请求，为其派生工作任务。
//! 工作任务以 `select!` 同时等待取图结果与取消信号；已取消请求的结果直接丢弃，不进入通道。
//! 取图本身再派生一层任务，引擎 panic 会被折叠为 `FetchError::Internal` 完成通知。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::{Notify, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::fetcher::{FetchRequest, ImageFetcher};
use super::priority::PriorityScheduler;
use super::source::LoadedImage;
use super::{FetchError, RequestTicket};

/// 取图完成通知。
#[derive(Debug)]
pub struct Completion {
    pub ticket: RequestTicket,
    pub outcome: Result<Arc<LoadedImage>, FetchError>,
}

struct Job {
    request: FetchRequest,
    cancel: CancellationToken,
}

type JobQueue = Mutex<PriorityScheduler<Job>>;

struct Shared<F> {
    fetcher: F,
    queue: Arc<JobQueue>,
    wake: Notify,
    permits: Arc<Semaphore>,
    completions: UnboundedSender<Completion>,
    closed: AtomicBool,
}

/// 已提交请求的句柄。
///
/// 丢弃句柄不会取消请求，需显式调用 `cancel`。
#[derive(Debug)]
pub struct FetchHandle {
    ticket: RequestTicket,
    cancel: CancellationToken,
    queue: Arc<JobQueue>,
}

impl FetchHandle {
    pub fn ticket(&self) -> RequestTicket {
        self.ticket
    }

    /// 取消请求：仍在排队则移出队列，已在执行则通知引擎中止并丢弃结果。
    pub fn cancel(&self) {
        self.cancel.cancel();
        match self.queue.lock() {
            Ok(mut queue) => {
                if queue.cancel(self.ticket) {
                    log::debug!("🚫 请求 #{} 在排队阶段被取消", self.ticket.0);
                }
            }
            Err(_) => log::warn!("⚠️ 调度队列锁已中毒，仅触发取消令牌"),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("ticket", &self.request.ticket)
            .field("key", &self.request.key)
            .finish()
    }
}

/// 优先级分发器。
pub struct FetchDispatcher<F: ImageFetcher> {
    shared: Arc<Shared<F>>,
    pump: JoinHandle<()>,
}

impl<F: ImageFetcher> FetchDispatcher<F> {
    /// 创建分发器并启动泵任务。
    ///
    /// 必须在 tokio 运行时内调用。
    pub fn spawn(fetcher: F, max_concurrent: usize, completions: UnboundedSender<Completion>) -> Self {
        let shared = Arc::new(Shared {
            fetcher,
            queue: Arc::new(Mutex::new(PriorityScheduler::new())),
            wake: Notify::new(),
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            completions,
            closed: AtomicBool::new(false),
        });

        let pump = tokio::spawn(pump(Arc::clone(&shared)));

        Self { shared, pump }
    }

    /// 提交请求，立即返回。分发器关闭后拒绝新请求。
    pub fn submit(&self, request: FetchRequest) -> Result<FetchHandle, FetchError> {
        if self.shared.closed.load(Ordering::Acquire) {
            return Err(FetchError::ResourceLimit("分发器已关闭".to_string()));
        }

        let ticket = request.ticket;
        let priority = request.priority();
        let cancel = CancellationToken::new();

        {
            let mut queue = self
                .shared
                .queue
                .lock()
                .map_err(|_| FetchError::ResourceLimit("调度队列锁已中毒".to_string()))?;
            queue.push(
                ticket,
                priority,
                Job {
                    request,
                    cancel: cancel.clone(),
                },
            );
        }
        self.shared.wake.notify_one();

        Ok(FetchHandle {
            ticket,
            cancel,
            queue: Arc::clone(&self.shared.queue),
        })
    }

    /// 停止接受新请求；已排队与进行中的请求不受影响。
    pub fn close(&self) {
        self.shared.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// 当前排队（尚未开始）的请求数量。
    pub fn queued_len(&self) -> usize {
        self.shared.queue.lock().map(|queue| queue.len()).unwrap_or(0)
    }

    pub fn fetcher(&self) -> &F {
        &self.shared.fetcher
    }
}

impl<F: ImageFetcher> Drop for FetchDispatcher<F> {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

async fn pump<F: ImageFetcher>(shared: Arc<Shared<F>>) {
    loop {
        let permit = match Arc::clone(&shared.permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return,
        };

        let job = loop {
            let next = match shared.queue.lock() {
                Ok(mut queue) => queue.pop(),
                Err(_) => {
                    log::error!("❌ 调度队列锁已中毒，分发器停止");
                    return;
                }
            };

            if let Some((_, job)) = next {
                break job;
            }
            shared.wake.notified().await;
        };

        if job.cancel.is_cancelled() {
            continue;
        }

        log::debug!(
            "🚀 开始取图 #{} priority={}",
            job.request.ticket.0,
            job.request.priority().as_str()
        );
        tokio::spawn(run_job(Arc::clone(&shared), job, permit));
    }
}

async fn run_job<F: ImageFetcher>(shared: Arc<Shared<F>>, job: Job, _permit: OwnedSemaphorePermit) {
    let Job { request, cancel } = job;
    let ticket = request.ticket;

    // 引擎在独立任务中运行，panic 只会落到 JoinError 上
    let mut fetch = {
        let shared = Arc::clone(&shared);
        let cancel = cancel.clone();
        tokio::spawn(async move { shared.fetcher.fetch(&request, &cancel).await })
    };

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            fetch.abort();
            None
        }
        joined = &mut fetch => Some(match joined {
            Ok(result) => result,
            Err(err) if err.is_panic() => {
                log::error!("❌ 请求 #{} 取图引擎崩溃: {}", ticket.0, err);
                Err(FetchError::Internal("取图引擎崩溃".to_string()))
            }
            Err(_) => Err(FetchError::Cancelled),
        }),
    };

    let outcome = match outcome {
        Some(outcome) if !cancel.is_cancelled() => outcome,
        _ => {
            log::debug!("🚫 请求 #{} 已取消，结果被丢弃", ticket.0);
            return;
        }
    };

    if shared.completions.send(Completion { ticket, outcome }).is_err() {
        log::debug!("完成通道已关闭，丢弃请求 #{} 的结果", ticket.0);
    }
}
