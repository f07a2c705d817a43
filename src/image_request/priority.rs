//! # 优先级调度
//!
//! ## 设计思路
//!
//! 三档优先级（low / normal / high）映射为有序枚举；等待中的请求放入二叉堆，
//! 同档内按入队顺序先进先出。调度只是“尽力而为”：不保证低优先级不被饿死，
//! 实际执行顺序仍由并发上限与取图引擎决定。
//!
//! ## 实现思路
//!
//! - 堆元素按 `(priority, Reverse(seq))` 排序。
//! - 取消采用惰性删除：只从 `queued` 索引中移除，弹出时跳过。
//! - 失效元素超过有效元素时整体压缩一次，堆大小始终不超过有效请求数的两倍。

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use super::FetchError;

/// 请求优先级。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Low = 0,
    #[default]
    Normal = 1,
    High = 2,
}

impl Priority {
    /// 严格解析优先级标签。
    pub fn parse(tag: &str) -> Result<Self, FetchError> {
        match tag {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            other => Err(FetchError::InvalidPriority(other.to_string())),
        }
    }

    /// 宽松解析：缺省或无法识别时回退为 `normal`。
    pub fn from_tag_or_default(tag: Option<&str>) -> Self {
        match tag {
            None => Self::Normal,
            Some(tag) => Self::parse(tag).unwrap_or_else(|err| {
                log::warn!("⚠️ {}，按 normal 处理", err);
                Self::Normal
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

/// 请求票据：每次发起请求时单调递增分配，用于匹配完成通知。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(pub u64);

#[derive(Debug)]
struct QueuedEntry<T> {
    ticket: RequestTicket,
    priority: Priority,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for QueuedEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<T> Eq for QueuedEntry<T> {}

impl<T> Ord for QueuedEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.priority.cmp(&other.priority) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            ord => ord,
        }
    }
}

impl<T> PartialOrd for QueuedEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// 等待中请求的优先级队列。
#[derive(Debug)]
pub struct PriorityScheduler<T> {
    heap: BinaryHeap<QueuedEntry<T>>,
    queued: HashSet<RequestTicket>,
    next_seq: u64,
}

impl<T> Default for PriorityScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PriorityScheduler<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            queued: HashSet::new(),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, ticket: RequestTicket, priority: Priority, payload: T) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.queued.insert(ticket);
        self.heap.push(QueuedEntry {
            ticket,
            priority,
            seq,
            payload,
        });
    }

    /// 弹出当前优先级最高、最早入队的请求。
    pub fn pop(&mut self) -> Option<(RequestTicket, T)> {
        while let Some(entry) = self.heap.pop() {
            if self.queued.remove(&entry.ticket) {
                return Some((entry.ticket, entry.payload));
            }
        }
        None
    }

    /// 取消尚未开始的请求。返回是否确实在队列中。
    pub fn cancel(&mut self, ticket: RequestTicket) -> bool {
        let removed = self.queued.remove(&ticket);
        if self.queued.is_empty() {
            self.heap.clear();
        } else if self.heap.len() > 2 * self.queued.len() {
            let queued = &self.queued;
            self.heap.retain(|entry| queued.contains(&entry.ticket));
        }
        removed
    }

    pub fn contains(&self, ticket: RequestTicket) -> bool {
        self.queued.contains(&ticket)
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}
