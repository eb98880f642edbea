//! Cooperative scheduling primitives.
//!
//! Nothing here owns a thread. The host pulls work: idle-time tasks through
//! an [`IdleQueue`] bounded by an [`IdleDeadline`], and animation frames
//! through [`FrameRequests`] when its display refreshes.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Decides when an idle-time slice must hand control back to the host.
pub trait IdleDeadline {
    /// Called before each task; returning true stops the slice.
    fn should_yield(&mut self) -> bool;
}

/// Never yields: drains the whole queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl IdleDeadline for Unbounded {
    fn should_yield(&mut self) -> bool {
        false
    }
}

/// Runs at most a fixed number of tasks.
#[derive(Debug, Clone, Copy)]
pub struct TaskBudget {
    remaining: usize,
}

impl TaskBudget {
    pub fn new(tasks: usize) -> Self {
        Self { remaining: tasks }
    }
}

impl IdleDeadline for TaskBudget {
    fn should_yield(&mut self) -> bool {
        if self.remaining == 0 {
            return true;
        }
        self.remaining -= 1;
        false
    }
}

/// Runs until a wall-clock budget is spent, like `requestIdleCallback`'s
/// `timeRemaining()`.
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    deadline: Instant,
}

impl TimeBudget {
    pub fn new(budget: Duration) -> Self {
        Self {
            deadline: Instant::now() + budget,
        }
    }
}

impl IdleDeadline for TimeBudget {
    fn should_yield(&mut self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// FIFO of idle-time tasks.
#[derive(Debug, Clone)]
pub struct IdleQueue<T> {
    tasks: VecDeque<T>,
}

impl<T> IdleQueue<T> {
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    pub fn push(&mut self, task: T) {
        self.tasks.push_back(task);
    }

    /// Next task, unless the queue is empty or the deadline says to yield.
    pub fn next_task<D: IdleDeadline + ?Sized>(&mut self, deadline: &mut D) -> Option<T> {
        if self.tasks.is_empty() || deadline.should_yield() {
            return None;
        }
        self.tasks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

impl<T> Default for IdleQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for IdleQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tasks.extend(iter);
    }
}

/// Registration returned by [`FrameRequests::request`], like a
/// `requestAnimationFrame` id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

/// Pending next-frame callbacks.
#[derive(Debug, Clone, Default)]
pub struct FrameRequests {
    next_id: u64,
    pending: Vec<FrameHandle>,
}

impl FrameRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask to be called on the next frame.
    pub fn request(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    /// Withdraw a request. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }

    /// Remove and return every pending request, oldest first. Requests made
    /// while servicing these land in the next frame.
    pub fn take_pending(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
