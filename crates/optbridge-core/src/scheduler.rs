//! Cancelable deferred tasks.
//!
//! Guards write their value back on a later turn of the event loop so that a
//! declarative update in the current turn can still cancel them.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

use crate::error::SyncError;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() -> Result<(), SyncError>>;

/// Identifies a scheduled task for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// A queue that runs tasks on a future turn, never synchronously.
pub trait TaskQueue {
    /// Schedule `task` to run after the current turn.
    fn schedule(&self, task: Task) -> TaskId;

    /// Cancel a task that has not run yet. Returns whether it was pending.
    fn cancel(&self, id: TaskId) -> bool;
}

#[derive(Default)]
struct QueueState {
    next_id: u64,
    pending: VecDeque<(TaskId, Task)>,
}

/// Deterministic single-threaded FIFO queue, driven by the caller.
///
/// Each [`run_turn`](Self::run_turn) runs the tasks that were queued when the
/// turn started; tasks they schedule wait for the next turn.
#[derive(Default)]
pub struct MacrotaskQueue {
    state: RefCell<QueueState>,
}

impl MacrotaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.state.borrow().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run one turn and return how many tasks ran.
    ///
    /// Stops at the first failing task; the remaining tasks stay queued.
    pub fn run_turn(&self) -> Result<usize, SyncError> {
        let boundary = TaskId(self.state.borrow().next_id);
        let mut ran = 0;

        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let ready = matches!(state.pending.front(), Some((id, _)) if *id < boundary);
                if ready {
                    state.pending.pop_front()
                } else {
                    None
                }
            };
            let Some((_, task)) = next else { break };

            task()?;
            ran += 1;
        }

        Ok(ran)
    }

    /// Run turns until nothing is left and return the total tasks run.
    pub fn run_until_idle(&self) -> Result<usize, SyncError> {
        let mut total = 0;
        while !self.is_empty() {
            total += self.run_turn()?;
        }
        Ok(total)
    }
}

impl TaskQueue for MacrotaskQueue {
    fn schedule(&self, task: Task) -> TaskId {
        let mut state = self.state.borrow_mut();
        let id = TaskId(state.next_id);
        state.next_id += 1;
        state.pending.push_back((id, task));
        id
    }

    fn cancel(&self, id: TaskId) -> bool {
        let mut state = self.state.borrow_mut();
        match state.pending.iter().position(|(pending, _)| *pending == id) {
            Some(index) => {
                state.pending.remove(index);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for MacrotaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacrotaskQueue")
            .field("pending", &self.len())
            .finish()
    }
}

#[cfg(feature = "tokio")]
pub use local::LocalTaskQueue;

#[cfg(feature = "tokio")]
mod local {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    use tokio::task::AbortHandle;

    use super::{Task, TaskId, TaskQueue};

    /// Task queue backed by `tokio::task::spawn_local`.
    ///
    /// Must be used from inside a `tokio::task::LocalSet`.
    #[derive(Debug, Default)]
    pub struct LocalTaskQueue {
        next_id: Cell<u64>,
        handles: Rc<RefCell<HashMap<TaskId, AbortHandle>>>,
    }

    impl LocalTaskQueue {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of tasks that have neither run nor been canceled.
        pub fn len(&self) -> usize {
            self.handles.borrow().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl TaskQueue for LocalTaskQueue {
        fn schedule(&self, task: Task) -> TaskId {
            let id = TaskId(self.next_id.get());
            self.next_id.set(id.0 + 1);

            let handles = Rc::clone(&self.handles);
            let join = tokio::task::spawn_local(async move {
                handles.borrow_mut().remove(&id);
                if let Err(err) = task() {
                    tracing::error!("Deferred option write failed: {}", err);
                }
            });

            self.handles.borrow_mut().insert(id, join.abort_handle());
            id
        }

        fn cancel(&self, id: TaskId) -> bool {
            let handle = self.handles.borrow_mut().remove(&id);
            match handle {
                Some(handle) => {
                    handle.abort();
                    true
                }
                None => false,
            }
        }
    }
}
