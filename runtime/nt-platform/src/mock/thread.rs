//! Thread registry for the mock kernel
//!
//! Every host thread that touches a thread-sensitive service (waits,
//! mutant ownership, alerts) is registered lazily through a thread-local
//! context. Dropping that context at thread exit abandons any mutants the
//! thread still owns, which is how abandoned waits arise.

use core::sync::atomic::{AtomicU64, Ordering};

use crossbeam::sync::{Parker, Unparker};

pub(crate) type ThreadId = u64;

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

/// Kernel-side record of a registered thread
pub(crate) struct ThreadEntry {
    pub unparker: Unparker,
    /// Alert delivered but not yet consumed by an alertable wait
    pub alerted: bool,
}

/// Per-thread context living in thread-local storage
pub(crate) struct ThreadContext {
    pub id: ThreadId,
    pub parker: Parker,
}

impl ThreadContext {
    fn register() -> Self {
        let parker = Parker::new();
        let id = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
        super::kernel().lock().register_thread(
            id,
            ThreadEntry {
                unparker: parker.unparker().clone(),
                alerted: false,
            },
        );
        log::trace!("mock: registered thread {}", id);
        Self { id, parker }
    }
}

impl Drop for ThreadContext {
    fn drop(&mut self) {
        log::trace!("mock: thread {} exiting", self.id);
        super::kernel().lock().thread_exited(self.id);
    }
}

std::thread_local! {
    static CURRENT: ThreadContext = ThreadContext::register();
}

/// Run `f` with the calling thread's context.
///
/// Returns `None` once the thread's storage has been torn down.
/// Must not be called with the kernel lock held.
pub(crate) fn with_current<R>(f: impl FnOnce(&ThreadContext) -> R) -> Option<R> {
    CURRENT.try_with(f).ok()
}

pub(crate) fn current_id() -> Option<ThreadId> {
    with_current(|ctx| ctx.id)
}
