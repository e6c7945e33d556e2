//! Waiting on kernel objects
//!
//! Waits block only the calling thread. Passing a handle to a wait is a
//! shared borrow, so it cannot be closed while the wait is in progress and
//! stays open afterwards.

use alloc::vec::Vec;

use nt_platform::adapter as nt;
use nt_platform::types::{HANDLE, NTSTATUS, WAIT_TYPE};

use crate::config::MAXIMUM_WAIT_OBJECTS;
use crate::handle::KernelHandle;
use crate::object::{NtObject, WaitableKind};
use crate::result::NtResult;
use crate::status::NtStatus;
use crate::timeout::WaitTimeout;
use crate::{NtError, Result};

/// How a wait completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitResult {
    /// Satisfied; the index of the object for a wait-any, `None` otherwise
    Signalled(Option<usize>),
    Timeout,
    /// Satisfied by a mutant whose owner exited without releasing it
    Abandoned(Option<usize>),
    /// An alert or APC interrupted an alertable wait
    Alerted,
}

impl WaitResult {
    /// Decode a success-family wait status.
    ///
    /// `count` is the number of handles of a wait-any, `None` for a single
    /// object or wait-all wait where no index is reported.
    pub(crate) fn from_status(status: NTSTATUS, count: Option<usize>) -> Option<Self> {
        let index = |base: NTSTATUS| -> Option<Option<usize>> {
            let offset = usize::try_from(status.checked_sub(base)?).ok()?;
            match count {
                Some(count) if offset < count => Some(Some(offset)),
                None if offset == 0 => Some(None),
                _ => None,
            }
        };

        match status {
            nt::STATUS_ALERTED | nt::STATUS_USER_APC => Some(WaitResult::Alerted),
            nt::STATUS_TIMEOUT => Some(WaitResult::Timeout),
            nt::STATUS_WAIT_0..=nt::STATUS_WAIT_63 => index(nt::STATUS_WAIT_0).map(WaitResult::Signalled),
            nt::STATUS_ABANDONED_WAIT_0..=nt::STATUS_ABANDONED_WAIT_63 => {
                index(nt::STATUS_ABANDONED_WAIT_0).map(WaitResult::Abandoned)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn is_signalled(&self) -> bool {
        matches!(self, WaitResult::Signalled(_))
    }

    /// Index of the object that satisfied a wait-any
    pub fn index(&self) -> Option<usize> {
        match self {
            WaitResult::Signalled(index) | WaitResult::Abandoned(index) => *index,
            WaitResult::Timeout | WaitResult::Alerted => None,
        }
    }
}

/// Anything holding a handle the wait services accept
pub trait Waitable {
    /// Checked raw handle; fails if the handle is closed
    fn wait_handle(&self) -> Result<HANDLE>;
}

/// Untyped handles are checked by the kernel: a non-waitable object fails
/// with `STATUS_OBJECT_TYPE_MISMATCH`
impl Waitable for KernelHandle {
    fn wait_handle(&self) -> Result<HANDLE> {
        self.raw()
    }
}

impl<K: WaitableKind> Waitable for NtObject<K> {
    fn wait_handle(&self) -> Result<HANDLE> {
        self.handle().raw()
    }
}

impl<T: Waitable + ?Sized> Waitable for &T {
    fn wait_handle(&self) -> Result<HANDLE> {
        (**self).wait_handle()
    }
}

fn finish(status: NTSTATUS, count: Option<usize>, throw_on_error: bool) -> Result<NtResult<WaitResult>> {
    let status = NtStatus::new(status);
    let outcome = status.create_result(throw_on_error, || {
        WaitResult::from_status(status.code(), count).ok_or_else(|| {
            log::warn!("unexpected wait status {}", status);
            NtError::Os { status: nt::STATUS_UNSUCCESSFUL }
        })
    })?;
    log::trace!("wait completed: {:?}", outcome);
    Ok(outcome)
}

/// Wait for a single object
pub fn wait_one(
    object: &(impl Waitable + ?Sized),
    alertable: bool,
    timeout: WaitTimeout,
    throw_on_error: bool,
) -> Result<NtResult<WaitResult>> {
    let handle = object.wait_handle()?;
    log::trace!("waiting on {:#x} (alertable={}, timeout={:?})", handle, alertable, timeout);
    let status = nt::NtWaitForSingleObject(handle, alertable, timeout.to_interval());
    finish(status, None, throw_on_error)
}

/// Wait for any or all of an ordered set of objects.
///
/// A wait-any reports the lowest index among the objects that were ready.
pub fn wait_many(
    objects: &[&dyn Waitable],
    alertable: bool,
    wait_all: bool,
    timeout: WaitTimeout,
    throw_on_error: bool,
) -> Result<NtResult<WaitResult>> {
    if objects.is_empty() {
        return Err(NtError::InvalidArgument("wait set is empty"));
    }
    if objects.len() > MAXIMUM_WAIT_OBJECTS {
        return Err(NtError::InvalidArgument("wait set exceeds MAXIMUM_WAIT_OBJECTS"));
    }
    let handles = objects
        .iter()
        .map(|object| object.wait_handle())
        .collect::<Result<Vec<_>>>()?;

    let wait_type = if wait_all { WAIT_TYPE::WaitAll } else { WAIT_TYPE::WaitAny };
    log::trace!(
        "waiting on {} handle(s) ({:?}, alertable={}, timeout={:?})",
        handles.len(),
        wait_type,
        alertable,
        timeout
    );
    let status = nt::NtWaitForMultipleObjects(&handles, wait_type, alertable, timeout.to_interval());
    let count = (!wait_all).then_some(handles.len());
    finish(status, count, throw_on_error)
}

/// Builder for a multi-object wait
#[derive(Default)]
pub struct WaitSet<'a> {
    objects: Vec<&'a dyn Waitable>,
    wait_all: bool,
    alertable: bool,
}

impl<'a> WaitSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an object; its index is its position in push order
    pub fn push(&mut self, object: &'a dyn Waitable) -> &mut Self {
        self.objects.push(object);
        self
    }

    pub fn with(mut self, object: &'a dyn Waitable) -> Self {
        self.objects.push(object);
        self
    }

    pub fn wait_all(mut self, wait_all: bool) -> Self {
        self.wait_all = wait_all;
        self
    }

    pub fn alertable(mut self, alertable: bool) -> Self {
        self.alertable = alertable;
        self
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn wait(&self, timeout: WaitTimeout, throw_on_error: bool) -> Result<NtResult<WaitResult>> {
        wait_many(&self.objects, self.alertable, self.wait_all, timeout, throw_on_error)
    }
}

/// Token for delivering an alert to one thread
///
/// Obtain it on the thread that will wait, hand it to another thread, and
/// call [`ThreadAlert::alert`] to interrupt that thread's alertable wait. An
/// alert delivered while the thread is not waiting completes its next
/// alertable wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAlert {
    thread_id: u64,
}

impl ThreadAlert {
    /// Token for the calling thread
    pub fn current() -> Self {
        Self {
            thread_id: nt::NtCurrentThreadId(),
        }
    }

    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    pub fn alert(&self, throw_on_error: bool) -> Result<NtResult<()>> {
        log::debug!("alerting thread {}", self.thread_id);
        NtStatus::new(nt::NtAlertThreadByThreadId(self.thread_id)).create_result(throw_on_error, || Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_decoding_wait_any() {
        assert_eq!(WaitResult::from_status(nt::STATUS_WAIT_0, Some(2)), Some(WaitResult::Signalled(Some(0))));
        assert_eq!(WaitResult::from_status(nt::STATUS_WAIT_0 + 1, Some(2)), Some(WaitResult::Signalled(Some(1))));
        assert_eq!(
            WaitResult::from_status(nt::STATUS_ABANDONED_WAIT_0 + 1, Some(2)),
            Some(WaitResult::Abandoned(Some(1)))
        );
        // Index past the set is not a valid outcome
        assert_eq!(WaitResult::from_status(nt::STATUS_WAIT_0 + 2, Some(2)), None);
    }

    #[test]
    fn test_status_decoding_without_index() {
        assert_eq!(WaitResult::from_status(nt::STATUS_WAIT_0, None), Some(WaitResult::Signalled(None)));
        assert_eq!(WaitResult::from_status(nt::STATUS_ABANDONED_WAIT_0, None), Some(WaitResult::Abandoned(None)));
        assert_eq!(WaitResult::from_status(nt::STATUS_WAIT_0 + 1, None), None);
    }

    #[test]
    fn test_status_decoding_interruptions() {
        assert_eq!(WaitResult::from_status(nt::STATUS_TIMEOUT, Some(3)), Some(WaitResult::Timeout));
        assert_eq!(WaitResult::from_status(nt::STATUS_ALERTED, None), Some(WaitResult::Alerted));
        assert_eq!(WaitResult::from_status(nt::STATUS_USER_APC, Some(1)), Some(WaitResult::Alerted));
        assert_eq!(WaitResult::from_status(nt::STATUS_PENDING, None), None);
    }

    #[test]
    fn test_index_accessor() {
        assert_eq!(WaitResult::Signalled(Some(4)).index(), Some(4));
        assert_eq!(WaitResult::Signalled(None).index(), None);
        assert_eq!(WaitResult::Timeout.index(), None);
    }

    #[test]
    fn test_empty_set_rejected() {
        let err = WaitSet::new().wait(WaitTimeout::ZERO, false).unwrap_err();
        assert!(matches!(err, NtError::InvalidArgument(_)));
    }

    #[test]
    fn test_unknown_thread_alert_fails() {
        let token = ThreadAlert { thread_id: u64::MAX };
        assert_eq!(token.alert(true).unwrap_err().status().code(), nt::STATUS_INVALID_PARAMETER);
        let result = token.alert(false).unwrap();
        assert_eq!(result.status().code(), nt::STATUS_INVALID_PARAMETER);
        assert!(!result.is_success());
    }

    #[test]
    fn test_unexpected_wait_status_is_a_failure() {
        let pending = finish(nt::STATUS_PENDING, None, false).unwrap();
        assert!(!pending.is_success());
        assert!(!pending.status().is_success());
        assert_eq!(pending.status().code(), nt::STATUS_UNSUCCESSFUL);

        let past_end = finish(nt::STATUS_WAIT_0 + 2, Some(2), true).unwrap_err();
        assert_eq!(past_end, NtError::Os { status: nt::STATUS_UNSUCCESSFUL });

        let timeout = finish(nt::STATUS_TIMEOUT, Some(2), false).unwrap();
        assert_eq!(timeout.into_value(), Some(WaitResult::Timeout));
    }
}
