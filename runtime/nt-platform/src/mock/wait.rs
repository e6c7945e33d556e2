//! Blocking wait services for the mock kernel
//!
//! A waiting thread checks the set under the kernel lock. If nothing is
//! ready it registers itself on every object, drops the lock and parks.
//! Signalling an object unparks its waiters; the `Parker` token absorbs a
//! wake that races ahead of the park.

use std::time::{Duration, Instant};

use crate::status::*;
use crate::types::*;

use super::objects::ObjectId;
use super::thread::{self, ThreadId};
use super::{kernel, ObjectManager};

/// Convert an NT timeout into an absolute host deadline.
///
/// `None` waits forever, as does an interval too large to represent.
/// Only relative (non-positive) intervals are supported.
fn deadline(timeout: Option<LARGE_INTEGER>) -> Result<Option<Instant>, NTSTATUS> {
    match timeout {
        None => Ok(None),
        Some(interval) if interval <= 0 => {
            let ticks = interval.unsigned_abs();
            let nanos = ticks.saturating_mul(100);
            Ok(Instant::now().checked_add(Duration::from_nanos(nanos)))
        }
        Some(_) => Err(STATUS_NOT_IMPLEMENTED),
    }
}

impl ObjectManager {
    /// Resolve every handle to a waitable object the caller may synchronize on
    fn waitable_objects(&self, handles: &[HANDLE]) -> Result<Vec<ObjectId>, NTSTATUS> {
        handles
            .iter()
            .map(|&handle| {
                let entry = self.handle_entry(handle)?;
                let object = self.objects.get(&entry.object).ok_or(STATUS_INVALID_HANDLE)?;
                if !object.object_type().is_waitable() {
                    return Err(STATUS_OBJECT_TYPE_MISMATCH);
                }
                if entry.granted & SYNCHRONIZE == 0 {
                    return Err(STATUS_ACCESS_DENIED);
                }
                Ok(entry.object)
            })
            .collect()
    }

    fn is_signalled(&self, id: ObjectId, thread: ThreadId) -> bool {
        self.objects
            .get(&id)
            .map_or(false, |object| object.is_signalled_for(thread))
    }

    fn satisfy(&mut self, id: ObjectId, thread: ThreadId) -> bool {
        self.objects
            .get_mut(&id)
            .map_or(false, |object| object.satisfy(thread))
    }

    /// Try to complete the wait without blocking
    fn try_satisfy(&mut self, objects: &[ObjectId], wait_type: WAIT_TYPE, thread: ThreadId) -> Option<NTSTATUS> {
        match wait_type {
            WAIT_TYPE::WaitAny => {
                let index = objects.iter().position(|&id| self.is_signalled(id, thread))?;
                let abandoned = self.satisfy(objects[index], thread);
                let base = if abandoned { STATUS_ABANDONED_WAIT_0 } else { STATUS_WAIT_0 };
                Some(base + index as NTSTATUS)
            }
            WAIT_TYPE::WaitAll => {
                if !objects.iter().all(|&id| self.is_signalled(id, thread)) {
                    return None;
                }
                let mut abandoned = false;
                for &id in objects {
                    abandoned |= self.satisfy(id, thread);
                }
                Some(if abandoned { STATUS_ABANDONED_WAIT_0 } else { STATUS_WAIT_0 })
            }
        }
    }

    fn enqueue_waiter(&mut self, objects: &[ObjectId], thread: ThreadId) {
        for id in objects {
            if let Some(object) = self.objects.get_mut(id) {
                object.add_waiter(thread);
            }
        }
    }

    fn dequeue_waiter(&mut self, objects: &[ObjectId], thread: ThreadId) {
        for id in objects {
            if let Some(object) = self.objects.get_mut(id) {
                object.remove_waiter(thread);
            }
        }
    }
}

/// Wait until the set is satisfied, the thread is alerted, or time runs out
pub(crate) fn wait_for_objects(
    handles: &[HANDLE],
    wait_type: WAIT_TYPE,
    alertable: bool,
    timeout: Option<LARGE_INTEGER>,
) -> NTSTATUS {
    if handles.is_empty() || handles.len() > MAXIMUM_WAIT_OBJECTS {
        return STATUS_INVALID_PARAMETER;
    }
    let deadline = match deadline(timeout) {
        Ok(deadline) => deadline,
        Err(status) => return status,
    };

    let waited = thread::with_current(|ctx| {
        let mut registered: Vec<ObjectId> = Vec::new();
        loop {
            {
                let mut om = kernel().lock();
                om.dequeue_waiter(&registered, ctx.id);

                let objects = match om.waitable_objects(handles) {
                    Ok(objects) => objects,
                    Err(status) => return status,
                };
                if wait_type == WAIT_TYPE::WaitAll {
                    let mut unique = objects.clone();
                    unique.sort_unstable();
                    unique.dedup();
                    if unique.len() != objects.len() {
                        return STATUS_INVALID_PARAMETER_MIX;
                    }
                }

                if let Some(status) = om.try_satisfy(&objects, wait_type, ctx.id) {
                    return status;
                }
                if alertable && om.take_alert(ctx.id) {
                    return STATUS_ALERTED;
                }
                if deadline.map_or(false, |d| Instant::now() >= d) {
                    return STATUS_TIMEOUT;
                }

                om.enqueue_waiter(&objects, ctx.id);
                registered = objects;
            }

            match deadline {
                Some(deadline) => ctx.parker.park_deadline(deadline),
                None => ctx.parker.park(),
            }
        }
    });

    waited.unwrap_or(STATUS_UNSUCCESSFUL)
}
