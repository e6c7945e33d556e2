//! Unified NT system call interface
//!
//! Every service takes and returns raw values and reports its outcome as an
//! `NTSTATUS`. Out parameters follow the native convention: they are only
//! written when the service produces a value, so a caller must treat a
//! written handle as owned even if it later decides to fail.

#![allow(non_snake_case)]

use crate::status::*;
use crate::types::*;

// ========== Mock Mode ==========

#[cfg(feature = "mock")]
use crate::mock::{self, kernel, state};

// ========== Handles ==========

#[cfg(feature = "mock")]
pub fn NtClose(Handle: HANDLE) -> NTSTATUS {
    kernel().lock().close_handle(Handle)
}

#[cfg(feature = "mock")]
pub fn NtDuplicateObject(
    SourceHandle: HANDLE,
    TargetHandle: &mut HANDLE,
    DesiredAccess: ACCESS_MASK,
    HandleAttributes: ULONG,
    Options: ULONG,
) -> NTSTATUS {
    kernel()
        .lock()
        .duplicate(SourceHandle, TargetHandle, DesiredAccess, HandleAttributes, Options)
}

#[cfg(feature = "mock")]
pub fn NtQueryObjectBasic(Handle: HANDLE, Information: &mut OBJECT_BASIC_INFORMATION) -> NTSTATUS {
    match kernel().lock().basic_information(Handle) {
        Ok(info) => {
            *Information = info;
            STATUS_SUCCESS
        }
        Err(status) => status,
    }
}

#[cfg(feature = "mock")]
pub fn NtQueryObjectType(Handle: HANDLE, Type: &mut Option<ObjectType>) -> NTSTATUS {
    match kernel().lock().object_type_of(Handle) {
        Ok(ty) => {
            *Type = Some(ty);
            STATUS_SUCCESS
        }
        Err(status) => status,
    }
}

// ========== Directories ==========

#[cfg(feature = "mock")]
pub fn NtCreateDirectoryObject(
    DirectoryHandle: &mut HANDLE,
    DesiredAccess: ACCESS_MASK,
    ObjectAttributes: Option<&OBJECT_ATTRIBUTES<'_>>,
) -> NTSTATUS {
    kernel()
        .lock()
        .create_object(DirectoryHandle, DesiredAccess, ObjectAttributes, state::directory())
}

#[cfg(feature = "mock")]
pub fn NtOpenDirectoryObject(
    DirectoryHandle: &mut HANDLE,
    DesiredAccess: ACCESS_MASK,
    ObjectAttributes: &OBJECT_ATTRIBUTES<'_>,
) -> NTSTATUS {
    kernel()
        .lock()
        .open_object(DirectoryHandle, DesiredAccess, ObjectAttributes, ObjectType::Directory)
}

// ========== Events ==========

#[cfg(feature = "mock")]
pub fn NtCreateEvent(
    EventHandle: &mut HANDLE,
    DesiredAccess: ACCESS_MASK,
    ObjectAttributes: Option<&OBJECT_ATTRIBUTES<'_>>,
    EventType: EVENT_TYPE,
    InitialState: bool,
) -> NTSTATUS {
    kernel().lock().create_object(
        EventHandle,
        DesiredAccess,
        ObjectAttributes,
        state::event(EventType, InitialState),
    )
}

#[cfg(feature = "mock")]
pub fn NtOpenEvent(
    EventHandle: &mut HANDLE,
    DesiredAccess: ACCESS_MASK,
    ObjectAttributes: &OBJECT_ATTRIBUTES<'_>,
) -> NTSTATUS {
    kernel()
        .lock()
        .open_object(EventHandle, DesiredAccess, ObjectAttributes, ObjectType::Event)
}

#[cfg(feature = "mock")]
fn write_previous(result: Result<LONG, NTSTATUS>, PreviousState: Option<&mut LONG>) -> NTSTATUS {
    match result {
        Ok(previous) => {
            if let Some(out) = PreviousState {
                *out = previous;
            }
            STATUS_SUCCESS
        }
        Err(status) => status,
    }
}

#[cfg(feature = "mock")]
pub fn NtSetEvent(EventHandle: HANDLE, PreviousState: Option<&mut LONG>) -> NTSTATUS {
    write_previous(kernel().lock().set_event(EventHandle, true), PreviousState)
}

#[cfg(feature = "mock")]
pub fn NtResetEvent(EventHandle: HANDLE, PreviousState: Option<&mut LONG>) -> NTSTATUS {
    write_previous(kernel().lock().set_event(EventHandle, false), PreviousState)
}

#[cfg(feature = "mock")]
pub fn NtQueryEvent(EventHandle: HANDLE, Information: &mut EVENT_BASIC_INFORMATION) -> NTSTATUS {
    match kernel().lock().query_event(EventHandle) {
        Ok(info) => {
            *Information = info;
            STATUS_SUCCESS
        }
        Err(status) => status,
    }
}

// ========== Mutants ==========

#[cfg(feature = "mock")]
pub fn NtCreateMutant(
    MutantHandle: &mut HANDLE,
    DesiredAccess: ACCESS_MASK,
    ObjectAttributes: Option<&OBJECT_ATTRIBUTES<'_>>,
    InitialOwner: bool,
) -> NTSTATUS {
    let owner = if InitialOwner {
        match mock::current_id() {
            Some(id) => Some(id),
            None => return STATUS_UNSUCCESSFUL,
        }
    } else {
        None
    };
    kernel()
        .lock()
        .create_object(MutantHandle, DesiredAccess, ObjectAttributes, state::mutant(owner))
}

#[cfg(feature = "mock")]
pub fn NtOpenMutant(
    MutantHandle: &mut HANDLE,
    DesiredAccess: ACCESS_MASK,
    ObjectAttributes: &OBJECT_ATTRIBUTES<'_>,
) -> NTSTATUS {
    kernel()
        .lock()
        .open_object(MutantHandle, DesiredAccess, ObjectAttributes, ObjectType::Mutant)
}

#[cfg(feature = "mock")]
pub fn NtReleaseMutant(MutantHandle: HANDLE, PreviousCount: Option<&mut LONG>) -> NTSTATUS {
    let thread = match mock::current_id() {
        Some(id) => id,
        None => return STATUS_UNSUCCESSFUL,
    };
    write_previous(kernel().lock().release_mutant(MutantHandle, thread), PreviousCount)
}

#[cfg(feature = "mock")]
pub fn NtQueryMutant(MutantHandle: HANDLE, Information: &mut MUTANT_BASIC_INFORMATION) -> NTSTATUS {
    let thread = mock::current_id();
    match kernel().lock().query_mutant(MutantHandle, thread) {
        Ok(info) => {
            *Information = info;
            STATUS_SUCCESS
        }
        Err(status) => status,
    }
}

// ========== Semaphores ==========

#[cfg(feature = "mock")]
pub fn NtCreateSemaphore(
    SemaphoreHandle: &mut HANDLE,
    DesiredAccess: ACCESS_MASK,
    ObjectAttributes: Option<&OBJECT_ATTRIBUTES<'_>>,
    InitialCount: LONG,
    MaximumCount: LONG,
) -> NTSTATUS {
    if MaximumCount <= 0 || InitialCount < 0 || InitialCount > MaximumCount {
        return STATUS_INVALID_PARAMETER;
    }
    kernel().lock().create_object(
        SemaphoreHandle,
        DesiredAccess,
        ObjectAttributes,
        state::semaphore(InitialCount, MaximumCount),
    )
}

#[cfg(feature = "mock")]
pub fn NtOpenSemaphore(
    SemaphoreHandle: &mut HANDLE,
    DesiredAccess: ACCESS_MASK,
    ObjectAttributes: &OBJECT_ATTRIBUTES<'_>,
) -> NTSTATUS {
    kernel()
        .lock()
        .open_object(SemaphoreHandle, DesiredAccess, ObjectAttributes, ObjectType::Semaphore)
}

#[cfg(feature = "mock")]
pub fn NtReleaseSemaphore(
    SemaphoreHandle: HANDLE,
    ReleaseCount: LONG,
    PreviousCount: Option<&mut LONG>,
) -> NTSTATUS {
    write_previous(
        kernel().lock().release_semaphore(SemaphoreHandle, ReleaseCount),
        PreviousCount,
    )
}

#[cfg(feature = "mock")]
pub fn NtQuerySemaphore(SemaphoreHandle: HANDLE, Information: &mut SEMAPHORE_BASIC_INFORMATION) -> NTSTATUS {
    match kernel().lock().query_semaphore(SemaphoreHandle) {
        Ok(info) => {
            *Information = info;
            STATUS_SUCCESS
        }
        Err(status) => status,
    }
}

// ========== Partitions ==========

#[cfg(feature = "mock")]
pub fn NtCreatePartition(
    ParentPartitionHandle: HANDLE,
    PartitionHandle: &mut HANDLE,
    DesiredAccess: ACCESS_MASK,
    ObjectAttributes: Option<&OBJECT_ATTRIBUTES<'_>>,
    PreferredNode: LONG,
) -> NTSTATUS {
    if PreferredNode < -1 || PreferredNode >= mock::MOCK_NODE_COUNT {
        return STATUS_INVALID_PARAMETER;
    }
    let mut om = kernel().lock();
    let parent = match om.partition_parent(ParentPartitionHandle) {
        Ok(parent) => parent,
        Err(status) => return status,
    };
    om.create_object(
        PartitionHandle,
        DesiredAccess,
        ObjectAttributes,
        state::partition(parent, PreferredNode),
    )
}

#[cfg(feature = "mock")]
pub fn NtOpenPartition(
    PartitionHandle: &mut HANDLE,
    DesiredAccess: ACCESS_MASK,
    ObjectAttributes: &OBJECT_ATTRIBUTES<'_>,
) -> NTSTATUS {
    kernel()
        .lock()
        .open_object(PartitionHandle, DesiredAccess, ObjectAttributes, ObjectType::Partition)
}

#[cfg(feature = "mock")]
pub fn NtQueryPartition(PartitionHandle: HANDLE, Information: &mut PARTITION_BASIC_INFORMATION) -> NTSTATUS {
    match kernel().lock().query_partition(PartitionHandle) {
        Ok(info) => {
            *Information = info;
            STATUS_SUCCESS
        }
        Err(status) => status,
    }
}

// ========== Waits ==========

#[cfg(feature = "mock")]
pub fn NtWaitForSingleObject(Handle: HANDLE, Alertable: bool, Timeout: Option<LARGE_INTEGER>) -> NTSTATUS {
    mock::wait_for_objects(&[Handle], WAIT_TYPE::WaitAny, Alertable, Timeout)
}

#[cfg(feature = "mock")]
pub fn NtWaitForMultipleObjects(
    Handles: &[HANDLE],
    WaitType: WAIT_TYPE,
    Alertable: bool,
    Timeout: Option<LARGE_INTEGER>,
) -> NTSTATUS {
    mock::wait_for_objects(Handles, WaitType, Alertable, Timeout)
}

// ========== Threads ==========

/// Identifier of the calling thread, `0` if it cannot be determined
#[cfg(feature = "mock")]
pub fn NtCurrentThreadId() -> u64 {
    mock::current_id().unwrap_or(0)
}

#[cfg(feature = "mock")]
pub fn NtAlertThreadByThreadId(ThreadId: u64) -> NTSTATUS {
    kernel().lock().alert_thread(ThreadId)
}
