//! NT Object - Typed kernel object handles and the wait engine
//!
//! # Purpose
//! Wraps raw kernel handles in owned, typed values. One generic model covers
//! creation, opening, duplication and access-right negotiation for every
//! object kind, and a single result primitive carries kernel statuses back
//! to the caller either as errors or as tagged results.
//!
//! # Integration Points
//! - Depends on: `nt-platform` (raw types, status space, system calls)
//! - Provides to: shells, services and anything holding kernel objects
//! - Capabilities required: none beyond the handles callers already own
//!
//! # Architecture
//! - [`access`]: rights bit sets and generic-to-specific translation
//! - [`status`] / [`result`]: status classification and `NtResult`
//! - [`attributes`]: validated object attributes for create/open
//! - [`handle`]: `KernelHandle`, the RAII owner of one raw handle
//! - [`object`] / [`kinds`]: `NtObject<K>` and the concrete object kinds
//! - [`timeout`] / [`wait`]: timeout composition and blocking waits
//!
//! # Testing Strategy
//! - Unit tests: rights translation, timeout arithmetic, status decoding
//! - Integration tests: object lifecycles and multi-threaded waits against
//!   the mock object manager

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

extern crate alloc;

pub mod access;
pub mod attributes;
pub mod config;
pub mod handle;
pub mod kinds;
pub mod object;
pub mod result;
pub mod status;
pub mod timeout;
pub mod wait;

pub use access::{AccessMask, GenericMapping, RightsTranslator};
pub use attributes::{AttributeFlags, ObjectAttributes};
pub use handle::KernelHandle;
pub use kinds::{
    Directory, DirectoryAccessRights, Event, EventAccessRights, EventInformation, EventType, Mutant,
    MutantAccessRights, MutantInformation, Partition, PartitionAccessRights, PartitionInformation,
    Semaphore, SemaphoreAccessRights, SemaphoreInformation,
};
pub use object::{NtObject, ObjectKind, WaitableKind};
pub use result::NtResult;
pub use status::NtStatus;
pub use timeout::{TimeoutParts, WaitTimeout};
pub use wait::{wait_many, wait_one, ThreadAlert, WaitResult, WaitSet, Waitable};

pub use nt_platform::types::ObjectType;

use nt_platform::types::NTSTATUS;
use thiserror::Error;

/// Error types for object and wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NtError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("{} (status {:#010x})", nt_platform::status::describe(*.status), *.status as u32)]
    Os { status: NTSTATUS },

    #[error("Handle is closed")]
    HandleClosed,
}

impl NtError {
    /// Status code a kernel would report for this error
    pub fn status(&self) -> NtStatus {
        use nt_platform::status::{STATUS_INVALID_HANDLE, STATUS_INVALID_PARAMETER};

        match self {
            NtError::InvalidArgument(_) => NtStatus::new(STATUS_INVALID_PARAMETER),
            NtError::Os { status } => NtStatus::new(*status),
            NtError::HandleClosed => NtStatus::new(STATUS_INVALID_HANDLE),
        }
    }
}

pub type Result<T> = core::result::Result<T, NtError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use nt_platform::status::{STATUS_ACCESS_DENIED, STATUS_INVALID_PARAMETER};

    #[test]
    fn test_error_messages() {
        let err = NtError::Os { status: STATUS_ACCESS_DENIED };
        assert_eq!(err.to_string(), "Access is denied. (status 0xc0000022)");
        assert_eq!(
            NtError::InvalidArgument("empty wait set").to_string(),
            "Invalid argument: empty wait set"
        );
        assert_eq!(NtError::HandleClosed.to_string(), "Handle is closed");
    }

    #[test]
    fn test_error_status() {
        assert_eq!(NtError::InvalidArgument("x").status().code(), STATUS_INVALID_PARAMETER);
        assert_eq!(NtError::Os { status: STATUS_ACCESS_DENIED }.status().code(), STATUS_ACCESS_DENIED);
    }
}
