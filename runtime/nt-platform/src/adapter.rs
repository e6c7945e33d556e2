//! NT Platform Adapter Layer
//!
//! Provides a unified API by re-exporting the raw types, the status space
//! and the system calls of whichever backend is compiled in.

pub use crate::status::*;
pub use crate::syscalls::*;
pub use crate::types::*;

/// Check whether a status belongs to the success family
#[inline]
pub const fn is_ok(status: NTSTATUS) -> bool {
    nt_success(status)
}

/// Check whether a status is a warning or an error
#[inline]
pub const fn is_err(status: NTSTATUS) -> bool {
    !nt_success(status)
}
