//! NT status codes and message lookup
//!
//! Only the codes this layer can produce or must interpret are listed.
//! The top two bits carry the severity: success, informational, warning,
//! error. A status belongs to the success family when it is non-negative.

use crate::types::NTSTATUS;

const fn code(raw: u32) -> NTSTATUS {
    raw as NTSTATUS
}

// Success family
pub const STATUS_SUCCESS: NTSTATUS = 0;
pub const STATUS_WAIT_0: NTSTATUS = 0x0000_0000;
pub const STATUS_WAIT_63: NTSTATUS = 0x0000_003F;
pub const STATUS_ABANDONED_WAIT_0: NTSTATUS = 0x0000_0080;
pub const STATUS_ABANDONED_WAIT_63: NTSTATUS = 0x0000_00BF;
pub const STATUS_USER_APC: NTSTATUS = 0x0000_00C0;
pub const STATUS_ALERTED: NTSTATUS = 0x0000_0101;
pub const STATUS_TIMEOUT: NTSTATUS = 0x0000_0102;
pub const STATUS_PENDING: NTSTATUS = 0x0000_0103;

// Informational
pub const STATUS_OBJECT_NAME_EXISTS: NTSTATUS = code(0x4000_0000);

// Warnings
pub const STATUS_NO_MORE_ENTRIES: NTSTATUS = code(0x8000_001A);

// Errors
pub const STATUS_UNSUCCESSFUL: NTSTATUS = code(0xC000_0001);
pub const STATUS_NOT_IMPLEMENTED: NTSTATUS = code(0xC000_0002);
pub const STATUS_INVALID_HANDLE: NTSTATUS = code(0xC000_0008);
pub const STATUS_INVALID_PARAMETER: NTSTATUS = code(0xC000_000D);
pub const STATUS_ACCESS_DENIED: NTSTATUS = code(0xC000_0022);
pub const STATUS_OBJECT_TYPE_MISMATCH: NTSTATUS = code(0xC000_0024);
pub const STATUS_INVALID_PARAMETER_MIX: NTSTATUS = code(0xC000_0030);
pub const STATUS_OBJECT_NAME_INVALID: NTSTATUS = code(0xC000_0033);
pub const STATUS_OBJECT_NAME_NOT_FOUND: NTSTATUS = code(0xC000_0034);
pub const STATUS_OBJECT_NAME_COLLISION: NTSTATUS = code(0xC000_0035);
pub const STATUS_OBJECT_PATH_NOT_FOUND: NTSTATUS = code(0xC000_003A);
pub const STATUS_OBJECT_PATH_SYNTAX_BAD: NTSTATUS = code(0xC000_003B);
pub const STATUS_MUTANT_NOT_OWNED: NTSTATUS = code(0xC000_0046);
pub const STATUS_SEMAPHORE_LIMIT_EXCEEDED: NTSTATUS = code(0xC000_0047);

/// Severity field of a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Informational,
    Warning,
    Error,
}

#[inline]
pub const fn severity(status: NTSTATUS) -> Severity {
    match (status as u32) >> 30 {
        0 => Severity::Success,
        1 => Severity::Informational,
        2 => Severity::Warning,
        _ => Severity::Error,
    }
}

#[inline]
pub const fn nt_success(status: NTSTATUS) -> bool {
    status >= 0
}

/// Human-readable message for a status code
pub fn describe(status: NTSTATUS) -> &'static str {
    match status {
        STATUS_SUCCESS => "The operation completed successfully.",
        s if s > STATUS_WAIT_0 && s <= STATUS_WAIT_63 => "The wait was satisfied by an object in the set.",
        s if (STATUS_ABANDONED_WAIT_0..=STATUS_ABANDONED_WAIT_63).contains(&s) => {
            "The wait was satisfied by an abandoned mutant."
        }
        STATUS_USER_APC => "The wait was interrupted to deliver a user APC.",
        STATUS_ALERTED => "The wait was interrupted by an alert.",
        STATUS_TIMEOUT => "The wait timed out.",
        STATUS_PENDING => "The operation is still in progress.",
        STATUS_OBJECT_NAME_EXISTS => "An object with that name already existed and was opened.",
        STATUS_NO_MORE_ENTRIES => "There are no more entries.",
        STATUS_UNSUCCESSFUL => "The requested operation was unsuccessful.",
        STATUS_NOT_IMPLEMENTED => "The requested operation is not implemented.",
        STATUS_INVALID_HANDLE => "An invalid handle was specified.",
        STATUS_INVALID_PARAMETER => "An invalid parameter was passed to a service.",
        STATUS_ACCESS_DENIED => "Access is denied.",
        STATUS_OBJECT_TYPE_MISMATCH => "The object type does not match the requested operation.",
        STATUS_INVALID_PARAMETER_MIX => "An invalid combination of parameters was specified.",
        STATUS_OBJECT_NAME_INVALID => "The object name is invalid.",
        STATUS_OBJECT_NAME_NOT_FOUND => "The object name was not found.",
        STATUS_OBJECT_NAME_COLLISION => "The object name already exists.",
        STATUS_OBJECT_PATH_NOT_FOUND => "The path does not exist.",
        STATUS_OBJECT_PATH_SYNTAX_BAD => "The object path component syntax is invalid.",
        STATUS_MUTANT_NOT_OWNED => "The mutant is not owned by the caller.",
        STATUS_SEMAPHORE_LIMIT_EXCEEDED => "The semaphore maximum count would be exceeded.",
        _ => "Unknown status code.",
    }
}
