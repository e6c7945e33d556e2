//! Status classification and the result primitive
//!
//! Every fallible entry point funnels its kernel status through
//! [`NtStatus::create_result`]. In throwing mode a failure status becomes
//! `Err(NtError::Os)`; in result mode it becomes [`NtResult::Failure`].

use core::fmt;

use nt_platform::status::{self as raw, Severity};
use nt_platform::types::NTSTATUS;

use crate::result::NtResult;
use crate::{NtError, Result};

/// A kernel status code
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NtStatus(NTSTATUS);

impl NtStatus {
    pub const SUCCESS: Self = Self(raw::STATUS_SUCCESS);

    #[inline]
    pub const fn new(code: NTSTATUS) -> Self {
        Self(code)
    }

    #[inline]
    pub const fn code(self) -> NTSTATUS {
        self.0
    }

    #[inline]
    pub const fn severity(self) -> Severity {
        raw::severity(self.0)
    }

    /// Success or informational
    #[inline]
    pub const fn is_success(self) -> bool {
        raw::nt_success(self.0)
    }

    pub fn description(self) -> &'static str {
        raw::describe(self.0)
    }

    /// The error this status raises in throwing mode
    pub const fn to_error(self) -> NtError {
        NtError::Os { status: self.0 }
    }

    /// Fail with [`NtError::Os`] unless the status is in the success family
    pub fn check(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.to_error())
        }
    }

    /// Build the result of an operation whose kernel call returned `self`.
    ///
    /// `factory` runs only once the status is known to be a success and
    /// produces the value; it typically takes ownership of resources the
    /// call produced, so dropping it unrun releases them.
    ///
    /// In result mode an [`NtError::Os`] from the factory is reported as a
    /// failure too; other factory errors always propagate. A failure never
    /// carries a success-family status: one raised by the factory is
    /// reported as `STATUS_UNSUCCESSFUL`.
    pub fn create_result<T, F>(self, throw_on_error: bool, factory: F) -> Result<NtResult<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        if !self.is_success() {
            log::trace!("status {:#010x}: {}", self.0 as u32, self.description());
            return if throw_on_error {
                Err(self.to_error())
            } else {
                Ok(NtResult::Failure { status: self })
            };
        }

        match factory() {
            Ok(value) => Ok(NtResult::Success { value, status: self }),
            Err(NtError::Os { status }) if !throw_on_error => {
                let status = if raw::nt_success(status) { raw::STATUS_UNSUCCESSFUL } else { status };
                Ok(NtResult::Failure { status: NtStatus(status) })
            }
            Err(err) => Err(err),
        }
    }
}

impl From<NTSTATUS> for NtStatus {
    fn from(code: NTSTATUS) -> Self {
        Self(code)
    }
}

impl From<NtStatus> for NTSTATUS {
    fn from(status: NtStatus) -> Self {
        status.0
    }
}

impl fmt::Debug for NtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NtStatus({:#010x})", self.0 as u32)
    }
}

impl fmt::Display for NtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#010x})", self.description(), self.0 as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use nt_platform::status::*;

    #[test]
    fn test_success_family() {
        assert!(NtStatus::SUCCESS.is_success());
        assert!(NtStatus::new(STATUS_OBJECT_NAME_EXISTS).is_success());
        assert_eq!(NtStatus::new(STATUS_OBJECT_NAME_EXISTS).severity(), Severity::Informational);
        assert!(!NtStatus::new(STATUS_NO_MORE_ENTRIES).is_success());
        assert!(!NtStatus::new(STATUS_ACCESS_DENIED).is_success());
    }

    #[test]
    fn test_failure_in_result_mode_skips_factory() {
        let ran = Cell::new(false);
        let result = NtStatus::new(STATUS_ACCESS_DENIED)
            .create_result(false, || {
                ran.set(true);
                Ok(42)
            })
            .unwrap();

        assert!(!ran.get());
        assert_eq!(result, NtResult::Failure { status: NtStatus::new(STATUS_ACCESS_DENIED) });
    }

    #[test]
    fn test_failure_in_throwing_mode() {
        let err = NtStatus::new(STATUS_INVALID_HANDLE)
            .create_result(true, || Ok(()))
            .unwrap_err();
        assert_eq!(err, NtError::Os { status: STATUS_INVALID_HANDLE });
    }

    #[test]
    fn test_factory_success_status_is_not_a_failure_status() {
        let result: NtResult<()> = NtStatus::SUCCESS
            .create_result(false, || Err(NtError::Os { status: STATUS_PENDING }))
            .unwrap();
        assert_eq!(result, NtResult::Failure { status: NtStatus::new(STATUS_UNSUCCESSFUL) });
        assert!(!result.status().is_success());
    }

    #[test]
    fn test_success_keeps_status() {
        let result = NtStatus::new(STATUS_OBJECT_NAME_EXISTS)
            .create_result(true, || Ok("opened"))
            .unwrap();
        assert_eq!(result.status().code(), STATUS_OBJECT_NAME_EXISTS);
        assert_eq!(result.into_result(), Ok("opened"));
    }

    #[test]
    fn test_factory_errors() {
        let reported = NtStatus::SUCCESS
            .create_result::<(), _>(false, || Err(NtError::Os { status: STATUS_UNSUCCESSFUL }))
            .unwrap();
        assert!(!reported.is_success());

        let raised = NtStatus::SUCCESS.create_result::<(), _>(false, || Err(NtError::HandleClosed));
        assert_eq!(raised, Err(NtError::HandleClosed));
    }

    #[test]
    fn test_display() {
        let text = format!("{}", NtStatus::new(STATUS_TIMEOUT));
        assert_eq!(text, "The wait timed out. (0x00000102)");
    }
}
