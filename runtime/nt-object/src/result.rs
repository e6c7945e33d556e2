//! Tagged outcome of a kernel operation

use crate::status::NtStatus;
use crate::Result;

/// Value-plus-status outcome returned in result mode.
///
/// The status is always present; the value is present iff the status is
/// in the success family.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NtResult<T> {
    Success { value: T, status: NtStatus },
    Failure { status: NtStatus },
}

impl<T> NtResult<T> {
    #[inline]
    pub fn status(&self) -> NtStatus {
        match self {
            NtResult::Success { status, .. } | NtResult::Failure { status } => *status,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, NtResult::Success { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            NtResult::Success { value, .. } => Some(value),
            NtResult::Failure { .. } => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            NtResult::Success { value, .. } => Some(value),
            NtResult::Failure { .. } => None,
        }
    }

    /// Throwing-mode adapter: failure becomes [`NtError::Os`](crate::NtError::Os)
    pub fn into_result(self) -> Result<T> {
        match self {
            NtResult::Success { value, .. } => Ok(value),
            NtResult::Failure { status } => Err(status.to_error()),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> NtResult<U> {
        match self {
            NtResult::Success { value, status } => NtResult::Success { value: f(value), status },
            NtResult::Failure { status } => NtResult::Failure { status },
        }
    }

    /// Convert the value into a wider type
    pub fn cast<U: From<T>>(self) -> NtResult<U> {
        self.map(U::from)
    }

    pub fn value_or(self, default: T) -> T {
        self.into_value().unwrap_or(default)
    }
}
