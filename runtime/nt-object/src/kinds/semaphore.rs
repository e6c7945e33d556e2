//! Semaphore objects

use nt_platform::adapter as nt;
use nt_platform::types::{ObjectType, SEMAPHORE_BASIC_INFORMATION};

use crate::access::kind_rights;
use crate::attributes::ObjectAttributes;
use crate::object::{NtObject, WaitableKind};
use crate::result::NtResult;
use crate::Result;

use super::{complete, object_kind};

kind_rights! {
    /// Semaphore access rights
    pub struct SemaphoreAccessRights {
        const QUERY_STATE = nt::SEMAPHORE_QUERY_STATE;
        const MODIFY_STATE = nt::SEMAPHORE_MODIFY_STATE;
    }
}

object_kind!(
    /// Semaphore kind marker
    SemaphoreKind,
    ObjectType::Semaphore,
    SemaphoreAccessRights,
    nt::NtOpenSemaphore
);

impl WaitableKind for SemaphoreKind {}

pub type Semaphore = NtObject<SemaphoreKind>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemaphoreInformation {
    pub current_count: i32,
    pub maximum_count: i32,
}

impl NtObject<SemaphoreKind> {
    pub fn create(
        attributes: &ObjectAttributes<'_>,
        rights: SemaphoreAccessRights,
        initial_count: i32,
        maximum_count: i32,
        throw_on_error: bool,
    ) -> Result<NtResult<Self>> {
        Self::create_with(attributes, rights, throw_on_error, |out, access, raw| {
            nt::NtCreateSemaphore(out, access, Some(raw), initial_count, maximum_count)
        })
    }

    /// Add `count` to the semaphore, returning the previous count
    pub fn release(&self, count: i32, throw_on_error: bool) -> Result<NtResult<i32>> {
        let raw = self.raw()?;
        let mut previous = 0;
        let status = nt::NtReleaseSemaphore(raw, count, Some(&mut previous));
        complete(status, throw_on_error, || previous)
    }

    pub fn query(&self, throw_on_error: bool) -> Result<NtResult<SemaphoreInformation>> {
        let raw = self.raw()?;
        let mut info = SEMAPHORE_BASIC_INFORMATION::default();
        let status = nt::NtQuerySemaphore(raw, &mut info);
        complete(status, throw_on_error, || SemaphoreInformation {
            current_count: info.CurrentCount,
            maximum_count: info.MaximumCount,
        })
    }
}
