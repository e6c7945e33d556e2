//! Mutant (mutex) objects
//!
//! A mutant is owned by the thread whose wait acquired it and may be
//! acquired recursively by that thread. If the owner exits without
//! releasing, the next wait to acquire it completes as abandoned.

use nt_platform::adapter as nt;
use nt_platform::types::{ObjectType, MUTANT_BASIC_INFORMATION};

use crate::access::kind_rights;
use crate::attributes::ObjectAttributes;
use crate::object::{NtObject, WaitableKind};
use crate::result::NtResult;
use crate::Result;

use super::{complete, object_kind};

kind_rights! {
    /// Mutant access rights
    pub struct MutantAccessRights {
        const QUERY_STATE = nt::MUTANT_QUERY_STATE;
    }
}

object_kind!(
    /// Mutant kind marker
    MutantKind,
    ObjectType::Mutant,
    MutantAccessRights,
    nt::NtOpenMutant
);

impl WaitableKind for MutantKind {}

pub type Mutant = NtObject<MutantKind>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutantInformation {
    /// `1` when free, `1 - depth` while held
    pub current_count: i32,
    pub owned_by_caller: bool,
    pub abandoned: bool,
}

impl NtObject<MutantKind> {
    /// Create a mutant, optionally owned by the calling thread
    pub fn create(
        attributes: &ObjectAttributes<'_>,
        rights: MutantAccessRights,
        initial_owner: bool,
        throw_on_error: bool,
    ) -> Result<NtResult<Self>> {
        Self::create_with(attributes, rights, throw_on_error, |out, access, raw| {
            nt::NtCreateMutant(out, access, Some(raw), initial_owner)
        })
    }

    /// Release one level of ownership, returning the previous count
    pub fn release(&self, throw_on_error: bool) -> Result<NtResult<i32>> {
        let raw = self.raw()?;
        let mut previous = 0;
        let status = nt::NtReleaseMutant(raw, Some(&mut previous));
        complete(status, throw_on_error, || previous)
    }

    pub fn query(&self, throw_on_error: bool) -> Result<NtResult<MutantInformation>> {
        let raw = self.raw()?;
        let mut info = MUTANT_BASIC_INFORMATION {
            CurrentCount: 0,
            OwnedByCaller: false,
            AbandonedState: false,
        };
        let status = nt::NtQueryMutant(raw, &mut info);
        complete(status, throw_on_error, || MutantInformation {
            current_count: info.CurrentCount,
            owned_by_caller: info.OwnedByCaller,
            abandoned: info.AbandonedState,
        })
    }
}
