//! Concrete object kinds
//!
//! Each kind is an uninhabited marker type implementing
//! [`ObjectKind`](crate::object::ObjectKind). Its generic mapping comes from
//! the platform's type table, so the translation the core performs and the
//! one the kernel applies cannot drift apart.

mod directory;
mod event;
mod mutant;
mod partition;
mod semaphore;

pub use directory::{Directory, DirectoryAccessRights, DirectoryKind};
pub use event::{Event, EventAccessRights, EventInformation, EventKind, EventType};
pub use mutant::{Mutant, MutantAccessRights, MutantInformation, MutantKind};
pub use partition::{Partition, PartitionAccessRights, PartitionInformation, PartitionKind};
pub use semaphore::{Semaphore, SemaphoreAccessRights, SemaphoreInformation, SemaphoreKind};

use nt_platform::types::NTSTATUS;

use crate::result::NtResult;
use crate::status::NtStatus;
use crate::Result;

/// Register a marker type as an object kind
macro_rules! object_kind {
    ($(#[$meta:meta])* $marker:ident, $ty:expr, $rights:ty, $open:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $marker {}

        impl $crate::access::RightsTranslator for $marker {
            const GENERIC_MAPPING: $crate::access::GenericMapping =
                $crate::access::GenericMapping::from_raw($ty.generic_mapping());
        }

        impl $crate::object::ObjectKind for $marker {
            const TYPE: ::nt_platform::types::ObjectType = $ty;
            type Rights = $rights;
            const OPEN: $crate::object::OpenFn = $open;
        }
    };
}

pub(crate) use object_kind;

/// Finish a kind-specific call whose value was written to out-parameters
pub(crate) fn complete<T>(status: NTSTATUS, throw_on_error: bool, value: impl FnOnce() -> T) -> Result<NtResult<T>> {
    NtStatus::new(status).create_result(throw_on_error, || Ok(value()))
}
