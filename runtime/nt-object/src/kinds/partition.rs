//! Memory partition objects
//!
//! Partitions are not waitable; passing one to a wait through an untyped
//! handle fails with `STATUS_OBJECT_TYPE_MISMATCH`.

use nt_platform::adapter as nt;
use nt_platform::types::{ObjectType, NULL_HANDLE, PARTITION_BASIC_INFORMATION};

use crate::access::kind_rights;
use crate::attributes::ObjectAttributes;
use crate::object::NtObject;
use crate::result::NtResult;
use crate::Result;

use super::{complete, object_kind};

kind_rights! {
    /// Partition access rights
    pub struct PartitionAccessRights {
        const QUERY = nt::PARTITION_QUERY;
        const MODIFY = nt::PARTITION_MODIFY;
    }
}

object_kind!(
    /// Partition kind marker
    PartitionKind,
    ObjectType::Partition,
    PartitionAccessRights,
    nt::NtOpenPartition
);

pub type Partition = NtObject<PartitionKind>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionInformation {
    /// `None` when any node is acceptable
    pub preferred_node: Option<u32>,
    pub has_parent: bool,
}

impl NtObject<PartitionKind> {
    /// Create a partition, optionally scoped under `parent`.
    ///
    /// `preferred_node` is a NUMA node index or
    /// [`ANY_NODE`](crate::config::ANY_NODE).
    pub fn create(
        attributes: &ObjectAttributes<'_>,
        rights: PartitionAccessRights,
        parent: Option<&Partition>,
        preferred_node: i32,
        throw_on_error: bool,
    ) -> Result<NtResult<Self>> {
        let parent = match parent {
            Some(parent) => parent.raw()?,
            None => NULL_HANDLE,
        };
        Self::create_with(attributes, rights, throw_on_error, |out, access, raw| {
            nt::NtCreatePartition(parent, out, access, Some(raw), preferred_node)
        })
    }

    pub fn query(&self, throw_on_error: bool) -> Result<NtResult<PartitionInformation>> {
        let raw = self.raw()?;
        let mut info = PARTITION_BASIC_INFORMATION::default();
        let status = nt::NtQueryPartition(raw, &mut info);
        complete(status, throw_on_error, || PartitionInformation {
            preferred_node: u32::try_from(info.PreferredNode).ok(),
            has_parent: info.HasParent,
        })
    }
}
