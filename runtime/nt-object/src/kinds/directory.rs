//! Object directories

use nt_platform::adapter as nt;
use nt_platform::types::ObjectType;

use crate::access::kind_rights;
use crate::attributes::ObjectAttributes;
use crate::object::NtObject;
use crate::result::NtResult;
use crate::Result;

use super::object_kind;

kind_rights! {
    /// Directory access rights
    pub struct DirectoryAccessRights {
        const QUERY = nt::DIRECTORY_QUERY;
        const TRAVERSE = nt::DIRECTORY_TRAVERSE;
        const CREATE_OBJECT = nt::DIRECTORY_CREATE_OBJECT;
        const CREATE_SUBDIRECTORY = nt::DIRECTORY_CREATE_SUBDIRECTORY;
    }
}

object_kind!(
    /// Directory kind marker
    DirectoryKind,
    ObjectType::Directory,
    DirectoryAccessRights,
    nt::NtOpenDirectoryObject
);

pub type Directory = NtObject<DirectoryKind>;

impl NtObject<DirectoryKind> {
    pub fn create(
        attributes: &ObjectAttributes<'_>,
        rights: DirectoryAccessRights,
        throw_on_error: bool,
    ) -> Result<NtResult<Self>> {
        Self::create_with(attributes, rights, throw_on_error, |out, access, raw| {
            nt::NtCreateDirectoryObject(out, access, Some(raw))
        })
    }
}
