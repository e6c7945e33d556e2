//! Object attributes for create and open
//!
//! Attributes are validated before any kernel call:
//! - a name, if present, is non-empty with no empty path component
//! - without a root directory the name is absolute (`\Dir\Name`)
//! - with a root directory the name is relative (`Name` or `Sub\Name`)
//! - open requires a name; create without one makes an anonymous object
//! - a root directory without a name is malformed

use bitflags::bitflags;
use nt_platform::types::{self as raw, HANDLE, NULL_HANDLE, OBJECT_ATTRIBUTES};

use crate::handle::KernelHandle;
use crate::{NtError, Result};

bitflags! {
    /// Object attribute flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AttributeFlags: u32 {
        const INHERIT = raw::OBJ_INHERIT;
        /// Keep the name alive after the last handle closes
        const PERMANENT = raw::OBJ_PERMANENT;
        const EXCLUSIVE = raw::OBJ_EXCLUSIVE;
        const CASE_INSENSITIVE = raw::OBJ_CASE_INSENSITIVE;
        /// Open the existing object on a name collision
        const OPEN_IF = raw::OBJ_OPENIF;
        const OPEN_LINK = raw::OBJ_OPENLINK;
    }
}

/// Which call the attributes are for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttributeUse {
    Create,
    Open,
}

/// Caller-supplied object attributes, borrowed for the duration of a call
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectAttributes<'a> {
    name: Option<&'a str>,
    root: Option<&'a KernelHandle>,
    flags: AttributeFlags,
    security_descriptor: Option<&'a [u8]>,
}

impl<'a> ObjectAttributes<'a> {
    /// Anonymous object, no flags
    pub const fn new() -> Self {
        Self {
            name: None,
            root: None,
            flags: AttributeFlags::empty(),
            security_descriptor: None,
        }
    }

    /// Absolute name such as `\BaseNamedObjects\Thing`
    pub const fn named(name: &'a str) -> Self {
        Self::new().with_name(name)
    }

    /// Name relative to an open directory
    pub fn relative(root: &'a impl AsRef<KernelHandle>, name: &'a str) -> Self {
        Self::new().with_name(name).with_root(root)
    }

    pub const fn with_name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_root(mut self, root: &'a impl AsRef<KernelHandle>) -> Self {
        self.root = Some(root.as_ref());
        self
    }

    pub const fn with_flags(mut self, flags: AttributeFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }

    /// Opaque self-relative security descriptor passed through to the kernel
    pub const fn with_security_descriptor(mut self, descriptor: &'a [u8]) -> Self {
        self.security_descriptor = Some(descriptor);
        self
    }

    pub fn name(&self) -> Option<&'a str> {
        self.name
    }

    pub fn flags(&self) -> AttributeFlags {
        self.flags
    }

    pub(crate) fn validate(&self, usage: AttributeUse) -> Result<()> {
        let name = match (self.name, self.root) {
            (None, None) if usage == AttributeUse::Open => {
                return Err(NtError::InvalidArgument("open requires an object name"))
            }
            (None, None) => return Ok(()),
            (None, Some(_)) => {
                return Err(NtError::InvalidArgument("root directory given without an object name"))
            }
            (Some(name), _) => name,
        };

        if name.is_empty() {
            return Err(NtError::InvalidArgument("object name is empty"));
        }

        let components = if self.root.is_some() {
            if name.starts_with('\\') {
                return Err(NtError::InvalidArgument("relative object name must not start with '\\'"));
            }
            name
        } else {
            match name.strip_prefix('\\') {
                // The namespace root itself
                Some("") => return Ok(()),
                Some(rest) => rest,
                None => {
                    return Err(NtError::InvalidArgument(
                        "object name must be absolute without a root directory",
                    ))
                }
            }
        };

        if components.split('\\').any(str::is_empty) {
            return Err(NtError::InvalidArgument("object name has an empty path component"));
        }
        Ok(())
    }

    /// Validate and lower to the raw kernel structure
    pub(crate) fn to_raw(&self, usage: AttributeUse) -> Result<OBJECT_ATTRIBUTES<'a>> {
        self.validate(usage)?;
        let root: HANDLE = match self.root {
            Some(root) => root.raw()?,
            None => NULL_HANDLE,
        };
        Ok(OBJECT_ATTRIBUTES {
            RootDirectory: root,
            ObjectName: self.name,
            Attributes: self.flags.bits(),
            SecurityDescriptor: self.security_descriptor,
        })
    }
}
