//! Raw NT types shared by every backend
//!
//! These mirror the native ABI names so call sites read like the kernel
//! interface they stand for. Higher layers wrap them in typed values.

#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use static_assertions::const_assert_eq;

pub type HANDLE = usize;
pub type NTSTATUS = i32;
pub type ACCESS_MASK = u32;
pub type ULONG = u32;
pub type LONG = i32;
/// Relative (negative) or absolute (positive) time in 100ns ticks
pub type LARGE_INTEGER = i64;

/// Null handle value; never names an object
pub const NULL_HANDLE: HANDLE = 0;

// Object attribute flags
pub const OBJ_INHERIT: ULONG = 0x0000_0002;
pub const OBJ_PERMANENT: ULONG = 0x0000_0010;
pub const OBJ_EXCLUSIVE: ULONG = 0x0000_0020;
pub const OBJ_CASE_INSENSITIVE: ULONG = 0x0000_0040;
pub const OBJ_OPENIF: ULONG = 0x0000_0080;
pub const OBJ_OPENLINK: ULONG = 0x0000_0100;
pub const OBJ_VALID_ATTRIBUTES: ULONG = 0x0000_01F2;

// Duplication options
pub const DUPLICATE_CLOSE_SOURCE: ULONG = 0x0000_0001;
pub const DUPLICATE_SAME_ACCESS: ULONG = 0x0000_0002;

// Standard and generic access bits as the kernel sees them
pub const DELETE: ACCESS_MASK = 0x0001_0000;
pub const READ_CONTROL: ACCESS_MASK = 0x0002_0000;
pub const WRITE_DAC: ACCESS_MASK = 0x0004_0000;
pub const WRITE_OWNER: ACCESS_MASK = 0x0008_0000;
pub const SYNCHRONIZE: ACCESS_MASK = 0x0010_0000;
pub const STANDARD_RIGHTS_REQUIRED: ACCESS_MASK = 0x000F_0000;
pub const ACCESS_SYSTEM_SECURITY: ACCESS_MASK = 0x0100_0000;
pub const MAXIMUM_ALLOWED: ACCESS_MASK = 0x0200_0000;
pub const GENERIC_ALL: ACCESS_MASK = 0x1000_0000;
pub const GENERIC_EXECUTE: ACCESS_MASK = 0x2000_0000;
pub const GENERIC_WRITE: ACCESS_MASK = 0x4000_0000;
pub const GENERIC_READ: ACCESS_MASK = 0x8000_0000;

// Type-specific access bits the kernel checks
pub const DIRECTORY_QUERY: ACCESS_MASK = 0x0001;
pub const DIRECTORY_TRAVERSE: ACCESS_MASK = 0x0002;
pub const DIRECTORY_CREATE_OBJECT: ACCESS_MASK = 0x0004;
pub const DIRECTORY_CREATE_SUBDIRECTORY: ACCESS_MASK = 0x0008;
pub const EVENT_QUERY_STATE: ACCESS_MASK = 0x0001;
pub const EVENT_MODIFY_STATE: ACCESS_MASK = 0x0002;
pub const MUTANT_QUERY_STATE: ACCESS_MASK = 0x0001;
pub const SEMAPHORE_QUERY_STATE: ACCESS_MASK = 0x0001;
pub const SEMAPHORE_MODIFY_STATE: ACCESS_MASK = 0x0002;
pub const PARTITION_QUERY: ACCESS_MASK = 0x0001;
pub const PARTITION_MODIFY: ACCESS_MASK = 0x0002;

const_assert_eq!(STANDARD_RIGHTS_REQUIRED, DELETE | READ_CONTROL | WRITE_DAC | WRITE_OWNER);

/// Upper bound on handles accepted by `NtWaitForMultipleObjects`
pub const MAXIMUM_WAIT_OBJECTS: usize = 64;

/// Object attributes passed to every create/open call
///
/// `ObjectName` is either absolute (`\BaseNamedObjects\Foo`) or, when
/// `RootDirectory` is set, relative to that directory.
#[derive(Debug, Clone, Copy)]
pub struct OBJECT_ATTRIBUTES<'a> {
    pub RootDirectory: HANDLE,
    pub ObjectName: Option<&'a str>,
    pub Attributes: ULONG,
    pub SecurityDescriptor: Option<&'a [u8]>,
}

impl<'a> OBJECT_ATTRIBUTES<'a> {
    pub const fn empty() -> Self {
        Self {
            RootDirectory: NULL_HANDLE,
            ObjectName: None,
            Attributes: 0,
            SecurityDescriptor: None,
        }
    }
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EVENT_TYPE {
    /// Stays signalled until reset; releases every waiter
    NotificationEvent = 0,
    /// Auto-resets after releasing a single waiter
    SynchronizationEvent = 1,
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WAIT_TYPE {
    WaitAll = 0,
    WaitAny = 1,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OBJECT_BASIC_INFORMATION {
    pub Attributes: ULONG,
    pub GrantedAccess: ACCESS_MASK,
    pub HandleCount: ULONG,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EVENT_BASIC_INFORMATION {
    pub EventType: EVENT_TYPE,
    pub EventState: LONG,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MUTANT_BASIC_INFORMATION {
    pub CurrentCount: LONG,
    pub OwnedByCaller: bool,
    pub AbandonedState: bool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SEMAPHORE_BASIC_INFORMATION {
    pub CurrentCount: LONG,
    pub MaximumCount: LONG,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PARTITION_BASIC_INFORMATION {
    /// Preferred NUMA node, `-1` for any
    pub PreferredNode: LONG,
    pub HasParent: bool,
}

/// Per-type expansion of the four generic rights
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GENERIC_MAPPING {
    pub GenericRead: ACCESS_MASK,
    pub GenericWrite: ACCESS_MASK,
    pub GenericExecute: ACCESS_MASK,
    pub GenericAll: ACCESS_MASK,
}

/// Kernel object types known to the object manager
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Directory = 1,
    Event = 2,
    Mutant = 3,
    Semaphore = 4,
    Partition = 5,
}

impl ObjectType {
    /// Type name as reported by the object manager
    pub const fn name(self) -> &'static str {
        match self {
            ObjectType::Directory => "Directory",
            ObjectType::Event => "Event",
            ObjectType::Mutant => "Mutant",
            ObjectType::Semaphore => "Semaphore",
            ObjectType::Partition => "Partition",
        }
    }

    /// Whether handles of this type can be passed to the wait services
    pub const fn is_waitable(self) -> bool {
        matches!(self, ObjectType::Event | ObjectType::Mutant | ObjectType::Semaphore)
    }

    /// Every access bit the type recognises (its `GenericAll` expansion)
    pub const fn valid_access(self) -> ACCESS_MASK {
        let specific = match self {
            ObjectType::Directory => 0x000F,
            ObjectType::Event => 0x0003,
            ObjectType::Mutant => 0x0001,
            ObjectType::Semaphore => 0x0003,
            ObjectType::Partition => 0x0003,
        };
        STANDARD_RIGHTS_REQUIRED | SYNCHRONIZE | specific
    }

    /// Generic mapping the object manager applies for this type
    pub const fn generic_mapping(self) -> GENERIC_MAPPING {
        let (read, write, execute) = match self {
            ObjectType::Directory => (0x0003, 0x000C, 0x0003),
            ObjectType::Mutant => (0x0001, 0x0000, SYNCHRONIZE),
            ObjectType::Event | ObjectType::Semaphore | ObjectType::Partition => {
                (0x0001, 0x0002, SYNCHRONIZE)
            }
        };
        GENERIC_MAPPING {
            GenericRead: READ_CONTROL | read,
            GenericWrite: READ_CONTROL | write,
            GenericExecute: READ_CONTROL | execute,
            GenericAll: self.valid_access(),
        }
    }
}

/// Expand generic bits in `access` through `mapping`; other bits pass through
pub const fn map_generic(access: ACCESS_MASK, mapping: &GENERIC_MAPPING) -> ACCESS_MASK {
    let mut mapped = access & !(GENERIC_READ | GENERIC_WRITE | GENERIC_EXECUTE | GENERIC_ALL);
    if access & GENERIC_READ != 0 {
        mapped |= mapping.GenericRead;
    }
    if access & GENERIC_WRITE != 0 {
        mapped |= mapping.GenericWrite;
    }
    if access & GENERIC_EXECUTE != 0 {
        mapped |= mapping.GenericExecute;
    }
    if access & GENERIC_ALL != 0 {
        mapped |= mapping.GenericAll;
    }
    mapped
}
