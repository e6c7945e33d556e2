//! Access rights and generic-to-specific translation
//!
//! An access mask is a 32-bit set. The low 16 bits are specific to the
//! object kind; the high bits hold the standard rights, the
//! `ACCESS_SYSTEM_SECURITY`/`MAXIMUM_ALLOWED` requests and the four generic
//! rights. Every kind registers a [`GenericMapping`] that expands the
//! generic rights into its own specific and standard bits.

use bitflags::bitflags;
use nt_platform::types::{self as raw, ACCESS_MASK, GENERIC_MAPPING};
use static_assertions::const_assert;

bitflags! {
    /// Raw access mask with the kind-independent bits named
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AccessMask: u32 {
        const DELETE = raw::DELETE;
        const READ_CONTROL = raw::READ_CONTROL;
        const WRITE_DAC = raw::WRITE_DAC;
        const WRITE_OWNER = raw::WRITE_OWNER;
        const SYNCHRONIZE = raw::SYNCHRONIZE;
        const ACCESS_SYSTEM_SECURITY = raw::ACCESS_SYSTEM_SECURITY;
        const MAXIMUM_ALLOWED = raw::MAXIMUM_ALLOWED;
        const GENERIC_ALL = raw::GENERIC_ALL;
        const GENERIC_EXECUTE = raw::GENERIC_EXECUTE;
        const GENERIC_WRITE = raw::GENERIC_WRITE;
        const GENERIC_READ = raw::GENERIC_READ;

        // Kind-specific bits keep their positions through every operation
        const _ = !0;
    }
}

impl AccessMask {
    pub const SPECIFIC_RIGHTS_ALL: Self = Self::from_bits_retain(0x0000_FFFF);
    pub const STANDARD_RIGHTS_REQUIRED: Self = Self::from_bits_retain(raw::STANDARD_RIGHTS_REQUIRED);
    pub const STANDARD_RIGHTS_READ: Self = Self::READ_CONTROL;
    pub const STANDARD_RIGHTS_WRITE: Self = Self::READ_CONTROL;
    pub const STANDARD_RIGHTS_EXECUTE: Self = Self::READ_CONTROL;
    pub const STANDARD_RIGHTS_ALL: Self = Self::from_bits_retain(raw::STANDARD_RIGHTS_REQUIRED | raw::SYNCHRONIZE);
    pub const GENERIC_RIGHTS: Self = Self::from_bits_retain(
        raw::GENERIC_READ | raw::GENERIC_WRITE | raw::GENERIC_EXECUTE | raw::GENERIC_ALL,
    );

    /// Wrap a raw mask, keeping every bit
    #[inline]
    pub const fn from_raw(mask: ACCESS_MASK) -> Self {
        Self::from_bits_retain(mask)
    }

    /// Kind-specific part (bits 0-15)
    #[inline]
    pub const fn specific(self) -> Self {
        self.intersection(Self::SPECIFIC_RIGHTS_ALL)
    }

    /// Standard part (delete, read control, DAC, owner, synchronize)
    #[inline]
    pub const fn standard(self) -> Self {
        self.intersection(Self::STANDARD_RIGHTS_ALL)
    }

    /// Generic part (bits 28-31)
    #[inline]
    pub const fn generic(self) -> Self {
        self.intersection(Self::GENERIC_RIGHTS)
    }

    #[inline]
    pub const fn has_generic(self) -> bool {
        self.intersects(Self::GENERIC_RIGHTS)
    }

    /// Expand generic rights through `mapping`.
    ///
    /// Non-generic bits pass through unchanged, including
    /// `MAXIMUM_ALLOWED`. A generic bit with an empty mapping entry is
    /// cleared.
    #[inline]
    pub const fn translate(self, mapping: &GenericMapping) -> Self {
        let raw_mapping = mapping.to_raw();
        Self::from_bits_retain(raw::map_generic(self.bits(), &raw_mapping))
    }
}

impl From<ACCESS_MASK> for AccessMask {
    fn from(mask: ACCESS_MASK) -> Self {
        Self::from_raw(mask)
    }
}

impl From<AccessMask> for ACCESS_MASK {
    fn from(mask: AccessMask) -> Self {
        mask.bits()
    }
}

const_assert!(AccessMask::GENERIC_RIGHTS.bits() > AccessMask::SPECIFIC_RIGHTS_ALL.bits());
const_assert!(!AccessMask::STANDARD_RIGHTS_ALL.intersects(AccessMask::SPECIFIC_RIGHTS_ALL));
const_assert!(!AccessMask::MAXIMUM_ALLOWED.intersects(AccessMask::GENERIC_RIGHTS));

/// Per-kind expansion of the four generic rights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenericMapping {
    pub read: AccessMask,
    pub write: AccessMask,
    pub execute: AccessMask,
    pub all: AccessMask,
}

impl GenericMapping {
    pub const fn from_raw(mapping: GENERIC_MAPPING) -> Self {
        Self {
            read: AccessMask::from_bits_retain(mapping.GenericRead),
            write: AccessMask::from_bits_retain(mapping.GenericWrite),
            execute: AccessMask::from_bits_retain(mapping.GenericExecute),
            all: AccessMask::from_bits_retain(mapping.GenericAll),
        }
    }

    pub const fn to_raw(&self) -> GENERIC_MAPPING {
        GENERIC_MAPPING {
            GenericRead: self.read.bits(),
            GenericWrite: self.write.bits(),
            GenericExecute: self.execute.bits(),
            GenericAll: self.all.bits(),
        }
    }
}

/// Compile-time registration of a kind's generic mapping
pub trait RightsTranslator {
    const GENERIC_MAPPING: GenericMapping;

    /// Translate `access` into this kind's specific rights
    #[inline]
    fn translate(access: AccessMask) -> AccessMask {
        access.translate(&Self::GENERIC_MAPPING)
    }
}

/// Declare a kind's typed rights set.
///
/// The set carries the kind's specific bits plus the standard and generic
/// bits shared by every kind, and converts losslessly to and from
/// [`AccessMask`].
macro_rules! kind_rights {
    (
        $(#[$outer:meta])*
        pub struct $name:ident {
            $(
                $(#[$inner:meta])*
                const $flag:ident = $value:expr;
            )*
        }
    ) => {
        ::bitflags::bitflags! {
            $(#[$outer])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
            pub struct $name: u32 {
                $(
                    $(#[$inner])*
                    const $flag = $value;
                )*

                const DELETE = ::nt_platform::types::DELETE;
                const READ_CONTROL = ::nt_platform::types::READ_CONTROL;
                const WRITE_DAC = ::nt_platform::types::WRITE_DAC;
                const WRITE_OWNER = ::nt_platform::types::WRITE_OWNER;
                const SYNCHRONIZE = ::nt_platform::types::SYNCHRONIZE;
                const ACCESS_SYSTEM_SECURITY = ::nt_platform::types::ACCESS_SYSTEM_SECURITY;
                const MAXIMUM_ALLOWED = ::nt_platform::types::MAXIMUM_ALLOWED;
                const GENERIC_ALL = ::nt_platform::types::GENERIC_ALL;
                const GENERIC_EXECUTE = ::nt_platform::types::GENERIC_EXECUTE;
                const GENERIC_WRITE = ::nt_platform::types::GENERIC_WRITE;
                const GENERIC_READ = ::nt_platform::types::GENERIC_READ;
            }
        }

        impl From<$name> for $crate::access::AccessMask {
            fn from(rights: $name) -> Self {
                $crate::access::AccessMask::from_bits_retain(rights.bits())
            }
        }

        impl From<$crate::access::AccessMask> for $name {
            fn from(mask: $crate::access::AccessMask) -> Self {
                $name::from_bits_retain(mask.bits())
            }
        }
    };
}

pub(crate) use kind_rights;
