//! Typed kernel objects
//!
//! [`NtObject<K>`] pairs a [`KernelHandle`] with a kind marker. The
//! operations every kind shares (open, duplicate, close, access queries)
//! live here; kind-specific operations are inherent methods on the
//! concrete aliases in [`crate::kinds`].

use core::fmt;
use core::marker::PhantomData;

use nt_platform::adapter as nt;
use nt_platform::types::{ObjectType, ACCESS_MASK, HANDLE, NTSTATUS, OBJECT_ATTRIBUTES};

use crate::access::{AccessMask, RightsTranslator};
use crate::attributes::{AttributeUse, ObjectAttributes};
use crate::handle::KernelHandle;
use crate::result::NtResult;
use crate::{NtError, Result};

/// Open service shared by every kind
pub type OpenFn = fn(&mut HANDLE, ACCESS_MASK, &OBJECT_ATTRIBUTES<'_>) -> NTSTATUS;

/// Static description of a kernel object kind
pub trait ObjectKind: RightsTranslator + 'static {
    const TYPE: ObjectType;

    /// Typed rights set for the kind
    type Rights: Copy + fmt::Debug + Into<AccessMask> + From<AccessMask>;

    const OPEN: OpenFn;
}

/// Kinds whose handles may be passed to the wait services
pub trait WaitableKind: ObjectKind {}

/// Owned handle to a kernel object of kind `K`
pub struct NtObject<K: ObjectKind> {
    handle: KernelHandle,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ObjectKind> NtObject<K> {
    pub(crate) fn from_handle(handle: KernelHandle) -> Self {
        Self {
            handle,
            _kind: PhantomData,
        }
    }

    /// Adopt an untyped handle after checking the object's type
    pub fn try_from_handle(handle: KernelHandle) -> Result<Self> {
        let ty = handle.object_type(true)?.into_result()?;
        if ty != K::TYPE {
            log::debug!("expected {} object, handle names a {}", K::TYPE.name(), ty.name());
            return Err(NtError::Os { status: nt::STATUS_OBJECT_TYPE_MISMATCH });
        }
        Ok(Self::from_handle(handle))
    }

    /// Translate the requested rights through the kind's mapping
    pub(crate) fn desired_access(rights: K::Rights) -> ACCESS_MASK {
        K::translate(rights.into()).bits()
    }

    /// Shared create path: validate the attributes, then run `call`
    pub(crate) fn create_with(
        attributes: &ObjectAttributes<'_>,
        rights: K::Rights,
        throw_on_error: bool,
        call: impl FnOnce(&mut HANDLE, ACCESS_MASK, &OBJECT_ATTRIBUTES<'_>) -> NTSTATUS,
    ) -> Result<NtResult<Self>> {
        let raw = attributes.to_raw(AttributeUse::Create)?;
        let desired = Self::desired_access(rights);
        log::debug!("creating {} {:?} (access {:#x})", K::TYPE.name(), attributes.name(), desired);
        KernelHandle::acquire(
            throw_on_error,
            |out| call(out, desired, &raw),
            |handle| Ok(Self::from_handle(handle)),
        )
    }

    /// Open an existing named object
    pub fn open(attributes: &ObjectAttributes<'_>, rights: K::Rights, throw_on_error: bool) -> Result<NtResult<Self>> {
        let raw = attributes.to_raw(AttributeUse::Open)?;
        let desired = Self::desired_access(rights);
        log::debug!("opening {} {:?} (access {:#x})", K::TYPE.name(), attributes.name(), desired);
        KernelHandle::acquire(
            throw_on_error,
            |out| (K::OPEN)(out, desired, &raw),
            |handle| Ok(Self::from_handle(handle)),
        )
    }

    /// Second handle onto the same object; `None` keeps this handle's access
    pub fn duplicate(&self, rights: Option<K::Rights>, throw_on_error: bool) -> Result<NtResult<Self>> {
        let access = rights.map(|rights| K::translate(rights.into()));
        Ok(self.handle.duplicate(access, throw_on_error)?.map(Self::from_handle))
    }

    /// Close the handle; idempotent
    pub fn close(&mut self) -> Result<()> {
        self.handle.close()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    pub fn granted_access(&self, throw_on_error: bool) -> Result<NtResult<K::Rights>> {
        Ok(self.handle.granted_access(throw_on_error)?.cast())
    }

    #[inline]
    pub fn handle(&self) -> &KernelHandle {
        &self.handle
    }

    pub fn into_handle(self) -> KernelHandle {
        self.handle
    }

    /// Checked raw handle for a kind-specific system call
    #[inline]
    pub(crate) fn raw(&self) -> Result<HANDLE> {
        self.handle.raw()
    }
}

impl<K: ObjectKind> AsRef<KernelHandle> for NtObject<K> {
    fn as_ref(&self) -> &KernelHandle {
        &self.handle
    }
}

impl<K: ObjectKind> From<NtObject<K>> for KernelHandle {
    fn from(object: NtObject<K>) -> Self {
        object.into_handle()
    }
}

impl<K: ObjectKind> fmt::Debug for NtObject<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(K::TYPE.name()).field("handle", &self.handle).finish()
    }
}
