//! Owned kernel handles
//!
//! A [`KernelHandle`] owns exactly one raw handle until it is closed. Raw
//! handles returned by a create/open/duplicate call are adopted before
//! the call's status is inspected, so every error path releases them.

use nt_platform::adapter as nt;
use nt_platform::types::{
    ObjectType, ACCESS_MASK, DUPLICATE_SAME_ACCESS, HANDLE, NTSTATUS, NULL_HANDLE,
    OBJECT_BASIC_INFORMATION,
};

use crate::access::AccessMask;
use crate::result::NtResult;
use crate::status::NtStatus;
use crate::{NtError, Result};

/// Exclusive owner of one raw kernel handle
#[derive(Debug)]
pub struct KernelHandle {
    raw: Option<HANDLE>,
}

impl KernelHandle {
    /// Take ownership of whatever a kernel call wrote to its out handle
    pub(crate) fn adopt(raw: HANDLE) -> Self {
        Self {
            raw: (raw != NULL_HANDLE).then_some(raw),
        }
    }

    /// Take ownership of a raw handle.
    ///
    /// # Safety
    /// `raw` must be an open handle that nothing else will close.
    pub unsafe fn from_raw(raw: HANDLE) -> Self {
        Self::adopt(raw)
    }

    /// Run a handle-producing system call and wrap its result.
    ///
    /// `call` receives the out handle; `wrap` turns the adopted handle into
    /// the caller's type and only runs on success.
    pub(crate) fn acquire<T>(
        throw_on_error: bool,
        call: impl FnOnce(&mut HANDLE) -> NTSTATUS,
        wrap: impl FnOnce(KernelHandle) -> Result<T>,
    ) -> Result<NtResult<T>> {
        let mut raw = NULL_HANDLE;
        let status = NtStatus::new(call(&mut raw));
        let guard = Self::adopt(raw);
        status.create_result(throw_on_error, move || {
            if guard.is_closed() {
                return Err(NtError::Os { status: nt::STATUS_INVALID_HANDLE });
            }
            log::trace!("handle {:#x} acquired ({})", raw, status);
            wrap(guard)
        })
    }

    /// Raw handle value, or [`NtError::HandleClosed`]
    #[inline]
    pub fn raw(&self) -> Result<HANDLE> {
        self.raw.ok_or(NtError::HandleClosed)
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.raw.is_none()
    }

    /// Close the handle. Closing an already closed handle does nothing.
    ///
    /// The handle is terminal afterwards even if the kernel rejects the
    /// close.
    pub fn close(&mut self) -> Result<()> {
        match self.raw.take() {
            Some(raw) => {
                log::debug!("closing handle {:#x}", raw);
                NtStatus::new(nt::NtClose(raw)).check().map(|_| ())
            }
            None => Ok(()),
        }
    }

    /// Give up ownership without closing
    pub fn into_raw(mut self) -> Result<HANDLE> {
        self.raw.take().ok_or(NtError::HandleClosed)
    }

    /// Open a second handle onto the same object.
    ///
    /// `None` keeps the source handle's access; otherwise the request may
    /// not exceed it.
    pub fn duplicate(&self, access: Option<AccessMask>, throw_on_error: bool) -> Result<NtResult<KernelHandle>> {
        let source = self.raw()?;
        let (desired, options): (ACCESS_MASK, _) = match access {
            Some(access) => (access.bits(), 0),
            None => (0, DUPLICATE_SAME_ACCESS),
        };
        log::debug!("duplicating handle {:#x} (access {:?})", source, access);
        Self::acquire(
            throw_on_error,
            |out| nt::NtDuplicateObject(source, out, desired, 0, options),
            Ok,
        )
    }

    fn basic_information(&self, throw_on_error: bool) -> Result<NtResult<OBJECT_BASIC_INFORMATION>> {
        let raw = self.raw()?;
        let mut info = OBJECT_BASIC_INFORMATION::default();
        NtStatus::new(nt::NtQueryObjectBasic(raw, &mut info)).create_result(throw_on_error, || Ok(info))
    }

    /// Access the kernel actually granted to this handle
    pub fn granted_access(&self, throw_on_error: bool) -> Result<NtResult<AccessMask>> {
        let info = self.basic_information(throw_on_error)?;
        Ok(info.map(|info| AccessMask::from_raw(info.GrantedAccess)))
    }

    /// Number of open handles onto the underlying object
    pub fn handle_count(&self, throw_on_error: bool) -> Result<NtResult<u32>> {
        Ok(self.basic_information(throw_on_error)?.map(|info| info.HandleCount))
    }

    pub fn object_type(&self, throw_on_error: bool) -> Result<NtResult<ObjectType>> {
        let raw = self.raw()?;
        let mut ty = None;
        let status = NtStatus::new(nt::NtQueryObjectType(raw, &mut ty));
        status.create_result(throw_on_error, || {
            ty.ok_or(NtError::Os { status: nt::STATUS_OBJECT_TYPE_MISMATCH })
        })
    }
}

impl AsRef<KernelHandle> for KernelHandle {
    fn as_ref(&self) -> &KernelHandle {
        self
    }
}

impl Drop for KernelHandle {
    fn drop(&mut self) {
        if let Some(raw) = self.raw.take() {
            let status = nt::NtClose(raw);
            if !nt::is_ok(status) {
                log::warn!("failed to close handle {:#x}: {}", raw, NtStatus::new(status));
            }
        }
    }
}
