//! # NT Platform Abstraction Layer
//!
//! This crate is the OS boundary for the typed object layer. It provides
//! the raw NT types, the status code space and the `Nt*` system call
//! surface, with the backend chosen at compile time:
//! - **Mock Mode**: in-process object manager for tests and development (default)
//!
//! ## Usage
//!
//! ```rust
//! use nt_platform::adapter as nt;
//!
//! let mut handle = nt::NULL_HANDLE;
//! let status = nt::NtCreateEvent(
//!     &mut handle,
//!     nt::MAXIMUM_ALLOWED,
//!     None,
//!     nt::EVENT_TYPE::NotificationEvent,
//!     false,
//! );
//! if nt::is_ok(status) {
//!     nt::NtClose(handle);
//! }
//! ```
//!
//! ## Build Modes
//!
//! ```bash
//! # Mock (default)
//! cargo build
//! ```

#![cfg_attr(not(feature = "mock"), no_std)]

/// Raw NT types and access bits
pub mod types;

/// NTSTATUS constants, severity and message lookup
pub mod status;

/// Unified adapter - provides consistent API across all backends
///
/// This is the main module higher layers should use.
pub mod adapter;

/// Low-level system calls (for advanced use)
pub mod syscalls;

#[cfg(feature = "mock")]
pub mod mock;

/// Platform configuration and detection
pub mod config {
    /// Detect which backend is active at compile time
    pub fn platform_mode() -> &'static str {
        #[cfg(feature = "mock")]
        return "mock";

        #[cfg(not(feature = "mock"))]
        compile_error!("No NT platform backend selected. Enable the 'mock' feature.");
    }

    /// Check if we're in mock mode (testing)
    pub const fn is_mock() -> bool {
        cfg!(feature = "mock")
    }

    /// Number of NUMA nodes the backend reports
    pub fn node_count() -> i32 {
        #[cfg(feature = "mock")]
        return crate::mock::MOCK_NODE_COUNT;
    }
}

// Re-export adapter as the primary interface
pub use adapter as nt;

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_platform_detection() {
        assert_eq!(config::platform_mode(), "mock");
        assert!(config::node_count() > 0);
    }

    #[test]
    #[cfg(feature = "mock")]
    fn test_mock_mode() {
        assert!(config::is_mock());
    }

    #[test]
    fn test_adapter_api() {
        use nt::*;

        assert!(is_ok(STATUS_SUCCESS));
        assert!(is_ok(STATUS_TIMEOUT));
        assert!(is_ok(STATUS_OBJECT_NAME_EXISTS));
        assert!(is_err(STATUS_NO_MORE_ENTRIES));
        assert!(is_err(STATUS_ACCESS_DENIED));
    }

    #[test]
    fn test_event_roundtrip_through_syscalls() {
        use nt::*;
        init_logging();

        let mut handle = NULL_HANDLE;
        let attrs = OBJECT_ATTRIBUTES {
            ObjectName: Some("\\BaseNamedObjects\\platform-event"),
            ..OBJECT_ATTRIBUTES::empty()
        };
        let status = NtCreateEvent(
            &mut handle,
            MAXIMUM_ALLOWED,
            Some(&attrs),
            EVENT_TYPE::NotificationEvent,
            false,
        );
        assert_eq!(status, STATUS_SUCCESS);

        assert_eq!(NtWaitForSingleObject(handle, false, Some(0)), STATUS_TIMEOUT);
        let mut previous = -1;
        assert_eq!(NtSetEvent(handle, Some(&mut previous)), STATUS_SUCCESS);
        assert_eq!(previous, 0);
        assert_eq!(NtWaitForSingleObject(handle, false, Some(0)), STATUS_WAIT_0);

        assert_eq!(NtClose(handle), STATUS_SUCCESS);
        assert_eq!(NtClose(handle), STATUS_INVALID_HANDLE);

        let mut reopened = NULL_HANDLE;
        assert_eq!(NtOpenEvent(&mut reopened, SYNCHRONIZE, &attrs), STATUS_OBJECT_NAME_NOT_FOUND);
    }

    #[test]
    fn test_semaphore_limits() {
        use nt::*;
        init_logging();

        let mut handle = NULL_HANDLE;
        assert_eq!(NtCreateSemaphore(&mut handle, GENERIC_ALL, None, 2, 1), STATUS_INVALID_PARAMETER);
        assert_eq!(NtCreateSemaphore(&mut handle, GENERIC_ALL, None, 0, 2), STATUS_SUCCESS);

        let mut previous = -1;
        assert_eq!(NtReleaseSemaphore(handle, 2, Some(&mut previous)), STATUS_SUCCESS);
        assert_eq!(previous, 0);
        assert_eq!(NtReleaseSemaphore(handle, 1, None), STATUS_SEMAPHORE_LIMIT_EXCEEDED);

        let mut info = SEMAPHORE_BASIC_INFORMATION::default();
        assert_eq!(NtQuerySemaphore(handle, &mut info), STATUS_SUCCESS);
        assert_eq!(info, SEMAPHORE_BASIC_INFORMATION { CurrentCount: 2, MaximumCount: 2 });
        assert_eq!(NtClose(handle), STATUS_SUCCESS);
    }

    #[test]
    fn test_mutant_release_requires_owner() {
        use nt::*;
        init_logging();

        let mut handle = NULL_HANDLE;
        assert_eq!(NtCreateMutant(&mut handle, GENERIC_ALL, None, false), STATUS_SUCCESS);
        assert_eq!(NtReleaseMutant(handle, None), STATUS_MUTANT_NOT_OWNED);
        assert_eq!(NtWaitForSingleObject(handle, false, Some(0)), STATUS_WAIT_0);

        let mut previous = 0;
        assert_eq!(NtReleaseMutant(handle, Some(&mut previous)), STATUS_SUCCESS);
        assert_eq!(previous, 0);
        assert_eq!(NtClose(handle), STATUS_SUCCESS);
    }

    #[test]
    fn test_named_child_keeps_directory_alive() {
        use nt::*;
        init_logging();

        let dir_attrs = OBJECT_ATTRIBUTES {
            ObjectName: Some("\\BaseNamedObjects\\platform-dir"),
            ..OBJECT_ATTRIBUTES::empty()
        };
        let mut dir = NULL_HANDLE;
        assert_eq!(NtCreateDirectoryObject(&mut dir, MAXIMUM_ALLOWED, Some(&dir_attrs)), STATUS_SUCCESS);

        let child_attrs = OBJECT_ATTRIBUTES {
            RootDirectory: dir,
            ObjectName: Some("Child"),
            ..OBJECT_ATTRIBUTES::empty()
        };
        let mut child = NULL_HANDLE;
        assert_eq!(
            NtCreateEvent(&mut child, MAXIMUM_ALLOWED, Some(&child_attrs), EVENT_TYPE::NotificationEvent, false),
            STATUS_SUCCESS
        );
        assert_eq!(NtClose(dir), STATUS_SUCCESS);

        // The directory survives its last handle while the child is named in it
        let mut reopened = NULL_HANDLE;
        assert_eq!(NtOpenDirectoryObject(&mut reopened, MAXIMUM_ALLOWED, &dir_attrs), STATUS_SUCCESS);
        assert_eq!(NtClose(reopened), STATUS_SUCCESS);
        let mut squatter = NULL_HANDLE;
        assert_eq!(
            NtCreateEvent(&mut squatter, MAXIMUM_ALLOWED, Some(&dir_attrs), EVENT_TYPE::NotificationEvent, false),
            STATUS_OBJECT_NAME_COLLISION
        );

        // Deleting the child releases the directory, and its names go with it
        assert_eq!(NtClose(child), STATUS_SUCCESS);
        assert_eq!(NtOpenDirectoryObject(&mut reopened, MAXIMUM_ALLOWED, &dir_attrs), STATUS_OBJECT_NAME_NOT_FOUND);
        assert_eq!(
            NtCreateEvent(&mut squatter, MAXIMUM_ALLOWED, Some(&dir_attrs), EVENT_TYPE::NotificationEvent, false),
            STATUS_SUCCESS
        );
        let child_path = OBJECT_ATTRIBUTES {
            ObjectName: Some("\\BaseNamedObjects\\platform-dir\\Child"),
            ..OBJECT_ATTRIBUTES::empty()
        };
        assert_eq!(NtOpenEvent(&mut child, SYNCHRONIZE, &child_path), STATUS_OBJECT_NAME_NOT_FOUND);
        assert_eq!(NtClose(squatter), STATUS_SUCCESS);
    }

    #[test]
    fn test_child_partition_keeps_parent_alive() {
        use nt::*;
        init_logging();

        let parent_attrs = OBJECT_ATTRIBUTES {
            ObjectName: Some("\\BaseNamedObjects\\platform-partition"),
            ..OBJECT_ATTRIBUTES::empty()
        };
        let mut parent = NULL_HANDLE;
        assert_eq!(NtCreatePartition(NULL_HANDLE, &mut parent, MAXIMUM_ALLOWED, Some(&parent_attrs), -1), STATUS_SUCCESS);
        let mut child = NULL_HANDLE;
        assert_eq!(NtCreatePartition(parent, &mut child, MAXIMUM_ALLOWED, None, 0), STATUS_SUCCESS);
        assert_eq!(NtClose(parent), STATUS_SUCCESS);

        let mut info = PARTITION_BASIC_INFORMATION::default();
        assert_eq!(NtQueryPartition(child, &mut info), STATUS_SUCCESS);
        assert!(info.HasParent);
        let mut reopened = NULL_HANDLE;
        assert_eq!(NtOpenPartition(&mut reopened, MAXIMUM_ALLOWED, &parent_attrs), STATUS_SUCCESS);
        assert_eq!(NtClose(reopened), STATUS_SUCCESS);

        assert_eq!(NtClose(child), STATUS_SUCCESS);
        assert_eq!(NtOpenPartition(&mut reopened, MAXIMUM_ALLOWED, &parent_attrs), STATUS_OBJECT_NAME_NOT_FOUND);
    }
}
