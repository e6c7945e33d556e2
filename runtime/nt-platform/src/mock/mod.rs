//! In-process mock object manager
//!
//! # WARNING: This is NOT a real kernel!
//!
//! The mock implements enough of the NT object manager to exercise the
//! typed layer on any host: a hierarchical namespace, a handle table with
//! granted-access tracking, dispatcher objects (events, mutants,
//! semaphores) with real blocking waits, alerts, and mutant abandonment.
//!
//! ## Current Limitations
//!
//! - Security descriptors are accepted but never evaluated
//! - Absolute wait deadlines are not supported
//! - One process: handles are global to the host process
//!
//! All state lives behind a single kernel lock. Blocking services release
//! the lock before parking the calling thread.

mod objects;
mod thread;
mod wait;

use std::collections::HashMap;

use spin::{Lazy, Mutex};

use crate::status::*;
use crate::types::*;

use objects::{KernelObject, ObjectId, ObjectState};
use thread::{ThreadEntry, ThreadId};

pub(crate) use thread::current_id;
pub(crate) use wait::wait_for_objects;

/// Number of NUMA nodes the mock pretends to have
pub const MOCK_NODE_COUNT: LONG = 4;

/// Directories present at boot
const BOOT_DIRECTORIES: &[&str] = &["\\", "\\BaseNamedObjects"];

static KERNEL: Lazy<Mutex<ObjectManager>> = Lazy::new(|| Mutex::new(ObjectManager::new()));

pub(crate) fn kernel() -> &'static Mutex<ObjectManager> {
    &KERNEL
}

/// One slot of the handle table
#[derive(Debug, Clone, Copy)]
pub(crate) struct HandleEntry {
    pub object: ObjectId,
    pub granted: ACCESS_MASK,
    pub attributes: ULONG,
}

pub(crate) struct ObjectManager {
    objects: HashMap<ObjectId, KernelObject>,
    handles: HashMap<HANDLE, HandleEntry>,
    namespace: HashMap<String, ObjectId>,
    threads: HashMap<ThreadId, ThreadEntry>,
    next_handle: HANDLE,
    next_object: ObjectId,
}

impl ObjectManager {
    fn new() -> Self {
        let mut om = Self {
            objects: HashMap::new(),
            handles: HashMap::new(),
            namespace: HashMap::new(),
            threads: HashMap::new(),
            next_handle: 4,
            next_object: 1,
        };
        for path in BOOT_DIRECTORIES {
            let container = om.parent_directory(path, false);
            om.insert_object(KernelObject::new(Some(path.to_string()), true, ObjectState::Directory), container);
        }
        om
    }

    // ========== Threads ==========

    pub(crate) fn register_thread(&mut self, id: ThreadId, entry: ThreadEntry) {
        self.threads.insert(id, entry);
    }

    /// Abandon every mutant the thread still owns and forget the thread
    pub(crate) fn thread_exited(&mut self, id: ThreadId) {
        let mut abandoned = Vec::new();
        for (&object_id, object) in self.objects.iter_mut() {
            object.remove_waiter(id);
            if let ObjectState::Mutant { owner, recursion, abandoned: flag } = &mut object.state {
                if *owner == Some(id) {
                    *owner = None;
                    *recursion = 0;
                    *flag = true;
                    abandoned.push(object_id);
                }
            }
        }
        self.threads.remove(&id);
        for object_id in abandoned {
            log::debug!("mock: thread {} abandoned mutant {}", id, object_id);
            self.wake(object_id);
        }
    }

    pub(crate) fn alert_thread(&mut self, id: ThreadId) -> NTSTATUS {
        match self.threads.get_mut(&id) {
            Some(entry) => {
                entry.alerted = true;
                entry.unparker.unpark();
                STATUS_SUCCESS
            }
            None => STATUS_INVALID_PARAMETER,
        }
    }

    /// Consume a pending alert for `id`
    pub(crate) fn take_alert(&mut self, id: ThreadId) -> bool {
        self.threads
            .get_mut(&id)
            .map(|entry| core::mem::replace(&mut entry.alerted, false))
            .unwrap_or(false)
    }

    /// Unpark every thread blocked on `object`
    pub(crate) fn wake(&self, object: ObjectId) {
        if let Some(object) = self.objects.get(&object) {
            for waiter in &object.waiters {
                if let Some(entry) = self.threads.get(waiter) {
                    entry.unparker.unpark();
                }
            }
        }
    }

    // ========== Objects and handles ==========

    fn insert_object(&mut self, mut object: KernelObject, container: Option<ObjectId>) -> ObjectId {
        let id = self.next_object;
        self.next_object += 1;
        if let Some(name) = &object.name {
            self.namespace.insert(name.clone(), id);
        }
        object.container = container;
        for referenced in object.referenced() {
            if let Some(target) = self.objects.get_mut(&referenced) {
                target.references += 1;
            }
        }
        self.objects.insert(id, object);
        id
    }

    /// Delete `id` if nothing keeps it alive, then release what it referenced
    fn delete_if_unreferenced(&mut self, id: ObjectId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            if !self.objects.get(&id).map_or(false, KernelObject::is_unreferenced) {
                continue;
            }
            let Some(object) = self.objects.remove(&id) else {
                continue;
            };
            if let Some(name) = &object.name {
                self.namespace.remove(name);
            }
            log::trace!("mock: deleted {} object {}", object.object_type().name(), id);
            for referenced in object.referenced() {
                if let Some(target) = self.objects.get_mut(&referenced) {
                    target.references -= 1;
                    pending.push(referenced);
                }
            }
        }
    }

    fn insert_handle(&mut self, object: ObjectId, granted: ACCESS_MASK, attributes: ULONG) -> HANDLE {
        let handle = self.next_handle;
        self.next_handle += 4;
        self.handles.insert(handle, HandleEntry { object, granted, attributes });
        if let Some(object) = self.objects.get_mut(&object) {
            object.handle_count += 1;
        }
        handle
    }

    pub(crate) fn handle_entry(&self, handle: HANDLE) -> Result<HandleEntry, NTSTATUS> {
        self.handles.get(&handle).copied().ok_or(STATUS_INVALID_HANDLE)
    }

    /// Resolve a handle to its object, checking type and granted access
    pub(crate) fn reference(
        &self,
        handle: HANDLE,
        expected: Option<ObjectType>,
        required: ACCESS_MASK,
    ) -> Result<ObjectId, NTSTATUS> {
        let entry = self.handle_entry(handle)?;
        let object = self.objects.get(&entry.object).ok_or(STATUS_INVALID_HANDLE)?;
        if let Some(expected) = expected {
            if object.object_type() != expected {
                return Err(STATUS_OBJECT_TYPE_MISMATCH);
            }
        }
        if entry.granted & required != required {
            return Err(STATUS_ACCESS_DENIED);
        }
        Ok(entry.object)
    }

    /// Compute the access granted for a request against a type
    fn grant(ty: ObjectType, desired: ACCESS_MASK) -> Result<ACCESS_MASK, NTSTATUS> {
        let valid = ty.valid_access();
        let mut granted = map_generic(desired, &ty.generic_mapping());
        if granted & MAXIMUM_ALLOWED != 0 {
            granted = (granted & !MAXIMUM_ALLOWED) | valid;
        }
        if granted & !valid != 0 {
            return Err(STATUS_ACCESS_DENIED);
        }
        Ok(granted)
    }

    pub(crate) fn close_handle(&mut self, handle: HANDLE) -> NTSTATUS {
        let entry = match self.handles.remove(&handle) {
            Some(entry) => entry,
            None => return STATUS_INVALID_HANDLE,
        };
        if let Some(object) = self.objects.get_mut(&entry.object) {
            object.handle_count -= 1;
        }
        self.delete_if_unreferenced(entry.object);
        STATUS_SUCCESS
    }

    // ========== Namespace ==========

    fn lookup(&self, path: &str, case_insensitive: bool) -> Option<ObjectId> {
        if let Some(&id) = self.namespace.get(path) {
            return Some(id);
        }
        if case_insensitive {
            return self
                .namespace
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(path))
                .map(|(_, &id)| id);
        }
        None
    }

    /// Build the full path an attribute block names, if any
    fn resolve_name(&self, attrs: &OBJECT_ATTRIBUTES<'_>) -> Result<Option<String>, NTSTATUS> {
        let name = match attrs.ObjectName {
            Some(name) => name,
            None if attrs.RootDirectory == NULL_HANDLE => return Ok(None),
            None => return Err(STATUS_OBJECT_NAME_INVALID),
        };

        let full = if attrs.RootDirectory == NULL_HANDLE {
            if !name.starts_with('\\') {
                return Err(STATUS_OBJECT_PATH_SYNTAX_BAD);
            }
            name.to_string()
        } else {
            if name.starts_with('\\') {
                return Err(STATUS_OBJECT_PATH_SYNTAX_BAD);
            }
            let root = self.reference(attrs.RootDirectory, Some(ObjectType::Directory), 0)?;
            let root_name = self
                .objects
                .get(&root)
                .and_then(|o| o.name.as_deref())
                .ok_or(STATUS_OBJECT_PATH_NOT_FOUND)?;
            if root_name == "\\" {
                std::format!("\\{}", name)
            } else {
                std::format!("{}\\{}", root_name, name)
            }
        };

        if full != "\\" && full[1..].split('\\').any(str::is_empty) {
            return Err(STATUS_OBJECT_NAME_INVALID);
        }
        Ok(Some(full))
    }

    /// Directory that would contain `full`, if it exists
    fn parent_directory(&self, full: &str, case_insensitive: bool) -> Option<ObjectId> {
        let parent = match full.rfind('\\') {
            Some(0) if full.len() > 1 => "\\",
            Some(0) | None => return None,
            Some(idx) => &full[..idx],
        };
        self.lookup(parent, case_insensitive)
            .filter(|id| self.objects.get(id).map(KernelObject::object_type) == Some(ObjectType::Directory))
    }

    // ========== Create / open / duplicate ==========

    pub(crate) fn create_object(
        &mut self,
        out: &mut HANDLE,
        desired: ACCESS_MASK,
        attrs: Option<&OBJECT_ATTRIBUTES<'_>>,
        state: ObjectState,
    ) -> NTSTATUS {
        let ty = state.object_type();
        let attrs = attrs.copied().unwrap_or(OBJECT_ATTRIBUTES::empty());
        if attrs.Attributes & !OBJ_VALID_ATTRIBUTES != 0 {
            return STATUS_INVALID_PARAMETER;
        }
        let granted = match Self::grant(ty, desired) {
            Ok(granted) => granted,
            Err(status) => return status,
        };
        let name = match self.resolve_name(&attrs) {
            Ok(name) => name,
            Err(status) => return status,
        };
        let case_insensitive = attrs.Attributes & OBJ_CASE_INSENSITIVE != 0;

        let mut container = None;
        if let Some(full) = &name {
            if let Some(existing) = self.lookup(full, case_insensitive) {
                if attrs.Attributes & OBJ_OPENIF == 0 {
                    return STATUS_OBJECT_NAME_COLLISION;
                }
                let existing_type = self.objects.get(&existing).map(KernelObject::object_type);
                if existing_type != Some(ty) {
                    return STATUS_OBJECT_TYPE_MISMATCH;
                }
                *out = self.insert_handle(existing, granted, attrs.Attributes & OBJ_INHERIT);
                return STATUS_OBJECT_NAME_EXISTS;
            }
            container = match self.parent_directory(full, case_insensitive) {
                Some(parent) => Some(parent),
                None => return STATUS_OBJECT_PATH_NOT_FOUND,
            };
        }

        let permanent = attrs.Attributes & OBJ_PERMANENT != 0;
        let id = self.insert_object(KernelObject::new(name, permanent, state), container);
        *out = self.insert_handle(id, granted, attrs.Attributes & OBJ_INHERIT);
        log::trace!("mock: created {} object {} as handle {:#x}", ty.name(), id, *out);
        STATUS_SUCCESS
    }

    pub(crate) fn open_object(
        &mut self,
        out: &mut HANDLE,
        desired: ACCESS_MASK,
        attrs: &OBJECT_ATTRIBUTES<'_>,
        ty: ObjectType,
    ) -> NTSTATUS {
        if attrs.Attributes & !OBJ_VALID_ATTRIBUTES != 0 {
            return STATUS_INVALID_PARAMETER;
        }
        let full = match self.resolve_name(attrs) {
            Ok(Some(full)) => full,
            Ok(None) => return STATUS_OBJECT_PATH_SYNTAX_BAD,
            Err(status) => return status,
        };
        let id = match self.lookup(&full, attrs.Attributes & OBJ_CASE_INSENSITIVE != 0) {
            Some(id) => id,
            None => return STATUS_OBJECT_NAME_NOT_FOUND,
        };
        if self.objects.get(&id).map(KernelObject::object_type) != Some(ty) {
            return STATUS_OBJECT_TYPE_MISMATCH;
        }
        let granted = match Self::grant(ty, desired) {
            Ok(granted) => granted,
            Err(status) => return status,
        };
        *out = self.insert_handle(id, granted, attrs.Attributes & OBJ_INHERIT);
        STATUS_SUCCESS
    }

    pub(crate) fn duplicate(
        &mut self,
        source: HANDLE,
        out: &mut HANDLE,
        desired: ACCESS_MASK,
        attributes: ULONG,
        options: ULONG,
    ) -> NTSTATUS {
        let entry = match self.handle_entry(source) {
            Ok(entry) => entry,
            Err(status) => return status,
        };
        let ty = match self.objects.get(&entry.object) {
            Some(object) => object.object_type(),
            None => return STATUS_INVALID_HANDLE,
        };
        let granted = if options & DUPLICATE_SAME_ACCESS != 0 {
            entry.granted
        } else {
            let mut requested = map_generic(desired, &ty.generic_mapping());
            if requested & MAXIMUM_ALLOWED != 0 {
                requested = (requested & !MAXIMUM_ALLOWED) | entry.granted;
            }
            if requested & !entry.granted != 0 {
                return STATUS_ACCESS_DENIED;
            }
            requested
        };
        *out = self.insert_handle(entry.object, granted, attributes & OBJ_INHERIT);
        if options & DUPLICATE_CLOSE_SOURCE != 0 {
            self.close_handle(source);
        }
        STATUS_SUCCESS
    }

    pub(crate) fn basic_information(&self, handle: HANDLE) -> Result<OBJECT_BASIC_INFORMATION, NTSTATUS> {
        let entry = self.handle_entry(handle)?;
        let object = self.objects.get(&entry.object).ok_or(STATUS_INVALID_HANDLE)?;
        let mut attributes = entry.attributes;
        if object.permanent {
            attributes |= OBJ_PERMANENT;
        }
        Ok(OBJECT_BASIC_INFORMATION {
            Attributes: attributes,
            GrantedAccess: entry.granted,
            HandleCount: object.handle_count,
        })
    }

    pub(crate) fn object_type_of(&self, handle: HANDLE) -> Result<ObjectType, NTSTATUS> {
        let entry = self.handle_entry(handle)?;
        self.objects
            .get(&entry.object)
            .map(KernelObject::object_type)
            .ok_or(STATUS_INVALID_HANDLE)
    }

    // ========== Dispatcher object services ==========

    pub(crate) fn set_event(&mut self, handle: HANDLE, signalled: bool) -> Result<LONG, NTSTATUS> {
        let id = self.reference(handle, Some(ObjectType::Event), EVENT_MODIFY_STATE)?;
        let previous = match self.objects.get_mut(&id).map(|o| &mut o.state) {
            Some(ObjectState::Event { signalled: state, .. }) => core::mem::replace(state, signalled),
            _ => return Err(STATUS_OBJECT_TYPE_MISMATCH),
        };
        if signalled {
            self.wake(id);
        }
        Ok(LONG::from(previous))
    }

    pub(crate) fn query_event(&self, handle: HANDLE) -> Result<EVENT_BASIC_INFORMATION, NTSTATUS> {
        let id = self.reference(handle, Some(ObjectType::Event), EVENT_QUERY_STATE)?;
        match self.objects.get(&id).map(|o| &o.state) {
            Some(ObjectState::Event { kind, signalled }) => Ok(EVENT_BASIC_INFORMATION {
                EventType: *kind,
                EventState: LONG::from(*signalled),
            }),
            _ => Err(STATUS_OBJECT_TYPE_MISMATCH),
        }
    }

    pub(crate) fn release_mutant(&mut self, handle: HANDLE, thread: ThreadId) -> Result<LONG, NTSTATUS> {
        let id = self.reference(handle, Some(ObjectType::Mutant), 0)?;
        let (previous, released) = match self.objects.get_mut(&id).map(|o| &mut o.state) {
            Some(ObjectState::Mutant { owner, recursion, .. }) => {
                if *owner != Some(thread) {
                    return Err(STATUS_MUTANT_NOT_OWNED);
                }
                let previous = *recursion;
                *recursion -= 1;
                if *recursion == 0 {
                    *owner = None;
                }
                (previous, *recursion == 0)
            }
            _ => return Err(STATUS_OBJECT_TYPE_MISMATCH),
        };
        if released {
            self.wake(id);
        }
        // Signal state before release: 1 - recursion
        Ok(1 - previous as LONG)
    }

    pub(crate) fn query_mutant(
        &self,
        handle: HANDLE,
        thread: Option<ThreadId>,
    ) -> Result<MUTANT_BASIC_INFORMATION, NTSTATUS> {
        let id = self.reference(handle, Some(ObjectType::Mutant), MUTANT_QUERY_STATE)?;
        match self.objects.get(&id).map(|o| &o.state) {
            Some(ObjectState::Mutant { owner, recursion, abandoned }) => Ok(MUTANT_BASIC_INFORMATION {
                CurrentCount: 1 - *recursion as LONG,
                OwnedByCaller: owner.is_some() && *owner == thread,
                AbandonedState: *abandoned,
            }),
            _ => Err(STATUS_OBJECT_TYPE_MISMATCH),
        }
    }

    pub(crate) fn release_semaphore(&mut self, handle: HANDLE, release: LONG) -> Result<LONG, NTSTATUS> {
        if release <= 0 {
            return Err(STATUS_INVALID_PARAMETER);
        }
        let id = self.reference(handle, Some(ObjectType::Semaphore), SEMAPHORE_MODIFY_STATE)?;
        let previous = match self.objects.get_mut(&id).map(|o| &mut o.state) {
            Some(ObjectState::Semaphore { count, maximum }) => {
                let previous = *count;
                match previous.checked_add(release) {
                    Some(next) if next <= *maximum => *count = next,
                    _ => return Err(STATUS_SEMAPHORE_LIMIT_EXCEEDED),
                }
                previous
            }
            _ => return Err(STATUS_OBJECT_TYPE_MISMATCH),
        };
        self.wake(id);
        Ok(previous)
    }

    pub(crate) fn query_semaphore(&self, handle: HANDLE) -> Result<SEMAPHORE_BASIC_INFORMATION, NTSTATUS> {
        let id = self.reference(handle, Some(ObjectType::Semaphore), SEMAPHORE_QUERY_STATE)?;
        match self.objects.get(&id).map(|o| &o.state) {
            Some(ObjectState::Semaphore { count, maximum }) => Ok(SEMAPHORE_BASIC_INFORMATION {
                CurrentCount: *count,
                MaximumCount: *maximum,
            }),
            _ => Err(STATUS_OBJECT_TYPE_MISMATCH),
        }
    }

    pub(crate) fn query_partition(&self, handle: HANDLE) -> Result<PARTITION_BASIC_INFORMATION, NTSTATUS> {
        let id = self.reference(handle, Some(ObjectType::Partition), PARTITION_QUERY)?;
        match self.objects.get(&id).map(|o| &o.state) {
            Some(ObjectState::Partition { parent, preferred_node }) => Ok(PARTITION_BASIC_INFORMATION {
                PreferredNode: *preferred_node,
                HasParent: parent.is_some(),
            }),
            _ => Err(STATUS_OBJECT_TYPE_MISMATCH),
        }
    }

    /// Resolve a partition parent handle; `NULL_HANDLE` means no parent
    pub(crate) fn partition_parent(&self, handle: HANDLE) -> Result<Option<ObjectId>, NTSTATUS> {
        if handle == NULL_HANDLE {
            return Ok(None);
        }
        self.reference(handle, Some(ObjectType::Partition), PARTITION_MODIFY).map(Some)
    }
}

/// Mock object state constructors used by the system call layer
pub(crate) mod state {
    use super::objects::ObjectState;
    use super::ObjectId;
    use crate::types::{EVENT_TYPE, LONG};

    pub(crate) fn directory() -> ObjectState {
        ObjectState::Directory
    }

    pub(crate) fn event(kind: EVENT_TYPE, signalled: bool) -> ObjectState {
        ObjectState::Event { kind, signalled }
    }

    pub(crate) fn mutant(owner: Option<u64>) -> ObjectState {
        ObjectState::Mutant {
            owner,
            recursion: u32::from(owner.is_some()),
            abandoned: false,
        }
    }

    pub(crate) fn semaphore(count: LONG, maximum: LONG) -> ObjectState {
        ObjectState::Semaphore { count, maximum }
    }

    pub(crate) fn partition(parent: Option<ObjectId>, preferred_node: LONG) -> ObjectState {
        ObjectState::Partition { parent, preferred_node }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_namespace() {
        let om = kernel().lock();
        assert!(om.lookup("\\BaseNamedObjects", false).is_some());
        assert!(om.lookup("\\basenamedobjects", true).is_some());
        assert!(om.lookup("\\basenamedobjects", false).is_none());
    }

    #[test]
    fn test_grant_maximum_allowed() {
        assert_eq!(ObjectManager::grant(ObjectType::Event, MAXIMUM_ALLOWED), Ok(0x001F_0003));
        assert_eq!(
            ObjectManager::grant(ObjectType::Mutant, 0x0002),
            Err(STATUS_ACCESS_DENIED)
        );
    }

    #[test]
    fn test_resolve_relative_name() {
        let mut om = kernel().lock();
        let mut root = NULL_HANDLE;
        let attrs = OBJECT_ATTRIBUTES {
            ObjectName: Some("\\BaseNamedObjects"),
            ..OBJECT_ATTRIBUTES::empty()
        };
        assert_eq!(om.open_object(&mut root, 0, &attrs, ObjectType::Directory), STATUS_SUCCESS);

        let relative = OBJECT_ATTRIBUTES {
            RootDirectory: root,
            ObjectName: Some("mock-resolve"),
            ..OBJECT_ATTRIBUTES::empty()
        };
        assert_eq!(
            om.resolve_name(&relative),
            Ok(Some("\\BaseNamedObjects\\mock-resolve".to_string()))
        );

        let bad = OBJECT_ATTRIBUTES {
            RootDirectory: root,
            ObjectName: Some("\\absolute"),
            ..OBJECT_ATTRIBUTES::empty()
        };
        assert_eq!(om.resolve_name(&bad), Err(STATUS_OBJECT_PATH_SYNTAX_BAD));
        assert_eq!(om.close_handle(root), STATUS_SUCCESS);
    }
}
