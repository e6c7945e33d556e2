//! Dispatcher state for mock kernel objects

use crate::types::{ObjectType, EVENT_TYPE, LONG};

use super::thread::ThreadId;

pub(crate) type ObjectId = u64;

pub(crate) enum ObjectState {
    Directory,
    Event {
        kind: EVENT_TYPE,
        signalled: bool,
    },
    Mutant {
        owner: Option<ThreadId>,
        recursion: u32,
        abandoned: bool,
    },
    Semaphore {
        count: LONG,
        maximum: LONG,
    },
    Partition {
        parent: Option<ObjectId>,
        preferred_node: LONG,
    },
}

impl ObjectState {
    pub(crate) fn object_type(&self) -> ObjectType {
        match self {
            ObjectState::Directory => ObjectType::Directory,
            ObjectState::Event { .. } => ObjectType::Event,
            ObjectState::Mutant { .. } => ObjectType::Mutant,
            ObjectState::Semaphore { .. } => ObjectType::Semaphore,
            ObjectState::Partition { .. } => ObjectType::Partition,
        }
    }
}

pub(crate) struct KernelObject {
    /// Full namespace path, if named
    pub name: Option<String>,
    pub permanent: bool,
    pub handle_count: u32,
    /// References held by other objects: named children and child partitions
    pub references: u32,
    /// Directory the name lives in
    pub container: Option<ObjectId>,
    pub state: ObjectState,
    /// Threads currently blocked on this object
    pub waiters: Vec<ThreadId>,
}

impl KernelObject {
    pub(crate) fn new(name: Option<String>, permanent: bool, state: ObjectState) -> Self {
        Self {
            name,
            permanent,
            handle_count: 0,
            references: 0,
            container: None,
            state,
            waiters: Vec::new(),
        }
    }

    pub(crate) fn object_type(&self) -> ObjectType {
        self.state.object_type()
    }

    /// Objects this one keeps alive
    pub(crate) fn referenced(&self) -> impl Iterator<Item = ObjectId> {
        let parent = match self.state {
            ObjectState::Partition { parent, .. } => parent,
            _ => None,
        };
        self.container.into_iter().chain(parent)
    }

    /// No handle or object refers to it and it is not permanent
    pub(crate) fn is_unreferenced(&self) -> bool {
        self.handle_count == 0 && self.references == 0 && !self.permanent
    }

    /// Would a wait by `thread` be satisfied right now?
    pub(crate) fn is_signalled_for(&self, thread: ThreadId) -> bool {
        match &self.state {
            ObjectState::Event { signalled, .. } => *signalled,
            ObjectState::Mutant { owner, .. } => owner.map_or(true, |o| o == thread),
            ObjectState::Semaphore { count, .. } => *count > 0,
            ObjectState::Directory | ObjectState::Partition { .. } => false,
        }
    }

    /// Apply the side effect of a satisfied wait.
    ///
    /// Returns true if the object was an abandoned mutant.
    pub(crate) fn satisfy(&mut self, thread: ThreadId) -> bool {
        match &mut self.state {
            ObjectState::Event { kind, signalled } => {
                if *kind == EVENT_TYPE::SynchronizationEvent {
                    *signalled = false;
                }
                false
            }
            ObjectState::Mutant { owner, recursion, abandoned } => {
                *owner = Some(thread);
                *recursion += 1;
                core::mem::replace(abandoned, false)
            }
            ObjectState::Semaphore { count, .. } => {
                *count -= 1;
                false
            }
            ObjectState::Directory | ObjectState::Partition { .. } => false,
        }
    }

    pub(crate) fn add_waiter(&mut self, thread: ThreadId) {
        if !self.waiters.contains(&thread) {
            self.waiters.push(thread);
        }
    }

    pub(crate) fn remove_waiter(&mut self, thread: ThreadId) {
        self.waiters.retain(|&t| t != thread);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synchronization_event_auto_resets() {
        let mut event = KernelObject::new(
            None,
            false,
            ObjectState::Event { kind: EVENT_TYPE::SynchronizationEvent, signalled: true },
        );
        assert!(event.is_signalled_for(1));
        assert!(!event.satisfy(1));
        assert!(!event.is_signalled_for(1));
    }

    #[test]
    fn test_notification_event_stays_signalled() {
        let mut event = KernelObject::new(
            None,
            false,
            ObjectState::Event { kind: EVENT_TYPE::NotificationEvent, signalled: true },
        );
        event.satisfy(1);
        assert!(event.is_signalled_for(2));
    }

    #[test]
    fn test_mutant_ownership() {
        let mut mutant = KernelObject::new(
            None,
            false,
            ObjectState::Mutant { owner: None, recursion: 0, abandoned: false },
        );
        assert!(mutant.is_signalled_for(1));
        mutant.satisfy(1);
        assert!(mutant.is_signalled_for(1));
        assert!(!mutant.is_signalled_for(2));
    }

    #[test]
    fn test_abandoned_flag_is_consumed() {
        let mut mutant = KernelObject::new(
            None,
            false,
            ObjectState::Mutant { owner: None, recursion: 0, abandoned: true },
        );
        assert!(mutant.satisfy(7));
        assert!(!mutant.satisfy(7));
    }

    #[test]
    fn test_referenced_objects() {
        let mut child = KernelObject::new(
            Some("\\Dir\\Child".to_string()),
            false,
            ObjectState::Partition { parent: Some(3), preferred_node: -1 },
        );
        child.container = Some(9);
        assert_eq!(child.referenced().collect::<Vec<_>>(), vec![9, 3]);
        assert!(child.is_unreferenced());
        child.references = 1;
        assert!(!child.is_unreferenced());
    }

    #[test]
    fn test_semaphore_count() {
        let mut sem = KernelObject::new(None, false, ObjectState::Semaphore { count: 1, maximum: 2 });
        assert!(sem.is_signalled_for(1));
        sem.satisfy(1);
        assert!(!sem.is_signalled_for(1));
    }
}
