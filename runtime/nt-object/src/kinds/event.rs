//! Event objects

use nt_platform::adapter as nt;
use nt_platform::types::{ObjectType, EVENT_BASIC_INFORMATION, EVENT_TYPE};

use crate::access::kind_rights;
use crate::attributes::ObjectAttributes;
use crate::object::{NtObject, WaitableKind};
use crate::result::NtResult;
use crate::Result;

use super::{complete, object_kind};

kind_rights! {
    /// Event access rights
    pub struct EventAccessRights {
        const QUERY_STATE = nt::EVENT_QUERY_STATE;
        const MODIFY_STATE = nt::EVENT_MODIFY_STATE;
    }
}

object_kind!(
    /// Event kind marker
    EventKind,
    ObjectType::Event,
    EventAccessRights,
    nt::NtOpenEvent
);

impl WaitableKind for EventKind {}

pub type Event = NtObject<EventKind>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Manual reset: stays signalled and releases every waiter
    Notification,
    /// Auto reset: releases one waiter, then clears
    Synchronization,
}

impl From<EventType> for EVENT_TYPE {
    fn from(kind: EventType) -> Self {
        match kind {
            EventType::Notification => EVENT_TYPE::NotificationEvent,
            EventType::Synchronization => EVENT_TYPE::SynchronizationEvent,
        }
    }
}

impl From<EVENT_TYPE> for EventType {
    fn from(kind: EVENT_TYPE) -> Self {
        match kind {
            EVENT_TYPE::NotificationEvent => EventType::Notification,
            EVENT_TYPE::SynchronizationEvent => EventType::Synchronization,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventInformation {
    pub event_type: EventType,
    pub signalled: bool,
}

impl NtObject<EventKind> {
    pub fn create(
        attributes: &ObjectAttributes<'_>,
        rights: EventAccessRights,
        event_type: EventType,
        initial_state: bool,
        throw_on_error: bool,
    ) -> Result<NtResult<Self>> {
        Self::create_with(attributes, rights, throw_on_error, |out, access, raw| {
            nt::NtCreateEvent(out, access, Some(raw), event_type.into(), initial_state)
        })
    }

    /// Signal the event, returning whether it was already signalled
    pub fn set(&self, throw_on_error: bool) -> Result<NtResult<bool>> {
        let raw = self.raw()?;
        let mut previous = 0;
        let status = nt::NtSetEvent(raw, Some(&mut previous));
        complete(status, throw_on_error, || previous != 0)
    }

    /// Clear the event, returning whether it was signalled
    pub fn reset(&self, throw_on_error: bool) -> Result<NtResult<bool>> {
        let raw = self.raw()?;
        let mut previous = 0;
        let status = nt::NtResetEvent(raw, Some(&mut previous));
        complete(status, throw_on_error, || previous != 0)
    }

    pub fn query(&self, throw_on_error: bool) -> Result<NtResult<EventInformation>> {
        let raw = self.raw()?;
        let mut info = EVENT_BASIC_INFORMATION {
            EventType: EVENT_TYPE::NotificationEvent,
            EventState: 0,
        };
        let status = nt::NtQueryEvent(raw, &mut info);
        complete(status, throw_on_error, || EventInformation {
            event_type: info.EventType.into(),
            signalled: info.EventState != 0,
        })
    }
}
