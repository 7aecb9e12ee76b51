//! Visitor counter reconciliation.
//!
//! The first mount of a browsing session bumps the shared counter; every later
//! mount in that session only reads it. Afterwards the value is refreshed on an
//! interval. All failures here are silent: the last known value stays on screen.

use crate::lifecycle::{MountScope, Ticket};
use crate::site::SESSION_VISITED_KEY;
use serde::Deserialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

const VISITED_MARKER: &str = "true";
const PENDING_MARKER: &str = "pending";

pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Session state kept in memory, used when the host has no session storage.
#[derive(Clone, Debug, Default)]
pub struct MemorySession {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

pub fn session_visited(session: &impl SessionStore) -> bool {
    session.get(SESSION_VISITED_KEY).as_deref() == Some(VISITED_MARKER)
}

/// True once this session has an increment settled or in flight.
fn increment_claimed(session: &impl SessionStore) -> bool {
    matches!(
        session.get(SESSION_VISITED_KEY).as_deref(),
        Some(VISITED_MARKER | PENDING_MARKER)
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterError {
    Network,
    Status(u16),
    Malformed,
}

impl CounterError {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Status(_) => "status",
            Self::Malformed => "malformed",
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct CounterPayload {
    pub value: i64,
}

/// Remote counter endpoints. Returned futures own everything they need so
/// they can outlive the borrow of the client.
pub trait CounterApi {
    fn increment(&self) -> impl Future<Output = Result<i64, CounterError>> + 'static;
    fn read(&self) -> impl Future<Output = Result<i64, CounterError>> + 'static;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CounterState {
    pub value: i64,
    pub session_incremented: bool,
}

impl CounterState {
    pub fn with_value(self, value: i64) -> Self {
        Self { value, ..self }
    }

    /// Folds one poll outcome in. Failed or discarded polls keep the last
    /// known value.
    pub fn after_poll(self, outcome: &Result<Option<i64>, CounterError>) -> Self {
        match outcome {
            Ok(Some(value)) => self.with_value(*value),
            Ok(None) | Err(_) => self,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MountRequest {
    Increment,
    Read,
}

type CounterCall = Pin<Box<dyn Future<Output = Result<i64, CounterError>>>>;

pub struct CounterSync<A, S> {
    api: A,
    session: S,
    scope: MountScope,
    mount_settled: Rc<Cell<bool>>,
}

impl<A, S> CounterSync<A, S>
where
    A: CounterApi + 'static,
    S: SessionStore + Clone + 'static,
{
    pub fn new(api: A, session: S) -> Self {
        Self {
            api,
            session,
            scope: MountScope::new(),
            mount_settled: Rc::new(Cell::new(false)),
        }
    }

    pub fn scope(&self) -> &MountScope {
        &self.scope
    }

    pub fn mount_request(&self) -> MountRequest {
        if increment_claimed(&self.session) {
            MountRequest::Read
        } else {
            MountRequest::Increment
        }
    }

    /// Issues the mount-time request. `Ok(None)` means the component was torn
    /// down before the response arrived.
    pub fn mount(&self) -> impl Future<Output = Result<Option<CounterState>, CounterError>> + 'static {
        let request = self.mount_request();
        let ticket = self.scope.ticket();
        let call: CounterCall = match request {
            MountRequest::Increment => {
                // Claimed before the request leaves so a remount in the
                // meantime reads instead of counting the visit again.
                self.session.set(SESSION_VISITED_KEY, PENDING_MARKER);
                Box::pin(self.api.increment())
            }
            MountRequest::Read => Box::pin(self.api.read()),
        };
        let session = self.session.clone();
        let scope = self.scope.clone();
        let settled = self.mount_settled.clone();

        async move {
            let result = call.await;
            settled.set(true);
            finish_mount(result, request, &session, &scope, ticket)
        }
    }

    /// One interval tick. Returns `None` while the mount request is still in
    /// flight or after teardown, so no read can overtake the increment.
    pub fn poll(&self) -> Option<impl Future<Output = Result<Option<i64>, CounterError>> + 'static> {
        if !self.mount_settled.get() || !self.scope.is_alive() {
            return None;
        }

        let ticket = self.scope.ticket();
        let call: CounterCall = Box::pin(self.api.read());
        let scope = self.scope.clone();

        Some(async move { apply_read(call.await, &scope, ticket) })
    }
}

fn finish_mount(
    result: Result<i64, CounterError>,
    request: MountRequest,
    session: &impl SessionStore,
    scope: &MountScope,
    ticket: Ticket,
) -> Result<Option<CounterState>, CounterError> {
    let incremented = request == MountRequest::Increment;
    let value = match result {
        Ok(value) => value,
        Err(error) => {
            if incremented {
                session.remove(SESSION_VISITED_KEY);
            }
            return Err(error);
        }
    };

    // The remote side effect happened even if nobody is left to show it.
    if incremented {
        session.set(SESSION_VISITED_KEY, VISITED_MARKER);
    }

    Ok(scope.admit(ticket).then_some(CounterState {
        value,
        session_incremented: incremented,
    }))
}

fn apply_read(
    result: Result<i64, CounterError>,
    scope: &MountScope,
    ticket: Ticket,
) -> Result<Option<i64>, CounterError> {
    let value = result?;
    Ok(scope.admit(ticket).then_some(value))
}
