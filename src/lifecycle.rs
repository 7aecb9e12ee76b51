use std::cell::Cell;
use std::rc::Rc;

/// Liveness and response ordering shared between a mounted component and the
/// continuations it schedules. Clones observe the same state.
#[derive(Clone, Debug, Default)]
pub struct MountScope {
    inner: Rc<ScopeState>,
}

#[derive(Debug)]
struct ScopeState {
    alive: Cell<bool>,
    issued: Cell<u64>,
    applied: Cell<u64>,
}

impl Default for ScopeState {
    fn default() -> Self {
        Self {
            alive: Cell::new(true),
            issued: Cell::new(0),
            applied: Cell::new(0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl MountScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_alive(&self) -> bool {
        self.inner.alive.get()
    }

    pub fn teardown(&self) {
        self.inner.alive.set(false);
    }

    pub fn ticket(&self) -> Ticket {
        let next = self.inner.issued.get() + 1;
        self.inner.issued.set(next);
        Ticket(next)
    }

    /// Accepts a response for `ticket` if the scope is still mounted and no
    /// newer response has been applied yet.
    pub fn admit(&self, ticket: Ticket) -> bool {
        if !self.is_alive() || ticket.0 <= self.inner.applied.get() {
            return false;
        }

        self.inner.applied.set(ticket.0);
        true
    }
}

/// A timer or listener guard bound to the scope that consumes its callbacks.
/// Cancelling (or dropping) releases the guard and tears the scope down.
pub struct Subscription<G> {
    guard: Option<G>,
    scope: MountScope,
}

impl<G> Subscription<G> {
    pub fn new(guard: G, scope: MountScope) -> Self {
        Self {
            guard: Some(guard),
            scope,
        }
    }

    pub fn cancel(&mut self) {
        self.scope.teardown();
        self.guard.take();
    }
}

impl<G> Drop for Subscription<G> {
    fn drop(&mut self) {
        self.cancel();
    }
}
