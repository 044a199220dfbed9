use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

/// Locks a mutex, recovering the data if a panicking caller poisoned it.
///
/// Values behind the loop's mutexes are only ever replaced whole, so a
/// poisoned lock never holds a half-written value.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct GateState {
    owner: Option<ThreadId>,
    depth: usize,
}

/// Re-entrant exclusion for whole dispatches.
///
/// One thread at a time runs dispatches on a loop; that thread may nest
/// further dispatches freely. Other threads block until the outermost
/// dispatch finishes.
#[derive(Debug, Default)]
pub(crate) struct DispatchGate {
    state: Mutex<GateState>,
    released: Condvar,
}

impl DispatchGate {
    pub(crate) fn enter(&self) -> GateGuard<'_> {
        let me = thread::current().id();
        let mut state = lock(&self.state);
        loop {
            match state.owner {
                None => {
                    state.owner = Some(me);
                    break;
                }
                Some(owner) if owner == me => break,
                Some(_) => {
                    state = self
                        .released
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
        state.depth += 1;
        let depth = state.depth;
        drop(state);
        loop_logging::enter_dispatch();
        GateGuard { gate: self, depth }
    }
}

pub(crate) struct GateGuard<'a> {
    gate: &'a DispatchGate,
    depth: usize,
}

impl GateGuard<'_> {
    /// Nesting level of this dispatch on its loop, starting at 1.
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        loop_logging::exit_dispatch();
        let mut state = lock(&self.gate.state);
        state.depth -= 1;
        if state.depth == 0 {
            state.owner = None;
            drop(state);
            self.gate.released.notify_one();
        }
    }
}
