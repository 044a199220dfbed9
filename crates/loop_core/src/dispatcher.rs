use std::fmt;
use std::sync::Weak;

use loop_logging::loop_warn;

use crate::DispatchError;

/// Implemented by the loop internals so dispatchers only depend on the event type.
pub(crate) trait DispatchTarget<Ev>: Send + Sync {
    fn dispatch_event(&self, event: Ev) -> Result<(), DispatchError>;
}

/// Handle that feeds events into a loop.
///
/// Cheap to clone and safe to move to other threads. It does not keep the
/// loop alive: once every [`crate::Loop`] handle is dropped, dispatching
/// returns [`DispatchError::Closed`].
pub struct Dispatcher<Ev> {
    target: Weak<dyn DispatchTarget<Ev>>,
}

impl<Ev> Dispatcher<Ev> {
    pub(crate) fn new(target: Weak<dyn DispatchTarget<Ev>>) -> Self {
        Self { target }
    }

    /// Runs one full dispatch: update, commit, effects, listeners.
    ///
    /// Called from inside an effect handler on the loop's thread, this
    /// nests: the inner dispatch completes before the call returns.
    pub fn dispatch(&self, event: Ev) -> Result<(), DispatchError> {
        match self.target.upgrade() {
            Some(target) => target.dispatch_event(event),
            None => {
                loop_warn!("dispatch after loop was dropped; event discarded");
                Err(DispatchError::Closed)
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.target.strong_count() == 0
    }
}

impl<Ev> Clone for Dispatcher<Ev> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
        }
    }
}

/// Dispatchers are equal when they feed the same loop.
impl<Ev> PartialEq for Dispatcher<Ev> {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.target, &other.target)
    }
}

impl<Ev> Eq for Dispatcher<Ev> {}

impl<Ev> fmt::Debug for Dispatcher<Ev> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("closed", &self.is_closed())
            .finish()
    }
}
