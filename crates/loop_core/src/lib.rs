//! Loop core: a single-model update loop with pure transitions and
//! separately handled effects.
//!
//! An [`Updater`] turns `(model, event)` into a [`Next`]; the [`Loop`]
//! commits the new model, hands every effect to every [`EffectHandler`],
//! then notifies listeners. [`EventSource`]s and handlers feed events back
//! in through a [`Dispatcher`].
mod combine;
mod dispatcher;
mod error;
mod gate;
mod listeners;
mod next;
mod runtime;
mod traits;

pub use combine::{combine_updaters, CombineBuilder, CombinedUpdater};
pub use dispatcher::Dispatcher;
pub use error::{CombineError, DispatchError, EffectFailure};
pub use listeners::{listener, Listener};
pub use next::{dispatch_effects, next, next_model, no_change, Next};
pub use runtime::{Loop, LoopBuilder};
pub use traits::{EffectHandler, EventSource, Initiator, NoInit, Updater};
