//! Collaborator contracts the loop is built from.
//!
//! Each trait has a blanket implementation for the matching closure shape,
//! so plain functions work wherever a named type would.

use crate::{no_change, Dispatcher, Next};

/// Pure transition function. No I/O, no side effects.
///
/// Must be total and terminate; it never sees a dispatcher, so it cannot
/// feed events back into the loop.
pub trait Updater<M, Ev, Ef>: Send + Sync {
    fn update(&self, model: &M, event: &Ev) -> Next<M, Ef>;
}

impl<M, Ev, Ef, F> Updater<M, Ev, Ef> for F
where
    F: Fn(&M, &Ev) -> Next<M, Ef> + Send + Sync,
{
    fn update(&self, model: &M, event: &Ev) -> Next<M, Ef> {
        self(model, event)
    }
}

/// Pure startup transition, invoked exactly once when the loop is built.
pub trait Initiator<M, Ef>: Send + Sync {
    fn init(&self, model: &M) -> Next<M, Ef>;
}

impl<M, Ef, F> Initiator<M, Ef> for F
where
    F: Fn(&M) -> Next<M, Ef> + Send + Sync,
{
    fn init(&self, model: &M) -> Next<M, Ef> {
        self(model)
    }
}

/// Initiator that leaves the default model alone and emits nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInit;

impl<M, Ef> Initiator<M, Ef> for NoInit {
    fn init(&self, _model: &M) -> Next<M, Ef> {
        no_change()
    }
}

/// Performs effects. May do I/O and may dispatch further events, either
/// synchronously (nested dispatch) or later from another thread.
pub trait EffectHandler<Ef, Ev>: Send + Sync {
    fn handle(&self, effect: &Ef, dispatch: &Dispatcher<Ev>) -> anyhow::Result<()>;
}

impl<Ef, Ev, F> EffectHandler<Ef, Ev> for F
where
    F: Fn(&Ef, &Dispatcher<Ev>) -> anyhow::Result<()> + Send + Sync,
{
    fn handle(&self, effect: &Ef, dispatch: &Dispatcher<Ev>) -> anyhow::Result<()> {
        self(effect, dispatch)
    }
}

/// Feeds external input into the loop.
///
/// Invoked once at construction; it is expected to keep the dispatcher
/// (e.g. move it into a thread or callback) and use it for as long as it
/// has events to deliver.
pub trait EventSource<Ev> {
    fn produce(self: Box<Self>, dispatch: Dispatcher<Ev>);
}

impl<Ev, F> EventSource<Ev> for F
where
    F: FnOnce(Dispatcher<Ev>),
{
    fn produce(self: Box<Self>, dispatch: Dispatcher<Ev>) {
        (*self)(dispatch)
    }
}
