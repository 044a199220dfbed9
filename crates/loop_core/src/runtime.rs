//! The loop: owns the current model and drives update → commit → effects →
//! listeners for every dispatched event.

use std::sync::{Arc, Mutex, Weak};

use loop_logging::{loop_debug, loop_info, loop_trace, loop_warn};

use crate::dispatcher::DispatchTarget;
use crate::gate::{lock, DispatchGate};
use crate::listeners::{listener, Listener, Listeners};
use crate::{
    DispatchError, Dispatcher, EffectFailure, EffectHandler, EventSource, Initiator, Next, NoInit,
    Updater,
};

/// Handle to a running loop. Clones share the same model and listeners.
pub struct Loop<M, Ev, Ef> {
    inner: Arc<LoopInner<M, Ev, Ef>>,
}

impl<M, Ev, Ef> Clone for Loop<M, Ev, Ef> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct LoopInner<M, Ev, Ef> {
    model: Mutex<M>,
    updater: Box<dyn Updater<M, Ev, Ef>>,
    handlers: Vec<Box<dyn EffectHandler<Ef, Ev>>>,
    listeners: Listeners<M>,
    gate: DispatchGate,
    dispatcher: Dispatcher<Ev>,
}

impl<M, Ev, Ef> Loop<M, Ev, Ef>
where
    M: Clone + Send + 'static,
    Ev: 'static,
    Ef: 'static,
{
    /// Builds the loop: seeds the model through `initiator`, delivers its
    /// effects, then hands a dispatcher to each event source once.
    ///
    /// Fails only if a handler fails while delivering the initiator's
    /// effects; event sources are not started in that case.
    pub fn new(
        default_model: M,
        updater: impl Updater<M, Ev, Ef> + 'static,
        effect_handlers: Vec<Box<dyn EffectHandler<Ef, Ev>>>,
        initiator: impl Initiator<M, Ef>,
        event_sources: Vec<Box<dyn EventSource<Ev>>>,
    ) -> Result<Self, DispatchError> {
        let inner = Arc::new_cyclic(|weak: &Weak<LoopInner<M, Ev, Ef>>| {
            let target: Weak<dyn DispatchTarget<Ev>> = weak.clone();
            LoopInner {
                model: Mutex::new(default_model),
                updater: Box::new(updater),
                handlers: effect_handlers,
                listeners: Listeners::new(),
                gate: DispatchGate::default(),
                dispatcher: Dispatcher::new(target),
            }
        });

        inner.start(&initiator)?;

        let source_count = event_sources.len();
        for source in event_sources {
            source.produce(inner.dispatcher.clone());
        }

        loop_info!(
            "loop started: {} effect handler(s), {} event source(s)",
            inner.handlers.len(),
            source_count
        );
        Ok(Self { inner })
    }

    pub fn builder(
        default_model: M,
        updater: impl Updater<M, Ev, Ef> + 'static,
    ) -> LoopBuilder<M, Ev, Ef> {
        LoopBuilder::new(default_model, updater)
    }

    pub fn dispatch(&self, event: Ev) -> Result<(), DispatchError> {
        self.inner.dispatch_event(event)
    }

    pub fn dispatcher(&self) -> Dispatcher<Ev> {
        self.inner.dispatcher.clone()
    }

    /// Clone of the model as of now.
    pub fn current_model(&self) -> M {
        lock(&self.inner.model).clone()
    }

    /// Registers a listener. Registering the same handle twice means it is
    /// called twice per dispatch.
    pub fn on(&self, listener: Listener<M>) {
        self.inner.listeners.add(listener);
    }

    /// Removes the earliest registration of `listener`; unknown listeners are ignored.
    pub fn off(&self, listener: &Listener<M>) -> bool {
        self.inner.listeners.remove(listener)
    }

    /// Registers a closure and returns the handle needed to remove it.
    pub fn subscribe(&self, f: impl Fn(&M) + Send + Sync + 'static) -> Listener<M> {
        let handle = listener(f);
        self.on(Arc::clone(&handle));
        handle
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl<M, Ev, Ef> LoopInner<M, Ev, Ef>
where
    M: Clone + Send + 'static,
{
    fn start(&self, initiator: &dyn Initiator<M, Ef>) -> Result<(), DispatchError> {
        let _turn = self.gate.enter();
        let next = {
            let model = lock(&self.model);
            initiator.init(&model)
        };
        loop_debug!(
            "initiator: model_change={} effects={}",
            next.has_model_change(),
            next.effects.len()
        );
        self.apply(next)
    }

    fn apply(&self, next: Next<M, Ef>) -> Result<(), DispatchError> {
        let (model, effects) = next.into_parts();
        if let Some(model) = model {
            *lock(&self.model) = model;
        }

        let failures = self.deliver(&effects);
        self.notify();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::Effects(failures))
        }
    }

    /// Effect-major, handler-minor. A failing handler does not stop delivery.
    fn deliver(&self, effects: &[Ef]) -> Vec<EffectFailure> {
        let mut failures = Vec::new();
        for (effect_index, effect) in effects.iter().enumerate() {
            for (handler_index, handler) in self.handlers.iter().enumerate() {
                loop_trace!("deliver effect #{} to handler #{}", effect_index, handler_index);
                if let Err(error) = handler.handle(effect, &self.dispatcher) {
                    loop_warn!(
                        "effect #{} handler #{} failed: {:#}",
                        effect_index,
                        handler_index,
                        error
                    );
                    failures.push(EffectFailure {
                        effect_index,
                        handler_index,
                        error,
                    });
                }
            }
        }
        failures
    }

    fn notify(&self) {
        let listeners = self.listeners.snapshot();
        for (index, listener) in listeners.iter().enumerate() {
            // Each listener sees the model as it is when its turn comes,
            // including updates from dispatches nested in earlier listeners.
            let model = lock(&self.model).clone();
            loop_trace!("notify listener #{}", index);
            listener(&model);
        }
    }
}

impl<M, Ev, Ef> DispatchTarget<Ev> for LoopInner<M, Ev, Ef>
where
    M: Clone + Send + 'static,
{
    fn dispatch_event(&self, event: Ev) -> Result<(), DispatchError> {
        let turn = self.gate.enter();
        loop_debug!(
            "dispatch start depth={} thread_depth={}",
            turn.depth(),
            loop_logging::dispatch_depth()
        );

        // Commit happens in `apply`, only after the updater has returned.
        let next = {
            let model = lock(&self.model);
            self.updater.update(&model, &event)
        };
        let result = self.apply(next);

        loop_debug!("dispatch done depth={} ok={}", turn.depth(), result.is_ok());
        result
    }
}

/// Configuration surface for a [`Loop`].
pub struct LoopBuilder<M, Ev, Ef> {
    default_model: M,
    updater: Box<dyn Updater<M, Ev, Ef>>,
    handlers: Vec<Box<dyn EffectHandler<Ef, Ev>>>,
    initiator: Box<dyn Initiator<M, Ef>>,
    sources: Vec<Box<dyn EventSource<Ev>>>,
}

impl<M, Ev, Ef> LoopBuilder<M, Ev, Ef>
where
    M: Clone + Send + 'static,
    Ev: 'static,
    Ef: 'static,
{
    pub fn new(default_model: M, updater: impl Updater<M, Ev, Ef> + 'static) -> Self {
        Self {
            default_model,
            updater: Box::new(updater),
            handlers: Vec::new(),
            initiator: Box::new(NoInit),
            sources: Vec::new(),
        }
    }

    /// Appends a handler. Handlers run in the order they were added.
    pub fn effect_handler(mut self, handler: impl EffectHandler<Ef, Ev> + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Replaces the initiator (default: [`NoInit`]).
    pub fn initiator(mut self, initiator: impl Initiator<M, Ef> + 'static) -> Self {
        self.initiator = Box::new(initiator);
        self
    }

    pub fn event_source(mut self, source: impl EventSource<Ev> + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn build(self) -> Result<Loop<M, Ev, Ef>, DispatchError> {
        Loop::new(
            self.default_model,
            BoxedUpdater(self.updater),
            self.handlers,
            BoxedInitiator(self.initiator),
            self.sources,
        )
    }
}

struct BoxedUpdater<M, Ev, Ef>(Box<dyn Updater<M, Ev, Ef>>);

impl<M, Ev, Ef> Updater<M, Ev, Ef> for BoxedUpdater<M, Ev, Ef> {
    fn update(&self, model: &M, event: &Ev) -> Next<M, Ef> {
        self.0.update(model, event)
    }
}

struct BoxedInitiator<M, Ef>(Box<dyn Initiator<M, Ef>>);

impl<M, Ef> Initiator<M, Ef> for BoxedInitiator<M, Ef> {
    fn init(&self, model: &M) -> Next<M, Ef> {
        self.0.init(model)
    }
}
