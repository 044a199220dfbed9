//! Counter domain: model, events, effects and the pure updaters.
use loop_core::{
    combine_updaters, dispatch_effects, next, next_model, no_change, CombineError,
    CombinedUpdater, Next,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Counter {
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Progress {
    pub seen: u32,
    pub limit: u32,
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppModel {
    pub counter: Counter,
    pub progress: Progress,
}

impl AppModel {
    pub fn new(start: i64, limit: u32) -> Self {
        Self {
            counter: Counter { value: start },
            progress: Progress {
                seen: 0,
                limit,
                finished: false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Ticker fired for the n-th time, starting at 1.
    Tick(u32),
    Incremented,
    Decremented,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PlaySound,
    Announce(i64),
    Finish,
}

/// Every third tick counts down; the others count up with a sound.
pub fn update_counter(model: &Counter, event: &Event) -> Next<Counter, Effect> {
    match event {
        Event::Tick(n) if n % 3 == 0 => next_model(Counter {
            value: model.value - 1,
        }),
        Event::Tick(_) | Event::Incremented => next(
            Counter {
                value: model.value + 1,
            },
            vec![Effect::PlaySound],
        ),
        Event::Decremented => next_model(Counter {
            value: model.value - 1,
        }),
    }
}

pub fn update_progress(model: &Progress, event: &Event) -> Next<Progress, Effect> {
    match event {
        Event::Tick(_) if model.finished => no_change(),
        Event::Tick(n) => {
            let finished = *n >= model.limit;
            let progress = Progress {
                seen: *n,
                limit: model.limit,
                finished,
            };
            let effects = if finished {
                vec![Effect::Finish]
            } else {
                Vec::new()
            };
            next(progress, effects)
        }
        Event::Incremented | Event::Decremented => no_change(),
    }
}

pub fn app_updater() -> Result<CombinedUpdater<AppModel, Event, Effect>, CombineError> {
    combine_updaters()
        .field(
            "counter",
            |m: &AppModel| &m.counter,
            |m: &mut AppModel, v| m.counter = v,
            update_counter,
        )
        .field(
            "progress",
            |m: &AppModel| &m.progress,
            |m: &mut AppModel, v| m.progress = v,
            update_progress,
        )
        .build()
}

/// Announces the starting value.
pub fn init(model: &AppModel) -> Next<AppModel, Effect> {
    dispatch_effects(vec![Effect::Announce(model.counter.value)])
}
