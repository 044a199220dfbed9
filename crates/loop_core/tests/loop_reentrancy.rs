use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::Context;
use loop_core::{next, next_model, DispatchError, Dispatcher, Loop, Next};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Model {
    counter: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Incremented,
    Decremented,
    Bumped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Effect {
    Undo,
}

fn update(model: &Model, event: &Event) -> Next<Model, Effect> {
    match event {
        Event::Incremented => next(
            Model {
                counter: model.counter + 1,
            },
            vec![Effect::Undo],
        ),
        Event::Decremented => next_model(Model {
            counter: model.counter - 1,
        }),
        Event::Bumped => next_model(Model {
            counter: model.counter + 1,
        }),
    }
}

type Journal = Arc<Mutex<Vec<String>>>;

#[test]
fn nested_dispatch_completes_before_outer_listeners() {
    let journal = Journal::default();
    let log = Arc::clone(&journal);
    let lp = Loop::builder(Model::default(), update)
        .effect_handler(
            move |effect: &Effect, dispatch: &Dispatcher<Event>| -> anyhow::Result<()> {
                log.lock().unwrap().push(format!("handle {effect:?}"));
                dispatch.dispatch(Event::Decremented)?;
                log.lock().unwrap().push("nested returned".to_string());
                Ok(())
            },
        )
        .build()
        .unwrap();
    let log = Arc::clone(&journal);
    lp.subscribe(move |model: &Model| {
        log.lock().unwrap().push(format!("listener {}", model.counter));
    });

    lp.dispatch(Event::Incremented).unwrap();

    // The outer notification already sees the decrement made by the nested dispatch.
    assert_eq!(
        *journal.lock().unwrap(),
        vec![
            "handle Undo".to_string(),
            "listener 0".to_string(),
            "nested returned".to_string(),
            "listener 0".to_string(),
        ]
    );
    assert_eq!(lp.current_model().counter, 0);
}

#[test]
fn listener_may_dispatch_and_later_listeners_see_the_result() {
    let lp = Loop::builder(Model::default(), update).build().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let handle = lp.clone();
    lp.subscribe(move |model: &Model| {
        if model.counter == 1 {
            handle.dispatch(Event::Bumped).unwrap();
        }
    });
    let sink = Arc::clone(&seen);
    lp.subscribe(move |model: &Model| sink.lock().unwrap().push(model.counter));

    lp.dispatch(Event::Bumped).unwrap();

    // Nested notification first (2), then the outer one, which sees 2 as well.
    assert_eq!(*seen.lock().unwrap(), vec![2, 2]);
}

#[test]
fn nested_failure_surfaces_through_the_outer_handler() {
    let lp = Loop::builder(Model::default(), update)
        .effect_handler(
            |_effect: &Effect, dispatch: &Dispatcher<Event>| -> anyhow::Result<()> {
                dispatch
                    .dispatch(Event::Decremented)
                    .context("undo dispatch")?;
                anyhow::bail!("undo rejected")
            },
        )
        .build()
        .unwrap();

    let err = lp.dispatch(Event::Incremented).unwrap_err();

    match err {
        DispatchError::Effects(failures) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].error.to_string(), "undo rejected");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(lp.current_model().counter, 0);
}

#[test]
fn dispatches_from_many_threads_are_serialized() {
    let lp = Loop::builder(Model::default(), update)
        .effect_handler(
            |_effect: &Effect, _dispatch: &Dispatcher<Event>| -> anyhow::Result<()> { Ok(()) },
        )
        .build()
        .unwrap();

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let dispatch = lp.dispatcher();
            thread::spawn(move || {
                for _ in 0..250 {
                    dispatch.dispatch(Event::Bumped).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(lp.current_model().counter, 1000);
}

#[test]
fn thread_events_keep_their_source_order() {
    let lp = Loop::builder(Model::default(), update).build().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    lp.subscribe(move |model: &Model| sink.lock().unwrap().push(model.counter));

    let dispatch = lp.dispatcher();
    thread::spawn(move || {
        for _ in 0..5 {
            dispatch.dispatch(Event::Bumped).unwrap();
        }
    })
    .join()
    .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5]);
}
