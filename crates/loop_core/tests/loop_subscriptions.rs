use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};

use loop_core::{listener, next_model, Listener, Loop, Next, NoInit};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Model {
    counter: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Incremented,
}

fn update(model: &Model, event: &Event) -> Next<Model, ()> {
    match event {
        Event::Incremented => next_model(Model {
            counter: model.counter + 1,
        }),
    }
}

fn counter_loop() -> Loop<Model, Event, ()> {
    Loop::new(Model::default(), update, Vec::new(), NoInit, Vec::new()).unwrap()
}

fn counting_listener(count: &Arc<AtomicUsize>) -> Listener<Model> {
    let count = Arc::clone(count);
    listener(move |_model: &Model| {
        count.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn can_subscribe_to_model_changes() {
    let lp = counter_loop();
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    lp.subscribe(move |model: &Model| {
        tx.lock().unwrap().send(model.counter).unwrap();
    });

    assert_eq!(lp.current_model().counter, 0);
    lp.dispatch(Event::Incremented).unwrap();

    assert_eq!(rx.try_recv().unwrap(), 1);
}

#[test]
fn can_unsubscribe_from_model_changes() {
    let lp = counter_loop();
    let count = Arc::new(AtomicUsize::new(0));
    let callback = counting_listener(&count);
    lp.on(Arc::clone(&callback));

    assert_eq!(count.load(Ordering::SeqCst), 0);
    lp.dispatch(Event::Incremented).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);

    assert!(lp.off(&callback));
    lp.dispatch(Event::Incremented).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn can_unsubscribe_without_failing() {
    let lp = counter_loop();
    let count = Arc::new(AtomicUsize::new(0));
    let registered = counting_listener(&count);
    lp.on(Arc::clone(&registered));
    let stranger = counting_listener(&count);

    assert!(!lp.off(&stranger));
    assert_eq!(lp.listener_count(), 1);

    lp.dispatch(Event::Incremented).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn double_registration_is_called_twice_and_removed_once() {
    let lp = counter_loop();
    let count = Arc::new(AtomicUsize::new(0));
    let callback = counting_listener(&count);
    lp.on(Arc::clone(&callback));
    lp.on(Arc::clone(&callback));

    lp.dispatch(Event::Incremented).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);

    lp.off(&callback);
    lp.dispatch(Event::Incremented).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[test]
fn listeners_run_in_registration_order() {
    let lp = counter_loop();
    let order = Arc::new(Mutex::new(Vec::new()));
    for name in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        lp.subscribe(move |_model: &Model| order.lock().unwrap().push(name));
    }

    lp.dispatch(Event::Incremented).unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
}

#[test]
fn registration_during_notification_waits_for_next_dispatch() {
    let lp = counter_loop();
    let late_calls = Arc::new(AtomicUsize::new(0));
    let late = counting_listener(&late_calls);

    let handle = lp.clone();
    let added = Arc::new(AtomicUsize::new(0));
    let added_flag = Arc::clone(&added);
    lp.subscribe(move |_model: &Model| {
        if added_flag.fetch_add(1, Ordering::SeqCst) == 0 {
            handle.on(Arc::clone(&late));
        }
    });

    lp.dispatch(Event::Incremented).unwrap();
    assert_eq!(late_calls.load(Ordering::SeqCst), 0);

    lp.dispatch(Event::Incremented).unwrap();
    assert_eq!(late_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn removal_during_notification_does_not_skip_snapshot() {
    let lp = counter_loop();
    let count = Arc::new(AtomicUsize::new(0));
    let second = counting_listener(&count);

    let handle = lp.clone();
    let target = Arc::clone(&second);
    lp.subscribe(move |_model: &Model| {
        handle.off(&target);
    });
    lp.on(Arc::clone(&second));

    lp.dispatch(Event::Incremented).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);

    lp.dispatch(Event::Incremented).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(lp.listener_count(), 1);
}
