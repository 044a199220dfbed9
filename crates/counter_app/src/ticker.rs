use std::thread;
use std::time::Duration;

use loop_core::{DispatchError, Dispatcher, EventSource};
use loop_logging::{loop_debug, loop_warn};

use crate::Event;

/// Event source that dispatches `Event::Tick(1..=count)` from a background thread.
pub struct Ticker {
    interval: Duration,
    count: u32,
}

impl Ticker {
    pub fn new(interval: Duration, count: u32) -> Self {
        Self { interval, count }
    }
}

impl EventSource<Event> for Ticker {
    fn produce(self: Box<Self>, dispatch: Dispatcher<Event>) {
        let Ticker { interval, count } = *self;
        thread::spawn(move || {
            for n in 1..=count {
                thread::sleep(interval);
                match dispatch.dispatch(Event::Tick(n)) {
                    Ok(()) => {}
                    Err(DispatchError::Closed) => {
                        loop_debug!("ticker stopping: loop closed at tick {}", n);
                        return;
                    }
                    Err(err) => loop_warn!("tick {} failed: {}", n, err),
                }
            }
        });
    }
}
