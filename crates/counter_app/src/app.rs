use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use anyhow::Context;
use loop_core::Loop;
use loop_logging::{loop_debug, loop_info};

use crate::effects::{ConsoleHandler, FinishHandler};
use crate::ticker::Ticker;
use crate::{app_updater, init, AppModel, AppSettings};

/// Extra wait beyond the nominal run length before giving up.
const FINISH_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub model: AppModel,
    pub beeps: u32,
}

/// Runs the counter until the ticker has delivered every tick.
pub fn run(settings: &AppSettings) -> anyhow::Result<RunReport> {
    let beeps = Arc::new(AtomicU32::new(0));
    let (done_tx, done_rx) = mpsc::channel();
    let interval = Duration::from_millis(settings.tick_interval_ms);

    let counter_loop = Loop::builder(
        AppModel::new(settings.start, settings.ticks),
        app_updater().context("building updater")?,
    )
    .effect_handler(ConsoleHandler::new(Arc::clone(&beeps)))
    .effect_handler(FinishHandler::new(done_tx))
    .initiator(init)
    .event_source(Ticker::new(interval, settings.ticks))
    .build()
    .context("starting loop")?;

    counter_loop.subscribe(|model: &AppModel| {
        loop_debug!(
            "tick {}/{} counter={}",
            model.progress.seen,
            model.progress.limit,
            model.counter.value
        );
    });

    let budget = interval * settings.ticks + FINISH_GRACE;
    done_rx
        .recv_timeout(budget)
        .context("ticker did not finish in time")?;

    let model = counter_loop.current_model();
    loop_info!("run finished: counter={}", model.counter.value);
    Ok(RunReport {
        model,
        beeps: beeps.load(Ordering::SeqCst),
    })
}
