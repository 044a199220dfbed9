use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{mpsc, Arc, Mutex};

use anyhow::anyhow;
use loop_core::{Dispatcher, EffectHandler};
use loop_logging::{loop_debug, loop_info};

use crate::{Effect, Event};

/// Plays (logs) sounds and announcements. Counts beeps for the run report.
#[derive(Debug, Default)]
pub struct ConsoleHandler {
    beeps: Arc<AtomicU32>,
}

impl ConsoleHandler {
    pub fn new(beeps: Arc<AtomicU32>) -> Self {
        Self { beeps }
    }
}

impl EffectHandler<Effect, Event> for ConsoleHandler {
    fn handle(&self, effect: &Effect, _dispatch: &Dispatcher<Event>) -> anyhow::Result<()> {
        match effect {
            Effect::PlaySound => {
                let beeps = self.beeps.fetch_add(1, Ordering::SeqCst) + 1;
                loop_info!("beep #{}", beeps);
            }
            Effect::Announce(value) => {
                loop_info!("counter starts at {}", value);
            }
            Effect::Finish => {}
        }
        Ok(())
    }
}

/// Signals the main thread once the run is finished.
pub struct FinishHandler {
    done_tx: Mutex<mpsc::Sender<()>>,
}

impl FinishHandler {
    pub fn new(done_tx: mpsc::Sender<()>) -> Self {
        Self {
            done_tx: Mutex::new(done_tx),
        }
    }
}

impl EffectHandler<Effect, Event> for FinishHandler {
    fn handle(&self, effect: &Effect, _dispatch: &Dispatcher<Event>) -> anyhow::Result<()> {
        if *effect != Effect::Finish {
            return Ok(());
        }
        loop_debug!("finish requested");
        let tx = self
            .done_tx
            .lock()
            .map_err(|_| anyhow!("finish channel lock poisoned"))?;
        tx.send(())
            .map_err(|_| anyhow!("run already abandoned; finish not delivered"))
    }
}
