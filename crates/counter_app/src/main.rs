use std::env;
use std::path::PathBuf;

use counter_app::{load_settings, run, DEFAULT_SETTINGS_FILE};

fn main() -> anyhow::Result<()> {
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let settings = load_settings(&path)?;
    loop_logging::initialize(&settings.log.destination(), settings.level());

    let report = run(&settings)?;
    println!(
        "final counter: {} after {} tick(s), {} beep(s)",
        report.model.counter.value, report.model.progress.seen, report.beeps
    );
    Ok(())
}
