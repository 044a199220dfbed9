//! Counter demo: a ticking counter driven through the update loop.
mod app;
mod counter;
mod effects;
mod settings;
mod ticker;

pub use app::{run, RunReport};
pub use counter::{
    app_updater, init, update_counter, update_progress, AppModel, Counter, Effect, Event, Progress,
};
pub use effects::{ConsoleHandler, FinishHandler};
pub use settings::{load_settings, AppSettings, LogSetting, SettingsError, DEFAULT_SETTINGS_FILE};
pub use ticker::Ticker;
