use std::sync::Arc;

use crate::level::Level;
use crate::log_event;
use crate::logger::Logger;

/// Routes records from the `log` facade into a [`Logger`].
///
/// Code written against `log::info!` and friends keeps working while the
/// actual I/O goes through the asynchronous engine. Facade messages arrive
/// pre-formatted, so the bridge allocates one `String` per record. That is
/// fine for glue code; the [`log_event!`](crate::log_event) macros remain
/// the allocation-free hot path.
///
/// The facade has more levels than the engine: `Trace` and `Debug` map to
/// [`Level::Debug`], `Info` to [`Level::Info`], and `Warn` maps up to
/// [`Level::Error`] so warnings survive an error-level filter.
///
/// Messages that do not fit a record payload are dropped silently, matching
/// the facade's infallible contract.
pub struct FacadeBridge {
    logger: Arc<Logger>,
}

impl FacadeBridge {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// Installs the bridge as the process-wide `log` logger.
    ///
    /// Fails if another facade logger was installed first.
    pub fn install(logger: Arc<Logger>, max: log::LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(Self::new(logger)))?;
        log::set_max_level(max);
        Ok(())
    }
}

fn level_from_facade(level: log::Level) -> Level {
    match level {
        log::Level::Error | log::Level::Warn => Level::Error,
        log::Level::Info => Level::Info,
        log::Level::Debug | log::Level::Trace => Level::Debug,
    }
}

impl log::Log for FacadeBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.logger.enabled(level_from_facade(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        let level = level_from_facade(record.level());
        if !self.logger.enabled(level) {
            return;
        }
        let message = record.args().to_string();
        let _ = log_event!(self.logger, level, "{}", message);
    }

    fn flush(&self) {
        let _ = self.logger.drain_once();
    }
}
