use parking_lot::Mutex;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;

use crate::error::{ConfigError, EncodeError};
use crate::format_registry::FormatDescriptor;
use crate::level::Level;
use crate::loggable::ArgValue;
use crate::record_codec;
use crate::sink::{FileSink, Sink};
use crate::thread_queues::ThreadQueueRegistry;

/// Configuration for a [`Logger`].
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    /// Records below this level cost one atomic load and a compare, nothing
    /// else. Default: [`Level::Info`].
    pub min_level: Level,
    /// Slots per per-thread queue; must be a power of two, one slot stays
    /// free. Default: 1024.
    pub queue_capacity: usize,
    /// How long an exiting thread waits for the consumer to drain its
    /// remaining records before deregistering. Default: 500 ms.
    pub exit_grace: Duration,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            min_level: Level::Info,
            queue_capacity: 1024,
            exit_grace: Duration::from_millis(500),
        }
    }
}

impl LoggerOptions {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity < 2 {
            return Err(ConfigError::CapacityTooSmall(self.queue_capacity));
        }
        if !self.queue_capacity.is_power_of_two() {
            return Err(ConfigError::CapacityNotPowerOfTwo(self.queue_capacity));
        }
        Ok(())
    }
}

/// An asynchronous logger.
///
/// A call site hands the logger a level and a typed argument list; the
/// arguments are serialized into a fixed-size record and pushed onto the
/// calling thread's private queue. Neither I/O nor string formatting happens
/// on the logging path; both are deferred to [`drain_once`], which a
/// [`DrainScheduler`] normally invokes on an interval.
///
/// Each producer thread gets its own lock-free queue on its first log call,
/// so concurrent producers never contend with each other. Within one thread
/// the output preserves program order exactly; across threads no global
/// order is guaranteed, and drain-time timestamps can make lines from
/// different threads appear out of causal order. That is the accepted trade
/// for keeping the hot path free of synchronization beyond the SPSC
/// protocol.
///
/// Loggers are shared as `Arc<Logger>`: producer threads hold one clone,
/// the scheduler holds a weak reference. Dropping the last handle performs a
/// final drain and flushes the sink.
///
/// # Examples
///
/// ```
/// use flashlog::{log_info, Logger, Sink};
/// use std::io;
/// use std::sync::Arc;
///
/// struct Memory(Vec<u8>);
/// impl Sink for Memory {
///     fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
///         self.0.extend_from_slice(bytes);
///         Ok(())
///     }
///     fn flush(&mut self) -> io::Result<()> {
///         Ok(())
///     }
/// }
///
/// let logger = Arc::new(Logger::new(Memory(Vec::new())));
/// log_info!(logger, "value={} name={}", 42, "alpha").unwrap();
///
/// // One record was queued and one line written.
/// assert_eq!(logger.drain_once().unwrap(), 1);
/// ```
///
/// [`drain_once`]: Logger::drain_once
/// [`DrainScheduler`]: crate::DrainScheduler
pub struct Logger {
    min_level: AtomicU8,
    registry: Arc<ThreadQueueRegistry>,
    // The sink lock doubles as the consumer token: whoever holds it is the
    // single consumer of every queue for the duration of the drain pass.
    sink: Mutex<Box<dyn Sink>>,
}

impl Logger {
    /// Creates a logger with default options writing to `sink`.
    pub fn new(sink: impl Sink + 'static) -> Self {
        // Defaults always validate.
        Self::with_options(sink, LoggerOptions::default()).expect("default options are valid")
    }

    /// Creates a logger with explicit options.
    pub fn with_options(sink: impl Sink + 'static, options: LoggerOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            min_level: AtomicU8::new(options.min_level.tag()),
            registry: Arc::new(ThreadQueueRegistry::new(options.queue_capacity, options.exit_grace)),
            sink: Mutex::new(Box::new(sink)),
        })
    }

    /// Creates a logger appending to the file at `path`.
    pub fn to_file(path: impl Into<PathBuf>) -> io::Result<Self> {
        Ok(Self::new(FileSink::open(path)?))
    }

    /// Creates a logger appending to `<dir>/<base>_<YYYY-MM-DD>.log`,
    /// creating the directory if needed.
    pub fn to_dated_file(dir: impl AsRef<Path>, base: &str) -> io::Result<Self> {
        Ok(Self::new(FileSink::open_dated(dir, base)?))
    }

    /// True if records at `level` currently pass the filter.
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level.tag() >= self.min_level.load(Ordering::Relaxed)
    }

    /// The current minimum level.
    pub fn level(&self) -> Level {
        Level::from_tag(self.min_level.load(Ordering::Relaxed)).expect("level tag set from a Level")
    }

    /// Updates the minimum level filter.
    ///
    /// Takes effect for subsequently enqueued records; visibility to other
    /// threads is prompt but not instantaneous.
    pub fn set_level(&self, level: Level) {
        self.min_level.store(level.tag(), Ordering::Relaxed);
    }

    /// Encodes `args` against `descriptor` and enqueues the record on the
    /// calling thread's queue.
    ///
    /// Filtered levels return `Ok` immediately without encoding anything.
    /// The only synchronous failure is an encoding error; everything past
    /// the queue is asynchronous and best-effort. If the thread's queue is
    /// full this spins until the consumer frees a slot.
    ///
    /// Call sites normally go through [`log_event!`](crate::log_event) and
    /// its level shorthands, which bind the descriptor automatically.
    pub fn log(
        &self,
        descriptor: &'static FormatDescriptor,
        level: Level,
        args: &[ArgValue<'_>],
    ) -> Result<(), EncodeError> {
        if !self.enabled(level) {
            return Ok(());
        }
        let record = record_codec::encode(descriptor, level, args)?;
        ThreadQueueRegistry::resolve_for_current_thread(&self.registry).push(record);
        Ok(())
    }

    /// Pops every registered queue until empty, rendering and writing one
    /// line per record.
    ///
    /// Lines are `[YYYY-MM-DD HH:MM:SS] [LEVEL] <message>\n`, stamped with
    /// the drain-time local clock and flushed individually. A record that
    /// fails to write is reported to stderr and the pass continues with the
    /// next record; the last write error is returned once the pass is
    /// complete. Returns the number of lines written.
    pub fn drain_once(&self) -> io::Result<usize> {
        let mut sink = self.sink.lock();
        let mut written = 0usize;
        let mut last_error = None;
        let mut line = String::new();

        self.registry.for_each_queue(|queue| {
            while let Some(record) = queue.pop() {
                line.clear();
                let level = match record.level() {
                    Ok(level) => level,
                    Err(err) => {
                        eprintln!("flashlog: dropping corrupt record: {}", err);
                        continue;
                    }
                };
                let _ = write!(line, "[{}] [{}] ", Local::now().format("%Y-%m-%d %H:%M:%S"), level);
                if let Err(err) = record.render_message(&mut line) {
                    eprintln!("flashlog: dropping undecodable record: {}", err);
                    continue;
                }
                line.push('\n');

                match sink.write(line.as_bytes()).and_then(|()| sink.flush()) {
                    Ok(()) => written += 1,
                    Err(err) => {
                        eprintln!("flashlog: failed to write log line: {}", err);
                        last_error = Some(err);
                    }
                }
            }
        });

        match last_error {
            Some(err) => Err(err),
            None => Ok(written),
        }
    }

    /// Number of live per-thread queues.
    pub fn queue_count(&self) -> usize {
        self.registry.queue_count()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Pull whatever is still queued, then flush before the sink closes.
        let _ = self.drain_once();
        let _ = self.sink.lock().flush();
    }
}
