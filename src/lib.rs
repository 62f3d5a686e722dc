//! # flashlog
//!
//! A low-latency asynchronous logging engine. Call sites hand off a level
//! and a small set of typed arguments; a background task renders and
//! persists the messages later. The logging path blocks on neither I/O nor
//! string formatting and allocates nothing on the heap.
//!
//! ## Key Features
//!
//! * Lock-free single-producer/single-consumer queue per (logger, thread)
//!   pair, so producers never contend with each other or with the consumer
//! * Fixed-size binary records: arguments are serialized once, cheaply, and
//!   formatted only at drain time
//! * One immutable format descriptor per call site, registered on first use
//!   and shared across all threads
//! * A periodic drain scheduler that holds loggers weakly and prunes them
//!   when the last owner is gone
//!
//! ## Main Components
//!
//! * [`Logger`]: public handle; enqueues records and drains them to a sink
//! * [`RingBuffer`]: the SPSC queue carrying records between threads
//! * [`FormatDescriptor`]: immutable template + argument-kind binding
//! * [`DrainScheduler`]: background task invoking [`Logger::drain_once`]
//! * [`log_event!`], [`log_info!`] and friends: call-site macros binding
//!   one descriptor per site
//!
//! ## Quick Start
//!
//! ```
//! use flashlog::{log_error, log_info, Level, Logger, Sink};
//! use std::io;
//! use std::sync::Arc;
//!
//! struct Memory(Vec<u8>);
//! impl Sink for Memory {
//!     fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
//!         self.0.extend_from_slice(bytes);
//!         Ok(())
//!     }
//!     fn flush(&mut self) -> io::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let logger = Arc::new(Logger::new(Memory(Vec::new())));
//!
//! log_info!(logger, "listening on port {}", 8080u16).unwrap();
//! log_error!(logger, "lost connection to {}", "upstream").unwrap();
//!
//! // Normally a DrainScheduler does this on an interval.
//! assert_eq!(logger.drain_once().unwrap(), 2);
//! ```
//!
//! ## Ordering
//!
//! Within one thread, output order is exactly program order. Across
//! threads there is no global order: drain interleaves queues in
//! registration order and timestamps are assigned at drain time, so lines
//! from different threads can appear out of causal order. This is the
//! price of a hot path with no cross-thread synchronization at all.

pub mod compat;
pub mod error;
pub mod format_registry;
pub mod level;
pub mod loggable;
pub mod logger;
mod macros;
pub mod record_codec;
pub mod ring_buffer;
pub mod scheduler;
pub mod sink;
pub mod thread_queues;

pub use compat::FacadeBridge;
pub use error::{ConfigError, DecodeError, EncodeError};
pub use format_registry::{CallSite, FormatDescriptor};
pub use level::Level;
pub use loggable::{ArgKind, ArgValue, LogArg};
pub use logger::{Logger, LoggerOptions};
pub use record_codec::{encode, LogRecord, PayloadReader, PayloadWriter, RECORD_CAPACITY};
pub use ring_buffer::RingBuffer;
pub use scheduler::{DrainScheduler, DEFAULT_DRAIN_INTERVAL};
pub use sink::{FileSink, Sink, StderrSink};
pub use thread_queues::{MessageQueue, ThreadQueueRegistry};
