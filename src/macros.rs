/// Logs a record through a logger with a call-site-bound format descriptor.
///
/// The first use of a call site registers its format string together with
/// the argument kinds derived from the argument expressions, and caches the
/// resulting descriptor in a hidden `static`. Every later hit reuses that
/// descriptor, so encode and decode always agree on the argument order and
/// kinds: there is no way to pair a payload with the wrong descriptor.
///
/// Unbalanced braces in the format string are a compile error. Disabled
/// levels cost one atomic load and a compare; no descriptor lookup, no
/// encoding.
///
/// Returns the logging result; the only synchronous failure is an
/// [`EncodeError`](crate::EncodeError).
///
/// # Examples
///
/// ```
/// use flashlog::{log_event, Level, Logger, Sink};
/// use std::io;
///
/// struct Null;
/// impl Sink for Null {
///     fn write(&mut self, _bytes: &[u8]) -> io::Result<()> {
///         Ok(())
///     }
///     fn flush(&mut self) -> io::Result<()> {
///         Ok(())
///     }
/// }
///
/// let logger = Logger::new(Null);
/// log_event!(logger, Level::Info, "value={} name={}", 42, "alpha").unwrap();
/// log_event!(logger, Level::Error, "plain message").unwrap();
/// ```
#[macro_export]
macro_rules! log_event {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        const _: () = assert!(
            $crate::format_registry::validate_format($fmt),
            "unbalanced braces in log format string",
        );
        static CALL_SITE: $crate::format_registry::CallSite =
            $crate::format_registry::CallSite::new();

        let logger = &$logger;
        let level = $level;
        if logger.enabled(level) {
            let descriptor = CALL_SITE.descriptor($fmt, &[$($crate::LogArg::kind(&$arg)),*]);
            logger.log(descriptor, level, &[$($crate::LogArg::value(&$arg)),*])
        } else {
            ::core::result::Result::Ok(())
        }
    }};
}

/// [`log_event!`](crate::log_event) at [`Level::Debug`](crate::Level).
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_event!($logger, $crate::Level::Debug, $fmt $(, $arg)*)
    };
}

/// [`log_event!`](crate::log_event) at [`Level::Info`](crate::Level).
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_event!($logger, $crate::Level::Info, $fmt $(, $arg)*)
    };
}

/// [`log_event!`](crate::log_event) at [`Level::Error`](crate::Level).
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_event!($logger, $crate::Level::Error, $fmt $(, $arg)*)
    };
}

/// [`log_event!`](crate::log_event) at [`Level::Fatal`](crate::Level).
#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log_event!($logger, $crate::Level::Fatal, $fmt $(, $arg)*)
    };
}
