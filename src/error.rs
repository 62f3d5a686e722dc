use thiserror::Error;

use crate::loggable::ArgKind;

/// Errors raised while serializing arguments into a record payload.
///
/// Encoding failures are the only failures a logging call surfaces
/// synchronously; the record is rejected and nothing is enqueued.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// The serialized argument list does not fit in the fixed record payload.
    #[error("encoded arguments need {needed} bytes but the record payload holds {capacity}")]
    PayloadOverflow { needed: usize, capacity: usize },

    /// A text argument contains an interior NUL byte, which would collide
    /// with the terminating sentinel on the wire.
    #[error("text argument contains an interior NUL byte")]
    InteriorNul,
}

/// Errors raised while reading arguments back out of a record payload.
///
/// With descriptors and payloads produced by the same call site these cannot
/// occur; they exist so a corrupted record fails loudly instead of
/// desynchronizing the rest of the drain pass.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload ended in the middle of a fixed-width argument.
    #[error("record payload ended while reading a {0} argument")]
    Truncated(ArgKind),

    /// A text argument has no terminating sentinel before the payload end.
    #[error("text argument is missing its terminating NUL byte")]
    UnterminatedText,

    /// A text argument is not valid UTF-8.
    #[error("text argument is not valid UTF-8")]
    InvalidUtf8,

    /// The first payload byte is not a known level tag.
    #[error("record carries unknown level tag {0}")]
    UnknownLevel(u8),
}

/// Errors raised by logger and scheduler configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Ring buffer capacities must be powers of two so index wrap-around
    /// reduces to a mask.
    #[error("queue capacity must be a power of two, got {0}")]
    CapacityNotPowerOfTwo(usize),

    /// One slot is always kept free to distinguish empty from full, so a
    /// queue needs at least two slots to hold anything.
    #[error("queue capacity must be at least 2, got {0}")]
    CapacityTooSmall(usize),

    /// A level name that is none of DEBUG, INFO, ERROR, FATAL.
    #[error("unknown log level name: {0:?}")]
    UnknownLevel(String),
}
