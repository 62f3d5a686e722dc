use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Severity of a log record.
///
/// Levels are ordered: `Debug < Info < Error < Fatal`. A [`Logger`] only
/// enqueues records at or above its configured minimum level.
///
/// [`Logger`]: crate::Logger
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Error = 2,
    Fatal = 3,
}

impl Level {
    /// Returns the fixed-width name used in rendered log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    /// Reconstructs a level from its record tag byte.
    pub const fn from_tag(tag: u8) -> Option<Level> {
        match tag {
            0 => Some(Level::Debug),
            1 => Some(Level::Info),
            2 => Some(Level::Error),
            3 => Some(Level::Fatal),
            _ => None,
        }
    }

    /// The tag byte written as the first byte of a record payload.
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBUG" | "debug" => Ok(Level::Debug),
            "INFO" | "info" => Ok(Level::Info),
            "ERROR" | "error" => Ok(Level::Error),
            "FATAL" | "fatal" => Ok(Level::Fatal),
            other => Err(ConfigError::UnknownLevel(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn test_tag_round_trip() {
        for level in [Level::Debug, Level::Info, Level::Error, Level::Fatal] {
            assert_eq!(Level::from_tag(level.tag()), Some(level));
        }
        assert_eq!(Level::from_tag(4), None);
        assert_eq!(Level::from_tag(255), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("DEBUG".parse::<Level>().unwrap(), Level::Debug);
        assert_eq!("info".parse::<Level>().unwrap(), Level::Info);
        assert!("WARNING".parse::<Level>().is_err());
    }
}
