use crate::error::{DecodeError, EncodeError};
use crate::format_registry::FormatDescriptor;
use crate::level::Level;
use crate::loggable::{ArgKind, ArgValue};

/// Total payload capacity of one record in bytes, level tag included.
///
/// Records are fixed-size so a queue slot is a plain copy with no heap
/// allocation on the logging path. Argument lists that would not fit are
/// rejected at encode time.
pub const RECORD_CAPACITY: usize = 1024;

/// One encoded log message, the unit moved through a ring buffer.
///
/// The first payload byte is the level tag; the rest is the serialized
/// argument list. The payload layout is determined entirely by the
/// argument-kind sequence of the record's [`FormatDescriptor`]; records
/// carry no per-field tags or length prefixes of their own.
#[derive(Debug)]
pub struct LogRecord {
    descriptor: &'static FormatDescriptor,
    len: u16,
    payload: [u8; RECORD_CAPACITY],
}

impl LogRecord {
    /// The descriptor this record was encoded against.
    pub fn descriptor(&self) -> &'static FormatDescriptor {
        self.descriptor
    }

    /// Bytes of payload in use, level tag included.
    pub fn payload_len(&self) -> usize {
        self.len as usize
    }

    /// The record's severity, decoded from the tag byte.
    pub fn level(&self) -> Result<Level, DecodeError> {
        let tag = self.payload[0];
        Level::from_tag(tag).ok_or(DecodeError::UnknownLevel(tag))
    }

    /// Renders the message text (no timestamp or level prefix) into `out`.
    ///
    /// Walks the descriptor's template, pulling each argument back out of
    /// the payload in exactly the order it was written.
    pub fn render_message(&self, out: &mut String) -> Result<(), DecodeError> {
        let mut reader = PayloadReader::new(&self.payload[1..self.len as usize]);
        self.descriptor.render(&mut reader, out)
    }
}

/// Serializes `level` and `args` into a fresh record.
///
/// Arguments are written in call order: scalars in native byte layout, text
/// as raw bytes plus a NUL sentinel. Fails without side effects if the
/// encoded form would exceed [`RECORD_CAPACITY`].
pub fn encode(
    descriptor: &'static FormatDescriptor,
    level: Level,
    args: &[ArgValue<'_>],
) -> Result<LogRecord, EncodeError> {
    let mut payload = [0u8; RECORD_CAPACITY];
    let mut writer = PayloadWriter::new(&mut payload);
    writer.put(&[level.tag()])?;
    for arg in args {
        writer.write_value(*arg)?;
    }
    let len = writer.position() as u16;
    Ok(LogRecord { descriptor, len, payload })
}

/// Typed write cursor over a record payload.
///
/// The cursor is the only way bytes enter a payload; there are no raw
/// pointer casts anywhere in the wire format.
pub struct PayloadWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> PayloadWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            return Err(EncodeError::PayloadOverflow { needed: end, capacity: self.buf.len() });
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    pub fn write_i64(&mut self, v: i64) -> Result<(), EncodeError> {
        self.put(&v.to_ne_bytes())
    }

    pub fn write_u64(&mut self, v: u64) -> Result<(), EncodeError> {
        self.put(&v.to_ne_bytes())
    }

    pub fn write_f64(&mut self, v: f64) -> Result<(), EncodeError> {
        self.put(&v.to_ne_bytes())
    }

    pub fn write_bool(&mut self, v: bool) -> Result<(), EncodeError> {
        self.put(&[u8::from(v)])
    }

    /// Raw bytes plus the terminating sentinel. Interior NUL bytes are
    /// rejected: the sentinel is the only field delimiter on the wire.
    pub fn write_text(&mut self, s: &str) -> Result<(), EncodeError> {
        if s.as_bytes().contains(&0) {
            return Err(EncodeError::InteriorNul);
        }
        self.put(s.as_bytes())?;
        self.put(&[0])
    }

    pub fn write_value(&mut self, value: ArgValue<'_>) -> Result<(), EncodeError> {
        match value {
            ArgValue::Int(v) => self.write_i64(v),
            ArgValue::Uint(v) => self.write_u64(v),
            ArgValue::Float(v) => self.write_f64(v),
            ArgValue::Bool(v) => self.write_bool(v),
            ArgValue::Text(v) => self.write_text(v),
        }
    }
}

/// Typed read cursor over a record payload, the decode-side twin of
/// [`PayloadWriter`].
pub struct PayloadReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize, kind: ArgKind) -> Result<&'a [u8], DecodeError> {
        let end = self.pos + n;
        if end > self.buf.len() {
            return Err(DecodeError::Truncated(kind));
        }
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        let bytes = self.take(8, ArgKind::Int)?;
        Ok(i64::from_ne_bytes(bytes.try_into().expect("take returned 8 bytes")))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        let bytes = self.take(8, ArgKind::Uint)?;
        Ok(u64::from_ne_bytes(bytes.try_into().expect("take returned 8 bytes")))
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        let bytes = self.take(8, ArgKind::Float)?;
        Ok(f64::from_ne_bytes(bytes.try_into().expect("take returned 8 bytes")))
    }

    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        let bytes = self.take(1, ArgKind::Bool)?;
        Ok(bytes[0] != 0)
    }

    pub fn read_text(&mut self) -> Result<&'a str, DecodeError> {
        let rest = &self.buf[self.pos..];
        let nul = rest.iter().position(|&b| b == 0).ok_or(DecodeError::UnterminatedText)?;
        let bytes = &rest[..nul];
        self.pos += nul + 1;
        std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)
    }

    /// Reads the next argument as `kind` and returns it as a borrowed value.
    pub fn read_value(&mut self, kind: ArgKind) -> Result<ArgValue<'a>, DecodeError> {
        match kind {
            ArgKind::Int => self.read_i64().map(ArgValue::Int),
            ArgKind::Uint => self.read_u64().map(ArgValue::Uint),
            ArgKind::Float => self.read_f64().map(ArgValue::Float),
            ArgKind::Bool => self.read_bool().map(ArgValue::Bool),
            ArgKind::Text => self.read_text().map(ArgValue::Text),
        }
    }
}
