use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::OnceLock;

use lazy_static::lazy_static;
use parking_lot::Mutex;

use crate::error::DecodeError;
use crate::loggable::{ArgKind, ArgValue};
use crate::record_codec::PayloadReader;

/// Immutable binding of a format template to an ordered argument-kind list.
///
/// One descriptor exists per distinct (format string, kind list) pairing for
/// the lifetime of the process. Every record references its descriptor by
/// identity, and any number of producer threads plus the single consumer may
/// read a descriptor concurrently: it has no mutable state at all.
///
/// Placeholders are `{}`; `{{` and `}}` escape to literal braces.
#[derive(Debug)]
pub struct FormatDescriptor {
    template: &'static str,
    segments: Vec<Segment>,
    kinds: Vec<ArgKind>,
}

#[derive(Debug)]
enum Segment {
    Literal(String),
    Placeholder,
}

impl FormatDescriptor {
    fn new(template: &'static str, kinds: &[ArgKind]) -> Self {
        Self { template, segments: parse_segments(template), kinds: kinds.to_vec() }
    }

    /// The original format string.
    pub fn template(&self) -> &'static str {
        self.template
    }

    /// The argument kinds this descriptor expects, in payload order.
    pub fn kinds(&self) -> &[ArgKind] {
        &self.kinds
    }

    /// Renders one record's argument bytes through this template into `out`.
    ///
    /// Pure function of its inputs: literal spans are copied verbatim and
    /// each placeholder pulls the next argument from `reader` at the kind
    /// registered for that position. Placeholders beyond the kind list
    /// render as a literal `{}`; trailing arguments without a placeholder
    /// stay unrendered. Bytes are consumed in exactly the order they were
    /// written, so a decode error aborts the rest of the record.
    pub fn render(&self, reader: &mut PayloadReader<'_>, out: &mut String) -> Result<(), DecodeError> {
        let mut kinds = self.kinds.iter();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder => match kinds.next() {
                    Some(kind) => render_value(reader.read_value(*kind)?, out),
                    None => out.push_str("{}"),
                },
            }
        }
        Ok(())
    }
}

fn render_value(value: ArgValue<'_>, out: &mut String) {
    // Infallible: writing into a String cannot fail.
    let _ = match value {
        ArgValue::Int(v) => write!(out, "{}", v),
        ArgValue::Uint(v) => write!(out, "{}", v),
        ArgValue::Float(v) => write!(out, "{}", v),
        ArgValue::Bool(v) => write!(out, "{}", v),
        ArgValue::Text(v) => write!(out, "{}", v),
    };
}

fn parse_segments(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '{' if chars.peek() == Some(&'}') => {
                chars.next();
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            c => literal.push(c),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Compile-time check that a format string's braces are balanced.
///
/// Used by the logging macros through a `const` assertion so a malformed
/// template is a build error at the call site, not a runtime surprise.
#[doc(hidden)]
pub const fn validate_format(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut in_brace = false;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'{' {
                    i += 2;
                    continue;
                }
                if in_brace {
                    return false; // Nested braces not allowed
                }
                in_brace = true;
            }
            b'}' => {
                if !in_brace && i + 1 < bytes.len() && bytes[i + 1] == b'}' {
                    i += 2;
                    continue;
                }
                if !in_brace {
                    return false; // Unmatched closing brace
                }
                in_brace = false;
            }
            _ => {}
        }
        i += 1;
    }
    !in_brace
}

#[derive(PartialEq, Eq, Hash)]
struct DescriptorKey {
    template: &'static str,
    kinds: Vec<ArgKind>,
}

lazy_static! {
    /// Process-wide descriptor registry.
    ///
    /// Deduplicates on (format string, kind list). Descriptors are leaked
    /// into `'static` on first registration; they live as long as the
    /// process, matching the lifetime of the call sites that produced them.
    static ref DESCRIPTORS: Mutex<HashMap<DescriptorKey, &'static FormatDescriptor>> =
        Mutex::new(HashMap::new());
}

/// Returns the unique descriptor for `(template, kinds)`, creating it on
/// first use.
///
/// The registry lock is held only here; call sites cache the returned
/// reference in a [`CallSite`] so steady-state logging never touches it.
pub fn descriptor_for(template: &'static str, kinds: &[ArgKind]) -> &'static FormatDescriptor {
    let mut registry = DESCRIPTORS.lock();
    if let Some(&descriptor) = registry.get(&DescriptorKey { template, kinds: kinds.to_vec() }) {
        return descriptor;
    }
    let descriptor: &'static FormatDescriptor = Box::leak(Box::new(FormatDescriptor::new(template, kinds)));
    registry.insert(DescriptorKey { template, kinds: kinds.to_vec() }, descriptor);
    descriptor
}

/// Per-call-site cache of one descriptor reference.
///
/// A logging macro expands to a `static CallSite`, so each call site pays
/// the registry lookup exactly once and thereafter reads an initialized
/// `OnceLock`. The static itself is the stable call-site identity the wire
/// format relies on.
pub struct CallSite {
    descriptor: OnceLock<&'static FormatDescriptor>,
}

impl CallSite {
    pub const fn new() -> Self {
        Self { descriptor: OnceLock::new() }
    }

    pub fn descriptor(&self, template: &'static str, kinds: &[ArgKind]) -> &'static FormatDescriptor {
        *self.descriptor.get_or_init(|| descriptor_for(template, kinds))
    }
}
