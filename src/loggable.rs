use std::fmt;

/// The wire kind of one encoded argument.
///
/// A [`FormatDescriptor`](crate::FormatDescriptor) carries the ordered kind
/// list once per call site; records carry no per-field tags, so encode and
/// decode must walk the same kinds in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// Signed integers, widened to `i64`.
    Int,
    /// Unsigned integers, widened to `u64`.
    Uint,
    /// Floating point, widened to `f64`.
    Float,
    /// One byte, 0 or 1.
    Bool,
    /// UTF-8 bytes followed by a NUL sentinel.
    Text,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKind::Int => "integer",
            ArgKind::Uint => "unsigned integer",
            ArgKind::Float => "float",
            ArgKind::Bool => "bool",
            ArgKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// A borrowed argument value on its way into a record payload.
#[derive(Debug, Clone, Copy)]
pub enum ArgValue<'a> {
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Text(&'a str),
}

impl ArgValue<'_> {
    pub fn kind(&self) -> ArgKind {
        match self {
            ArgValue::Int(_) => ArgKind::Int,
            ArgValue::Uint(_) => ArgKind::Uint,
            ArgValue::Float(_) => ArgKind::Float,
            ArgValue::Bool(_) => ArgKind::Bool,
            ArgValue::Text(_) => ArgKind::Text,
        }
    }
}

/// A type that can travel through a log record.
/// Implemented for the primitive scalars, `bool`, and string types.
pub trait LogArg {
    fn kind(&self) -> ArgKind;
    fn value(&self) -> ArgValue<'_>;
}

macro_rules! impl_int_arg {
    ($($ty:ty),*) => {$(
        impl LogArg for $ty {
            fn kind(&self) -> ArgKind { ArgKind::Int }
            fn value(&self) -> ArgValue<'_> { ArgValue::Int(*self as i64) }
        }
    )*};
}

macro_rules! impl_uint_arg {
    ($($ty:ty),*) => {$(
        impl LogArg for $ty {
            fn kind(&self) -> ArgKind { ArgKind::Uint }
            fn value(&self) -> ArgValue<'_> { ArgValue::Uint(*self as u64) }
        }
    )*};
}

impl_int_arg!(i8, i16, i32, i64, isize);
impl_uint_arg!(u8, u16, u32, u64, usize);

impl LogArg for f32 {
    fn kind(&self) -> ArgKind {
        ArgKind::Float
    }
    fn value(&self) -> ArgValue<'_> {
        ArgValue::Float(f64::from(*self))
    }
}

impl LogArg for f64 {
    fn kind(&self) -> ArgKind {
        ArgKind::Float
    }
    fn value(&self) -> ArgValue<'_> {
        ArgValue::Float(*self)
    }
}

impl LogArg for bool {
    fn kind(&self) -> ArgKind {
        ArgKind::Bool
    }
    fn value(&self) -> ArgValue<'_> {
        ArgValue::Bool(*self)
    }
}

impl LogArg for str {
    fn kind(&self) -> ArgKind {
        ArgKind::Text
    }
    fn value(&self) -> ArgValue<'_> {
        ArgValue::Text(self)
    }
}

impl LogArg for String {
    fn kind(&self) -> ArgKind {
        ArgKind::Text
    }
    fn value(&self) -> ArgValue<'_> {
        ArgValue::Text(self.as_str())
    }
}

impl<T: LogArg + ?Sized> LogArg for &T {
    fn kind(&self) -> ArgKind {
        (**self).kind()
    }
    fn value(&self) -> ArgValue<'_> {
        (**self).value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_widening() {
        assert!(matches!(LogArg::value(&42i8), ArgValue::Int(42)));
        assert!(matches!(LogArg::value(&-7i64), ArgValue::Int(-7)));
        assert!(matches!(LogArg::value(&42u16), ArgValue::Uint(42)));
        assert_eq!(LogArg::kind(&42u16), ArgKind::Uint);
    }

    #[test]
    fn test_text_kinds() {
        assert_eq!(LogArg::kind("alpha"), ArgKind::Text);
        assert_eq!(LogArg::kind(&String::from("beta")), ArgKind::Text);
        let s = String::from("gamma");
        assert!(matches!(LogArg::value(&s), ArgValue::Text("gamma")));
    }

    #[test]
    fn test_reference_forwarding() {
        let x = 5i32;
        let r = &x;
        assert_eq!(LogArg::kind(&r), ArgKind::Int);
    }
}
