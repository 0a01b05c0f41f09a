//! Type-erased value formatting into caller-supplied byte buffers.
//!
//! [`Value`] is a tagged union over the supported kinds (boolean, narrow and
//! wide characters, signed/unsigned integers, narrow and wide strings, and
//! opaque pointers) with `From` conversions from the native types, so one
//! call formats any supported value:
//!
//! ```
//! use syskit::format::format_value;
//!
//! let mut buf = [0u8; 16];
//! assert_eq!(format_value(&mut buf, true, None), 4);
//! assert_eq!(&buf[..5], b"true\0");
//! assert_eq!(format_value(&mut buf, true, Some("%X")), 1);
//! assert_eq!(&buf[..2], b"1\0");
//! assert_eq!(format_value(&mut buf, -42i32, None), 3);
//! assert_eq!(&buf[..4], b"-42\0");
//! ```
//!
//! The optional format string is printf-style; only its final conversion
//! letter is honored (`d`/`i`, `u`, `x`, `X`, `o`, `c`, `s`, `p`); flags,
//! width, and precision are not interpreted, and an unrecognized conversion
//! falls back to the default rendering. Output goes through
//! [`crate::strings::copy_str`], so it is bounded, NUL-terminated, and the
//! return value is the number of bytes written.

use crate::strings::{copy_str, copy_utf16_str};

/// A value that can be rendered into a byte buffer.
///
/// Wide variants use UTF-16 (`u16` units); `Str`/`WideStr` carry `Option` so
/// a C null string renders as the empty string instead of being a distinct
/// error path.
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    Bool(bool),
    Char(char),
    WideChar(u16),
    Int(i64),
    UInt(u64),
    Str(Option<&'a str>),
    WideStr(Option<&'a [u16]>),
    Pointer(usize),
}

impl Value<'_> {
    /// Renders the value into `dest` and returns the bytes written.
    ///
    /// `spec` is an optional printf-style format string; `None` selects the
    /// default rendering for the value's kind.
    pub fn format(&self, dest: &mut [u8], spec: Option<&str>) -> usize {
        match spec.and_then(conversion_letter) {
            None => self.format_default(dest),
            Some(conversion) => self.format_with(dest, conversion),
        }
    }

    fn format_default(&self, dest: &mut [u8]) -> usize {
        match *self {
            Value::Bool(v) => copy_str(dest, Some(if v { "true" } else { "false" })),
            Value::Char(v) => {
                let mut utf8 = [0u8; 4];
                copy_str(dest, Some(v.encode_utf8(&mut utf8)))
            }
            Value::WideChar(v) => copy_utf16_str(dest, Some(&[v])),
            Value::Int(v) => copy_str(dest, Some(&v.to_string())),
            Value::UInt(v) => copy_str(dest, Some(&v.to_string())),
            Value::Str(v) => copy_str(dest, v),
            Value::WideStr(v) => copy_utf16_str(dest, v),
            Value::Pointer(v) => copy_str(dest, Some(&format!("{v:#x}"))),
        }
    }

    fn format_with(&self, dest: &mut [u8], conversion: char) -> usize {
        let rendered = match conversion {
            'd' | 'i' => self.as_i64().to_string(),
            'u' => self.as_u64().to_string(),
            'x' => format!("{:x}", self.as_u64()),
            'X' => format!("{:X}", self.as_u64()),
            'o' => format!("{:o}", self.as_u64()),
            'c' => return self.format_char(dest),
            's' => return self.format_default(dest),
            'p' => format!("{:#x}", self.as_u64()),
            _ => return self.format_default(dest),
        };
        copy_str(dest, Some(&rendered))
    }

    fn format_char(&self, dest: &mut [u8]) -> usize {
        match *self {
            Value::Char(_) | Value::WideChar(_) => self.format_default(dest),
            // %c on a numeric value prints the code point, like printf.
            other => {
                let code = u32::try_from(other.as_i64()).unwrap_or(0);
                let ch = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
                let mut utf8 = [0u8; 4];
                copy_str(dest, Some(ch.encode_utf8(&mut utf8)))
            }
        }
    }

    fn as_i64(&self) -> i64 {
        match *self {
            Value::Bool(v) => v as i64,
            Value::Char(v) => v as i64,
            Value::WideChar(v) => v as i64,
            Value::Int(v) => v,
            Value::UInt(v) => v as i64,
            Value::Str(_) | Value::WideStr(_) => 0,
            Value::Pointer(v) => v as i64,
        }
    }

    fn as_u64(&self) -> u64 {
        match *self {
            Value::Bool(v) => v as u64,
            Value::Char(v) => v as u64,
            Value::WideChar(v) => v as u64,
            Value::Int(v) => v as u64,
            Value::UInt(v) => v,
            Value::Str(_) | Value::WideStr(_) => 0,
            Value::Pointer(v) => v as u64,
        }
    }
}

/// The final conversion letter of a printf-style format string, if any.
fn conversion_letter(spec: &str) -> Option<char> {
    spec.chars().rev().find(|c| c.is_ascii_alphabetic())
}

/// Renders any supported value into `dest`; returns the bytes written.
///
/// The generic entry point: anything convertible into [`Value`] is accepted.
pub fn format_value<'a>(dest: &mut [u8], value: impl Into<Value<'a>>, spec: Option<&str>) -> usize {
    value.into().format(dest, spec)
}

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<char> for Value<'_> {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

macro_rules! value_from_int {
    ($variant:ident: $conv:ty => $($t:ty),+) => {
        $(impl From<$t> for Value<'_> {
            fn from(v: $t) -> Self {
                Value::$variant(v as $conv)
            }
        })+
    };
}

value_from_int!(Int: i64 => i8, i16, i32, i64, isize);
value_from_int!(UInt: u64 => u8, u16, u32, u64, usize);

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::Str(Some(v))
    }
}

impl<'a> From<Option<&'a str>> for Value<'a> {
    fn from(v: Option<&'a str>) -> Self {
        Value::Str(v)
    }
}

impl<'a> From<&'a [u16]> for Value<'a> {
    fn from(v: &'a [u16]) -> Self {
        Value::WideStr(Some(v))
    }
}

impl<'a> From<Option<&'a [u16]>> for Value<'a> {
    fn from(v: Option<&'a [u16]>) -> Self {
        Value::WideStr(v)
    }
}

impl<T> From<*const T> for Value<'_> {
    fn from(v: *const T) -> Self {
        Value::Pointer(v as usize)
    }
}

impl<T> From<*mut T> for Value<'_> {
    fn from(v: *mut T) -> Self {
        Value::Pointer(v as usize)
    }
}
