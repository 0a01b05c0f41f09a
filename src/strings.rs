//! Bounded, NUL-terminating string copies and a hex-dump formatter.
//!
//! These helpers target fixed-capacity byte and wide-character buffers of the
//! kind handed to (or received from) C APIs: at most `capacity − 1` units are
//! written, the result is always NUL-terminated, and the return value is the
//! number of units written (excluding the terminator).
//!
//! Degenerate inputs never panic and never touch memory they shouldn't:
//! an empty destination returns 0 untouched; a `None` source (the Rust
//! spelling of a C null pointer) resets the destination to the empty string
//! and returns 0. Wide strings are UTF-16 (`&[u16]`), the platform wide
//! encoding on Windows; transcoding to and from UTF-8 is lossy on invalid
//! input and never splits a character or surrogate pair at the truncation
//! boundary.
//!
//! ```
//! use syskit::strings::{copy_str, hex_dump};
//!
//! let mut buf = [0u8; 8];
//! assert_eq!(copy_str(&mut buf, Some("too long to fit")), 7);
//! assert_eq!(&buf[..8], b"too lon\0");
//!
//! let mut hex = [0u8; 9];
//! assert_eq!(hex_dump(&mut hex, &[0xAB, 0xCD, 0xEF]), 8);
//! assert_eq!(&hex[..9], b"AB CD EF\0");
//! ```

/// Copies `source` into `dest` as a NUL-terminated byte string.
///
/// At most `dest.len() - 1` bytes are copied; truncation lands on a UTF-8
/// character boundary. Returns the number of bytes written. `None` source or
/// empty destination: 0, with a non-empty destination reset to `""`.
pub fn copy_str(dest: &mut [u8], source: Option<&str>) -> usize {
    if dest.is_empty() {
        return 0;
    }
    dest[0] = 0;
    let Some(source) = source else {
        return 0;
    };

    let bytes = source.as_bytes();
    let mut len = bytes.len().min(dest.len() - 1);
    while len > 0 && !source.is_char_boundary(len) {
        len -= 1;
    }
    dest[..len].copy_from_slice(&bytes[..len]);
    dest[len] = 0;
    len
}

/// Copies a UTF-16 `source` into `dest`, transcoding to UTF-8.
///
/// Reading stops at the first NUL unit (wide C-string convention) or the end
/// of the slice. Unpaired surrogates become U+FFFD. A character whose UTF-8
/// form does not fit ends the copy; the output is always NUL-terminated.
/// Returns bytes written; `None` source or empty destination behave as in
/// [`copy_str`].
pub fn copy_utf16_str(dest: &mut [u8], source: Option<&[u16]>) -> usize {
    if dest.is_empty() {
        return 0;
    }
    dest[0] = 0;
    let Some(source) = source else {
        return 0;
    };

    let terminated = source
        .iter()
        .position(|&unit| unit == 0)
        .map(|end| &source[..end])
        .unwrap_or(source);

    let max = dest.len() - 1;
    let mut len = 0;
    for decoded in char::decode_utf16(terminated.iter().copied()) {
        let ch = decoded.unwrap_or(char::REPLACEMENT_CHARACTER);
        if len + ch.len_utf8() > max {
            break;
        }
        ch.encode_utf8(&mut dest[len..]);
        len += ch.len_utf8();
    }
    dest[len] = 0;
    len
}

/// Copies a UTF-8 `source` into a UTF-16 `dest`, NUL-terminated.
///
/// At most `dest.len() - 1` units are written; a character needing a
/// surrogate pair is only written if both units fit. Returns units written.
/// `None` source or empty destination behave as in [`copy_str`].
pub fn widen_str(dest: &mut [u16], source: Option<&str>) -> usize {
    if dest.is_empty() {
        return 0;
    }
    dest[0] = 0;
    let Some(source) = source else {
        return 0;
    };

    let max = dest.len() - 1;
    let mut len = 0;
    let mut units = [0u16; 2];
    for ch in source.chars() {
        let encoded = ch.encode_utf16(&mut units);
        if len + encoded.len() > max {
            break;
        }
        dest[len..len + encoded.len()].copy_from_slice(encoded);
        len += encoded.len();
    }
    dest[len] = 0;
    len
}

/// Copies a UTF-16 `source` into a UTF-16 `dest`, NUL-terminated.
///
/// Reading stops at the first NUL unit or the end of the slice; at most
/// `dest.len() - 1` units are copied. A high surrogate left dangling by the
/// cut is dropped rather than emitted alone. Returns units written. `None`
/// source or empty destination behave as in [`copy_str`].
pub fn copy_wide(dest: &mut [u16], source: Option<&[u16]>) -> usize {
    if dest.is_empty() {
        return 0;
    }
    dest[0] = 0;
    let Some(source) = source else {
        return 0;
    };

    let terminated = source
        .iter()
        .position(|&unit| unit == 0)
        .map(|end| &source[..end])
        .unwrap_or(source);

    let mut len = terminated.len().min(dest.len() - 1);
    if len > 0 && len < terminated.len() && (0xD800..0xDC00).contains(&terminated[len - 1]) {
        len -= 1;
    }
    dest[..len].copy_from_slice(&terminated[..len]);
    dest[len] = 0;
    len
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";
const TRUNCATION_MARK: &[u8] = b"...";

/// Renders `src` into `dest` as space-separated two-digit hex groups.
///
/// See [`hex_dump_delim`] for the full contract.
pub fn hex_dump(dest: &mut [u8], src: &[u8]) -> usize {
    hex_dump_delim(dest, src, b' ')
}

/// Renders `src` into `dest` as two-digit uppercase hex groups separated by
/// `delimiter`; a delimiter of `0` concatenates the digits with no separator.
///
/// When the full rendering (plus NUL) does not fit, as many whole byte groups
/// as leave room for a trailing `"..."` are emitted, the marker is appended,
/// and the truncated length is returned. Empty source or destination: 0. A
/// destination too small even for the marker: 0, reset to `""`.
pub fn hex_dump_delim(dest: &mut [u8], src: &[u8], delimiter: u8) -> usize {
    if dest.is_empty() {
        return 0;
    }
    dest[0] = 0;
    if src.is_empty() {
        return 0;
    }

    let group = if delimiter == 0 { 2 } else { 3 };
    let delim_len = group - 2;
    // Bytes required for the full rendering, NUL included; the delimiter
    // after the final group is replaced by the terminator.
    let needed = src.len() * group - delim_len + 1;

    let (count, truncated) = if needed > dest.len() {
        if dest.len() < TRUNCATION_MARK.len() + 1 {
            return 0;
        }
        let room = dest.len() - TRUNCATION_MARK.len() - 1 + delim_len;
        (room / group, true)
    } else {
        (src.len(), false)
    };

    let mut at = 0;
    for &byte in &src[..count] {
        dest[at] = HEX_DIGITS[(byte >> 4) as usize];
        dest[at + 1] = HEX_DIGITS[(byte & 0x0F) as usize];
        at += 2;
        if delimiter != 0 {
            dest[at] = delimiter;
            at += 1;
        }
    }
    if delim_len == 1 && at > 0 {
        at -= 1;
    }
    if truncated {
        dest[at..at + TRUNCATION_MARK.len()].copy_from_slice(TRUNCATION_MARK);
        at += TRUNCATION_MARK.len();
    }
    dest[at] = 0;
    at
}
