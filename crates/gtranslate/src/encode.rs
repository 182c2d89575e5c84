//! Percent-encoding for query parameters.
//!
//! ASCII alphanumerics plus `-`, `.` and `_` pass through unchanged. In raw
//! mode `~` is also kept and spaces become `%20`; otherwise spaces become `+`.
//! Every other byte is written as `%XX` with uppercase hex digits.

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Upper bound on the encoded size of `len` input bytes, terminator included.
pub fn encoded_len_bound(len: usize) -> usize {
    len * 3 + 1
}

fn is_unreserved(b: u8, raw: bool) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_')
        || (raw && b == b'~')
}

/// Percent-encode `input` into a freshly allocated string.
pub fn encode(input: &[u8], raw: bool) -> String {
    let mut out = String::new();
    encode_into(&mut out, input, raw);
    out
}

/// Percent-encode `input`, appending to `out`.
///
/// Reserves room for the worst case once, so a caller that already sized
/// `out` never triggers a reallocation here.
pub fn encode_into(out: &mut String, input: &[u8], raw: bool) {
    out.reserve(encoded_len_bound(input.len()));

    for &b in input {
        if !raw && b == b' ' {
            out.push('+');
        } else if is_unreserved(b, raw) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

/// Decode a percent-encoded byte string.
///
/// `+` decodes to a space unless `raw` is set. Returns `None` on a truncated
/// or non-hex escape.
pub fn decode(input: &[u8], raw: bool) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        match input[i] {
            b'%' => {
                let hi = hex_value(*input.get(i + 1)?)?;
                let lo = hex_value(*input.get(i + 2)?)?;
                out.push((hi << 4) | lo);
                i += 3;
            }
            b'+' if !raw => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    Some(out)
}
