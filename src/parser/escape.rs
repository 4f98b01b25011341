// SPDX-License-Identifier: Apache-2.0

//! Kernel message text escaping
//!
//! printk stores control characters, non-ASCII bytes and backslashes as `\xHH`
//! when exporting records through `/dev/kmsg`.

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Decode `\xHH` and `\\` sequences.
///
/// Unrecognized or truncated escapes are copied through unchanged, so a single
/// bad sequence never loses the rest of the message.
pub fn unescape(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let b = input[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }

        match input.get(i + 1) {
            Some(b'\\') => {
                out.push(b'\\');
                i += 2;
            }
            Some(b'x') => match (hex_value(input.get(i + 2)), hex_value(input.get(i + 3))) {
                (Some(hi), Some(lo)) => {
                    out.push(hi << 4 | lo);
                    i += 4;
                }
                _ => {
                    out.extend_from_slice(b"\\x");
                    i += 2;
                }
            },
            Some(&next) => {
                out.push(b'\\');
                out.push(next);
                i += 2;
            }
            None => {
                out.push(b'\\');
                i += 1;
            }
        }
    }

    out
}

/// Encode bytes the way the kernel does before exporting them.
pub fn escape(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());

    for &b in input {
        if b < b' ' || b >= 0x7f || b == b'\\' {
            out.extend_from_slice(&[
                b'\\',
                b'x',
                HEX_DIGITS[usize::from(b >> 4)],
                HEX_DIGITS[usize::from(b & 0x0f)],
            ]);
        } else {
            out.push(b);
        }
    }

    out
}

fn hex_value(b: Option<&u8>) -> Option<u8> {
    match *b? {
        d @ b'0'..=b'9' => Some(d - b'0'),
        d @ b'a'..=b'f' => Some(d - b'a' + 10),
        d @ b'A'..=b'F' => Some(d - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_backslash_and_hex() {
        assert_eq!(unescape(br"\\10\\"), br"\10\");
        assert_eq!(unescape(br"\xc2\xB5s"), "µs".as_bytes());
        assert_eq!(unescape(br"tab\x09end"), b"tab\tend");
    }

    #[test]
    fn test_unescape_passthrough() {
        assert_eq!(unescape(b"plain text"), b"plain text");
        assert_eq!(unescape(br"\n"), br"\n");
        assert_eq!(unescape(br"\xZZ"), br"\xZZ");
        assert_eq!(unescape(br"\x4"), br"\x4");
        assert_eq!(unescape(br"\x"), br"\x");
        assert_eq!(unescape(br"trailing\"), br"trailing\");
        assert_eq!(unescape(b""), b"");
    }

    #[test]
    fn test_unescape_does_not_validate_utf8() {
        assert_eq!(unescape(br"\xff\xfe"), vec![0xff, 0xfe]);
    }

    #[test]
    fn test_unescape_does_not_rescan_decoded_bytes() {
        // \x5c decodes to a backslash which must not start a new escape
        assert_eq!(unescape(br"\x5cx41"), br"\x41");
    }

    #[test]
    fn test_escape_matches_kernel() {
        assert_eq!(escape(b"a\\b"), br"a\x5cb");
        assert_eq!(escape("µ".as_bytes()), br"\xc2\xb5");
        assert_eq!(escape(b"line\nbreak"), br"line\x0abreak");
        assert_eq!(escape(b"x41 ok"), b"x41 ok");
    }

    #[test]
    fn test_unescape_inverts_escape() {
        let inputs: [&[u8]; 5] = [
            br"\\x\x41 backslash x 0123abcdefABCDEF",
            b"printable ascii ~!@#$%^&*()_+{}|:\"<>?",
            &[0, 1, 0x1f, 0x7f, 0x80, 0xff],
            br"\x",
            b"",
        ];
        for input in inputs {
            assert_eq!(unescape(&escape(input)), input);
        }
    }
}
