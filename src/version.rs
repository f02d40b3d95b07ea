//! VERSION field scanning: `[1-9][0-9]{0,2}` followed by a single space.

use crate::error::HeaderError;

/// Scans the VERSION field starting at `input[*pos]`, returning the digit
/// bytes (excluding the trailing space) and advancing `*pos` past that space
/// on success. On failure, `*pos` is left at the offending byte.
pub fn scan_version<'a>(input: &'a [u8], pos: &mut usize) -> Result<&'a [u8], HeaderError> {
    let start = *pos;
    parse_version(input, pos)?;
    Ok(&input[start..*pos - 1])
}

/// Parses the VERSION field starting at `input[*pos]`, returning its numeric
/// value and advancing `*pos` past the trailing space on success.
pub fn parse_version(input: &[u8], pos: &mut usize) -> Result<u16, HeaderError> {
    #[derive(Clone, Copy)]
    enum St {
        Start,
        /// One digit consumed; up to two more may follow before the space.
        Digit1,
        /// Two digits consumed; at most one more may follow before the space.
        Digit2,
        /// Three digits consumed; only the space may follow.
        Digit3,
        Done,
    }

    let mut state = St::Start;
    let mut ver: u16 = 0;
    let mut i = *pos;
    if i >= input.len() {
        *pos = i;
        return Err(HeaderError::InvalidVersion);
    }
    loop {
        if i >= input.len() {
            *pos = i;
            return Err(HeaderError::InvalidVersion);
        }
        let c = input[i];
        state = match state {
            St::Start => match c {
                b'1'..=b'9' => {
                    ver = (c - b'0') as u16;
                    St::Digit1
                }
                _ => {
                    *pos = i;
                    return Err(HeaderError::InvalidVersion);
                }
            },
            St::Digit1 => match c {
                b' ' => St::Done,
                b'0'..=b'9' => {
                    ver = ver * 10 + (c - b'0') as u16;
                    St::Digit2
                }
                _ => {
                    *pos = i;
                    return Err(HeaderError::InvalidVersion);
                }
            },
            St::Digit2 => match c {
                b' ' => St::Done,
                b'0'..=b'9' => {
                    ver = ver * 10 + (c - b'0') as u16;
                    St::Digit3
                }
                _ => {
                    *pos = i;
                    return Err(HeaderError::InvalidVersion);
                }
            },
            St::Digit3 => {
                if c == b' ' {
                    St::Done
                } else {
                    *pos = i;
                    return Err(HeaderError::InvalidVersion);
                }
            }
            St::Done => unreachable!("loop exits as soon as Done is reached"),
        };
        i += 1;
        if matches!(state, St::Done) {
            break;
        }
    }
    *pos = i;
    Ok(ver)
}

#[cfg(test)]
mod tests {
    use bstr::ByteSlice;

    use super::*;

    #[test]
    fn scan_examples() {
        let mut pos = 0;
        assert_eq!(scan_version(b"1 rest", &mut pos).unwrap().as_bstr(), b"1".as_bstr());
        assert_eq!(pos, 2);
    }

    #[test]
    fn parse_examples() {
        let mut pos = 0;
        assert_eq!(parse_version(b"1 ", &mut pos).unwrap(), 1);
        assert_eq!(pos, 2);

        let mut pos = 0;
        assert_eq!(parse_version(b"42 ", &mut pos).unwrap(), 42);
        assert_eq!(pos, 3);

        let mut pos = 0;
        assert_eq!(parse_version(b"255 ", &mut pos).unwrap(), 255);
        assert_eq!(pos, 4);
    }

    #[test]
    fn rejects_malformed() {
        let mut pos = 0;
        assert_eq!(parse_version(b"0 ", &mut pos), Err(HeaderError::InvalidVersion));

        let mut pos = 0;
        assert_eq!(parse_version(b"1234 ", &mut pos), Err(HeaderError::InvalidVersion));

        let mut pos = 0;
        assert_eq!(parse_version(b"01 ", &mut pos), Err(HeaderError::InvalidVersion));

        let mut pos = 0;
        assert_eq!(parse_version(b"1x", &mut pos), Err(HeaderError::InvalidVersion));
    }
}
