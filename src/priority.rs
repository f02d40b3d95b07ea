//! PRIVAL scanning and the facility/severity tables it indexes into.

use crate::error::HeaderError;

const SEVERITY: [&str; 8] = [
    "EMERG", "ALERT", "CRIT", "ERROR", "WARNING", "NOTICE", "INFO", "DEBUG",
];

const FACILITY: [&str; 24] = [
    "KERN", "USER", "MAIL", "DAEMON", "AUTH", "SYSLOG", "LPR", "NEWS", "UUCP", "CRON", "AUTHPRIV",
    "FTP", "NTP", "AUDITLOG", "ALERTLOG", "CLOCK", "LOCAL0", "LOCAL1", "LOCAL2", "LOCAL3",
    "LOCAL4", "LOCAL5", "LOCAL6", "LOCAL7",
];

/// Extracts the severity (0..7) from a PRIVAL.
#[inline]
pub const fn severity(pri: u8) -> u8 {
    pri & 0x07
}

/// Extracts the facility (0, 8, 16, ..., 184) from a PRIVAL.
#[inline]
pub const fn facility(pri: u8) -> u8 {
    pri & 0xf8
}

/// The name of a PRIVAL's severity (`EMERG`, `ALERT`, ...).
#[inline]
pub fn severity_string(pri: u8) -> &'static str {
    SEVERITY[severity(pri) as usize]
}

/// The name of a PRIVAL's facility (`KERN`, `USER`, ...). Facility values
/// that don't index one of the 24 named facilities fall back to the zeroth
/// label (`KERN`), matching the original's out-of-range handling.
#[inline]
pub fn facility_string(pri: u8) -> &'static str {
    let i = (facility(pri) >> 3) as usize;
    FACILITY.get(i).copied().unwrap_or(FACILITY[0])
}

/// Formats a PRIVAL as `FACILITY.SEVERITY`, e.g. `USER.INFO`.
#[inline]
pub fn priority_string(pri: u8) -> String {
    format!("{}.{}", facility_string(pri), severity_string(pri))
}

/// Scans `<PRIVAL>` starting at `input[*pos]`, returning the digit bytes
/// (excluding `<`/`>`) and advancing `*pos` past `>` on success. On failure,
/// `*pos` is left at the offending byte.
pub fn scan_priority<'a>(input: &'a [u8], pos: &mut usize) -> Result<&'a [u8], HeaderError> {
    let start = *pos;
    parse_priority(input, pos)?;
    // `parse_priority` validates the same grammar; re-derive the slice from
    // the digits between `<` and `>`.
    Ok(&input[start + 1..*pos - 1])
}

/// Scans and decodes `<PRIVAL>`, returning the PRIVAL (0..191) and advancing
/// `*pos` past `>` on success.
///
/// The DFA enforces the `0 | [1-9][0-9]? | 1[0-8][0-9] | 19[0-1]` grammar
/// directly in its transitions, rather than parsing then range-checking.
pub fn parse_priority(input: &[u8], pos: &mut usize) -> Result<u8, HeaderError> {
    #[derive(Clone, Copy)]
    enum St {
        Start,
        FirstDigit,
        Leading1,
        /// One digit consumed (from a leading `2`-`9`, or `1` + `0`-`8`); an
        /// optional extra digit (any `0`-`9`) may follow before closing.
        Optional,
        /// Saw `19`; an optional extra digit (only `0` or `1`) may follow
        /// before closing — `192`-`199` are out of range.
        OptionalAfter19,
        /// Exactly one more byte is allowed, and it must be `>`.
        CloseOnly,
        Done,
    }

    let mut state = St::Start;
    let mut pri: u16 = 0;
    let mut i = *pos;
    if i >= input.len() {
        *pos = i;
        return Err(HeaderError::InvalidPriority);
    }
    loop {
        if i >= input.len() {
            *pos = i;
            return Err(HeaderError::InvalidPriority);
        }
        let c = input[i];
        state = match state {
            St::Start => {
                if c == b'<' {
                    St::FirstDigit
                } else {
                    *pos = i;
                    return Err(HeaderError::InvalidPriority);
                }
            }
            St::FirstDigit => match c {
                b'0' => St::CloseOnly,
                b'1' => {
                    pri = 1;
                    St::Leading1
                }
                b'2'..=b'9' => {
                    pri = (c - b'0') as u16;
                    St::Optional
                }
                _ => {
                    *pos = i;
                    return Err(HeaderError::InvalidPriority);
                }
            },
            St::Leading1 => match c {
                b'9' => {
                    pri = pri * 10 + 9;
                    St::OptionalAfter19
                }
                b'>' => St::Done,
                b'0'..=b'8' => {
                    pri = pri * 10 + (c - b'0') as u16;
                    St::Optional
                }
                _ => {
                    *pos = i;
                    return Err(HeaderError::InvalidPriority);
                }
            },
            St::Optional => match c {
                b'>' => St::Done,
                b'0'..=b'9' => {
                    pri = pri * 10 + (c - b'0') as u16;
                    St::CloseOnly
                }
                _ => {
                    *pos = i;
                    return Err(HeaderError::InvalidPriority);
                }
            },
            St::OptionalAfter19 => match c {
                b'>' => St::Done,
                b'0' | b'1' => {
                    pri = pri * 10 + (c - b'0') as u16;
                    St::CloseOnly
                }
                _ => {
                    *pos = i;
                    return Err(HeaderError::InvalidPriority);
                }
            },
            St::CloseOnly => {
                if c == b'>' {
                    St::Done
                } else {
                    *pos = i;
                    return Err(HeaderError::InvalidPriority);
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
    Ok(pri as u8)
}

#[cfg(test)]
mod tests {
    use bstr::ByteSlice;

    use super::*;

    #[test]
    fn scan_examples() {
        let mut pos = 0;
        assert_eq!(scan_priority(b"<191>2", &mut pos).unwrap().as_bstr(), b"191".as_bstr());
        assert_eq!(pos, 5);
    }

    #[test]
    fn parse_examples() {
        let mut pos = 0;
        assert_eq!(parse_priority(b"<191>2", &mut pos).unwrap(), 191);
        assert_eq!(pos, 5);

        let mut pos = 0;
        assert_eq!(parse_priority(b"<0>", &mut pos).unwrap(), 0);
        assert_eq!(pos, 3);

        let mut pos = 0;
        assert_eq!(parse_priority(b"<34>", &mut pos).unwrap(), 34);

        let mut pos = 0;
        assert_eq!(parse_priority(b"<190>", &mut pos).unwrap(), 190);

        let mut pos = 0;
        assert_eq!(parse_priority(b"<191>", &mut pos).unwrap(), 191);
    }

    #[test]
    fn rejects_out_of_range_and_malformed() {
        let mut pos = 0;
        assert_eq!(parse_priority(b"<200>", &mut pos), Err(HeaderError::InvalidPriority));
        assert_eq!(pos, 3);

        let mut pos = 0;
        assert_eq!(parse_priority(b"<192>", &mut pos), Err(HeaderError::InvalidPriority));

        let mut pos = 0;
        assert_eq!(parse_priority(b"<01>", &mut pos), Err(HeaderError::InvalidPriority));

        let mut pos = 0;
        assert_eq!(parse_priority(b"191>", &mut pos), Err(HeaderError::InvalidPriority));
    }

    #[test]
    fn severity_and_facility_tables() {
        assert_eq!(severity(165), 5);
        assert_eq!(facility(165), 160);
        assert_eq!(severity_string(165), "NOTICE");
        assert_eq!(facility_string(165), "LOCAL4");
        assert_eq!(priority_string(165), "LOCAL4.NOTICE");
        // Facility values beyond the 24 named entries fall back to the
        // zeroth label.
        assert_eq!(facility_string(0xf8), "KERN");
    }
}
