//! The value-type classifier and `parse_value`, for PARAM-VALUE strings in
//! STRUCTURED-DATA.
//!
//! The classifier is a DFA that runs in lockstep with the structured-data
//! scanner's value-body state: one [`Classifier::step`] call per unescaped
//! content byte. It decides whether the quoted value's content reads as a
//! string, `null`, `false`, `true`, an integer, or a float — without ever
//! backtracking over the bytes already consumed.

use crate::escape;

/// The classification of a STRUCTURED-DATA PARAM-VALUE, derived from its
/// unquoted content.
///
/// Unlike the original encoding (a signed integer where non-negative values
/// mean "string with N escapes" and a handful of negative sentinels mean the
/// other types), this is a plain tagged union — the escape count only matters
/// for `String`, so it lives on that variant alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// An ordinary string. `escapes` is the number of backslash-escape
    /// sequences (`\"`, `\\`, `\]`) found in the raw (still-escaped) slice.
    String { escapes: u32 },
    /// The exact lowercase lexeme `null`.
    Null,
    /// The exact lowercase lexeme `false` or `true`.
    Bool(bool),
    /// Up to 18 digits, with an optional leading `+`/`-`.
    Integer,
    /// A decimal point or exponent, with digits.
    Float,
}

impl ValueType {
    /// The value type for an empty PARAM-VALUE (`""`), which the scanner
    /// reports as a zero-escape string.
    #[inline]
    pub const fn empty() -> Self {
        ValueType::String { escapes: 0 }
    }
}

/// The classifier's internal DFA state. `Digits`, `FloatFrac`/`FloatExp`, and
/// the three literal-final states are the recognized final states; anything
/// else at termination means `String`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Start,
    Sign,
    /// A bare `.` with no leading digit (e.g. `.5`).
    Dot,
    /// Digits after a decimal point — a final state (`Float`).
    FloatFrac,
    /// Just saw `e`/`E`, expecting a sign or a digit.
    ExpMark,
    /// Saw the exponent's sign, expecting a digit.
    ExpSign,
    /// Digits in the exponent — a final state (`Float`).
    FloatExp,
    /// Digits with no `.`/exponent yet — a final state (`Integer`).
    Digits,
    FChar,
    FaChar,
    FalChar,
    FalsChar,
    False,
    NChar,
    NuChar,
    NulChar,
    Null,
    TChar,
    TrChar,
    TruChar,
    True,
    Dead,
}

/// Classifies a PARAM-VALUE's content one byte at a time, in lockstep with
/// the structured-data scanner's value-body state.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Classifier {
    state: State,
    digits: u8,
}

impl Classifier {
    #[inline]
    pub(crate) fn new() -> Self {
        Classifier {
            state: State::Start,
            digits: 0,
        }
    }

    /// Feeds one content byte (already stripped of its escaping backslash, if
    /// any) into the classifier.
    #[inline]
    pub(crate) fn step(&mut self, c: u8) {
        use State::*;
        self.state = match self.state {
            Start => match c {
                b'+' | b'-' => Sign,
                b'.' => Dot,
                b'f' => FChar,
                b'n' => NChar,
                b't' => TChar,
                b'0'..=b'9' => Digits,
                _ => Dead,
            },
            Sign => match c {
                b'.' => Dot,
                b'0'..=b'9' => Digits,
                _ => Dead,
            },
            // The first digit that entered `Digits` is free (matches the
            // original's state transition on the leading digit, which never
            // touches the counter); only digits consumed *while already* in
            // this state count against the cap of 18, for a 19-digit limit
            // overall — the length of `i64::MAX`.
            Digits => {
                if c.is_ascii_digit() && self.digits < 18 {
                    self.digits += 1;
                    Digits
                } else {
                    match c {
                        b'.' => Dot,
                        b'e' | b'E' => ExpMark,
                        _ => Dead,
                    }
                }
            }
            Dot => match c {
                b'0'..=b'9' => FloatFrac,
                _ => Dead,
            },
            FloatFrac => match c {
                b'0'..=b'9' => FloatFrac,
                b'e' | b'E' => ExpMark,
                _ => Dead,
            },
            ExpMark => match c {
                b'+' | b'-' => ExpSign,
                b'0'..=b'9' => FloatExp,
                _ => Dead,
            },
            ExpSign => match c {
                b'0'..=b'9' => FloatExp,
                _ => Dead,
            },
            FloatExp => match c {
                b'0'..=b'9' => FloatExp,
                _ => Dead,
            },
            FChar => match c {
                b'a' => FaChar,
                _ => Dead,
            },
            FaChar => match c {
                b'l' => FalChar,
                _ => Dead,
            },
            FalChar => match c {
                b's' => FalsChar,
                _ => Dead,
            },
            FalsChar => match c {
                b'e' => False,
                _ => Dead,
            },
            NChar => match c {
                b'u' => NuChar,
                _ => Dead,
            },
            NuChar => match c {
                b'l' => NulChar,
                _ => Dead,
            },
            NulChar => match c {
                b'l' => Null,
                _ => Dead,
            },
            TChar => match c {
                b'r' => TrChar,
                _ => Dead,
            },
            TrChar => match c {
                b'u' => TruChar,
                _ => Dead,
            },
            TruChar => match c {
                b'e' => True,
                _ => Dead,
            },
            False | Null | True | Dead => Dead,
        };
    }

    #[inline]
    pub(crate) fn finish(self) -> Option<ValueType> {
        match self.state {
            State::FloatFrac | State::FloatExp => Some(ValueType::Float),
            State::Digits => Some(ValueType::Integer),
            State::Null => Some(ValueType::Null),
            State::False => Some(ValueType::Bool(false)),
            State::True => Some(ValueType::Bool(true)),
            _ => None,
        }
    }
}

/// Converts a PARAM-VALUE slice and its classified type to a string/bool/i64/
/// f64 result, matching the original's overflow and empty-value fallbacks
/// exactly.
///
/// - `value` is the slice as returned by the structured-data scanner for a
///   `String` type (which may or may not include the surrounding quotes,
///   depending on the `quotes_preserving` flag passed to the scanner); for
///   non-`String` types it never includes the quotes.
/// - Null/Bool/Integer/Float are parsed from the bare content; if a value
///   classified `Integer` doesn't fit `i64` (this cannot happen from a
///   well-formed classifier run, since 18 decimal digits always fits in
///   `i64`, but is handled defensively) or a `Float` fails to parse, the
///   result falls back to the bare string — with quotes already stripped if
///   they were present, never re-added.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParsedValue {
    Str(String),
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
}

/// Parses a PARAM-VALUE slice given its classified [`ValueType`].
pub fn parse_value(value: &[u8], ty: ValueType) -> ParsedValue {
    if value.is_empty() || value == b"\"\"" {
        return ParsedValue::Str(String::new());
    }
    if let ValueType::String { escapes } = ty {
        let mut content = value;
        if content.first() == Some(&b'"') && content.last() == Some(&b'"') && content.len() >= 2 {
            content = &content[1..content.len() - 1];
        }
        let unescaped = if escapes > 0 {
            escape::unescape(content, escapes as usize)
        } else {
            content.to_vec()
        };
        return ParsedValue::Str(String::from_utf8_lossy(&unescaped).into_owned());
    }
    match ty {
        ValueType::Null => ParsedValue::Null,
        ValueType::Bool(b) => ParsedValue::Bool(b),
        ValueType::Float => match std::str::from_utf8(value).ok().and_then(|s| s.parse().ok()) {
            Some(f) => ParsedValue::Float(f),
            None => ParsedValue::Str(String::from_utf8_lossy(value).into_owned()),
        },
        ValueType::Integer => match parse_i64(value) {
            Some(n) => ParsedValue::Integer(n),
            None => ParsedValue::Str(String::from_utf8_lossy(value).into_owned()),
        },
        ValueType::String { .. } => unreachable!(),
    }
}

/// Parses a signed 64-bit integer by hand, matching the original's digit
/// accumulation (which silently wraps on overflow rather than erroring) and
/// its rejection of anything but an optional leading sign followed by
/// digits.
fn parse_i64(data: &[u8]) -> Option<i64> {
    let (neg, digits) = match data.first()? {
        b'-' => (true, &data[1..]),
        b'+' => (false, &data[1..]),
        _ => (false, data),
    };
    if digits.is_empty() {
        return None;
    }
    let mut n: i64 = 0;
    for &c in digits {
        if !c.is_ascii_digit() {
            return None;
        }
        n = n.wrapping_mul(10).wrapping_add((c - b'0') as i64);
    }
    Some(if neg { -n } else { n })
}

fn classify(s: &[u8]) -> Option<ValueType> {
    let mut c = Classifier::new();
    for &b in s {
        c.step(b);
    }
    c.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_literals() {
        assert_eq!(classify(b"null"), Some(ValueType::Null));
        assert_eq!(classify(b"false"), Some(ValueType::Bool(false)));
        assert_eq!(classify(b"true"), Some(ValueType::Bool(true)));
        assert_eq!(classify(b"Null"), None);
        assert_eq!(classify(b"nulll"), None);
        assert_eq!(classify(b"truey"), None);
    }

    #[test]
    fn classifies_integers() {
        assert_eq!(classify(b"0"), Some(ValueType::Integer));
        assert_eq!(classify(b"-64"), Some(ValueType::Integer));
        assert_eq!(classify(b"+256"), Some(ValueType::Integer));
        assert_eq!(classify(b"1234567890123456789"), Some(ValueType::Integer));
        // A 20-digit lexeme exceeds the cap that keeps a value in the
        // integer states (the 19-digit length of `i64::MAX`), so it falls
        // out to `String`.
        assert_eq!(classify(b"92233720368547758070"), None);
    }

    #[test]
    fn classifies_floats() {
        assert_eq!(classify(b"1.5"), Some(ValueType::Float));
        assert_eq!(classify(b".5"), Some(ValueType::Float));
        assert_eq!(classify(b"1e10"), Some(ValueType::Float));
        assert_eq!(classify(b"1.5e-10"), Some(ValueType::Float));
        assert_eq!(classify(b"1."), None);
        assert_eq!(classify(b"1e"), None);
    }

    #[test]
    fn classifies_strings() {
        assert_eq!(classify(b"hello"), None);
        assert_eq!(classify(b""), None);
        assert_eq!(classify(b"1a"), None);
        assert_eq!(classify(b"truex"), None);
    }

    #[test]
    fn parse_value_fallbacks() {
        assert_eq!(
            parse_value(b"92233720368547758070", ValueType::String { escapes: 0 }),
            ParsedValue::Str("92233720368547758070".to_string()),
        );
        assert_eq!(
            parse_value(b"1234567890123456789", ValueType::Integer),
            ParsedValue::Integer(1234567890123456789),
        );
        assert_eq!(parse_value(b"", ValueType::String { escapes: 0 }), ParsedValue::Str(String::new()));
        assert_eq!(parse_value(b"\"\"", ValueType::String { escapes: 0 }), ParsedValue::Str(String::new()));
    }

    #[test]
    fn parse_value_string_strips_quotes_and_unescapes() {
        let got = parse_value(b"\"two \\\"double quotes\\\"\"", ValueType::String { escapes: 2 });
        assert_eq!(got, ParsedValue::Str(r#"two "double quotes""#.to_string()));
    }
}
