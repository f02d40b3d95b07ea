//! The shared identifier-like field scanner behind HOSTNAME, APP-NAME,
//! PROCID, and MSGID, plus the `IsIdent` check used to validate SD-ID and
//! PARAM-NAME tokens.

use crate::error::HeaderError;

pub const HOSTNAME_WIDTH: usize = 255;
pub const APP_NAME_WIDTH: usize = 48;
pub const PROC_ID_WIDTH: usize = 128;
pub const MSG_ID_WIDTH: usize = 32;

/// Scans a printable-ASCII, space-terminated field capped at `width` bytes,
/// starting at `input[*pos]`. Recognizes `NILVALUE` (a bare `-`) as `None`.
/// Advances `*pos` past the terminating space on success.
///
/// Shared by [`scan_hostname`], [`scan_app_name`], [`scan_proc_id`], and
/// [`scan_msg_id`], which only differ in `width` and the error variant they
/// report.
pub fn scan_field<'a>(
    input: &'a [u8],
    pos: &mut usize,
    width: usize,
    err: HeaderError,
) -> Result<Option<&'a [u8]>, HeaderError> {
    let p = *pos;
    if input.len() <= p {
        *pos = p;
        return Err(err);
    }
    if input.len() > p + 1 && input[p] == b'-' && input[p + 1] == b' ' {
        *pos = p + 2;
        return Ok(None);
    }
    let cap = if input.len() > width { p + width } else { input.len() };
    let mut i = p;
    while i < cap {
        let c = input[i];
        if c == b' ' {
            break;
        }
        if !(33..=126).contains(&c) {
            *pos = i;
            return Err(err);
        }
        i += 1;
    }
    if p < i && i < input.len() && input[i] == b' ' {
        *pos = i + 1;
        Ok(Some(&input[p..i]))
    } else {
        *pos = i;
        Err(err)
    }
}

#[inline]
pub fn scan_hostname<'a>(input: &'a [u8], pos: &mut usize) -> Result<Option<&'a [u8]>, HeaderError> {
    scan_field(input, pos, HOSTNAME_WIDTH, HeaderError::InvalidHostname)
}

#[inline]
pub fn scan_app_name<'a>(input: &'a [u8], pos: &mut usize) -> Result<Option<&'a [u8]>, HeaderError> {
    scan_field(input, pos, APP_NAME_WIDTH, HeaderError::InvalidAppName)
}

#[inline]
pub fn scan_proc_id<'a>(input: &'a [u8], pos: &mut usize) -> Result<Option<&'a [u8]>, HeaderError> {
    scan_field(input, pos, PROC_ID_WIDTH, HeaderError::InvalidProcId)
}

#[inline]
pub fn scan_msg_id<'a>(input: &'a [u8], pos: &mut usize) -> Result<Option<&'a [u8]>, HeaderError> {
    scan_field(input, pos, MSG_ID_WIDTH, HeaderError::InvalidMsgId)
}

/// Whether `id` is a valid SD-ID or PARAM-NAME: 1 to 32 bytes, each in the
/// printable-ASCII range `33..=126`, excluding `=`, `]`, and `"`.
#[inline]
pub fn is_ident(id: &[u8]) -> bool {
    if id.is_empty() || id.len() > 32 {
        return false;
    }
    id.iter().all(|&c| (33..=126).contains(&c) && c != b'=' && c != b']' && c != b'"')
}

#[cfg(test)]
mod tests {
    use bstr::ByteSlice;

    use super::*;

    #[test]
    fn nil_field() {
        let mut pos = 0;
        assert_eq!(scan_hostname(b"- x", &mut pos).unwrap(), None);
        assert_eq!(pos, 2);
    }

    #[test]
    fn ordinary_field() {
        let mut pos = 0;
        assert_eq!(
            scan_hostname(b"mymachine.example.com x", &mut pos).unwrap().map(|h| h.as_bstr()),
            Some(b"mymachine.example.com".as_bstr())
        );
        assert_eq!(pos, 23);
    }

    #[test]
    fn rejects_control_bytes() {
        let mut pos = 0;
        assert_eq!(scan_app_name(b"ev\x01ntslog x", &mut pos), Err(HeaderError::InvalidAppName));
    }

    #[test]
    fn rejects_missing_terminator() {
        let mut pos = 0;
        assert_eq!(scan_msg_id(b"ID47", &mut pos), Err(HeaderError::InvalidMsgId));
    }

    #[test]
    fn rejects_width_overrun() {
        let long = vec![b'a'; MSG_ID_WIDTH + 1];
        let mut input = long.clone();
        input.push(b' ');
        let mut pos = 0;
        assert_eq!(scan_msg_id(&input, &mut pos), Err(HeaderError::InvalidMsgId));
    }

    #[test]
    fn rejects_empty_field() {
        let mut pos = 0;
        assert_eq!(scan_msg_id(b" x", &mut pos), Err(HeaderError::InvalidMsgId));
    }

    #[test]
    fn is_ident_examples() {
        assert!(is_ident(b"exampleSDID@32473"));
        assert!(!is_ident(b""));
        assert!(!is_ident(&vec![b'a'; 33]));
        assert!(!is_ident(b"bad=name"));
        assert!(!is_ident(b"bad]name"));
        assert!(!is_ident(b"bad\"name"));
    }
}
