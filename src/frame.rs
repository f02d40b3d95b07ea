//! RFC 6587 octet-counted framing: `FrameScanner` pulls `MSG-LEN SP MSG`
//! frames out of a byte stream into a caller-supplied buffer without
//! allocating, and `FrameWriter` writes them back out through the same kind
//! of buffer.

use std::io;
use std::ops::Range;

use crate::error::FrameError;

/// A terminal condition on a [`FrameScanner`]: either a framing violation or
/// an I/O error surfaced by the underlying reader. Plain end-of-stream is
/// not represented here — it just makes [`FrameScanner::next`] return
/// `false` with [`FrameScanner::err`] reporting `None`.
#[derive(Debug)]
pub enum FrameFault {
    Frame(FrameError),
    Io(io::Error),
}

impl std::fmt::Display for FrameFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameFault::Frame(e) => write!(f, "{e}"),
            FrameFault::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FrameFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameFault::Frame(e) => Some(e),
            FrameFault::Io(e) => Some(e),
        }
    }
}

/// Pulls successive octet-counted frames out of a reader into a
/// caller-owned buffer.
///
/// A frame larger than the buffer is truncated to the buffer's capacity;
/// the remaining bytes are read and discarded before the next frame is
/// scanned. A frame cut short by end-of-stream is likewise truncated to
/// whatever arrived. Both truncations are reported as successful frames,
/// not errors — callers that need to detect truncation should compare the
/// decoded length prefix against the returned frame's length.
pub struct FrameScanner<'buf, R> {
    r: R,
    buf: &'buf mut [u8],
    frame: Range<usize>,
    start: usize,
    end: usize,
    /// Bytes of an oversize frame's tail still to be drained (positive), or
    /// how far the most recent read overshot that drain (negative).
    offset: isize,
    shift: usize,
    max_frame_size: usize,
    eof: bool,
    fault: Option<FrameFault>,
}

impl<'buf, R: io::Read> FrameScanner<'buf, R> {
    /// Creates a scanner reading from `r` into `buf`, rejecting any frame
    /// whose declared length exceeds `max_frame_size` (`0` means no limit).
    ///
    /// Panics if `buf` is empty.
    pub fn new(r: R, buf: &'buf mut [u8], max_frame_size: usize) -> Self {
        assert!(!buf.is_empty(), "FrameScanner: buffer capacity must be greater than zero");
        let shift = buf.len() >> 1;
        FrameScanner {
            r,
            buf,
            frame: 0..0,
            start: 0,
            end: 0,
            offset: 0,
            shift,
            max_frame_size,
            eof: false,
            fault: None,
        }
    }

    /// Advances to the next frame, returning `true` if one is available.
    /// Once this returns `false`, it will keep returning `false`; consult
    /// [`Self::err`] to tell end-of-stream apart from a fault.
    pub fn next(&mut self) -> bool {
        let mut n: usize = 0;
        while self.offset > 0 {
            match self.r.read(self.buf) {
                Ok(0) => {
                    self.eof = true;
                    return false;
                }
                Ok(read) => {
                    n = read;
                    self.offset -= read as isize;
                }
                Err(e) => {
                    self.fault = Some(FrameFault::Io(e));
                    return false;
                }
            }
        }
        if self.offset < 0 {
            self.start = (self.offset + n as isize) as usize;
            self.end = n;
            self.offset = 0;
        }

        let mut frame_size: usize = 0;
        let mut m: usize = 0;
        loop {
            if self.end > self.start {
                if frame_size == 0 {
                    while self.start < self.end {
                        let c = self.buf[self.start];
                        if m > 0 && c == b' ' {
                            frame_size = m;
                            m = 0;
                            self.start += 1;
                            break;
                        }
                        if (m == 0 && c == b'0') || !(b'0'..=b'9').contains(&c) {
                            self.fault = Some(FrameFault::Frame(FrameError::InvalidFrame));
                            return false;
                        }
                        m = m * 10 + (c - b'0') as usize;
                        if self.max_frame_size > 0 && m > self.max_frame_size {
                            self.fault = Some(FrameFault::Frame(FrameError::FrameSizeExceeded));
                            return false;
                        }
                        self.start += 1;
                    }
                    if frame_size > self.buf.len() {
                        self.offset = (frame_size - self.buf.len()) as isize;
                        frame_size = self.buf.len();
                    }
                }
                let available = self.end - self.start;
                let done = self.eof || self.fault.is_some();
                if frame_size > available && done {
                    frame_size = available;
                }
                if frame_size > 0 && frame_size <= available {
                    let frame_end = frame_size + self.start;
                    self.frame = self.start..frame_end;
                    self.start = frame_end;
                    return true;
                }
            }
            if self.eof || self.fault.is_some() {
                self.start = 0;
                self.end = 0;
                self.offset = 0;
                return false;
            }
            if self.start > 0 && (self.end == self.buf.len() || self.start >= self.shift) {
                self.buf.copy_within(self.start..self.end, 0);
                self.end -= self.start;
                self.start = 0;
            }
            match self.r.read(&mut self.buf[self.end..]) {
                Ok(0) => self.eof = true,
                Ok(read) => self.end += read,
                Err(e) => self.fault = Some(FrameFault::Io(e)),
            }
        }
    }

    /// The current frame's payload, valid until the next call to [`Self::next`].
    pub fn frame(&self) -> &[u8] {
        &self.buf[self.frame.clone()]
    }

    /// The fault that stopped the scan, or `None` if it stopped on a clean
    /// end-of-stream.
    pub fn err(&self) -> Option<&FrameFault> {
        self.fault.as_ref()
    }

    /// Discards any buffered state and resumes scanning from `r`.
    pub fn reset(&mut self, r: R) {
        self.r = r;
        self.eof = false;
        self.fault = None;
        self.start = 0;
        self.end = 0;
        self.offset = 0;
    }
}

/// Buffers and writes octet-counted frames to an underlying writer.
///
/// Implements [`std::io::Write`]; each `write` call frames its argument as
/// one complete `MSG-LEN SP MSG` unit (it never splits a payload across two
/// frames). A payload that can never fit the buffer even when empty
/// bypasses buffering and is written directly.
pub struct FrameWriter<'buf, W> {
    w: W,
    buf: &'buf mut [u8],
    offset: usize,
}

impl<'buf, W: io::Write> FrameWriter<'buf, W> {
    pub fn new(w: W, buf: &'buf mut [u8]) -> Self {
        FrameWriter { w, buf, offset: 0 }
    }

    /// Discards any unflushed buffered frames and resumes writing to `w`.
    pub fn reset(&mut self, w: W) {
        self.w = w;
        self.offset = 0;
    }

    fn do_flush(&mut self) -> io::Result<()> {
        if self.offset > 0 {
            let n = self.w.write(&self.buf[..self.offset])?;
            if n < self.offset {
                if n > 0 {
                    self.buf.copy_within(n..self.offset, 0);
                }
                self.offset -= n;
                return Err(io::Error::new(io::ErrorKind::WriteZero, "short write"));
            }
            self.offset = 0;
        }
        Ok(())
    }
}

impl<'buf, W: io::Write> io::Write for FrameWriter<'buf, W> {
    fn write(&mut self, p: &[u8]) -> io::Result<usize> {
        if p.is_empty() {
            return Ok(0);
        }
        let mut scratch = [0u8; 20];
        let header = format_len_header(&mut scratch, p.len());
        let total = header.len() + p.len();

        if total > self.buf.len() - self.offset {
            self.do_flush()?;
            if total > self.buf.len() {
                raw_write(&mut self.w, header)?;
                raw_write(&mut self.w, p)?;
                return Ok(p.len());
            }
        }
        let mut n = copy_into(&mut self.buf[self.offset..], header);
        n += copy_into(&mut self.buf[self.offset + n..], p);
        self.offset += n;
        Ok(p.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.do_flush()
    }
}

fn raw_write<W: io::Write>(w: &mut W, p: &[u8]) -> io::Result<usize> {
    let n = w.write(p)?;
    if n < p.len() {
        return Err(io::Error::new(io::ErrorKind::WriteZero, "short write"));
    }
    Ok(n)
}

fn copy_into(dst: &mut [u8], src: &[u8]) -> usize {
    dst[..src.len()].copy_from_slice(src);
    src.len()
}

/// Writes `len` in decimal followed by a single space into `scratch`,
/// returning the used prefix.
fn format_len_header(scratch: &mut [u8; 20], len: usize) -> &[u8] {
    let mut digits = [0u8; 19];
    let mut i = digits.len();
    let mut v = len;
    if v == 0 {
        i -= 1;
        digits[i] = b'0';
    } else {
        while v > 0 {
            i -= 1;
            digits[i] = b'0' + (v % 10) as u8;
            v /= 10;
        }
    }
    let n = digits.len() - i;
    scratch[..n].copy_from_slice(&digits[i..]);
    scratch[n] = b' ';
    &scratch[..n + 1]
}
