use std::io;

use thiserror::Error;

/// An error from reading octet-counted frames with [`FrameScanner`](crate::frame::FrameScanner).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum FrameError {
    /// The decimal length prefix is malformed (leading zero, non-digit, or
    /// missing terminating space).
    #[error("invalid frame")]
    InvalidFrame,
    /// The decimal length prefix exceeds the scanner's configured maximum.
    #[error("frame size exceeded")]
    FrameSizeExceeded,
}

/// An error from scanning an RFC 5424 HEADER field.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum HeaderError {
    #[error("invalid header")]
    InvalidHeader,
    #[error("invalid priority")]
    InvalidPriority,
    #[error("invalid version")]
    InvalidVersion,
    #[error("invalid timestamp")]
    InvalidTimestamp,
    #[error("invalid hostname")]
    InvalidHostname,
    #[error("invalid app_name")]
    InvalidAppName,
    #[error("invalid proc_id")]
    InvalidProcId,
    #[error("invalid msg_id")]
    InvalidMsgId,
}

/// An error from scanning STRUCTURED-DATA.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum StructuredDataError {
    #[error("invalid structured data")]
    InvalidStructuredData,
}

/// The union of every error this crate can produce, for callers who want a
/// single error type across frame scanning, header parsing, and
/// structured-data scanning.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error(transparent)]
    StructuredData(#[from] StructuredDataError),
    #[error(transparent)]
    Io(#[from] io::Error),
}
